use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the cleaning pipeline, dataset I/O and the estimator.
///
/// Row-level data problems are never errors: they are tallied in
/// [`crate::cleaning::CleaningReport`] and the row is dropped.
#[derive(Debug, Error)]
pub enum InsightsError {
    /// The file could not be opened, read or written.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Required columns are absent or a stored dataset has the wrong shape.
    #[error("schema error: {0}")]
    Schema(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("config error: {0}")]
    Config(String),

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("estimator error: {0}")]
    Estimator(String),
}

pub type Result<T> = std::result::Result<T, InsightsError>;

impl InsightsError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        InsightsError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn schema<S: Into<String>>(msg: S) -> Self {
        InsightsError::Schema(msg.into())
    }
}
