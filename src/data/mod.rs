//! Data layer: core types, loading, persistence and filtering.
//!
//! Architecture:
//! ```text
//!  raw .csv                 cleaned .csv / .json / .parquet
//!     │                              │
//!     ▼                              ▼
//!   ┌──────────┐               ┌──────────┐
//!   │  loader  │  load_raw     │  loader  │  load_file → ListingDataset
//!   └──────────┘               └──────────┘
//!     │                              │
//!     ▼                              ▼
//!   cleaning ──► writer       ┌──────────┐
//!                             │  filter  │  FilterSpec → matching indices
//!                             └──────────┘
//! ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod writer;

use std::path::Path;

use crate::error::{InsightsError, Result};

/// On-disk format of a cleaned dataset, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Csv,
    Json,
    Parquet,
}

impl DataFormat {
    /// `.csv` and extension-less paths are CSV.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "" | "csv" => Ok(DataFormat::Csv),
            "json" => Ok(DataFormat::Json),
            "parquet" | "pq" => Ok(DataFormat::Parquet),
            other => Err(InsightsError::UnsupportedFormat(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_extension() {
        assert_eq!(DataFormat::from_path(Path::new("a.CSV")).unwrap(), DataFormat::Csv);
        assert_eq!(DataFormat::from_path(Path::new("cleaned")).unwrap(), DataFormat::Csv);
        assert_eq!(DataFormat::from_path(Path::new("a.json")).unwrap(), DataFormat::Json);
        assert_eq!(DataFormat::from_path(Path::new("a.pq")).unwrap(), DataFormat::Parquet);
        assert!(matches!(
            DataFormat::from_path(Path::new("a.xlsx")),
            Err(InsightsError::UnsupportedFormat(ext)) if ext == "xlsx"
        ));
    }
}
