use std::collections::BTreeMap;

use log::{info, warn};
use serde::Serialize;

/// Data-quality tally for one cleaning run.
///
/// Malformed rows are dropped and counted here instead of failing the run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleaningReport {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub dropped_missing_id: usize,
    /// Missing price, or a price that does not parse as a number.
    pub dropped_unparseable_price: usize,
    pub dropped_negative_price: usize,
    /// Missing room type or one outside the four known labels.
    pub dropped_invalid_room_type: usize,
    /// Rows removed by outlier caps, keyed by the first column that exceeded its cap.
    pub dropped_outliers: BTreeMap<String, usize>,
    /// Cells filled by the missing-value policy, per column.
    pub imputed: BTreeMap<String, usize>,
    /// Source columns outside the recognized schema.
    pub dropped_columns: Vec<String>,
}

impl CleaningReport {
    /// Total rows dropped for any reason.
    pub fn rows_dropped(&self) -> usize {
        self.dropped_missing_id
            + self.dropped_unparseable_price
            + self.dropped_negative_price
            + self.dropped_invalid_room_type
            + self.dropped_outliers.values().sum::<usize>()
    }

    pub(crate) fn record_imputed(&mut self, column: &str, n: usize) {
        if n > 0 {
            *self.imputed.entry(column.to_string()).or_default() += n;
        }
    }

    pub(crate) fn record_outlier(&mut self, column: &str) {
        *self.dropped_outliers.entry(column.to_string()).or_default() += 1;
    }

    /// Emit the tally through the logger.
    pub fn log_summary(&self) {
        info!(
            "cleaned {} of {} rows ({} dropped)",
            self.rows_kept,
            self.rows_read,
            self.rows_dropped()
        );
        if self.dropped_missing_id > 0 {
            warn!("dropped {} rows without an id", self.dropped_missing_id);
        }
        if self.dropped_unparseable_price > 0 {
            warn!(
                "dropped {} rows with a missing or unparseable price",
                self.dropped_unparseable_price
            );
        }
        if self.dropped_negative_price > 0 {
            warn!("dropped {} rows with a negative price", self.dropped_negative_price);
        }
        if self.dropped_invalid_room_type > 0 {
            warn!(
                "dropped {} rows with an unknown room type",
                self.dropped_invalid_room_type
            );
        }
        for (column, n) in &self.dropped_outliers {
            warn!("dropped {n} rows above the {column} cap");
        }
        for (column, n) in &self.imputed {
            info!("imputed {n} missing {column} values");
        }
        if !self.dropped_columns.is_empty() {
            info!("ignored columns: {}", self.dropped_columns.join(", "));
        }
    }
}
