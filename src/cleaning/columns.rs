use log::debug;

use super::report::CleaningReport;
use super::table::RawTable;
use crate::data::model::CLEANED_COLUMNS;
use crate::error::{InsightsError, Result};

/// Columns without which a listing cannot be cleaned.
pub const REQUIRED_COLUMNS: [&str; 4] = ["id", "price", "room_type", "neighbourhood"];

/// Source headers feeding each canonical column, highest priority first.
/// Canonical columns not listed here are fed only by their own name.
const ALIASES: [(&str, &[&str]); 5] = [
    (
        "neighbourhood",
        &["neighbourhood_cleansed", "neighbourhood", "neighborhood", "neighborhood_cleansed"],
    ),
    (
        "neighbourhood_group",
        &[
            "neighbourhood_group_cleansed",
            "neighbourhood_group",
            "neighborhood_group",
            "neighborhood_group_cleansed",
        ],
    ),
    (
        "host_listings_count",
        &[
            "host_total_listings_count",
            "host_listings_count",
            "calculated_host_listings_count",
        ],
    ),
    ("bathrooms", &["bathrooms_text", "bathrooms"]),
    ("accommodates", &["accommodates", "guests"]),
];

/// Derived columns that are recomputed rather than read.
const DERIVED_COLUMNS: [&str; 1] = ["host_type"];

/// Trim, lower-case and snake-case a raw header.
pub fn normalize_header(header: &str) -> String {
    header
        .trim_start_matches('\u{feff}')
        .trim()
        .to_ascii_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

fn sources_for(canonical: &'static str) -> Vec<&'static str> {
    ALIASES
        .iter()
        .find(|(name, _)| *name == canonical)
        .map(|(_, sources)| sources.to_vec())
        .unwrap_or_else(|| vec![canonical])
}

/// Step 1: rename headers to canonical names and drop everything else.
///
/// The result holds the recognized columns in canonical order. Fails with a
/// schema error naming every required column that has no source.
pub fn normalize_columns(table: RawTable, report: &mut CleaningReport) -> Result<RawTable> {
    let normalized: Vec<String> = table.headers.iter().map(|h| normalize_header(h)).collect();

    let mut picked: Vec<(&'static str, usize)> = Vec::new();
    for canonical in CLEANED_COLUMNS {
        if DERIVED_COLUMNS.contains(&canonical) {
            continue;
        }
        let source = sources_for(canonical)
            .into_iter()
            .find_map(|src| normalized.iter().position(|h| h == src));
        if let Some(idx) = source {
            debug!("column '{}' <- '{}'", canonical, table.headers[idx]);
            picked.push((canonical, idx));
        }
    }

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|req| !picked.iter().any(|(name, _)| name == req))
        .collect();
    if !missing.is_empty() {
        return Err(InsightsError::schema(format!(
            "missing required column(s): {}",
            missing.join(", ")
        )));
    }

    report.dropped_columns = table
        .headers
        .iter()
        .enumerate()
        .filter(|(i, _)| !picked.iter().any(|(_, idx)| idx == i))
        .map(|(_, h)| h.trim().to_string())
        .collect();

    let headers = picked.iter().map(|(name, _)| name.to_string()).collect();
    // Rows built in memory may be shorter than the header; absent cells read as empty.
    let rows = table
        .rows
        .into_iter()
        .map(|row| {
            picked
                .iter()
                .map(|(_, idx)| row.get(*idx).cloned().unwrap_or_default())
                .collect()
        })
        .collect();

    Ok(RawTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], row: &[&str]) -> RawTable {
        RawTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: vec![row.iter().map(|c| c.to_string()).collect()],
        }
    }

    #[test]
    fn header_normalization_trims_and_snake_cases() {
        assert_eq!(normalize_header("\u{feff} Room Type "), "room_type");
        assert_eq!(normalize_header("availability-365"), "availability_365");
    }

    #[test]
    fn renames_aliases_and_drops_unknown_columns() {
        let raw = table(
            &["id", "description", "Price", "room_type", "neighbourhood_cleansed", "host_type"],
            &["7", "Nice", "$50", "Private room", "Gràcia", "Professional"],
        );
        let mut report = CleaningReport::default();
        let out = normalize_columns(raw, &mut report).unwrap();

        assert_eq!(out.headers, vec!["id", "neighbourhood", "room_type", "price"]);
        assert_eq!(out.rows[0], vec!["7", "Gràcia", "Private room", "$50"]);
        assert_eq!(report.dropped_columns, vec!["description", "host_type"]);
    }

    #[test]
    fn cleansed_neighbourhood_wins_over_free_text() {
        let raw = table(
            &["id", "price", "room_type", "neighbourhood", "neighbourhood_cleansed"],
            &["1", "10", "Hotel room", "Barcelona, Spain", "el Raval"],
        );
        let out = normalize_columns(raw, &mut CleaningReport::default()).unwrap();
        let idx = out.column("neighbourhood").unwrap();
        assert_eq!(out.rows[0][idx], "el Raval");
    }

    #[test]
    fn short_rows_read_their_absent_cells_as_empty() {
        let raw = table(&["id", "price", "room_type", "neighbourhood"], &["1", "$10"]);
        let out = normalize_columns(raw, &mut CleaningReport::default()).unwrap();

        assert_eq!(out.headers, vec!["id", "neighbourhood", "room_type", "price"]);
        assert_eq!(out.rows[0], vec!["1", "", "", "$10"]);
    }

    #[test]
    fn missing_required_columns_are_a_schema_error() {
        let raw = table(&["id", "name"], &["1", "x"]);
        let err = normalize_columns(raw, &mut CleaningReport::default()).unwrap_err();
        match err {
            InsightsError::Schema(msg) => {
                assert!(msg.contains("price"));
                assert!(msg.contains("room_type"));
                assert!(msg.contains("neighbourhood"));
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }
}
