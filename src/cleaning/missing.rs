use log::debug;
use serde::{Deserialize, Serialize};

use super::draft::DraftListing;
use super::report::CleaningReport;

/// How a missing numeric cell is filled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum Impute {
    /// Median of the column's present values; `fallback` when none are present.
    Median { fallback: f64 },
    Fixed { value: f64 },
    /// Leave the cell empty. Only nullable columns stay empty after
    /// coercion; count columns read an empty cell as zero.
    Keep,
}

impl Impute {
    /// The value to fill missing cells of a column with.
    pub fn fill_value(&self, present: &[f64]) -> Option<f64> {
        match *self {
            Impute::Median { fallback } => Some(median(present).unwrap_or(fallback)),
            Impute::Fixed { value } => Some(value),
            Impute::Keep => None,
        }
    }
}

/// Median of a slice, averaging the two middle values for even lengths.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Per-column fill policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissingValuePolicy {
    /// Sentinel for missing categorical labels.
    pub unknown_label: String,
    /// Placeholder for listings without a title.
    pub name_placeholder: String,
    /// Missing superhost flags read as this value.
    pub superhost_default: bool,
    pub host_listings_count: Impute,
    pub accommodates: Impute,
    pub bathrooms: Impute,
    pub bedrooms: Impute,
    pub beds: Impute,
    pub minimum_nights: Impute,
    pub number_of_reviews: Impute,
    pub reviews_per_month: Impute,
    pub review_scores_rating: Impute,
    pub availability_365: Impute,
}

impl Default for MissingValuePolicy {
    fn default() -> Self {
        Self {
            unknown_label: "Unknown".to_string(),
            name_placeholder: "No name provided".to_string(),
            superhost_default: false,
            // a host with no count on record is assumed to be new
            host_listings_count: Impute::Fixed { value: 1.0 },
            accommodates: Impute::Median { fallback: 2.0 },
            bathrooms: Impute::Median { fallback: 1.0 },
            bedrooms: Impute::Median { fallback: 1.0 },
            beds: Impute::Median { fallback: 1.0 },
            minimum_nights: Impute::Fixed { value: 1.0 },
            number_of_reviews: Impute::Fixed { value: 0.0 },
            reviews_per_month: Impute::Fixed { value: 0.0 },
            review_scores_rating: Impute::Keep,
            availability_365: Impute::Fixed { value: 0.0 },
        }
    }
}

type NumericField = fn(&mut DraftListing) -> &mut Option<f64>;

fn numeric_fields(policy: &MissingValuePolicy) -> [(&'static str, Impute, NumericField); 10] {
    [
        ("host_listings_count", policy.host_listings_count, |d| &mut d.host_listings_count),
        ("accommodates", policy.accommodates, |d| &mut d.accommodates),
        ("bathrooms", policy.bathrooms, |d| &mut d.bathrooms),
        ("bedrooms", policy.bedrooms, |d| &mut d.bedrooms),
        ("beds", policy.beds, |d| &mut d.beds),
        ("minimum_nights", policy.minimum_nights, |d| &mut d.minimum_nights),
        ("number_of_reviews", policy.number_of_reviews, |d| &mut d.number_of_reviews),
        ("reviews_per_month", policy.reviews_per_month, |d| &mut d.reviews_per_month),
        ("review_scores_rating", policy.review_scores_rating, |d| &mut d.review_scores_rating),
        ("availability_365", policy.availability_365, |d| &mut d.availability_365),
    ]
}

fn fill_text(value: &mut Option<String>, fill: &str) -> usize {
    if value.is_none() {
        *value = Some(fill.to_string());
        1
    } else {
        0
    }
}

/// Step 3: fill missing cells according to `policy`.
///
/// Medians are computed over the rows that survived price and room-type
/// validation, before any cell of that column is filled.
pub fn impute_missing(
    drafts: &mut [DraftListing],
    policy: &MissingValuePolicy,
    report: &mut CleaningReport,
) {
    for (column, strategy, field) in numeric_fields(policy) {
        let present: Vec<f64> = drafts.iter_mut().filter_map(|d| *field(d)).collect();
        if present.len() == drafts.len() {
            continue;
        }
        let Some(fill) = strategy.fill_value(&present) else {
            continue;
        };
        debug!("filling missing {column} with {fill}");
        let mut filled = 0;
        for d in drafts.iter_mut() {
            let cell = field(d);
            if cell.is_none() {
                *cell = Some(fill);
                filled += 1;
            }
        }
        report.record_imputed(column, filled);
    }

    let mut superhost = 0;
    let (mut name, mut host_id, mut host_name, mut group, mut hood, mut property) =
        (0, 0, 0, 0, 0, 0);
    for d in drafts.iter_mut() {
        if d.host_is_superhost.is_none() {
            d.host_is_superhost = Some(policy.superhost_default);
            superhost += 1;
        }
        name += fill_text(&mut d.name, &policy.name_placeholder);
        host_id += fill_text(&mut d.host_id, &policy.unknown_label);
        host_name += fill_text(&mut d.host_name, &policy.unknown_label);
        group += fill_text(&mut d.neighbourhood_group, &policy.unknown_label);
        hood += fill_text(&mut d.neighbourhood, &policy.unknown_label);
        property += fill_text(&mut d.property_type, &policy.unknown_label);
    }
    report.record_imputed("host_is_superhost", superhost);
    report.record_imputed("name", name);
    report.record_imputed("host_id", host_id);
    report.record_imputed("host_name", host_name);
    report.record_imputed("neighbourhood_group", group);
    report.record_imputed("neighbourhood", hood);
    report.record_imputed("property_type", property);
}
