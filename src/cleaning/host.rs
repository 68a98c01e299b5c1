use serde::{Deserialize, Serialize};

use super::draft::DraftListing;
use crate::data::model::HostType;

/// Listing-count cut-offs separating the host types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostTypeThresholds {
    /// Hosts with at least this many listings are `Professional`.
    pub professional_min: u32,
    /// Hosts with at least this many listings are `BigCompany`.
    pub big_company_min: u32,
}

impl Default for HostTypeThresholds {
    fn default() -> Self {
        Self {
            professional_min: 5,
            big_company_min: 100,
        }
    }
}

/// Classify a host by how many listings they manage. Defined for every count.
pub fn classify_host(listings_count: u32, thresholds: &HostTypeThresholds) -> HostType {
    if listings_count >= thresholds.big_company_min {
        HostType::BigCompany
    } else if listings_count >= thresholds.professional_min {
        HostType::Professional
    } else {
        HostType::Individual
    }
}

/// Non-negative whole count from a possibly fractional, negative or missing cell.
pub fn to_count(value: Option<f64>) -> u32 {
    match value {
        Some(v) if v > 0.0 => v.round().min(u32::MAX as f64) as u32,
        _ => 0,
    }
}

/// Step 4: derive `host_type` from the (imputed) listing count.
pub fn assign_host_types(drafts: &mut [DraftListing], thresholds: &HostTypeThresholds) {
    for d in drafts {
        d.host_type = Some(classify_host(to_count(d.host_listings_count), thresholds));
    }
}
