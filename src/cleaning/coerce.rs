use super::draft::DraftListing;
use super::host::{classify_host, to_count, HostTypeThresholds};
use crate::data::model::Listing;

const MAX_AVAILABILITY: u32 = 365;
const MAX_RATING: f64 = 100.0;

fn non_negative(value: Option<f64>) -> f64 {
    value.map_or(0.0, |v| v.max(0.0))
}

/// Step 5: enforce final types on one draft.
///
/// Negative counts clip to zero, fractional counts round to the nearest whole
/// number, availability clamps to a year and ratings to 0–100.
pub fn coerce_listing(draft: DraftListing, thresholds: &HostTypeThresholds) -> Listing {
    let host_listings_count = to_count(draft.host_listings_count);
    let host_type = draft
        .host_type
        .unwrap_or_else(|| classify_host(host_listings_count, thresholds));

    Listing {
        id: draft.id,
        name: draft.name.unwrap_or_default(),
        host_id: draft.host_id.unwrap_or_default(),
        host_name: draft.host_name.unwrap_or_default(),
        host_is_superhost: draft.host_is_superhost.unwrap_or(false),
        host_listings_count,
        host_type,
        neighbourhood_group: draft.neighbourhood_group.unwrap_or_default(),
        neighbourhood: draft.neighbourhood.unwrap_or_default(),
        latitude: draft.latitude,
        longitude: draft.longitude,
        property_type: draft.property_type.unwrap_or_default(),
        room_type: draft.room_type,
        accommodates: to_count(draft.accommodates),
        bathrooms: non_negative(draft.bathrooms),
        bedrooms: to_count(draft.bedrooms),
        beds: to_count(draft.beds),
        price: draft.price,
        minimum_nights: to_count(draft.minimum_nights),
        number_of_reviews: to_count(draft.number_of_reviews),
        reviews_per_month: non_negative(draft.reviews_per_month),
        review_scores_rating: draft.review_scores_rating.map(|r| r.clamp(0.0, MAX_RATING)),
        availability_365: to_count(draft.availability_365).min(MAX_AVAILABILITY),
    }
}

pub fn coerce_all(drafts: Vec<DraftListing>, thresholds: &HostTypeThresholds) -> Vec<Listing> {
    drafts
        .into_iter()
        .map(|d| coerce_listing(d, thresholds))
        .collect()
}
