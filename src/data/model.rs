use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RoomType – bounded categorical
// ---------------------------------------------------------------------------

/// The four room types an Airbnb listing can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RoomType {
    #[serde(rename = "Entire home/apt")]
    EntireHome,
    #[serde(rename = "Private room")]
    PrivateRoom,
    #[serde(rename = "Shared room")]
    SharedRoom,
    #[serde(rename = "Hotel room")]
    HotelRoom,
}

impl RoomType {
    pub const ALL: [RoomType; 4] = [
        RoomType::EntireHome,
        RoomType::PrivateRoom,
        RoomType::SharedRoom,
        RoomType::HotelRoom,
    ];

    /// Label as it appears in the listings export.
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomType::EntireHome => "Entire home/apt",
            RoomType::PrivateRoom => "Private room",
            RoomType::SharedRoom => "Shared room",
            RoomType::HotelRoom => "Hotel room",
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomType {
    type Err = String;

    /// Case-insensitive, whitespace-tolerant match on the export labels.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        RoomType::ALL
            .into_iter()
            .find(|rt| rt.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| format!("unknown room type '{needle}'"))
    }
}

// ---------------------------------------------------------------------------
// HostType – derived from the host's listing count
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HostType {
    Individual,
    Professional,
    #[serde(rename = "Big Company")]
    BigCompany,
}

impl HostType {
    pub const ALL: [HostType; 3] = [
        HostType::Individual,
        HostType::Professional,
        HostType::BigCompany,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HostType::Individual => "Individual",
            HostType::Professional => "Professional",
            HostType::BigCompany => "Big Company",
        }
    }
}

impl fmt::Display for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HostType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        HostType::ALL
            .into_iter()
            .find(|ht| ht.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| format!("unknown host type '{needle}'"))
    }
}

// ---------------------------------------------------------------------------
// Listing – one row of the cleaned dataset
// ---------------------------------------------------------------------------

/// Canonical column names of the cleaned dataset, in output order.
/// Must stay in sync with the field order of [`Listing`].
pub const CLEANED_COLUMNS: [&str; 23] = [
    "id",
    "name",
    "host_id",
    "host_name",
    "host_is_superhost",
    "host_listings_count",
    "host_type",
    "neighbourhood_group",
    "neighbourhood",
    "latitude",
    "longitude",
    "property_type",
    "room_type",
    "accommodates",
    "bathrooms",
    "bedrooms",
    "beds",
    "price",
    "minimum_nights",
    "number_of_reviews",
    "reviews_per_month",
    "review_scores_rating",
    "availability_365",
];

/// A fully cleaned and typed listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    pub name: String,
    pub host_id: String,
    pub host_name: String,
    pub host_is_superhost: bool,
    pub host_listings_count: u32,
    pub host_type: HostType,
    pub neighbourhood_group: String,
    pub neighbourhood: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub property_type: String,
    pub room_type: RoomType,
    pub accommodates: u32,
    pub bathrooms: f64,
    pub bedrooms: u32,
    pub beds: u32,
    /// Nightly price, always finite and non-negative.
    pub price: f64,
    pub minimum_nights: u32,
    pub number_of_reviews: u32,
    pub reviews_per_month: f64,
    /// 0–100, `None` when the listing has never been rated.
    pub review_scores_rating: Option<f64>,
    pub availability_365: u32,
}

// ---------------------------------------------------------------------------
// ListingDataset – the complete cleaned dataset
// ---------------------------------------------------------------------------

/// Categorical columns indexed for filter widgets.
pub const CATEGORICAL_COLUMNS: [&str; 5] = [
    "neighbourhood_group",
    "neighbourhood",
    "property_type",
    "room_type",
    "host_type",
];

/// The cleaned dataset with pre-computed categorical indices.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingDataset {
    /// All listings (rows), in source order.
    pub listings: Vec<Listing>,
    /// For each categorical column the sorted set of distinct labels.
    pub unique_values: BTreeMap<String, BTreeSet<String>>,
}

impl ListingDataset {
    /// Build the categorical indices from the cleaned listings.
    pub fn from_listings(listings: Vec<Listing>) -> Self {
        let mut unique_values: BTreeMap<String, BTreeSet<String>> = CATEGORICAL_COLUMNS
            .iter()
            .map(|col| (col.to_string(), BTreeSet::new()))
            .collect();

        for listing in &listings {
            for col in CATEGORICAL_COLUMNS {
                if let Some(label) = categorical_value(listing, col) {
                    if let Some(set) = unique_values.get_mut(col) {
                        set.insert(label.to_string());
                    }
                }
            }
        }

        ListingDataset {
            listings,
            unique_values,
        }
    }

    /// Number of listings.
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// Lowest and highest price, `None` for an empty dataset.
    pub fn price_range(&self) -> Option<(f64, f64)> {
        self.listings.iter().map(|l| l.price).fold(None, |acc, p| match acc {
            None => Some((p, p)),
            Some((lo, hi)) => Some((lo.min(p), hi.max(p))),
        })
    }
}

/// Label of a categorical column for one listing.
pub fn categorical_value<'a>(listing: &'a Listing, column: &str) -> Option<&'a str> {
    match column {
        "neighbourhood_group" => Some(&listing.neighbourhood_group),
        "neighbourhood" => Some(&listing.neighbourhood),
        "property_type" => Some(&listing.property_type),
        "room_type" => Some(listing.room_type.as_str()),
        "host_type" => Some(listing.host_type.as_str()),
        _ => None,
    }
}
