use std::collections::BTreeMap;

use serde::Serialize;

use crate::cleaning::missing::median;
use crate::data::model::{HostType, Listing, RoomType};

/// How many property types the review ranking keeps.
const TOP_PROPERTY_TYPES: usize = 10;

/// Price statistics over a non-empty selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceStats {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

/// Aggregates handed to the presentation layer.
///
/// Every `Option` is `None` ("no data") when the selection is empty; the
/// group-bys are then empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Size of the dataset the selection was taken from.
    pub total_listings: usize,
    pub count: usize,
    pub price: Option<PriceStats>,
    pub mean_rating: Option<f64>,
    pub superhost_count: usize,
    /// Most frequent neighbourhood; ties go to the alphabetically first.
    pub top_neighbourhood: Option<String>,
    pub median_availability: Option<f64>,
    /// Ascending by mean price.
    pub mean_price_by_neighbourhood: Vec<(String, f64)>,
    /// Descending by count, then by name.
    pub listings_by_neighbourhood: Vec<(String, usize)>,
    pub room_type_distribution: BTreeMap<RoomType, usize>,
    pub host_type_distribution: BTreeMap<HostType, usize>,
    /// Top property types by mean review count, descending.
    pub mean_reviews_by_property_type: Vec<(String, f64)>,
}

fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Mean of `value` per group, in group-name order.
fn grouped_means<'a>(
    listings: &[&'a Listing],
    key: impl Fn(&'a Listing) -> &'a str,
    value: impl Fn(&Listing) -> f64,
) -> Vec<(String, f64)> {
    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for &l in listings {
        let entry = groups.entry(key(l)).or_default();
        entry.0 += value(l);
        entry.1 += 1;
    }
    groups
        .into_iter()
        .map(|(k, (sum, n))| (k.to_string(), sum / n as f64))
        .collect()
}

impl Summary {
    /// Aggregate a selection of listings taken from a dataset of `total_listings`.
    pub fn compute(listings: &[&Listing], total_listings: usize) -> Self {
        let prices: Vec<f64> = listings.iter().map(|l| l.price).collect();
        let price = median(&prices).map(|median| PriceStats {
            mean: mean(prices.iter().copied()).unwrap_or(median),
            median,
            min: prices.iter().copied().fold(f64::INFINITY, f64::min),
            max: prices.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        });

        let mut by_hood: BTreeMap<&str, usize> = BTreeMap::new();
        let mut room_type_distribution = BTreeMap::new();
        let mut host_type_distribution = BTreeMap::new();
        for l in listings {
            *by_hood.entry(l.neighbourhood.as_str()).or_default() += 1;
            *room_type_distribution.entry(l.room_type).or_default() += 1;
            *host_type_distribution.entry(l.host_type).or_default() += 1;
        }

        let mut listings_by_neighbourhood: Vec<(String, usize)> = by_hood
            .into_iter()
            .map(|(k, n)| (k.to_string(), n))
            .collect();
        // stable sort keeps the alphabetical order among equal counts
        listings_by_neighbourhood.sort_by(|a, b| b.1.cmp(&a.1));
        let top_neighbourhood = listings_by_neighbourhood.first().map(|(k, _)| k.clone());

        let mut mean_price_by_neighbourhood =
            grouped_means(listings, |l| l.neighbourhood.as_str(), |l| l.price);
        mean_price_by_neighbourhood.sort_by(|a, b| a.1.total_cmp(&b.1));

        let mut mean_reviews_by_property_type = grouped_means(
            listings,
            |l| l.property_type.as_str(),
            |l| l.number_of_reviews as f64,
        );
        mean_reviews_by_property_type.sort_by(|a, b| b.1.total_cmp(&a.1));
        mean_reviews_by_property_type.truncate(TOP_PROPERTY_TYPES);

        let availability: Vec<f64> = listings.iter().map(|l| l.availability_365 as f64).collect();

        Summary {
            total_listings,
            count: listings.len(),
            price,
            mean_rating: mean(listings.iter().filter_map(|l| l.review_scores_rating)),
            superhost_count: listings.iter().filter(|l| l.host_is_superhost).count(),
            top_neighbourhood,
            median_availability: median(&availability),
            mean_price_by_neighbourhood,
            listings_by_neighbourhood,
            room_type_distribution,
            host_type_distribution,
            mean_reviews_by_property_type,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
