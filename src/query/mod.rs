//! Query layer: filter a cleaned dataset and aggregate the selection for
//! charts, widgets and the price estimator.

pub mod estimator;
pub mod features;
pub mod options;
pub mod summary;

use crate::data::filter::{filtered_indices, FilterSpec};
use crate::data::model::{Listing, ListingDataset};

pub use estimator::{Estimate, PriceEstimator};
pub use features::FeatureMatrix;
pub use options::FilterOptions;
pub use summary::{PriceStats, Summary};

/// The answer to one filter query. Borrowing the dataset keeps the query a
/// pure function of its inputs.
#[derive(Debug, Clone)]
pub struct QueryResult<'a> {
    pub listings: Vec<&'a Listing>,
    pub summary: Summary,
}

/// Apply `filter` to `dataset` and aggregate what matches.
pub fn run_query<'a>(dataset: &'a ListingDataset, filter: &FilterSpec) -> QueryResult<'a> {
    let listings: Vec<&Listing> = filtered_indices(dataset, filter)
        .into_iter()
        .map(|i| &dataset.listings[i])
        .collect();
    let summary = Summary::compute(&listings, dataset.len());
    QueryResult { listings, summary }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::listing;
    use crate::data::model::RoomType;

    #[test]
    fn unrestricted_query_returns_the_whole_dataset() {
        let ds = ListingDataset::from_listings(vec![
            listing("1", 10.0, RoomType::EntireHome),
            listing("2", 20.0, RoomType::PrivateRoom),
        ]);
        let before = ds.clone();
        let result = run_query(&ds, &FilterSpec::default());

        assert_eq!(result.listings.len(), 2);
        assert_eq!(result.summary.count, 2);
        assert!(result.listings.iter().zip(&ds.listings).all(|(a, b)| *a == b));
        assert_eq!(ds, before);
    }

    #[test]
    fn private_superhost_query_with_no_match_is_empty() {
        let ds = ListingDataset::from_listings(vec![listing("1", 10.0, RoomType::PrivateRoom)]);
        let filter = FilterSpec {
            room_type: Some("Private room".into()),
            superhost_only: true,
            ..Default::default()
        };
        let result = run_query(&ds, &filter);

        assert!(result.listings.is_empty());
        assert!(result.summary.is_empty());
        assert_eq!(result.summary.price, None);
        assert_eq!(result.summary.total_listings, 1);
    }
}
