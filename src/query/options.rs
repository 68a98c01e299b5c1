use serde::Serialize;

use crate::data::model::ListingDataset;

/// Choices a filter panel can offer for a dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOptions {
    pub neighbourhood_groups: Vec<String>,
    pub neighbourhoods: Vec<String>,
    pub room_types: Vec<String>,
    pub host_types: Vec<String>,
    /// `None` for an empty dataset.
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
}

impl FilterOptions {
    pub fn from_dataset(dataset: &ListingDataset) -> Self {
        let values = |column: &str| -> Vec<String> {
            dataset
                .unique_values
                .get(column)
                .map(|set| set.iter().cloned().collect())
                .unwrap_or_default()
        };
        let range = dataset.price_range();

        FilterOptions {
            neighbourhood_groups: values("neighbourhood_group"),
            neighbourhoods: values("neighbourhood"),
            room_types: values("room_type"),
            host_types: values("host_type"),
            price_min: range.map(|(lo, _)| lo),
            price_max: range.map(|(_, hi)| hi),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::listing;
    use crate::data::model::RoomType;

    #[test]
    fn lists_distinct_labels_and_price_bounds() {
        let ds = ListingDataset::from_listings(vec![
            listing("1", 30.0, RoomType::SharedRoom),
            listing("2", 90.0, RoomType::EntireHome),
            listing("3", 60.0, RoomType::EntireHome),
        ]);
        let opts = FilterOptions::from_dataset(&ds);

        assert_eq!(opts.room_types, vec!["Entire home/apt", "Shared room"]);
        assert_eq!(opts.neighbourhoods, vec!["Old Town"]);
        assert_eq!(opts.host_types, vec!["Individual"]);
        assert_eq!((opts.price_min, opts.price_max), (Some(30.0), Some(90.0)));
    }

    #[test]
    fn empty_dataset_has_no_options() {
        let opts = FilterOptions::from_dataset(&ListingDataset::from_listings(Vec::new()));
        assert!(opts.neighbourhoods.is_empty());
        assert_eq!(opts.price_min, None);
    }
}
