use std::path::Path;

use log::info;

use crate::data::filter::{filtered_indices, FilterSpec};
use crate::data::loader::load_file;
use crate::data::model::{Listing, ListingDataset, RoomType};
use crate::error::{InsightsError, Result};
use crate::query::{Estimate, FilterOptions, PriceEstimator, Summary};

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// Everything a dashboard session keeps between interactions: the loaded
/// cleaned dataset, the active filter and the rows it lets through.
///
/// The dataset is never modified once loaded.
#[derive(Debug, Default)]
pub struct Session {
    /// Loaded dataset (None until a file is loaded).
    dataset: Option<ListingDataset>,

    /// Active filter criteria.
    filter: FilterSpec,

    /// Indices of listings passing the current filter (cached).
    visible_indices: Vec<usize>,

    /// Status line for the presentation layer.
    pub status_message: Option<String>,
}

impl Session {
    /// Load a cleaned dataset file and start a session on it.
    pub fn open(path: &Path) -> Result<Self> {
        let mut session = Session::default();
        session.set_dataset(load_file(path)?);
        info!("session opened on {} ({} listings)", path.display(), session.total());
        Ok(session)
    }

    /// Ingest a dataset and show all of it.
    pub fn set_dataset(&mut self, dataset: ListingDataset) {
        self.filter = FilterSpec::default();
        self.visible_indices = (0..dataset.len()).collect();
        self.dataset = Some(dataset);
        self.status_message = None;
    }

    pub fn dataset(&self) -> Option<&ListingDataset> {
        self.dataset.as_ref()
    }

    pub fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    /// Replace the filter and recompute the visible rows.
    pub fn set_filter(&mut self, filter: FilterSpec) {
        self.filter = filter;
        self.refilter();
    }

    /// Recompute `visible_indices` after a filter change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.visible_indices = filtered_indices(ds, &self.filter);
            self.status_message = Some(format!(
                "Filtered from {} to {} listings",
                ds.len(),
                self.visible_indices.len()
            ));
            if self.visible_indices.is_empty() {
                self.status_message = Some(
                    "No listings match the selected filters. Please adjust your filters."
                        .to_string(),
                );
            }
        }
    }

    /// Listings passing the current filter, in dataset order.
    pub fn visible(&self) -> Vec<&Listing> {
        match &self.dataset {
            Some(ds) => self.visible_indices.iter().map(|&i| &ds.listings[i]).collect(),
            None => Vec::new(),
        }
    }

    pub fn total(&self) -> usize {
        self.dataset.as_ref().map_or(0, ListingDataset::len)
    }

    pub fn summary(&self) -> Summary {
        Summary::compute(&self.visible(), self.total())
    }

    pub fn options(&self) -> Option<FilterOptions> {
        self.dataset.as_ref().map(FilterOptions::from_dataset)
    }

    /// Fit the price model on the visible listings and estimate one stay.
    pub fn estimate(&self, guests: u32, bedrooms: u32, room_type: RoomType) -> Result<Estimate> {
        if self.dataset.is_none() {
            return Err(InsightsError::Estimator("no dataset loaded".to_string()));
        }
        let model = PriceEstimator::fit_listings(&self.visible())?;
        Ok(model.estimate(guests, bedrooms, room_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::listing;

    fn session() -> Session {
        let mut s = Session::default();
        let mut b = listing("b", 200.0, RoomType::PrivateRoom);
        b.host_is_superhost = true;
        s.set_dataset(ListingDataset::from_listings(vec![
            listing("a", 100.0, RoomType::EntireHome),
            b,
        ]));
        s
    }

    #[test]
    fn new_dataset_is_fully_visible() {
        let s = session();
        assert_eq!(s.visible().len(), 2);
        assert!(s.filter().is_unrestricted());
        assert_eq!(s.summary().count, 2);
    }

    #[test]
    fn filter_changes_update_visible_rows_and_status() {
        let mut s = session();
        s.set_filter(FilterSpec {
            superhost_only: true,
            ..Default::default()
        });
        assert_eq!(s.visible()[0].id, "b");
        assert_eq!(s.status_message.as_deref(), Some("Filtered from 2 to 1 listings"));

        s.set_filter(FilterSpec {
            price_min: Some(1000.0),
            ..Default::default()
        });
        assert!(s.visible().is_empty());
        assert!(s.summary().price.is_none());
        assert!(s.status_message.unwrap().starts_with("No listings match"));
    }

    #[test]
    fn estimate_without_dataset_or_rows_fails() {
        let empty = Session::default();
        assert!(empty.estimate(2, 1, RoomType::EntireHome).is_err());
        assert!(empty.options().is_none());

        let mut s = session();
        s.set_filter(FilterSpec {
            room_type: Some("Hotel room".into()),
            ..Default::default()
        });
        assert!(matches!(
            s.estimate(2, 1, RoomType::HotelRoom),
            Err(InsightsError::Estimator(_))
        ));
    }
}
