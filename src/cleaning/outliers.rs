use serde::{Deserialize, Serialize};

use super::report::CleaningReport;
use crate::data::model::Listing;

/// Upper bounds beyond which a listing is considered an outlier.
/// `None` disables a cap; all caps are disabled by default.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlierCaps {
    pub price: Option<f64>,
    pub bathrooms: Option<f64>,
    pub bedrooms: Option<f64>,
    pub beds: Option<f64>,
    pub reviews_per_month: Option<f64>,
    pub minimum_nights: Option<f64>,
}

impl OutlierCaps {
    /// Caps that keep charts readable: extreme prices and property sizes out.
    pub fn visualization() -> Self {
        Self {
            price: Some(1500.0),
            bathrooms: Some(10.0),
            bedrooms: Some(10.0),
            beds: Some(10.0),
            reviews_per_month: Some(30.0),
            minimum_nights: Some(120.0),
        }
    }

    pub fn is_enabled(&self) -> bool {
        *self != OutlierCaps::default()
    }

    /// First column of `listing` exceeding its cap.
    pub fn exceeded(&self, listing: &Listing) -> Option<&'static str> {
        let checks = [
            ("price", self.price, listing.price),
            ("bathrooms", self.bathrooms, listing.bathrooms),
            ("bedrooms", self.bedrooms, listing.bedrooms as f64),
            ("beds", self.beds, listing.beds as f64),
            ("reviews_per_month", self.reviews_per_month, listing.reviews_per_month),
            ("minimum_nights", self.minimum_nights, listing.minimum_nights as f64),
        ];
        checks
            .into_iter()
            .find(|(_, cap, value)| cap.is_some_and(|c| *value > c))
            .map(|(column, _, _)| column)
    }
}

/// Step 6: drop listings above any enabled cap.
pub fn trim_outliers(
    listings: Vec<Listing>,
    caps: &OutlierCaps,
    report: &mut CleaningReport,
) -> Vec<Listing> {
    if !caps.is_enabled() {
        return listings;
    }
    listings
        .into_iter()
        .filter(|l| match caps.exceeded(l) {
            Some(column) => {
                report.record_outlier(column);
                false
            }
            None => true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::listing;
    use crate::data::model::RoomType;

    #[test]
    fn disabled_caps_keep_everything() {
        let listings = vec![listing("1", 99_999.0, RoomType::EntireHome)];
        let mut report = CleaningReport::default();
        let kept = trim_outliers(listings, &OutlierCaps::default(), &mut report);
        assert_eq!(kept.len(), 1);
        assert!(report.dropped_outliers.is_empty());
    }

    #[test]
    fn visualization_caps_drop_extremes_and_tally_first_column() {
        let mut big = listing("2", 2000.0, RoomType::EntireHome);
        big.bedrooms = 12;
        let mut party = listing("3", 300.0, RoomType::EntireHome);
        party.beds = 11;
        let at_cap = listing("4", 1500.0, RoomType::EntireHome);
        let listings = vec![listing("1", 80.0, RoomType::PrivateRoom), big, party, at_cap];

        let mut report = CleaningReport::default();
        let kept = trim_outliers(listings, &OutlierCaps::visualization(), &mut report);

        let ids: Vec<&str> = kept.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "4"]);
        assert_eq!(report.dropped_outliers["price"], 1);
        assert_eq!(report.dropped_outliers["beds"], 1);
        assert!(!report.dropped_outliers.contains_key("bedrooms"));
    }
}
