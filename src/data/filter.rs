use serde::{Deserialize, Serialize};

use super::model::{Listing, ListingDataset};

// ---------------------------------------------------------------------------
// Filter predicate: which listings the user wants to see
// ---------------------------------------------------------------------------

/// One label, or several of which any may match (a multiselect).
///
/// Deserializes from either a JSON string or an array of strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Selection {
    One(String),
    Any(Vec<String>),
}

impl Selection {
    /// Build from repeated values: `None` when empty, `One` for a single value.
    pub fn from_values(mut values: Vec<String>) -> Option<Self> {
        match values.len() {
            0 => None,
            1 => values.pop().map(Selection::One),
            _ => Some(Selection::Any(values)),
        }
    }

    pub fn labels(&self) -> &[String] {
        match self {
            Selection::One(label) => std::slice::from_ref(label),
            Selection::Any(labels) => labels,
        }
    }

    fn contains(&self, actual: &str, ignore_case: bool) -> bool {
        self.labels().iter().any(|w| {
            if ignore_case {
                w.trim().eq_ignore_ascii_case(actual)
            } else {
                w == actual
            }
        })
    }
}

impl From<&str> for Selection {
    fn from(label: &str) -> Self {
        Selection::One(label.to_string())
    }
}

impl From<String> for Selection {
    fn from(label: String) -> Self {
        Selection::One(label)
    }
}

/// User-chosen criteria. Every `None` criterion matches everything; the
/// set criteria are combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSpec {
    #[serde(alias = "neighborhood_group")]
    pub neighbourhood_group: Option<Selection>,
    #[serde(alias = "neighborhood")]
    pub neighbourhood: Option<Selection>,
    /// Inclusive lower price bound.
    pub price_min: Option<f64>,
    /// Inclusive upper price bound.
    pub price_max: Option<f64>,
    /// Compared case-insensitively against the export label, e.g. `"Private room"`.
    pub room_type: Option<Selection>,
    /// Compared case-insensitively against the host type label, e.g. `"Big Company"`.
    pub host_type: Option<Selection>,
    pub superhost_only: bool,
}

impl FilterSpec {
    /// Whether no criterion is set.
    pub fn is_unrestricted(&self) -> bool {
        *self == FilterSpec::default()
    }

    /// Overlay the criteria set in `other` on top of `self`.
    ///
    /// `superhost_only` is OR-ed, since `false` is also the unset value;
    /// callers that can tell "unset" from "false" assign it afterwards.
    pub fn merged_with(mut self, other: FilterSpec) -> FilterSpec {
        self.neighbourhood_group = other.neighbourhood_group.or(self.neighbourhood_group);
        self.neighbourhood = other.neighbourhood.or(self.neighbourhood);
        self.price_min = other.price_min.or(self.price_min);
        self.price_max = other.price_max.or(self.price_max);
        self.room_type = other.room_type.or(self.room_type);
        self.host_type = other.host_type.or(self.host_type);
        self.superhost_only |= other.superhost_only;
        self
    }

    /// Whether a single listing passes every set criterion.
    ///
    /// A label that matches no listing (an unknown room type, say) simply
    /// excludes everything; it is not an error.
    pub fn matches(&self, listing: &Listing) -> bool {
        fn label_ok(wanted: &Option<Selection>, actual: &str, ignore_case: bool) -> bool {
            wanted
                .as_ref()
                .map_or(true, |w| w.contains(actual, ignore_case))
        }

        // Free-text labels match exactly; the two enum labels the same way
        // their `FromStr` parses them.
        label_ok(&self.neighbourhood_group, &listing.neighbourhood_group, false)
            && label_ok(&self.neighbourhood, &listing.neighbourhood, false)
            && label_ok(&self.room_type, listing.room_type.as_str(), true)
            && label_ok(&self.host_type, listing.host_type.as_str(), true)
            && self.price_min.map_or(true, |min| listing.price >= min)
            && self.price_max.map_or(true, |max| listing.price <= max)
            && (!self.superhost_only || listing.host_is_superhost)
    }
}

/// Return indices of listings that pass the filter, in dataset order.
pub fn filtered_indices(dataset: &ListingDataset, filter: &FilterSpec) -> Vec<usize> {
    dataset
        .listings
        .iter()
        .enumerate()
        .filter(|(_, listing)| filter.matches(listing))
        .map(|(i, _)| i)
        .collect()
}

/// Borrow the listings that pass the filter.
pub fn filter_listings<'a>(dataset: &'a ListingDataset, filter: &FilterSpec) -> Vec<&'a Listing> {
    dataset
        .listings
        .iter()
        .filter(|listing| filter.matches(listing))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::listing;
    use crate::data::model::{HostType, RoomType};

    fn dataset() -> ListingDataset {
        let mut b = listing("b", 150.0, RoomType::PrivateRoom);
        b.host_is_superhost = true;
        b.neighbourhood = "Harbour".to_string();
        let mut c = listing("c", 250.0, RoomType::EntireHome);
        c.host_type = HostType::BigCompany;
        c.neighbourhood_group = "Coast".to_string();
        let d = listing("d", 100.0, RoomType::SharedRoom);
        let e = listing("e", 200.0, RoomType::EntireHome);
        ListingDataset::from_listings(vec![listing("a", 40.0, RoomType::EntireHome), b, c, d, e])
    }

    fn ids(ds: &ListingDataset, f: &FilterSpec) -> Vec<String> {
        filter_listings(ds, f).iter().map(|l| l.id.clone()).collect()
    }

    #[test]
    fn unrestricted_filter_returns_everything_in_order() {
        let ds = dataset();
        let f = FilterSpec::default();
        assert!(f.is_unrestricted());
        assert_eq!(filtered_indices(&ds, &f), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn price_bounds_are_inclusive() {
        let ds = dataset();
        let f = FilterSpec {
            price_min: Some(100.0),
            price_max: Some(200.0),
            ..Default::default()
        };
        assert_eq!(ids(&ds, &f), vec!["b", "d", "e"]);
        assert!(filter_listings(&ds, &f)
            .iter()
            .all(|l| (100.0..=200.0).contains(&l.price)));
    }

    #[test]
    fn criteria_combine_conjunctively() {
        let ds = dataset();
        let f = FilterSpec {
            room_type: Some("Entire home/apt".into()),
            neighbourhood_group: Some("Coast".into()),
            ..Default::default()
        };
        assert_eq!(ids(&ds, &f), vec!["c"]);

        let f = FilterSpec {
            host_type: Some("Big Company".into()),
            ..Default::default()
        };
        assert_eq!(ids(&ds, &f), vec!["c"]);
    }

    #[test]
    fn superhost_only_and_empty_matches() {
        let ds = dataset();
        let f = FilterSpec {
            superhost_only: true,
            ..Default::default()
        };
        assert_eq!(ids(&ds, &f), vec!["b"]);

        let none = FilterSpec {
            room_type: Some("Hotel room".into()),
            superhost_only: true,
            ..Default::default()
        };
        assert!(filtered_indices(&ds, &none).is_empty());
    }

    #[test]
    fn unknown_labels_and_inverted_ranges_match_nothing() {
        let ds = dataset();
        let unknown = FilterSpec {
            room_type: Some("Castle".into()),
            ..Default::default()
        };
        assert!(filtered_indices(&ds, &unknown).is_empty());

        let inverted = FilterSpec {
            price_min: Some(300.0),
            price_max: Some(100.0),
            ..Default::default()
        };
        assert!(filtered_indices(&ds, &inverted).is_empty());
    }

    #[test]
    fn merge_prefers_the_overlay() {
        let base = FilterSpec {
            neighbourhood: Some("Old Town".into()),
            price_max: Some(500.0),
            ..Default::default()
        };
        let overlay = FilterSpec {
            price_max: Some(200.0),
            superhost_only: true,
            ..Default::default()
        };
        let merged = base.merged_with(overlay);
        assert_eq!(merged.neighbourhood, Some("Old Town".into()));
        assert_eq!(merged.price_max, Some(200.0));
        assert!(merged.superhost_only);
    }

    #[test]
    fn json_filter_accepts_either_spelling() {
        let f: FilterSpec = serde_json::from_str(
            r#"{"neighborhood_group": "Coast", "room_type": "Entire home/apt"}"#,
        )
        .unwrap();
        assert_eq!(f.neighbourhood_group, Some("Coast".into()));
        assert!(!f.superhost_only);
        assert_eq!(ids(&dataset(), &f), vec!["c"]);
    }

    #[test]
    fn enum_labels_ignore_case() {
        let ds = dataset();
        let f = FilterSpec {
            room_type: Some("private ROOM".into()),
            ..Default::default()
        };
        assert_eq!(ids(&ds, &f), vec!["b"]);

        let f = FilterSpec {
            host_type: Some("big company".into()),
            ..Default::default()
        };
        assert_eq!(ids(&ds, &f), vec!["c"]);

        let f = FilterSpec {
            neighbourhood: Some("harbour".into()),
            ..Default::default()
        };
        assert!(filtered_indices(&ds, &f).is_empty());
    }

    #[test]
    fn selections_match_any_of_their_labels() {
        let ds = dataset();
        let f = FilterSpec {
            room_type: Selection::from_values(vec![
                "Shared room".to_string(),
                "Private room".to_string(),
            ]),
            ..Default::default()
        };
        assert_eq!(ids(&ds, &f), vec!["b", "d"]);

        let f: FilterSpec =
            serde_json::from_str(r#"{"neighbourhood_group": ["Coast", "Nowhere"]}"#).unwrap();
        assert_eq!(ids(&ds, &f), vec!["c"]);
        assert_eq!(Selection::from_values(Vec::new()), None);
        assert_eq!(
            Selection::from_values(vec!["Coast".to_string()]),
            Some(Selection::One("Coast".to_string()))
        );
    }
}
