//! Cleaning pipeline: raw listings export → typed, host-classified dataset.
//!
//! Steps run in this order, each a separate function over the table:
//! ```text
//!   RawTable
//!      │  columns::normalize_columns   canonical headers, required check
//!      ▼
//!   RawTable
//!      │  draft::parse_listings        price + room type, drop bad rows
//!      ▼
//!   Vec<DraftListing>
//!      │  missing::impute_missing      medians, fixed defaults, sentinels
//!      │  host::assign_host_types      Individual / Professional / Big Company
//!      ▼
//!   Vec<DraftListing>
//!      │  coerce::coerce_all           final types, clipping
//!      │  outliers::trim_outliers      optional caps
//!      ▼
//!   ListingDataset ──► data::writer (persistence)
//! ```

pub mod coerce;
pub mod columns;
pub mod draft;
pub mod host;
pub mod missing;
pub mod outliers;
pub mod price;
pub mod report;
pub mod table;

use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::data::loader::load_raw;
use crate::data::model::ListingDataset;
use crate::data::writer::write_file;
use crate::error::Result;

pub use host::{classify_host, HostTypeThresholds};
pub use missing::{Impute, MissingValuePolicy};
pub use outliers::OutlierCaps;
pub use report::CleaningReport;
pub use table::RawTable;

/// Business rules applied by the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningPolicy {
    pub missing: MissingValuePolicy,
    pub host_types: HostTypeThresholds,
    pub outliers: OutlierCaps,
}

/// Run every cleaning step over an in-memory table.
pub fn clean_table(
    table: RawTable,
    policy: &CleaningPolicy,
) -> Result<(ListingDataset, CleaningReport)> {
    let mut report = CleaningReport {
        rows_read: table.len(),
        ..Default::default()
    };

    let table = columns::normalize_columns(table, &mut report)?;
    let mut drafts = draft::parse_listings(&table, &mut report);
    missing::impute_missing(&mut drafts, &policy.missing, &mut report);
    host::assign_host_types(&mut drafts, &policy.host_types);
    let listings = coerce::coerce_all(drafts, &policy.host_types);
    let listings = outliers::trim_outliers(listings, &policy.outliers, &mut report);

    report.rows_kept = listings.len();
    Ok((ListingDataset::from_listings(listings), report))
}

/// File-to-file cleaning with a fixed policy.
#[derive(Debug, Clone, Default)]
pub struct CleaningPipeline {
    policy: CleaningPolicy,
}

impl CleaningPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: CleaningPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &CleaningPolicy {
        &self.policy
    }

    /// Read and clean a raw export without persisting it.
    pub fn clean_file(&self, input: &Path) -> Result<(ListingDataset, CleaningReport)> {
        info!("reading raw listings from {}", input.display());
        let table = load_raw(input)?;
        clean_table(table, &self.policy)
    }

    /// Clean `input` and write the result to `output`, replacing any
    /// previous cleaned dataset. Nothing is written if reading or cleaning fails.
    pub fn run(&self, input: &Path, output: &Path) -> Result<CleaningReport> {
        let (dataset, report) = self.clean_file(input)?;
        report.log_summary();
        write_file(output, &dataset)?;
        info!("wrote {} listings to {}", dataset.len(), output.display());
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{HostType, RoomType};
    use crate::error::InsightsError;

    const RAW: &str = "\
id,name,host_id,host_name,host_is_superhost,host_total_listings_count,neighbourhood_cleansed,neighbourhood_group_cleansed,latitude,longitude,property_type,room_type,accommodates,bathrooms_text,bedrooms,beds,price,minimum_nights,number_of_reviews,reviews_per_month,review_scores_rating,availability_365,description
1,Sunny loft,10,Marta,t,1,Gràcia,Districte A,41.40,2.15,Entire loft,Entire home/apt,4,1 bath,2,2,\"$1,200.00\",2,30,1.2,95,120,Lovely
2,,11,Jordi,f,,Eixample,Districte B,41.39,2.16,Private room in flat,Private room,2,1 shared bath,,1,$80.00,1,0,,,300,Quiet
3,Broken,12,Pau,t,3,Eixample,Districte B,41.38,2.17,Room,Private room,1,Half-bath,1,1,N/A,1,0,,,10,x
4,Hotel,13,Chain,f,250,Sants,Districte C,41.37,2.14,Room in hotel,Hotel room,2,1 private bath,1,1,$150.00,1,500,31.5,88,365,y
";

    fn clean(policy: &CleaningPolicy) -> (ListingDataset, CleaningReport) {
        clean_table(RawTable::from_reader(RAW.as_bytes()).unwrap(), policy).unwrap()
    }

    #[test]
    fn formatted_price_and_single_listing_host() {
        let (ds, _) = clean(&CleaningPolicy::default());
        let first = &ds.listings[0];
        assert_eq!(first.price, 1200.0);
        assert_eq!(first.host_type, HostType::Individual);
        assert!(first.host_is_superhost);
        assert_eq!(first.neighbourhood, "Gràcia");
        assert_eq!(first.room_type, RoomType::EntireHome);
    }

    #[test]
    fn unparseable_price_is_dropped_and_counted() {
        let (ds, report) = clean(&CleaningPolicy::default());
        assert_eq!(report.rows_read, 4);
        assert_eq!(report.rows_kept, 3);
        assert_eq!(report.dropped_unparseable_price, 1);
        assert!(ds.listings.iter().all(|l| l.id != "3"));
        assert_eq!(report.dropped_columns, vec!["description"]);
    }

    #[test]
    fn imputes_missing_fields_from_surviving_rows() {
        let (ds, report) = clean(&CleaningPolicy::default());
        let second = &ds.listings[1];
        assert_eq!(second.name, "No name provided");
        assert_eq!(second.host_listings_count, 1);
        assert_eq!(second.host_type, HostType::Individual);
        // median of the bedrooms of rows 1 and 4
        assert_eq!(second.bedrooms, 2);
        assert_eq!(second.reviews_per_month, 0.0);
        assert_eq!(second.review_scores_rating, None);
        assert_eq!(report.imputed["bedrooms"], 1);
    }

    #[test]
    fn big_hosts_are_companies() {
        let (ds, _) = clean(&CleaningPolicy::default());
        assert_eq!(ds.listings[2].host_type, HostType::BigCompany);
    }

    #[test]
    fn visualization_caps_trim_outliers() {
        let policy = CleaningPolicy {
            outliers: OutlierCaps::visualization(),
            ..Default::default()
        };
        let (ds, report) = clean(&policy);
        let ids: Vec<&str> = ds.listings.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(report.dropped_outliers["reviews_per_month"], 1);
    }

    #[test]
    fn bad_bytes_and_short_rows_do_not_abort_cleaning() {
        let mut raw = b"id,name,room_type,neighbourhood,price\n".to_vec();
        raw.extend_from_slice(b"1,Caf\xE9 Loft,Private room,Gr\xE0cia,$60.00\n");
        raw.extend_from_slice(b"2,Plain,Entire home/apt,Sants,$90.00\n");
        let mut table = RawTable::from_reader(raw.as_slice()).unwrap();
        table.rows.push(vec!["3".into(), "Short".into()]);

        let (ds, report) = clean_table(table, &CleaningPolicy::default()).unwrap();
        assert_eq!(report.rows_read, 3);
        assert_eq!(report.dropped_unparseable_price, 1);
        let ids: Vec<&str> = ds.listings.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert!(ds.listings[0].name.starts_with("Caf"));
    }

    #[test]
    fn missing_input_file_is_an_io_error() {
        let err = CleaningPipeline::new()
            .clean_file(Path::new("/nonexistent/raw_listings.csv"))
            .unwrap_err();
        assert!(matches!(err, InsightsError::Io { .. }));
    }
}
