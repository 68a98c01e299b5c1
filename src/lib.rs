//! Airbnb listings insights: a cleaning pipeline that turns a raw listings
//! export into a typed dataset, and a query layer that filters and
//! aggregates that dataset.
//!
//! ```text
//!   raw export ──► cleaning ──► cleaned file ──► data::loader
//!                                                    │
//!                                  FilterSpec ──► query ──► Summary / Estimate
//! ```

pub mod cleaning;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod query;
pub mod state;

pub use cleaning::{CleaningPipeline, CleaningPolicy, CleaningReport};
pub use config::Config;
pub use data::filter::FilterSpec;
pub use data::model::{HostType, Listing, ListingDataset, RoomType};
pub use error::{InsightsError, Result};
pub use query::{run_query, QueryResult, Summary};
pub use state::Session;
