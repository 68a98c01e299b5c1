//! Command line argument parsing using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::CONFIG_PATH_ENV;
use crate::data::filter::{FilterSpec, Selection};
use crate::data::model::RoomType;

/// Clean Airbnb listings exports and query the cleaned data.
#[derive(Parser, Debug, Clone)]
#[command(name = "airbnb-insights")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct InsightsArgs {
    /// Verbosity level (repeat for more: -v warn, -vv info, -vvv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// TOML config file with paths and cleaning policy
    #[arg(short, long, env = CONFIG_PATH_ENV, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl InsightsArgs {
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Log filter matching the requested verbosity.
    pub fn log_level(&self) -> &'static str {
        match self.verbosity() {
            0 => "error",
            1 => "warn",
            2 => "info",
            _ => "debug",
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Clean a raw listings export into the analysis schema
    Clean(CleanArgs),

    /// Filter a cleaned dataset and summarize the selection
    Query(QueryArgs),

    /// List the values available to each filter
    Options(OptionsArgs),

    /// Estimate a nightly price from listings matching a filter
    Estimate(EstimateArgs),

    /// Export the price model's feature matrix as CSV
    Features(FeaturesArgs),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Clean(_) => "clean",
            Command::Query(_) => "query",
            Command::Options(_) => "options",
            Command::Estimate(_) => "estimate",
            Command::Features(_) => "features",
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct CleanArgs {
    /// Raw export to read (defaults to paths.raw_input)
    #[arg(short, long, value_name = "RAW_FILE")]
    pub input: Option<PathBuf>,

    /// Cleaned file to write; extension picks csv, json or parquet
    /// (defaults to paths.cleaned_output)
    #[arg(short, long, value_name = "CLEANED_FILE")]
    pub output: Option<PathBuf>,

    /// Drop rows beyond the visualization caps (price 1500, 10 rooms, ...)
    #[arg(long)]
    pub trim_outliers: bool,
}

/// Filter flags shared by every command reading a cleaned dataset.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Cleaned dataset (defaults to paths.cleaned_output)
    #[arg(short, long, value_name = "CLEANED_FILE")]
    pub data: Option<PathBuf>,

    /// JSON file holding a filter; flags below override its fields
    #[arg(long, value_name = "FILTER_FILE")]
    pub filter: Option<PathBuf>,

    /// Repeat to accept any of several groups
    #[arg(long, value_name = "GROUP")]
    pub neighbourhood_group: Vec<String>,

    #[arg(long, value_name = "NEIGHBOURHOOD")]
    pub neighbourhood: Vec<String>,

    #[arg(long)]
    pub price_min: Option<f64>,

    #[arg(long)]
    pub price_max: Option<f64>,

    /// Room type label, e.g. "Entire home/apt" (repeatable)
    #[arg(long, value_name = "ROOM_TYPE")]
    pub room_type: Vec<String>,

    /// Host type label: Individual, Professional or "Big Company" (repeatable)
    #[arg(long, value_name = "HOST_TYPE")]
    pub host_type: Vec<String>,

    /// Keep superhosts only; `--superhost-only false` clears a filter file's setting
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    pub superhost_only: Option<bool>,
}

impl FilterArgs {
    /// The filter described by the flags alone.
    pub fn to_spec(&self) -> FilterSpec {
        FilterSpec {
            neighbourhood_group: Selection::from_values(self.neighbourhood_group.clone()),
            neighbourhood: Selection::from_values(self.neighbourhood.clone()),
            price_min: self.price_min,
            price_max: self.price_max,
            room_type: Selection::from_values(self.room_type.clone()),
            host_type: Selection::from_values(self.host_type.clone()),
            superhost_only: self.superhost_only.unwrap_or(false),
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct QueryArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Print up to this many matching listings
    #[arg(long, value_name = "N", default_value = "0")]
    pub show_rows: usize,

    /// Write the matching listings to a file (csv, json or parquet)
    #[arg(long, value_name = "FILE")]
    pub export: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct OptionsArgs {
    /// Cleaned dataset (defaults to paths.cleaned_output)
    #[arg(short, long, value_name = "CLEANED_FILE")]
    pub data: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct EstimateArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    #[arg(long, default_value = "2")]
    pub guests: u32,

    #[arg(long, default_value = "1")]
    pub bedrooms: u32,

    /// Room type to price, e.g. "Private room"
    #[arg(long = "for-room-type", value_name = "ROOM_TYPE", default_value = "Entire home/apt")]
    pub for_room_type: RoomType,
}

#[derive(Parser, Debug, Clone)]
pub struct FeaturesArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// CSV file to write (stdout when omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
