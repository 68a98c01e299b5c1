//! Output formatting for CLI commands.

use std::fmt::Write as _;

use arrow::util::pretty::pretty_format_batches;
use serde::Serialize;

use crate::cleaning::CleaningReport;
use crate::cli::args::{InsightsArgs, OutputFormat};
use crate::data::filter::FilterSpec;
use crate::data::model::Listing;
use crate::data::writer::record_batch;
use crate::error::Result;
use crate::query::{Estimate, FilterOptions, Summary};

const NO_DATA: &str = "no data";

/// Result of the `clean` command.
#[derive(Debug, Serialize)]
pub struct CleanOutput {
    pub input: String,
    pub output: String,
    pub report: CleaningReport,
}

/// Result of the `query` command.
#[derive(Debug, Serialize)]
pub struct QueryOutput<'a> {
    pub filter: FilterSpec,
    pub summary: Summary,
    /// The first `--show-rows` matches.
    pub listings: Vec<&'a Listing>,
    pub exported_to: Option<String>,
}

/// Result of the `estimate` command.
#[derive(Debug, Serialize)]
pub struct EstimateOutput {
    pub filter: FilterSpec,
    pub estimate: Estimate,
}

/// Print `result` as JSON, or as the text `human` renders.
pub fn output_result<T: Serialize>(
    result: &T,
    args: &InsightsArgs,
    human: impl FnOnce(&T) -> Result<String>,
) -> Result<()> {
    match args.output_format {
        OutputFormat::Json => {
            let text = if args.pretty {
                serde_json::to_string_pretty(result)?
            } else {
                serde_json::to_string(result)?
            };
            println!("{text}");
        }
        OutputFormat::Human => print!("{}", human(result)?),
    }
    Ok(())
}

fn or_no_data(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{v:.decimals$}"),
        None => NO_DATA.to_string(),
    }
}

pub fn render_clean(out: &CleanOutput) -> Result<String> {
    let r = &out.report;
    let mut s = String::new();
    writeln!(s, "Cleaned {} -> {}", out.input, out.output).ok();
    writeln!(s, "  rows read:               {}", r.rows_read).ok();
    writeln!(s, "  rows kept:               {}", r.rows_kept).ok();
    writeln!(s, "  missing id:              {}", r.dropped_missing_id).ok();
    writeln!(s, "  unparseable price:       {}", r.dropped_unparseable_price).ok();
    writeln!(s, "  negative price:          {}", r.dropped_negative_price).ok();
    writeln!(s, "  invalid room type:       {}", r.dropped_invalid_room_type).ok();
    for (column, n) in &r.dropped_outliers {
        writeln!(s, "  outlier ({column}): {n}").ok();
    }
    if !r.imputed.is_empty() {
        writeln!(s, "  imputed:").ok();
        for (column, n) in &r.imputed {
            writeln!(s, "    {column:<22} {n}").ok();
        }
    }
    if !r.dropped_columns.is_empty() {
        writeln!(s, "  dropped columns: {}", r.dropped_columns.join(", ")).ok();
    }
    Ok(s)
}

pub fn render_summary(summary: &Summary) -> String {
    let mut s = String::new();
    writeln!(
        s,
        "Listings:            {} of {}",
        summary.count, summary.total_listings
    )
    .ok();
    if summary.is_empty() {
        writeln!(
            s,
            "No listings match the selected filters. Please adjust your filters."
        )
        .ok();
    }

    let price = match &summary.price {
        Some(p) => format!(
            "mean ${:.2}, median ${:.2}, range ${:.2} - ${:.2}",
            p.mean, p.median, p.min, p.max
        ),
        None => NO_DATA.to_string(),
    };
    writeln!(s, "Price:               {price}").ok();
    writeln!(s, "Mean rating:         {}", or_no_data(summary.mean_rating, 1)).ok();
    writeln!(s, "Superhosts:          {}", summary.superhost_count).ok();
    writeln!(
        s,
        "Top neighbourhood:   {}",
        summary.top_neighbourhood.as_deref().unwrap_or(NO_DATA)
    )
    .ok();
    writeln!(
        s,
        "Median availability: {}",
        or_no_data(summary.median_availability, 0)
    )
    .ok();

    if !summary.room_type_distribution.is_empty() {
        writeln!(s, "\nRoom types:").ok();
        for (rt, n) in &summary.room_type_distribution {
            writeln!(s, "  {:<18} {n}", rt.as_str()).ok();
        }
    }
    if !summary.host_type_distribution.is_empty() {
        writeln!(s, "\nHost types:").ok();
        for (ht, n) in &summary.host_type_distribution {
            writeln!(s, "  {:<18} {n}", ht.as_str()).ok();
        }
    }
    if !summary.listings_by_neighbourhood.is_empty() {
        writeln!(s, "\nListings by neighbourhood:").ok();
        for (name, n) in &summary.listings_by_neighbourhood {
            writeln!(s, "  {name:<28} {n}").ok();
        }
    }
    if !summary.mean_price_by_neighbourhood.is_empty() {
        writeln!(s, "\nMean price by neighbourhood:").ok();
        for (name, mean) in &summary.mean_price_by_neighbourhood {
            writeln!(s, "  {name:<28} ${mean:.2}").ok();
        }
    }
    if !summary.mean_reviews_by_property_type.is_empty() {
        writeln!(s, "\nMean reviews by property type:").ok();
        for (name, mean) in &summary.mean_reviews_by_property_type {
            writeln!(s, "  {name:<28} {mean:.1}").ok();
        }
    }
    s
}

pub fn render_query(out: &QueryOutput<'_>) -> Result<String> {
    let mut s = render_summary(&out.summary);
    if !out.listings.is_empty() {
        let batch = record_batch(&out.listings)?;
        writeln!(s, "\n{}", pretty_format_batches(&[batch])?).ok();
    }
    if let Some(path) = &out.exported_to {
        writeln!(s, "\nExported {} listings to {path}", out.summary.count).ok();
    }
    Ok(s)
}

pub fn render_options(options: &FilterOptions) -> Result<String> {
    let mut s = String::new();
    let mut list = |title: &str, values: &[String]| {
        writeln!(s, "{title}:").ok();
        for v in values {
            writeln!(s, "  {v}").ok();
        }
    };
    list("Neighbourhood groups", &options.neighbourhood_groups);
    list("Neighbourhoods", &options.neighbourhoods);
    list("Room types", &options.room_types);
    list("Host types", &options.host_types);
    let range = match (options.price_min, options.price_max) {
        (Some(lo), Some(hi)) => format!("${lo:.2} - ${hi:.2}"),
        _ => NO_DATA.to_string(),
    };
    writeln!(s, "Price range: {range}").ok();
    Ok(s)
}

pub fn render_estimate(out: &EstimateOutput) -> Result<String> {
    let e = &out.estimate;
    Ok(format!(
        "Estimated price for {} guests, {} bedrooms, {}: ${:.2}/night\n(fit on {} listings)\n",
        e.guests, e.bedrooms, e.room_type, e.price, e.training_rows
    ))
}
