use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use log::{debug, warn};
use parquet::arrow::ArrowWriter;

use super::model::{Listing, ListingDataset, CLEANED_COLUMNS};
use super::DataFormat;
use crate::error::{InsightsError, Result};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Persist a cleaned dataset, replacing whatever is at `path`.
pub fn write_file(path: &Path, dataset: &ListingDataset) -> Result<()> {
    let rows: Vec<&Listing> = dataset.listings.iter().collect();
    write_listings(path, &rows)
}

/// Persist a selection of listings. Format by extension.
///
/// The data is written to a sibling temporary file and renamed into place,
/// so a failure never leaves a truncated file at `path`.
pub fn write_listings(path: &Path, listings: &[&Listing]) -> Result<()> {
    let format = DataFormat::from_path(path)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| InsightsError::io(parent, e))?;
    }

    let tmp = temporary_path(path);
    let written = File::create(&tmp)
        .map_err(|e| InsightsError::io(&tmp, e))
        .and_then(|file| match format {
            DataFormat::Csv => write_csv(file, listings),
            DataFormat::Json => write_json(file, listings),
            DataFormat::Parquet => write_parquet(file, listings),
        })
        .and_then(|()| fs::rename(&tmp, path).map_err(|e| InsightsError::io(path, e)));

    if written.is_err() && tmp.exists() {
        if let Err(e) = fs::remove_file(&tmp) {
            warn!("could not remove {}: {e}", tmp.display());
        }
    }
    written?;
    debug!("wrote {} listings to {}", listings.len(), path.display());
    Ok(())
}

fn temporary_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

// ---------------------------------------------------------------------------
// CSV / JSON writers
// ---------------------------------------------------------------------------

/// The header row is always written, so an empty selection still yields a
/// loadable file.
fn write_csv(file: File, listings: &[&Listing]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(BufWriter::new(file));
    writer.write_record(CLEANED_COLUMNS)?;
    for listing in listings {
        writer.serialize(listing)?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

fn write_json(file: File, listings: &[&Listing]) -> Result<()> {
    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, listings)?;
    out.flush().map_err(serde_json::Error::io)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Arrow batch / Parquet writer
// ---------------------------------------------------------------------------

fn text_column<'a>(listings: &[&'a Listing], f: impl Fn(&'a Listing) -> &'a str) -> ArrayRef {
    Arc::new(StringArray::from(listings.iter().map(|&l| f(l)).collect::<Vec<_>>()))
}

fn count_column(listings: &[&Listing], f: impl Fn(&Listing) -> u32) -> ArrayRef {
    Arc::new(Int64Array::from(
        listings.iter().map(|l| f(l) as i64).collect::<Vec<_>>(),
    ))
}

fn float_column(listings: &[&Listing], f: impl Fn(&Listing) -> Option<f64>) -> ArrayRef {
    Arc::new(Float64Array::from(
        listings.iter().map(|l| f(l)).collect::<Vec<_>>(),
    ))
}

fn parquet_schema() -> Schema {
    let fields = CLEANED_COLUMNS.iter().map(|name| {
        let (data_type, nullable) = match *name {
            "host_is_superhost" => (DataType::Boolean, false),
            "latitude" | "longitude" | "review_scores_rating" => (DataType::Float64, true),
            "bathrooms" | "price" | "reviews_per_month" => (DataType::Float64, false),
            "host_listings_count" | "accommodates" | "bedrooms" | "beds" | "minimum_nights"
            | "number_of_reviews" | "availability_365" => (DataType::Int64, false),
            _ => (DataType::Utf8, false),
        };
        Field::new(*name, data_type, nullable)
    });
    Schema::new(fields.collect::<Vec<_>>())
}

/// Arrow view of a selection, columns as in `CLEANED_COLUMNS`.
pub fn record_batch(listings: &[&Listing]) -> Result<RecordBatch> {
    let schema = Arc::new(parquet_schema());

    // Same order as CLEANED_COLUMNS.
    let columns: Vec<ArrayRef> = vec![
        text_column(listings, |l| l.id.as_str()),
        text_column(listings, |l| l.name.as_str()),
        text_column(listings, |l| l.host_id.as_str()),
        text_column(listings, |l| l.host_name.as_str()),
        Arc::new(BooleanArray::from(
            listings.iter().map(|l| l.host_is_superhost).collect::<Vec<_>>(),
        )),
        count_column(listings, |l| l.host_listings_count),
        text_column(listings, |l| l.host_type.as_str()),
        text_column(listings, |l| l.neighbourhood_group.as_str()),
        text_column(listings, |l| l.neighbourhood.as_str()),
        float_column(listings, |l| l.latitude),
        float_column(listings, |l| l.longitude),
        text_column(listings, |l| l.property_type.as_str()),
        text_column(listings, |l| l.room_type.as_str()),
        count_column(listings, |l| l.accommodates),
        float_column(listings, |l| Some(l.bathrooms)),
        count_column(listings, |l| l.bedrooms),
        count_column(listings, |l| l.beds),
        float_column(listings, |l| Some(l.price)),
        count_column(listings, |l| l.minimum_nights),
        count_column(listings, |l| l.number_of_reviews),
        float_column(listings, |l| Some(l.reviews_per_month)),
        float_column(listings, |l| l.review_scores_rating),
        count_column(listings, |l| l.availability_365),
    ];

    Ok(RecordBatch::try_new(schema, columns)?)
}

fn write_parquet(file: File, listings: &[&Listing]) -> Result<()> {
    let batch = record_batch(listings)?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}
