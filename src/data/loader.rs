use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use arrow::array::{
    Array, ArrayRef, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
    StringArray, UInt32Array, UInt64Array,
};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use log::debug;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::{Listing, ListingDataset};
use super::DataFormat;
use crate::cleaning::RawTable;
use crate::error::{InsightsError, Result};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| InsightsError::io(path, e))
}

/// Read a raw listings export (comma-separated, header row required).
pub fn load_raw(path: &Path) -> Result<RawTable> {
    let file = open(path)?;
    let table = RawTable::from_reader(BufReader::new(file))?;
    debug!(
        "read {} raw rows with {} columns from {}",
        table.len(),
        table.headers.len(),
        path.display()
    );
    Ok(table)
}

/// Load a cleaned dataset. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – canonical column names, one listing per row
/// * `.json`    – `[{ "id": "...", "price": 80.0, ... }, ...]`
/// * `.parquet` – one column per canonical field
pub fn load_file(path: &Path) -> Result<ListingDataset> {
    let listings = match DataFormat::from_path(path)? {
        DataFormat::Csv => load_csv(path)?,
        DataFormat::Json => load_json(path)?,
        DataFormat::Parquet => load_parquet(path)?,
    };
    debug!("loaded {} cleaned listings from {}", listings.len(), path.display());
    Ok(ListingDataset::from_listings(listings))
}

// ---------------------------------------------------------------------------
// CSV / JSON loaders
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Vec<Listing>> {
    let mut reader = csv::Reader::from_reader(BufReader::new(open(path)?));
    let listings = reader
        .deserialize::<Listing>()
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(listings)
}

fn load_json(path: &Path) -> Result<Vec<Listing>> {
    let listings: Vec<Listing> = serde_json::from_reader(BufReader::new(open(path)?))?;
    Ok(listings)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per cleaned field.
///
/// Integer columns may be stored as any Int32/Int64/UInt32/UInt64 and float
/// columns as Float32/Float64, so files re-written by Pandas or Polars load too.
fn load_parquet(path: &Path) -> Result<Vec<Listing>> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;
    let reader = builder.build()?;

    let mut listings = Vec::new();
    for batch in reader {
        let batch = batch?;
        let columns = ParquetColumns::locate(&batch)?;
        for row in 0..batch.num_rows() {
            listings.push(columns.listing(row)?);
        }
    }
    Ok(listings)
}

struct ParquetColumns<'a> {
    batch: &'a RecordBatch,
}

impl<'a> ParquetColumns<'a> {
    fn locate(batch: &'a RecordBatch) -> Result<Self> {
        for name in super::model::CLEANED_COLUMNS {
            if batch.column_by_name(name).is_none() {
                return Err(InsightsError::schema(format!(
                    "parquet file missing '{name}' column"
                )));
            }
        }
        Ok(Self { batch })
    }

    fn column(&self, name: &str) -> Result<&'a ArrayRef> {
        self.batch
            .column_by_name(name)
            .ok_or_else(|| InsightsError::schema(format!("parquet file missing '{name}' column")))
    }

    fn text(&self, name: &str, row: usize) -> Result<String> {
        let col = self.column(name)?;
        if col.is_null(row) {
            return Ok(String::new());
        }
        match col.data_type() {
            DataType::Utf8 => Ok(col
                .as_any()
                .downcast_ref::<StringArray>()
                .map(|a| a.value(row).to_string())
                .unwrap_or_default()),
            DataType::LargeUtf8 => Ok(col.as_string::<i64>().value(row).to_string()),
            other => Err(InsightsError::schema(format!(
                "column '{name}' is {other:?}, expected a string column"
            ))),
        }
    }

    fn float(&self, name: &str, row: usize) -> Result<Option<f64>> {
        let col = self.column(name)?;
        if col.is_null(row) {
            return Ok(None);
        }
        let value = match col.data_type() {
            DataType::Float64 => downcast::<Float64Array>(col, name)?.value(row),
            DataType::Float32 => downcast::<Float32Array>(col, name)?.value(row) as f64,
            DataType::Int64 => downcast::<Int64Array>(col, name)?.value(row) as f64,
            DataType::Int32 => downcast::<Int32Array>(col, name)?.value(row) as f64,
            DataType::UInt32 => downcast::<UInt32Array>(col, name)?.value(row) as f64,
            DataType::UInt64 => downcast::<UInt64Array>(col, name)?.value(row) as f64,
            other => {
                return Err(InsightsError::schema(format!(
                    "column '{name}' is {other:?}, expected a numeric column"
                )))
            }
        };
        Ok(Some(value))
    }

    fn count(&self, name: &str, row: usize) -> Result<u32> {
        let value = self.float(name, row)?.unwrap_or(0.0);
        if value < 0.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
            return Err(InsightsError::schema(format!(
                "column '{name}' row {row}: {value} is not a count"
            )));
        }
        Ok(value as u32)
    }

    fn flag(&self, name: &str, row: usize) -> Result<bool> {
        let col = self.column(name)?;
        if col.is_null(row) {
            return Ok(false);
        }
        Ok(downcast::<BooleanArray>(col, name)?.value(row))
    }

    fn listing(&self, row: usize) -> Result<Listing> {
        let parse_err = |e: String| InsightsError::schema(format!("row {row}: {e}"));
        let price = self
            .float("price", row)?
            .ok_or_else(|| parse_err("null price".to_string()))?;

        Ok(Listing {
            id: self.text("id", row)?,
            name: self.text("name", row)?,
            host_id: self.text("host_id", row)?,
            host_name: self.text("host_name", row)?,
            host_is_superhost: self.flag("host_is_superhost", row)?,
            host_listings_count: self.count("host_listings_count", row)?,
            host_type: self.text("host_type", row)?.parse().map_err(parse_err)?,
            neighbourhood_group: self.text("neighbourhood_group", row)?,
            neighbourhood: self.text("neighbourhood", row)?,
            latitude: self.float("latitude", row)?,
            longitude: self.float("longitude", row)?,
            property_type: self.text("property_type", row)?,
            room_type: self.text("room_type", row)?.parse().map_err(parse_err)?,
            accommodates: self.count("accommodates", row)?,
            bathrooms: self.float("bathrooms", row)?.unwrap_or(0.0),
            bedrooms: self.count("bedrooms", row)?,
            beds: self.count("beds", row)?,
            price,
            minimum_nights: self.count("minimum_nights", row)?,
            number_of_reviews: self.count("number_of_reviews", row)?,
            reviews_per_month: self.float("reviews_per_month", row)?.unwrap_or(0.0),
            review_scores_rating: self.float("review_scores_rating", row)?,
            availability_365: self.count("availability_365", row)?,
        })
    }
}

fn downcast<'a, T: 'static>(col: &'a ArrayRef, name: &str) -> Result<&'a T> {
    col.as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| InsightsError::schema(format!("column '{name}' has an unexpected layout")))
}
