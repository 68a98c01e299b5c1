use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;

use super::price::{parse_price, PriceParse};
use super::report::CleaningReport;
use super::table::RawTable;
use crate::data::model::{HostType, RoomType};

/// First number in free text such as `"1.5 shared baths"`.
static LEADING_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+\.?\d*)").expect("valid number regex"));

/// A listing whose required fields are valid but whose optional fields may
/// still be missing. Produced by [`parse_listings`], completed by imputation
/// and host classification, finalized by coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftListing {
    pub id: String,
    pub name: Option<String>,
    pub host_id: Option<String>,
    pub host_name: Option<String>,
    pub host_is_superhost: Option<bool>,
    pub host_listings_count: Option<f64>,
    pub host_type: Option<HostType>,
    pub neighbourhood_group: Option<String>,
    pub neighbourhood: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub property_type: Option<String>,
    pub room_type: RoomType,
    pub accommodates: Option<f64>,
    pub bathrooms: Option<f64>,
    pub bedrooms: Option<f64>,
    pub beds: Option<f64>,
    pub price: f64,
    pub minimum_nights: Option<f64>,
    pub number_of_reviews: Option<f64>,
    pub reviews_per_month: Option<f64>,
    pub review_scores_rating: Option<f64>,
    pub availability_365: Option<f64>,
}

fn parse_number(cell: Option<&str>) -> Option<f64> {
    cell.and_then(|c| c.replace(',', "").parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

fn parse_bool(cell: Option<&str>) -> Option<bool> {
    match cell?.to_ascii_lowercase().as_str() {
        "t" | "true" | "1" | "yes" | "y" => Some(true),
        "f" | "false" | "0" | "no" | "n" => Some(false),
        _ => None,
    }
}

/// Leading number of a bathrooms cell; `"Half-bath"` has none.
pub fn extract_bathrooms(cell: &str) -> Option<f64> {
    LEADING_NUMBER
        .captures(cell)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Step 2: normalize prices and room types, dropping rows without a usable
/// value for either. Every other field is parsed leniently: a value that
/// does not parse is treated as missing and left for imputation.
pub fn parse_listings(table: &RawTable, report: &mut CleaningReport) -> Vec<DraftListing> {
    let col = |name: &str| table.column(name);
    let c_id = col("id");
    let c_price = col("price");
    let c_room = col("room_type");
    let c_name = col("name");
    let c_host_id = col("host_id");
    let c_host_name = col("host_name");
    let c_superhost = col("host_is_superhost");
    let c_listings = col("host_listings_count");
    let c_group = col("neighbourhood_group");
    let c_hood = col("neighbourhood");
    let c_lat = col("latitude");
    let c_lon = col("longitude");
    let c_property = col("property_type");
    let c_accommodates = col("accommodates");
    let c_bathrooms = col("bathrooms");
    let c_bedrooms = col("bedrooms");
    let c_beds = col("beds");
    let c_min_nights = col("minimum_nights");
    let c_reviews = col("number_of_reviews");
    let c_reviews_pm = col("reviews_per_month");
    let c_rating = col("review_scores_rating");
    let c_availability = col("availability_365");

    let text = |row: &[String], c: Option<usize>| table.cell(row, c).map(str::to_string);

    let mut drafts = Vec::with_capacity(table.len());
    for (row_no, row) in table.rows.iter().enumerate() {
        let Some(id) = table.cell(row, c_id) else {
            trace!("row {row_no}: no id");
            report.dropped_missing_id += 1;
            continue;
        };

        let price = match table.cell(row, c_price).map(parse_price) {
            Some(PriceParse::Valid(p)) => p,
            Some(PriceParse::Negative(p)) => {
                trace!("row {row_no}: negative price {p}");
                report.dropped_negative_price += 1;
                continue;
            }
            Some(PriceParse::Unparseable) | None => {
                trace!("row {row_no}: unparseable price");
                report.dropped_unparseable_price += 1;
                continue;
            }
        };

        let Some(room_type) = table.cell(row, c_room).and_then(|c| c.parse::<RoomType>().ok())
        else {
            trace!("row {row_no}: invalid room type");
            report.dropped_invalid_room_type += 1;
            continue;
        };

        drafts.push(DraftListing {
            id: id.to_string(),
            name: text(row, c_name),
            host_id: text(row, c_host_id),
            host_name: text(row, c_host_name),
            host_is_superhost: parse_bool(table.cell(row, c_superhost)),
            host_listings_count: parse_number(table.cell(row, c_listings)),
            host_type: None,
            neighbourhood_group: text(row, c_group),
            neighbourhood: text(row, c_hood),
            latitude: parse_number(table.cell(row, c_lat)),
            longitude: parse_number(table.cell(row, c_lon)),
            property_type: text(row, c_property),
            room_type,
            accommodates: parse_number(table.cell(row, c_accommodates)),
            bathrooms: table.cell(row, c_bathrooms).and_then(extract_bathrooms),
            bedrooms: parse_number(table.cell(row, c_bedrooms)),
            beds: parse_number(table.cell(row, c_beds)),
            price,
            minimum_nights: parse_number(table.cell(row, c_min_nights)),
            number_of_reviews: parse_number(table.cell(row, c_reviews)),
            reviews_per_month: parse_number(table.cell(row, c_reviews_pm)),
            review_scores_rating: parse_number(table.cell(row, c_rating)),
            availability_365: parse_number(table.cell(row, c_availability)),
        });
    }

    drafts
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A draft with only the required fields set.
    pub(crate) fn draft(id: &str, price: f64) -> DraftListing {
        DraftListing {
            id: id.to_string(),
            name: None,
            host_id: None,
            host_name: None,
            host_is_superhost: None,
            host_listings_count: None,
            host_type: None,
            neighbourhood_group: None,
            neighbourhood: None,
            latitude: None,
            longitude: None,
            property_type: None,
            room_type: RoomType::EntireHome,
            accommodates: None,
            bathrooms: None,
            bedrooms: None,
            beds: None,
            price,
            minimum_nights: None,
            number_of_reviews: None,
            reviews_per_month: None,
            review_scores_rating: None,
            availability_365: None,
        }
    }

    fn table(csv: &str) -> RawTable {
        RawTable::from_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn parses_formatted_price_and_room_type() {
        let t = table(
            "id,price,room_type,neighbourhood,host_is_superhost,bathrooms\n\
             1,\"$1,200.00\",Entire home/apt,Eixample,t,1.5 shared baths\n",
        );
        let mut report = CleaningReport::default();
        let drafts = parse_listings(&t, &mut report);

        assert_eq!(drafts.len(), 1);
        let d = &drafts[0];
        assert_eq!(d.price, 1200.0);
        assert_eq!(d.room_type, RoomType::EntireHome);
        assert_eq!(d.host_is_superhost, Some(true));
        assert_eq!(d.bathrooms, Some(1.5));
        assert_eq!(d.neighbourhood.as_deref(), Some("Eixample"));
        assert_eq!(d.bedrooms, None);
    }

    #[test]
    fn drops_and_tallies_unusable_rows() {
        let t = table(
            "id,price,room_type,neighbourhood\n\
             1,N/A,Private room,A\n\
             2,-$5,Private room,A\n\
             3,$5,Treehouse,A\n\
             ,$5,Private room,A\n\
             5,$5,Private room,A\n",
        );
        let mut report = CleaningReport::default();
        let drafts = parse_listings(&t, &mut report);

        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].id, "5");
        assert_eq!(report.dropped_unparseable_price, 1);
        assert_eq!(report.dropped_negative_price, 1);
        assert_eq!(report.dropped_invalid_room_type, 1);
        assert_eq!(report.dropped_missing_id, 1);
    }

    #[test]
    fn half_bath_has_no_leading_number() {
        assert_eq!(extract_bathrooms("Half-bath"), None);
        assert_eq!(extract_bathrooms("2 baths"), Some(2.0));
        assert_eq!(extract_bathrooms("1.0"), Some(1.0));
    }

    #[test]
    fn unparseable_numbers_become_missing() {
        let t = table("id,price,room_type,neighbourhood,bedrooms\n1,10,Shared room,A,lots\n");
        let drafts = parse_listings(&t, &mut CleaningReport::default());
        assert_eq!(drafts[0].bedrooms, None);
    }
}
