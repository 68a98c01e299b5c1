use std::io::Write;

use nalgebra::{DMatrix, DVector};

use crate::data::model::{Listing, RoomType};
use crate::error::Result;

/// Column names of [`FeatureMatrix::features`], in order.
pub const FEATURE_COLUMNS: [&str; 6] = [
    "accommodates",
    "bedrooms",
    "room_entire_home_apt",
    "room_private_room",
    "room_shared_room",
    "room_hotel_room",
];

/// Typed model inputs for an external or built-in price regressor:
/// capacity columns plus a one-hot room type, and the price target.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    /// One row per listing, columns as in [`FEATURE_COLUMNS`].
    pub features: DMatrix<f64>,
    pub target: DVector<f64>,
}

/// Encode one (guests, bedrooms, room type) observation.
pub fn encode(accommodates: u32, bedrooms: u32, room_type: RoomType) -> [f64; 6] {
    let mut row = [0.0; 6];
    row[0] = accommodates as f64;
    row[1] = bedrooms as f64;
    let slot = RoomType::ALL
        .iter()
        .position(|rt| *rt == room_type)
        .unwrap_or(0);
    row[2 + slot] = 1.0;
    row
}

impl FeatureMatrix {
    pub fn from_listings(listings: &[&Listing]) -> Self {
        let data: Vec<f64> = listings
            .iter()
            .flat_map(|l| encode(l.accommodates, l.bedrooms, l.room_type))
            .collect();
        FeatureMatrix {
            features: DMatrix::from_row_slice(listings.len(), FEATURE_COLUMNS.len(), &data),
            target: DVector::from_iterator(listings.len(), listings.iter().map(|l| l.price)),
        }
    }

    pub fn nrows(&self) -> usize {
        self.features.nrows()
    }

    /// Write the matrix as CSV: feature columns followed by `price`.
    pub fn write_csv<W: Write>(&self, out: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(out);
        let mut header: Vec<&str> = FEATURE_COLUMNS.to_vec();
        header.push("price");
        writer.write_record(&header)?;

        for (row, price) in self.features.row_iter().zip(self.target.iter()) {
            let record: Vec<String> = row
                .iter()
                .chain(std::iter::once(price))
                .map(|v| v.to_string())
                .collect();
            writer.write_record(&record)?;
        }
        writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::listing;

    #[test]
    fn one_hot_encodes_room_type() {
        assert_eq!(encode(3, 1, RoomType::EntireHome), [3.0, 1.0, 1.0, 0.0, 0.0, 0.0]);
        assert_eq!(encode(1, 0, RoomType::HotelRoom), [1.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn builds_rows_and_target_from_listings() {
        let mut a = listing("a", 120.0, RoomType::PrivateRoom);
        a.accommodates = 2;
        a.bedrooms = 1;
        let b = listing("b", 300.0, RoomType::SharedRoom);
        let m = FeatureMatrix::from_listings(&[&a, &b]);

        assert_eq!(m.nrows(), 2);
        assert_eq!(m.features[(0, 3)], 1.0);
        assert_eq!(m.features[(1, 4)], 1.0);
        assert_eq!(m.target.as_slice(), &[120.0, 300.0]);
    }

    #[test]
    fn csv_export_has_header_and_one_line_per_listing() {
        let a = listing("a", 99.5, RoomType::EntireHome);
        let m = FeatureMatrix::from_listings(&[&a]);
        let mut buf = Vec::new();
        m.write_csv(&mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "accommodates,bedrooms,room_entire_home_apt,room_private_room,room_shared_room,room_hotel_room,price"
        );
        assert_eq!(lines[1], "2,1,1,0,0,0,99.5");
    }
}
