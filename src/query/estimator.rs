use log::debug;
use nalgebra::{DMatrix, DVector};
use serde::Serialize;

use super::features::{encode, FeatureMatrix, FEATURE_COLUMNS};
use crate::data::model::{Listing, RoomType};
use crate::error::{InsightsError, Result};

/// Singular values below this are treated as zero. The one-hot room type
/// columns always sum to the intercept column, so the design is rank-deficient.
const SVD_EPS: f64 = 1e-9;

/// Ordinary least squares price model, fit on demand to a selection.
#[derive(Debug, Clone)]
pub struct PriceEstimator {
    /// Intercept followed by one weight per feature column.
    coefficients: DVector<f64>,
    training_rows: usize,
}

/// A single estimate together with what it was fit on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Estimate {
    pub guests: u32,
    pub bedrooms: u32,
    pub room_type: RoomType,
    pub price: f64,
    pub training_rows: usize,
}

impl PriceEstimator {
    pub fn fit(matrix: &FeatureMatrix) -> Result<Self> {
        let n = matrix.nrows();
        if n == 0 {
            return Err(InsightsError::Estimator(
                "no listings to fit the price model on".to_string(),
            ));
        }

        let design = DMatrix::from_fn(n, FEATURE_COLUMNS.len() + 1, |i, j| {
            if j == 0 {
                1.0
            } else {
                matrix.features[(i, j - 1)]
            }
        });
        let coefficients = design
            .svd(true, true)
            .solve(&matrix.target, SVD_EPS)
            .map_err(|e| InsightsError::Estimator(e.to_string()))?;
        debug!("fit price model on {n} listings: {:?}", coefficients.as_slice());

        Ok(Self {
            coefficients,
            training_rows: n,
        })
    }

    pub fn fit_listings(listings: &[&Listing]) -> Result<Self> {
        Self::fit(&FeatureMatrix::from_listings(listings))
    }

    pub fn training_rows(&self) -> usize {
        self.training_rows
    }

    /// Point estimate for a stay, never below zero.
    pub fn predict(&self, guests: u32, bedrooms: u32, room_type: RoomType) -> f64 {
        let row = encode(guests, bedrooms, room_type);
        let raw = self.coefficients[0]
            + row
                .iter()
                .zip(self.coefficients.iter().skip(1))
                .map(|(x, w)| x * w)
                .sum::<f64>();
        raw.max(0.0)
    }

    pub fn estimate(&self, guests: u32, bedrooms: u32, room_type: RoomType) -> Estimate {
        Estimate {
            guests,
            bedrooms,
            room_type,
            price: self.predict(guests, bedrooms, room_type),
            training_rows: self.training_rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::listing;

    fn linear_price(guests: u32, bedrooms: u32, room_type: RoomType) -> f64 {
        let offset = match room_type {
            RoomType::EntireHome => 60.0,
            RoomType::PrivateRoom => 20.0,
            RoomType::SharedRoom => 0.0,
            RoomType::HotelRoom => 90.0,
        };
        15.0 + 25.0 * guests as f64 + 40.0 * bedrooms as f64 + offset
    }

    fn linear_listings() -> Vec<Listing> {
        let mut out = Vec::new();
        for rt in RoomType::ALL {
            for (g, b) in [(1, 1), (2, 1), (4, 2), (6, 3)] {
                let mut l = listing(&format!("{rt}-{g}-{b}"), linear_price(g, b, rt), rt);
                l.accommodates = g;
                l.bedrooms = b;
                out.push(l);
            }
        }
        out
    }

    #[test]
    fn recovers_an_exactly_linear_price() {
        let listings = linear_listings();
        let refs: Vec<&Listing> = listings.iter().collect();
        let model = PriceEstimator::fit_listings(&refs).unwrap();

        assert_eq!(model.training_rows(), 16);
        for (g, b, rt) in [
            (3, 2, RoomType::EntireHome),
            (2, 1, RoomType::SharedRoom),
            (5, 2, RoomType::HotelRoom),
        ] {
            let got = model.predict(g, b, rt);
            assert!((got - linear_price(g, b, rt)).abs() < 1e-6, "{got}");
        }
    }

    #[test]
    fn estimates_are_never_negative() {
        let mut cheap = listing("a", 10.0, RoomType::PrivateRoom);
        cheap.accommodates = 1;
        let mut pricier = listing("b", 5.0, RoomType::PrivateRoom);
        pricier.accommodates = 4;
        let model = PriceEstimator::fit_listings(&[&cheap, &pricier]).unwrap();

        let e = model.estimate(40, 1, RoomType::PrivateRoom);
        assert_eq!(e.price, 0.0);
        assert_eq!(e.training_rows, 2);
    }

    #[test]
    fn empty_selection_cannot_be_fit() {
        assert!(matches!(
            PriceEstimator::fit_listings(&[]),
            Err(InsightsError::Estimator(_))
        ));
    }
}
