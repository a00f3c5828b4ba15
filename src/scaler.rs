//! Min/max feature scaling.
//!
//! Training runs in `[0, 1]` normalized space to keep gradient magnitudes
//! comparable between the mileage and price columns. The bounds are derived
//! once from the dataset and reused unchanged for every normalize/denormalize
//! call within a run.

use crate::error::{Error, Result};
use crate::Vector;

#[derive(Clone, Copy, Debug)]
pub struct MinMaxScaler {
    min: f64,
    max: f64,
}

impl MinMaxScaler {
    /// Derives the bounds from the given values. Fails with
    /// [`Error::DivisionByZero`] when all values are identical, since the
    /// normalization denominator would vanish.
    pub fn fit(values: &Vector) -> Result<Self> {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        if values.is_empty() {
            return Err(Error::InvalidDataset(
                "cannot fit scaler on empty column".to_string(),
            ));
        }
        if max == min {
            return Err(Error::DivisionByZero(min));
        }

        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    pub fn normalize(&self, x: f64) -> f64 {
        (x - self.min) / (self.max - self.min)
    }

    pub fn denormalize(&self, y: f64) -> f64 {
        y * (self.max - self.min) + self.min
    }

    pub fn normalize_all(&self, values: &Vector) -> Vector {
        values.mapv(|x| self.normalize(x))
    }

    pub fn denormalize_all(&self, values: &Vector) -> Vector {
        values.mapv(|y| self.denormalize(y))
    }
}
