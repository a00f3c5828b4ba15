use crate::error::{Error, Result};
use crate::model::Theta;
use crate::Vector;

/// Mean squared error of the model over a (normalized) dataset:
/// `(1/N) * Σ (price_i - predict(mileage_i))^2`.
///
/// Only meaningful for comparison between iterations that share the same
/// normalization bounds.
pub fn mean_squared_error(mileage: &Vector, price: &Vector, theta: &Theta) -> Result<f64> {
    if mileage.len() != price.len() {
        return Err(Error::InvalidDataset(
            "mileage and price must have the same length".to_string(),
        ));
    }
    if mileage.is_empty() {
        return Err(Error::InvalidDataset(
            "cannot compute error on an empty dataset".to_string(),
        ));
    }

    let n = mileage.len() as f64;
    let sum: f64 = mileage
        .iter()
        .zip(price.iter())
        .map(|(&x, &y)| {
            let r = y - theta.predict(x);
            r * r
        })
        .sum();

    Ok(sum / n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_perfect_fit_has_zero_error() {
        let mileage = array![0.0, 0.5, 1.0];
        let price = array![1.0, 0.5, 0.0];
        let theta = Theta::new(1.0, -1.0);

        let mse = mean_squared_error(&mileage, &price, &theta).unwrap();
        assert!(mse.abs() < 1e-12);
    }

    #[test]
    fn test_constant_offset() {
        let mileage = array![0.0, 1.0];
        let price = array![1.0, 1.0];
        let theta = Theta::new(0.0, 0.0);

        let mse = mean_squared_error(&mileage, &price, &theta).unwrap();
        assert!((mse - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let mileage = array![0.0, 1.0];
        let price = array![1.0];

        assert!(mean_squared_error(&mileage, &price, &Theta::default()).is_err());
    }
}
