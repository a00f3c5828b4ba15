//! Gradient-descent training of the single-feature model.
//!
//! The trainer owns the iteration loop: it normalizes both columns to
//! `[0, 1]`, runs batch gradient descent with bold-driver learning-rate
//! adaptation, records a per-iteration snapshot for diagnostics, and
//! denormalizes the final coefficients so the persisted artifact works on
//! raw mileages.
//!
//! # Example
//!
//! ```rust
//! use kmprice::{Dataset, Trainer};
//! use ndarray::array;
//!
//! let dataset = Dataset::new(
//!     array![0.0, 100000.0, 200000.0],
//!     array![10000.0, 8000.0, 6000.0],
//! ).unwrap();
//!
//! let report = Trainer::new().max_iterations(5000).fit(&dataset).unwrap();
//! assert!(report.theta.predict(150000.0) > 0.0);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use rand::Rng;
use tracing::info;

use crate::bold_driver::BoldDriver;
use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::metrics::mean_squared_error;
use crate::model::Theta;
use crate::scaler::MinMaxScaler;

const DEFAULT_MAX_ITERATIONS: usize = 1000;
const DEFAULT_TOLERANCE: f64 = 1e-5;

/// Why the iteration loop stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stop {
    /// Successive errors differed by less than the configured tolerance.
    Converged,
    /// The iteration cap was reached first.
    MaxIterReached,
    /// The cancellation flag was raised at an iteration boundary.
    Interrupted,
}

/// One completed iteration, as recorded for diagnostics and plotting.
#[derive(Clone, Copy, Debug)]
pub struct Snapshot {
    pub t0: f64,
    pub t1: f64,
    pub learning_rate: f64,
    pub error: f64,
}

/// Append-only log of per-iteration snapshots. Not needed for correctness
/// of the final coefficients.
#[derive(Clone, Debug, Default)]
pub struct TrainingRecord {
    snapshots: Vec<Snapshot>,
}

impl TrainingRecord {
    fn push(&mut self, snapshot: Snapshot) {
        self.snapshots.push(snapshot);
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.snapshots.iter()
    }

    pub fn last(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }
}

/// Result of a training run.
#[derive(Clone, Debug)]
pub struct TrainingReport {
    /// Final coefficients in raw space, ready to persist.
    pub theta: Theta,
    /// Final coefficients in normalized space, as the loop produced them.
    pub normalized_theta: Theta,
    pub record: TrainingRecord,
    pub stop: Stop,
}

#[derive(Clone, Debug)]
pub struct Trainer {
    max_iterations: Option<usize>,
    tolerance: Option<f64>,
    learning_rate: Option<f64>,
    random_init: bool,
}

impl Trainer {
    pub fn new() -> Self {
        Self {
            max_iterations: None,
            tolerance: None,
            learning_rate: None,
            random_init: false,
        }
    }

    /// Fixed iteration cap. When a cap is set and no tolerance is, the cap
    /// is the only stopping rule.
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        if max_iterations == 0 {
            panic!("max_iterations must be positive, got 0");
        }
        self.max_iterations = Some(max_iterations);
        self
    }

    /// Convergence threshold on `|error_k - error_{k-1}|`.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        if tolerance <= 0.0 {
            panic!("tolerance must be positive, got {}", tolerance);
        }
        self.tolerance = Some(tolerance);
        self
    }

    /// Initial learning rate. Defaults to `2/N`, a scale tied to dataset
    /// size so the first step is reasonable regardless of sample count.
    pub fn learning_rate(mut self, learning_rate: f64) -> Self {
        if learning_rate <= 0.0 {
            panic!("learning_rate must be positive, got {}", learning_rate);
        }
        self.learning_rate = Some(learning_rate);
        self
    }

    /// Seed the coefficients uniformly in (-0.1, 0.1) instead of at zero.
    /// A fresh seed is drawn on every `fit` call.
    pub fn random_init(mut self, random_init: bool) -> Self {
        self.random_init = random_init;
        self
    }

    pub fn fit(&self, dataset: &Dataset) -> Result<TrainingReport> {
        self.fit_with_cancel(dataset, &AtomicBool::new(false))
    }

    /// Runs the training loop. The cancellation flag is polled only at
    /// iteration boundaries, so the coefficient pair is never observed in a
    /// half-updated state; on cancellation the last fully computed theta is
    /// the result.
    pub fn fit_with_cancel(
        &self,
        dataset: &Dataset,
        cancel: &AtomicBool,
    ) -> Result<TrainingReport> {
        let n = dataset.n_samples();
        if n == 0 {
            return Err(Error::InvalidDataset(
                "cannot train on an empty dataset".to_string(),
            ));
        }

        let mileage_scaler = MinMaxScaler::fit(dataset.mileage())?;
        let price_scaler = MinMaxScaler::fit(dataset.price())?;
        let x = mileage_scaler.normalize_all(dataset.mileage());
        let y = price_scaler.normalize_all(dataset.price());

        let mut theta = if self.random_init {
            let mut rng = rand::thread_rng();
            Theta::new(rng.gen_range(-0.1..0.1), rng.gen_range(-0.1..0.1))
        } else {
            Theta::default()
        };

        let initial_lr = self.learning_rate.unwrap_or(2.0 / n as f64);
        let mut driver = BoldDriver::new(initial_lr);

        let cap = self.max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS);
        // Convergence checking is the default policy; an explicit iteration
        // cap without an explicit tolerance disables it.
        let tolerance = match (self.max_iterations, self.tolerance) {
            (_, Some(t)) => Some(t),
            (None, None) => Some(DEFAULT_TOLERANCE),
            (Some(_), None) => None,
        };

        info!(
            samples = n,
            learning_rate = initial_lr,
            max_iterations = cap,
            ?tolerance,
            "training started"
        );

        let mut record = TrainingRecord::default();
        let mut previous_error: Option<f64> = None;
        let mut stop = Stop::MaxIterReached;

        for _ in 0..cap {
            if cancel.load(Ordering::Relaxed) {
                stop = Stop::Interrupted;
                break;
            }

            // One O(N) pass accumulating both gradient sums, scaled by 1/N.
            let mut grad0 = 0.0;
            let mut grad1 = 0.0;
            for (&xi, &yi) in x.iter().zip(y.iter()) {
                let residual = theta.predict(xi) - yi;
                grad0 += residual;
                grad1 += residual * xi;
            }
            grad0 /= n as f64;
            grad1 /= n as f64;

            let lr = driver.learning_rate();
            theta.t0 -= lr * grad0;
            theta.t1 -= lr * grad1;

            let error = mean_squared_error(&x, &y, &theta)?;
            if !error.is_finite() {
                return Err(Error::InvalidDataset(
                    "gradient descent diverged".to_string(),
                ));
            }

            record.push(Snapshot {
                t0: theta.t0,
                t1: theta.t1,
                learning_rate: lr,
                error,
            });
            driver.observe(error);

            if let (Some(tol), Some(prev)) = (tolerance, previous_error) {
                if (error - prev).abs() < tol {
                    stop = Stop::Converged;
                    break;
                }
            }
            previous_error = Some(error);
        }

        let raw = to_raw_space(theta, &mileage_scaler, &price_scaler);

        info!(
            iterations = record.len(),
            ?stop,
            error = record.last().map(|s| s.error),
            t0 = raw.t0,
            t1 = raw.t1,
            "training finished"
        );

        Ok(TrainingReport {
            theta: raw,
            normalized_theta: theta,
            record,
            stop,
        })
    }
}

impl Default for Trainer {
    fn default() -> Self {
        Self::new()
    }
}

/// Converts coefficients fitted in normalized space into the equivalent
/// raw-space affine pair:
///
/// `price = y_min + dy * (t0 + t1 * (mileage - x_min) / dx)`
///
/// expands to `raw_t0 + raw_t1 * mileage` with `raw_t1 = t1 * dy / dx` and
/// `raw_t0 = y_min + dy * t0 - raw_t1 * x_min`.
fn to_raw_space(theta: Theta, mileage: &MinMaxScaler, price: &MinMaxScaler) -> Theta {
    let raw_t1 = theta.t1 * price.range() / mileage.range();
    let raw_t0 = price.min() + price.range() * theta.t0 - raw_t1 * mileage.min();
    Theta::new(raw_t0, raw_t1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use ndarray_rand::rand_distr::Uniform;
    use ndarray_rand::RandomExt;
    use crate::Vector;

    fn three_point_dataset() -> Dataset {
        Dataset::new(
            array![0.0, 100000.0, 200000.0],
            array![10000.0, 8000.0, 6000.0],
        )
        .unwrap()
    }

    #[test]
    fn test_exact_linear_fit() {
        let dataset = three_point_dataset();
        let report = Trainer::new()
            .max_iterations(20000)
            .tolerance(1e-13)
            .fit(&dataset)
            .unwrap();

        assert!((report.theta.t1 + 0.02).abs() < 1e-3);
        assert!((report.theta.t0 - 10000.0).abs() < 50.0);
        assert!((report.theta.predict(150000.0) - 7000.0).abs() < 20.0);
    }

    #[test]
    fn test_recorded_error_reaches_small_threshold() {
        let dataset = three_point_dataset();
        let report = Trainer::new().max_iterations(5000).fit(&dataset).unwrap();

        assert!(report.record.last().unwrap().error < 1e-4);
    }

    #[test]
    fn test_convergence_on_noisy_synthetic_data() {
        let mileage = Vector::random(200, Uniform::new(0.0, 200000.0));
        let noise = Vector::random(200, Uniform::new(-200.0, 200.0));
        let price = mileage.mapv(|m| 5000.0 - 0.02 * m) + noise;

        let dataset = Dataset::new(mileage, price).unwrap();
        let report = Trainer::new()
            .max_iterations(10000)
            .tolerance(1e-9)
            .fit(&dataset)
            .unwrap();

        assert!((report.theta.t1 + 0.02).abs() < 0.004);
        assert!(report.record.last().unwrap().error < 0.01);
    }

    #[test]
    fn test_iteration_cap_policy() {
        let dataset = three_point_dataset();
        let report = Trainer::new().max_iterations(5).fit(&dataset).unwrap();

        assert_eq!(report.stop, Stop::MaxIterReached);
        assert_eq!(report.record.len(), 5);
    }

    #[test]
    fn test_default_policy_converges() {
        let dataset = three_point_dataset();
        let report = Trainer::new().fit(&dataset).unwrap();

        // Default tolerance fires before the default cap on clean data.
        assert_eq!(report.stop, Stop::Converged);
        assert!(report.record.len() < 1000);
    }

    #[test]
    fn test_random_init_fits_too() {
        let dataset = three_point_dataset();
        let report = Trainer::new()
            .random_init(true)
            .max_iterations(20000)
            .tolerance(1e-13)
            .fit(&dataset)
            .unwrap();

        assert!((report.theta.t1 + 0.02).abs() < 1e-3);
    }

    #[test]
    fn test_identical_mileages_rejected() {
        let dataset = Dataset::new(
            array![50000.0, 50000.0, 50000.0],
            array![1000.0, 2000.0, 3000.0],
        )
        .unwrap();

        assert!(matches!(
            Trainer::new().fit(&dataset),
            Err(Error::DivisionByZero(_))
        ));
    }

    #[test]
    fn test_identical_prices_rejected() {
        let dataset = Dataset::new(
            array![10000.0, 20000.0, 30000.0],
            array![5000.0, 5000.0, 5000.0],
        )
        .unwrap();

        assert!(matches!(
            Trainer::new().fit(&dataset),
            Err(Error::DivisionByZero(_))
        ));
    }

    #[test]
    fn test_single_row_rejected() {
        let dataset = Dataset::new(array![50000.0], array![3000.0]).unwrap();
        assert!(Trainer::new().fit(&dataset).is_err());
    }

    #[test]
    fn test_cancellation_before_first_iteration() {
        let dataset = three_point_dataset();
        let cancel = AtomicBool::new(true);

        let report = Trainer::new()
            .fit_with_cancel(&dataset, &cancel)
            .unwrap();

        assert_eq!(report.stop, Stop::Interrupted);
        assert!(report.record.is_empty());
        assert_eq!(report.normalized_theta, Theta::default());
    }

    #[test]
    fn test_to_raw_space_scenario() {
        let mileage = MinMaxScaler::fit(&array![0.0, 100000.0, 200000.0]).unwrap();
        let price = MinMaxScaler::fit(&array![10000.0, 8000.0, 6000.0]).unwrap();

        // Perfect normalized fit for price = 10000 - 0.02 * mileage.
        let raw = to_raw_space(Theta::new(1.0, -1.0), &mileage, &price);
        assert!((raw.t0 - 10000.0).abs() < 1e-9);
        assert!((raw.t1 + 0.02).abs() < 1e-12);
    }
}
