pub use ndarray::{Array1, ArrayView1};

pub mod bold_driver;
pub mod dataset;
pub mod error;
pub mod metrics;
pub mod model;
pub mod plot;
pub mod scaler;
pub mod trainer;

pub use bold_driver::BoldDriver;
pub use dataset::Dataset;
pub use error::{Error, Result};
pub use model::Theta;
pub use scaler::MinMaxScaler;
pub use trainer::{Stop, Trainer, TrainingRecord, TrainingReport};

pub type Vector = Array1<f64>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_types_work() {
        let vec = Vector::zeros(5);
        assert_eq!(vec.len(), 5);
    }
}
