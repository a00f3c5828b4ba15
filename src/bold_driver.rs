//! Bold-driver learning-rate adaptation.
//!
//! The heuristic grows the step size by 5% after an improving iteration and
//! halves it after a degrading one. Historical variants of this trainer
//! disagreed on the comparandum (raw gradient sum vs. mean squared error);
//! this implementation compares successive cost values, which directly
//! reflects whether the step improved the fit. When a step degrades the fit
//! the retained metric is kept, so the sequence of retained metrics is
//! non-increasing.

use tracing::trace;

#[derive(Clone, Debug)]
pub struct BoldDriver {
    learning_rate: f64,
    retained_error: Option<f64>,
}

const GROWTH: f64 = 1.05;
const DECAY: f64 = 0.5;

impl BoldDriver {
    pub fn new(initial_learning_rate: f64) -> Self {
        Self {
            learning_rate: initial_learning_rate,
            retained_error: None,
        }
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// The best error observed so far, if any iteration has completed.
    pub fn retained_error(&self) -> Option<f64> {
        self.retained_error
    }

    /// Feeds the cost of the iteration that just completed and adjusts the
    /// learning rate for the next one. Returns the adjusted rate.
    pub fn observe(&mut self, error: f64) -> f64 {
        match self.retained_error {
            Some(old) if error > old => {
                self.learning_rate *= DECAY;
                trace!(lr = self.learning_rate, "step degraded error, halving rate");
            }
            _ => {
                self.learning_rate *= GROWTH;
                self.retained_error = Some(error);
            }
        }
        self.learning_rate
    }
}
