//! Error types for dataset loading, training and prediction.

use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// User-supplied value failed validation (non-numeric, negative, too large).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Coefficients file absent or unreadable. Callers may degrade to (0, 0).
    #[error("missing artifact: {0}")]
    MissingArtifact(String),

    /// Dataset cannot be trained on (empty, mismatched columns).
    #[error("invalid dataset: {0}")]
    InvalidDataset(String),

    /// Normalization bounds collapsed: every value of the feature equals {0}.
    #[error("division by zero: feature min equals max ({0})")]
    DivisionByZero(f64),

    /// Training was cancelled by the user.
    #[error("interrupted")]
    Interrupted,

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("parse error: {0}")]
    Parse(#[from] std::num::ParseFloatError),

    #[error("plot error: {0}")]
    Plot(String),
}
