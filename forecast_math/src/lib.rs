//! # Forecast Math
//!
//! Small numeric helpers shared by the sales forecasting pipeline:
//! descriptive statistics over observed values and linear scoring of
//! feature rows.

use thiserror::Error;

pub mod descriptive;
pub mod linear;

pub use descriptive::{max, mean};
pub use linear::LinearScorer;

/// Errors that can occur in forecasting math
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Result type for forecasting math operations
pub type Result<T> = std::result::Result<T, MathError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = MathError::DimensionMismatch {
            expected: 3,
            actual: 2,
        };
        assert_eq!(err.to_string(), "Dimension mismatch: expected 3, got 2");

        let err = MathError::InsufficientData("empty".to_string());
        assert!(err.to_string().contains("empty"));
    }
}
