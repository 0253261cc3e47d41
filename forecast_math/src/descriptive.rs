//! Descriptive statistics over slices of observed values
//!
//! All functions reject empty input instead of returning NaN, so callers
//! never render an undefined statistic.

use crate::{MathError, Result};

/// Arithmetic mean of the values
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot compute the mean of an empty series".to_string(),
        ));
    }

    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Largest value, ignoring NaN entries
pub fn max(values: &[f64]) -> Result<f64> {
    values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
        .ok_or_else(|| {
            MathError::InsufficientData("Cannot compute the maximum of an empty series".to_string())
        })
}
