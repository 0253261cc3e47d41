//! Error types for the sales_forecast crate

use polars::prelude::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

/// Custom error types for the sales_forecast crate
///
/// Only [`ForecastError::EmptyHistory`] aborts a pipeline run. Every other
/// variant is caught at the component that raised it and turned into a
/// status signal plus a fallback value.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// The model artifact does not exist at the configured path
    #[error("Model not found at {}", .0.display())]
    ModelUnavailable(PathBuf),

    /// The model artifact exists but could not be deserialized or validated
    #[error("Error loading model: {0}")]
    ModelLoad(String),

    /// Neither the user file nor the default file produced usable data
    #[error("Data source error: {0}")]
    DataSource(String),

    /// No valid historical rows remain after cleaning
    #[error("Empty historical series: no rows with a valid date remain")]
    EmptyHistory,

    /// The model failed during prediction or returned the wrong shape
    #[error("Model prediction failed: {0}")]
    Inference(String),

    /// Error from invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from CSV parsing
    #[error("CSV error: {0}")]
    CsvError(String),

    /// Error from JSON (de)serialization
    #[error("JSON error: {0}")]
    JsonError(String),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),

    /// Error from statistics helpers
    #[error("Math error: {0}")]
    MathError(#[from] forecast_math::MathError),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl ForecastError {
    /// Whether the pipeline must stop instead of degrading to a fallback
    pub fn is_fatal(&self) -> bool {
        matches!(self, ForecastError::EmptyHistory | ForecastError::Config(_))
    }
}

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        ForecastError::CsvError(err.to_string())
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(err: serde_json::Error) -> Self {
        ForecastError::JsonError(err.to_string())
    }
}
