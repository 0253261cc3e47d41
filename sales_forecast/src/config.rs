//! Dashboard configuration
//!
//! Every field has a serde default so a partial JSON file (or none at all)
//! yields a usable configuration. Command-line flags are applied on top by
//! the binary.

use crate::error::{ForecastError, Result};
use crate::utils::read_to_string_capped;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Upper bound on any file the pipeline reads: 16 MiB
pub const DEFAULT_MAX_FILE_BYTES: u64 = 16 * 1024 * 1024;

/// Configuration for one dashboard process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Serialized model artifact, loaded once at startup
    #[serde(default)]
    pub model_path: Option<PathBuf>,

    /// Sales CSV consulted when no user file is supplied
    #[serde(default)]
    pub default_data_path: Option<PathBuf>,

    /// Preferred name of the date column
    #[serde(default = "default_date_column")]
    pub date_column: String,

    /// Name of the observed value column
    #[serde(default = "default_value_column")]
    pub value_column: String,

    /// Fill a missing value column with random values instead of rejecting the file
    #[serde(default)]
    pub allow_synthetic_values: bool,

    /// Size cap applied to the model artifact and to data files
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
}

fn default_date_column() -> String {
    "Date".to_string()
}

fn default_value_column() -> String {
    "Sales".to_string()
}

fn default_max_file_bytes() -> u64 {
    DEFAULT_MAX_FILE_BYTES
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            default_data_path: None,
            date_column: default_date_column(),
            value_column: default_value_column(),
            allow_synthetic_values: false,
            max_file_bytes: default_max_file_bytes(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = read_to_string_capped(path.as_ref(), DEFAULT_MAX_FILE_BYTES)?;
        let config: Self = serde_json::from_str(&text).map_err(|e| {
            ForecastError::Config(format!(
                "Invalid configuration file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Set the model artifact path
    pub fn with_model_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.model_path = Some(path.into());
        self
    }

    /// Set the default data path
    pub fn with_default_data_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.default_data_path = Some(path.into());
        self
    }

    /// Enable or disable synthetic value filling
    pub fn with_synthetic_values(mut self, allow: bool) -> Self {
        self.allow_synthetic_values = allow;
        self
    }

    /// Check the configuration for values no run could succeed with
    pub fn validate(&self) -> Result<()> {
        if self.date_column.trim().is_empty() {
            return Err(ForecastError::Config(
                "date_column must not be empty".to_string(),
            ));
        }
        if self.value_column.trim().is_empty() {
            return Err(ForecastError::Config(
                "value_column must not be empty".to_string(),
            ));
        }
        if self.max_file_bytes == 0 {
            return Err(ForecastError::Config(
                "max_file_bytes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
