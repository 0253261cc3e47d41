//! # Sales Forecast
//!
//! Short-horizon demand forecasting for daily sales series.
//!
//! ## Features
//!
//! - Historical sales loading from CSV with lenient date parsing
//! - Calendar features (day of week, month, weekend, holiday) for the 15 days
//!   after the last observation
//! - Schema reconciliation against whatever feature names a pre-trained
//!   model declares
//! - Synthetic fallbacks when data or model are unavailable, always reported
//!   through status signals
//! - Combined history + forecast series and headline statistics
//!
//! ## Quick Start
//!
//! ```no_run
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use sales_forecast::{load_model, DashboardConfig, ForecastPipeline};
//! use std::path::Path;
//!
//! let config = DashboardConfig::default()
//!     .with_model_path("models/sales.json")
//!     .with_default_data_path("data/sales.csv");
//!
//! // Load the model once
//! let model = load_model(&config);
//! println!("{}", model.status);
//!
//! // Run the pipeline on an uploaded file
//! let mut rng = StdRng::seed_from_u64(7);
//! let pipeline = ForecastPipeline::new(&config, model.predictor());
//! let run = pipeline.run(Some(Path::new("upload.csv")), &mut rng)?;
//!
//! println!("{}", run.forecast_status);
//! println!("{}", run.summary);
//! # Ok::<(), sales_forecast::ForecastError>(())
//! ```

pub mod adapter;
pub mod assembler;
pub mod config;
pub mod data;
pub mod error;
pub mod features;
pub mod model;
pub mod pipeline;
pub mod utils;

// Re-export commonly used types
pub use crate::adapter::{FallbackReason, ForecastSeries, ForecastStatus, ModelAdapter};
pub use crate::assembler::{CombinedSeries, ForecastSummary, PointKind};
pub use crate::config::DashboardConfig;
pub use crate::data::{DataLoader, DataSourceStatus, HistoricalSeries, SalesRecord};
pub use crate::error::{ForecastError, Result};
pub use crate::features::{FeatureTable, FORECAST_HORIZON};
pub use crate::model::{
    load_model, FeatureMatrix, LinearModel, LoadedModel, ModelHandle, ModelLoadStatus, Predictor,
};
pub use crate::pipeline::{DashboardRun, ForecastPipeline};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
