//! # Sales Dashboard
//!
//! Rendering of a forecast run for people and for charting tools.
//!
//! ## Example
//!
//! ```
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use sales_dashboard::DashboardReport;
//! use sales_forecast::{load_model, DashboardConfig, ForecastPipeline};
//!
//! let config = DashboardConfig::default();
//! let model = load_model(&config);
//! let mut rng = StdRng::seed_from_u64(1);
//! let run = ForecastPipeline::new(&config, model.predictor())
//!     .run(None, &mut rng)
//!     .unwrap();
//!
//! let report = DashboardReport::new(&model.status, &run);
//! assert!(report.to_string().contains("Forecast Period: 2024-03-01 to 2024-03-15"));
//! ```

use sales_forecast::{DashboardRun, ModelLoadStatus, Result};
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// A finished run plus the startup model status
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DashboardReport<'a> {
    model_status: &'a ModelLoadStatus,
    #[serde(flatten)]
    run: &'a DashboardRun,
}

impl<'a> DashboardReport<'a> {
    /// Create a report for one run
    pub fn new(model_status: &'a ModelLoadStatus, run: &'a DashboardRun) -> Self {
        Self { model_status, run }
    }

    /// Pretty-printed JSON with statuses, series and summary
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the combined history + forecast series as CSV
    pub fn write_combined_csv(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.run.combined.write_csv(BufWriter::new(file))
    }
}

impl fmt::Display for DashboardReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Demand Forecasting Dashboard")?;
        writeln!(f)?;
        writeln!(f, "Model:    {}", self.model_status)?;
        writeln!(f, "Data:     {}", self.run.data_status)?;
        writeln!(f, "Forecast: {}", self.run.forecast_status)?;
        writeln!(f)?;
        writeln!(f, "Insights")?;
        writeln!(f, "{}", self.run.summary)?;
        writeln!(f)?;
        write!(
            f,
            "{} historical days, {} forecast days",
            self.run.history.len(),
            self.run.forecast.len()
        )
    }
}
