//! One dashboard run: load → derive features → forecast → assemble

use crate::adapter::{ForecastSeries, ForecastStatus, ModelAdapter};
use crate::assembler::{assemble, CombinedSeries, ForecastSummary};
use crate::config::DashboardConfig;
use crate::data::{DataLoader, DataSourceStatus, HistoricalSeries, LoadedHistory};
use crate::error::Result;
use crate::features::derive_features;
use crate::model::Predictor;
use rand::Rng;
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Everything a run produces for the presentation layer
#[derive(Debug, Clone, Serialize)]
pub struct DashboardRun {
    pub history: HistoricalSeries,
    pub data_status: DataSourceStatus,
    pub forecast: ForecastSeries,
    pub forecast_status: ForecastStatus,
    pub combined: CombinedSeries,
    pub summary: ForecastSummary,
}

/// Runs the forecast pipeline against a fixed configuration and model
///
/// The model is borrowed, never mutated, so one loaded model can serve any
/// number of runs.
#[derive(Debug, Clone, Copy)]
pub struct ForecastPipeline<'a> {
    config: &'a DashboardConfig,
    model: Option<&'a dyn Predictor>,
}

impl<'a> ForecastPipeline<'a> {
    /// Create a pipeline; `model` is `None` when no model could be loaded
    pub fn new(config: &'a DashboardConfig, model: Option<&'a dyn Predictor>) -> Self {
        Self { config, model }
    }

    /// Load history (user file, then default file, then placeholder) and run
    ///
    /// Fails only when no valid historical rows remain.
    pub fn run<R: Rng + ?Sized>(
        &self,
        user_file: Option<&Path>,
        rng: &mut R,
    ) -> Result<DashboardRun> {
        let LoadedHistory { series, status } = DataLoader::new(self.config).load(user_file, rng);
        self.run_with_history(series, status, rng)
    }

    /// Run on an already loaded history
    pub fn run_with_history<R: Rng + ?Sized>(
        &self,
        history: HistoricalSeries,
        data_status: DataSourceStatus,
        rng: &mut R,
    ) -> Result<DashboardRun> {
        let features = derive_features(&history)?;
        let outcome = ModelAdapter::new(self.model).forecast(&features, rng);
        let assembly = assemble(&history, &outcome.series)?;

        info!(
            history = history.len(),
            forecast = outcome.series.len(),
            model_based = outcome.status.is_model_based(),
            "Forecasting completed"
        );

        Ok(DashboardRun {
            history,
            data_status,
            forecast: outcome.series,
            forecast_status: outcome.status,
            combined: assembly.combined,
            summary: assembly.summary,
        })
    }
}
