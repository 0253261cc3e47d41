//! Schema reconciliation and forecast generation
//!
//! The adapter lines the derived calendar features up with whatever the
//! loaded model expects, runs inference, and falls back to a synthetic
//! forecast for the whole horizon when there is no model or it fails.

use crate::data::SalesRecord;
use crate::error::{ForecastError, Result};
use crate::features::FeatureTable;
use crate::model::{FeatureMatrix, Predictor};
use chrono::NaiveDate;
use polars::prelude::*;
use rand::Rng;
use serde::Serialize;
use std::fmt;
use tracing::{debug, error, info, warn};

/// Lower bound (inclusive) of synthetic forecast values
pub const FALLBACK_VALUE_MIN: i64 = 400;

/// Upper bound (exclusive) of synthetic forecast values
pub const FALLBACK_VALUE_MAX: i64 = 800;

/// Predicted values, one per date of the forecast horizon
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ForecastSeries {
    points: Vec<SalesRecord>,
}

impl ForecastSeries {
    /// Pair dates with predictions
    pub fn new(dates: &[NaiveDate], values: &[f64]) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(ForecastError::Inference(format!(
                "expected {} predictions, got {}",
                dates.len(),
                values.len()
            )));
        }

        Ok(Self {
            points: dates
                .iter()
                .zip(values)
                .map(|(&date, &value)| SalesRecord::new(date, value))
                .collect(),
        })
    }

    /// The forecast points in date order
    pub fn points(&self) -> &[SalesRecord] {
        &self.points
    }

    /// The forecast dates
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    /// The predicted values
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Number of forecast points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the forecast is empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Why a synthetic forecast was produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "message", rename_all = "snake_case")]
pub enum FallbackReason {
    /// No model was loaded
    ModelUnavailable,
    /// The model failed or returned an unusable result
    InferenceError(String),
}

/// How the forecast was produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ForecastStatus {
    /// Predictions came from the model
    ModelBased { model: String },
    /// Predictions are random placeholders
    Fallback { reason: FallbackReason },
}

impl ForecastStatus {
    /// Whether the forecast came from the model
    pub fn is_model_based(&self) -> bool {
        matches!(self, ForecastStatus::ModelBased { .. })
    }
}

impl fmt::Display for ForecastStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForecastStatus::ModelBased { model } => write!(f, "Forecast generated by {}", model),
            ForecastStatus::Fallback {
                reason: FallbackReason::ModelUnavailable,
            } => write!(f, "Demo forecast: no model available"),
            ForecastStatus::Fallback {
                reason: FallbackReason::InferenceError(message),
            } => write!(f, "Demo forecast: model prediction failed: {}", message),
        }
    }
}

/// A forecast and the single status signal describing it
#[derive(Debug, Clone)]
pub struct ForecastOutcome {
    pub series: ForecastSeries,
    pub status: ForecastStatus,
}

/// Random integer-valued forecast for the given dates
pub fn fallback_forecast<R: Rng + ?Sized>(dates: &[NaiveDate], rng: &mut R) -> ForecastSeries {
    ForecastSeries {
        points: dates
            .iter()
            .map(|&date| {
                SalesRecord::new(
                    date,
                    rng.random_range(FALLBACK_VALUE_MIN..FALLBACK_VALUE_MAX) as f64,
                )
            })
            .collect(),
    }
}

/// Runs an optional model against a feature table
#[derive(Debug, Clone, Copy)]
pub struct ModelAdapter<'m> {
    model: Option<&'m dyn Predictor>,
}

impl<'m> ModelAdapter<'m> {
    /// Create an adapter; `None` means every forecast is a fallback
    pub fn new(model: Option<&'m dyn Predictor>) -> Self {
        Self { model }
    }

    /// Feature names to feed the model, in order
    ///
    /// Uses the names the model declares, or every derived column otherwise.
    pub fn model_schema(model: &dyn Predictor, table: &FeatureTable) -> Vec<String> {
        match model.feature_names() {
            Some(names) => names.to_vec(),
            None => table.column_names(),
        }
    }

    /// Align `table` to `schema` and coerce it to numbers
    ///
    /// Columns the schema names but the table lacks are zero-filled, columns
    /// the schema omits are dropped, and values that do not coerce to a
    /// number (including NaN) become zero.
    pub fn reconcile(table: &FeatureTable, schema: &[String]) -> Result<FeatureMatrix> {
        let mut frame = table.frame().clone();
        let height = frame.height();

        for name in schema {
            let present = frame.get_column_names().contains(&name.as_str());
            if !present {
                debug!(column = %name, "Adding zero-filled column missing from derived features");
                frame.with_column(Series::new(name, vec![0i32; height]))?;
            }
        }

        let mut columns: Vec<Vec<f64>> = Vec::with_capacity(schema.len());
        for name in schema {
            let numeric = frame.column(name)?.cast(&DataType::Float64)?;
            let values = numeric
                .f64()?
                .into_iter()
                .map(|v| v.filter(|x| !x.is_nan()).unwrap_or(0.0))
                .collect();
            columns.push(values);
        }

        let rows = (0..height)
            .map(|i| columns.iter().map(|column| column[i]).collect())
            .collect();

        FeatureMatrix::new(schema.to_vec(), rows)
    }

    /// Produce the forecast for every date in `table`
    pub fn forecast<R: Rng + ?Sized>(&self, table: &FeatureTable, rng: &mut R) -> ForecastOutcome {
        let Some(model) = self.model else {
            warn!("No model available; generating a demo forecast");
            return ForecastOutcome {
                series: fallback_forecast(&table.dates(), rng),
                status: ForecastStatus::Fallback {
                    reason: FallbackReason::ModelUnavailable,
                },
            };
        };

        match Self::predict_with(model, table) {
            Ok(series) => {
                info!(model = model.name(), points = series.len(), "Model forecast generated");
                ForecastOutcome {
                    series,
                    status: ForecastStatus::ModelBased {
                        model: model.name().to_string(),
                    },
                }
            }
            Err(err) => {
                let message = match err {
                    ForecastError::Inference(message) => message,
                    other => other.to_string(),
                };
                error!(model = model.name(), "Model prediction failed: {}", message);
                ForecastOutcome {
                    series: fallback_forecast(&table.dates(), rng),
                    status: ForecastStatus::Fallback {
                        reason: FallbackReason::InferenceError(message),
                    },
                }
            }
        }
    }

    fn predict_with(model: &dyn Predictor, table: &FeatureTable) -> Result<ForecastSeries> {
        let schema = Self::model_schema(model, table);
        let matrix = Self::reconcile(table, &schema)?;
        debug!(columns = ?matrix.columns(), rows = matrix.n_rows(), "Feature matrix ready");

        let predictions = model.predict(&matrix)?;
        if let Some(bad) = predictions.iter().find(|v| !v.is_finite()) {
            return Err(ForecastError::Inference(format!(
                "model returned a non-finite prediction ({})",
                bad
            )));
        }

        ForecastSeries::new(&table.dates(), &predictions)
    }
}
