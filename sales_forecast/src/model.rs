//! Pre-trained predictive models
//!
//! The pipeline treats a model as an opaque capability: it may declare the
//! ordered feature names it was trained on, and it maps a numeric feature
//! matrix to one prediction per row. Nothing here trains or evaluates models.

use crate::config::DashboardConfig;
use crate::error::{ForecastError, Result};
use crate::utils::read_to_string_capped;
use forecast_math::LinearScorer;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::{self, Debug};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Row-major numeric matrix with named columns
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    /// Create a matrix, checking every row has one value per column
    pub fn new(columns: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self> {
        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(ForecastError::InvalidParameter(format!(
                "Row {} has {} values but the matrix has {} columns",
                i,
                row.len(),
                columns.len()
            )));
        }

        Ok(Self { columns, rows })
    }

    /// Column names in order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in order
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Values of one column, if present
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|row| row[idx]).collect())
    }

    /// Number of rows
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }
}

/// A loaded model that can score feature matrices
pub trait Predictor: Debug {
    /// Ordered feature names the model was trained on, when recorded
    fn feature_names(&self) -> Option<&[String]> {
        None
    }

    /// Predict one value per row of `features`
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Shared, immutable handle to a loaded model
///
/// Loaded once at startup and replaced wholesale when configuration changes.
pub type ModelHandle = Arc<dyn Predictor + Send + Sync>;

/// On-disk form of a linear regression model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModelArtifact {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "feature_names_in_")]
    pub feature_names: Option<Vec<String>>,
    pub coefficients: Vec<f64>,
    #[serde(default)]
    pub intercept: f64,
}

/// Pre-trained linear regression model
#[derive(Debug, Clone)]
pub struct LinearModel {
    name: String,
    feature_names: Option<Vec<String>>,
    scorer: LinearScorer,
}

impl LinearModel {
    /// Create a model from fitted coefficients
    pub fn new(
        feature_names: Option<Vec<String>>,
        coefficients: Vec<f64>,
        intercept: f64,
    ) -> Result<Self> {
        if let Some(names) = &feature_names {
            if names.len() != coefficients.len() {
                return Err(ForecastError::ModelLoad(format!(
                    "{} feature names but {} coefficients",
                    names.len(),
                    coefficients.len()
                )));
            }
            let mut seen = HashSet::new();
            if let Some(dup) = names.iter().find(|n| !seen.insert(n.as_str())) {
                return Err(ForecastError::ModelLoad(format!(
                    "Duplicate feature name '{}'",
                    dup
                )));
            }
        }

        let scorer = LinearScorer::new(coefficients, intercept)
            .map_err(|e| ForecastError::ModelLoad(e.to_string()))?;

        Ok(Self {
            name: format!("Linear Regression ({} features)", scorer.arity()),
            feature_names,
            scorer,
        })
    }

    /// Rebuild a model from its artifact
    pub fn from_artifact(artifact: LinearModelArtifact) -> Result<Self> {
        let mut model = Self::new(
            artifact.feature_names,
            artifact.coefficients,
            artifact.intercept,
        )?;
        if let Some(name) = artifact.name {
            model.name = name;
        }
        Ok(model)
    }

    /// Parse a model from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        let artifact: LinearModelArtifact =
            serde_json::from_str(json).map_err(|e| ForecastError::ModelLoad(e.to_string()))?;
        Self::from_artifact(artifact)
    }

    /// Load a model artifact from disk, bounded by `max_bytes`
    pub fn from_path(path: &Path, max_bytes: u64) -> Result<Self> {
        if !path.exists() {
            return Err(ForecastError::ModelUnavailable(path.to_path_buf()));
        }

        let json = read_to_string_capped(path, max_bytes).map_err(|e| match e {
            ForecastError::DataSource(message) => ForecastError::ModelLoad(message),
            ForecastError::IoError(io) => {
                ForecastError::ModelLoad(format!("cannot read {}: {}", path.display(), io))
            }
            other => ForecastError::ModelLoad(other.to_string()),
        })?;
        Self::from_json_str(&json)
    }
}

impl Predictor for LinearModel {
    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>> {
        self.scorer
            .score_rows(features.rows())
            .map_err(|e| ForecastError::Inference(e.to_string()))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Outcome of loading the configured model at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ModelLoadStatus {
    /// The model was loaded and will be used
    Loaded { name: String },
    /// No artifact at the configured path, or no path configured
    NotFound { path: Option<PathBuf> },
    /// The artifact exists but could not be loaded
    Error { message: String },
}

impl fmt::Display for ModelLoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelLoadStatus::Loaded { name } => write!(f, "Model loaded successfully: {}", name),
            ModelLoadStatus::NotFound { path: Some(path) } => write!(
                f,
                "Model not found at {}. Running in demo mode.",
                path.display()
            ),
            ModelLoadStatus::NotFound { path: None } => {
                write!(f, "No model configured. Running in demo mode.")
            }
            ModelLoadStatus::Error { message } => write!(f, "Error loading model: {}", message),
        }
    }
}

/// The startup model, if any, and how loading went
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub model: Option<ModelHandle>,
    pub status: ModelLoadStatus,
}

impl LoadedModel {
    /// A run without a model
    pub fn absent(path: Option<PathBuf>) -> Self {
        Self {
            model: None,
            status: ModelLoadStatus::NotFound { path },
        }
    }

    /// Borrow the model for a pipeline run
    pub fn predictor(&self) -> Option<&dyn Predictor> {
        self.model.as_deref().map(|m| m as &dyn Predictor)
    }
}

/// Load the configured model; failures are reported, never returned
pub fn load_model(config: &DashboardConfig) -> LoadedModel {
    let Some(path) = &config.model_path else {
        warn!("No model path configured. Running in demo mode.");
        return LoadedModel::absent(None);
    };

    match LinearModel::from_path(path, config.max_file_bytes) {
        Ok(model) => {
            let status = ModelLoadStatus::Loaded {
                name: model.name().to_string(),
            };
            info!(path = %path.display(), "{}", status);
            LoadedModel {
                model: Some(Arc::new(model)),
                status,
            }
        }
        Err(ForecastError::ModelUnavailable(path)) => {
            let loaded = LoadedModel::absent(Some(path));
            warn!("{}", loaded.status);
            loaded
        }
        Err(err) => {
            let message = match err {
                ForecastError::ModelLoad(message) => message,
                other => other.to_string(),
            };
            let status = ModelLoadStatus::Error { message };
            error!(path = %path.display(), "{}", status);
            LoadedModel {
                model: None,
                status,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_matrix_validation() {
        let ok = FeatureMatrix::new(vec!["a".into(), "b".into()], vec![vec![1.0, 2.0]]);
        assert!(ok.is_ok());
        let matrix = ok.unwrap();
        assert_eq!(matrix.column("b"), Some(vec![2.0]));
        assert_eq!(matrix.column("c"), None);

        let bad = FeatureMatrix::new(vec!["a".into()], vec![vec![1.0, 2.0]]);
        assert!(matches!(bad, Err(ForecastError::InvalidParameter(_))));
    }

    #[test]
    fn test_linear_model_predict() {
        let model = LinearModel::new(
            Some(vec!["day_of_week".into(), "month".into()]),
            vec![10.0, 1.0],
            500.0,
        )
        .unwrap();
        assert_eq!(model.feature_names().unwrap().len(), 2);

        let matrix = FeatureMatrix::new(
            vec!["day_of_week".into(), "month".into()],
            vec![vec![0.0, 1.0], vec![6.0, 1.0]],
        )
        .unwrap();
        let predictions = model.predict(&matrix).unwrap();
        assert_relative_eq!(predictions[0], 501.0);
        assert_relative_eq!(predictions[1], 561.0);
    }

    #[test]
    fn test_linear_model_shape_mismatch_is_inference_error() {
        let model = LinearModel::new(None, vec![1.0, 1.0, 1.0], 0.0).unwrap();
        let matrix = FeatureMatrix::new(vec!["a".into()], vec![vec![1.0]]).unwrap();
        assert!(matches!(
            model.predict(&matrix),
            Err(ForecastError::Inference(_))
        ));
    }

    #[test]
    fn test_artifact_validation() {
        assert!(matches!(
            LinearModel::new(Some(vec!["a".into()]), vec![1.0, 2.0], 0.0),
            Err(ForecastError::ModelLoad(_))
        ));
        assert!(matches!(
            LinearModel::new(Some(vec!["a".into(), "a".into()]), vec![1.0, 2.0], 0.0),
            Err(ForecastError::ModelLoad(_))
        ));
        assert!(matches!(
            LinearModel::from_json_str("{\"coefficients\": \"oops\"}"),
            Err(ForecastError::ModelLoad(_))
        ));
    }

    #[test]
    fn test_sklearn_style_feature_names() {
        let model = LinearModel::from_json_str(
            r#"{"feature_names_in_": ["month"], "coefficients": [2.5], "intercept": 1.0}"#,
        )
        .unwrap();
        assert_eq!(model.feature_names(), Some(&["month".to_string()][..]));
        assert_eq!(model.name(), "Linear Regression (1 features)");
    }

    #[test]
    fn test_load_model_without_path() {
        let loaded = load_model(&DashboardConfig::default());
        assert!(loaded.predictor().is_none());
        assert_eq!(loaded.status, ModelLoadStatus::NotFound { path: None });
    }
}
