use sales_forecast::{
    load_model, DashboardConfig, ForecastError, LinearModel, ModelLoadStatus, Predictor,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[test]
fn test_load_valid_artifact() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"{{"feature_names": ["month"], "coefficients": [3.0], "intercept": 10.0}}"#
    )
    .unwrap();

    let loaded = load_model(&DashboardConfig::default().with_model_path(file.path()));

    assert!(matches!(loaded.status, ModelLoadStatus::Loaded { .. }));
    let model = loaded.predictor().unwrap();
    assert_eq!(model.feature_names(), Some(&["month".to_string()][..]));
    assert!(loaded.status.to_string().starts_with("Model loaded successfully"));
}

#[test]
fn test_missing_artifact_is_not_found() {
    let config = DashboardConfig::default().with_model_path("/nonexistent/model.json");
    let loaded = load_model(&config);

    assert!(loaded.predictor().is_none());
    assert_eq!(
        loaded.status,
        ModelLoadStatus::NotFound {
            path: Some(PathBuf::from("/nonexistent/model.json"))
        }
    );
    assert!(loaded.status.to_string().contains("demo mode"));
}

#[test]
fn test_corrupt_artifact_is_load_error() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "\u{0}\u{1} not a model").unwrap();

    let loaded = load_model(&DashboardConfig::default().with_model_path(file.path()));

    assert!(loaded.predictor().is_none());
    match &loaded.status {
        ModelLoadStatus::Error { message } => assert!(!message.is_empty()),
        other => panic!("Expected load error, got {:?}", other),
    }
    assert!(loaded.status.to_string().starts_with("Error loading model: "));
}

#[test]
fn test_oversized_artifact_is_load_error() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, r#"{{"coefficients": [1.0, 2.0, 3.0]}}"#).unwrap();

    let config = DashboardConfig {
        max_file_bytes: 4,
        ..DashboardConfig::default().with_model_path(file.path())
    };
    let loaded = load_model(&config);

    match &loaded.status {
        ModelLoadStatus::Error { message } => {
            assert!(message.contains("byte limit"));
            assert!(!message.contains("Data source error"));
        }
        other => panic!("Expected load error, got {:?}", other),
    }
    assert!(loaded
        .status
        .to_string()
        .starts_with("Error loading model: "));
}

#[test]
fn test_from_path_errors() {
    let err = LinearModel::from_path(Path::new("/nonexistent/model.json"), 1024).unwrap_err();
    assert!(matches!(err, ForecastError::ModelUnavailable(_)));
}
