use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sales_forecast::data::DataLoader;
use sales_forecast::{DashboardConfig, DataSourceStatus, ForecastError};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn csv_file(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file
}

#[test]
fn test_data_loader_from_csv() {
    let file = csv_file(&[
        "Date,Sales,Region",
        "2024-01-03,150,north",
        "2024-01-01,100,north",
        "2024-01-02,200,south",
    ]);

    let config = DashboardConfig::default();
    let mut rng = StdRng::seed_from_u64(0);
    let series = DataLoader::new(&config)
        .read_csv_path(file.path(), &mut rng)
        .unwrap();

    assert_eq!(series.len(), 3);
    assert_eq!(series.dates(), vec![ymd(2024, 1, 1), ymd(2024, 1, 2), ymd(2024, 1, 3)]);
    assert_eq!(series.values(), vec![100.0, 200.0, 150.0]);
}

#[test]
fn test_first_column_used_as_date() {
    let file = csv_file(&["order_day,sales", "2024/02/01,10.5", "2024/02/02,11"]);

    let config = DashboardConfig::default();
    let mut rng = StdRng::seed_from_u64(0);
    let series = DataLoader::new(&config)
        .read_csv_path(file.path(), &mut rng)
        .unwrap();

    assert_eq!(series.dates(), vec![ymd(2024, 2, 1), ymd(2024, 2, 2)]);
    assert_eq!(series.values(), vec![10.5, 11.0]);
}

#[test]
fn test_unparseable_rows_dropped() {
    let file = csv_file(&[
        "Date,Sales",
        "2024-01-01,100",
        "yesterday,200",
        ",300",
        "2024-01-02,n/a",
        "2024-01-03,400",
    ]);

    let config = DashboardConfig::default();
    let mut rng = StdRng::seed_from_u64(0);
    let series = DataLoader::new(&config)
        .read_csv_path(file.path(), &mut rng)
        .unwrap();

    assert_eq!(series.values(), vec![100.0, 400.0]);
    assert!(series
        .records()
        .windows(2)
        .all(|pair| pair[0].date <= pair[1].date));
}

#[test]
fn test_missing_value_column() {
    let file = csv_file(&["Date,Orders", "2024-01-01,3", "2024-01-02,4"]);
    let mut rng = StdRng::seed_from_u64(3);

    let strict = DashboardConfig::default();
    let err = DataLoader::new(&strict)
        .read_csv_path(file.path(), &mut rng)
        .unwrap_err();
    assert!(matches!(err, ForecastError::DataSource(_)));

    let lenient = DashboardConfig::default().with_synthetic_values(true);
    let series = DataLoader::new(&lenient)
        .read_csv_path(file.path(), &mut rng)
        .unwrap();
    assert_eq!(series.len(), 2);
    assert!(series.values().iter().all(|v| (200.0..800.0).contains(v)));
}

#[test]
fn test_size_cap() {
    let file = csv_file(&["Date,Sales", "2024-01-01,100"]);
    let config = DashboardConfig {
        max_file_bytes: 8,
        ..DashboardConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(0);

    let err = DataLoader::new(&config)
        .read_csv_path(file.path(), &mut rng)
        .unwrap_err();
    assert!(matches!(err, ForecastError::DataSource(_)));
}

#[test]
fn test_load_prefers_user_file() {
    let user = csv_file(&["Date,Sales", "2024-03-01,1"]);
    let default = csv_file(&["Date,Sales", "2024-04-01,2"]);
    let config = DashboardConfig::default().with_default_data_path(default.path());
    let mut rng = StdRng::seed_from_u64(0);

    let loaded = DataLoader::new(&config).load(Some(user.path()), &mut rng);
    assert_eq!(
        loaded.status,
        DataSourceStatus::UserFile {
            path: user.path().to_path_buf()
        }
    );
    assert_eq!(loaded.series.values(), vec![1.0]);

    let loaded = DataLoader::new(&config).load(None, &mut rng);
    assert_eq!(
        loaded.status,
        DataSourceStatus::DefaultFile {
            path: default.path().to_path_buf()
        }
    );
    assert_eq!(loaded.series.values(), vec![2.0]);
}

#[test]
fn test_load_falls_back_to_placeholder() {
    let config = DashboardConfig::default().with_default_data_path("/nonexistent/sales.csv");
    let mut rng = StdRng::seed_from_u64(11);

    let loaded = DataLoader::new(&config).load(None, &mut rng);
    assert!(loaded.status.is_synthetic());
    assert_eq!(loaded.series.len(), 60);
    assert_eq!(loaded.series.records()[0].date, ymd(2024, 1, 1));

    let missing = Path::new("/nonexistent/upload.csv");
    let loaded = DataLoader::new(&config).load(Some(missing), &mut rng);
    assert!(loaded.status.is_synthetic());
}

#[test]
fn test_data_loader_error_handling() {
    let config = DashboardConfig::default();
    let mut rng = StdRng::seed_from_u64(0);

    let loader = DataLoader::new(&config);
    let result = loader.read_csv_path(Path::new("nonexistent_file.csv"), &mut rng);
    assert!(matches!(result, Err(ForecastError::DataSource(_))));

    let empty = NamedTempFile::new().unwrap();
    let result = loader.read_csv_path(empty.path(), &mut rng);
    assert!(result.is_err());
}

#[test]
fn test_all_dates_invalid_yields_empty_series() {
    let file = csv_file(&["Date,Sales", "soon,1", "later,2"]);
    let config = DashboardConfig::default();
    let mut rng = StdRng::seed_from_u64(0);

    let series = DataLoader::new(&config)
        .read_csv_path(file.path(), &mut rng)
        .unwrap();
    assert!(series.is_empty());
}
