//! Historical sales series loading
//!
//! Loading never fails outright: whichever source is selected (user file or
//! configured default file) either parses, or the loader substitutes a
//! generated placeholder series and says so in [`DataSourceStatus`].

use crate::config::DashboardConfig;
use crate::error::{ForecastError, Result};
use crate::utils::{date_parser, read_to_string_capped};
use chrono::{Days, NaiveDate};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Number of days in the generated placeholder series
pub const PLACEHOLDER_DAYS: usize = 60;

/// Lower bound (inclusive) of generated historical values
pub const SYNTHETIC_VALUE_MIN: i64 = 200;

/// Upper bound (exclusive) of generated historical values
pub const SYNTHETIC_VALUE_MAX: i64 = 800;

/// First date of the generated placeholder series
pub fn placeholder_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default()
}

/// A single observation: one value on one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    /// Calendar date of the observation
    pub date: NaiveDate,
    /// Observed sales value
    pub value: f64,
}

impl SalesRecord {
    /// Create a new record
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Observed sales, sorted ascending by date
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct HistoricalSeries {
    records: Vec<SalesRecord>,
}

impl HistoricalSeries {
    /// Build a series from records in any order
    ///
    /// The sort is stable, so records sharing a date keep their input order.
    pub fn from_records(mut records: Vec<SalesRecord>) -> Self {
        records.sort_by_key(|r| r.date);
        Self { records }
    }

    /// Build a series from parallel date and value vectors
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(ForecastError::InvalidParameter(format!(
                "Dates length ({}) doesn't match values length ({})",
                dates.len(),
                values.len()
            )));
        }

        Ok(Self::from_records(
            dates
                .into_iter()
                .zip(values)
                .map(|(date, value)| SalesRecord::new(date, value))
                .collect(),
        ))
    }

    /// Generate `days` consecutive days from `start` with random integer values
    pub fn synthetic<R: Rng + ?Sized>(start: NaiveDate, days: usize, rng: &mut R) -> Self {
        let records = (0..days as u64)
            .map_while(|offset| start.checked_add_days(Days::new(offset)))
            .map(|date| {
                SalesRecord::new(
                    date,
                    rng.random_range(SYNTHETIC_VALUE_MIN..SYNTHETIC_VALUE_MAX) as f64,
                )
            })
            .collect();

        Self { records }
    }

    /// The records in date order
    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    /// The dates in order
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.records.iter().map(|r| r.date).collect()
    }

    /// The observed values in date order
    pub fn values(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.value).collect()
    }

    /// Most recent date, if any
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.records.last().map(|r| r.date)
    }

    /// Check if the series is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Get the length of the series
    pub fn len(&self) -> usize {
        self.records.len()
    }
}

/// Where the historical series came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum DataSourceStatus {
    /// Parsed from the file the user supplied
    UserFile { path: PathBuf },
    /// Parsed from the configured default file
    DefaultFile { path: PathBuf },
    /// Generated placeholder data; `reason` says why no file was used
    Synthetic { reason: String },
}

impl DataSourceStatus {
    /// Whether the series is generated rather than observed
    pub fn is_synthetic(&self) -> bool {
        matches!(self, DataSourceStatus::Synthetic { .. })
    }
}

impl fmt::Display for DataSourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSourceStatus::UserFile { path } => {
                write!(f, "Loaded uploaded sales data from {}", path.display())
            }
            DataSourceStatus::DefaultFile { path } => {
                write!(f, "Loaded default dataset from {}", path.display())
            }
            DataSourceStatus::Synthetic { reason } => {
                write!(f, "No usable data file ({}). Using generated sample data.", reason)
            }
        }
    }
}

/// A loaded series together with its provenance
#[derive(Debug, Clone)]
pub struct LoadedHistory {
    /// The cleaned, sorted series
    pub series: HistoricalSeries,
    /// Which source produced it
    pub status: DataSourceStatus,
}

/// Loader for historical sales tables
#[derive(Debug, Clone)]
pub struct DataLoader<'a> {
    config: &'a DashboardConfig,
}

impl<'a> DataLoader<'a> {
    /// Create a loader using the column names and limits in `config`
    pub fn new(config: &'a DashboardConfig) -> Self {
        Self { config }
    }

    /// Load from the user file if given, otherwise from the default file,
    /// substituting a placeholder series on any failure
    pub fn load<R: Rng + ?Sized>(&self, user_file: Option<&Path>, rng: &mut R) -> LoadedHistory {
        let attempt = match user_file {
            Some(path) => self.read_csv_path(path, rng).map(|series| {
                (
                    series,
                    DataSourceStatus::UserFile {
                        path: path.to_path_buf(),
                    },
                )
            }),
            None => match &self.config.default_data_path {
                Some(path) => self.read_csv_path(path, rng).map(|series| {
                    (
                        series,
                        DataSourceStatus::DefaultFile { path: path.clone() },
                    )
                }),
                None => Err(ForecastError::DataSource(
                    "no data file supplied and no default path configured".to_string(),
                )),
            },
        };

        match attempt {
            Ok((series, status)) => {
                info!(rows = series.len(), "{}", status);
                LoadedHistory { series, status }
            }
            Err(err) => {
                let status = DataSourceStatus::Synthetic {
                    reason: err.to_string(),
                };
                warn!("{}", status);
                LoadedHistory {
                    series: HistoricalSeries::synthetic(placeholder_start(), PLACEHOLDER_DAYS, rng),
                    status,
                }
            }
        }
    }

    /// Load a series from a CSV file, bounded by the configured size cap
    pub fn read_csv_path<R: Rng + ?Sized>(
        &self,
        path: &Path,
        rng: &mut R,
    ) -> Result<HistoricalSeries> {
        let text = read_to_string_capped(path, self.config.max_file_bytes).map_err(|e| match e {
            ForecastError::IoError(io) => {
                ForecastError::DataSource(format!("cannot read {}: {}", path.display(), io))
            }
            other => other,
        })?;
        debug!(path = %path.display(), bytes = text.len(), "Read sales data file");
        self.read_csv(text.as_bytes(), rng)
    }

    /// Load a series from CSV content with a header row
    pub fn read_csv<Rd: Read, R: Rng + ?Sized>(
        &self,
        reader: Rd,
        rng: &mut R,
    ) -> Result<HistoricalSeries> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| ForecastError::DataSource(format!("unreadable header row: {}", e)))?
            .clone();
        if headers.is_empty() || headers.iter().all(str::is_empty) {
            return Err(ForecastError::DataSource("missing header row".to_string()));
        }

        let date_idx = self.date_column_index(&headers);
        // A value column that was promoted to the date column no longer counts
        let value_idx = headers
            .iter()
            .enumerate()
            .find(|(i, h)| *i != date_idx && h.eq_ignore_ascii_case(&self.config.value_column))
            .map(|(i, _)| i);

        if value_idx.is_none() {
            if !self.config.allow_synthetic_values {
                return Err(ForecastError::DataSource(format!(
                    "no '{}' column and synthetic values are disabled",
                    self.config.value_column
                )));
            }
            warn!(
                column = %self.config.value_column,
                "Value column missing; filling with random values"
            );
        }

        let mut records = Vec::new();
        let mut dropped_dates = 0usize;
        let mut dropped_values = 0usize;

        for row in csv_reader.records() {
            let row =
                row.map_err(|e| ForecastError::DataSource(format!("malformed CSV row: {}", e)))?;

            let date = match row.get(date_idx).map(date_parser::parse_date) {
                Some(Ok(date)) => date,
                _ => {
                    dropped_dates += 1;
                    continue;
                }
            };

            let value = match value_idx {
                Some(idx) => match row.get(idx).map(|v| v.parse::<f64>()) {
                    Some(Ok(value)) if value.is_finite() => value,
                    _ => {
                        dropped_values += 1;
                        continue;
                    }
                },
                None => rng.random_range(SYNTHETIC_VALUE_MIN..SYNTHETIC_VALUE_MAX) as f64,
            };

            records.push(SalesRecord::new(date, value));
        }

        if dropped_dates > 0 {
            warn!(dropped = dropped_dates, "Dropped rows with unparseable dates");
        }
        if dropped_values > 0 {
            warn!(dropped = dropped_values, "Dropped rows with non-numeric values");
        }

        Ok(HistoricalSeries::from_records(records))
    }

    /// The configured date column, or the first column when it is absent
    fn date_column_index(&self, headers: &csv::StringRecord) -> usize {
        match headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(&self.config.date_column))
        {
            Some(idx) => idx,
            None => {
                debug!(
                    column = headers.get(0).unwrap_or_default(),
                    "No '{}' column; treating the first column as dates",
                    self.config.date_column
                );
                0
            }
        }
    }
}
