//! Calendar features for the forecast horizon

use crate::data::HistoricalSeries;
use crate::error::{ForecastError, Result};
use crate::utils::future_dates;
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use serde::Serialize;

/// Number of days forecast after the last observation
pub const FORECAST_HORIZON: usize = 15;

pub const DAY_OF_WEEK: &str = "day_of_week";
pub const MONTH: &str = "month";
pub const IS_WEEKEND: &str = "is_weekend";
pub const IS_HOLIDAY: &str = "is_holiday";

/// Feature columns in the order they are derived
pub const FEATURE_COLUMNS: [&str; 4] = [DAY_OF_WEEK, MONTH, IS_WEEKEND, IS_HOLIDAY];

/// Calendar features of one future date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureRow {
    pub date: NaiveDate,
    /// 0 = Monday … 6 = Sunday
    pub day_of_week: u32,
    /// 1 = January … 12 = December
    pub month: u32,
    pub is_weekend: bool,
    /// No holiday calendar is consulted; always false
    pub is_holiday: bool,
}

impl FeatureRow {
    /// Derive the features of a single date
    pub fn for_date(date: NaiveDate) -> Self {
        let day_of_week = date.weekday().num_days_from_monday();
        Self {
            date,
            day_of_week,
            month: date.month(),
            is_weekend: day_of_week >= 5,
            is_holiday: false,
        }
    }
}

/// One row of calendar features per future date
///
/// Dates are kept beside the frame rather than in it, so the frame only ever
/// holds model inputs.
#[derive(Debug, Clone)]
pub struct FeatureTable {
    rows: Vec<FeatureRow>,
    frame: DataFrame,
}

impl FeatureTable {
    /// Build the table for the given dates
    pub fn from_dates(dates: &[NaiveDate]) -> Result<Self> {
        let rows: Vec<FeatureRow> = dates.iter().copied().map(FeatureRow::for_date).collect();

        let frame = DataFrame::new(vec![
            Series::new(
                DAY_OF_WEEK,
                rows.iter().map(|r| r.day_of_week as i32).collect::<Vec<i32>>(),
            ),
            Series::new(
                MONTH,
                rows.iter().map(|r| r.month as i32).collect::<Vec<i32>>(),
            ),
            Series::new(
                IS_WEEKEND,
                rows.iter().map(|r| r.is_weekend).collect::<Vec<bool>>(),
            ),
            Series::new(
                IS_HOLIDAY,
                rows.iter().map(|r| r.is_holiday).collect::<Vec<bool>>(),
            ),
        ])?;

        Ok(Self { rows, frame })
    }

    /// The feature rows in date order
    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    /// The dates the table covers
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.date).collect()
    }

    /// Columnar view of the feature values
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Names of the feature columns, excluding the date
    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The forecast horizon: consecutive days after the last observed date
pub fn future_date_range(history: &HistoricalSeries) -> Result<Vec<NaiveDate>> {
    let last_date = history.last_date().ok_or(ForecastError::EmptyHistory)?;
    future_dates(last_date, FORECAST_HORIZON)
}

/// Derive the feature table for the horizon following `history`
pub fn derive_features(history: &HistoricalSeries) -> Result<FeatureTable> {
    FeatureTable::from_dates(&future_date_range(history)?)
}
