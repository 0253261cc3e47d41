//! Combined display series and summary statistics

use crate::adapter::ForecastSeries;
use crate::data::HistoricalSeries;
use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use forecast_math::{max, mean};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;

/// Whether a combined point was observed or predicted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointKind {
    Historical,
    Forecast,
}

/// One point of the combined chart series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombinedPoint {
    pub date: NaiveDate,
    /// Observed sales for historical points, predicted sales for forecast points
    pub value: f64,
    pub kind: PointKind,
}

/// History followed by forecast, for display
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CombinedSeries {
    points: Vec<CombinedPoint>,
}

impl CombinedSeries {
    /// Concatenate history and forecast
    pub fn new(history: &HistoricalSeries, forecast: &ForecastSeries) -> Self {
        let historical = history.records().iter().map(|r| CombinedPoint {
            date: r.date,
            value: r.value,
            kind: PointKind::Historical,
        });
        let predicted = forecast.points().iter().map(|p| CombinedPoint {
            date: p.date,
            value: p.value,
            kind: PointKind::Forecast,
        });

        Self {
            points: historical.chain(predicted).collect(),
        }
    }

    /// All points, history first
    pub fn points(&self) -> &[CombinedPoint] {
        &self.points
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the series is empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Write the series as CSV with a `date,value,kind` header
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for point in &self.points {
            csv_writer.serialize(point)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

/// Headline numbers shown next to the charts
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastSummary {
    /// Mean of the historical values
    pub average: f64,
    /// Largest historical value
    pub peak: f64,
    /// Mean forecast minus the historical mean
    pub forecast_growth: f64,
    /// First forecast date
    pub forecast_start: NaiveDate,
    /// Last forecast date
    pub forecast_end: NaiveDate,
}

impl ForecastSummary {
    /// Summarize a history and its forecast
    pub fn compute(history: &HistoricalSeries, forecast: &ForecastSeries) -> Result<Self> {
        if history.is_empty() {
            return Err(ForecastError::EmptyHistory);
        }
        if forecast.is_empty() {
            return Err(ForecastError::Inference(
                "Cannot summarize an empty forecast".to_string(),
            ));
        }

        let values = history.values();
        let average = mean(&values)?;
        let peak = max(&values)?;
        let forecast_growth = mean(&forecast.values())? - average;

        let dates = forecast.dates();
        let (forecast_start, forecast_end) = match (dates.iter().min(), dates.iter().max()) {
            (Some(&start), Some(&end)) => (start, end),
            _ => {
                return Err(ForecastError::Inference(
                    "Cannot summarize an empty forecast".to_string(),
                ))
            }
        };

        Ok(Self {
            average,
            peak,
            forecast_growth,
            forecast_start,
            forecast_end,
        })
    }
}

impl fmt::Display for ForecastSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Average Daily Sales: {:.2}", self.average)?;
        writeln!(f, "Peak Sales: {:.0}", self.peak)?;
        writeln!(f, "Forecasted Growth: {:+.2}", self.forecast_growth)?;
        write!(
            f,
            "Forecast Period: {} to {}",
            self.forecast_start, self.forecast_end
        )
    }
}

/// Everything the presentation layer renders for one run
#[derive(Debug, Clone, Serialize)]
pub struct Assembly {
    pub combined: CombinedSeries,
    pub summary: ForecastSummary,
}

/// Build the combined series and summary
pub fn assemble(history: &HistoricalSeries, forecast: &ForecastSeries) -> Result<Assembly> {
    Ok(Assembly {
        combined: CombinedSeries::new(history, forecast),
        summary: ForecastSummary::compute(history, forecast)?,
    })
}
