//! Utility functions for the sales_forecast crate

use crate::error::{ForecastError, Result};
use chrono::{Days, NaiveDate};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Create the consecutive daily dates following `last_date`
pub fn future_dates(last_date: NaiveDate, horizon: usize) -> Result<Vec<NaiveDate>> {
    (1..=horizon as u64)
        .map(|offset| {
            last_date.checked_add_days(Days::new(offset)).ok_or_else(|| {
                ForecastError::InvalidParameter(format!(
                    "Date overflow adding {} days to {}",
                    offset, last_date
                ))
            })
        })
        .collect()
}

/// Read a whole file into memory, refusing files larger than `max_bytes`
///
/// The size is checked from metadata first and again while reading, so a
/// file that grows between the two steps is still bounded.
pub fn read_to_string_capped(path: &Path, max_bytes: u64) -> Result<String> {
    let file = File::open(path)?;
    let declared = file.metadata()?.len();
    if declared > max_bytes {
        return Err(ForecastError::DataSource(format!(
            "{} is {} bytes, larger than the {} byte limit",
            path.display(),
            declared,
            max_bytes
        )));
    }

    let mut text = String::new();
    file.take(max_bytes + 1).read_to_string(&mut text)?;
    if text.len() as u64 > max_bytes {
        return Err(ForecastError::DataSource(format!(
            "{} exceeded the {} byte limit while reading",
            path.display(),
            max_bytes
        )));
    }

    Ok(text)
}

/// Lenient calendar date parsing for CSV input
pub mod date_parser {
    use crate::error::{ForecastError, Result};
    use chrono::{DateTime, NaiveDate, NaiveDateTime};

    const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

    const DATETIME_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
    ];

    /// Parse a date or date-time string, keeping only the calendar date
    pub fn parse_date(input: &str) -> Result<NaiveDate> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ForecastError::InvalidParameter(
                "Empty date value".to_string(),
            ));
        }

        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
                return Ok(date);
            }
        }

        for format in DATETIME_FORMATS {
            if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Ok(datetime.date());
            }
        }

        if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(datetime.date_naive());
        }

        Err(ForecastError::InvalidParameter(format!(
            "Unrecognized date: {}",
            trimmed
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::date_parser::parse_date;
    use super::*;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case("2024-01-31", ymd(2024, 1, 31))]
    #[case(" 2024/02/29 ", ymd(2024, 2, 29))]
    #[case("03/15/2024", ymd(2024, 3, 15))]
    #[case("2024-01-31 23:59:59", ymd(2024, 1, 31))]
    #[case("2024-01-31T08:00:00.250", ymd(2024, 1, 31))]
    #[case("2024-01-31 08:00", ymd(2024, 1, 31))]
    #[case("2024-01-31T22:00:00+02:00", ymd(2024, 1, 31))]
    fn test_parse_date_formats(#[case] input: &str, #[case] expected: NaiveDate) {
        assert_eq!(parse_date(input).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("not a date")]
    #[case("2024-13-01")]
    #[case("2023-02-29")]
    fn test_parse_date_rejects(#[case] input: &str) {
        assert!(parse_date(input).is_err());
    }

    #[test]
    fn test_future_dates_cross_month() {
        let dates = future_dates(ymd(2024, 1, 30), 3).unwrap();
        assert_eq!(dates, vec![ymd(2024, 1, 31), ymd(2024, 2, 1), ymd(2024, 2, 2)]);
        assert!(future_dates(ymd(2024, 1, 30), 0).unwrap().is_empty());
    }

    #[test]
    fn test_future_dates_overflow() {
        assert!(future_dates(NaiveDate::MAX, 1).is_err());
    }

    #[test]
    fn test_read_capped() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "0123456789").unwrap();

        assert_eq!(read_to_string_capped(file.path(), 10).unwrap(), "0123456789");
        let err = read_to_string_capped(file.path(), 9).unwrap_err();
        assert!(matches!(err, ForecastError::DataSource(_)));
    }

    #[test]
    fn test_read_capped_missing_file() {
        let err = read_to_string_capped(Path::new("/nonexistent/file.csv"), 10).unwrap_err();
        assert!(matches!(err, ForecastError::IoError(_)));
    }
}
