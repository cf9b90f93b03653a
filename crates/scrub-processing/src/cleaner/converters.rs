//! Type conversion functions for data cleaning.
//!
//! Each converter is all-or-nothing: the first present value that does not
//! parse aborts the conversion with `TypeConversionFailed`, and a column
//! without present values fails with `NoValidValues`.

use crate::error::{Result, ScrubError};
use crate::utils::{parse_integer_literal, parse_numeric_literal};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d.%m.%Y",
    "%b %d, %Y",
    "%d %b %Y",
    "%B %d, %Y",
];

/// Parse a date or date-time literal into milliseconds since the epoch.
pub(crate) fn parse_temporal_literal(s: &str) -> Option<i64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.timestamp_millis());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return date
                .and_hms_opt(0, 0, 0)
                .map(|dt| dt.and_utc().timestamp_millis());
        }
    }

    None
}

fn require_present_values(series: &Series) -> Result<()> {
    if series.len() == series.null_count() {
        return Err(ScrubError::NoValidValues(series.name().to_string()));
    }
    Ok(())
}

/// Convert a String series to Int64 when every value is an integer literal,
/// otherwise to Float64.
pub(crate) fn string_to_numeric(series: &Series) -> Result<Series> {
    require_present_values(series)?;
    let name = series.name().clone();
    let str_series = series.str()?;

    let integers: Option<Vec<Option<i64>>> = str_series
        .into_iter()
        .map(|opt_val| match opt_val {
            Some(val) => parse_integer_literal(val).map(Some),
            None => Some(None),
        })
        .collect();
    if let Some(integers) = integers {
        return Ok(Series::new(name, integers));
    }

    let mut result_vec: Vec<Option<f64>> = Vec::with_capacity(str_series.len());
    for opt_val in str_series.into_iter() {
        match opt_val {
            Some(val) => match parse_numeric_literal(val) {
                Some(parsed) => result_vec.push(Some(parsed)),
                None => {
                    return Err(ScrubError::conversion(
                        name.as_str(),
                        "numeric",
                        format!("unparsable value '{}'", val),
                    ));
                }
            },
            None => result_vec.push(None),
        }
    }

    Ok(Series::new(name, result_vec))
}

/// Convert a String series to `Datetime(ms)`.
pub(crate) fn string_to_datetime(series: &Series) -> Result<Series> {
    require_present_values(series)?;
    let name = series.name().clone();
    let str_series = series.str()?;

    let mut timestamps: Vec<Option<i64>> = Vec::with_capacity(str_series.len());
    for opt_val in str_series.into_iter() {
        match opt_val {
            Some(val) => match parse_temporal_literal(val) {
                Some(ms) => timestamps.push(Some(ms)),
                None => {
                    return Err(ScrubError::conversion(
                        name.as_str(),
                        "temporal",
                        format!("unparsable value '{}'", val),
                    ));
                }
            },
            None => timestamps.push(None),
        }
    }

    let timestamp_series = Series::new(name, timestamps);
    Ok(timestamp_series.cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY_MS: i64 = 86_400_000;
    // 2024-01-01T00:00:00Z
    const JAN_1_2024: i64 = 1_704_067_200_000;

    // ========================================================================
    // parse_temporal_literal() tests
    // ========================================================================

    #[test]
    fn test_parse_temporal_date_formats() {
        for literal in [
            "2024-01-01",
            "2024/01/01",
            "01/01/2024",
            "01-01-2024",
            "01.01.2024",
            "Jan 01, 2024",
            "1 Jan 2024",
            "January 1, 2024",
        ] {
            assert_eq!(parse_temporal_literal(literal), Some(JAN_1_2024), "{literal}");
        }
    }

    #[test]
    fn test_parse_temporal_datetime_formats() {
        let noon = JAN_1_2024 + 12 * 3_600_000;
        assert_eq!(parse_temporal_literal("2024-01-01 12:00:00"), Some(noon));
        assert_eq!(parse_temporal_literal("2024-01-01T12:00:00"), Some(noon));
        assert_eq!(parse_temporal_literal("2024-01-01 12:00"), Some(noon));
        assert_eq!(parse_temporal_literal("2024-01-01T12:00:00.250"), Some(noon + 250));
        assert_eq!(parse_temporal_literal("2024-01-01T13:00:00+01:00"), Some(noon));
    }

    #[test]
    fn test_parse_temporal_rejects_non_dates() {
        assert_eq!(parse_temporal_literal("hello"), None);
        assert_eq!(parse_temporal_literal("2024-13-01"), None);
        assert_eq!(parse_temporal_literal("42"), None);
        assert_eq!(parse_temporal_literal("  "), None);
    }

    // ========================================================================
    // string_to_numeric() tests
    // ========================================================================

    #[test]
    fn test_string_to_numeric_integers() {
        let series = Series::new("values".into(), &[Some("1"), None, Some(" 3 ")]);
        let result = string_to_numeric(&series).unwrap();

        assert_eq!(result.dtype(), &DataType::Int64);
        let values: Vec<Option<i64>> = result.i64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(1), None, Some(3)]);
    }

    #[test]
    fn test_string_to_numeric_floats() {
        let series = Series::new("values".into(), &["1", "2.5", "-3e2"]);
        let result = string_to_numeric(&series).unwrap();

        assert_eq!(result.dtype(), &DataType::Float64);
        let values: Vec<Option<f64>> = result.f64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(1.0), Some(2.5), Some(-300.0)]);
    }

    #[test]
    fn test_string_to_numeric_is_all_or_nothing() {
        let series = Series::new("values".into(), &["1", "2", "three"]);
        let err = string_to_numeric(&series).unwrap_err();

        assert!(err.is_recoverable());
        assert!(err.to_string().contains("three"));
    }

    #[test]
    fn test_string_to_numeric_all_missing() {
        let series = Series::new("values".into(), &[Option::<&str>::None, None]);
        let err = string_to_numeric(&series).unwrap_err();
        assert!(matches!(err, ScrubError::NoValidValues(_)));
    }

    // ========================================================================
    // string_to_datetime() tests
    // ========================================================================

    #[test]
    fn test_string_to_datetime() {
        let series = Series::new("when".into(), &[Some("2024-01-01"), None, Some("2024-01-02")]);
        let result = string_to_datetime(&series).unwrap();

        assert_eq!(
            result.dtype(),
            &DataType::Datetime(TimeUnit::Milliseconds, None)
        );
        let raw = result.cast(&DataType::Int64).unwrap();
        let values: Vec<Option<i64>> = raw.i64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(JAN_1_2024), None, Some(JAN_1_2024 + DAY_MS)]);
    }

    #[test]
    fn test_string_to_datetime_is_all_or_nothing() {
        let series = Series::new("when".into(), &["2024-01-01", "soon"]);
        let err = string_to_datetime(&series).unwrap_err();
        assert_eq!(err.error_code(), "TYPE_CONVERSION_FAILED");
    }
}
