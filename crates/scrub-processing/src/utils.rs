//! Shared utilities for the cleaning stages and the chart preparer.
//!
//! This module contains the dtype predicates, the literal parsers used by
//! the type coercer, and the label counting that both mode imputation and
//! category charts rely on.

use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;
use std::collections::HashMap;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType is a date/time type.
#[inline]
pub fn is_datetime_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Datetime(_, _) | DataType::Date | DataType::Time
    )
}

// =============================================================================
// Literal Parsing
// =============================================================================

// Plain decimal or scientific notation. Currency symbols, thousands
// separators and the words nan/inf do not match.
static NUMERIC_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?$").expect("Invalid regex: numeric")
});

static INTEGER_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?\d+$").expect("Invalid regex: integer"));

/// Parse a trimmed numeric literal.
///
/// ```rust,ignore
/// assert_eq!(parse_numeric_literal(" 2.5 "), Some(2.5));
/// assert_eq!(parse_numeric_literal("$3"), None);
/// ```
pub fn parse_numeric_literal(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if !NUMERIC_LITERAL.is_match(trimmed) {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Parse a trimmed integer literal that fits in an i64.
pub fn parse_integer_literal(s: &str) -> Option<i64> {
    let trimmed = s.trim();
    if !INTEGER_LITERAL.is_match(trimmed) {
        return None;
    }
    trimmed.trim_start_matches('+').parse::<i64>().ok()
}

// =============================================================================
// Series Statistics Utilities
// =============================================================================

/// How often a label occurs in a column, and where it first appears.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
    pub first_row: usize,
}

/// Count present values by their text form.
///
/// Sorted by descending count; equal counts keep first-appearance order, so
/// the head of the list is the mode with a deterministic tie break.
pub fn label_counts(series: &Series) -> PolarsResult<Vec<LabelCount>> {
    let as_text = series.cast(&DataType::String)?;
    let chunked = as_text.str()?;

    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<LabelCount> = Vec::new();

    for (row, value) in chunked.into_iter().enumerate() {
        let Some(value) = value else {
            continue;
        };
        match slots.get(value) {
            Some(&slot) => counts[slot].count += 1,
            None => {
                slots.insert(value, counts.len());
                counts.push(LabelCount {
                    label: value.to_string(),
                    count: 1,
                    first_row: row,
                });
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count).then(a.first_row.cmp(&b.first_row)));
    Ok(counts)
}

/// Most frequent present value of a Series, if any.
pub fn series_mode(series: &Series) -> PolarsResult<Option<LabelCount>> {
    Ok(label_counts(series)?.into_iter().next())
}

/// Present values of a Series as f64, in row order.
pub fn present_f64_values(series: &Series) -> PolarsResult<Vec<f64>> {
    let as_float = series.cast(&DataType::Float64)?;
    Ok(as_float.f64()?.into_iter().flatten().collect())
}

// =============================================================================
// Series Transformation Utilities
// =============================================================================

/// Fill null values in a numeric Series with a specific value.
pub fn fill_numeric_nulls(series: &Series, fill_value: f64) -> PolarsResult<Series> {
    let as_float = series.cast(&DataType::Float64)?;
    let filled: Vec<Option<f64>> = as_float
        .f64()?
        .into_iter()
        .map(|value| Some(value.unwrap_or(fill_value)))
        .collect();

    Ok(Series::new(series.name().clone(), filled))
}

/// Fill null values by repeating the value found at `source_row`.
///
/// Works for any dtype, so the filled column keeps the type it had.
pub fn fill_nulls_from_row(series: &Series, source_row: usize) -> PolarsResult<Series> {
    let mask = series.is_null();
    let indices: Vec<IdxSize> = (0..series.len())
        .map(|row| {
            if mask.get(row).unwrap_or(false) {
                source_row as IdxSize
            } else {
                row as IdxSize
            }
        })
        .collect();

    series.take(&IdxCa::from_vec("idx".into(), indices))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_numeric_dtype() {
        assert!(is_numeric_dtype(&DataType::Int64));
        assert!(is_numeric_dtype(&DataType::Float64));
        assert!(!is_numeric_dtype(&DataType::String));
        assert!(!is_numeric_dtype(&DataType::Boolean));
    }

    #[test]
    fn test_is_datetime_dtype() {
        assert!(is_datetime_dtype(&DataType::Date));
        assert!(is_datetime_dtype(&DataType::Datetime(
            TimeUnit::Milliseconds,
            None
        )));
        assert!(!is_datetime_dtype(&DataType::String));
    }

    #[test]
    fn test_parse_numeric_literal() {
        assert_eq!(parse_numeric_literal("42"), Some(42.0));
        assert_eq!(parse_numeric_literal(" -1.5 "), Some(-1.5));
        assert_eq!(parse_numeric_literal("1e3"), Some(1000.0));
        assert_eq!(parse_numeric_literal(".5"), Some(0.5));
        assert_eq!(parse_numeric_literal("$1,234"), None);
        assert_eq!(parse_numeric_literal("nan"), None);
        assert_eq!(parse_numeric_literal("inf"), None);
        assert_eq!(parse_numeric_literal(""), None);
        assert_eq!(parse_numeric_literal("12abc"), None);
    }

    #[test]
    fn test_parse_integer_literal() {
        assert_eq!(parse_integer_literal("7"), Some(7));
        assert_eq!(parse_integer_literal("+7"), Some(7));
        assert_eq!(parse_integer_literal("-12"), Some(-12));
        assert_eq!(parse_integer_literal("7.0"), None);
        assert_eq!(parse_integer_literal("99999999999999999999"), None);
    }

    #[test]
    fn test_label_counts_orders_by_count_then_first_seen() {
        let series = Series::new(
            "c".into(),
            &[Some("b"), Some("a"), None, Some("a"), Some("b"), Some("c")],
        );
        let counts = label_counts(&series).unwrap();

        let labels: Vec<_> = counts.iter().map(|c| (c.label.as_str(), c.count)).collect();
        assert_eq!(labels, vec![("b", 2), ("a", 2), ("c", 1)]);
        assert_eq!(counts[0].first_row, 0);
    }

    #[test]
    fn test_series_mode() {
        let series = Series::new("test".into(), &["a", "b", "a", "c", "a"]);
        assert_eq!(series_mode(&series).unwrap().unwrap().label, "a");

        let empty = Series::new("test".into(), &[Option::<&str>::None, None]);
        assert!(series_mode(&empty).unwrap().is_none());
    }

    #[test]
    fn test_fill_numeric_nulls() {
        let series = Series::new("test".into(), &[Some(1.0), None, Some(3.0)]);
        let filled = fill_numeric_nulls(&series, 0.0).unwrap();

        assert_eq!(filled.get(0).unwrap().try_extract::<f64>().unwrap(), 1.0);
        assert_eq!(filled.get(1).unwrap().try_extract::<f64>().unwrap(), 0.0);
        assert_eq!(filled.get(2).unwrap().try_extract::<f64>().unwrap(), 3.0);
    }

    #[test]
    fn test_fill_nulls_from_row_keeps_dtype() {
        let series = Series::new("flag".into(), &[Some(true), None, Some(false)]);
        let filled = fill_nulls_from_row(&series, 0).unwrap();

        assert_eq!(filled.dtype(), &DataType::Boolean);
        assert_eq!(filled.null_count(), 0);
        assert_eq!(filled.get(1).unwrap(), AnyValue::Boolean(true));
        assert_eq!(filled.get(2).unwrap(), AnyValue::Boolean(false));
    }

    #[test]
    fn test_present_f64_values() {
        let series = Series::new("n".into(), &[Some(1i64), None, Some(3)]);
        assert_eq!(present_f64_values(&series).unwrap(), vec![1.0, 3.0]);
    }
}
