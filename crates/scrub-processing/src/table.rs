//! The table threaded through the cleaning stages.
//!
//! A [`Table`] is a polars [`DataFrame`] plus one declared [`SemanticType`] per
//! column. The frame carries the values (nulls are the Missing marker), the
//! declared types carry the stage decisions that a dtype alone cannot express,
//! such as "this String column is a bounded label set".

use crate::error::{Result, ScrubError};
use crate::utils::{is_datetime_dtype, is_numeric_dtype};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inferred logical category of a column's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    Numeric,
    Temporal,
    /// Text with a bounded set of distinct labels.
    Categorical,
    /// Free text; also the fallback for anything unrecognised.
    #[default]
    Text,
}

impl SemanticType {
    /// Derive the initial semantic type from a polars dtype.
    pub fn from_dtype(dtype: &DataType) -> Self {
        if is_numeric_dtype(dtype) {
            SemanticType::Numeric
        } else if is_datetime_dtype(dtype) {
            SemanticType::Temporal
        } else if matches!(
            dtype,
            DataType::Boolean | DataType::Categorical(..) | DataType::Enum(..)
        ) {
            SemanticType::Categorical
        } else {
            SemanticType::Text
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Temporal => "temporal",
            Self::Categorical => "categorical",
            Self::Text => "text",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Numeric)
    }

    /// Numeric and Temporal columns are final; the coercer never revisits them.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Numeric | Self::Temporal)
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered set of named columns with a declared semantic type each.
///
/// Cloning is cheap: polars columns are reference counted, so a stage that
/// takes a `Table` by value and rebuilds a few columns never disturbs a copy
/// the caller kept.
#[derive(Debug, Clone)]
pub struct Table {
    frame: DataFrame,
    semantic_types: Vec<SemanticType>,
}

static_assertions::assert_impl_all!(Table: Send);

impl Table {
    /// Wrap a frame, deriving each column's semantic type from its dtype.
    pub fn new(frame: DataFrame) -> Self {
        let semantic_types = frame
            .get_columns()
            .iter()
            .map(|col| SemanticType::from_dtype(col.dtype()))
            .collect();
        Self {
            frame,
            semantic_types,
        }
    }

    /// Override the declared type of one column.
    ///
    /// Useful when a loader knows more than the dtype says (e.g. a String
    /// column that is known to hold labels).
    pub fn with_semantic_type(mut self, name: &str, semantic: SemanticType) -> Result<Self> {
        let idx = self.index_of(name)?;
        self.semantic_types[idx] = semantic;
        Ok(self)
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.frame.width()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect()
    }

    /// Iterate `(name, declared type)` pairs in column order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, SemanticType)> + '_ {
        self.frame
            .get_columns()
            .iter()
            .zip(self.semantic_types.iter().copied())
            .map(|(col, semantic)| (col.name().as_str(), semantic))
    }

    /// Position of a column, or `ColumnNotFound`.
    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.frame
            .get_column_index(name)
            .ok_or_else(|| ScrubError::ColumnNotFound(name.to_string()))
    }

    /// Values of a column.
    pub fn series(&self, name: &str) -> Result<&Series> {
        let idx = self.index_of(name)?;
        Ok(self.frame.get_columns()[idx].as_materialized_series())
    }

    pub fn semantic_type(&self, name: &str) -> Result<SemanticType> {
        let idx = self.index_of(name)?;
        Ok(self.semantic_types[idx])
    }

    /// Count of distinct present values in a column.
    pub fn distinct_count(&self, name: &str) -> Result<usize> {
        let series = self.series(name)?;
        Ok(series.drop_nulls().n_unique()?)
    }

    /// Total number of Missing markers across all columns.
    pub fn missing_count(&self) -> usize {
        self.frame
            .get_columns()
            .iter()
            .map(|col| col.null_count())
            .sum()
    }

    /// Swap in new values for a column and record its declared type.
    pub(crate) fn replace_column(
        &mut self,
        name: &str,
        series: Series,
        semantic: SemanticType,
    ) -> Result<()> {
        let idx = self.index_of(name)?;
        self.frame.replace(name, series)?;
        self.semantic_types[idx] = semantic;
        Ok(())
    }

    pub(crate) fn set_semantic_type(&mut self, idx: usize, semantic: SemanticType) {
        self.semantic_types[idx] = semantic;
    }

    /// Drop rows equal to an earlier row, keeping first occurrences in order.
    pub(crate) fn unique_rows(&self) -> Result<Self> {
        let frame = self
            .frame
            .unique_stable(None, UniqueKeepStrategy::First, None)?;
        Ok(Self {
            frame,
            semantic_types: self.semantic_types.clone(),
        })
    }
}

/// Two tables are equal when they declare the same types and hold the same
/// values, with Missing equal to Missing.
impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.semantic_types == other.semantic_types && self.frame.equals_missing(&other.frame)
    }
}

impl From<DataFrame> for Table {
    fn from(frame: DataFrame) -> Self {
        Table::new(frame)
    }
}
