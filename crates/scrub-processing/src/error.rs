//! Error types for the cleaning engine.
//!
//! Only boundary errors (unknown column, malformed input, bad configuration,
//! I/O) ever reach the caller. `NoValidValues` and `TypeConversionFailed` are
//! produced inside the stages and absorbed there; they exist as variants so
//! the per-column helpers can use `?` and the stages can log what was skipped.
//!
//! Errors serialize as `{code, message}` so a front end can branch on the code.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the cleaning engine.
#[derive(Error, Debug)]
pub enum ScrubError {
    /// Column was not found in the table.
    #[error("Column '{0}' not found in table")]
    ColumnNotFound(String),

    /// The input does not have the shape of a table.
    #[error("Malformed table: {0}")]
    MalformedTable(String),

    /// The requested chart kind is not offered for the column.
    #[error("Chart '{kind}' is not available for column '{column}'")]
    UnsupportedChart { column: String, kind: String },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No present values in a column to compute a statistic from.
    #[error("No valid values found in column '{0}'")]
    NoValidValues(String),

    /// A column could not be parsed into the attempted type.
    #[error("Failed to convert column '{column}' to {target_type}: {reason}")]
    TypeConversionFailed {
        column: String,
        target_type: String,
        reason: String,
    },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ScrubError>,
    },
}

impl ScrubError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ScrubError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code for front ends and scripts.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::MalformedTable(_) => "MALFORMED_TABLE",
            Self::UnsupportedChart { .. } => "UNSUPPORTED_CHART",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::NoValidValues(_) => "NO_VALID_VALUES",
            Self::TypeConversionFailed { .. } => "TYPE_CONVERSION_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Errors the stages swallow and turn into "leave the column unchanged".
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::NoValidValues(_) | Self::TypeConversionFailed { .. } => true,
            Self::WithContext { source, .. } => source.is_recoverable(),
            _ => false,
        }
    }

    pub(crate) fn conversion(
        column: impl Into<String>,
        target_type: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ScrubError::TypeConversionFailed {
            column: column.into(),
            target_type: target_type.into(),
            reason: reason.into(),
        }
    }
}

impl Serialize for ScrubError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("ScrubError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for cleaning operations.
pub type Result<T> = std::result::Result<T, ScrubError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| ScrubError::Polars(e).with_context(context))
    }
}
