use crate::table::{SemanticType, Table};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a column's Missing markers were filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum ImputationStrategy {
    /// Median of the present values.
    Median { value: f64 },
    /// Carry the last known value forward, then the first known value backward.
    ForwardBackwardFill,
    /// Most frequent present value (shown in its text form).
    Mode { value: String },
}

impl fmt::Display for ImputationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Median { value } => write!(f, "median: {:.2}", value),
            Self::ForwardBackwardFill => f.write_str("forward/backward fill"),
            Self::Mode { value } => write!(f, "mode: '{}'", value),
        }
    }
}

/// One column's imputation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Imputation {
    pub column: String,
    pub strategy: ImputationStrategy,
    /// Number of Missing markers replaced.
    pub filled: usize,
}

impl fmt::Display for Imputation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Filled {} missing value(s) in '{}' with {}",
            self.filled, self.column, self.strategy
        )
    }
}

/// One column whose declared type changed during coercion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Retype {
    pub column: String,
    pub from: SemanticType,
    pub to: SemanticType,
}

impl fmt::Display for Retype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Converted '{}' from {} to {}", self.column, self.from, self.to)
    }
}

/// What a pipeline run did, for display and for the JSON report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleaningSummary {
    /// Total execution time in milliseconds.
    pub duration_ms: u64,

    pub rows_before: usize,
    pub rows_after: usize,
    pub columns: usize,

    /// Missing markers in the input and in the output.
    pub missing_before: usize,
    pub missing_after: usize,

    /// Rows dropped by the duplicate eliminator.
    pub duplicates_removed: usize,

    pub imputations: Vec<Imputation>,
    pub retypes: Vec<Retype>,

    /// Final declared type of every column, in column order.
    pub column_types: Vec<(String, SemanticType)>,

    /// Human-readable log of the steps taken.
    pub steps: Vec<String>,
}

impl CleaningSummary {
    pub fn new(table: &Table) -> Self {
        Self {
            rows_before: table.height(),
            rows_after: table.height(),
            columns: table.width(),
            missing_before: table.missing_count(),
            missing_after: table.missing_count(),
            ..Default::default()
        }
    }

    /// Record the final shape of the cleaned table.
    pub fn finish(&mut self, table: &Table, duration_ms: u64) {
        self.rows_after = table.height();
        self.columns = table.width();
        self.missing_after = table.missing_count();
        self.column_types = table
            .columns()
            .map(|(name, semantic)| (name.to_string(), semantic))
            .collect();
        self.duration_ms = duration_ms;
    }
}

/// The cleaned table together with its summary.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub table: Table,
    pub summary: CleaningSummary,
}
