//! Type coercion for re-inferring column types from untyped text.

use super::converters::{string_to_datetime, string_to_numeric};
use crate::config::{PipelineConfig, categorical_threshold};
use crate::error::Result;
use crate::table::{SemanticType, Table};
use crate::types::Retype;
use polars::prelude::*;
use tracing::{debug, info, warn};

/// A typed parse the coercer tries before falling back to cardinality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseAttempt {
    Numeric,
    Temporal,
}

impl ParseAttempt {
    /// Attempts in the order they are tried.
    const RANKED: [ParseAttempt; 2] = [ParseAttempt::Numeric, ParseAttempt::Temporal];

    fn target(self) -> SemanticType {
        match self {
            Self::Numeric => SemanticType::Numeric,
            Self::Temporal => SemanticType::Temporal,
        }
    }

    fn apply(self, series: &Series) -> Result<Series> {
        match self {
            Self::Numeric => string_to_numeric(series),
            Self::Temporal => string_to_datetime(series),
        }
    }
}

/// Result of running the coercer over a table.
#[derive(Debug, Clone)]
pub struct CoercionOutcome {
    pub table: Table,
    /// Columns whose declared type changed, in column order.
    pub retypes: Vec<Retype>,
}

/// Reclassifies text columns as numeric, temporal or categorical.
///
/// Columns already numeric or temporal are skipped, which makes a second
/// pass a no-op.
#[derive(Debug, Clone, Copy)]
pub struct TypeCoercer {
    max_categories: usize,
    categorical_ratio: f64,
}

impl Default for TypeCoercer {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

impl TypeCoercer {
    pub fn new(max_categories: usize, categorical_ratio: f64) -> Self {
        Self {
            max_categories,
            categorical_ratio,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.max_categories, config.categorical_ratio)
    }

    /// Coerce every unsettled column of `table`.
    pub fn coerce(&self, table: Table) -> CoercionOutcome {
        info!("Converting column types...");

        let mut table = table;
        let mut retypes = Vec::new();

        let columns: Vec<(String, SemanticType)> = table
            .columns()
            .map(|(name, semantic)| (name.to_string(), semantic))
            .collect();

        for (idx, (name, from)) in columns.into_iter().enumerate() {
            if from.is_settled() {
                continue;
            }

            match self.coerce_column(&mut table, idx, &name) {
                Ok(to) if to != from => {
                    let retype = Retype {
                        column: name,
                        from,
                        to,
                    };
                    debug!("{}", retype);
                    retypes.push(retype);
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("Type conversion failed for '{}', column left unchanged: {}", name, e);
                }
            }
        }

        info!("Retyped {} column(s)", retypes.len());
        CoercionOutcome { table, retypes }
    }

    /// Run the ranked cascade on one column and record the outcome.
    fn coerce_column(&self, table: &mut Table, idx: usize, name: &str) -> Result<SemanticType> {
        let series = table.series(name)?.clone();

        if series.dtype() == &DataType::String {
            for attempt in ParseAttempt::RANKED {
                match attempt.apply(&series) {
                    Ok(converted) => {
                        let target = attempt.target();
                        table.replace_column(name, converted, target)?;
                        return Ok(target);
                    }
                    Err(e) if e.is_recoverable() => {
                        debug!("'{}' is not {}: {}", name, attempt.target(), e);
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        let semantic = self.classify_by_cardinality(table, name)?;
        table.set_semantic_type(idx, semantic);
        Ok(semantic)
    }

    fn classify_by_cardinality(&self, table: &Table, name: &str) -> Result<SemanticType> {
        let distinct = table.distinct_count(name)?;
        let threshold =
            categorical_threshold(self.max_categories, self.categorical_ratio, table.height());

        if (distinct as f64) < threshold {
            Ok(SemanticType::Categorical)
        } else {
            Ok(SemanticType::Text)
        }
    }
}
