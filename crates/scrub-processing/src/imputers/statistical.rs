//! Statistical imputation methods.
//!
//! Provides median, fill-propagation and mode imputation, dispatched on the
//! declared [`SemanticType`] of each column.

use crate::error::{Result, ScrubError};
use crate::table::{SemanticType, Table};
use crate::types::{Imputation, ImputationStrategy};
use crate::utils::{fill_nulls_from_row, fill_numeric_nulls, is_numeric_dtype, series_mode};
use polars::prelude::*;
use tracing::{debug, info, warn};

/// Result of running the resolver over a table.
#[derive(Debug, Clone)]
pub struct ResolveOutcome {
    pub table: Table,
    /// One record per column that had values filled, in column order.
    pub imputations: Vec<Imputation>,
}

/// Fills Missing markers column by column.
///
/// Columns without gaps and columns without any present value are left as
/// they are. The stage never fails: a column that cannot be filled is logged
/// and kept unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct MissingValueResolver;

impl MissingValueResolver {
    pub fn new() -> Self {
        Self
    }

    /// Impute every column of `table` and return the filled copy.
    pub fn resolve(&self, table: Table) -> ResolveOutcome {
        info!("Resolving missing values...");

        let mut table = table;
        let mut imputations = Vec::new();

        let columns: Vec<(String, SemanticType)> = table
            .columns()
            .map(|(name, semantic)| (name.to_string(), semantic))
            .collect();

        for (name, semantic) in columns {
            match Self::resolve_column(&table, &name, semantic) {
                Ok(Some((filled, imputation))) => {
                    if let Err(e) = table.replace_column(&name, filled, semantic) {
                        warn!("Could not store imputed column '{}': {}", name, e);
                        continue;
                    }
                    debug!("{}", imputation);
                    imputations.push(imputation);
                }
                Ok(None) => {}
                Err(e) if e.is_recoverable() => {
                    debug!("Skipping imputation for '{}': {}", name, e);
                }
                Err(e) => {
                    warn!("Imputation failed for '{}', column left unchanged: {}", name, e);
                }
            }
        }

        info!("Imputed {} column(s)", imputations.len());
        ResolveOutcome { table, imputations }
    }

    /// Work out the filled values for one column, or `None` if it has no gaps.
    fn resolve_column(
        table: &Table,
        name: &str,
        semantic: SemanticType,
    ) -> Result<Option<(Series, Imputation)>> {
        let series = table.series(name)?;
        let missing = series.null_count();

        if missing == 0 {
            return Ok(None);
        }
        if missing == series.len() {
            return Err(ScrubError::NoValidValues(name.to_string()));
        }

        let (filled, strategy) = match semantic {
            SemanticType::Numeric if is_numeric_dtype(series.dtype()) => {
                Self::apply_median(series, name)?
            }
            // Declared numeric over a non-numeric dtype has no median.
            SemanticType::Numeric => Self::apply_mode(series, name)?,
            SemanticType::Temporal => Self::apply_forward_backward_fill(series)?,
            SemanticType::Categorical | SemanticType::Text => Self::apply_mode(series, name)?,
        };

        let imputation = Imputation {
            column: name.to_string(),
            strategy,
            filled: missing - filled.null_count(),
        };
        Ok(Some((filled, imputation)))
    }

    fn apply_median(series: &Series, name: &str) -> Result<(Series, ImputationStrategy)> {
        let median = series
            .median()
            .ok_or_else(|| ScrubError::NoValidValues(name.to_string()))?;
        let filled = fill_numeric_nulls(series, median)?;
        Ok((filled, ImputationStrategy::Median { value: median }))
    }

    fn apply_forward_backward_fill(series: &Series) -> Result<(Series, ImputationStrategy)> {
        let filled = series.fill_null(FillNullStrategy::Forward(None))?;
        let filled = filled.fill_null(FillNullStrategy::Backward(None))?;
        Ok((filled, ImputationStrategy::ForwardBackwardFill))
    }

    fn apply_mode(series: &Series, name: &str) -> Result<(Series, ImputationStrategy)> {
        let mode = series_mode(series)?.ok_or_else(|| ScrubError::NoValidValues(name.to_string()))?;
        let filled = fill_nulls_from_row(series, mode.first_row)?;
        Ok((filled, ImputationStrategy::Mode { value: mode.label }))
    }
}
