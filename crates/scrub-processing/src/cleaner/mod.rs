//! Data cleaning module for tabular datasets.
//!
//! This module provides functionality for:
//! - Removing duplicate rows
//! - Type coercion of text columns

mod converters;
mod type_corrector;

pub use type_corrector::{CoercionOutcome, TypeCoercer};

use crate::table::Table;
use tracing::{debug, info, warn};

/// Result of running the duplicate eliminator.
#[derive(Debug, Clone)]
pub struct DedupOutcome {
    pub table: Table,
    pub rows_removed: usize,
}

/// Removes rows that repeat an earlier row exactly.
///
/// Values are compared with polars row equality, Missing equal to Missing.
/// The first occurrence is kept and retained rows keep their relative order.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateEliminator;

impl DuplicateEliminator {
    pub fn new() -> Self {
        Self
    }

    pub fn dedupe(&self, table: Table) -> DedupOutcome {
        info!("Removing duplicate rows...");

        let before = table.height();
        let deduped = match table.unique_rows() {
            Ok(deduped) => deduped,
            Err(e) => {
                warn!("Could not drop duplicate rows: {}", e);
                return DedupOutcome {
                    table,
                    rows_removed: 0,
                };
            }
        };

        let rows_removed = before - deduped.height();
        if rows_removed == 0 {
            debug!("No duplicate rows found");
            return DedupOutcome {
                table,
                rows_removed,
            };
        }

        let pct = (rows_removed as f64 / before as f64) * 100.0;
        info!("Removed {} duplicate rows ({:.1}%)", rows_removed, pct);
        DedupOutcome {
            table: deduped,
            rows_removed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::SemanticType;
    use polars::prelude::*;
    use pretty_assertions::assert_eq;

    fn sample_table() -> Table {
        Table::new(
            df![
                "id" => [1i64, 2, 1, 3, 2, 1],
                "name" => [Some("a"), Some("b"), Some("a"), None, Some("b"), Some("x")],
            ]
            .unwrap(),
        )
    }

    #[test]
    fn test_removes_exact_duplicates_keeping_first() {
        let outcome = DuplicateEliminator::new().dedupe(sample_table());

        assert_eq!(outcome.rows_removed, 2);
        let expected = Table::new(
            df![
                "id" => [1i64, 2, 3, 1],
                "name" => [Some("a"), Some("b"), None, Some("x")],
            ]
            .unwrap(),
        );
        assert_eq!(outcome.table, expected);
    }

    #[test]
    fn test_missing_equals_missing() {
        let table = Table::new(
            df![
                "a" => [None, Some(1.0), None],
                "b" => [Some("k"), Some("k"), Some("k")],
            ]
            .unwrap(),
        );
        let outcome = DuplicateEliminator::new().dedupe(table);

        assert_eq!(outcome.rows_removed, 1);
        assert_eq!(outcome.table.height(), 2);
    }

    #[test]
    fn test_signed_zero_rows_are_duplicates() {
        let table = Table::new(df!["v" => [0.0f64, -0.0]].unwrap());
        let outcome = DuplicateEliminator::new().dedupe(table);

        assert_eq!(outcome.rows_removed, 1);
        assert_eq!(outcome.table.height(), 1);
    }

    #[test]
    fn test_no_duplicates_leaves_table_untouched() {
        let table = Table::new(df!["v" => [1i64, 2, 3]].unwrap());
        let outcome = DuplicateEliminator::new().dedupe(table.clone());

        assert_eq!(outcome.rows_removed, 0);
        assert_eq!(outcome.table, table);
    }

    #[test]
    fn test_dedupe_is_idempotent() {
        let eliminator = DuplicateEliminator::new();
        let once = eliminator.dedupe(sample_table());
        let twice = eliminator.dedupe(once.table.clone());

        assert_eq!(twice.rows_removed, 0);
        assert_eq!(twice.table, once.table);
    }

    #[test]
    fn test_declared_types_survive() {
        let table = Table::new(df!["c" => ["a", "a"]].unwrap())
            .with_semantic_type("c", SemanticType::Categorical)
            .unwrap();
        let outcome = DuplicateEliminator::new().dedupe(table);

        assert_eq!(outcome.table.semantic_type("c").unwrap(), SemanticType::Categorical);
        assert_eq!(outcome.table.height(), 1);
    }

    #[test]
    fn test_empty_table() {
        let table = Table::new(df!["v" => Vec::<i64>::new()].unwrap());
        let outcome = DuplicateEliminator::new().dedupe(table);
        assert_eq!(outcome.rows_removed, 0);
        assert_eq!(outcome.table.height(), 0);
    }
}
