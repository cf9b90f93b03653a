//! Chart-kind selection from a column's semantic type and cardinality.

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::table::{SemanticType, Table};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Chart families the engine can prepare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Histogram,
    Bar,
    Pie,
}

impl ChartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Histogram => "histogram",
            Self::Bar => "bar",
            Self::Pie => "pie",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "histogram" | "hist" => Ok(Self::Histogram),
            "bar" => Ok(Self::Bar),
            "pie" => Ok(Self::Pie),
            other => Err(format!("unknown chart kind '{}'", other)),
        }
    }
}

/// The chart kinds offered for a column, preferred kind first.
///
/// Only built by [`ChartSelector`], so `kinds` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartOptions {
    kinds: Vec<ChartKind>,
}

static_assertions::assert_not_impl_any!(ChartOptions: serde::de::DeserializeOwned, Default);

impl ChartOptions {
    pub fn kinds(&self) -> &[ChartKind] {
        &self.kinds
    }

    pub fn contains(&self, kind: ChartKind) -> bool {
        self.kinds.contains(&kind)
    }

    /// The kind drawn when the caller does not ask for one.
    pub fn preferred(&self) -> ChartKind {
        self.kinds[0]
    }
}

/// Decides which chart families suit a column.
#[derive(Debug, Clone, Copy)]
pub struct ChartSelector {
    pie_category_limit: usize,
}

impl Default for ChartSelector {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

impl ChartSelector {
    pub fn new(pie_category_limit: usize) -> Self {
        Self { pie_category_limit }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.pie_category_limit)
    }

    pub fn available(&self, semantic: SemanticType, distinct_count: usize) -> ChartOptions {
        let kinds = if semantic.is_numeric() {
            vec![ChartKind::Histogram]
        } else if distinct_count <= self.pie_category_limit {
            vec![ChartKind::Bar, ChartKind::Pie]
        } else {
            vec![ChartKind::Bar]
        };
        ChartOptions { kinds }
    }

    /// Resolve `column` in `table` and decide its chart kinds.
    pub fn select(&self, table: &Table, column: &str) -> Result<ChartOptions> {
        let semantic = table.semantic_type(column)?;
        let distinct = table.distinct_count(column)?;
        Ok(self.available(semantic, distinct))
    }
}

/// Chart kinds for a column with the given type and distinct-value count.
pub fn available_charts(semantic: SemanticType, distinct_count: usize) -> ChartOptions {
    ChartSelector::default().available(semantic, distinct_count)
}

/// Chart kinds for a named column of `table`.
pub fn select_charts(table: &Table, column: &str) -> Result<ChartOptions> {
    ChartSelector::default().select(table, column)
}
