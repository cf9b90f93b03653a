//! Tabular Cleaning Library
//!
//! Column-level cleaning heuristics and chart selection built on Polars.
//!
//! # Overview
//!
//! - **Missing Values**: median for numeric columns, forward/backward fill for
//!   temporal columns, mode for categorical and text columns
//! - **Duplicates**: whole-row duplicate removal keeping the first occurrence
//! - **Type Coercion**: text columns re-inferred as numeric, temporal or
//!   categorical, all-or-nothing per column
//! - **Charts**: chart-family selection, chart data preparation and a plain
//!   text renderer
//! - **Progress Reporting**: stage-by-stage progress updates
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use scrub_processing::{Pipeline, PipelineConfig, io};
//! use scrub_processing::charts::{ChartRenderer, TextRenderer, prepare_chart, select_charts};
//! use scrub_processing::config::ChartStyle;
//!
//! let table = io::load_csv("data.csv")?;
//!
//! let result = Pipeline::builder()
//!     .config(PipelineConfig::builder().remove_duplicates(true).build()?)
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .process(table)?;
//!
//! io::write_csv(&result.table, "cleaned.csv")?;
//!
//! let kind = select_charts(&result.table, "price")?.preferred();
//! let request = prepare_chart(&result.table, "price", kind, &ChartStyle::default())?;
//! let chart = TextRenderer::new().render(&request)?;
//! ```
//!
//! # Errors
//!
//! Only boundary errors reach the caller: an unknown column, a malformed
//! input, a chart kind the column does not support, invalid configuration
//! and I/O failures. Per-column problems inside the stages leave the column
//! unchanged and are logged.

pub mod charts;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod imputers;
pub mod io;
pub mod pipeline;
pub mod table;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use charts::{
    ChartData, ChartKind, ChartOptions, ChartRenderer, RenderRequest, RenderedChart, TextRenderer,
    available_charts, prepare_chart, select_charts,
};
pub use cleaner::{CoercionOutcome, DedupOutcome, DuplicateEliminator, TypeCoercer};
pub use config::{
    ChartStyle, ConfigValidationError, FigureSize, PipelineConfig, PipelineConfigBuilder,
    PlotTheme,
};
pub use error::{Result as ScrubResult, ResultExt, ScrubError};
pub use imputers::{MissingValueResolver, ResolveOutcome};
pub use pipeline::{
    CleaningStage, ClosureProgressReporter, Pipeline, PipelineBuilder, ProgressReporter,
    ProgressUpdate,
};
pub use table::{SemanticType, Table};
pub use types::{CleaningSummary, Imputation, ImputationStrategy, PipelineResult, Retype};
