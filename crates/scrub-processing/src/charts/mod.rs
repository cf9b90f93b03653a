//! Chart selection, data preparation and rendering.
//!
//! The selector decides which chart families suit a column, the preparer
//! aggregates the column into a [`RenderRequest`], and a [`ChartRenderer`]
//! draws it.

mod data;
mod render;
mod selector;

pub use data::{
    CategoryCount, ChartData, ChartPreparer, HistogramBin, NumericSummary, PieSlice,
    RenderRequest, prepare_chart,
};
pub use render::{ChartRenderer, RenderedChart, TextRenderer};
pub use selector::{ChartKind, ChartOptions, ChartSelector, available_charts, select_charts};
