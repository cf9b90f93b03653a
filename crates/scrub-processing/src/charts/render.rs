//! Rendering seam and a plain-text renderer.

use super::data::{ChartData, NumericSummary, RenderRequest};
use crate::config::PlotTheme;
use crate::error::Result;
use std::fmt::Write as _;

/// An exportable chart buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedChart {
    pub media_type: String,
    pub bytes: Vec<u8>,
}

/// Draws a prepared chart.
pub trait ChartRenderer: Send + Sync {
    fn render(&self, request: &RenderRequest) -> Result<RenderedChart>;
}

/// Characters of bar per inch of figure width.
const CHARS_PER_INCH: f32 = 6.0;

/// Widest label column before labels are cut.
const MAX_LABEL_WIDTH: usize = 24;

/// Draws charts as horizontal text bars.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl TextRenderer {
    pub fn new() -> Self {
        Self
    }

    fn glyph(theme: PlotTheme) -> char {
        match theme {
            PlotTheme::Darkgrid => '█',
            PlotTheme::Whitegrid => '▓',
            PlotTheme::Dark => '■',
            PlotTheme::White => '░',
            PlotTheme::Ticks => '|',
        }
    }

    /// Render to a `String` instead of bytes.
    pub fn render_text(&self, request: &RenderRequest) -> String {
        let bar_width = ((request.style.figure_size.width * CHARS_PER_INCH).round() as usize).max(1);
        let glyph = Self::glyph(request.style.theme);

        let mut out = String::new();
        let _ = writeln!(out, "{}", request.title);
        let _ = writeln!(out, "{}", "=".repeat(request.title.chars().count()));

        match &request.data {
            ChartData::Histogram { bins, summary } => {
                let rows: Vec<(String, usize)> = bins
                    .iter()
                    .map(|bin| (format!("[{:.2}, {:.2}]", bin.lower, bin.upper), bin.count))
                    .collect();
                write_rows(&mut out, &rows, bar_width, glyph, |count| count.to_string());
                let _ = writeln!(out, "{}", summary_line(summary));
            }
            ChartData::Bar {
                categories,
                hidden_categories,
            } => {
                let rows: Vec<(String, usize)> = categories
                    .iter()
                    .map(|c| (c.label.clone(), c.count))
                    .collect();
                write_rows(&mut out, &rows, bar_width, glyph, |count| count.to_string());
                if *hidden_categories > 0 {
                    let _ = writeln!(out, "(+{} more categories)", hidden_categories);
                }
            }
            ChartData::Pie { slices } => {
                let label_width = label_width(slices.iter().map(|s| s.label.as_str()));
                for slice in slices {
                    let len = (slice.percentage / 100.0 * bar_width as f64).round() as usize;
                    let _ = writeln!(
                        out,
                        "{:<width$} | {} {:.1}%",
                        truncate(&slice.label),
                        glyph.to_string().repeat(len),
                        slice.percentage,
                        width = label_width
                    );
                }
            }
        }

        out
    }
}

impl ChartRenderer for TextRenderer {
    fn render(&self, request: &RenderRequest) -> Result<RenderedChart> {
        Ok(RenderedChart {
            media_type: "text/plain; charset=utf-8".to_string(),
            bytes: self.render_text(request).into_bytes(),
        })
    }
}

fn truncate(label: &str) -> String {
    if label.chars().count() <= MAX_LABEL_WIDTH {
        label.to_string()
    } else {
        let mut cut: String = label.chars().take(MAX_LABEL_WIDTH - 1).collect();
        cut.push('…');
        cut
    }
}

fn label_width<'a>(labels: impl Iterator<Item = &'a str>) -> usize {
    labels
        .map(|label| label.chars().count().min(MAX_LABEL_WIDTH))
        .max()
        .unwrap_or(0)
}

fn write_rows(
    out: &mut String,
    rows: &[(String, usize)],
    bar_width: usize,
    glyph: char,
    annotate: impl Fn(usize) -> String,
) {
    let max = rows.iter().map(|(_, count)| *count).max().unwrap_or(0);
    let width = label_width(rows.iter().map(|(label, _)| label.as_str()));

    for (label, count) in rows {
        let len = if max == 0 {
            0
        } else {
            (*count as f64 / max as f64 * bar_width as f64).round() as usize
        };
        let _ = writeln!(
            out,
            "{:<width$} | {} {}",
            truncate(label),
            glyph.to_string().repeat(len),
            annotate(*count),
            width = width
        );
    }
}

fn summary_line(summary: &NumericSummary) -> String {
    let fmt = |value: Option<f64>| value.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}", v));
    format!(
        "Mean: {}  Median: {}  Std: {}",
        fmt(summary.mean),
        fmt(summary.median),
        fmt(summary.std_dev)
    )
}
