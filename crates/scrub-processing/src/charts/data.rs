//! Chart data preparation.
//!
//! Heavy work (binning, counting, sorting) happens here so a renderer only
//! has to draw what it is handed.

use super::selector::{ChartKind, ChartSelector};
use crate::config::{ChartStyle, PipelineConfig};
use crate::error::{Result, ScrubError};
use crate::table::Table;
use crate::utils::{label_counts, present_f64_values};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One equal-width histogram bin. The last bin includes its upper edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Summary statistics shown alongside a histogram.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    /// Sample standard deviation; needs at least two values.
    pub std_dev: Option<f64>,
}

impl NumericSummary {
    pub fn from_values(values: &[f64]) -> Self {
        let count = values.len();
        if count == 0 {
            return Self::default();
        }

        let mean = values.iter().sum::<f64>() / count as f64;

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let median = if count % 2 == 0 {
            (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
        } else {
            sorted[count / 2]
        };

        let std_dev = (count > 1).then(|| {
            let variance =
                values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
            variance.sqrt()
        });

        Self {
            count,
            mean: Some(mean),
            median: Some(median),
            std_dev,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieSlice {
    pub label: String,
    pub count: usize,
    /// Share of all present values, 0-100.
    pub percentage: f64,
}

/// Aggregated values for one chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChartData {
    Histogram {
        bins: Vec<HistogramBin>,
        summary: NumericSummary,
    },
    Bar {
        /// Descending by count; equal counts in first-appearance order.
        categories: Vec<CategoryCount>,
        /// Categories beyond the display cap.
        hidden_categories: usize,
    },
    Pie {
        slices: Vec<PieSlice>,
    },
}

/// Everything a renderer needs to draw a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderRequest {
    pub column: String,
    pub kind: ChartKind,
    pub title: String,
    pub style: ChartStyle,
    pub data: ChartData,
}

/// Builds render requests for table columns.
#[derive(Debug, Clone, Copy)]
pub struct ChartPreparer {
    selector: ChartSelector,
    bar_category_cap: usize,
}

impl Default for ChartPreparer {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

impl ChartPreparer {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            selector: ChartSelector::from_config(config),
            bar_category_cap: config.bar_category_cap,
        }
    }

    /// Aggregate `column` for a chart of the given kind.
    ///
    /// Fails with `ColumnNotFound` for an unknown column and with
    /// `UnsupportedChart` when `kind` is not offered for it.
    pub fn prepare(
        &self,
        table: &Table,
        column: &str,
        kind: ChartKind,
        style: &ChartStyle,
    ) -> Result<RenderRequest> {
        style
            .validate()
            .map_err(|e| ScrubError::InvalidConfig(e.to_string()))?;

        let options = self.selector.select(table, column)?;
        if !options.contains(kind) {
            return Err(ScrubError::UnsupportedChart {
                column: column.to_string(),
                kind: kind.to_string(),
            });
        }

        let series = table.series(column)?;
        let data = match kind {
            ChartKind::Histogram => {
                let values: Vec<f64> = present_f64_values(series)?
                    .into_iter()
                    .filter(|v| v.is_finite())
                    .collect();
                ChartData::Histogram {
                    bins: histogram_bins(&values, style.bin_count),
                    summary: NumericSummary::from_values(&values),
                }
            }
            ChartKind::Bar => {
                let counts = label_counts(series)?;
                let hidden_categories = counts.len().saturating_sub(self.bar_category_cap);
                let categories = counts
                    .into_iter()
                    .take(self.bar_category_cap)
                    .map(|c| CategoryCount {
                        label: c.label,
                        count: c.count,
                    })
                    .collect();
                ChartData::Bar {
                    categories,
                    hidden_categories,
                }
            }
            ChartKind::Pie => {
                let counts = label_counts(series)?;
                let total: usize = counts.iter().map(|c| c.count).sum();
                let slices = counts
                    .into_iter()
                    .map(|c| PieSlice {
                        percentage: c.count as f64 / total as f64 * 100.0,
                        label: c.label,
                        count: c.count,
                    })
                    .collect();
                ChartData::Pie { slices }
            }
        };

        let title = style.title.clone().unwrap_or_else(|| match kind {
            ChartKind::Histogram => format!("Histogram of {}", column),
            ChartKind::Bar | ChartKind::Pie => format!("Distribution of {}", column),
        });

        let mut style = style.clone();
        style.figure_size = style.figure_size.clamped();

        debug!("Prepared {} chart for '{}'", kind, column);
        Ok(RenderRequest {
            column: column.to_string(),
            kind,
            title,
            style,
            data,
        })
    }
}

/// Prepare a chart with the default limits.
pub fn prepare_chart(
    table: &Table,
    column: &str,
    kind: ChartKind,
    style: &ChartStyle,
) -> Result<RenderRequest> {
    ChartPreparer::default().prepare(table, column, kind, style)
}

/// Split `values` into `bin_count` equal-width bins over their range.
fn histogram_bins(values: &[f64], bin_count: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bin_count == 0 {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (low, high) = if min == max {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    };
    let width = (high - low) / bin_count as f64;

    let mut bins: Vec<HistogramBin> = (0..bin_count)
        .map(|i| HistogramBin {
            lower: low + width * i as f64,
            upper: if i + 1 == bin_count {
                high
            } else {
                low + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();

    for value in values {
        let slot = (((value - low) / width).floor() as usize).min(bin_count - 1);
        bins[slot].count += 1;
    }

    bins
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FigureSize;
    use polars::prelude::*;

    fn fruit_table() -> Table {
        Table::new(
            df![
                "score" => [Some(1.0), Some(2.0), None, Some(3.0), Some(4.0), Some(10.0)],
                "fruit" => ["apple", "pear", "apple", "fig", "apple", "pear"],
            ]
            .unwrap(),
        )
    }

    // =========================================================================
    // Histogram
    // =========================================================================

    #[test]
    fn test_histogram_bins_cover_range() {
        let request =
            prepare_chart(&fruit_table(), "score", ChartKind::Histogram, &ChartStyle {
                bin_count: 3,
                ..Default::default()
            })
            .unwrap();

        let ChartData::Histogram { bins, summary } = request.data else {
            panic!("expected histogram data");
        };
        assert_eq!(bins.len(), 3);
        assert_eq!(bins[0].lower, 1.0);
        assert_eq!(bins[2].upper, 10.0);
        let counts: Vec<usize> = bins.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![3, 1, 1]);

        assert_eq!(summary.count, 5);
        assert_eq!(summary.mean, Some(4.0));
        assert_eq!(summary.median, Some(3.0));
        assert!((summary.std_dev.unwrap() - 3.5355).abs() < 1e-3);
    }

    #[test]
    fn test_histogram_constant_column() {
        let bins = histogram_bins(&[5.0, 5.0], 2);
        assert_eq!(bins[0].lower, 4.5);
        assert_eq!(bins[1].upper, 5.5);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 2);
    }

    #[test]
    fn test_numeric_summary_edge_cases() {
        assert_eq!(NumericSummary::from_values(&[]), NumericSummary::default());

        let single = NumericSummary::from_values(&[7.0]);
        assert_eq!(single.median, Some(7.0));
        assert_eq!(single.std_dev, None);

        let even = NumericSummary::from_values(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(even.median, Some(2.5));
    }

    // =========================================================================
    // Bar / Pie
    // =========================================================================

    #[test]
    fn test_bar_counts_descending() {
        let request =
            prepare_chart(&fruit_table(), "fruit", ChartKind::Bar, &ChartStyle::default()).unwrap();

        assert_eq!(request.title, "Distribution of fruit");
        let ChartData::Bar {
            categories,
            hidden_categories,
        } = request.data
        else {
            panic!("expected bar data");
        };
        let labels: Vec<(&str, usize)> =
            categories.iter().map(|c| (c.label.as_str(), c.count)).collect();
        assert_eq!(labels, vec![("apple", 3), ("pear", 2), ("fig", 1)]);
        assert_eq!(hidden_categories, 0);
    }

    #[test]
    fn test_bar_caps_long_tail() {
        let labels: Vec<String> = (0..60).map(|i| format!("label-{i}")).collect();
        let table = Table::new(df!["label" => labels].unwrap());
        let request =
            prepare_chart(&table, "label", ChartKind::Bar, &ChartStyle::default()).unwrap();

        let ChartData::Bar {
            categories,
            hidden_categories,
        } = request.data
        else {
            panic!("expected bar data");
        };
        assert_eq!(categories.len(), 50);
        assert_eq!(hidden_categories, 10);
    }

    #[test]
    fn test_pie_percentages_sum_to_100() {
        let request =
            prepare_chart(&fruit_table(), "fruit", ChartKind::Pie, &ChartStyle::default()).unwrap();

        let ChartData::Pie { slices } = request.data else {
            panic!("expected pie data");
        };
        assert_eq!(slices[0].label, "apple");
        assert_eq!(slices[0].percentage, 50.0);
        let total: f64 = slices.iter().map(|s| s.percentage).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    // =========================================================================
    // Validation and styling
    // =========================================================================

    #[test]
    fn test_unsupported_kind_rejected() {
        let err = prepare_chart(&fruit_table(), "score", ChartKind::Pie, &ChartStyle::default())
            .unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_CHART");

        let err =
            prepare_chart(&fruit_table(), "fruit", ChartKind::Histogram, &ChartStyle::default())
                .unwrap_err();
        assert!(matches!(err, ScrubError::UnsupportedChart { .. }));
    }

    #[test]
    fn test_oversized_bin_count_rejected() {
        let style = ChartStyle {
            bin_count: usize::MAX,
            ..Default::default()
        };
        let err = prepare_chart(&fruit_table(), "score", ChartKind::Histogram, &style).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_unknown_column_rejected() {
        let err = prepare_chart(&fruit_table(), "nope", ChartKind::Bar, &ChartStyle::default())
            .unwrap_err();
        assert!(matches!(err, ScrubError::ColumnNotFound(_)));
    }

    #[test]
    fn test_custom_title_and_clamped_figure() {
        let style = ChartStyle {
            title: Some("Scores".to_string()),
            figure_size: FigureSize {
                width: 4.0,
                height: 12.0,
            },
            ..Default::default()
        };
        let request = prepare_chart(&fruit_table(), "score", ChartKind::Histogram, &style).unwrap();

        assert_eq!(request.title, "Scores");
        assert_eq!(request.style.figure_size.height, 6.0);
    }

    #[test]
    fn test_default_histogram_title() {
        let request =
            prepare_chart(&fruit_table(), "score", ChartKind::Histogram, &ChartStyle::default())
                .unwrap();
        assert_eq!(request.title, "Histogram of score");
    }
}
