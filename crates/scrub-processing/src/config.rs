//! Configuration types for the cleaning pipeline and the chart preparer.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic pipeline setup. Every type is serde-enabled so
//! a front end can hand the engine a JSON blob.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Configuration for the cleaning pipeline.
///
/// Use [`PipelineConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use scrub_processing::config::PipelineConfig;
///
/// let config = PipelineConfig::builder()
///     .remove_duplicates(false)
///     .max_categories(50)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Run the missing-value resolver.
    /// Default: true
    pub handle_missing: bool,

    /// Run the duplicate eliminator.
    /// Default: true
    pub remove_duplicates: bool,

    /// Run the type coercer.
    /// Default: true
    pub convert_types: bool,

    /// Upper bound on distinct labels for a column to become categorical.
    /// Default: 100
    pub max_categories: usize,

    /// Distinct labels must also stay below this share of the row count
    /// (0.0 exclusive - 1.0).
    /// Default: 0.5
    pub categorical_ratio: f64,

    /// Non-numeric columns with at most this many distinct values also get a
    /// pie chart.
    /// Default: 10
    pub pie_category_limit: usize,

    /// Bar charts show at most this many categories.
    /// Default: 50
    pub bar_category_cap: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            handle_missing: true,
            remove_duplicates: true,
            convert_types: true,
            max_categories: 100,
            categorical_ratio: 0.5,
            pie_category_limit: 10,
            bar_category_cap: 50,
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration builder.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(self.categorical_ratio > 0.0 && self.categorical_ratio <= 1.0) {
            return Err(ConfigValidationError::InvalidRatio {
                field: "categorical_ratio".to_string(),
                value: self.categorical_ratio,
            });
        }

        if self.max_categories == 0 {
            return Err(ConfigValidationError::InvalidLimit {
                field: "max_categories".to_string(),
                value: self.max_categories,
            });
        }

        if self.bar_category_cap == 0 {
            return Err(ConfigValidationError::InvalidLimit {
                field: "bar_category_cap".to_string(),
                value: self.bar_category_cap,
            });
        }

        Ok(())
    }

    /// Distinct-count bound below which a text column becomes categorical.
    pub fn categorical_threshold(&self, row_count: usize) -> f64 {
        categorical_threshold(self.max_categories, self.categorical_ratio, row_count)
    }
}

/// `min(max_categories, categorical_ratio * row_count)`.
pub fn categorical_threshold(max_categories: usize, categorical_ratio: f64, row_count: usize) -> f64 {
    (max_categories as f64).min(categorical_ratio * row_count as f64)
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid ratio for '{field}': {value} (must be in (0.0, 1.0])")]
    InvalidRatio { field: String, value: f64 },

    #[error("Invalid limit for '{field}': {value} (must be at least 1)")]
    InvalidLimit { field: String, value: usize },

    #[error("Invalid bin count: {0} (must be between 1 and {MAX_BIN_COUNT})")]
    InvalidBinCount(usize),

    #[error("Invalid figure size '{0}' (expected positive WIDTH,HEIGHT)")]
    InvalidFigureSize(String),

    #[error("Unknown plot theme '{0}'")]
    UnknownTheme(String),
}

/// Builder for [`PipelineConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    handle_missing: Option<bool>,
    remove_duplicates: Option<bool>,
    convert_types: Option<bool>,
    max_categories: Option<usize>,
    categorical_ratio: Option<f64>,
    pie_category_limit: Option<usize>,
    bar_category_cap: Option<usize>,
}

impl PipelineConfigBuilder {
    /// Enable or disable missing-value imputation.
    pub fn handle_missing(mut self, enable: bool) -> Self {
        self.handle_missing = Some(enable);
        self
    }

    /// Enable or disable duplicate row removal.
    pub fn remove_duplicates(mut self, enable: bool) -> Self {
        self.remove_duplicates = Some(enable);
        self
    }

    /// Enable or disable type coercion.
    pub fn convert_types(mut self, enable: bool) -> Self {
        self.convert_types = Some(enable);
        self
    }

    /// Enable or disable all three stages at once.
    pub fn all_stages(self, enable: bool) -> Self {
        self.handle_missing(enable)
            .remove_duplicates(enable)
            .convert_types(enable)
    }

    /// Set the absolute cap on categorical cardinality.
    pub fn max_categories(mut self, max: usize) -> Self {
        self.max_categories = Some(max);
        self
    }

    /// Set the cardinality cap relative to the row count.
    ///
    /// # Arguments
    /// * `ratio` - Value in (0.0, 1.0] (e.g., 0.5 = half the rows)
    pub fn categorical_ratio(mut self, ratio: f64) -> Self {
        self.categorical_ratio = Some(ratio);
        self
    }

    pub fn pie_category_limit(mut self, limit: usize) -> Self {
        self.pie_category_limit = Some(limit);
        self
    }

    pub fn bar_category_cap(mut self, cap: usize) -> Self {
        self.bar_category_cap = Some(cap);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `PipelineConfig` or an error if validation fails.
    pub fn build(self) -> Result<PipelineConfig, ConfigValidationError> {
        let defaults = PipelineConfig::default();
        let config = PipelineConfig {
            handle_missing: self.handle_missing.unwrap_or(defaults.handle_missing),
            remove_duplicates: self.remove_duplicates.unwrap_or(defaults.remove_duplicates),
            convert_types: self.convert_types.unwrap_or(defaults.convert_types),
            max_categories: self.max_categories.unwrap_or(defaults.max_categories),
            categorical_ratio: self.categorical_ratio.unwrap_or(defaults.categorical_ratio),
            pie_category_limit: self
                .pie_category_limit
                .unwrap_or(defaults.pie_category_limit),
            bar_category_cap: self.bar_category_cap.unwrap_or(defaults.bar_category_cap),
        };

        config.validate()?;
        Ok(config)
    }
}

// =============================================================================
// Chart style
// =============================================================================

/// Visual theme handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlotTheme {
    #[default]
    Darkgrid,
    Whitegrid,
    Dark,
    White,
    Ticks,
}

impl PlotTheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Darkgrid => "darkgrid",
            Self::Whitegrid => "whitegrid",
            Self::Dark => "dark",
            Self::White => "white",
            Self::Ticks => "ticks",
        }
    }
}

impl fmt::Display for PlotTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlotTheme {
    type Err = ConfigValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "darkgrid" => Ok(Self::Darkgrid),
            "whitegrid" => Ok(Self::Whitegrid),
            "dark" => Ok(Self::Dark),
            "white" => Ok(Self::White),
            "ticks" => Ok(Self::Ticks),
            _ => Err(ConfigValidationError::UnknownTheme(s.to_string())),
        }
    }
}

/// Figure dimensions in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FigureSize {
    pub width: f32,
    pub height: f32,
}

impl Default for FigureSize {
    fn default() -> Self {
        Self {
            width: 10.0,
            height: 6.0,
        }
    }
}

impl FigureSize {
    /// Height is capped at 1.5x the width so tall plots stay readable.
    pub fn clamped(&self) -> Self {
        Self {
            width: self.width,
            height: self.height.min(self.width * 1.5),
        }
    }
}

/// Parses `"WIDTH,HEIGHT"`, e.g. `"10,6"`.
impl FromStr for FigureSize {
    type Err = ConfigValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigValidationError::InvalidFigureSize(s.to_string());
        let (width, height) = s.split_once(',').ok_or_else(invalid)?;
        let width: f32 = width.trim().parse().map_err(|_| invalid())?;
        let height: f32 = height.trim().parse().map_err(|_| invalid())?;
        if !(width > 0.0 && height > 0.0) {
            return Err(invalid());
        }
        Ok(Self { width, height })
    }
}

/// Style options passed along with a chart to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartStyle {
    /// Histogram granularity.
    /// Default: 20
    pub bin_count: usize,

    /// Default: 10 x 6 inches
    pub figure_size: FigureSize,

    /// Replaces the generated title when set.
    pub title: Option<String>,

    /// Default: darkgrid
    pub theme: PlotTheme,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            bin_count: 20,
            figure_size: FigureSize::default(),
            title: None,
            theme: PlotTheme::default(),
        }
    }
}

/// Upper bound on histogram bins.
pub const MAX_BIN_COUNT: usize = 1000;

impl ChartStyle {
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.bin_count == 0 || self.bin_count > MAX_BIN_COUNT {
            return Err(ConfigValidationError::InvalidBinCount(self.bin_count));
        }
        let size = self.figure_size;
        if !(size.width > 0.0 && size.height > 0.0) {
            return Err(ConfigValidationError::InvalidFigureSize(format!(
                "{},{}",
                size.width, size.height
            )));
        }
        Ok(())
    }
}
