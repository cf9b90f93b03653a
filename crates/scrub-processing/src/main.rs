//! CLI entry point for the cleaning tool.

use anyhow::{Result, anyhow};
use clap::{Parser, ValueEnum};
use scrub_processing::charts::{ChartKind, ChartRenderer, RenderRequest, TextRenderer};
use scrub_processing::config::{ChartStyle, FigureSize, PlotTheme};
use scrub_processing::{
    CleaningSummary, Pipeline, PipelineConfig, PipelineResult, Table, io, prepare_chart,
    select_charts,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// CLI-compatible plot theme enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliTheme {
    Darkgrid,
    Whitegrid,
    Dark,
    White,
    Ticks,
}

impl From<CliTheme> for PlotTheme {
    fn from(cli: CliTheme) -> Self {
        match cli {
            CliTheme::Darkgrid => PlotTheme::Darkgrid,
            CliTheme::Whitegrid => PlotTheme::Whitegrid,
            CliTheme::Dark => PlotTheme::Dark,
            CliTheme::White => PlotTheme::White,
            CliTheme::Ticks => PlotTheme::Ticks,
        }
    }
}

/// CLI-compatible chart kind enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliChartKind {
    /// Binned distribution (numeric columns)
    Histogram,
    /// Count per category
    Bar,
    /// Share per category (10 categories or fewer)
    Pie,
}

impl From<CliChartKind> for ChartKind {
    fn from(cli: CliChartKind) -> Self {
        match cli {
            CliChartKind::Histogram => ChartKind::Histogram,
            CliChartKind::Bar => ChartKind::Bar,
            CliChartKind::Pie => ChartKind::Pie,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "scrub-processing",
    version,
    about = "Data cleaning tool for CSV files",
    after_help = "EXAMPLES:\n  \
                  # Apply every cleaning step and save the result\n  \
                  scrub-processing data.csv --all -o cleaned.csv\n\n  \
                  # Fill gaps only and preview the result\n  \
                  scrub-processing data.csv --handle-missing\n\n  \
                  # Clean, then chart one column\n  \
                  scrub-processing data.csv --all --plot-column price --bins 30"
)]
struct Args {
    /// Path to the input CSV file
    #[arg(value_parser = parse_input_file)]
    input: PathBuf,

    /// Path to save the cleaned CSV file (if not specified, a preview is printed)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Clean missing values
    #[arg(long)]
    handle_missing: bool,

    /// Remove duplicate rows
    #[arg(long)]
    remove_duplicates: bool,

    /// Convert data types
    #[arg(long)]
    convert_types: bool,

    /// Apply all cleaning operations
    #[arg(long)]
    all: bool,

    /// Generate a chart for the specified column
    #[arg(long)]
    plot_column: Option<String>,

    /// Chart kind (defaults to the preferred kind for the column)
    #[arg(long, value_enum)]
    chart: Option<CliChartKind>,

    /// Plot theme
    #[arg(long, value_enum, default_value = "darkgrid")]
    sns_style: CliTheme,

    /// Figure size in inches as width,height
    #[arg(long, default_value = "10,6", value_parser = parse_figure_size)]
    figsize: FigureSize,

    /// Custom title for the chart
    #[arg(long)]
    title: Option<String>,

    /// Number of bins for numeric data
    #[arg(long, default_value = "20")]
    bins: usize,

    /// Write the rendered chart to this file instead of stdout
    #[arg(long)]
    plot_output: Option<PathBuf>,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all progress logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,
}

/// Machine-readable report printed with `--json`.
#[derive(Serialize)]
struct CliReport<'a> {
    input: &'a Path,
    output: Option<&'a Path>,
    summary: &'a CleaningSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    chart: Option<RenderRequest>,
}

fn parse_input_file(value: &str) -> std::result::Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if !path.exists() {
        return Err(format!("Input file not found: {}", value));
    }
    if !value.to_ascii_lowercase().ends_with(".csv") {
        return Err(format!("Input file must be a CSV file: {}", value));
    }
    Ok(path)
}

fn parse_figure_size(value: &str) -> std::result::Result<FigureSize, String> {
    value.parse::<FigureSize>().map_err(|e| e.to_string())
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    let table = io::load_csv(&args.input)?;

    let config = PipelineConfig::builder()
        .handle_missing(args.handle_missing || args.all)
        .remove_duplicates(args.remove_duplicates || args.all)
        .convert_types(args.convert_types || args.all)
        .build()?;

    if !(config.handle_missing || config.remove_duplicates || config.convert_types) {
        warn!(
            "No cleaning operations specified. Use --handle-missing, --remove-duplicates, \
             --convert-types, or --all"
        );
    }

    let pipeline = build_pipeline(&args, config)?;
    let result = pipeline.process(table).map_err(|e| {
        error!("Pipeline failed: {}", e);
        anyhow!("Pipeline failed: {}", e)
    })?;

    if let Some(ref output) = args.output {
        io::write_csv(&result.table, output)?;
    }

    let chart = match args.plot_column {
        Some(ref column) => Some(build_chart(&args, &result.table, column)?),
        None => None,
    };

    if args.json {
        let report = CliReport {
            input: &args.input,
            output: args.output.as_deref(),
            summary: &result.summary,
            chart,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if args.output.is_none() {
        print_preview(&result);
    }
    print_summary(&result.summary);

    if let Some(request) = chart {
        emit_chart(&args, &request)?;
    }

    Ok(())
}

fn build_pipeline(args: &Args, config: PipelineConfig) -> Result<Pipeline> {
    let builder = Pipeline::builder().config(config);
    let builder = if args.json || args.quiet {
        builder
    } else {
        builder.on_progress(|update| {
            info!("[{:>3.0}%] {}", update.progress * 100.0, update.message);
        })
    };
    Ok(builder.build()?)
}

/// Pick the chart kind for `column` and aggregate its data.
fn build_chart(args: &Args, table: &Table, column: &str) -> Result<RenderRequest> {
    let options = select_charts(table, column)?;
    let kind = args.chart.map(ChartKind::from).unwrap_or(options.preferred());

    info!(
        "Generating {} chart for '{}' column with style '{}'...",
        kind,
        column,
        PlotTheme::from(args.sns_style)
    );

    let style = ChartStyle {
        bin_count: args.bins,
        figure_size: args.figsize,
        title: args.title.clone(),
        theme: args.sns_style.into(),
    };

    prepare_chart(table, column, kind, &style).map_err(|e| {
        warn!("Chart was requested but could not be completed");
        anyhow!("Error generating chart: {}", e)
    })
}

fn emit_chart(args: &Args, request: &RenderRequest) -> Result<()> {
    let chart = TextRenderer::new().render(request)?;

    match args.plot_output {
        Some(ref path) => {
            std::fs::write(path, &chart.bytes)?;
            println!("Chart written to: {}", path.display());
        }
        None => {
            println!();
            println!("{}", String::from_utf8_lossy(&chart.bytes));
        }
    }
    Ok(())
}

/// Print the first rows and column types of the cleaned table.
fn print_preview(result: &PipelineResult) {
    println!();
    println!("Cleaned Data Preview:");
    println!("{}", result.table.frame().head(Some(5)));
    println!();
    println!("Total rows after cleaning: {}", result.table.height());
    println!("Column types:");
    for (name, semantic) in result.table.columns() {
        println!("  {:<24} {}", truncate_str(name, 24), semantic);
    }
}

fn print_summary(summary: &CleaningSummary) {
    println!();
    println!("{}", "=".repeat(60));
    println!("CLEANING COMPLETE");
    println!("{}", "=".repeat(60));
    println!("  Duration: {}ms", summary.duration_ms);
    println!(
        "  Rows: {} -> {} ({} duplicates removed)",
        summary.rows_before, summary.rows_after, summary.duplicates_removed
    );
    println!(
        "  Missing values: {} -> {}",
        summary.missing_before, summary.missing_after
    );

    if !summary.steps.is_empty() {
        println!();
        println!("Actions Taken:");
        for step in &summary.steps {
            println!("  - {}", step);
        }
    }
    println!("{}", "=".repeat(60));
}

fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
