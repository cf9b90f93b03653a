//! Main cleaning pipeline module.
//!
//! This module provides the core `Pipeline` struct and builder for
//! orchestrating the cleaning stages.

use crate::cleaner::{DuplicateEliminator, TypeCoercer};
use crate::config::{ConfigValidationError, PipelineConfig};
use crate::error::{Result, ScrubError};
use crate::imputers::MissingValueResolver;
use crate::pipeline::progress::{
    CleaningStage, ClosureProgressReporter, ProgressReporter, ProgressUpdate,
};
use crate::table::Table;
use crate::types::{CleaningSummary, PipelineResult};
use polars::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// The main cleaning pipeline.
///
/// Runs the enabled stages in a fixed order: missing values, then duplicates,
/// then type conversion. Use [`Pipeline::builder()`] to create one.
///
/// # Example
///
/// ```rust,ignore
/// use scrub_processing::{Pipeline, PipelineConfig};
///
/// let result = Pipeline::builder()
///     .config(PipelineConfig::builder().remove_duplicates(false).build()?)
///     .on_progress(|update| {
///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
///     })
///     .build()?
///     .process(table)?;
///
/// println!("{} rows left", result.summary.rows_after);
/// ```
pub struct Pipeline {
    config: PipelineConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    resolver: MissingValueResolver,
    eliminator: DuplicateEliminator,
    coercer: TypeCoercer,
}

// Hosts may move a pipeline onto a worker thread.
static_assertions::assert_impl_all!(Pipeline: Send);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Clean a table.
    ///
    /// # Errors
    ///
    /// Returns `MalformedTable` for a table without columns. The stages
    /// themselves never fail; per-column problems leave the column unchanged.
    pub fn process(&self, table: Table) -> Result<PipelineResult> {
        match self.process_internal(table) {
            Ok(result) => {
                self.report_progress(ProgressUpdate::complete("Cleaning completed successfully"));
                Ok(result)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    /// Clean a bare frame, deriving declared types from its dtypes.
    pub fn process_frame(&self, df: DataFrame) -> Result<PipelineResult> {
        self.process(Table::new(df))
    }

    /// Report progress if a reporter is configured.
    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn process_internal(&self, table: Table) -> Result<PipelineResult> {
        let start_time = Instant::now();

        info!("Starting cleaning pipeline...");
        self.report_progress(ProgressUpdate::new(
            CleaningStage::Initializing,
            0.0,
            "Starting cleaning pipeline...",
        ));

        if table.width() == 0 {
            return Err(ScrubError::MalformedTable(
                "table has no columns".to_string(),
            ));
        }

        let mut summary = CleaningSummary::new(&table);
        let mut table = table;

        // Step 1: Missing values
        if self.config.handle_missing {
            self.report_progress(ProgressUpdate::new(
                CleaningStage::MissingValues,
                0.0,
                "Handling missing values...",
            ));
            let outcome = self.resolver.resolve(table);
            table = outcome.table;

            if outcome.imputations.is_empty() {
                summary.steps.push("No missing values to fill".to_string());
            }
            summary
                .steps
                .extend(outcome.imputations.iter().map(|i| i.to_string()));
            summary.imputations = outcome.imputations;

            self.report_progress(ProgressUpdate::new(
                CleaningStage::MissingValues,
                1.0,
                "Missing values handled",
            ));
        } else {
            info!("Skipping missing-value handling (disabled)");
        }

        // Step 2: Duplicates
        if self.config.remove_duplicates {
            self.report_progress(ProgressUpdate::new(
                CleaningStage::Duplicates,
                0.0,
                "Removing duplicate rows...",
            ));
            let outcome = self.eliminator.dedupe(table);
            table = outcome.table;

            summary.duplicates_removed = outcome.rows_removed;
            summary.steps.push(if outcome.rows_removed > 0 {
                format!("Removed {} duplicate rows", outcome.rows_removed)
            } else {
                "No duplicate rows found".to_string()
            });

            self.report_progress(ProgressUpdate::new(
                CleaningStage::Duplicates,
                1.0,
                "Duplicates removed",
            ));
        } else {
            info!("Skipping duplicate removal (disabled)");
        }

        // Step 3: Type conversion
        if self.config.convert_types {
            self.report_progress(ProgressUpdate::new(
                CleaningStage::TypeConversion,
                0.0,
                "Converting column types...",
            ));
            let outcome = self.coercer.coerce(table);
            table = outcome.table;

            summary
                .steps
                .extend(outcome.retypes.iter().map(|r| r.to_string()));
            summary.retypes = outcome.retypes;

            self.report_progress(ProgressUpdate::new(
                CleaningStage::TypeConversion,
                1.0,
                "Column types converted",
            ));
        } else {
            info!("Skipping type conversion (disabled)");
        }

        summary.finish(&table, start_time.elapsed().as_millis() as u64);
        info!(
            "Cleaning finished in {} ms: {} -> {} rows",
            summary.duration_ms, summary.rows_before, summary.rows_after
        );

        Ok(PipelineResult { table, summary })
    }
}

/// Builder for [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<PipelineConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl PipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter for receiving updates during processing.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// For more complex scenarios, use [`progress_reporter`](Self::progress_reporter).
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<Pipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(Pipeline {
            coercer: TypeCoercer::from_config(&config),
            config,
            progress_reporter: self.progress_reporter,
            resolver: MissingValueResolver::new(),
            eliminator: DuplicateEliminator::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::SemanticType;
    use std::sync::Mutex;

    fn messy_table() -> Table {
        Table::new(
            df![
                "id" => ["1", "2", "2", "3"],
                "score" => [Some(10.0), Some(20.0), Some(20.0), None],
                "city" => [Some("Oslo"), Some("Lima"), Some("Lima"), None],
            ]
            .unwrap(),
        )
    }

    #[test]
    fn test_pipeline_builder_default() {
        let pipeline = Pipeline::builder().build().unwrap();
        assert!(pipeline.config().handle_missing);
        assert!(pipeline.config().remove_duplicates);
        assert!(pipeline.config().convert_types);
    }

    #[test]
    fn test_pipeline_builder_rejects_invalid_config() {
        let config = PipelineConfig {
            categorical_ratio: 0.0,
            ..Default::default()
        };
        assert!(Pipeline::builder().config(config).build().is_err());
    }

    #[test]
    fn test_process_runs_all_stages() {
        let result = Pipeline::builder()
            .build()
            .unwrap()
            .process(messy_table())
            .unwrap();

        let summary = &result.summary;
        assert_eq!(summary.rows_before, 4);
        assert_eq!(summary.rows_after, 3);
        assert_eq!(summary.duplicates_removed, 1);
        assert_eq!(summary.missing_before, 2);
        assert_eq!(summary.missing_after, 0);
        assert_eq!(summary.imputations.len(), 2);
        assert_eq!(
            result.table.semantic_type("id").unwrap(),
            SemanticType::Numeric
        );
        assert!(!summary.steps.is_empty());
    }

    #[test]
    fn test_disabled_stages_are_skipped() {
        let config = PipelineConfig::builder().all_stages(false).build().unwrap();
        let table = messy_table();

        let result = Pipeline::builder()
            .config(config)
            .build()
            .unwrap()
            .process(table.clone())
            .unwrap();

        assert_eq!(result.table, table);
        assert_eq!(result.summary.duplicates_removed, 0);
        assert!(result.summary.steps.is_empty());
    }

    #[test]
    fn test_imputation_runs_before_dedupe() {
        // Rows 0 and 1 only match once the gap is filled with the mode.
        let table = Table::new(
            df![
                "c" => [Some("a"), None, Some("b")],
                "n" => [1i64, 1, 2],
            ]
            .unwrap(),
        );
        let config = PipelineConfig::builder().convert_types(false).build().unwrap();

        let result = Pipeline::builder()
            .config(config)
            .build()
            .unwrap()
            .process(table)
            .unwrap();

        assert_eq!(result.summary.duplicates_removed, 1);
        assert_eq!(result.table.height(), 2);
    }

    #[test]
    fn test_empty_table_is_malformed() {
        let result = Pipeline::builder()
            .build()
            .unwrap()
            .process(Table::new(DataFrame::empty()));
        assert!(matches!(result, Err(ScrubError::MalformedTable(_))));
    }

    #[test]
    fn test_progress_reported_in_stage_order() {
        let stages = Arc::new(Mutex::new(Vec::new()));
        let sink = stages.clone();

        Pipeline::builder()
            .on_progress(move |update| {
                if let Ok(mut seen) = sink.lock() {
                    seen.push(update.stage);
                }
            })
            .build()
            .unwrap()
            .process(messy_table())
            .unwrap();

        let mut seen = stages.lock().unwrap().clone();
        seen.dedup();
        assert_eq!(
            seen,
            vec![
                CleaningStage::Initializing,
                CleaningStage::MissingValues,
                CleaningStage::Duplicates,
                CleaningStage::TypeConversion,
                CleaningStage::Complete,
            ]
        );
    }

    #[test]
    fn test_failure_reported() {
        let stages = Arc::new(Mutex::new(Vec::new()));
        let sink = stages.clone();

        let _ = Pipeline::builder()
            .on_progress(move |update| {
                if let Ok(mut seen) = sink.lock() {
                    seen.push(update.stage);
                }
            })
            .build()
            .unwrap()
            .process(Table::new(DataFrame::empty()));

        assert_eq!(stages.lock().unwrap().last(), Some(&CleaningStage::Failed));
    }
}
