use std::path::Path;

use crate::config::PipelineConfig;
use crate::data::clean::{CleaningReport, drop_missing_rows};
use crate::data::loader::load_file;
use crate::data::model::Dataset;
use crate::pipeline::{self, Evaluation, PipelineError, PipelineOutcome, Selection};
use crate::report::RunReport;

// ---------------------------------------------------------------------------
// Loaded file
// ---------------------------------------------------------------------------

/// A file that has been parsed and cleaned.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    /// File name shown in the UI.
    pub name: String,
    /// The table after rows with missing values were dropped.
    pub dataset: Dataset,
    pub cleaning: CleaningReport,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: PipelineConfig,

    /// Loaded table (None until user loads a file).
    pub table: Option<LoadedTable>,

    /// Target and feature columns.
    pub selection: Option<Selection>,

    /// Result of the last pipeline run.
    pub outcome: Option<Result<PipelineOutcome, PipelineError>>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl AppState {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            table: None,
            selection: None,
            outcome: None,
            status_message: None,
        }
    }

    /// Load, clean and run. On failure the previous table is dropped and the
    /// error is kept in `status_message`.
    pub fn load_path(&mut self, path: &Path) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        match load_file(path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {name}: {} rows, columns {:?}",
                    dataset.len(),
                    dataset.column_names()
                );
                self.set_dataset(name, dataset);
            }
            Err(e) => {
                log::error!("Failed to load {name}: {e:#}");
                self.clear();
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a newly loaded dataset: clean it, pick the first column as
    /// target with every other column as feature, and run.
    pub fn set_dataset(&mut self, name: String, mut dataset: Dataset) {
        let cleaning = drop_missing_rows(&mut dataset);

        self.selection = dataset
            .column_names()
            .first()
            .and_then(|target| Selection::with_default_features(&dataset, target).ok());
        self.table = Some(LoadedTable {
            name,
            dataset,
            cleaning,
        });
        self.status_message = None;
        self.inputs_changed();
    }

    /// Drop the loaded table and everything derived from it.
    pub fn clear(&mut self) {
        self.table = None;
        self.selection = None;
        self.outcome = None;
    }

    /// Re-run the whole pipeline for the current table and selection.
    pub fn inputs_changed(&mut self) {
        self.outcome = match (&self.table, &self.selection) {
            (Some(table), Some(selection)) => {
                let result = pipeline::run(&table.dataset, selection, &self.config);
                if let Err(e) = &result {
                    log::error!("Pipeline run failed: {e}");
                }
                Some(result)
            }
            _ => None,
        };
    }

    /// Set the target column; the feature set resets to all other columns.
    pub fn set_target(&mut self, target: &str) {
        let Some(table) = &self.table else {
            return;
        };
        if self.selection.as_ref().is_some_and(|s| s.target() == target) {
            return;
        }
        match Selection::with_default_features(&table.dataset, target) {
            Ok(selection) => {
                self.selection = Some(selection);
                self.inputs_changed();
            }
            Err(e) => self.status_message = Some(format!("Error: {e}")),
        }
    }

    /// Toggle a single feature column.
    pub fn toggle_feature(&mut self, column: &str) {
        if let (Some(table), Some(selection)) = (&self.table, &mut self.selection) {
            let enabled = !selection.contains_feature(column);
            selection.set_feature(&table.dataset, column, enabled);
            self.inputs_changed();
        }
    }

    /// Select every non-target column.
    pub fn select_all_features(&mut self) {
        if let (Some(table), Some(selection)) = (&self.table, &mut self.selection) {
            selection.select_all_features(&table.dataset);
            self.inputs_changed();
        }
    }

    /// Deselect every feature column.
    pub fn select_no_features(&mut self) {
        if let Some(selection) = &mut self.selection {
            selection.clear_features();
            self.inputs_changed();
        }
    }

    /// Evaluation of the last run, if it completed.
    pub fn evaluation(&self) -> Option<&Evaluation> {
        match &self.outcome {
            Some(Ok(outcome)) => outcome.evaluation(),
            _ => None,
        }
    }

    /// Exportable report of the last completed run.
    pub fn report(&self) -> Option<RunReport<'_>> {
        let table = self.table.as_ref()?;
        Some(RunReport {
            source: &table.name,
            config: &self.config,
            cleaning: &table.cleaning,
            selection: self.selection.as_ref()?,
            evaluation: self.evaluation()?,
        })
    }
}
