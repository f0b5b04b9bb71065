use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::PipelineConfig;
use crate::data::clean::CleaningReport;
use crate::pipeline::{Evaluation, Selection};

/// What gets written by `File → Export report…`.
#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub source: &'a str,
    pub config: &'a PipelineConfig,
    pub cleaning: &'a CleaningReport,
    pub selection: &'a Selection,
    pub evaluation: &'a Evaluation,
}

impl RunReport<'_> {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serializing report")
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)
            .with_context(|| format!("writing report to {}", path.display()))?;
        log::info!("Exported report to {}", path.display());
        Ok(())
    }
}
