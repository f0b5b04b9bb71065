use serde::{Deserialize, Serialize};

/// Knobs of a pipeline run. Fixed at compile time; embedded in exported reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Fraction of rows held out for evaluation.
    pub test_size: f64,
    /// Seed shared by the split shuffle and the tree's feature order.
    pub random_state: u64,
    /// Rows shown in the data preview.
    pub preview_rows: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            random_state: 42,
            preview_rows: 5,
        }
    }
}
