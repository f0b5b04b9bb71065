//! Prediction pipeline: select → split → fit → predict → evaluate.
//!
//! ```text
//!   cleaned Dataset + Selection
//!        │
//!        ▼
//!   design_matrix ──▶ train_test_split ──▶ RegressionTree::fit
//!                                              │
//!                                              ▼
//!                      RegressionMetrics ◀── predict(holdout)
//!                      CorrelationMatrix
//! ```

pub mod correlation;
pub mod error;
pub mod metrics;
pub mod selection;
pub mod split;
pub mod tree;

use ndarray::Axis;
use serde::Serialize;

use crate::config::PipelineConfig;
use crate::data::model::Dataset;

pub use correlation::{CorrelationMatrix, correlation_matrix};
pub use error::{PipelineError, Result};
pub use metrics::RegressionMetrics;
pub use selection::Selection;
pub use split::{SplitPartition, train_test_split};
pub use tree::{RegressionTree, Regressor};

/// Shape and importances of the fitted tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSummary {
    pub depth: usize,
    pub n_leaves: usize,
    /// `(feature, importance)` in selection order.
    pub feature_importances: Vec<(String, f64)>,
}

/// Everything a completed run produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub train_rows: usize,
    pub holdout_rows: usize,
    pub metrics: RegressionMetrics,
    /// `[actual, predicted]` per holdout row.
    pub actual_vs_predicted: Vec<[f64; 2]>,
    pub correlation: CorrelationMatrix,
    pub model: ModelSummary,
}

/// Result of a run that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    /// No feature column selected; nothing was trained.
    NoFeatures,
    Completed(Box<Evaluation>),
}

impl PipelineOutcome {
    pub fn evaluation(&self) -> Option<&Evaluation> {
        match self {
            PipelineOutcome::Completed(eval) => Some(&**eval),
            PipelineOutcome::NoFeatures => None,
        }
    }
}

/// Run the pipeline on an already-cleaned dataset.
pub fn run(dataset: &Dataset, selection: &Selection, config: &PipelineConfig) -> Result<PipelineOutcome> {
    if !selection.has_features() {
        log::warn!("No feature columns selected; skipping training");
        return Ok(PipelineOutcome::NoFeatures);
    }
    if dataset.is_empty() {
        return Err(PipelineError::EmptyDataset);
    }

    let (x, y) = selection::design_matrix(dataset, selection)?;
    let split = train_test_split(dataset.len(), config.test_size, config.random_state)?;

    let x_train = x.select(Axis(0), &split.train);
    let y_train = y.select(Axis(0), &split.train);
    let x_test = x.select(Axis(0), &split.holdout);
    let y_test = y.select(Axis(0), &split.holdout);

    let mut model = RegressionTree::new(config.random_state);
    model.fit(&x_train, &y_train)?;
    let y_pred = model.predict(&x_test)?;

    let actual = y_test.to_vec();
    let predicted = y_pred.to_vec();
    let metrics = RegressionMetrics::compute(&actual, &predicted)?;

    let feature_importances = match model.feature_importances() {
        Some(imp) => selection
            .features()
            .iter()
            .cloned()
            .zip(imp.iter().copied())
            .collect(),
        None => Vec::new(),
    };
    let summary = ModelSummary {
        depth: model.depth(),
        n_leaves: model.n_leaves(),
        feature_importances,
    };

    log::info!(
        "Trained on {} rows, evaluated on {}: MSE {}, R² {}",
        split.train.len(),
        split.holdout.len(),
        metrics.mse_display(),
        metrics.r2_display()
    );

    Ok(PipelineOutcome::Completed(Box::new(Evaluation {
        train_rows: split.train.len(),
        holdout_rows: split.holdout.len(),
        metrics,
        actual_vs_predicted: actual.into_iter().zip(predicted).map(|(a, p)| [a, p]).collect(),
        correlation: correlation_matrix(dataset),
        model: summary,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::read_csv;

    fn linear_dataset(n: usize) -> Dataset {
        let mut csv = String::from("x,noise,y\n");
        for i in 0..n {
            csv.push_str(&format!("{i},{},{}\n", (i * 7) % 5, 3 * i + 1));
        }
        read_csv(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_run_completes() {
        let ds = linear_dataset(50);
        let sel = Selection::with_default_features(&ds, "y").unwrap();
        let outcome = run(&ds, &sel, &PipelineConfig::default()).unwrap();

        let eval = outcome.evaluation().unwrap();
        assert_eq!(eval.train_rows, 40);
        assert_eq!(eval.holdout_rows, 10);
        assert_eq!(eval.actual_vs_predicted.len(), 10);
        assert!(eval.metrics.mse >= 0.0);
        assert!(eval.metrics.r2.unwrap() > 0.9);
        assert_eq!(eval.correlation.columns, vec!["x", "noise", "y"]);
        assert_eq!(eval.model.feature_importances.len(), 2);
    }

    #[test]
    fn test_run_is_deterministic() {
        let ds = linear_dataset(30);
        let sel = Selection::with_default_features(&ds, "y").unwrap();
        let cfg = PipelineConfig::default();
        assert_eq!(run(&ds, &sel, &cfg).unwrap(), run(&ds, &sel, &cfg).unwrap());
    }

    #[test]
    fn test_no_features_halts() {
        let ds = linear_dataset(10);
        let mut sel = Selection::with_default_features(&ds, "y").unwrap();
        sel.clear_features();
        assert_eq!(
            run(&ds, &sel, &PipelineConfig::default()).unwrap(),
            PipelineOutcome::NoFeatures
        );
    }

    #[test]
    fn test_empty_dataset_is_an_error() {
        let ds = read_csv("x,y\n".as_bytes()).unwrap();
        let sel = Selection::with_default_features(&ds, "y").unwrap();
        assert_eq!(
            run(&ds, &sel, &PipelineConfig::default()),
            Err(PipelineError::EmptyDataset)
        );
    }

    #[test]
    fn test_single_row_cannot_split() {
        let ds = read_csv("x,y\n1,2\n".as_bytes()).unwrap();
        let sel = Selection::with_default_features(&ds, "y").unwrap();
        assert!(matches!(
            run(&ds, &sel, &PipelineConfig::default()),
            Err(PipelineError::NotEnoughRows { .. })
        ));
    }

    #[test]
    fn test_two_rows_give_undefined_r2() {
        let ds = read_csv("x,y\n1,2\n2,4\n".as_bytes()).unwrap();
        let sel = Selection::with_default_features(&ds, "y").unwrap();
        let outcome = run(&ds, &sel, &PipelineConfig::default()).unwrap();
        let eval = outcome.evaluation().unwrap();
        assert_eq!(eval.holdout_rows, 1);
        assert_eq!(eval.metrics.r2, None);
    }
}
