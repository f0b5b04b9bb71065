use serde::Serialize;

use super::error::{PipelineError, Result};

/// Holdout metrics of a fitted model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegressionMetrics {
    pub mse: f64,
    /// `None` when the holdout has fewer than two rows.
    pub r2: Option<f64>,
    pub n_samples: usize,
}

impl RegressionMetrics {
    pub fn compute(actual: &[f64], predicted: &[f64]) -> Result<Self> {
        Ok(Self {
            mse: mean_squared_error(actual, predicted)?,
            r2: r2_score(actual, predicted)?,
            n_samples: actual.len(),
        })
    }

    pub fn mse_display(&self) -> String {
        format!("{:.2}", self.mse)
    }

    pub fn r2_display(&self) -> String {
        match self.r2 {
            Some(r2) => format!("{r2:.2}"),
            None => "n/a".to_string(),
        }
    }
}

fn check_lengths(actual: &[f64], predicted: &[f64]) -> Result<()> {
    if actual.len() != predicted.len() {
        return Err(PipelineError::ShapeMismatch {
            expected: format!("{} predictions", actual.len()),
            actual: format!("{} predictions", predicted.len()),
        });
    }
    if actual.is_empty() {
        return Err(PipelineError::EmptyHoldout);
    }
    Ok(())
}

/// Mean of `(actual - predicted)²`.
pub fn mean_squared_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_lengths(actual, predicted)?;
    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    Ok(sum / actual.len() as f64)
}

/// Coefficient of determination, `1 - SS_res / SS_tot`.
///
/// Undefined (`None`) for fewer than two samples. With a constant `actual`,
/// perfect predictions score 1 and anything else 0.
pub fn r2_score(actual: &[f64], predicted: &[f64]) -> Result<Option<f64>> {
    check_lengths(actual, predicted)?;
    if actual.len() < 2 {
        return Ok(None);
    }

    let n = actual.len() as f64;
    let mean = actual.iter().sum::<f64>() / n;
    let ss_tot: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();
    let ss_res: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();

    let r2 = if ss_tot > 0.0 {
        1.0 - ss_res / ss_tot
    } else if ss_res == 0.0 {
        1.0
    } else {
        0.0
    };
    Ok(Some(r2))
}
