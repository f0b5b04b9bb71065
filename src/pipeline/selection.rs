use ndarray::{Array1, Array2};
use serde::Serialize;

use super::error::{PipelineError, Result};
use crate::data::model::Dataset;

// ---------------------------------------------------------------------------
// Column selection: one target, any number of features
// ---------------------------------------------------------------------------

/// Target column plus feature columns.
///
/// The target is never part of `features`; features are kept in dataset order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    target: String,
    features: Vec<String>,
}

impl Selection {
    /// Select `target` with every other column as a feature.
    pub fn with_default_features(dataset: &Dataset, target: &str) -> Result<Self> {
        Self::new(dataset, target, dataset.column_names())
    }

    /// Select `target` and the given features. The target is silently
    /// removed from the features; unknown names are rejected.
    pub fn new<I, S>(dataset: &Dataset, target: &str, features: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if dataset.column(target).is_none() {
            return Err(PipelineError::UnknownColumn(target.to_string()));
        }
        let mut selection = Selection {
            target: target.to_string(),
            features: Vec::new(),
        };
        for name in features {
            let name = name.as_ref();
            if dataset.column(name).is_none() {
                return Err(PipelineError::UnknownColumn(name.to_string()));
            }
            selection.set_feature(dataset, name, true);
        }
        Ok(selection)
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn has_features(&self) -> bool {
        !self.features.is_empty()
    }

    pub fn contains_feature(&self, name: &str) -> bool {
        self.features.iter().any(|f| f == name)
    }

    /// Add or remove one feature. Requests naming the target or an unknown
    /// column are ignored.
    pub fn set_feature(&mut self, dataset: &Dataset, name: &str, enabled: bool) {
        if name == self.target {
            return;
        }
        if !enabled {
            self.features.retain(|f| f != name);
            return;
        }
        if self.contains_feature(name) || dataset.column(name).is_none() {
            return;
        }
        self.features.push(name.to_string());
        self.features
            .sort_by_key(|f| dataset.column_index(f).unwrap_or(usize::MAX));
    }

    /// Every non-target column.
    pub fn select_all_features(&mut self, dataset: &Dataset) {
        self.features = dataset
            .column_names()
            .into_iter()
            .filter(|c| *c != self.target)
            .collect();
    }

    pub fn clear_features(&mut self) {
        self.features.clear();
    }
}

// ---------------------------------------------------------------------------
// Design matrix
// ---------------------------------------------------------------------------

/// Feature matrix (rows × features) and target vector for a selection.
///
/// Every selected column must be numeric, complete and finite.
pub fn design_matrix(dataset: &Dataset, selection: &Selection) -> Result<(Array2<f64>, Array1<f64>)> {
    let n_rows = dataset.len();
    let y = Array1::from_vec(numeric_column(dataset, selection.target())?);

    let mut x = Array2::<f64>::zeros((n_rows, selection.features().len()));
    for (j, name) in selection.features().iter().enumerate() {
        let values = numeric_column(dataset, name)?;
        for (i, v) in values.into_iter().enumerate() {
            x[[i, j]] = v;
        }
    }
    Ok((x, y))
}

fn numeric_column(dataset: &Dataset, name: &str) -> Result<Vec<f64>> {
    let column = dataset
        .column(name)
        .ok_or_else(|| PipelineError::UnknownColumn(name.to_string()))?;
    if column.missing_count() > 0 {
        return Err(PipelineError::MissingValues(name.to_string()));
    }
    if !column.is_numeric() {
        return Err(PipelineError::NonNumericColumn(name.to_string()));
    }

    column
        .values
        .iter()
        .map(|cell| match cell.as_f64() {
            Some(v) if v.is_finite() => Ok(v),
            _ => Err(PipelineError::NonFiniteValue(name.to_string())),
        })
        .collect()
}
