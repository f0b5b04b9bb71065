//! Error types for pipeline runs.

use thiserror::Error;

/// Conditions that stop a pipeline run before metrics are produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// A selected column does not exist in the dataset.
    #[error("column '{0}' does not exist in the dataset")]
    UnknownColumn(String),

    /// A selected column holds text values.
    #[error("column '{0}' is not numeric; only numeric columns can be used for training")]
    NonNumericColumn(String),

    /// A selected column still contains missing cells.
    #[error("column '{0}' contains missing values")]
    MissingValues(String),

    /// A selected column contains an infinite value.
    #[error("column '{0}' contains an infinite value")]
    NonFiniteValue(String),

    /// Cleaning removed every row.
    #[error("no rows left after removing rows with missing values")]
    EmptyDataset,

    /// Too few rows to build both a training and a holdout set.
    #[error("need at least {required} rows to split into training and holdout sets, got {actual}")]
    NotEnoughRows { required: usize, actual: usize },

    /// The holdout fraction is outside (0, 1).
    #[error("test size must be between 0 and 1 (exclusive), got {0}")]
    InvalidTestSize(f64),

    /// Array lengths disagree.
    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    /// A metric was asked for on zero samples.
    #[error("cannot compute metrics on an empty holdout set")]
    EmptyHoldout,

    /// `predict` was called before `fit`.
    #[error("model has not been fitted")]
    ModelNotFitted,
}

/// A specialized Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
