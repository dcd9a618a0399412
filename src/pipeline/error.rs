//! Typed failure modes raised by the scoring pipeline.
//!
//! Most functions return `anyhow::Result`; these variants exist so callers
//! and tests can match on the cause with `downcast_ref`.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum QualityError {
    /// `transform` was called on a transformer that has not been fitted
    #[error("transformer '{0}' must be fitted before transform")]
    NotFitted(String),

    /// Feature rows and target rows disagree
    #[error("shape mismatch: {features} feature rows vs {target} target rows")]
    ShapeMismatch { features: usize, target: usize },

    /// Not enough rows to build the requested number of folds
    #[error("cannot split {samples} samples into {folds} folds")]
    InsufficientSamples { samples: usize, folds: usize },

    /// Regression inputs contain NaN or infinite values
    #[error("non-finite value in {0}")]
    NonFiniteInput(&'static str),

    /// The catalog `table_types` field could not be parsed
    #[error("invalid table_types value: {0:?}")]
    InvalidTableTypes(String),

    /// The catalog file lacks a required column
    #[error("catalog is missing required column '{0}'")]
    MissingCatalogColumn(String),

    /// The encoding pipeline found a column with no sdtype for its dtype
    #[error("cannot detect sdtype of column '{column}' with dtype {dtype}")]
    UndetectableColumn { column: String, dtype: String },

    /// A transformer override matched no column of the encoding pipeline
    #[error("{transformer} was not applied: no column is configured as {sdtype}")]
    TransformerNotApplied { transformer: String, sdtype: String },
}
