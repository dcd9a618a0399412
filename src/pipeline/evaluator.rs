//! Transformer evaluation: how well does each transformer's encoding predict
//! the numerical columns of a table?

use std::collections::BTreeSet;
use std::sync::Arc;

use anyhow::{Context, Result};
use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;

use super::columns::find_columns;
use super::encoding::EncodingPipeline;
use super::error::QualityError;
use super::metadata::Metadata;
use super::regression::{cross_val_r2, KFold};
use super::sdtype::Sdtype;
use super::transformers::{FloatFormatter, Transformer};

/// Score of one transformer predicting one target column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRow {
    pub transformer_name: String,
    pub dataset_name: String,
    pub column: String,
    /// Mean cross-validated R²; `None` when the score is not finite
    pub score: Option<f64>,
}

/// Format a target column, returning the kept values and the keep-mask
/// (false where the target was missing).
fn prepare_target(df: &DataFrame, column: &str) -> Result<(Vec<f64>, Vec<bool>)> {
    let series = df
        .column(column)
        .with_context(|| format!("Target column '{}' not found", column))?;
    let mut formatter = FloatFormatter::new().with_missing_replacement(false);
    let values = formatter
        .fit_transform(series)
        .with_context(|| format!("Failed to format target column '{}'", column))?
        .into_iter()
        .next()
        .unwrap_or_default();

    let keep: Vec<bool> = values.iter().map(|v| !v.is_nan()).collect();
    let target = values.into_iter().filter(|v| !v.is_nan()).collect();
    Ok((target, keep))
}

fn score_transformer(
    features: &DataFrame,
    sdtype: &Sdtype,
    transformer: &dyn Transformer,
    metadata: Option<&Metadata>,
    target: &[f64],
    keep: &[bool],
    folds: &KFold,
) -> Result<Option<f64>> {
    let mut pipeline = EncodingPipeline::detect_initial_config(features, metadata)?;
    if pipeline.update_transformers_by_sdtype(sdtype, transformer) == 0 {
        return Err(QualityError::TransformerNotApplied {
            transformer: transformer.name().to_string(),
            sdtype: sdtype.to_string(),
        }
        .into());
    }
    pipeline.fit(features)?;
    let matrix = pipeline.transform(features)?.filter_rows(keep)?;

    let score = cross_val_r2(&matrix, target, folds)?;
    Ok(Some(score).filter(|s| s.is_finite()))
}

/// Score every transformer against every numerical column of `df`.
///
/// Features are the columns of `sdtype` (per `metadata` when given), encoded
/// by each transformer in turn. Targets are the natively numerical columns
/// that are not themselves features. Rows with a missing target are dropped
/// from both sides before scoring.
pub fn get_transformer_regression_scores(
    df: &DataFrame,
    sdtype: &Sdtype,
    dataset_name: &str,
    transformers: &[Arc<dyn Transformer>],
    metadata: Option<&Metadata>,
    folds: &KFold,
) -> Result<Vec<ScoreRow>> {
    let present: BTreeSet<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    let feature_columns: Vec<String> = find_columns(df, sdtype, metadata)
        .intersection(&present)
        .cloned()
        .collect();
    let target_columns: Vec<String> = find_columns(df, &Sdtype::Numerical, None)
        .into_iter()
        .filter(|column| !feature_columns.contains(column))
        .collect();

    if feature_columns.is_empty() || target_columns.is_empty() || transformers.is_empty() {
        return Ok(Vec::new());
    }

    let features = df.select(feature_columns.iter().map(String::as_str))?;
    let mut scores = Vec::with_capacity(target_columns.len() * transformers.len());

    for column in &target_columns {
        let (target, keep) = prepare_target(df, column)?;

        let column_scores: Vec<Result<ScoreRow>> = transformers
            .par_iter()
            .map(|transformer| {
                let score = score_transformer(
                    &features,
                    sdtype,
                    transformer.as_ref(),
                    metadata,
                    &target,
                    &keep,
                    folds,
                )
                .with_context(|| {
                    format!(
                        "Scoring {} on {}.{} failed",
                        transformer.name(),
                        dataset_name,
                        column
                    )
                })?;
                Ok(ScoreRow {
                    transformer_name: transformer.name().to_string(),
                    dataset_name: dataset_name.to_string(),
                    column: column.clone(),
                    score,
                })
            })
            .collect();

        for row in column_scores {
            scores.push(row?);
        }
    }

    Ok(scores)
}
