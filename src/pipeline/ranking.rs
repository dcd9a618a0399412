//! Results ranking: per-dataset transformer averages and their score
//! relative to the competing transformers of the same sdtype

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::aggregate::ScoresBySdtype;
use super::evaluator::ScoreRow;
use super::sdtype::Sdtype;

/// Default minimum mean R² a `(dataset, column)` group needs to be ranked
pub const DEFAULT_R2_THRESHOLD: f64 = 0.2;

/// One transformer's result on one dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    pub transformer_name: String,
    pub dataset_name: String,
    pub sdtype: Sdtype,
    /// Mean of the transformer's retained scores on the dataset
    pub score: Option<f64>,
    /// `score` divided by the mean of the other transformers' retained scores
    pub score_relative_to_average: Option<f64>,
}

/// Mean of the defined values; `None` if there are none
fn mean_defined<'a>(scores: impl IntoIterator<Item = &'a Option<f64>>) -> Option<f64> {
    let (sum, count) = scores
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Rows whose `(dataset, column)` group has a mean score at or above the threshold
fn retained_rows(scores: &[ScoreRow], r2_threshold: f64) -> Vec<&ScoreRow> {
    let mut groups: BTreeMap<(&str, &str), Vec<&Option<f64>>> = BTreeMap::new();
    for row in scores {
        groups
            .entry((row.dataset_name.as_str(), row.column.as_str()))
            .or_default()
            .push(&row.score);
    }

    let kept: BTreeSet<(&str, &str)> = groups
        .into_iter()
        .filter(|(_, group)| mean_defined(group.iter().copied()).is_some_and(|m| m >= r2_threshold))
        .map(|(key, _)| key)
        .collect();

    scores
        .iter()
        .filter(|row| kept.contains(&(row.dataset_name.as_str(), row.column.as_str())))
        .collect()
}

fn relative_score(score: Option<f64>, rest: Option<f64>) -> Option<f64> {
    match (score, rest) {
        (Some(score), Some(rest)) if rest != 0.0 => Some(score / rest).filter(|r| r.is_finite()),
        _ => None,
    }
}

fn rank_sdtype(sdtype: &Sdtype, scores: &[ScoreRow], r2_threshold: f64) -> Vec<ResultRow> {
    let retained = retained_rows(scores, r2_threshold);

    let mut by_dataset_transformer: BTreeMap<(&str, &str), Vec<&Option<f64>>> = BTreeMap::new();
    for row in &retained {
        by_dataset_transformer
            .entry((row.dataset_name.as_str(), row.transformer_name.as_str()))
            .or_default()
            .push(&row.score);
    }

    by_dataset_transformer
        .into_iter()
        .map(|((dataset, transformer), group)| {
            let score = mean_defined(group.iter().copied());
            let rest = mean_defined(
                retained
                    .iter()
                    .filter(|row| row.dataset_name == dataset && row.transformer_name != transformer)
                    .map(|row| &row.score),
            );
            ResultRow {
                transformer_name: transformer.to_string(),
                dataset_name: dataset.to_string(),
                sdtype: sdtype.clone(),
                score,
                score_relative_to_average: relative_score(score, rest),
            }
        })
        .collect()
}

/// Build the results table across every sdtype.
///
/// Only `(dataset, column)` groups whose mean score reaches `r2_threshold`
/// take part; a transformer's relative score compares it against the other
/// transformers of the same sdtype on the same dataset and is `None` when
/// there is nothing (or only zero) to compare against. Rows are ordered by
/// sdtype, dataset, then transformer.
pub fn get_results_table(scores: &ScoresBySdtype, r2_threshold: f64) -> Vec<ResultRow> {
    scores
        .iter()
        .flat_map(|(sdtype, rows)| rank_sdtype(sdtype, rows, r2_threshold))
        .collect()
}
