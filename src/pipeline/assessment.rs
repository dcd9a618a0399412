//! Pass/fail verdicts per transformer

use std::collections::BTreeMap;

use serde::Serialize;

use super::ranking::ResultRow;

/// Default bar a score or relative score has to clear
pub const DEFAULT_TEST_THRESHOLD: f64 = 0.3;

/// Outcome of assessing one transformer across all its datasets
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformerVerdict {
    pub transformer_name: String,
    pub passed: bool,
    /// Result rows where neither the score nor the relative score cleared the threshold
    pub failing_rows: Vec<ResultRow>,
}

/// A row passes when either its relative score or its score is strictly above
/// the threshold; undefined values never pass.
pub fn row_passes(row: &ResultRow, test_threshold: f64) -> bool {
    let above = |value: Option<f64>| value.is_some_and(|v| v > test_threshold);
    above(row.score_relative_to_average) || above(row.score)
}

/// Assess each transformer in `results` independently, in name order
pub fn assess_transformers(results: &[ResultRow], test_threshold: f64) -> Vec<TransformerVerdict> {
    let mut by_transformer: BTreeMap<&str, Vec<&ResultRow>> = BTreeMap::new();
    for row in results {
        by_transformer
            .entry(row.transformer_name.as_str())
            .or_default()
            .push(row);
    }

    by_transformer
        .into_iter()
        .map(|(name, rows)| {
            let failing_rows: Vec<ResultRow> = rows
                .into_iter()
                .filter(|row| !row_passes(row, test_threshold))
                .cloned()
                .collect();
            TransformerVerdict {
                transformer_name: name.to_string(),
                passed: failing_rows.is_empty(),
                failing_rows,
            }
        })
        .collect()
}
