//! Score aggregation across every benchmark test case

use std::collections::BTreeMap;

use anyhow::{Context, Result};

use super::catalog::TestCase;
use super::evaluator::{get_transformer_regression_scores, ScoreRow};
use super::loader::DatasetSource;
use super::regression::KFold;
use super::sdtype::Sdtype;
use super::transformers::TransformersByType;
use crate::utils::create_dataset_bar;

/// Score tables keyed by the sdtype whose transformers were evaluated
pub type ScoresBySdtype = BTreeMap<Sdtype, Vec<ScoreRow>>;

/// Load each test case's table and score every transformer of each of its
/// sdtypes. Sdtypes with no registered transformers yield no rows.
pub fn get_regression_scores(
    test_cases: &[TestCase],
    transformers_by_type: &TransformersByType,
    source: &dyn DatasetSource,
    folds: &KFold,
) -> Result<ScoresBySdtype> {
    let mut scores: ScoresBySdtype = BTreeMap::new();

    let pb = create_dataset_bar(test_cases.len() as u64);

    for case in test_cases {
        pb.set_message(case.dataset_name.clone());
        let (df, metadata) = source
            .load(&case.dataset_name, &case.table_name)
            .with_context(|| format!("Failed to load dataset '{}'", case.dataset_name))?;

        for sdtype in &case.sdtypes {
            let transformers = transformers_by_type
                .get(sdtype)
                .map(Vec::as_slice)
                .unwrap_or_default();
            let rows = get_transformer_regression_scores(
                &df,
                sdtype,
                &case.dataset_name,
                transformers,
                metadata.as_ref(),
                folds,
            )?;
            scores.entry(sdtype.clone()).or_default().extend(rows);
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    Ok(scores)
}
