//! End-to-end quality run: catalog, test cases, scores, results, verdicts

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use serde::Serialize;

use super::aggregate::{get_regression_scores, ScoresBySdtype};
use super::assessment::{assess_transformers, TransformerVerdict};
use super::catalog::{get_test_cases, load_catalog, TestCase};
use super::config::QualityConfig;
use super::loader::DatasetSource;
use super::ranking::{get_results_table, ResultRow};
use super::sdtype::Sdtype;
use super::transformers::TransformerRegistry;

/// Everything produced by one quality run
#[derive(Debug, Clone, Serialize)]
pub struct QualityRun {
    pub sdtypes_tested: BTreeSet<Sdtype>,
    pub transformers_tested: Vec<String>,
    pub test_cases: Vec<TestCase>,
    pub scores: ScoresBySdtype,
    pub results: Vec<ResultRow>,
    pub verdicts: Vec<TransformerVerdict>,
}

impl QualityRun {
    pub fn passed(&self) -> bool {
        self.verdicts.iter().all(|v| v.passed)
    }

    pub fn failed_transformers(&self) -> Vec<&str> {
        self.verdicts
            .iter()
            .filter(|v| !v.passed)
            .map(|v| v.transformer_name.as_str())
            .collect()
    }

    pub fn score_count(&self) -> usize {
        self.scores.values().map(Vec::len).sum()
    }
}

/// Sdtypes with at least one registered transformer, minus the skipped ones
pub fn sdtypes_to_test(registry: &TransformerRegistry, skip: &BTreeSet<Sdtype>) -> BTreeSet<Sdtype> {
    registry
        .transformers_by_type()
        .into_keys()
        .filter(|sdtype| !skip.contains(sdtype))
        .collect()
}

/// Run the whole benchmark with `config`, drawing tables from `source`
pub fn run_quality(
    config: &QualityConfig,
    registry: &TransformerRegistry,
    source: &dyn DatasetSource,
) -> Result<QualityRun> {
    let registry = registry.without(&config.skip_transformers);
    let sdtypes_tested = sdtypes_to_test(&registry, &config.skip_sdtypes);
    let transformers_by_type = registry.transformers_by_type();

    let catalog = load_catalog(&config.catalog)
        .with_context(|| format!("Failed to read catalog {}", config.catalog.display()))?;
    let test_cases = get_test_cases(&catalog, &sdtypes_tested, config.max_size);

    let scores = get_regression_scores(&test_cases, &transformers_by_type, source, &config.cv)?;
    let results = get_results_table(&scores, config.r2_threshold);
    let verdicts = assess_transformers(&results, config.test_threshold);

    let transformers_tested = transformers_by_type
        .iter()
        .filter(|(sdtype, _)| sdtypes_tested.contains(sdtype))
        .flat_map(|(_, transformers)| transformers.iter().map(|t| t.name().to_string()))
        .collect();

    Ok(QualityRun {
        sdtypes_tested,
        transformers_tested,
        test_cases,
        scores,
        results,
        verdicts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sdtypes_to_test_respects_skip_set() {
        let registry = TransformerRegistry::with_defaults();
        let sdtypes = sdtypes_to_test(&registry, &crate::pipeline::config::default_skip_sdtypes());
        assert_eq!(
            sdtypes,
            BTreeSet::from([Sdtype::Categorical, Sdtype::Datetime, Sdtype::Boolean])
        );
    }

    #[test]
    fn test_skipping_every_transformer_of_an_sdtype_drops_it() {
        let registry = TransformerRegistry::with_defaults().without(&["BinaryEncoder".to_string()]);
        let sdtypes = sdtypes_to_test(&registry, &BTreeSet::new());
        assert!(!sdtypes.contains(&Sdtype::Boolean));
        assert!(sdtypes.contains(&Sdtype::Numerical));
    }
}
