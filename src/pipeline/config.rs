//! Run configuration for the quality benchmark

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::Serialize;

use super::assessment::DEFAULT_TEST_THRESHOLD;
use super::catalog::DEFAULT_MAX_SIZE;
use super::ranking::DEFAULT_R2_THRESHOLD;
use super::regression::KFold;
use super::sdtype::Sdtype;

/// Default catalog location relative to the data directory
pub const DEFAULT_CATALOG_FILE: &str = "datasets.csv";

/// Everything a quality run needs besides the registry and dataset source
#[derive(Debug, Clone, Serialize)]
pub struct QualityConfig {
    /// Benchmark catalog CSV
    pub catalog: PathBuf,
    /// Minimum mean R² for a `(dataset, column)` group to be ranked
    pub r2_threshold: f64,
    /// Bar each result row must clear (score or relative score)
    pub test_threshold: f64,
    /// Tables at or above this size are not benchmarked
    pub max_size: f64,
    /// Sdtypes whose transformers are not evaluated
    pub skip_sdtypes: BTreeSet<Sdtype>,
    /// Transformer names removed from the registry before the run
    pub skip_transformers: Vec<String>,
    pub cv: KFold,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            catalog: PathBuf::from(DEFAULT_CATALOG_FILE),
            r2_threshold: DEFAULT_R2_THRESHOLD,
            test_threshold: DEFAULT_TEST_THRESHOLD,
            max_size: DEFAULT_MAX_SIZE,
            skip_sdtypes: default_skip_sdtypes(),
            skip_transformers: Vec::new(),
            cv: KFold::default(),
        }
    }
}

/// Numeric and id sdtypes are inputs or targets, never benchmarked themselves
pub fn default_skip_sdtypes() -> BTreeSet<Sdtype> {
    BTreeSet::from([Sdtype::Numerical, Sdtype::Float, Sdtype::Integer, Sdtype::Id])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = QualityConfig::default();
        assert_eq!(config.r2_threshold, 0.2);
        assert_eq!(config.test_threshold, 0.3);
        assert_eq!(config.max_size, 5_000_000.0);
        assert!(config.skip_sdtypes.contains(&Sdtype::Numerical));
        assert!(!config.skip_sdtypes.contains(&Sdtype::Categorical));
        assert!(config.skip_transformers.is_empty());
        assert_eq!(config.cv, KFold::default());
    }
}
