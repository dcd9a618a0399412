//! Command-line argument definitions using clap

use clap::{Parser, Subcommand};
use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::pipeline::{default_skip_sdtypes, KFold, QualityConfig, Sdtype, DEFAULT_CATALOG_FILE};

/// tquality - Benchmark how much predictive signal each transformer's encoding keeps
#[derive(Parser, Debug)]
#[command(name = "tquality")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding one sub-directory per dataset
    /// (`<data-dir>/<dataset>/<table>.csv|parquet`, optional `metadata.json`)
    #[arg(short, long, default_value = ".")]
    pub data_dir: PathBuf,

    /// Benchmark catalog CSV (name, table_name, table_size, modality, table_types).
    /// Defaults to `datasets.csv` inside the data directory.
    #[arg(short, long)]
    pub catalog: Option<PathBuf>,

    /// Minimum mean R² a (dataset, column) group needs to be ranked
    #[arg(long, default_value = "0.2", value_parser = validate_r2_threshold)]
    pub r2_threshold: f64,

    /// Score or relative score each result must exceed for a transformer to pass
    #[arg(long, default_value = "0.3", value_parser = validate_test_threshold)]
    pub test_threshold: f64,

    /// Only benchmark tables smaller than this size
    #[arg(long, default_value = "5000000")]
    pub max_size: f64,

    /// Number of cross-validation folds
    #[arg(long, default_value = "5", value_parser = validate_folds)]
    pub folds: usize,

    /// Seed for shuffling rows before fold assignment
    #[arg(long, default_value = "0")]
    pub seed: u64,

    /// Assign folds in row order instead of shuffling
    #[arg(long, default_value = "false")]
    pub no_shuffle: bool,

    /// Transformers to leave out (comma-separated or repeated)
    #[arg(long = "skip-transformer", value_delimiter = ',')]
    pub skip_transformers: Vec<String>,

    /// Sdtypes not to benchmark (comma-separated or repeated).
    /// Defaults to numerical, float, integer and id.
    #[arg(long = "skip-sdtype", value_delimiter = ',')]
    pub skip_sdtypes: Vec<Sdtype>,

    /// Write a JSON report of scores, results and verdicts to this path
    #[arg(short, long)]
    pub report: Option<PathBuf>,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan (very slow for large files).
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the registered transformers grouped by sdtype
    List,
}

impl Cli {
    /// Catalog path, defaulting to `datasets.csv` in the data directory
    pub fn catalog_path(&self) -> PathBuf {
        self.catalog
            .clone()
            .unwrap_or_else(|| self.data_dir.join(DEFAULT_CATALOG_FILE))
    }

    /// Rows used for CSV schema inference; 0 means scan everything
    pub fn schema_rows(&self) -> Option<usize> {
        match self.infer_schema_length {
            0 => None,
            rows => Some(rows),
        }
    }

    pub fn quality_config(&self) -> QualityConfig {
        let skip_sdtypes: BTreeSet<Sdtype> = if self.skip_sdtypes.is_empty() {
            default_skip_sdtypes()
        } else {
            self.skip_sdtypes.iter().cloned().collect()
        };

        QualityConfig {
            catalog: self.catalog_path(),
            r2_threshold: self.r2_threshold,
            test_threshold: self.test_threshold,
            max_size: self.max_size,
            skip_sdtypes,
            skip_transformers: self.skip_transformers.clone(),
            cv: KFold::new(self.folds)
                .with_shuffle(!self.no_shuffle)
                .with_seed(self.seed),
        }
    }
}

fn parse_number(s: &str) -> Result<f64, String> {
    s.parse()
        .map_err(|_| format!("'{}' is not a valid number", s))
}

/// Validator for r2_threshold parameter
fn validate_r2_threshold(s: &str) -> Result<f64, String> {
    let value = parse_number(s)?;
    if !(0.0..=1.0).contains(&value) {
        Err(format!("r2_threshold must be between 0.0 and 1.0, got {}", value))
    } else {
        Ok(value)
    }
}

/// Validator for test_threshold parameter (relative scores can exceed 1)
fn validate_test_threshold(s: &str) -> Result<f64, String> {
    let value = parse_number(s)?;
    if !value.is_finite() || value < 0.0 {
        Err(format!("test_threshold must be a non-negative number, got {}", value))
    } else {
        Ok(value)
    }
}

/// Validator for folds parameter
fn validate_folds(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid fold count", s))?;
    if value < 2 {
        Err(format!("folds must be at least 2, got {}", value))
    } else {
        Ok(value)
    }
}
