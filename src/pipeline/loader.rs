//! Dataset loading for benchmark tables (CSV or Parquet)

use anyhow::{Context, Result};
use polars::prelude::*;
use std::path::{Path, PathBuf};

use super::metadata::Metadata;

/// Name of the optional per-dataset metadata file
pub const METADATA_FILE: &str = "metadata.json";

/// Where benchmark tables come from
pub trait DatasetSource: Send + Sync {
    /// Load `table` of `dataset`, plus its metadata when the source has any
    fn load(&self, dataset: &str, table: &str) -> Result<(DataFrame, Option<Metadata>)>;
}

/// Datasets laid out on disk as `<root>/<dataset>/<table>.{csv,parquet}`
/// with an optional `<root>/<dataset>/metadata.json`
#[derive(Debug, Clone)]
pub struct LocalDatasetSource {
    root: PathBuf,
    infer_schema_length: Option<usize>,
}

impl LocalDatasetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            infer_schema_length: Some(10_000),
        }
    }

    /// Rows used for CSV schema inference (`None` scans the whole file)
    pub fn with_infer_schema_length(mut self, rows: Option<usize>) -> Self {
        self.infer_schema_length = rows;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn table_path(&self, dataset: &str, table: &str) -> Result<PathBuf> {
        let dir = self.root.join(dataset);
        ["csv", "parquet"]
            .iter()
            .map(|ext| dir.join(format!("{}.{}", table, ext)))
            .find(|path| path.is_file())
            .with_context(|| {
                format!(
                    "No table '{}' for dataset '{}' in {} (expected {}.csv or {}.parquet)",
                    table,
                    dataset,
                    dir.display(),
                    table,
                    table
                )
            })
    }
}

impl DatasetSource for LocalDatasetSource {
    fn load(&self, dataset: &str, table: &str) -> Result<(DataFrame, Option<Metadata>)> {
        let path = self.table_path(dataset, table)?;
        let df = load_table(&path, self.infer_schema_length)?
            .collect()
            .with_context(|| format!("Failed to read table: {}", path.display()))?;

        let metadata_path = self.root.join(dataset).join(METADATA_FILE);
        let metadata = if metadata_path.is_file() {
            Some(Metadata::from_json_file(&metadata_path, table)?)
        } else {
            None
        };

        Ok((df, metadata))
    }
}

/// Lazily scan a table file (CSV or Parquet based on extension).
///
/// CSV date strings are parsed into temporal columns so datetime columns are
/// detected natively.
pub fn load_table(path: &Path, infer_schema_length: Option<usize>) -> Result<LazyFrame> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let lf = match extension.as_str() {
        "csv" => LazyCsvReader::new(path)
            .with_has_header(true)
            .with_try_parse_dates(true)
            .with_infer_schema_length(infer_schema_length)
            .finish()
            .with_context(|| format!("Failed to load CSV file: {}", path.display()))?,
        "parquet" => LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to load Parquet file: {}", path.display()))?,
        _ => anyhow::bail!(
            "Unsupported file format: {}. Supported formats: csv, parquet",
            extension
        ),
    };

    Ok(lf)
}
