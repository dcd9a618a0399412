//! Encoding pipeline: one transformer per column, output as a numeric matrix
//!
//! The initial configuration takes each column's declared sdtype from the
//! table metadata when there is one, and otherwise detects it from the native
//! dtype. Overriding an sdtype replaces the transformer of every column
//! configured as that sdtype; other columns keep their default transformer.

use anyhow::{Context, Result};
use polars::prelude::*;

use super::columns::detect_sdtype;
use super::error::QualityError;
use super::metadata::Metadata;
use super::regression::FeatureMatrix;
use super::sdtype::Sdtype;
use super::transformers::{default_transformer, Transformer};

struct ColumnConfig {
    column: String,
    sdtype: Sdtype,
    transformer: Box<dyn Transformer>,
}

/// Per-column transformer configuration for a table
pub struct EncodingPipeline {
    config: Vec<ColumnConfig>,
    fitted: bool,
}

impl EncodingPipeline {
    /// Assign each column of `df` the default transformer for its sdtype.
    ///
    /// A sdtype declared in `metadata` wins over the detected one as long as
    /// it has a default transformer; `id` and unknown declarations fall back
    /// to detection.
    pub fn detect_initial_config(df: &DataFrame, metadata: Option<&Metadata>) -> Result<Self> {
        let mut config = Vec::with_capacity(df.width());
        for column in df.get_columns() {
            let undetectable = || QualityError::UndetectableColumn {
                column: column.name().to_string(),
                dtype: column.dtype().to_string(),
            };
            let declared = metadata
                .and_then(|m| m.sdtype_of(column.name()))
                .and_then(|name| name.parse::<Sdtype>().ok())
                .and_then(|sdtype| default_transformer(&sdtype).map(|t| (sdtype, t)));
            let (sdtype, transformer) = match declared {
                Some(pair) => pair,
                None => {
                    let sdtype = detect_sdtype(column).ok_or_else(undetectable)?;
                    let transformer = default_transformer(&sdtype).ok_or_else(undetectable)?;
                    (sdtype, transformer)
                }
            };
            config.push(ColumnConfig {
                column: column.name().to_string(),
                sdtype,
                transformer,
            });
        }
        Ok(Self {
            config,
            fitted: false,
        })
    }

    /// Use a fresh copy of `transformer` for every column configured as `sdtype`.
    /// Returns the number of columns updated.
    pub fn update_transformers_by_sdtype(&mut self, sdtype: &Sdtype, transformer: &dyn Transformer) -> usize {
        let mut updated = 0;
        for entry in self.config.iter_mut().filter(|c| &c.sdtype == sdtype) {
            entry.transformer = transformer.fresh();
            updated += 1;
        }
        if updated > 0 {
            self.fitted = false;
        }
        updated
    }

    /// `(column, sdtype, transformer name)` for every configured column
    pub fn config(&self) -> Vec<(&str, &Sdtype, &str)> {
        self.config
            .iter()
            .map(|c| (c.column.as_str(), &c.sdtype, c.transformer.name()))
            .collect()
    }

    pub fn fit(&mut self, df: &DataFrame) -> Result<()> {
        for entry in self.config.iter_mut() {
            let column = df
                .column(&entry.column)
                .with_context(|| format!("Column '{}' not found", entry.column))?;
            entry.transformer.fit(column).with_context(|| {
                format!(
                    "Failed to fit {} on column '{}'",
                    entry.transformer.name(),
                    entry.column
                )
            })?;
        }
        self.fitted = true;
        Ok(())
    }

    /// Transform every configured column and stack the outputs column-wise
    pub fn transform(&self, df: &DataFrame) -> Result<FeatureMatrix> {
        if !self.fitted {
            return Err(QualityError::NotFitted("EncodingPipeline".to_string()).into());
        }

        let mut outputs: Vec<Vec<f64>> = Vec::new();
        for entry in &self.config {
            let column = df
                .column(&entry.column)
                .with_context(|| format!("Column '{}' not found", entry.column))?;
            let transformed = entry.transformer.transform(column).with_context(|| {
                format!(
                    "Failed to transform column '{}' with {}",
                    entry.column,
                    entry.transformer.name()
                )
            })?;
            outputs.extend(transformed);
        }

        if outputs.is_empty() {
            anyhow::bail!("Encoding pipeline produced no output columns");
        }
        FeatureMatrix::from_columns(&outputs)
    }

    /// Output column names in matrix order (valid after fit)
    pub fn output_columns(&self) -> Vec<String> {
        self.config
            .iter()
            .flat_map(|c| c.transformer.output_columns(&c.column))
            .collect()
    }
}
