//! Table metadata: declared sdtype per column

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Declared description of a single column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMetadata {
    /// Declared sdtype name (e.g. "categorical")
    #[serde(rename = "type")]
    pub sdtype: String,
    /// Remaining descriptive keys (subtype, format, ...) kept as-is
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Metadata for one table, keyed by column name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub fields: BTreeMap<String, FieldMetadata>,
}

impl Metadata {
    /// Build metadata from `(column, sdtype)` pairs
    pub fn from_pairs<I, C, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (C, S)>,
        C: Into<String>,
        S: Into<String>,
    {
        let fields = pairs
            .into_iter()
            .map(|(column, sdtype)| {
                (
                    column.into(),
                    FieldMetadata {
                        sdtype: sdtype.into(),
                        extra: BTreeMap::new(),
                    },
                )
            })
            .collect();
        Self { fields }
    }

    /// Read a metadata JSON file for `table`.
    ///
    /// Accepts either a single-table document (`{"fields": ...}`) or a
    /// dataset document holding several tables (`{"tables": {"<table>": ...}}`).
    pub fn from_json_file(path: &Path, table: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read metadata file: {}", path.display()))?;
        let document: serde_json::Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse metadata file: {}", path.display()))?;

        let table_document = match document.get("tables") {
            Some(tables) => tables.get(table).cloned().with_context(|| {
                format!("Metadata file {} has no table '{}'", path.display(), table)
            })?,
            None => document,
        };
        serde_json::from_value(table_document)
            .with_context(|| format!("Invalid table metadata in {}", path.display()))
    }

    /// Declared sdtype name for a column, if any
    pub fn sdtype_of(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(|f| f.sdtype.as_str())
    }
}
