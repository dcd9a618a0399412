//! Benchmark catalog and test-case selection
//!
//! The catalog is a CSV with one row per benchmark table:
//! `name, table_name, table_size, modality, table_types`. The `table_types`
//! field holds a set literal such as `{'categorical', 'numerical'}`.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;
use serde::Serialize;

use super::error::QualityError;
use super::sdtype::Sdtype;

/// Modality a catalog row must have to be benchmarked
pub const SINGLE_TABLE: &str = "single-table";

/// Default ceiling on `table_size` (exclusive)
pub const DEFAULT_MAX_SIZE: f64 = 5_000_000.0;

const REQUIRED_COLUMNS: [&str; 5] = ["name", "table_name", "table_size", "modality", "table_types"];

/// One row of the benchmark catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub name: String,
    pub table_name: String,
    pub table_size: f64,
    pub modality: String,
    pub table_types: BTreeSet<Sdtype>,
}

/// A table to benchmark and the sdtypes to evaluate on it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestCase {
    pub dataset_name: String,
    pub table_name: String,
    pub sdtypes: BTreeSet<Sdtype>,
}

/// Parse a `table_types` literal into a set of sdtypes.
///
/// Accepts `{'a', 'b'}`, `['a', "b"]`, `('a',)`, `set()`, `{}` and bare
/// lists separated by `,`, `;` or `|`. Nested brackets and stray quotes are
/// rejected.
pub fn parse_table_types(raw: &str) -> Result<BTreeSet<Sdtype>, QualityError> {
    let invalid = || QualityError::InvalidTableTypes(raw.to_string());
    let text = raw.trim();
    if text.is_empty() || text == "set()" {
        return Ok(BTreeSet::new());
    }

    let bracketed = [('{', '}'), ('[', ']'), ('(', ')')]
        .iter()
        .find(|(open, close)| text.starts_with(*open) && text.ends_with(*close));
    let (inner, separators): (&str, &[char]) = match bracketed {
        Some(_) => (&text[1..text.len() - 1], &[',']),
        None => (text, &[',', ';', '|']),
    };

    if inner.contains(['{', '}', '[', ']', '(', ')']) {
        return Err(invalid());
    }

    let mut sdtypes = BTreeSet::new();
    for token in inner.split(separators) {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let unquoted = strip_quotes(token).ok_or_else(invalid)?;
        if unquoted.contains(['\'', '"']) {
            return Err(invalid());
        }
        sdtypes.insert(unquoted.parse::<Sdtype>().map_err(|_| invalid())?);
    }
    Ok(sdtypes)
}

/// Strip one pair of matching quotes; `None` if the quotes are unbalanced
fn strip_quotes(token: &str) -> Option<&str> {
    for quote in ['\'', '"'] {
        let starts = token.starts_with(quote);
        let ends = token.len() > 1 && token.ends_with(quote);
        match (starts, ends) {
            (true, true) => return Some(&token[1..token.len() - 1]),
            (false, false) => continue,
            _ => return None,
        }
    }
    Some(token)
}

fn string_column(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    let column = df.column(name)?.cast(&DataType::String)?;
    column
        .str()?
        .into_iter()
        .enumerate()
        .map(|(row, v)| {
            v.map(str::to_string)
                .with_context(|| format!("Catalog column '{}' is empty at row {}", name, row))
        })
        .collect()
}

/// Read the catalog CSV
pub fn load_catalog(path: &Path) -> Result<Vec<CatalogEntry>> {
    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .finish()
        .and_then(|lf| lf.collect())
        .with_context(|| format!("Failed to load catalog file: {}", path.display()))?;

    for required in REQUIRED_COLUMNS {
        if df.column(required).is_err() {
            return Err(QualityError::MissingCatalogColumn(required.to_string()).into());
        }
    }

    let names = string_column(&df, "name")?;
    let table_names = string_column(&df, "table_name")?;
    let modalities = string_column(&df, "modality")?;
    let table_types = string_column(&df, "table_types")?;
    let sizes: Vec<Option<f64>> = df
        .column("table_size")?
        .cast(&DataType::Float64)?
        .f64()?
        .into_iter()
        .collect();

    let mut entries = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let table_size = sizes[row]
            .with_context(|| format!("Catalog column 'table_size' is empty at row {}", row))?;
        let types = parse_table_types(&table_types[row])
            .with_context(|| format!("Bad table_types for dataset '{}'", names[row]))?;
        entries.push(CatalogEntry {
            name: names[row].clone(),
            table_name: table_names[row].clone(),
            table_size,
            modality: modalities[row].clone(),
            table_types: types,
        });
    }

    Ok(entries)
}

/// Select the single-table entries under `max_size` that contain at least one
/// of `sdtypes`, pairing each with the sdtypes it shares.
pub fn get_test_cases(entries: &[CatalogEntry], sdtypes: &BTreeSet<Sdtype>, max_size: f64) -> Vec<TestCase> {
    entries
        .iter()
        .filter(|entry| entry.table_size < max_size && entry.modality == SINGLE_TABLE)
        .filter_map(|entry| {
            let shared: BTreeSet<Sdtype> = sdtypes.intersection(&entry.table_types).cloned().collect();
            if shared.is_empty() {
                None
            } else {
                Some(TestCase {
                    dataset_name: entry.name.clone(),
                    table_name: entry.table_name.clone(),
                    sdtypes: shared,
                })
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[Sdtype]) -> BTreeSet<Sdtype> {
        items.iter().cloned().collect()
    }

    #[test]
    fn test_parse_python_set_literal() {
        let parsed = parse_table_types("{'categorical', 'numerical', 'datetime'}").unwrap();
        assert_eq!(
            parsed,
            set(&[Sdtype::Categorical, Sdtype::Numerical, Sdtype::Datetime])
        );
    }

    #[test]
    fn test_parse_list_and_bare_forms() {
        assert_eq!(
            parse_table_types(r#"["boolean", 'id']"#).unwrap(),
            set(&[Sdtype::Boolean, Sdtype::Id])
        );
        assert_eq!(
            parse_table_types("categorical;boolean").unwrap(),
            set(&[Sdtype::Categorical, Sdtype::Boolean])
        );
        assert_eq!(parse_table_types("('datetime',)").unwrap(), set(&[Sdtype::Datetime]));
    }

    #[test]
    fn test_parse_empty_forms() {
        assert!(parse_table_types("set()").unwrap().is_empty());
        assert!(parse_table_types("{}").unwrap().is_empty());
        assert!(parse_table_types("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_expressions() {
        assert!(parse_table_types("{__import__('os')}").is_err());
        assert!(parse_table_types("{'a', 'b'").is_err());
        assert!(parse_table_types("{'a}").is_err());
        assert!(parse_table_types("{'a' 'b'}").is_err());
    }

    fn entry(name: &str, size: f64, modality: &str, types: &[Sdtype]) -> CatalogEntry {
        CatalogEntry {
            name: name.to_string(),
            table_name: format!("{}_table", name),
            table_size: size,
            modality: modality.to_string(),
            table_types: set(types),
        }
    }

    #[test]
    fn test_size_cap_is_exclusive() {
        let entries = vec![
            entry("big", 10_000_000.0, SINGLE_TABLE, &[Sdtype::Categorical]),
            entry("at_cap", DEFAULT_MAX_SIZE, SINGLE_TABLE, &[Sdtype::Categorical]),
            entry("small", 4_999_999.0, SINGLE_TABLE, &[Sdtype::Categorical]),
        ];
        let cases = get_test_cases(&entries, &set(&[Sdtype::Categorical]), DEFAULT_MAX_SIZE);
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].dataset_name, "small");
    }

    #[test]
    fn test_modality_and_intersection() {
        let entries = vec![
            entry("multi", 10.0, "multi-table", &[Sdtype::Categorical]),
            entry("mixed", 10.0, SINGLE_TABLE, &[Sdtype::Categorical, Sdtype::Numerical, Sdtype::Boolean]),
            entry("numeric", 10.0, SINGLE_TABLE, &[Sdtype::Numerical]),
        ];
        let cases = get_test_cases(
            &entries,
            &set(&[Sdtype::Categorical, Sdtype::Boolean, Sdtype::Datetime]),
            DEFAULT_MAX_SIZE,
        );
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].table_name, "mixed_table");
        assert_eq!(cases[0].sdtypes, set(&[Sdtype::Boolean, Sdtype::Categorical]));
    }
}
