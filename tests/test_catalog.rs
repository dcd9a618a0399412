//! Tests for catalog loading and test-case selection

mod common;

use std::collections::BTreeSet;

use common::{BenchmarkDir, CatalogRow};
use tquality::pipeline::{get_test_cases, load_catalog, QualityError, Sdtype, DEFAULT_MAX_SIZE};

fn row<'a>(name: &'a str, size: f64, modality: &'a str, types: &'a str) -> CatalogRow<'a> {
    CatalogRow {
        name,
        table_name: "table",
        table_size: size,
        modality,
        table_types: types,
    }
}

#[test]
fn test_load_catalog_parses_set_literals() {
    let bench = BenchmarkDir::new();
    let path = bench.write_catalog(&[
        row("adult", 3.9, "single-table", "{'categorical', 'numerical'}"),
        row("rossmann", 12.0, "multi-table", "{'datetime', 'boolean'}"),
    ]);

    let entries = load_catalog(&path).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].name, "adult");
    assert_eq!(entries[0].table_size, 3.9);
    assert_eq!(
        entries[0].table_types,
        BTreeSet::from([Sdtype::Categorical, Sdtype::Numerical])
    );
    assert_eq!(entries[1].modality, "multi-table");
}

#[test]
fn test_size_cap_excludes_large_and_equal_tables() {
    let bench = BenchmarkDir::new();
    let path = bench.write_catalog(&[
        row("too_big", 10_000_000.0, "single-table", "{'categorical'}"),
        row("at_cap", 5_000_000.0, "single-table", "{'categorical'}"),
        row("fits", 4_999_999.0, "single-table", "{'categorical'}"),
    ]);
    let entries = load_catalog(&path).unwrap();

    let cases = get_test_cases(&entries, &BTreeSet::from([Sdtype::Categorical]), DEFAULT_MAX_SIZE);
    let names: Vec<&str> = cases.iter().map(|c| c.dataset_name.as_str()).collect();
    assert_eq!(names, vec!["fits"]);
}

#[test]
fn test_test_cases_keep_only_requested_sdtypes() {
    let bench = BenchmarkDir::new();
    let path = bench.write_catalog(&[
        row("mixed", 1.0, "single-table", "{'categorical', 'datetime', 'numerical'}"),
        row("numbers", 1.0, "single-table", "{'numerical'}"),
        row("nothing", 1.0, "single-table", "set()"),
    ]);
    let entries = load_catalog(&path).unwrap();

    let requested = BTreeSet::from([Sdtype::Datetime, Sdtype::Boolean]);
    let cases = get_test_cases(&entries, &requested, DEFAULT_MAX_SIZE);
    assert_eq!(cases.len(), 1);
    assert_eq!(cases[0].dataset_name, "mixed");
    assert_eq!(cases[0].table_name, "table");
    assert_eq!(cases[0].sdtypes, BTreeSet::from([Sdtype::Datetime]));
}

#[test]
fn test_catalog_missing_column_is_reported() {
    let bench = BenchmarkDir::new();
    let path = bench.path().join("bad.csv");
    std::fs::write(&path, "name,table_name,table_size,modality\nadult,adult,1.0,single-table\n")
        .unwrap();

    let err = load_catalog(&path).unwrap_err();
    assert_eq!(
        err.downcast_ref::<QualityError>(),
        Some(&QualityError::MissingCatalogColumn("table_types".to_string()))
    );
}

#[test]
fn test_catalog_rejects_unsafe_table_types() {
    let bench = BenchmarkDir::new();
    let path = bench.write_catalog(&[row(
        "evil",
        1.0,
        "single-table",
        "{__import__('os').system('x')}",
    )]);

    let err = load_catalog(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("evil"));
}
