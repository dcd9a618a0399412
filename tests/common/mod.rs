//! Shared test utilities and fixture generators

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use polars::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tempfile::TempDir;

use tquality::pipeline::{Sdtype, Transformer};

pub const CATEGORIES: [&str; 4] = ["a", "b", "c", "d"];

/// Create a DataFrame where `num1` is driven by the category and `num2` is noise
///
/// - `cat`: categories cycling a, b, c, d
/// - `num1`: 10 * category index plus small noise
/// - `num2`: uniform noise in [0, 100)
pub fn create_signal_dataframe(rows: usize, seed: u64) -> DataFrame {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let cat: Vec<&str> = (0..rows).map(|i| CATEGORIES[i % CATEGORIES.len()]).collect();
    let num1: Vec<f64> = (0..rows)
        .map(|i| (i % CATEGORIES.len()) as f64 * 10.0 + rng.gen_range(-1.0..1.0))
        .collect();
    let num2: Vec<f64> = (0..rows).map(|_| rng.gen_range(0.0..100.0)).collect();

    df! {
        "cat" => cat,
        "num1" => num1,
        "num2" => num2,
    }
    .unwrap()
}

/// Mean of `num1` per category, the ideal encoding of `cat`
pub fn category_means(df: &DataFrame) -> HashMap<String, f64> {
    let cats = df.column("cat").unwrap().str().unwrap();
    let values = df.column("num1").unwrap().f64().unwrap();

    let mut sums: HashMap<String, (f64, usize)> = HashMap::new();
    for (cat, value) in cats.into_iter().zip(values.into_iter()) {
        if let (Some(cat), Some(value)) = (cat, value) {
            let entry = sums.entry(cat.to_string()).or_insert((0.0, 0));
            entry.0 += value;
            entry.1 += 1;
        }
    }
    sums.into_iter()
        .map(|(cat, (sum, count))| (cat, sum / count as f64))
        .collect()
}

/// Categorical transformer that encodes each category as a known target mean
#[derive(Clone)]
pub struct MeanEncoder {
    pub means: HashMap<String, f64>,
}

impl Transformer for MeanEncoder {
    fn name(&self) -> &str {
        "MeanEncoder"
    }

    fn input_sdtype(&self) -> Sdtype {
        Sdtype::Categorical
    }

    fn fit(&mut self, _column: &Column) -> Result<()> {
        Ok(())
    }

    fn transform(&self, column: &Column) -> Result<Vec<Vec<f64>>> {
        let cast = column.cast(&DataType::String)?;
        let values = cast
            .str()?
            .into_iter()
            .map(|v| v.and_then(|c| self.means.get(c).copied()).unwrap_or(0.0))
            .collect();
        Ok(vec![values])
    }

    fn fresh(&self) -> Box<dyn Transformer> {
        Box::new(self.clone())
    }
}

/// Categorical transformer that ignores its input and emits seeded noise
#[derive(Clone)]
pub struct NoiseEncoder {
    pub seed: u64,
}

impl Transformer for NoiseEncoder {
    fn name(&self) -> &str {
        "NoiseEncoder"
    }

    fn input_sdtype(&self) -> Sdtype {
        Sdtype::Categorical
    }

    fn fit(&mut self, _column: &Column) -> Result<()> {
        Ok(())
    }

    fn transform(&self, column: &Column) -> Result<Vec<Vec<f64>>> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        Ok(vec![(0..column.len()).map(|_| rng.gen::<f64>()).collect()])
    }

    fn fresh(&self) -> Box<dyn Transformer> {
        Box::new(self.clone())
    }
}

/// One catalog row for [`BenchmarkDir::write_catalog`]
pub struct CatalogRow<'a> {
    pub name: &'a str,
    pub table_name: &'a str,
    pub table_size: f64,
    pub modality: &'a str,
    pub table_types: &'a str,
}

/// A temporary benchmark data directory
pub struct BenchmarkDir {
    pub dir: TempDir,
}

impl BenchmarkDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.path().join("datasets.csv")
    }

    /// Write `<dir>/<dataset>/<table>.csv`
    pub fn add_csv_table(&self, dataset: &str, table: &str, df: &mut DataFrame) -> PathBuf {
        let dataset_dir = self.path().join(dataset);
        std::fs::create_dir_all(&dataset_dir).unwrap();
        let path = dataset_dir.join(format!("{}.csv", table));
        let mut file = std::fs::File::create(&path).unwrap();
        CsvWriter::new(&mut file).finish(df).unwrap();
        path
    }

    /// Write `<dir>/<dataset>/<table>.parquet`
    pub fn add_parquet_table(&self, dataset: &str, table: &str, df: &mut DataFrame) -> PathBuf {
        let dataset_dir = self.path().join(dataset);
        std::fs::create_dir_all(&dataset_dir).unwrap();
        let path = dataset_dir.join(format!("{}.parquet", table));
        let file = std::fs::File::create(&path).unwrap();
        ParquetWriter::new(file).finish(df).unwrap();
        path
    }

    /// Write `<dir>/<dataset>/metadata.json`
    pub fn add_metadata(&self, dataset: &str, json: &str) {
        let dataset_dir = self.path().join(dataset);
        std::fs::create_dir_all(&dataset_dir).unwrap();
        std::fs::write(dataset_dir.join("metadata.json"), json).unwrap();
    }

    /// Write the catalog CSV; `table_types` is quoted so set literals survive
    pub fn write_catalog(&self, rows: &[CatalogRow<'_>]) -> PathBuf {
        let mut content = String::from("name,table_name,table_size,modality,table_types\n");
        for row in rows {
            content.push_str(&format!(
                "{},{},{},{},\"{}\"\n",
                row.name, row.table_name, row.table_size, row.modality, row.table_types
            ));
        }
        let path = self.catalog_path();
        std::fs::write(&path, content).unwrap();
        path
    }
}

/// A benchmark directory with one single-table dataset built from
/// [`create_signal_dataframe`]
pub fn create_signal_benchmark(rows: usize) -> BenchmarkDir {
    let bench = BenchmarkDir::new();
    let mut df = create_signal_dataframe(rows, 11);
    bench.add_csv_table("signal", "data", &mut df);
    bench.write_catalog(&[CatalogRow {
        name: "signal",
        table_name: "data",
        table_size: 0.01,
        modality: "single-table",
        table_types: "{'categorical', 'numerical'}",
    }]);
    bench
}

/// Create a DataFrame with two categories in a 60/40 split whose target is
/// fully determined by the category
pub fn create_two_category_dataframe(rows: usize, seed: u64) -> DataFrame {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let split = rows * 3 / 5;
    let kind: Vec<&str> = (0..rows).map(|i| if i < split { "x" } else { "y" }).collect();
    let amount: Vec<f64> = (0..rows)
        .map(|i| (if i < split { 5.0 } else { 50.0 }) + rng.gen_range(-0.5..0.5))
        .collect();
    df! {
        "kind" => kind,
        "amount" => amount,
    }
    .unwrap()
}

/// Integer codes 0..4 cycling, with a target that is a non-monotone map of
/// the code; only a per-code encoding can predict it
///
/// - `code`: i64 in 0..4
/// - `y`: [0, 10, 2, 7][code] plus small noise
pub fn create_coded_dataframe(rows: usize, seed: u64) -> DataFrame {
    const LEVELS: [f64; 4] = [0.0, 10.0, 2.0, 7.0];
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let code: Vec<i64> = (0..rows).map(|i| (i % LEVELS.len()) as i64).collect();
    let y: Vec<f64> = code
        .iter()
        .map(|&c| LEVELS[c as usize] + rng.gen_range(-0.05..0.05))
        .collect();
    df! {
        "code" => code,
        "y" => y,
    }
    .unwrap()
}

/// A table with a date column and a boolean column, each driving one target
///
/// - `signup`: Date, spread over one year
/// - `active`: every third row is true
/// - `tenure`: 2 * days before a fixed cut-off, plus noise
/// - `spend`: 40 when active, plus noise
pub fn create_temporal_dataframe(rows: usize, seed: u64) -> DataFrame {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let days: Vec<i32> = (0..rows).map(|i| 18_000 + (i as i32 * 37) % 365).collect();
    let active: Vec<bool> = (0..rows).map(|i| i % 3 == 0).collect();
    let tenure: Vec<f64> = days
        .iter()
        .map(|&d| (18_400 - d) as f64 * 2.0 + rng.gen_range(-1.0..1.0))
        .collect();
    let spend: Vec<f64> = active
        .iter()
        .map(|&a| (if a { 40.0 } else { 0.0 }) + rng.gen_range(-1.0..1.0))
        .collect();

    let signup = Series::new("signup".into(), days)
        .cast(&DataType::Date)
        .unwrap();
    DataFrame::new(vec![
        signup.into(),
        Column::new("active".into(), active),
        Column::new("tenure".into(), tenure),
        Column::new("spend".into(), spend),
    ])
    .unwrap()
}
