//! JSON report of a quality run
//!
//! Records the settings the run used, summary counts, every raw score, the
//! ranked results and the per-transformer verdicts.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{
    KFold, QualityConfig, QualityRun, ResultRow, ScoreRow, TestCase, TransformerVerdict,
};

/// Thresholds used in the run
#[derive(Debug, Clone, Serialize)]
pub struct ThresholdsConfig {
    pub r2: f64,
    pub test: f64,
    pub max_table_size: f64,
}

/// Report metadata
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub timestamp: String,
    pub tquality_version: String,
    pub catalog: String,
    pub thresholds: ThresholdsConfig,
    pub cross_validation: KFold,
    pub skipped_sdtypes: Vec<String>,
    pub skipped_transformers: Vec<String>,
}

/// Headline counts
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub test_cases: usize,
    pub scores: usize,
    pub undefined_scores: usize,
    pub result_rows: usize,
    pub transformers_passed: usize,
    pub transformers_failed: usize,
    pub passed: bool,
}

/// Complete quality report
#[derive(Debug, Clone, Serialize)]
pub struct QualityReport {
    pub metadata: ReportMetadata,
    pub summary: RunSummary,
    pub sdtypes_tested: Vec<String>,
    pub transformers_tested: Vec<String>,
    pub test_cases: Vec<TestCase>,
    pub scores: BTreeMap<String, Vec<ScoreRow>>,
    pub results: Vec<ResultRow>,
    pub verdicts: Vec<TransformerVerdict>,
}

impl QualityReport {
    pub fn new(config: &QualityConfig, run: &QualityRun) -> Self {
        let undefined_scores = run
            .scores
            .values()
            .flatten()
            .filter(|row| row.score.is_none())
            .count();
        let transformers_failed = run.failed_transformers().len();

        Self {
            metadata: ReportMetadata {
                timestamp: Utc::now().to_rfc3339(),
                tquality_version: env!("CARGO_PKG_VERSION").to_string(),
                catalog: config.catalog.display().to_string(),
                thresholds: ThresholdsConfig {
                    r2: config.r2_threshold,
                    test: config.test_threshold,
                    max_table_size: config.max_size,
                },
                cross_validation: config.cv,
                skipped_sdtypes: config.skip_sdtypes.iter().map(|s| s.to_string()).collect(),
                skipped_transformers: config.skip_transformers.clone(),
            },
            summary: RunSummary {
                test_cases: run.test_cases.len(),
                scores: run.score_count(),
                undefined_scores,
                result_rows: run.results.len(),
                transformers_passed: run.verdicts.len() - transformers_failed,
                transformers_failed,
                passed: run.passed(),
            },
            sdtypes_tested: run.sdtypes_tested.iter().map(|s| s.to_string()).collect(),
            transformers_tested: run.transformers_tested.clone(),
            test_cases: run.test_cases.clone(),
            scores: run
                .scores
                .iter()
                .map(|(sdtype, rows)| (sdtype.to_string(), rows.clone()))
                .collect(),
            results: run.results.clone(),
            verdicts: run.verdicts.clone(),
        }
    }
}

/// Export the quality report to a JSON file
pub fn export_quality_report(report: &QualityReport, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .context("Failed to serialize quality report to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write quality report to {}", output_path.display()))?;

    Ok(())
}
