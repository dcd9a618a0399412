//! Console summary of a quality run

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;

use crate::pipeline::{row_passes, QualityRun, ResultRow, TransformerRegistry};

fn format_score(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.4}", v))
        .unwrap_or_else(|| "n/a".to_string())
}

fn print_section(icon: &str, title: &str) {
    println!();
    println!("    {} {}", style(icon).cyan(), style(title).white().bold());
    println!("    {}", style("─".repeat(50)).dim());
    println!();
}

fn print_indented(table: &Table) {
    // Indent the table
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

fn header(names: &[&str]) -> Vec<Cell> {
    names
        .iter()
        .map(|name| Cell::new(name).add_attribute(Attribute::Bold))
        .collect()
}

/// Build the results table, one row per (sdtype, dataset, transformer)
pub fn results_table(results: &[ResultRow], test_threshold: f64) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header(&["Sdtype", "Dataset", "Transformer", "Score", "Relative"]));

    for row in results {
        let color = if row_passes(row, test_threshold) {
            Color::Green
        } else {
            Color::Red
        };
        table.add_row(vec![
            Cell::new(&row.sdtype),
            Cell::new(&row.dataset_name),
            Cell::new(&row.transformer_name),
            Cell::new(format_score(row.score)).set_alignment(CellAlignment::Right),
            Cell::new(format_score(row.score_relative_to_average))
                .fg(color)
                .set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

/// Print the results table
pub fn display_results(results: &[ResultRow], test_threshold: f64) {
    print_section("📋", "RESULTS");
    if results.is_empty() {
        println!(
            "    {}",
            style("No dataset columns reached the R² threshold").dim()
        );
        return;
    }
    print_indented(&results_table(results, test_threshold));
}

/// Print one line per transformer verdict, then the rows that failed
pub fn display_verdicts(run: &QualityRun) {
    print_section("🧪", "TRANSFORMER VERDICTS");

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header(&["Transformer", "Datasets", "Failing", "Verdict"]));

    for verdict in &run.verdicts {
        let datasets = run
            .results
            .iter()
            .filter(|r| r.transformer_name == verdict.transformer_name)
            .count();
        let (label, color) = if verdict.passed {
            ("PASS", Color::Green)
        } else {
            ("FAIL", Color::Red)
        };
        table.add_row(vec![
            Cell::new(&verdict.transformer_name),
            Cell::new(datasets),
            Cell::new(verdict.failing_rows.len()).fg(if verdict.failing_rows.is_empty() {
                Color::White
            } else {
                Color::Red
            }),
            Cell::new(label).fg(color).add_attribute(Attribute::Bold),
        ]);
    }
    print_indented(&table);

    for verdict in run.verdicts.iter().filter(|v| !v.passed) {
        println!();
        println!(
            "      {} {}:",
            style(&verdict.transformer_name).red(),
            style(format!("({} failing)", verdict.failing_rows.len())).dim()
        );
        for row in &verdict.failing_rows {
            println!(
                "        {} {} score={} relative={}",
                style("•").dim(),
                row.dataset_name,
                format_score(row.score),
                format_score(row.score_relative_to_average)
            );
        }
    }
}

/// Print the headline counts of a run
pub fn display_run_summary(run: &QualityRun) {
    print_section("📊", "RUN SUMMARY");

    let failed = run.failed_transformers().len();
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header(&["Metric", "Value"]));

    let sdtypes = run
        .sdtypes_tested
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    table.add_row(vec![Cell::new("🧬 Sdtypes tested"), Cell::new(sdtypes)]);
    table.add_row(vec![Cell::new("📁 Test cases"), Cell::new(run.test_cases.len())]);
    table.add_row(vec![Cell::new("🔢 Scores"), Cell::new(run.score_count())]);
    table.add_row(vec![Cell::new("📋 Result rows"), Cell::new(run.results.len())]);
    table.add_row(vec![
        Cell::new("✅ Transformers passed"),
        Cell::new(run.verdicts.len() - failed)
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new("❌ Transformers failed"),
        Cell::new(failed).fg(if failed == 0 { Color::White } else { Color::Red }),
    ]);

    print_indented(&table);
}

/// Print the registered transformers grouped by sdtype
pub fn display_registry(registry: &TransformerRegistry) {
    print_section("🧰", "REGISTERED TRANSFORMERS");

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header(&["Sdtype", "Transformers"]));
    for (sdtype, transformers) in registry.transformers_by_type() {
        let names = transformers
            .iter()
            .map(|t| t.name())
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![Cell::new(sdtype), Cell::new(names)]);
    }
    print_indented(&table);
}
