//! tquality: Transformer Quality Benchmark CLI
//!
//! Scores every registered transformer against the benchmark catalog and
//! exits with a non-zero status when any transformer fails.

use std::process::ExitCode;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use console::style;

use tquality::cli::{Cli, Commands};
use tquality::pipeline::{run_quality, LocalDatasetSource, TransformerRegistry};
use tquality::report::{
    display_registry, display_results, display_run_summary, display_verdicts,
    export_quality_report, QualityReport,
};
use tquality::utils::{
    create_spinner, finish_with_success, finish_with_warning, print_banner, print_completion,
    print_config, print_count, print_info, print_step_header, print_success, print_warning,
};

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("{} {:#}", style("Error:").red().bold(), err);
            ExitCode::from(2)
        }
    }
}

/// Returns whether every transformer passed
fn run() -> Result<bool> {
    let cli = Cli::parse();
    let registry = TransformerRegistry::with_defaults();

    // Handle subcommands
    if let Some(Commands::List) = &cli.command {
        display_registry(&registry);
        return Ok(true);
    }

    let config = cli.quality_config();
    let source =
        LocalDatasetSource::new(&cli.data_dir).with_infer_schema_length(cli.schema_rows());

    for name in &config.skip_transformers {
        if !registry.names().contains(&name.as_str()) {
            print_warning(&format!("--skip-transformer '{}' matches no registered transformer", name));
        }
    }

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(&cli.data_dir, &config);

    // Step 1: Benchmark
    print_step_header(1, "Benchmark Transformers");
    let step_start = Instant::now();
    let run = run_quality(&config, &registry, &source)?;

    if run.test_cases.is_empty() {
        print_warning("No catalog entries matched the sdtypes under test");
    } else {
        print_count(
            "test case(s)",
            run.test_cases.len(),
            Some(&format!("(size < {})", config.max_size)),
        );
    }
    print_success(&format!(
        "Computed {} score(s) in {:.1}s",
        run.score_count(),
        step_start.elapsed().as_secs_f64()
    ));

    // Step 2: Rank results
    print_step_header(2, "Rank Results");
    print_info(&format!(
        "Groups with mean R² below {:.2} are left out",
        config.r2_threshold
    ));
    display_results(&run.results, config.test_threshold);

    // Step 3: Verdicts
    print_step_header(3, "Assess Transformers");
    display_verdicts(&run);

    // Step 4: Report
    if let Some(report_path) = &cli.report {
        print_step_header(4, "Save Report");
        let spinner = create_spinner("Writing quality report...");
        let report = QualityReport::new(&config, &run);
        match export_quality_report(&report, report_path) {
            Ok(()) => finish_with_success(
                &spinner,
                &format!("Saved to {}", report_path.display()),
            ),
            Err(err) => {
                finish_with_warning(&spinner, "Report not written");
                return Err(err);
            }
        }
    }

    display_run_summary(&run);
    print_completion(run.passed());

    Ok(run.passed())
}
