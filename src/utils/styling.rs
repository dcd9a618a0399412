//! Terminal styling utilities for the benchmark console output

use console::{style, Emoji};
use std::path::Path;

use crate::pipeline::QualityConfig;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[x] ");
pub static CHART: Emoji<'_, '_> = Emoji("📊 ", "");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static TARGET: Emoji<'_, '_> = Emoji("🎯 ", "");
pub static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
pub static SHUFFLE: Emoji<'_, '_> = Emoji("🔀 ", "");

/// Print the application banner
pub fn print_banner(version: &str) {
    let banner = r#"
    ████████╗ ██████╗ ██╗   ██╗ █████╗ ██╗     ██╗████████╗██╗   ██╗
    ╚══██╔══╝██╔═══██╗██║   ██║██╔══██╗██║     ██║╚══██╔══╝╚██╗ ██╔╝
       ██║   ██║   ██║██║   ██║███████║██║     ██║   ██║    ╚████╔╝
       ██║   ██║▄▄ ██║██║   ██║██╔══██║██║     ██║   ██║     ╚██╔╝
       ██║   ╚██████╔╝╚██████╔╝██║  ██║███████╗██║   ██║      ██║
       ╚═╝    ╚══▀▀═╝  ╚═════╝ ╚═╝  ╚═╝╚══════╝╚═╝   ╚═╝      ╚═╝
    "#;

    println!();
    println!("{}", style(banner).cyan().bold());
    println!(
        "    {} {}",
        style("R²").magenta().bold(),
        style("Transformer quality benchmark").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print configuration card
pub fn print_config(data_dir: &Path, config: &QualityConfig) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);
    let skip_sdtypes = config
        .skip_sdtypes
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let cv = format!(
        "{} folds, {}",
        config.cv.n_splits,
        if config.cv.shuffle {
            format!("seed {}", config.cv.seed)
        } else {
            "no shuffle".to_string()
        }
    );

    println!("    ┌{}┐", line);
    println!(
        "    │ {}{}│",
        style("⚙️  Configuration").cyan().bold(),
        " ".repeat(box_width - 20)
    );
    println!("    ├{}┤", line);
    println!(
        "    │  {} Data:    {:<38}│",
        FOLDER,
        truncate_path(data_dir, 37)
    );
    println!(
        "    │  {} Catalog: {:<38}│",
        SAVE,
        truncate_path(&config.catalog, 37)
    );
    println!("    ├{}┤", line);
    println!(
        "    │  {} R² threshold:   {:<31}│",
        CHART,
        style(format!("{:.2}", config.r2_threshold)).yellow()
    );
    println!(
        "    │  {} Test threshold: {:<31}│",
        TARGET,
        style(format!("{:.2}", config.test_threshold)).yellow()
    );
    println!(
        "    │  {} CV:             {:<31}│",
        SHUFFLE,
        style(cv).yellow()
    );
    println!(
        "    │  {} Skip sdtypes:   {:<31}│",
        INFO,
        truncate_string(&skip_sdtypes, 30)
    );
    println!("    └{}┘", line);
    println!();
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print a warning to stderr
pub fn print_warning(message: &str) {
    eprintln!("    {} {}", style("⚠").yellow().bold(), style(message).yellow());
}

/// Print the final message for a finished run
pub fn print_completion(passed: bool) {
    println!();
    if passed {
        println!(
            "    {} {}",
            ROCKET,
            style("All transformers passed the quality benchmark!").green().bold()
        );
    } else {
        println!(
            "    {} {}",
            CROSS,
            style("Some transformers failed the quality benchmark").red().bold()
        );
    }
    println!();
}

/// Print a styled count message
pub fn print_count(description: &str, count: usize, threshold_info: Option<&str>) {
    if let Some(info) = threshold_info {
        println!(
            "      Found {} {} {}",
            style(count).yellow().bold(),
            description,
            style(info).dim()
        );
    } else {
        println!(
            "      Found {} {}",
            style(count).yellow().bold(),
            description
        );
    }
}

// Helper functions

fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    truncate_string(&path_str, max_len)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        s.to_string()
    } else {
        let tail: String = chars[chars.len() - (max_len - 3)..].iter().collect();
        format!("...{}", tail)
    }
}
