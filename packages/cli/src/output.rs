//! Terminal output formatting.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::Path;

use colored::Colorize;
use parsync_copy::TreeSummary;
use parsync_dispatch::{DispatchReport, Plan};

/// Print the plan before copying.
pub fn print_plan(plan: &Plan, destination: &Path, engine: &str, dry_run: bool) {
    println!(
        "{} {} {} {}",
        "parsync".bold(),
        plan.source.display().to_string().cyan(),
        "->".dimmed(),
        destination.display().to_string().cyan()
    );
    println!(
        "  {} top-level entries, {} strategy, {} engine",
        plan.jobs.len(),
        plan.strategy,
        engine
    );
    if dry_run {
        println!("  {}", "Dry run: nothing will be written".yellow());
    }
}

/// Print the dispatch outcome.
pub fn print_report(report: &DispatchReport) {
    if report.is_success() {
        println!(
            "{} {} copy invocation{} finished",
            "✓".green(),
            report.invocations,
            plural(report.invocations)
        );
    } else {
        println!(
            "{} {} of {} copy invocation{} failed",
            "✗".red(),
            report.failed,
            report.invocations,
            plural(report.invocations)
        );
    }
}

/// Print the destination tree summary.
pub fn print_summary(destination: &Path, summary: &TreeSummary) {
    println!(
        "{} {} file{}, {} director{}, {} symlink{}, {}",
        destination.display().to_string().cyan(),
        summary.files,
        plural(summary.files),
        summary.directories,
        if summary.directories == 1 { "y" } else { "ies" },
        summary.symlinks,
        plural(summary.symlinks),
        format_bytes(summary.bytes).bold()
    );
}

/// Print error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", "Error:".red().bold(), message);
}

const fn plural(n: u64) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Format a byte count with binary units.
#[allow(clippy::cast_precision_loss)]
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["KiB", "MiB", "GiB", "TiB", "PiB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}
