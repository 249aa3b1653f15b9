//! parsync CLI entry point.
//!
//! Copies a directory tree by splitting it into top-level jobs and running
//! them through a copy engine in parallel.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod args;
mod output;
mod progress;

use std::env;

use clap::Parser;
use log::LevelFilter;

use args::Args;
use parsync_config::{EngineKind, load_settings_or_default};
use parsync_copy::{CopyEngine, NativeEngine, RsyncEngine, summarize_tree};
use parsync_dispatch::{Dispatcher, Strategy};
use progress::JobProgress;

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // Help and version go to stdout and are not failures.
            let code = i32::from(e.use_stderr());
            let _ = e.print();
            std::process::exit(code);
        }
    };

    init_logging(args.verbose);

    if let Err(e) = run(&args) {
        output::print_error(&e.to_string());
        std::process::exit(1);
    }
}

/// Timestamped logging. `-v` raises the default level; `RUST_LOG` wins.
fn init_logging(verbose: bool) {
    let mut builder = pretty_env_logger::formatted_timed_builder();
    builder.filter_level(if verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    });
    if let Ok(filters) = env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

/// Main application logic.
fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let settings = load_settings_or_default(args.config.as_deref())?;
    let config = args.dispatch_config(&settings);
    let engine_kind = args.engine_kind(&settings);

    log::debug!(
        "jobs={} (effective {}) verbose={} dry_run={} copy_options={:?} engine={}",
        config.jobs,
        config.effective_jobs(),
        config.verbose,
        config.dry_run,
        config.copy_options,
        engine_kind
    );

    let engine: Box<dyn CopyEngine> = match engine_kind {
        EngineKind::Rsync => Box::new(RsyncEngine::new()),
        EngineKind::Native => Box::new(NativeEngine::new()),
    };
    let dispatcher = Dispatcher::new(engine, config);

    // Validate the source before checking for the tool or touching DEST.
    let plan = dispatcher.plan(&args.source)?;

    if engine_kind == EngineKind::Rsync {
        RsyncEngine::new().probe()?;
    }

    output::print_plan(
        &plan,
        &args.destination,
        dispatcher.engine().name(),
        dispatcher.config().dry_run,
    );

    let total = match plan.strategy {
        Strategy::Serial => 1,
        Strategy::Parallel { .. } => plan.jobs.len() as u64,
    };
    let progress = JobProgress::new(args.should_show_progress(&settings), total);
    let result = dispatcher.execute(&plan, &args.destination, |p| progress.update(p));
    progress.finish();
    let report = result?;

    output::print_report(&report);

    if args.should_show_summary(&settings) {
        output::print_summary(&args.destination, &summarize_tree(&args.destination));
    }

    if report.is_success() {
        Ok(())
    } else {
        Err(format!(
            "{} of {} copy jobs failed",
            report.failed, report.invocations
        )
        .into())
    }
}
