//! CLI argument definitions.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

use clap::Parser;
use parsync_config::{EngineKind, Settings};
use parsync_copy::DEFAULT_COPY_OPTIONS;
use parsync_dispatch::DispatchConfig;

/// CLI arguments for parsync.
#[derive(Debug, Parser)]
#[command(
    name = "parsync",
    about = "Copy a directory tree by running one rsync per top-level entry in parallel",
    version
)]
pub struct Args {
    /// Directory to copy from.
    #[arg(index = 1, value_name = "SOURCE")]
    pub source: PathBuf,

    /// Directory to copy into (created if missing).
    #[arg(index = 2, value_name = "DEST")]
    pub destination: PathBuf,

    /// Maximum parallel copy jobs (default: CPU count, max 16).
    #[arg(long, short = 'j', value_name = "N")]
    pub jobs: Option<usize>,

    /// Log each job's start and end and pass -v to the copy tool.
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Simulate only: pass -n to the copy tool and do not create DEST.
    #[arg(long = "dry-run", short = 'n')]
    pub dry_run: bool,

    /// Option string for the copy tool (default: "-a").
    #[arg(
        long = "copy-options",
        short = 'o',
        value_name = "OPTIONS",
        allow_hyphen_values = true
    )]
    pub copy_options: Option<String>,

    /// Copy engine: "rsync" or "native".
    #[arg(long, value_name = "ENGINE")]
    pub engine: Option<EngineKind>,

    /// Settings file to use instead of the default location.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable the progress bar (useful for CI environments).
    #[arg(long = "no-progress")]
    pub no_progress: bool,

    /// Skip the destination summary.
    #[arg(long = "no-summary")]
    pub no_summary: bool,
}

impl Args {
    /// Build the dispatch configuration. Flags win over settings, settings
    /// win over built-in defaults.
    #[must_use]
    pub fn dispatch_config(&self, settings: &Settings) -> DispatchConfig {
        DispatchConfig {
            jobs: self.jobs.or(settings.jobs).unwrap_or_else(num_cpus::get),
            verbose: self.verbose,
            dry_run: self.dry_run,
            copy_options: self
                .copy_options
                .clone()
                .or_else(|| settings.copy_options.clone())
                .unwrap_or_else(|| DEFAULT_COPY_OPTIONS.to_string()),
        }
    }

    /// Determine which copy engine to use.
    #[must_use]
    pub fn engine_kind(&self, settings: &Settings) -> EngineKind {
        self.engine.or(settings.engine).unwrap_or_default()
    }

    /// Determine if we should show the progress bar.
    ///
    /// Verbose runs log per-job lines instead.
    #[must_use]
    pub fn should_show_progress(&self, settings: &Settings) -> bool {
        !self.no_progress && !self.verbose && settings.progress.unwrap_or(true)
    }

    /// Determine if we should print the destination summary.
    #[must_use]
    pub fn should_show_summary(&self, settings: &Settings) -> bool {
        !self.no_summary && !self.dry_run && settings.summary.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("parsync").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_short_flags() {
        let args = parse(&["-j", "4", "-v", "-n", "/a", "/b"]);
        assert_eq!(args.jobs, Some(4));
        assert!(args.verbose);
        assert!(args.dry_run);
        assert_eq!(args.source, PathBuf::from("/a"));
        assert_eq!(args.destination, PathBuf::from("/b"));
    }

    #[test]
    fn test_copy_options_accept_leading_hyphen() {
        let args = parse(&["-o", "-aH --delete", "/a", "/b"]);
        assert_eq!(args.copy_options.as_deref(), Some("-aH --delete"));
    }

    #[test]
    fn test_missing_destination_is_rejected() {
        assert!(Args::try_parse_from(["parsync", "/a"]).is_err());
    }

    #[test]
    fn test_unknown_option_is_rejected() {
        assert!(Args::try_parse_from(["parsync", "--bogus", "/a", "/b"]).is_err());
    }

    #[test]
    fn test_unknown_engine_is_rejected() {
        assert!(Args::try_parse_from(["parsync", "--engine", "cp", "/a", "/b"]).is_err());
    }

    #[test]
    fn test_flags_override_settings() {
        let settings = Settings {
            jobs: Some(2),
            copy_options: Some("-aH".to_string()),
            engine: Some(EngineKind::Native),
            progress: Some(true),
            summary: Some(true),
        };
        let args = parse(&["-j", "9", "--engine", "rsync", "/a", "/b"]);
        let config = args.dispatch_config(&settings);

        assert_eq!(config.jobs, 9);
        assert_eq!(config.copy_options, "-aH");
        assert_eq!(args.engine_kind(&settings), EngineKind::Rsync);
    }

    #[test]
    fn test_defaults_without_settings() {
        let args = parse(&["/a", "/b"]);
        let settings = Settings::default();
        let config = args.dispatch_config(&settings);

        assert_eq!(config.jobs, num_cpus::get());
        assert_eq!(config.copy_options, DEFAULT_COPY_OPTIONS);
        assert_eq!(args.engine_kind(&settings), EngineKind::Rsync);
        assert!(args.should_show_progress(&settings));
        assert!(args.should_show_summary(&settings));
    }

    #[test]
    fn test_dry_run_and_verbose_quiet_the_extras() {
        let settings = Settings::default();
        let args = parse(&["-v", "-n", "/a", "/b"]);

        assert!(!args.should_show_progress(&settings));
        assert!(!args.should_show_summary(&settings));
    }
}
