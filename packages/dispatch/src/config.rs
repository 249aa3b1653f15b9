//! Dispatch configuration and policy constants.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use parsync_copy::{CopyOptions, DEFAULT_COPY_OPTIONS};

/// Hard upper bound on concurrent copy jobs.
pub const MAX_JOBS: usize = 16;

/// Sources with fewer top-level entries than this are copied in one pass.
pub const SERIAL_THRESHOLD: usize = 3;

/// Maximum number of top-level directories turned into jobs.
pub const MAX_DIRECTORIES: usize = 1000;

/// Maximum number of top-level files turned into jobs.
pub const MAX_FILES: usize = 10_000;

/// Clamp a requested job count to `1..=MAX_JOBS`.
#[must_use]
pub fn clamp_jobs(requested: usize) -> usize {
    requested.clamp(1, MAX_JOBS)
}

/// Settings for one dispatch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Requested job count. Always read through [`DispatchConfig::effective_jobs`].
    pub jobs: usize,
    /// Log per-job start/end lines and ask the engine for verbose output.
    pub verbose: bool,
    /// Simulate only.
    pub dry_run: bool,
    /// Copy-tool option string, e.g. `-a`.
    pub copy_options: String,
}

impl DispatchConfig {
    /// Job count after clamping.
    #[must_use]
    pub fn effective_jobs(&self) -> usize {
        clamp_jobs(self.jobs)
    }

    /// Options handed to the copy engine for every invocation.
    #[must_use]
    pub fn copy_options(&self) -> CopyOptions {
        CopyOptions {
            verbose: self.verbose,
            dry_run: self.dry_run,
            extra_args: CopyOptions::parse_args(&self.copy_options),
        }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            jobs: 1,
            verbose: false,
            dry_run: false,
            copy_options: DEFAULT_COPY_OPTIONS.to_string(),
        }
    }
}
