//! Progress bar utilities for the CLI.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use indicatif::{ProgressBar, ProgressStyle};
use parsync_dispatch::DispatchProgress;

/// Job-level progress bar.
pub struct JobProgress {
    bar: ProgressBar,
}

impl JobProgress {
    /// Create a progress bar for `total` jobs.
    ///
    /// If progress is disabled, the bar is hidden.
    #[must_use]
    pub fn new(enabled: bool, total: u64) -> Self {
        if !enabled {
            return Self {
                bar: ProgressBar::hidden(),
            };
        }

        let bar = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("  [{bar:25.green/dim}] {pos}/{len} jobs {elapsed_precise} {msg}")
            .map_or_else(|_| ProgressStyle::default_bar(), |s| s.progress_chars("━━─"));
        bar.set_style(style);
        Self { bar }
    }

    /// Apply a dispatcher progress snapshot.
    pub fn update(&self, progress: &DispatchProgress) {
        self.bar.set_length(progress.jobs_total);
        self.bar.set_position(progress.jobs_done);
        let percent = progress.percentage();
        match &progress.current {
            Some(current) => self.bar.set_message(format!("{percent:.0}% {current}")),
            None => self.bar.set_message(format!("{percent:.0}%")),
        }
    }

    /// Clear the bar once dispatch is over.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
