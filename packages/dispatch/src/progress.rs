//! Progress tracking for dispatch runs.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::sync::atomic::{AtomicU64, Ordering};

/// Progress snapshot handed to the progress callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchProgress {
    /// Total number of jobs.
    pub jobs_total: u64,
    /// Number of jobs finished so far, successful or not.
    pub jobs_done: u64,
    /// Name of the job that just finished (if any).
    pub current: Option<String>,
}

impl DispatchProgress {
    /// Create a new progress report.
    #[must_use]
    pub const fn new(jobs_total: u64, jobs_done: u64, current: Option<String>) -> Self {
        Self {
            jobs_total,
            jobs_done,
            current,
        }
    }

    /// Progress as a percentage (0.0 to 100.0).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percentage(&self) -> f64 {
        if self.jobs_total == 0 {
            100.0
        } else {
            (self.jobs_done as f64 / self.jobs_total as f64) * 100.0
        }
    }
}

/// Thread-safe job counter shared by the worker pool.
#[derive(Debug, Default)]
pub struct JobTracker {
    jobs_total: AtomicU64,
    jobs_done: AtomicU64,
    jobs_failed: AtomicU64,
}

impl JobTracker {
    /// Create a tracker for `total` jobs.
    #[must_use]
    pub const fn new(total: u64) -> Self {
        Self {
            jobs_total: AtomicU64::new(total),
            jobs_done: AtomicU64::new(0),
            jobs_failed: AtomicU64::new(0),
        }
    }

    /// Record one finished job and return the new done count.
    pub fn finish(&self, failed: bool) -> u64 {
        if failed {
            self.jobs_failed.fetch_add(1, Ordering::SeqCst);
        }
        self.jobs_done.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Total jobs.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.jobs_total.load(Ordering::SeqCst)
    }

    /// Finished jobs.
    #[must_use]
    pub fn done(&self) -> u64 {
        self.jobs_done.load(Ordering::SeqCst)
    }

    /// Failed jobs.
    #[must_use]
    pub fn failed(&self) -> u64 {
        self.jobs_failed.load(Ordering::SeqCst)
    }

    /// Get a progress snapshot.
    #[must_use]
    pub fn snapshot(&self, current: Option<String>) -> DispatchProgress {
        DispatchProgress::new(self.total(), self.done(), current)
    }
}
