//! Strategy selection and job dispatch.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use parsync_copy::{CopyEngine, CopyOptions, CopyRequest};
use rayon::prelude::*;

use crate::config::{DispatchConfig, SERIAL_THRESHOLD};
use crate::error::DispatchError;
use crate::job::{EnumerationLimits, Job, enumerate_jobs};
use crate::progress::{DispatchProgress, JobTracker};

/// How a plan will be executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// One synchronous copy of the whole source tree.
    Serial,
    /// One copy per job on a pool of `workers` threads.
    Parallel {
        /// Pool size.
        workers: usize,
    },
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Serial => write!(f, "serial"),
            Self::Parallel { workers } => write!(f, "parallel ({workers} workers)"),
        }
    }
}

/// Pick a strategy for `job_count` top-level entries.
///
/// Fewer than [`SERIAL_THRESHOLD`] entries always run serially, whatever the
/// job cap. Otherwise the pool never exceeds the clamped cap or the number
/// of jobs.
#[must_use]
pub fn select_strategy(job_count: usize, effective_jobs: usize) -> Strategy {
    if job_count < SERIAL_THRESHOLD {
        Strategy::Serial
    } else {
        Strategy::Parallel {
            workers: effective_jobs.min(job_count).max(1),
        }
    }
}

/// Enumerated jobs plus the chosen strategy.
#[derive(Debug, Clone)]
pub struct Plan {
    /// Source root.
    pub source: PathBuf,
    /// Top-level jobs.
    pub jobs: Vec<Job>,
    /// Execution strategy.
    pub strategy: Strategy,
}

/// Outcome of a dispatch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReport {
    /// Strategy that was used.
    pub strategy: Strategy,
    /// Number of copy engine invocations.
    pub invocations: u64,
    /// Number of invocations that failed. Only the parallel path records
    /// failures here; a serial failure is returned as an error.
    pub failed: u64,
}

impl DispatchReport {
    /// Whether every invocation succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Splits a source tree into top-level jobs and drives a [`CopyEngine`].
#[derive(Debug)]
pub struct Dispatcher<E> {
    engine: E,
    config: DispatchConfig,
    limits: EnumerationLimits,
}

impl<E: CopyEngine> Dispatcher<E> {
    /// Create a dispatcher with the default enumeration limits.
    #[must_use]
    pub fn new(engine: E, config: DispatchConfig) -> Self {
        Self {
            engine,
            config,
            limits: EnumerationLimits::default(),
        }
    }

    /// Override the enumeration limits.
    #[must_use]
    pub const fn with_limits(mut self, limits: EnumerationLimits) -> Self {
        self.limits = limits;
        self
    }

    /// The configuration this dispatcher runs with.
    #[must_use]
    pub const fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// The underlying copy engine.
    #[must_use]
    pub const fn engine(&self) -> &E {
        &self.engine
    }

    /// Enumerate `source` and choose a strategy without copying anything.
    ///
    /// # Errors
    ///
    /// * If the source is missing, not a directory, or unreadable
    pub fn plan(&self, source: &Path) -> Result<Plan, DispatchError> {
        let jobs = enumerate_jobs(source, self.limits)?;
        let strategy = select_strategy(jobs.len(), self.config.effective_jobs());

        log::debug!(
            "Planned {} jobs for {} using {} strategy",
            jobs.len(),
            source.display(),
            strategy
        );

        Ok(Plan {
            source: source.to_path_buf(),
            jobs,
            strategy,
        })
    }

    /// Copy `source` into `destination`.
    ///
    /// # Errors
    ///
    /// * See [`Dispatcher::run_with_progress`]
    pub fn run(&self, source: &Path, destination: &Path) -> Result<DispatchReport, DispatchError> {
        self.run_with_progress(source, destination, |_| {})
    }

    /// Copy `source` into `destination`, reporting after each finished job.
    ///
    /// The destination is created first unless this is a dry run. Nothing
    /// touches the destination if the source cannot be enumerated.
    ///
    /// # Errors
    ///
    /// * If the source is missing, not a directory, or unreadable
    /// * If the destination cannot be created
    /// * If the worker pool cannot be started
    /// * If the serial copy fails (parallel job failures are counted in the
    ///   report instead)
    pub fn run_with_progress<F>(
        &self,
        source: &Path,
        destination: &Path,
        on_progress: F,
    ) -> Result<DispatchReport, DispatchError>
    where
        F: Fn(&DispatchProgress) + Sync,
    {
        let plan = self.plan(source)?;
        self.execute(&plan, destination, on_progress)
    }

    /// Execute a previously computed plan.
    ///
    /// # Errors
    ///
    /// * See [`Dispatcher::run_with_progress`]
    pub fn execute<F>(
        &self,
        plan: &Plan,
        destination: &Path,
        on_progress: F,
    ) -> Result<DispatchReport, DispatchError>
    where
        F: Fn(&DispatchProgress) + Sync,
    {
        if !self.config.dry_run && !destination.exists() {
            log::debug!("Creating destination {}", destination.display());
            fs::create_dir_all(destination).map_err(|e| {
                DispatchError::CreateDestinationError {
                    path: destination.to_path_buf(),
                    source: e,
                }
            })?;
        }

        let options = self.config.copy_options();

        match plan.strategy {
            Strategy::Serial => self.execute_serial(plan, destination, &options, &on_progress),
            Strategy::Parallel { workers } => {
                self.execute_parallel(plan, destination, workers, &options, &on_progress)
            }
        }
    }

    fn execute_serial<F>(
        &self,
        plan: &Plan,
        destination: &Path,
        options: &CopyOptions,
        on_progress: &F,
    ) -> Result<DispatchReport, DispatchError>
    where
        F: Fn(&DispatchProgress),
    {
        log::debug!(
            "{} top-level entries is below {}; copying {} in one pass with {}",
            plan.jobs.len(),
            SERIAL_THRESHOLD,
            plan.source.display(),
            self.engine.name()
        );

        let tracker = JobTracker::new(1);
        let label = plan.source.to_string_lossy().to_string();
        on_progress(&tracker.snapshot(None));

        let request = CopyRequest::contents(&plan.source, destination);
        self.log_start(&label);
        let started = Instant::now();
        let result = self.engine.copy(&request, options);
        self.log_end(&label, started, result.is_ok());
        result?;

        tracker.finish(false);
        on_progress(&tracker.snapshot(Some(label)));

        Ok(DispatchReport {
            strategy: plan.strategy,
            invocations: 1,
            failed: 0,
        })
    }

    fn execute_parallel<F>(
        &self,
        plan: &Plan,
        destination: &Path,
        workers: usize,
        options: &CopyOptions,
        on_progress: &F,
    ) -> Result<DispatchReport, DispatchError>
    where
        F: Fn(&DispatchProgress) + Sync,
    {
        log::debug!(
            "Dispatching {} jobs on {} workers with {}",
            plan.jobs.len(),
            workers,
            self.engine.name()
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("parsync-job-{i}"))
            .build()?;

        let tracker = JobTracker::new(plan.jobs.len() as u64);
        on_progress(&tracker.snapshot(None));

        pool.install(|| {
            plan.jobs.par_iter().for_each(|job| {
                let name = job.name();
                let failed = !self.run_job(job, destination, options);
                tracker.finish(failed);
                on_progress(&tracker.snapshot(Some(name)));
            });
        });

        let failed = tracker.failed();
        if failed > 0 {
            log::warn!("{failed} of {} jobs failed", tracker.total());
        }

        Ok(DispatchReport {
            strategy: plan.strategy,
            invocations: tracker.done(),
            failed,
        })
    }

    /// Returns whether the job succeeded.
    fn run_job(&self, job: &Job, destination: &Path, options: &CopyOptions) -> bool {
        let name = job.name();
        let request = CopyRequest::entry(&job.path, destination);

        self.log_start(&format!("{name} ({})", job.kind));
        let started = Instant::now();

        let result = self.engine.copy(&request, options);
        self.log_end(&name, started, result.is_ok());

        if let Err(e) = &result {
            log::warn!("Job {name} failed: {e}");
        }
        result.is_ok()
    }

    fn log_start(&self, label: &str) {
        if self.config.verbose {
            log::info!("start {label}");
        } else {
            log::debug!("start {label}");
        }
    }

    fn log_end(&self, label: &str, started: Instant, succeeded: bool) {
        let elapsed = started.elapsed();
        let outcome = if succeeded { "ok" } else { "failed" };
        if self.config.verbose {
            log::info!("done  {label} in {elapsed:.2?}: {outcome}");
        } else {
            log::debug!("done  {label} in {elapsed:.2?}: {outcome}");
        }
    }
}
