//! Partitioning and parallel dispatch for parsync.
//!
//! A source tree is split into one [`Job`] per top-level entry. Small trees
//! (fewer than [`SERIAL_THRESHOLD`] entries) are copied in a single pass;
//! larger ones run one copy per job on a bounded worker pool. Each job writes
//! only `DEST/<basename>`, so jobs never contend.
//!
//! # Example
//!
//! ```rust,ignore
//! use parsync_copy::RsyncEngine;
//! use parsync_dispatch::{DispatchConfig, Dispatcher};
//!
//! let config = DispatchConfig { jobs: 8, ..DispatchConfig::default() };
//! let report = Dispatcher::new(RsyncEngine::new(), config).run(&source, &dest)?;
//! println!("{} invocations, {} failed", report.invocations, report.failed);
//! ```

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod config;
mod dispatcher;
mod error;
mod job;
mod progress;

pub use config::{
    DispatchConfig, MAX_DIRECTORIES, MAX_FILES, MAX_JOBS, SERIAL_THRESHOLD, clamp_jobs,
};
pub use dispatcher::{DispatchReport, Dispatcher, Plan, Strategy, select_strategy};
pub use error::DispatchError;
pub use job::{EnumerationLimits, Job, JobKind, enumerate_jobs};
pub use progress::{DispatchProgress, JobTracker};
