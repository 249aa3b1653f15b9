//! Copy engines for parsync.
//!
//! This crate hides the actual data movement behind the [`CopyEngine`] trait:
//!
//! * [`RsyncEngine`] runs the external `rsync` tool in archive mode
//! * [`NativeEngine`] copies in-process with `jwalk`, `rayon` and `reflink-copy`
//! * [`summarize_tree`] totals a copied tree for reporting
//!
//! # Example
//!
//! ```rust,ignore
//! use parsync_copy::{CopyEngine, CopyOptions, CopyRequest, RsyncEngine};
//!
//! let engine = RsyncEngine::new();
//! engine.probe()?;
//! engine.copy(&CopyRequest::entry(&source.join("photos"), &dest), &CopyOptions::default())?;
//! ```

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod count;
mod engine;
mod error;
mod native;
mod rsync;

pub use count::{TreeSummary, summarize_tree};
pub use engine::{CopyEngine, CopyMode, CopyOptions, CopyRequest, DEFAULT_COPY_OPTIONS};
pub use error::CopyError;
pub use native::NativeEngine;
pub use rsync::RsyncEngine;
