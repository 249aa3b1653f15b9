//! Error types for dispatch.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop a dispatch run.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The source path does not exist.
    #[error("Source does not exist: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// The source path exists but is not a directory.
    #[error("Source is not a directory: {}", .0.display())]
    SourceNotDirectory(PathBuf),

    /// Listing the source's top-level entries failed.
    #[error("Failed to enumerate {}: {message}", path.display())]
    EnumerationError {
        /// The source directory.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// The destination root could not be created.
    #[error("Failed to create destination {}: {source}", path.display())]
    CreateDestinationError {
        /// The destination path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The worker pool could not be started.
    #[error("Failed to start worker pool: {0}")]
    ThreadPoolError(#[from] rayon::ThreadPoolBuildError),

    /// The single serial copy failed.
    #[error(transparent)]
    Copy(#[from] parsync_copy::CopyError),
}
