//! Error types for copy engines.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

/// Errors that can occur while running a copy engine.
#[derive(Debug, thiserror::Error)]
pub enum CopyError {
    /// The external copy tool is not installed or not on `PATH`.
    #[error("{tool} not found on PATH. Please install {tool}.")]
    ToolNotFound {
        /// Name of the missing tool.
        tool: String,
    },

    /// The external copy tool could not be started.
    #[error("Failed to run {tool}: {io_error}")]
    ToolSpawnError {
        /// Name of the tool.
        tool: String,
        /// The underlying IO error.
        io_error: std::io::Error,
    },

    /// The external copy tool exited unsuccessfully.
    #[error("{tool} failed copying {} ({})", source_path.display(), exit_description(*code))]
    ToolFailed {
        /// Name of the tool.
        tool: String,
        /// Source path of the failed invocation.
        source_path: PathBuf,
        /// Exit code, if the process was not killed by a signal.
        code: Option<i32>,
    },

    /// Failed to read source directory.
    #[error("Failed to read directory {}: {io_error}", path.display())]
    ReadDirError {
        /// The directory path.
        path: PathBuf,
        /// The underlying IO error.
        io_error: std::io::Error,
    },

    /// Failed to create target directory.
    #[error("Failed to create directory {}: {io_error}", path.display())]
    CreateDirError {
        /// The directory path.
        path: PathBuf,
        /// The underlying IO error.
        io_error: std::io::Error,
    },

    /// Failed to copy a file.
    #[error("Failed to copy {} to {}: {io_error}", source_path.display(), target_path.display())]
    FileCopyError {
        /// Source file path.
        source_path: PathBuf,
        /// Target file path.
        target_path: PathBuf,
        /// The underlying IO error.
        io_error: std::io::Error,
    },

    /// Failed to read symlink target.
    #[error("Failed to read symlink {}: {io_error}", path.display())]
    ReadLinkError {
        /// The symlink path.
        path: PathBuf,
        /// The underlying IO error.
        io_error: std::io::Error,
    },

    /// Failed to create symlink.
    #[error("Failed to create symlink {}: {io_error}", path.display())]
    CreateSymlinkError {
        /// The symlink path.
        path: PathBuf,
        /// The underlying IO error.
        io_error: std::io::Error,
    },

    /// Failed to read or apply file metadata.
    #[error("Failed to get metadata for {}: {io_error}", path.display())]
    MetadataError {
        /// The file path.
        path: PathBuf,
        /// The underlying IO error.
        io_error: std::io::Error,
    },

    /// Directory enumeration failed.
    #[error("Failed to enumerate directory {}: {message}", path.display())]
    EnumerationError {
        /// The directory path.
        path: PathBuf,
        /// Error message.
        message: String,
    },
}

fn exit_description(code: Option<i32>) -> String {
    code.map_or_else(
        || "terminated by signal".to_string(),
        |c| format!("exit code {c}"),
    )
}
