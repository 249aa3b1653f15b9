//! Error types for settings loading.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the settings file.
    #[error("Failed to read config file {}: {source}", path.display())]
    ReadError {
        /// Path to the file that couldn't be read.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the settings file.
    #[error("Failed to parse TOML config {}: {source}", path.display())]
    TomlParseError {
        /// Path to the file that couldn't be parsed.
        path: PathBuf,
        /// The underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// Unrecognized engine name.
    #[error("Unknown copy engine: {0} (expected \"rsync\" or \"native\")")]
    UnknownEngine(String),
}
