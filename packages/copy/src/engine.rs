//! The copy engine abstraction.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::{Path, PathBuf};

use crate::error::CopyError;

/// Option string used when none is configured.
pub const DEFAULT_COPY_OPTIONS: &str = "-a";

/// How the source of a [`CopyRequest`] maps onto its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyMode {
    /// Copy the children of the source into the destination.
    Contents,
    /// Copy the source itself to `destination/<basename>`.
    Entry,
}

/// A single recursive copy invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyRequest {
    /// Source path.
    pub source: PathBuf,
    /// Destination directory.
    pub destination: PathBuf,
    /// How `source` lands inside `destination`.
    pub mode: CopyMode,
}

impl CopyRequest {
    /// Copy everything under `source` into `destination`.
    #[must_use]
    pub fn contents(source: &Path, destination: &Path) -> Self {
        Self {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            mode: CopyMode::Contents,
        }
    }

    /// Copy `source` as a single entry into `destination`.
    #[must_use]
    pub fn entry(source: &Path, destination: &Path) -> Self {
        Self {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            mode: CopyMode::Entry,
        }
    }

    /// Where the copied source ends up.
    ///
    /// For [`CopyMode::Contents`] this is the destination itself.
    #[must_use]
    pub fn target(&self) -> PathBuf {
        match self.mode {
            CopyMode::Contents => self.destination.clone(),
            CopyMode::Entry => self
                .source
                .file_name()
                .map_or_else(|| self.destination.clone(), |name| self.destination.join(name)),
        }
    }
}

/// Options passed through to every copy invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyOptions {
    /// Ask the engine to report each transferred path.
    pub verbose: bool,
    /// Simulate only. Nothing is written.
    pub dry_run: bool,
    /// Extra arguments for the external copy tool.
    pub extra_args: Vec<String>,
}

impl CopyOptions {
    /// Tokenize a copy-tool option string on whitespace.
    #[must_use]
    pub fn parse_args(options: &str) -> Vec<String> {
        options.split_whitespace().map(str::to_string).collect()
    }
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            dry_run: false,
            extra_args: Self::parse_args(DEFAULT_COPY_OPTIONS),
        }
    }
}

/// Something that can perform a recursive archive-mode copy.
///
/// Implementations must be safe to call from several threads at once; the
/// dispatcher runs one call per job concurrently.
pub trait CopyEngine: Send + Sync {
    /// Short name used in log output.
    fn name(&self) -> &'static str;

    /// Perform one copy.
    ///
    /// # Errors
    ///
    /// * If the copy does not complete successfully
    fn copy(&self, request: &CopyRequest, options: &CopyOptions) -> Result<(), CopyError>;
}

impl<E: CopyEngine + ?Sized> CopyEngine for &E {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn copy(&self, request: &CopyRequest, options: &CopyOptions) -> Result<(), CopyError> {
        (**self).copy(request, options)
    }
}

impl<E: CopyEngine + ?Sized> CopyEngine for Box<E> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn copy(&self, request: &CopyRequest, options: &CopyOptions) -> Result<(), CopyError> {
        (**self).copy(request, options)
    }
}
