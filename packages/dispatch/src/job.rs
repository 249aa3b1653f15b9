//! Jobs and top-level enumeration.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::DispatchError;

/// Kind of a top-level entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    /// A real directory.
    Directory,
    /// Anything else: regular files, symlinks (never followed), special files.
    File,
}

impl std::fmt::Display for JobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Directory => write!(f, "directory"),
            Self::File => write!(f, "file"),
        }
    }
}

/// One top-level source entry, copied by exactly one engine invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Absolute or source-relative path of the entry.
    pub path: PathBuf,
    /// Entry kind.
    pub kind: JobKind,
}

impl Job {
    /// The entry's basename, which is also its subtree name under the destination.
    #[must_use]
    pub fn name(&self) -> String {
        self.path.file_name().map_or_else(
            || self.path.to_string_lossy().to_string(),
            |n| n.to_string_lossy().to_string(),
        )
    }
}

/// Limits applied while enumerating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumerationLimits {
    /// Maximum directories kept.
    pub max_directories: usize,
    /// Maximum files kept.
    pub max_files: usize,
}

impl Default for EnumerationLimits {
    fn default() -> Self {
        Self {
            max_directories: crate::config::MAX_DIRECTORIES,
            max_files: crate::config::MAX_FILES,
        }
    }
}

/// List the immediate children of `source` as jobs.
///
/// Directories come first, then files, each group in name order. Entries
/// past either limit are dropped with a warning.
///
/// # Errors
///
/// * If `source` does not exist or is not a directory
/// * If the directory cannot be read
pub fn enumerate_jobs(source: &Path, limits: EnumerationLimits) -> Result<Vec<Job>, DispatchError> {
    log::debug!("Enumerating top-level entries of {}", source.display());

    if !source.exists() {
        return Err(DispatchError::SourceNotFound(source.to_path_buf()));
    }
    if !source.is_dir() {
        return Err(DispatchError::SourceNotDirectory(source.to_path_buf()));
    }

    let read_dir = fs::read_dir(source).map_err(|e| DispatchError::EnumerationError {
        path: source.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut entries = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|e| DispatchError::EnumerationError {
            path: source.to_path_buf(),
            message: e.to_string(),
        })?;
        // DirEntry::file_type does not follow symlinks.
        let file_type = entry.file_type().map_err(|e| DispatchError::EnumerationError {
            path: entry.path(),
            message: e.to_string(),
        })?;
        let kind = if file_type.is_dir() {
            JobKind::Directory
        } else {
            JobKind::File
        };
        entries.push((entry.file_name(), kind));
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let (dirs, files): (Vec<_>, Vec<_>) = entries
        .into_iter()
        .partition(|(_, kind)| *kind == JobKind::Directory);

    if dirs.len() > limits.max_directories {
        log::warn!(
            "{} has {} top-level directories; only the first {} are copied",
            source.display(),
            dirs.len(),
            limits.max_directories
        );
    }
    if files.len() > limits.max_files {
        log::warn!(
            "{} has {} top-level files; only the first {} are copied",
            source.display(),
            files.len(),
            limits.max_files
        );
    }

    let jobs: Vec<Job> = dirs
        .into_iter()
        .take(limits.max_directories)
        .chain(files.into_iter().take(limits.max_files))
        .map(|(name, kind)| Job {
            path: source.join(name),
            kind,
        })
        .collect();

    log::debug!("Enumerated {} jobs", jobs.len());

    Ok(jobs)
}
