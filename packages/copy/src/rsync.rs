//! Copy engine backed by the external `rsync` tool.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::engine::{CopyEngine, CopyMode, CopyOptions, CopyRequest};
use crate::error::CopyError;

const RSYNC: &str = "rsync";

/// Runs one `rsync` process per copy request.
#[derive(Debug, Clone)]
pub struct RsyncEngine {
    program: PathBuf,
}

impl RsyncEngine {
    /// Use `rsync` from `PATH`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            program: PathBuf::from(RSYNC),
        }
    }

    /// Use a specific `rsync` binary.
    #[must_use]
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Check that the tool can be launched.
    ///
    /// Runs `rsync --version` with output discarded.
    ///
    /// # Errors
    ///
    /// * If the binary is missing or cannot be executed
    /// * If `--version` exits unsuccessfully
    pub fn probe(&self) -> Result<(), CopyError> {
        log::debug!("Probing {}", self.program.display());

        let status = Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| self.spawn_error(e))?;

        if status.success() {
            Ok(())
        } else {
            Err(CopyError::ToolFailed {
                tool: self.tool_name(),
                source_path: self.program.clone(),
                code: status.code(),
            })
        }
    }

    /// Build the argument list for one request.
    #[must_use]
    pub fn build_args(request: &CopyRequest, options: &CopyOptions) -> Vec<OsString> {
        let mut args: Vec<OsString> = options.extra_args.iter().map(OsString::from).collect();

        if options.verbose {
            args.push("-v".into());
        }
        if options.dry_run {
            args.push("-n".into());
        }

        // rsync copies a directory's contents when the source ends in a slash
        // and the directory itself otherwise.
        let source = match request.mode {
            CopyMode::Contents => with_trailing_slash(&request.source),
            CopyMode::Entry => without_trailing_slash(&request.source),
        };
        args.push(source);
        args.push(with_trailing_slash(&request.destination));

        args
    }

    fn tool_name(&self) -> String {
        self.program
            .file_name()
            .map_or_else(|| RSYNC.to_string(), |n| n.to_string_lossy().to_string())
    }

    fn spawn_error(&self, e: std::io::Error) -> CopyError {
        if e.kind() == ErrorKind::NotFound {
            CopyError::ToolNotFound {
                tool: self.tool_name(),
            }
        } else {
            CopyError::ToolSpawnError {
                tool: self.tool_name(),
                io_error: e,
            }
        }
    }
}

impl Default for RsyncEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CopyEngine for RsyncEngine {
    fn name(&self) -> &'static str {
        RSYNC
    }

    fn copy(&self, request: &CopyRequest, options: &CopyOptions) -> Result<(), CopyError> {
        let args = Self::build_args(request, options);
        log::debug!("Running {} {:?}", self.program.display(), args);

        let status = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| self.spawn_error(e))?;

        if status.success() {
            Ok(())
        } else {
            Err(CopyError::ToolFailed {
                tool: self.tool_name(),
                source_path: request.source.clone(),
                code: status.code(),
            })
        }
    }
}

fn with_trailing_slash(path: &Path) -> OsString {
    let mut s = path.as_os_str().to_os_string();
    if !s.to_string_lossy().ends_with('/') {
        s.push("/");
    }
    s
}

fn without_trailing_slash(path: &Path) -> OsString {
    let lossy = path.to_string_lossy();
    let trimmed = lossy.trim_end_matches('/');
    if trimmed.len() == lossy.len() || trimmed.is_empty() {
        path.as_os_str().to_os_string()
    } else {
        OsString::from(trimmed)
    }
}
