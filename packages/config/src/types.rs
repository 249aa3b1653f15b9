//! Settings types for parsync.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Which copy engine performs the data movement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// The external `rsync` tool.
    #[default]
    Rsync,
    /// The built-in archive-mode copier.
    Native,
}

impl std::fmt::Display for EngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rsync => write!(f, "rsync"),
            Self::Native => write!(f, "native"),
        }
    }
}

impl FromStr for EngineKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rsync" => Ok(Self::Rsync),
            "native" => Ok(Self::Native),
            _ => Err(ConfigError::UnknownEngine(s.to_string())),
        }
    }
}

/// Defaults read from the settings file. Every key is optional; command-line
/// flags take precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Default job count.
    #[serde(default)]
    pub jobs: Option<usize>,

    /// Default copy-tool option string.
    #[serde(default)]
    pub copy_options: Option<String>,

    /// Default copy engine.
    #[serde(default)]
    pub engine: Option<EngineKind>,

    /// Show the job progress bar.
    #[serde(default)]
    pub progress: Option<bool>,

    /// Print the destination summary after copying.
    #[serde(default)]
    pub summary: Option<bool>,
}
