//! Settings loading for parsync.
//!
//! parsync reads optional defaults from a TOML file, by default
//! `<config dir>/parsync/config.toml`:
//!
//! ```toml
//! jobs = 8
//! copy_options = "-aH --numeric-ids"
//! engine = "rsync"
//! progress = true
//! summary = true
//! ```
//!
//! Command-line flags override anything set here.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod toml_loader;
mod types;

pub use error::ConfigError;
pub use toml_loader::{
    CONFIG_FILE_NAME, default_config_path, load_settings, load_settings_or_default,
};
pub use types::{EngineKind, Settings};
