//! TOML settings file loader.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::types::Settings;

/// Settings file name inside the `parsync` config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Default settings location, e.g. `~/.config/parsync/config.toml`.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("parsync").join(CONFIG_FILE_NAME))
}

/// Load a TOML settings file.
///
/// # Arguments
///
/// * `path` - Path to the TOML settings file
///
/// # Errors
///
/// * If the file cannot be read
/// * If the file cannot be parsed as TOML
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    log::debug!("Loading settings from {}", path.display());

    let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let settings: Settings = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    log::debug!("Loaded settings: {settings:?}");

    Ok(settings)
}

/// Load settings from `path`, falling back to the default location.
///
/// An explicit path must exist. A missing default file yields empty settings.
///
/// # Errors
///
/// * If the file cannot be read or parsed
pub fn load_settings_or_default(path: Option<&Path>) -> Result<Settings, ConfigError> {
    if let Some(path) = path {
        return load_settings(path);
    }

    let Some(default_path) = default_config_path() else {
        log::debug!("No config directory on this platform");
        return Ok(Settings::default());
    };

    match load_settings(&default_path) {
        Err(ConfigError::ReadError { source, .. }) if source.kind() == ErrorKind::NotFound => {
            log::debug!("No settings file at {}", default_path.display());
            Ok(Settings::default())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EngineKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_settings() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
jobs = 6
copy_options = "-aH --numeric-ids"
engine = "native"
progress = false
summary = true
"#
        )
        .unwrap();

        let settings = load_settings(file.path()).unwrap();

        assert_eq!(settings.jobs, Some(6));
        assert_eq!(settings.copy_options.as_deref(), Some("-aH --numeric-ids"));
        assert_eq!(settings.engine, Some(EngineKind::Native));
        assert_eq!(settings.progress, Some(false));
        assert_eq!(settings.summary, Some(true));
    }

    #[test]
    fn test_load_empty_settings() {
        let file = NamedTempFile::new().unwrap();

        let settings = load_settings(file.path()).unwrap();

        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "threads = 4").unwrap();

        let err = load_settings(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::TomlParseError { .. }));
    }

    #[test]
    fn test_explicit_missing_path_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = load_settings_or_default(Some(dir.path().join("missing.toml").as_path()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }

    #[test]
    fn test_engine_kind_from_str() {
        assert_eq!("rsync".parse::<EngineKind>().unwrap(), EngineKind::Rsync);
        assert_eq!("Native".parse::<EngineKind>().unwrap(), EngineKind::Native);
        assert!(matches!(
            "cp".parse::<EngineKind>(),
            Err(ConfigError::UnknownEngine(_))
        ));
    }
}
