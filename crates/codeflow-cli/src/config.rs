//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory),
//! and locating the history file.

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use codeflow::{CodeflowError, config::AppConfig};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ConfigError> for CodeflowError {
    fn from(err: ConfigError) -> Self {
        CodeflowError::Config(err.to_string())
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "codeflow", "codeflow")
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (codeflow/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// The loaded configuration is validated before it is returned.
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
/// - A setting is out of range
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, CodeflowError> {
    let config = find_config(explicit_path)?;
    config.validate().map_err(ConfigError::Validation)?;
    Ok(config)
}

fn find_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, CodeflowError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("codeflow/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = project_dirs() {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Load configuration from a TOML file
///
/// # Errors
///
/// Returns error if:
/// - File doesn't exist
/// - File cannot be read
/// - TOML parsing fails
fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, CodeflowError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;

    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    Ok(config)
}

/// Where the history is kept: the explicit path if provided, else
/// `history.json` in the platform data directory.
///
/// Returns `None` when no data directory can be determined.
pub fn history_path(explicit_path: Option<impl AsRef<Path>>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.as_ref().to_path_buf());
    }

    let path = project_dirs().map(|dirs| dirs.data_dir().join("history.json"));
    if path.is_none() {
        debug!("Could not determine platform-specific data directory");
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::tempdir;

    #[test]
    fn test_explicit_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[sanitizer]\ndecision_limit = 12\n\n[sanitizer.vocabulary]\nnot_equals = \"differs\"\n\n[history]\ncapacity = 2\n",
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.sanitizer().limits().decision(), 12);
        assert_eq!(config.sanitizer().limits().process(), 30);
        assert_eq!(config.sanitizer().vocabulary().not_equals(), "differs");
        assert_eq!(config.sanitizer().vocabulary().equals(), "equals");
        assert_eq!(config.history().capacity(), 2);
        assert!(config.fallback().include_styles());
    }

    #[test]
    fn test_missing_explicit_config() {
        let dir = tempdir().unwrap();
        let err = load_config(Some(dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, CodeflowError::Config(msg) if msg.contains("Missing configuration file")));
    }

    #[test]
    fn test_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[sanitizer\nprocess_limit = ").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, CodeflowError::Config(msg) if msg.contains("Failed to parse")));
    }

    #[test]
    fn test_out_of_range_setting() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[sanitizer]\nprocess_limit = 40\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, CodeflowError::Config(msg) if msg.contains("process_limit")));
    }

    #[test]
    fn test_explicit_history_path() {
        assert_eq!(
            history_path(Some("recent.json")),
            Some(PathBuf::from("recent.json"))
        );
    }
}
