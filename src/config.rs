//! TOML application configuration stored at `<config dir>/recall/config.toml`.
//!
//! The database location can be overridden with `RECALL_DB`.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DB_ENV_VAR: &str = "RECALL_DB";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    /// Tracing filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    #[serde(default = "default_window_width")]
    pub window_width: f32,
    #[serde(default = "default_window_height")]
    pub window_height: f32,
}

fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("recall")
        .join("recall.sqlite3")
}
fn default_log_filter() -> String {
    "info".to_string()
}
fn default_window_width() -> f32 {
    500.0
}
fn default_window_height() -> f32 {
    700.0
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            log_filter: default_log_filter(),
            window_width: default_window_width(),
            window_height: default_window_height(),
        }
    }
}

impl AppConfig {
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("recall")
            .join("config.toml")
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Loads the config file, writing defaults on first run. Never fails:
    /// problems are logged and defaults are used. `RECALL_DB` wins over the
    /// file's `database_path`.
    pub fn load_or_default() -> Self {
        let path = Self::path();
        let mut config = if path.exists() {
            Self::load_from(&path).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "invalid config, using defaults");
                Self::default()
            })
        } else {
            let config = Self::default();
            if let Err(e) = config.save_to(&path) {
                tracing::warn!(path = %path.display(), error = %e, "could not write default config");
            }
            config
        };

        if let Some(db) = std::env::var_os(DB_ENV_VAR) {
            config.database_path = PathBuf::from(db);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recall").join("config.toml");

        let config = AppConfig::default();
        config.save_to(&path).unwrap();

        assert_eq!(AppConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_gets_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "log_filter = \"recall=debug\"\n").unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.log_filter, "recall=debug");
        assert_eq!(config.window_width, 500.0);
        assert_eq!(config.database_path, default_database_path());
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "window_width = \"wide\"").unwrap();

        assert!(matches!(AppConfig::load_from(&path), Err(ConfigError::Parse(_))));
    }
}
