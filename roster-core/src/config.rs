//! Configuration for roster.
//!
//! A single optional TOML file at `~/.config/roster/config.toml` controls the
//! database location and log verbosity. Every path defaults to the matching
//! XDG base directory, so the database and logs land in predictable per-user
//! places without any configuration at all.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Per-user directory name shared by config, data, and state paths.
const APP_DIR: &str = "roster";

/// Fixed database file name inside the data directory.
const DB_FILE: &str = "roster.db";

/// Resolve an XDG base directory: `$env_var` when set and non-empty,
/// otherwise `$HOME/<fallback>`.
fn xdg_dir(env_var: &str, fallback: &str) -> PathBuf {
    if let Some(dir) = std::env::var_os(env_var).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(fallback)
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Storage configuration
#[derive(Debug, Deserialize, Default)]
pub struct StorageConfig {
    /// Override path for the database file (defaults to the XDG data dir)
    pub database_path: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Read the config file if one exists; a missing file means defaults.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Read and parse a config file at an explicit location.
    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        toml::from_str(&raw)
            .map_err(|e| Error::Config(format!("invalid config {}: {}", path.display(), e)))
    }

    /// `$XDG_CONFIG_HOME/roster/config.toml`
    pub fn config_path() -> PathBuf {
        xdg_dir("XDG_CONFIG_HOME", ".config")
            .join(APP_DIR)
            .join("config.toml")
    }

    /// `$XDG_DATA_HOME/roster`, where the database file lives
    pub fn data_dir() -> PathBuf {
        xdg_dir("XDG_DATA_HOME", ".local/share").join(APP_DIR)
    }

    /// `$XDG_STATE_HOME/roster`, where log files are rotated
    pub fn state_dir() -> PathBuf {
        xdg_dir("XDG_STATE_HOME", ".local/state").join(APP_DIR)
    }

    /// Resolved database location: the `storage.database_path` override when
    /// set, otherwise `roster.db` in the data directory.
    pub fn database_path(&self) -> PathBuf {
        match &self.storage.database_path {
            Some(path) => path.clone(),
            None => Self::data_dir().join(DB_FILE),
        }
    }
}
