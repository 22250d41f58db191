//! Process configuration for the registry.
//!
//! # Responsibility
//! - Load the data directory and logging settings from the environment.
//! - Reject invalid values before any store is opened.
//!
//! # Invariants
//! - `log_level` is always a normalized level name.
//! - `log_dir`, when set, is absolute.

use crate::logging::{default_log_level, normalize_level};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DATA_DIR_VAR: &str = "SCHOOL_DATA_DIR";
pub const LOG_LEVEL_VAR: &str = "SCHOOL_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "SCHOOL_LOG_DIR";
pub const DEFAULT_DATA_DIR: &str = ".data";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} cannot be empty")]
    Empty(&'static str),
    #[error("{var}: {message}")]
    InvalidLogLevel { var: &'static str, message: String },
    #[error("{var} must be an absolute path, got `{value}`")]
    RelativeLogDir { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Directory holding one `<kind>.json` file per entity kind.
    pub data_dir: PathBuf,
    pub log_level: &'static str,
    /// File logging is enabled only when set.
    pub log_dir: Option<PathBuf>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl RegistryConfig {
    /// Config rooted at `data_dir` with default logging settings.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Reads `SCHOOL_DATA_DIR`, `SCHOOL_LOG_LEVEL` and `SCHOOL_LOG_DIR`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds config from any key lookup. Unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = match lookup(DATA_DIR_VAR) {
            Some(value) if value.trim().is_empty() => {
                return Err(ConfigError::Empty(DATA_DIR_VAR));
            }
            Some(value) => PathBuf::from(value.trim()),
            None => PathBuf::from(DEFAULT_DATA_DIR),
        };

        let log_level = match lookup(LOG_LEVEL_VAR) {
            Some(value) => {
                normalize_level(&value).map_err(|message| ConfigError::InvalidLogLevel {
                    var: LOG_LEVEL_VAR,
                    message,
                })?
            }
            None => default_log_level(),
        };

        let log_dir = match lookup(LOG_DIR_VAR) {
            Some(value) if value.trim().is_empty() => None,
            Some(value) => {
                let trimmed = value.trim();
                if !Path::new(trimmed).is_absolute() {
                    return Err(ConfigError::RelativeLogDir {
                        var: LOG_DIR_VAR,
                        value: trimmed.to_string(),
                    });
                }
                Some(PathBuf::from(trimmed))
            }
            None => None,
        };

        Ok(Self {
            data_dir,
            log_level,
            log_dir,
        })
    }
}
