//! Application configuration.

use std::path::Path;

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::GroupPolicy;

/// Configuration for the gift-exchange application.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct SantaConfig {
    /// Path of the SQLite database file.
    #[serde(default = "default_db_path")]
    db_path: String,

    /// Usability floor for group size.
    #[serde(default = "default_min_participants")]
    min_participants: usize,

    /// Whether two-person groups may be drawn.
    #[serde(default = "default_allow_pairs")]
    allow_pairs: bool,

    /// Whether participants in one group may share a name.
    #[serde(default)]
    allow_duplicate_names: bool,

    /// How long a write waits for another writer's lock, in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    busy_timeout_ms: u32,
}

#[instrument]
fn default_db_path() -> String {
    "secret_santa.db".to_string()
}

#[instrument]
fn default_min_participants() -> usize {
    3
}

#[instrument]
fn default_allow_pairs() -> bool {
    true
}

#[instrument]
fn default_busy_timeout_ms() -> u32 {
    5000
}

impl Default for SantaConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            min_participants: default_min_participants(),
            allow_pairs: default_allow_pairs(),
            allow_duplicate_names: false,
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl SantaConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|source| ConfigError::Read {
                path: path.as_ref().display().to_string(),
                source,
            })?;

        let config = Self::from_toml(&content)?;
        info!(db_path = %config.db_path, "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;

        if config.min_participants < santa_draw::MIN_PARTICIPANTS {
            return Err(ConfigError::Invalid {
                field: "min_participants",
                reason: format!(
                    "must be at least {}, got {}",
                    santa_draw::MIN_PARTICIPANTS,
                    config.min_participants
                ),
            });
        }
        if config.db_path.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "db_path",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(config)
    }

    /// Loads the file at `path` if it exists, otherwise returns defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Replaces the database path.
    #[instrument(skip(self))]
    pub fn with_db_path(mut self, db_path: String) -> Self {
        self.db_path = db_path;
        self
    }

    /// Group policy described by this configuration.
    #[instrument(skip(self))]
    pub fn policy(&self) -> GroupPolicy {
        GroupPolicy::new(
            self.min_participants,
            self.allow_pairs,
            self.allow_duplicate_names,
        )
    }
}

/// Why a configuration could not be loaded.
#[derive(Debug, Display, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[display("Failed to read config file {path}: {source}")]
    Read {
        /// Path that was read.
        path: String,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
    /// The file is not valid TOML for [`SantaConfig`].
    #[display("Failed to parse config: {_0}")]
    Parse(toml::de::Error),
    /// A setting parsed but is out of range.
    #[display("Invalid {field}: {reason}")]
    Invalid {
        /// Name of the offending setting.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        Self::Parse(err)
    }
}
