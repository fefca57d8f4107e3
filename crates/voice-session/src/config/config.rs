//! Configuration management for voice-session.
//!
//! Loads and saves a TOML configuration file from the platform config
//! directory, creating a default on first run and writing atomically.

use crate::{
    AppError, AppResult,
    config::{LoggingConfig, MAX_SETTLE_DELAY_MS, SessionConfig, SimulationConfig},
};

use std::{fs, io::Write, panic::Location, path::PathBuf};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Voice session behaviour.
    #[serde(default)]
    pub session: SessionConfig,
    /// Simulated adapter timing.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from disk, creating a default if not found.
    ///
    /// A missing `client_id` is generated and persisted so interrupt notices
    /// carry the same client identity across runs.
    #[track_caller]
    #[instrument]
    pub fn load() -> AppResult<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            let contents = fs::read_to_string(&config_path).map_err(|e| AppError::ConfigError {
                reason: format!("Failed to read config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

            let config = Self::from_toml_str(&contents)?;

            info!(config_path = ?config_path, "Configuration loaded");

            config
        } else {
            info!("No config found, creating default");
            Config::default()
        };

        config.validate()?;

        if config.session.client_id.is_none() || !config_path.exists() {
            let client_id = config.client_id();
            config.session.client_id = Some(client_id);
            config.save()?;
        }

        Ok(config)
    }

    /// Parse configuration from TOML text.
    #[track_caller]
    pub fn from_toml_str(contents: &str) -> AppResult<Self> {
        toml::from_str(contents).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Reject values that would break the session's liveness guarantee.
    #[track_caller]
    pub fn validate(&self) -> AppResult<()> {
        if self.session.settle_delay_ms > MAX_SETTLE_DELAY_MS {
            return Err(AppError::ConfigError {
                reason: format!(
                    "session.settle_delay_ms is {} ms; the maximum is {} ms",
                    self.session.settle_delay_ms, MAX_SETTLE_DELAY_MS
                ),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if self.logging.filter.trim().is_empty() {
            return Err(AppError::ConfigError {
                reason: "logging.filter must not be empty".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }

    /// Configured client id, or a fresh one.
    pub fn client_id(&self) -> Uuid {
        self.session.client_id.unwrap_or_else(Uuid::new_v4)
    }

    /// Save configuration to disk using atomic write pattern.
    ///
    /// Writes to a temporary file first, then renames to prevent corruption
    /// if the process crashes during the write.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save(&self) -> AppResult<()> {
        let config_path = Self::config_path()?;

        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let temp_path = config_path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to write temp config file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file.sync_all().map_err(|e| AppError::ConfigError {
            reason: format!("Failed to sync temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::rename(&temp_path, &config_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to rename temp config to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?config_path, "Configuration saved (atomic write)");

        Ok(())
    }

    #[track_caller]
    fn config_path() -> AppResult<PathBuf> {
        let proj_dirs =
            ProjectDirs::from("com", "voice-session", "Voice-Session").ok_or_else(|| {
                AppError::ConfigError {
                    reason: "Failed to get config directory".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                }
            })?;

        let config_dir = proj_dirs.config_dir();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
            debug!(config_dir = ?config_dir, "Created config directory");
        }

        Ok(config_dir.join("config.toml"))
    }
}
