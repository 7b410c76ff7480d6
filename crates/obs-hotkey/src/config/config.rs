//! Configuration management for obs-hotkey.
//!
//! Handles loading and saving the TOML configuration file from the platform
//! config directory, creating it with defaults on first run.

use crate::{
    AppError, AppResult,
    config::{
        ActionsConfig, CaptureConfig, ConnectionConfig, ReconnectConfig, default_bindings,
        default_labels,
    },
};

use std::{collections::BTreeMap, fs, io::Write, panic::Location, path::PathBuf};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Main configuration struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Control endpoint connection.
    #[serde(default)]
    pub connection: ConnectionConfig,
    /// Startup retries and degraded-mode reconnects.
    #[serde(default)]
    pub reconnect: ReconnectConfig,
    /// Key capture backend.
    #[serde(default)]
    pub capture: CaptureConfig,
    /// Built-in action behaviour.
    #[serde(default)]
    pub actions: ActionsConfig,
    /// Action identifier to key descriptor. Empty descriptors leave the
    /// action unbound.
    #[serde(default = "default_bindings")]
    pub bindings: BTreeMap<String, String>,
    /// Action identifier to display label.
    #[serde(default = "default_labels")]
    pub labels: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            connection: ConnectionConfig::default(),
            reconnect: ReconnectConfig::default(),
            capture: CaptureConfig::default(),
            actions: ActionsConfig::default(),
            bindings: default_bindings(),
            labels: default_labels(),
        }
    }
}

impl Config {
    /// Load configuration from disk, creating default if not found.
    #[track_caller]
    #[instrument]
    pub fn load() -> AppResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = fs::read_to_string(&config_path).map_err(|e| AppError::ConfigError {
                reason: format!("Failed to read config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

            let config = Self::from_toml(&contents)?;

            info!(config_path = ?config_path, "Configuration loaded");

            Ok(config)
        } else {
            info!("No config found, creating default");
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Parse configuration text. Missing sections and fields take defaults.
    #[track_caller]
    pub fn from_toml(contents: &str) -> AppResult<Self> {
        let config: Self = toml::from_str(contents).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject durations that would stall requests or spin the reconnect loop.
    /// A zero `retry_delay_secs` is allowed; startup retries stay bounded by
    /// `max_retries`.
    #[track_caller]
    fn validate(&self) -> AppResult<()> {
        let zero_field = if self.connection.request_timeout_secs == 0 {
            Some("connection.request_timeout_secs")
        } else if self.reconnect.degraded_interval_secs == 0 {
            Some("reconnect.degraded_interval_secs")
        } else {
            None
        };

        match zero_field {
            Some(field) => Err(AppError::ConfigError {
                reason: format!("{} must be at least 1", field),
                location: ErrorLocation::from(Location::caller()),
            }),
            None => Ok(()),
        }
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
            ProjectDirs::from("com", "obs-hotkey", "OBS-Hotkey").ok_or_else(|| {
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
