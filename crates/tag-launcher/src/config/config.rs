//! Configuration management for tag-launcher.
//!
//! Handles loading and saving the TOML configuration file with
//! cross-platform paths and atomic writes. Command-line flags override the
//! file for a single run without being written back.

use crate::{
    AppError, AppResult, Cli,
    config::{ProcessConfig, SerialConfig, StorageConfig},
};

use std::{
    fs,
    panic::Location,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tag_launcher_core::write_atomic;
use tracing::{debug, info, instrument};

const CONFIG_FILE: &str = "config.toml";

/// Main configuration struct.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Tag reader connection.
    #[serde(default)]
    pub serial: SerialConfig,
    /// Termination and polling timing.
    #[serde(default)]
    pub process: ProcessConfig,
    /// Data file locations.
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from the platform config directory, creating a
    /// default file if none exists.
    #[track_caller]
    #[instrument]
    pub fn load() -> AppResult<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from `config_path`, creating it with defaults when absent.
    #[track_caller]
    #[instrument]
    pub fn load_from(config_path: &Path) -> AppResult<Self> {
        if !config_path.exists() {
            info!(config_path = ?config_path, "No config found, creating default");
            let config = Config::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let contents = fs::read_to_string(config_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to read config {}: {}", config_path.display(), e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to parse config {}: {}", config_path.display(), e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?config_path, "Configuration loaded");

        Ok(config)
    }

    /// Save configuration to `config_path` using an atomic write.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save_to(&self, config_path: &Path) -> AppResult<()> {
        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        write_atomic(config_path, contents.as_bytes()).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to write config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?config_path, "Configuration saved (atomic write)");

        Ok(())
    }

    /// Apply command-line overrides for this run.
    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(port) = &cli.port {
            self.serial.port = port.clone();
        }
        if let Some(baud) = cli.baud {
            self.serial.baud_rate = baud;
        }
        if let Some(dir) = &cli.data_dir {
            self.storage.data_dir = Some(dir.clone());
        }
        self
    }

    /// Directory holding the catalog, registry and preferences. Created if missing.
    #[track_caller]
    pub fn data_dir(&self) -> AppResult<PathBuf> {
        let data_dir = match &self.storage.data_dir {
            Some(dir) => dir.clone(),
            None => Self::project_dirs()?.data_dir().to_path_buf(),
        };

        if !data_dir.exists() {
            fs::create_dir_all(&data_dir)?;
            debug!(data_dir = ?data_dir, "Created data directory");
        }

        Ok(data_dir)
    }

    /// Default directory for rolling log files.
    #[track_caller]
    pub fn log_dir() -> AppResult<PathBuf> {
        Ok(Self::project_dirs()?.data_local_dir().join("logs"))
    }

    #[track_caller]
    fn config_path() -> AppResult<PathBuf> {
        let proj_dirs = Self::project_dirs()?;
        let config_dir = proj_dirs.config_dir();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
            debug!(config_dir = ?config_dir, "Created config directory");
        }

        Ok(config_dir.join(CONFIG_FILE))
    }

    #[track_caller]
    fn project_dirs() -> AppResult<ProjectDirs> {
        ProjectDirs::from("com", "tag-launcher", "Tag-Launcher").ok_or_else(|| {
            AppError::ConfigError {
                reason: "Failed to get project directories".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })
    }
}
