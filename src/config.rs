//! Configuration management module.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::AttendanceStatus;

/// Configuration load result.
#[derive(Debug)]
pub enum ConfigLoadResult {
    /// Config loaded successfully.
    Loaded(AppConfig),
    /// Config file missing (first run).
    Missing,
    /// Config file exists but invalid.
    Invalid(ConfigError),
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub storage: StorageConfig,
    #[serde(default)]
    pub reports: ReportsConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Where the attendance document lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_file: PathBuf,
    /// Hold an exclusive lock on the data file while the app runs.
    #[serde(default = "default_lock")]
    pub lock: bool,
}

fn default_lock() -> bool {
    true
}

/// Report and alert settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportsConfig {
    /// Subjects below this percentage are flagged (0-100).
    #[serde(default = "default_threshold")]
    pub low_attendance_threshold: f64,
    /// Directory for exports. Empty means ask with a save dialog.
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
}

fn default_threshold() -> f64 {
    75.0
}

/// UI preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Status preselected for every student on the mark panel (`P`, `A`, `H`, `N`).
    #[serde(default = "default_status_code")]
    pub default_status: char,
}

fn default_status_code() -> char {
    'P'
}

impl AppConfig {
    /// Get config file path (same directory as executable).
    pub fn default_path() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.toml")
    }

    /// Per-user data directory, falling back to the working directory.
    pub fn data_dir() -> PathBuf {
        ProjectDirs::from("", "", "classroll")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Directory for rolling log files.
    pub fn log_dir() -> PathBuf {
        Self::data_dir().join("logs")
    }

    /// Attempt to load config with detailed result.
    pub fn try_load(path: &Path) -> ConfigLoadResult {
        if !path.exists() {
            return ConfigLoadResult::Missing;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<AppConfig>(&content) {
                Ok(config) => match config.validate() {
                    Ok(()) => ConfigLoadResult::Loaded(config),
                    Err(e) => ConfigLoadResult::Invalid(e),
                },
                Err(e) => ConfigLoadResult::Invalid(ConfigError::Parse(e)),
            },
            Err(e) => ConfigLoadResult::Invalid(ConfigError::Read(e)),
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.data_file.as_os_str().is_empty() {
            return Err(ConfigError::Validation("Data file path cannot be empty".to_string()));
        }
        let threshold = self.reports.low_attendance_threshold;
        if !(0.0..=100.0).contains(&threshold) {
            return Err(ConfigError::Validation(
                "Low attendance threshold must be between 0 and 100".to_string(),
            ));
        }
        if AttendanceStatus::from_code(self.ui.default_status).is_none() {
            return Err(ConfigError::Validation(
                "Default status must be one of P, A, H, N".to_string(),
            ));
        }
        Ok(())
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Status preselected on the mark panel.
    pub fn default_status(&self) -> AttendanceStatus {
        AttendanceStatus::from_code(self.ui.default_status).unwrap_or(AttendanceStatus::Present)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: AppConfig::data_dir().join("attendance.json"),
            lock: default_lock(),
        }
    }
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            low_attendance_threshold: default_threshold(),
            export_dir: None,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_status: default_status_code(),
        }
    }
}
