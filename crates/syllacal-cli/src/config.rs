//! CLI configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/syllacal/config.toml` by default. Every section and field is
//! optional.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use syllacal_core::{FormatOptions, LocatorOptions, TimeFormat};

/// Configuration for the syllacal CLI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How ambiguous dates are read.
    pub locale: LocatorOptions,

    pub display: DisplaySettings,

    pub notifications: NotificationSettings,

    pub export: ExportSettings,
}

/// Display settings for output formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Number of events in the upcoming list.
    pub upcoming_limit: usize,

    /// "12h" or "24h".
    pub time_format: TimeFormat,

    /// Maximum title length (truncated with ellipsis).
    pub max_title_length: Option<usize>,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            upcoming_limit: 5,
            time_format: TimeFormat::H12,
            max_title_length: None,
        }
    }
}

/// Desktop notification settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    pub enabled: bool,

    /// Application name shown by the notification daemon.
    pub app_name: String,

    /// Notification timeout in seconds.
    pub timeout_secs: u32,

    /// Custom notification icon path.
    pub icon_path: Option<String>,

    /// Override urgency level ("low", "normal", "critical").
    pub urgency: Option<String>,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            app_name: "syllacal".to_string(),
            timeout_secs: 10,
            icon_path: None,
            urgency: None,
        }
    }
}

/// Export settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Directory the calendar file is written to (current directory if unset).
    pub output_dir: Option<PathBuf>,
}

const URGENCY_LEVELS: &[&str] = &["low", "normal", "critical"];

impl Config {
    /// Loads configuration from the default path, or defaults if it does not exist.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content =
            std::fs::read_to_string(path).map_err(|e| format!("failed to read config: {}", e))?;
        toml::from_str(&content).map_err(|e| format!("failed to parse config: {}", e))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("syllacal")
    }

    /// Checks values that parse but make no sense.
    pub fn validate(&self) -> Result<(), String> {
        if self.display.upcoming_limit == 0 {
            return Err("display.upcoming_limit must be at least 1".to_string());
        }
        if let Some(ref urgency) = self.notifications.urgency
            && !URGENCY_LEVELS.contains(&urgency.to_lowercase().as_str())
        {
            return Err(format!(
                "notifications.urgency must be one of {}, got {:?}",
                URGENCY_LEVELS.join(", "),
                urgency
            ));
        }
        if self.notifications.app_name.trim().is_empty() {
            return Err("notifications.app_name must not be empty".to_string());
        }
        Ok(())
    }

    /// Formatter options from the display section.
    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            max_title_length: self.display.max_title_length,
            time_format: self.display.time_format,
        }
    }

    /// Where an exported file named `file_name` goes by default.
    pub fn export_path(&self, file_name: &str) -> PathBuf {
        self.export
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(file_name)
    }
}
