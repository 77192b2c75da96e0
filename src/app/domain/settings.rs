use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app::infrastructure::error::{AppError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_line_numbers")]
    pub line_numbers_enabled: bool,

    #[serde(default = "default_word_wrap")]
    pub word_wrap_enabled: bool,

    #[serde(default = "default_preview")]
    pub preview_enabled: bool,

    #[serde(default = "default_font_size")]
    pub font_size: u32,

    /// Quiet period after the last edit before the document is written.
    #[serde(default = "default_autosave_delay_ms")]
    pub autosave_delay_ms: u64,

    /// How long the "Saved" banner stays up after a successful write.
    #[serde(default = "default_notification_secs")]
    pub notification_secs: u64,

    /// Name suggested by the save dialog for new documents.
    #[serde(default = "default_file_name")]
    pub default_file_name: String,
}

fn default_line_numbers() -> bool {
    false
}

fn default_word_wrap() -> bool {
    true
}

fn default_preview() -> bool {
    true
}

fn default_font_size() -> u32 {
    16
}

fn default_autosave_delay_ms() -> u64 {
    1000
}

fn default_notification_secs() -> u64 {
    5
}

fn default_file_name() -> String {
    "default.md".to_string()
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            line_numbers_enabled: default_line_numbers(),
            word_wrap_enabled: default_word_wrap(),
            preview_enabled: default_preview(),
            font_size: default_font_size(),
            autosave_delay_ms: default_autosave_delay_ms(),
            notification_secs: default_notification_secs(),
            default_file_name: default_file_name(),
        }
    }
}

impl AppSettings {
    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }

    pub fn notification_duration(&self) -> Duration {
        Duration::from_secs(self.notification_secs)
    }

    /// Reject values that would break the autosave lifecycle.
    pub fn validate(&self) -> Result<()> {
        if self.autosave_delay_ms == 0 {
            return Err(AppError::Settings("autosave delay must be positive".to_string()));
        }
        if self.notification_secs == 0 {
            return Err(AppError::Settings("notification duration must be positive".to_string()));
        }
        if self.default_file_name.trim().is_empty() {
            return Err(AppError::Settings("default file name is empty".to_string()));
        }
        Ok(())
    }

    /// Load settings from disk, or create default if not exists
    pub fn load() -> Self {
        let config_path = Self::get_config_path();
        match Self::load_from(&config_path) {
            Ok(Some(settings)) => settings,
            Ok(None) => {
                // File doesn't exist, use defaults and try to save them for next time
                let default = Self::default();
                if let Err(e) = default.save() {
                    tracing::warn!(error = %e, "could not write default settings");
                }
                default
            }
            Err(e) => {
                tracing::warn!(file = %config_path.display(), error = %e, "failed to load settings, using defaults");
                Self::default()
            }
        }
    }

    /// Read settings from `path`. `Ok(None)` when the file does not exist.
    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let settings: Self = serde_json::from_str(&contents)?;
        settings.validate()?;
        Ok(Some(settings))
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Get config file path (cross-platform)
    pub fn get_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("markpad");
        path.push("settings.json");
        path
    }
}
