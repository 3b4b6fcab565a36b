//! Toast settings and persistence

use anyhow::Result;
use directories::ProjectDirs;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::attributes::ToastAttributes;

/// Global toast settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Announce each toast through the host's accessibility service
    #[serde(default = "default_true")]
    pub accessibility_announcements: bool,

    /// Queue toasts; when off, showing a toast cancels every other one
    #[serde(default = "default_true")]
    pub queue_enabled: bool,

    /// Fade-in and fade-out duration in milliseconds
    #[serde(default = "default_fade_duration_ms")]
    pub fade_duration_ms: u64,

    /// Attributes used for toasts created from a plain message
    #[serde(default)]
    pub default_attributes: ToastAttributes,
}

fn default_true() -> bool {
    true
}

fn default_fade_duration_ms() -> u64 {
    500
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            accessibility_announcements: true,
            queue_enabled: true,
            fade_duration_ms: 500,
            default_attributes: ToastAttributes::default(),
        }
    }
}

impl Settings {
    pub fn fade_duration(&self) -> Duration {
        Duration::from_millis(self.fade_duration_ms)
    }

    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "toaster", "Toaster")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from the default location
    pub fn load() -> Result<Self> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;
        Self::load_from(&path)
    }

    /// Load settings from `path`, falling back to defaults when the file
    /// doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("No settings file found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&content)?;
        settings.default_attributes.validate()?;

        info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Save settings to the default location
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;

        info!("Saved settings to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::Color;

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();

        assert!(settings.accessibility_announcements);
        assert!(settings.queue_enabled);
        assert_eq!(settings.fade_duration_ms, 500);
        assert_eq!(settings.fade_duration(), Duration::from_millis(500));
        assert_eq!(settings.default_attributes, ToastAttributes::default());
    }

    #[test]
    fn test_settings_serialization() {
        let settings = Settings::default();

        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("queue_enabled"));
        assert!(json.contains("accessibility_announcements"));
        assert!(json.contains("#3C3C3C"));

        let deserialized: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, settings);
    }

    #[test]
    fn test_settings_with_custom_values() {
        let json = r##"{
            "accessibility_announcements": false,
            "queue_enabled": false,
            "fade_duration_ms": 250,
            "default_attributes": {
                "message": "Done",
                "background_color": "#112233",
                "show_button": true
            }
        }"##;

        let settings: Settings = serde_json::from_str(json).unwrap();
        assert!(!settings.accessibility_announcements);
        assert!(!settings.queue_enabled);
        assert_eq!(settings.fade_duration(), Duration::from_millis(250));
        assert_eq!(settings.default_attributes.message, "Done");
        assert_eq!(
            settings.default_attributes.background_color,
            Color::rgb(0x11, 0x22, 0x33)
        );
        assert!(settings.default_attributes.show_button);
        // untouched attributes keep their defaults
        assert_eq!(settings.default_attributes.corner_radius, 16.0);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let settings = Settings {
            queue_enabled: false,
            fade_duration_ms: 120,
            ..Settings::default()
        };
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_rejects_invalid_attributes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "default_attributes": { "duration": -1.0 } }"#).unwrap();

        let err = Settings::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("duration"));
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(Settings::load_from(&path).is_err());
    }
}
