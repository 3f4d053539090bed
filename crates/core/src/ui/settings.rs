//! User settings persistence.
//!
//! This module handles loading and saving user preferences: the default
//! query month and the zoom thresholds that couple the heatmap to the
//! viewport.

use crate::error::Result;
use crate::model::is_valid_month;
use crate::ui::viewport;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// User-configurable settings persisted between sessions.
///
/// Settings are stored as JSON in the user's config directory
/// (e.g., `~/.config/crime-watch/settings.json` on Linux).
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Month queried by default, `YYYY-MM`.
    pub month: String,
    /// Zoom above which enabling the heatmap steps the map out.
    pub heat_max_zoom: f64,
    /// Zoom above which the heatmap degrades to discrete markers.
    pub detail_zoom: f64,
    /// Keep the record drawer expanded across sessions.
    #[serde(default)]
    pub drawer_open: bool,
}

impl Settings {
    /// Returns the path to the settings file.
    ///
    /// Creates the config directory if it doesn't exist.
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "crime-watch").map(|dirs| {
            let config_dir = dirs.config_dir();
            if !config_dir.exists() {
                let _ = fs::create_dir_all(config_dir);
            }
            config_dir.join("settings.json")
        })
    }

    /// Loads settings from disk, falling back to defaults if not found.
    ///
    /// # Arguments
    /// * `default_month` - The month to use if no settings file exists.
    pub fn load(default_month: &str) -> Self {
        let mut settings = Self::config_path()
            .and_then(|path| fs::read_to_string(&path).ok())
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_else(|| Self::with_defaults(default_month));

        // A hand-edited settings file must not poison every query.
        if !is_valid_month(&settings.month) {
            settings.month = default_month.to_string();
        }
        settings
    }

    /// Creates default settings with the specified month.
    pub fn with_defaults(month: &str) -> Self {
        Self {
            month: month.to_string(),
            heat_max_zoom: viewport::HEAT_MAX_ZOOM,
            detail_zoom: viewport::DETAIL_ZOOM,
            drawer_open: false,
        }
    }

    /// Persists settings to disk.
    ///
    /// # Errors
    /// Returns an error if serialization or file writing fails.
    pub fn save(&self) -> Result<()> {
        if let Some(path) = Self::config_path() {
            let json = serde_json::to_string_pretty(self)?;
            fs::write(path, json)?;
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::with_defaults(crate::config::DEFAULT_MONTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_the_documented_thresholds() {
        let settings = Settings::with_defaults("2024-01");
        assert_eq!(settings.month, "2024-01");
        assert_eq!(settings.heat_max_zoom, 14.0);
        assert_eq!(settings.detail_zoom, 16.0);
        assert!(!settings.drawer_open);
    }

    #[test]
    fn settings_round_trip_through_json() {
        let settings = Settings {
            month: "2023-06".to_string(),
            heat_max_zoom: 13.0,
            detail_zoom: 17.0,
            drawer_open: true,
        };
        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert!(back == settings);
    }
}
