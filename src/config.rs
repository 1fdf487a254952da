//! User settings, persisted as JSON in the OS config directory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::timeline::ViewMode;

const APP_NAME: &str = "GanttTimeline";
const SETTINGS_FILE: &str = "settings.json";

/// Upper bound for `range_padding_days`; ten years either side.
pub const MAX_RANGE_PADDING_DAYS: i64 = 3650;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no config directory available on this system")]
    NoConfigDir,
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Zoom level the timeline opens with.
    pub view_mode: ViewMode,
    /// Minimum spacing between evaluated drag samples.
    pub drag_throttle_ms: u64,
    /// Days of empty timeline shown before the first and after the last task.
    pub range_padding_days: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            view_mode: ViewMode::Week,
            drag_throttle_ms: 10,
            range_padding_days: 7,
        }
    }
}

impl Settings {
    pub fn drag_throttle(&self) -> Duration {
        Duration::from_millis(self.drag_throttle_ms)
    }

    /// Padding in days, clamped to `0..=MAX_RANGE_PADDING_DAYS`.
    pub fn range_padding(&self) -> i64 {
        self.range_padding_days.clamp(0, MAX_RANGE_PADDING_DAYS)
    }

    pub fn config_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
    }

    pub fn default_path() -> Result<PathBuf, ConfigError> {
        Self::config_dir()
            .map(|dir| dir.join(SETTINGS_FILE))
            .ok_or(ConfigError::NoConfigDir)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut settings: Settings = serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        let padding = settings.range_padding();
        if padding != settings.range_padding_days {
            tracing::warn!(
                path = %path.display(),
                requested = settings.range_padding_days,
                padding,
                "range_padding_days out of range, clamped"
            );
            settings.range_padding_days = padding;
        }
        Ok(settings)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(io_err)
    }

    /// Load the user's settings, falling back to defaults on any problem.
    /// A missing file is the normal first-run case and is not reported.
    pub fn load_or_default() -> Self {
        let path = match Self::default_path() {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!("{e}; using default settings");
                return Self::default();
            }
        };
        if !path.exists() {
            tracing::info!(path = %path.display(), "no settings file yet, using defaults");
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(settings) => {
                tracing::info!(path = %path.display(), ?settings, "settings loaded");
                settings
            }
            Err(e) => {
                tracing::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    /// Persist to the default location; failures are logged, not returned.
    pub fn save(&self) {
        let result = Self::default_path().and_then(|path| self.save_to(&path));
        if let Err(e) = result {
            tracing::warn!("could not save settings: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn settings_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(SETTINGS_FILE);
        let settings = Settings {
            view_mode: ViewMode::Month,
            drag_throttle_ms: 25,
            range_padding_days: 3,
        };
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn missing_fields_and_unknown_modes_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, r#"{ "view_mode": "quarter" }"#).unwrap();
        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.view_mode, ViewMode::Day);
        assert_eq!(settings.drag_throttle(), Duration::from_millis(10));
        assert_eq!(settings.range_padding_days, 7);
    }

    #[test]
    fn padding_is_clamped_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, r#"{ "range_padding_days": 1000000000 }"#).unwrap();
        assert_eq!(Settings::load_from(&path).unwrap().range_padding_days, MAX_RANGE_PADDING_DAYS);

        std::fs::write(&path, r#"{ "range_padding_days": -4 }"#).unwrap();
        assert_eq!(Settings::load_from(&path).unwrap().range_padding_days, 0);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(Settings::load_from(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load_from(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("absent.json"));
    }
}
