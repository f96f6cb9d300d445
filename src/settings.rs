//! Runtime settings
//!
//! Loaded from a JSON file on native and from LocalStorage in the browser.
//! Anything missing takes its default; anything malformed falls back to
//! defaults with a warning.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, TICKS_PER_SECOND};
use crate::sim::state::MazeTuning;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed settings: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Simulation ticks per second
    pub tick_rate_hz: u32,
    /// Maximum ticks run for one frame
    pub max_substeps: u32,
    /// Frame delta clamp (seconds)
    pub max_frame_dt: f32,
    /// Fixed RNG seed; `None` seeds from the clock
    pub seed: Option<u64>,
    /// High score file (native)
    pub score_file: PathBuf,
    pub maze: MazeTuning,
    /// Where the embedded demo's stylesheets and scripts live
    pub demo_asset_root: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_rate_hz: TICKS_PER_SECOND as u32,
            max_substeps: MAX_SUBSTEPS,
            max_frame_dt: MAX_FRAME_DT,
            seed: None,
            score_file: PathBuf::from("retro-arcade-scores.json"),
            maze: MazeTuning::default(),
            demo_asset_root: "demo".to_string(),
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "retro_arcade_settings";

    /// Parse and validate
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let invalid = |field, reason: &str| {
            Err(SettingsError::Invalid {
                field,
                reason: reason.to_string(),
            })
        };
        if self.tick_rate_hz == 0 || self.tick_rate_hz > 1000 {
            return invalid("tick_rate_hz", "must be between 1 and 1000");
        }
        if self.max_substeps == 0 {
            return invalid("max_substeps", "must be at least 1");
        }
        if !(self.max_frame_dt.is_finite() && self.max_frame_dt > 0.0) {
            return invalid("max_frame_dt", "must be a positive number of seconds");
        }
        if self.maze.lives == 0 {
            return invalid("maze.lives", "must be at least 1");
        }
        if !(self.maze.player_speed > 0.0 && self.maze.player_speed < crate::consts::CELL_SIZE) {
            return invalid("maze.player_speed", "must be positive and below one cell");
        }
        Ok(())
    }

    /// Fixed simulation timestep (seconds)
    pub fn sim_dt(&self) -> f32 {
        1.0 / self.tick_rate_hz as f32
    }

    /// Read a settings file; missing means defaults, malformed warns and
    /// falls back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_or_default(path: impl AsRef<std::path::Path>) -> Self {
        let path = path.as_ref();
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                return Self::default();
            }
            Err(e) => {
                log::warn!("Failed to read {}: {e}, using defaults", path.display());
                return Self::default();
            }
        };
        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("{e}, using defaults");
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage
            && let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY)
        {
            match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
                Err(e) => log::warn!("{e}, using defaults"),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage
            && let Ok(json) = self.to_json()
        {
            let _ = storage.set_item(Self::STORAGE_KEY, &json);
            log::info!("Settings saved");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.tick_rate_hz, 60);
        assert_eq!(settings.max_substeps, 8);
        assert!((settings.sim_dt() - crate::consts::SIM_DT).abs() < 1e-6);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{"seed": 7, "maze": {"lives": 5}}"#).unwrap();
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.maze.lives, 5);
        assert_eq!(settings.maze.vulnerable_ticks, crate::consts::VULNERABLE_TICKS);
        assert_eq!(settings.max_substeps, 8);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            Settings::from_json(r#"{"tick_rate_hz": 0}"#),
            Err(SettingsError::Invalid { field: "tick_rate_hz", .. })
        ));
        assert!(matches!(
            Settings::from_json(r#"{"maze": {"lives": 0}}"#),
            Err(SettingsError::Invalid { field: "maze.lives", .. })
        ));
        assert!(matches!(
            Settings::from_json("[1, 2"),
            Err(SettingsError::Json(_))
        ));
    }

    #[test]
    fn test_load_or_default() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        assert_eq!(Settings::load_or_default(&path), Settings::default());

        std::fs::write(&path, "not json").unwrap();
        assert_eq!(Settings::load_or_default(&path), Settings::default());

        let custom = Settings {
            seed: Some(42),
            ..Settings::default()
        };
        custom.save(&path).unwrap();
        assert_eq!(Settings::load_or_default(&path), custom);
    }
}
