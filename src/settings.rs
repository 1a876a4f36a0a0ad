//! Game settings and preferences
//!
//! Persisted separately from game saves as a JSON file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Which clock the tutorial's reading delay is measured on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TutorialClock {
    /// Real time since the step began, whatever the simulation does
    #[default]
    WallClock,
    /// Accumulated simulation time (follows pauses and speed changes)
    Simulation,
}

impl TutorialClock {
    pub fn as_str(&self) -> &'static str {
        match self {
            TutorialClock::WallClock => "wall-clock",
            TutorialClock::Simulation => "simulation",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "wall-clock" | "wallclock" | "wall" => Some(TutorialClock::WallClock),
            "simulation" | "sim" => Some(TutorialClock::Simulation),
            _ => None,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,

    // === Data ===
    /// Holds `levels/`, `dialog/` and `audio/`
    pub data_dir: PathBuf,
    pub save_path: PathBuf,

    // === Progression ===
    /// Level that runs the guided tutorial
    pub tutorial_level: u32,
    /// Credits level; the last playable level is one below
    pub max_level: u32,
    pub initial_hp: i32,

    // === Tutorial ===
    /// Minimum time a gated tutorial line stays up (seconds)
    pub tutorial_gate_secs: f32,
    pub tutorial_clock: TutorialClock,

    // === HUD ===
    /// Log frame rate once per second
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,

            data_dir: PathBuf::from("data"),
            save_path: PathBuf::from("save/savegame.json"),

            tutorial_level: 1,
            max_level: 8,
            initial_hp: crate::consts::INITIAL_HP,

            tutorial_gate_secs: 10.0,
            tutorial_clock: TutorialClock::WallClock,

            show_fps: false,
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    return settings;
                }
                Err(e) => log::warn!("Ignoring malformed settings {}: {e}", path.display()),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("Could not read settings {}: {e}", path.display()),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to `path`
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Music gain after master volume and mute
    pub fn effective_music_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }

    /// Effect gain after master volume and mute
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.tutorial_level, 1);
        assert_eq!(settings.max_level, 8);
        assert_eq!(settings.tutorial_gate_secs, 10.0);
        assert_eq!(settings.tutorial_clock, TutorialClock::WallClock);
    }

    #[test]
    fn test_save_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            tutorial_clock: TutorialClock::Simulation,
            muted: true,
            ..Settings::default()
        };
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path);
        assert_eq!(loaded.tutorial_clock, TutorialClock::Simulation);
        assert!(loaded.muted);
        assert_eq!(loaded.effective_sfx_volume(), 0.0);
    }

    #[test]
    fn test_partial_and_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        std::fs::write(&path, r#"{"tutorial_gate_secs": 2.5}"#).unwrap();
        let partial = Settings::load(&path);
        assert_eq!(partial.tutorial_gate_secs, 2.5);
        assert_eq!(partial.max_level, 8);

        std::fs::write(&path, "not json").unwrap();
        assert_eq!(Settings::load(&path).tutorial_gate_secs, 10.0);
        assert_eq!(Settings::load(&dir.path().join("missing.json")).max_level, 8);
    }

    #[test]
    fn test_clock_names() {
        assert_eq!(TutorialClock::from_str("SIM"), Some(TutorialClock::Simulation));
        assert_eq!(TutorialClock::from_str("wall-clock"), Some(TutorialClock::WallClock));
        assert_eq!(TutorialClock::from_str("nope"), None);
        assert_eq!(TutorialClock::Simulation.as_str(), "simulation");
    }
}
