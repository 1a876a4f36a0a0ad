//! Save/load of the playthrough state
//!
//! Features:
//! - Versioned JSON envelope
//! - Atomic write (tmp → save)
//! - Validation before a save is offered for loading
//!
//! Exactly four fields are persisted: level, hit-points, bullets, has-key.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::LevelState;

/// Current envelope version
pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save file i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("save file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported save version {0}")]
    UnsupportedVersion(u32),
    #[error("saved level {level} is outside 1..{max}")]
    InvalidLevel { level: u32, max: u32 },
}

/// The persisted fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveGame {
    pub level: u32,
    pub hp: i32,
    pub bullets: i32,
    pub has_key: bool,
}

impl From<&LevelState> for SaveGame {
    fn from(state: &LevelState) -> Self {
        Self {
            level: state.current,
            hp: state.hp,
            bullets: state.bullets,
            has_key: state.has_key,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SaveEnvelope {
    version: u32,
    game: SaveGame,
}

/// A save slot on disk
#[derive(Debug, Clone)]
pub struct SaveStore {
    path: PathBuf,
    max_level: u32,
}

impl SaveStore {
    /// `max_level` is the credits level; saves must point at a playable level
    pub fn new(path: impl Into<PathBuf>, max_level: u32) -> Self {
        Self {
            path: path.into(),
            max_level,
        }
    }

    /// Write the slot, replacing any previous save
    pub fn save(&self, game: &SaveGame) -> Result<(), SaveError> {
        let envelope = SaveEnvelope {
            version: SAVE_VERSION,
            game: *game,
        };
        let json = serde_json::to_string_pretty(&envelope)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        log::info!("Game saved (level {})", game.level);
        Ok(())
    }

    /// Read and validate the slot
    pub fn load(&self) -> Result<SaveGame, SaveError> {
        let json = std::fs::read_to_string(&self.path)?;
        let envelope: SaveEnvelope = serde_json::from_str(&json)?;
        if envelope.version != SAVE_VERSION {
            return Err(SaveError::UnsupportedVersion(envelope.version));
        }
        let game = envelope.game;
        if game.level == 0 || game.level >= self.max_level {
            return Err(SaveError::InvalidLevel {
                level: game.level,
                max: self.max_level,
            });
        }
        Ok(game)
    }

    /// Saved level, if the slot holds a valid save
    pub fn load_level(&self) -> Option<u32> {
        self.load().ok().map(|game| game.level)
    }

    /// Whether the slot can be loaded
    pub fn is_valid(&self) -> bool {
        match self.load() {
            Ok(_) => true,
            Err(SaveError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => {
                log::warn!("Ignoring save at {}: {e}", self.path.display());
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(level: u32) -> SaveGame {
        SaveGame {
            level,
            hp: 2,
            bullets: 5,
            has_key: true,
        }
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = SaveStore::new(dir.path().join("saves/slot.json"), 8);
        assert!(!store.is_valid());

        store.save(&game(3)).unwrap();
        assert!(store.is_valid());
        assert_eq!(store.load().unwrap(), game(3));
        assert_eq!(store.load_level(), Some(3));
        assert!(!dir.path().join("saves/slot.tmp").exists());
    }

    #[test]
    fn test_rejects_unplayable_levels() {
        let dir = tempfile::tempdir().unwrap();
        let store = SaveStore::new(dir.path().join("slot.json"), 8);
        store.save(&game(8)).unwrap();
        assert!(matches!(
            store.load(),
            Err(SaveError::InvalidLevel { level: 8, max: 8 })
        ));
        assert!(!store.is_valid());
        assert_eq!(store.load_level(), None);
    }

    #[test]
    fn test_rejects_corrupt_and_foreign_versions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slot.json");
        let store = SaveStore::new(&path, 8);

        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(store.load(), Err(SaveError::Json(_))));

        std::fs::write(
            &path,
            r#"{"version":9,"game":{"level":2,"hp":3,"bullets":0,"has_key":false}}"#,
        )
        .unwrap();
        assert!(matches!(store.load(), Err(SaveError::UnsupportedVersion(9))));
    }
}
