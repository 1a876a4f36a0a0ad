//! Audio requests
//!
//! The simulation never mixes audio itself. It queues fire-and-forget
//! requests that the platform layer drains once per frame and hands to
//! whatever backend it owns.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("missing audio asset {0}")]
    MissingAsset(PathBuf),
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Door unlocked with the key
    DoorOpen,
    /// Food eaten
    Eat,
    /// Bullet fired
    Shoot,
    /// Player climbs into a cabinet
    Trash,
    /// Gold collected
    Bonus,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 5] = [
        SoundEffect::DoorOpen,
        SoundEffect::Eat,
        SoundEffect::Shoot,
        SoundEffect::Trash,
        SoundEffect::Bonus,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            SoundEffect::DoorOpen => "doorOpen.wav",
            SoundEffect::Eat => "eat.wav",
            SoundEffect::Shoot => "shoot.wav",
            SoundEffect::Trash => "trash.wav",
            SoundEffect::Bonus => "bonus.wav",
        }
    }
}

/// Looping background tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicTrack {
    Bg1,
    Bg2,
    Bg3,
    Bg4,
    Bg5,
    Bg6,
    Bg7,
    /// Credits theme
    End,
}

impl MusicTrack {
    pub const ALL: [MusicTrack; 8] = [
        MusicTrack::Bg1,
        MusicTrack::Bg2,
        MusicTrack::Bg3,
        MusicTrack::Bg4,
        MusicTrack::Bg5,
        MusicTrack::Bg6,
        MusicTrack::Bg7,
        MusicTrack::End,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            MusicTrack::Bg1 => "bg1.wav",
            MusicTrack::Bg2 => "bg2.wav",
            MusicTrack::Bg3 => "bg3.wav",
            MusicTrack::Bg4 => "bg4.wav",
            MusicTrack::Bg5 => "bg5.wav",
            MusicTrack::Bg6 => "bg6.wav",
            MusicTrack::Bg7 => "bg7.wav",
            MusicTrack::End => "bgEnd.wav",
        }
    }
}

/// Track for a level: the menu shares the first level's track and the
/// credits level `max` gets the ending theme. Playable levels past the last
/// background track have none.
pub fn music_for_level(level: u32, max: u32) -> Option<MusicTrack> {
    const BACKGROUND: [MusicTrack; 7] = [
        MusicTrack::Bg1,
        MusicTrack::Bg2,
        MusicTrack::Bg3,
        MusicTrack::Bg4,
        MusicTrack::Bg5,
        MusicTrack::Bg6,
        MusicTrack::Bg7,
    ];
    match level {
        0 => Some(MusicTrack::Bg1),
        n if n == max => Some(MusicTrack::End),
        n if n < max => BACKGROUND.get(n as usize - 1).copied(),
        _ => None,
    }
}

/// A queued request
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioRequest {
    Sound { effect: SoundEffect, volume: f32 },
    Music { track: MusicTrack, looping: bool, volume: f32 },
}

/// Audio manager for the game
#[derive(Debug)]
pub struct AudioManager {
    queue: VecDeque<AudioRequest>,
    now_playing: Option<MusicTrack>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::silent()
    }
}

impl AudioManager {
    /// Verify every asset under `dir` before the game starts
    pub fn open(dir: &Path) -> Result<Self, AudioError> {
        let files = MusicTrack::ALL
            .iter()
            .map(|t| t.file_name())
            .chain(SoundEffect::ALL.iter().map(|s| s.file_name()));
        for name in files {
            let path = dir.join(name);
            if !path.is_file() {
                return Err(AudioError::MissingAsset(path));
            }
        }
        log::info!("Audio assets found in {}", dir.display());
        Ok(Self::silent())
    }

    /// Manager without any asset check, for headless runs and tests
    pub fn silent() -> Self {
        Self {
            queue: VecDeque::new(),
            now_playing: None,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn gain(&self, channel: f32) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * channel
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let volume = self.gain(self.sfx_volume);
        if volume <= 0.0 {
            return;
        }
        self.queue.push_back(AudioRequest::Sound { effect, volume });
    }

    /// Switch the background track (looped)
    pub fn play_music(&mut self, track: MusicTrack) {
        self.now_playing = Some(track);
        self.queue.push_back(AudioRequest::Music {
            track,
            looping: true,
            volume: self.gain(self.music_volume),
        });
    }

    pub fn now_playing(&self) -> Option<MusicTrack> {
        self.now_playing
    }

    /// Hand every pending request to the caller
    pub fn drain(&mut self) -> impl Iterator<Item = AudioRequest> + '_ {
        self.queue.drain(..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_music_for_level() {
        assert_eq!(music_for_level(0, 8), Some(MusicTrack::Bg1));
        assert_eq!(music_for_level(1, 8), Some(MusicTrack::Bg1));
        assert_eq!(music_for_level(7, 8), Some(MusicTrack::Bg7));
        assert_eq!(music_for_level(8, 8), Some(MusicTrack::End));
        assert_eq!(music_for_level(9, 8), None);
    }

    #[test]
    fn test_credits_theme_follows_max_level() {
        assert_eq!(music_for_level(4, 5), Some(MusicTrack::Bg4));
        assert_eq!(music_for_level(5, 5), Some(MusicTrack::End));
        assert_eq!(music_for_level(6, 5), None);
        // More playable levels than background tracks
        assert_eq!(music_for_level(8, 10), None);
        assert_eq!(music_for_level(10, 10), Some(MusicTrack::End));
    }

    #[test]
    fn test_queue_and_drain() {
        let mut audio = AudioManager::silent();
        audio.play(SoundEffect::Eat);
        audio.play_music(MusicTrack::Bg3);
        assert_eq!(audio.now_playing(), Some(MusicTrack::Bg3));

        let drained: Vec<_> = audio.drain().collect();
        assert_eq!(drained.len(), 2);
        assert!(matches!(
            drained[0],
            AudioRequest::Sound {
                effect: SoundEffect::Eat,
                ..
            }
        ));
        assert_eq!(audio.drain().count(), 0);
    }

    #[test]
    fn test_muted_drops_effects() {
        let mut audio = AudioManager::silent();
        audio.set_muted(true);
        audio.play(SoundEffect::Shoot);
        assert_eq!(audio.drain().count(), 0);
    }

    #[test]
    fn test_open_requires_assets() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            AudioManager::open(dir.path()),
            Err(AudioError::MissingAsset(_))
        ));

        let names = MusicTrack::ALL
            .iter()
            .map(|t| t.file_name())
            .chain(SoundEffect::ALL.iter().map(|s| s.file_name()));
        for name in names {
            std::fs::write(dir.path().join(name), b"RIFF").unwrap();
        }
        assert!(AudioManager::open(dir.path()).is_ok());
    }
}
