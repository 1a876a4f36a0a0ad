//! Game state shared by every per-tick system
//!
//! The [`World`] is the single owner of everything the simulation touches:
//! the component store, the level's progression state, the tutorial, held
//! input and the external collaborators (audio, dialog, level data, saves).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ecs::{Entity, Registry};
use super::input::InputState;
use super::map::LevelData;
use super::menu::MenuState;
use super::nav::NavGraph;
use super::tutorial::Tutorial;
use crate::audio::AudioManager;
use crate::dialog::DialogSystem;
use crate::persistence::SaveStore;
use crate::settings::Settings;

/// Progression state of the current playthrough
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelState {
    /// 0 is the start menu, `max` the credits
    pub current: u32,
    pub max: u32,
    /// Never negative
    pub hp: i32,
    /// Never negative
    pub bullets: i32,
    pub has_key: bool,
}

impl LevelState {
    pub fn new(max: u32, hp: i32) -> Self {
        Self {
            current: 0,
            max,
            hp,
            bullets: 0,
            has_key: false,
        }
    }

    /// Hit-points and bullets back to their starting values
    pub fn reset_vitals(&mut self, initial_hp: i32) {
        self.hp = initial_hp;
        self.bullets = 0;
    }

    /// Any level with a map (not the menu, not the credits)
    pub fn is_playable(&self) -> bool {
        self.current != 0 && self.current != self.max
    }
}

/// Where the player went into hiding
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HiddenPlayer {
    pub position: Vec2,
    pub scale: Vec2,
}

/// Complete simulation context
pub struct World {
    pub registry: Registry,
    pub nav: NavGraph,
    pub level: LevelState,
    pub tutorial: Tutorial,
    pub input: InputState,
    pub menu: MenuState,
    /// The player entity; `None` while hidden, on the menu or the credits
    pub player: Option<Entity>,
    pub hidden: Option<HiddenPlayer>,
    pub paused: bool,
    pub show_start_screen: bool,
    pub debug_mode: bool,
    pub exit_requested: bool,
    /// Simulation time, only advancing while unpaused
    pub sim_time_ms: f64,
    pub audio: AudioManager,
    pub dialog: DialogSystem,
    pub saves: SaveStore,
    pub settings: Settings,
    pub(crate) data: Box<dyn LevelData>,
    pub(crate) fps_timer_ms: f32,
    pub(crate) fps_count: u32,
}

impl World {
    /// Create a world sitting on the start menu
    pub fn new(settings: Settings, data: Box<dyn LevelData>, audio: AudioManager) -> Self {
        let saves = SaveStore::new(settings.save_path.clone(), settings.max_level);
        let mut world = Self {
            registry: Registry::new(),
            nav: NavGraph::new(),
            level: LevelState::new(settings.max_level, settings.initial_hp),
            tutorial: Tutorial::new(),
            input: InputState::default(),
            menu: MenuState::default(),
            player: None,
            hidden: None,
            paused: false,
            show_start_screen: false,
            debug_mode: false,
            exit_requested: false,
            sim_time_ms: 0.0,
            audio,
            dialog: DialogSystem::new(),
            saves,
            settings,
            data,
            fps_timer_ms: 0.0,
            fps_count: 0,
        };
        world.restart_game();
        world
    }

    /// Whether the game asked to close
    pub fn is_over(&self) -> bool {
        self.exit_requested
    }

    pub fn on_tutorial_level(&self) -> bool {
        self.level.current == self.settings.tutorial_level
    }

    /// The player, unless it is missing or dying
    pub fn controllable_player(&self) -> Option<Entity> {
        self.player
            .filter(|&p| self.registry.players.has(p) && !self.registry.death_timers.has(p))
    }

    pub fn player_position(&self) -> Option<Vec2> {
        self.player
            .and_then(|p| self.registry.motions.get(p))
            .map(|m| m.position)
    }
}
