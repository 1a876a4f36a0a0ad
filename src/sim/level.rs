//! Level lifecycle: restarts, transitions, save/load
//!
//! [`World::restart_game`] is the only way a level is (re)built. Every
//! transition (death, door, debug step, menu) adjusts the level state and then
//! calls it.

use glam::Vec2;

use super::components::LinearMovement;
use super::ecs::Entity;
use super::hud;
use super::map;
use super::menu;
use super::spawn;
use super::state::World;
use crate::audio::music_for_level;
use crate::consts::*;
use crate::persistence::{SaveError, SaveGame};

const CREDITS: [&str; 8] = [
    "Thank you for playing",
    "Escape From Celestria",
    "a game produced by",
    "Peter Yang",
    "Qianzhi Zhang",
    "Sherry Wang",
    "Yi Ran Liao",
    "Yixuan Li",
];
const CREDITS_START: Vec2 = Vec2::new(180.0, 0.0);
const CREDITS_SPACING: f32 = 80.0;
const CREDITS_SCROLL: f32 = 650.0;
const CREDITS_SECS: f32 = 10.0;
const CREDITS_SCALE: f32 = 0.9;

impl World {
    /// Rebuild the current level from scratch
    pub fn restart_game(&mut self) {
        let level = self.level.current;
        log::info!("Restarting level {level}");
        self.registry.log_component_counts();

        self.level.has_key = level + 1 == self.level.max;
        if self.on_tutorial_level() {
            self.tutorial.reset();
        }
        self.tutorial.holding = false;
        self.hidden = None;
        self.player = None;
        self.paused = false;
        self.input.release_all();
        self.menu.clear();

        self.wipe_level_entities();
        self.play_level_music();

        if level == 0 {
            self.dialog.clear(&mut self.registry);
            self.nav.clear();
            self.show_start_screen = true;
            menu::render_start_menu(&mut self.registry);
            self.menu.collect_buttons(&self.registry);
            spawn::create_title(
                &mut self.registry,
                Vec2::new(WINDOW_WIDTH / 2.0, WINDOW_HEIGHT / 2.0 - 100.0),
            );
            return;
        }

        self.show_start_screen = false;
        if level == self.level.max {
            self.dialog.clear(&mut self.registry);
            self.nav.clear();
            spawn_credits(self);
            return;
        }

        menu::clear_menu(&mut self.registry);
        match map::load_map(self.data.as_ref(), level) {
            Ok(grid) => {
                let player = map::instantiate_map(&mut self.registry, &mut self.nav, &grid, level);
                self.player = Some(player);
                log::info!(
                    "Level {level} loaded: {} entities with motion, {} nav vertices",
                    self.registry.motions.len(),
                    self.nav.vertex_count()
                );
            }
            Err(e) => {
                log::error!("Could not load level {level}: {e}");
                self.nav.clear();
            }
        }
        hud::refresh(self);
        self.dialog
            .initialize(&mut self.registry, self.data.as_ref(), level);
    }

    /// Remove every level-scoped entity: anything positioned, and the
    /// invisible speech triggers
    fn wipe_level_entities(&mut self) {
        let mut doomed: Vec<Entity> = self.registry.motions.entities().to_vec();
        doomed.extend_from_slice(self.registry.speech_points.entities());
        self.registry.remove_entities(&doomed);
        self.registry.collisions.clear();
    }

    fn play_level_music(&mut self) {
        match music_for_level(self.level.current, self.level.max) {
            Some(track) => self.audio.play_music(track),
            None => log::error!(
                "No music track for level {}, playback skipped",
                self.level.current
            ),
        }
    }

    /// Jump to `level` (clamped to the credits) and rebuild it
    pub fn goto_level(&mut self, level: u32) {
        self.level.current = level.min(self.level.max);
        self.restart_game();
    }

    /// Door transition
    pub fn advance_level(&mut self) {
        if self.level.current < self.level.max {
            self.level.current += 1;
        }
        self.level.has_key = false;
        self.restart_game();
    }

    /// Start the current level over with fresh hit-points and no bullets
    pub fn restart_level(&mut self) {
        self.level.reset_vitals(self.settings.initial_hp);
        self.restart_game();
    }

    /// Begin a playthrough at the first level
    pub fn new_game(&mut self) {
        self.level.current = 1;
        self.level.reset_vitals(self.settings.initial_hp);
        self.restart_game();
    }

    pub fn save_game(&self) -> Result<(), SaveError> {
        self.saves.save(&SaveGame::from(&self.level))
    }

    /// Resume the saved playthrough. On failure nothing changes.
    pub fn load_game(&mut self) -> Result<(), SaveError> {
        let game = self.saves.load()?;
        self.level.current = game.level;
        self.level.hp = game.hp.max(0);
        self.level.bullets = game.bullets.max(0);
        self.restart_game();
        self.level.has_key = game.has_key;
        hud::refresh(self);
        log::info!("Loaded save at level {}", game.level);
        Ok(())
    }
}

fn spawn_credits(world: &mut World) {
    for (i, line) in CREDITS.iter().enumerate() {
        let start = Vec2::new(CREDITS_START.x, CREDITS_START.y - i as f32 * CREDITS_SPACING);
        let end = start + Vec2::new(0.0, CREDITS_SCROLL);
        let text = spawn::create_text(&mut world.registry, start, CREDITS_SCALE, TEXT_COLOR, line);
        world
            .registry
            .linear_movements
            .insert(text, LinearMovement::new(start, end, CREDITS_SECS));
    }
}
