//! Guided tutorial on the tutorial level
//!
//! A single track of steps. Each step shows dialog text, usually pauses the
//! game, and waits for the player to perform the action it teaches:
//!
//! | index | waits for | then |
//! |-------|-----------|------|
//! | 0 | jump (Space) | after the reading delay, asks to move |
//! | 1 | move (A/D/arrows) | after the delay and a bullet pickup, asks to shoot |
//! | 2 | shoot (J) | asks to hide |
//! | 3 | hide then come out | allows eating |
//! | 4 | hit-points at the goal | allows taking the key |
//! | 5 | key in hand | final lines |
//! | 6 | nothing | terminal |
//!
//! Flags only ever go from false to true; a restart of the tutorial level
//! is the only thing that clears them.

use std::time::Instant;

use glam::Vec2;

use super::ecs::{Entity, Registry};
use super::input::{Key, KeyAction};
use super::spawn;
use super::state::World;
use crate::consts::*;
use crate::settings::TutorialClock;

/// Index after the last step
pub const TUTORIAL_DONE: u32 = 6;

/// What the player has been taught so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TutorialFlags {
    pub can_jump: bool,
    pub can_move: bool,
    pub can_shot: bool,
    pub can_hide: bool,
    pub can_out: bool,
    pub can_eat: bool,
    pub can_get_bullet: bool,
    pub can_get_key: bool,
}

#[derive(Debug, Clone)]
pub struct Tutorial {
    pub flags: TutorialFlags,
    pub index: u32,
    /// Dialog block driving the text, latched by the level's speech point
    pub speech_point: Option<u32>,
    /// The current step keeps the game paused until its key is pressed,
    /// whatever the pause menu does meanwhile
    pub holding: bool,
    /// Dialog line currently on screen
    shown: Option<usize>,
    texts: Vec<Entity>,
    step_started: Instant,
    step_started_sim_ms: f64,
}

impl Default for Tutorial {
    fn default() -> Self {
        Self::new()
    }
}

impl Tutorial {
    pub fn new() -> Self {
        Self {
            flags: TutorialFlags::default(),
            index: 0,
            speech_point: None,
            holding: false,
            shown: None,
            texts: Vec::new(),
            step_started: Instant::now(),
            step_started_sim_ms: 0.0,
        }
    }

    /// Back to the first step; the texts went with the level wipe
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn is_active(&self) -> bool {
        self.speech_point.is_some()
    }

    pub fn is_done(&self) -> bool {
        self.index >= TUTORIAL_DONE
    }

    pub fn texts(&self) -> &[Entity] {
        &self.texts
    }

    /// Remove the on-screen tutorial text
    pub fn clear_texts(&mut self, registry: &mut Registry) {
        registry.remove_entities(&self.texts);
        self.texts.clear();
    }

    fn restart_clock(&mut self, sim_time_ms: f64) {
        self.step_started = Instant::now();
        self.step_started_sim_ms = sim_time_ms;
    }

    fn elapsed_secs(&self, clock: TutorialClock, sim_time_ms: f64) -> f32 {
        match clock {
            TutorialClock::WallClock => self.step_started.elapsed().as_secs_f32(),
            TutorialClock::Simulation => ((sim_time_ms - self.step_started_sim_ms) / 1000.0) as f32,
        }
    }
}

impl World {
    fn tutorial_running(&self) -> bool {
        self.on_tutorial_level() && self.tutorial.is_active() && !self.tutorial.is_done()
    }

    /// A tutorial step is waiting for its key
    pub fn tutorial_holds(&self) -> bool {
        self.tutorial.holding && self.tutorial_running()
    }

    fn hold_for_key(&mut self) {
        self.tutorial.holding = true;
        self.paused = true;
    }

    fn release_hold(&mut self) {
        self.tutorial.holding = false;
        self.paused = false;
    }

    /// Replace the tutorial text with `lines` of the latched dialog block,
    /// stacked upwards from the tutorial text position
    fn show_tutorial_lines(&mut self, lines: &[usize]) {
        let Some(index) = self.tutorial.speech_point else {
            return;
        };
        self.tutorial.clear_texts(&mut self.registry);
        for (row, &line) in lines.iter().enumerate() {
            let pos = TUTORIAL_TEXT_POS - Vec2::new(0.0, 50.0 * row as f32);
            let text = spawn::create_text(
                &mut self.registry,
                pos,
                TUTORIAL_TEXT_SCALE,
                TEXT_COLOR,
                self.dialog.text(index, line),
            );
            self.tutorial.texts.push(text);
        }
        self.tutorial.shown = lines.first().copied();
    }

    fn tutorial_gate_open(&self) -> bool {
        let elapsed = self
            .tutorial
            .elapsed_secs(self.settings.tutorial_clock, self.sim_time_ms);
        elapsed >= self.settings.tutorial_gate_secs
    }

    /// Advance the tutorial on the per-tick conditions. Runs even while
    /// paused, before anything else in the tick.
    pub fn update_tutorial(&mut self) {
        if !self.tutorial_running() {
            return;
        }
        let flags = self.tutorial.flags;
        match self.tutorial.index {
            0 if self.tutorial.shown.is_none() => {
                self.show_tutorial_lines(&[0]);
                self.hold_for_key();
                self.tutorial.restart_clock(self.sim_time_ms);
            }
            0 if flags.can_jump && self.tutorial_gate_open() => {
                self.show_tutorial_lines(&[1]);
                self.hold_for_key();
                self.tutorial.index = 1;
            }
            1 if flags.can_move && self.tutorial_gate_open() && self.level.bullets > 0 => {
                self.show_tutorial_lines(&[3, 4]);
                if let Some(motion) = self.player.and_then(|p| self.registry.motions.get_mut(p)) {
                    motion.scale.x = motion.scale.x.abs();
                }
                self.hold_for_key();
                self.tutorial.index = 2;
            }
            3 if flags.can_hide && !flags.can_out => {
                if self.tutorial.shown != Some(6) {
                    self.show_tutorial_lines(&[6]);
                }
            }
            3 if flags.can_hide && flags.can_out => {
                self.show_tutorial_lines(&[7]);
                self.tutorial.flags.can_eat = true;
                self.tutorial.index = 4;
            }
            4 if self.level.hp >= TUTORIAL_HP_GOAL => {
                self.show_tutorial_lines(&[8]);
                self.tutorial.flags.can_get_key = true;
                self.tutorial.index = 5;
            }
            5 if self.level.has_key => {
                self.show_tutorial_lines(&[9, 10, 11]);
                self.tutorial.index = TUTORIAL_DONE;
            }
            _ => {}
        }
    }

    /// Keys the tutorial waits for while it holds the game paused. Only
    /// the expected key for the current step unpauses. Ignored while the
    /// pause menu is open.
    pub fn tutorial_on_key(&mut self, key: Key, action: KeyAction) {
        if !self.tutorial_holds() || !self.menu.buttons().is_empty() {
            return;
        }
        let flags = self.tutorial.flags;
        match self.tutorial.index {
            0 if !flags.can_jump => {
                if action == KeyAction::Press && key == Key::Space {
                    self.tutorial.flags.can_jump = true;
                    self.release_hold();
                    self.tutorial.restart_clock(self.sim_time_ms);
                }
            }
            1 if !flags.can_move => {
                let is_move = matches!(key, Key::A | Key::D | Key::Left | Key::Right);
                if action == KeyAction::Press && is_move {
                    self.show_tutorial_lines(&[2]);
                    self.tutorial.flags.can_move = true;
                    self.tutorial.flags.can_get_bullet = true;
                    self.release_hold();
                    self.tutorial.restart_clock(self.sim_time_ms);
                }
            }
            2 if !flags.can_shot => {
                let pressed = matches!(action, KeyAction::Press | KeyAction::Repeat);
                if pressed && key == Key::J && self.level.bullets > 0 {
                    self.show_tutorial_lines(&[5]);
                    self.tutorial.flags.can_shot = true;
                    self.release_hold();
                    self.tutorial.index = 3;
                }
            }
            _ => {}
        }
    }
}
