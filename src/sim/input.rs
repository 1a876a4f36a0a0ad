//! Keyboard input
//!
//! The platform layer translates its key events into [`Key`]/[`KeyAction`]
//! and calls [`World::on_key`] synchronously. Held-key state lives in
//! [`InputState`] and is turned into velocity once per tick.

use glam::Vec2;

use super::components::{RenderRequest, TextureId};
use super::hud;
use super::spawn;
use super::state::{HiddenPlayer, World};
use crate::audio::SoundEffect;
use crate::consts::*;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Space,
    A,
    D,
    Left,
    Right,
    Up,
    Down,
    J,
    H,
    R,
    P,
    K,
    Escape,
    Enter,
    Comma,
    Period,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Press,
    Repeat,
    Release,
}

impl KeyAction {
    /// Press or auto-repeat
    pub fn is_down(self) -> bool {
        matches!(self, KeyAction::Press | KeyAction::Repeat)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
}

impl Modifiers {
    pub const SHIFT: Modifiers = Modifiers { shift: true };
}

/// Held movement keys and walking animation
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    /// Space went down and has not come back up yet
    pub jumped: bool,
    /// Time spent walking, drives the two-frame walk cycle
    pub walk_ms: f32,
}

impl InputState {
    pub fn release_all(&mut self) {
        self.left = false;
        self.right = false;
        self.jumped = false;
    }

    pub fn is_walking(&self) -> bool {
        self.left || self.right
    }

    fn walk_frame(&self) -> TextureId {
        if (self.walk_ms / WALK_FRAME_MS) as u32 % 2 == 0 {
            TextureId::JoshGun1
        } else {
            TextureId::JoshGun
        }
    }
}

impl World {
    /// Single entry point for key events
    pub fn on_key(&mut self, key: Key, action: KeyAction, mods: Modifiers) {
        self.tutorial_on_key(key, action);

        if action == KeyAction::Press && key == Key::Escape {
            if self.hidden.is_some() {
                self.unhide_player();
            } else if !self.show_start_screen {
                self.toggle_pause();
            }
        }

        if self.hidden.is_some() && key != Key::H {
            return;
        }

        match key {
            Key::Left | Key::A => self.input.left = action.is_down(),
            Key::Right | Key::D => self.input.right = action.is_down(),
            _ => {}
        }
        if key == Key::Space && action == KeyAction::Release {
            self.input.jumped = false;
        }

        let playing = !self.paused && !self.show_start_screen;
        if playing && self.controllable_player().is_some() {
            if key == Key::J && action.is_down() {
                self.shoot();
            }
            if key == Key::Space && action == KeyAction::Press {
                self.jump();
            }
        }

        if key == Key::H && action == KeyAction::Press {
            if self.hidden.is_some() {
                self.unhide_player();
            } else if playing {
                self.try_hide_player();
            }
        }

        if key == Key::R && action == KeyAction::Release && self.level.is_playable() {
            self.restart_level();
        }

        if key == Key::P && action == KeyAction::Press {
            match self.player_position() {
                Some(pos) => log::info!("Player position: {:.1}, {:.1}", pos.x, pos.y),
                None => log::info!("No player on screen"),
            }
        }

        if (self.paused || self.show_start_screen) && !self.menu.buttons().is_empty() {
            match (key, action) {
                (Key::Down, KeyAction::Release) => self.menu.focus_next(),
                (Key::Up, KeyAction::Release) => self.menu.focus_prev(),
                (Key::Enter, KeyAction::Release) => self.activate_menu(),
                _ => {}
            }
        }

        if key == Key::K {
            self.debug_mode = action != KeyAction::Release;
        }

        if mods.shift && action == KeyAction::Release {
            match key {
                Key::Comma if self.level.current > 0 => {
                    log::info!("Debug: stepping back to level {}", self.level.current - 1);
                    self.goto_level(self.level.current - 1);
                }
                Key::Period if self.level.current < self.level.max => {
                    log::info!("Debug: stepping forward to level {}", self.level.current + 1);
                    self.goto_level(self.level.current + 1);
                }
                _ => {}
            }
        }
    }

    /// Fire one bullet in the facing direction, if any are carried
    fn shoot(&mut self) {
        let Some(player) = self.controllable_player() else {
            return;
        };
        self.registry
            .render_requests
            .insert(player, RenderRequest::sprite(TextureId::JoshGun1));
        if self.level.bullets <= 0 {
            return;
        }
        let Some(motion) = self.registry.motions.get(player).copied() else {
            return;
        };
        let direction = motion.scale.x.signum();
        let muzzle = motion.position + Vec2::new(direction * PLAYER_SIZE.x / 2.0, 0.0);
        spawn::create_bullet_shoot(&mut self.registry, muzzle, direction);
        self.level.bullets -= 1;
        self.audio.play(SoundEffect::Shoot);
        hud::refresh(self);
    }

    /// Jump, only from standing and once per Space press
    fn jump(&mut self) {
        if self.input.jumped {
            return;
        }
        let Some(player) = self.controllable_player() else {
            return;
        };
        if let Some(motion) = self.registry.motions.get_mut(player) {
            if motion.velocity.y == 0.0 {
                motion.velocity.y = -PLAYER_JUMP;
                self.input.jumped = true;
            }
        }
    }

    fn try_hide_player(&mut self) {
        let Some(player) = self.controllable_player() else {
            return;
        };
        let Some(motion) = self.registry.motions.get(player).copied() else {
            return;
        };
        let near_cabinet = self.registry.cabinets.entities().iter().any(|&cabinet| {
            self.registry
                .motions
                .get(cabinet)
                .is_some_and(|c| c.position.distance(motion.position) <= INTERACT_DISTANCE)
        });
        if !near_cabinet {
            return;
        }

        self.audio.play(SoundEffect::Trash);
        self.registry.remove_all_components_of(player);
        self.player = None;
        self.hidden = Some(HiddenPlayer {
            position: motion.position,
            scale: motion.scale,
        });
        self.input.left = false;
        self.input.right = false;
        if self.on_tutorial_level() {
            self.tutorial.flags.can_hide = true;
        }
        log::debug!("Player hid at {:?}", motion.position);
    }

    fn unhide_player(&mut self) {
        let Some(hidden) = self.hidden.take() else {
            return;
        };
        let player = spawn::create_player(&mut self.registry, hidden.position);
        if let Some(motion) = self.registry.motions.get_mut(player) {
            motion.scale = hidden.scale;
        }
        self.registry.colors.insert(player, PLAYER_COLOR);
        self.player = Some(player);
        if self.on_tutorial_level() {
            self.tutorial.flags.can_out = true;
        }
        hud::refresh(self);
    }

    /// Turn held keys into horizontal velocity, facing and walk frames
    pub fn handle_movement_keys(&mut self, dt_ms: f32) {
        let Some(player) = self.controllable_player() else {
            return;
        };
        if self.input.is_walking() {
            self.input.walk_ms += dt_ms;
        }
        let frame = self.input.walk_frame();
        let against_wall = self
            .registry
            .players
            .get(player)
            .is_some_and(|p| p.against_wall);
        let Some(motion) = self.registry.motions.get_mut(player) else {
            return;
        };

        if self.input.right {
            if motion.scale.x < 0.0 && !against_wall {
                motion.scale.x = -motion.scale.x;
            }
            motion.velocity.x = PLAYER_SPEED;
        }
        if self.input.left {
            if motion.scale.x > 0.0 && !against_wall {
                motion.scale.x = -motion.scale.x;
            }
            motion.velocity.x = -PLAYER_SPEED;
        }
        if self.input.left == self.input.right {
            motion.velocity.x = 0.0;
        }
        if self.input.is_walking() {
            self.registry
                .render_requests
                .insert(player, RenderRequest::sprite(frame));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::test_support::world_at;

    fn press(world: &mut World, key: Key) {
        world.on_key(key, KeyAction::Press, Modifiers::default());
    }

    fn release(world: &mut World, key: Key) {
        world.on_key(key, KeyAction::Release, Modifiers::default());
    }

    fn player_motion(world: &World) -> crate::sim::components::Motion {
        *world.registry.motions.get(world.player.unwrap()).unwrap()
    }

    #[test]
    fn test_held_keys_drive_velocity() {
        let (mut world, _dir) = world_at(2);
        press(&mut world, Key::A);
        world.handle_movement_keys(16.0);
        let motion = player_motion(&world);
        assert_eq!(motion.velocity.x, -PLAYER_SPEED);
        assert!(motion.scale.x < 0.0);

        press(&mut world, Key::Right);
        world.handle_movement_keys(16.0);
        assert_eq!(player_motion(&world).velocity.x, 0.0);

        release(&mut world, Key::A);
        world.handle_movement_keys(16.0);
        let motion = player_motion(&world);
        assert_eq!(motion.velocity.x, PLAYER_SPEED);
        assert!(motion.scale.x > 0.0);
    }

    #[test]
    fn test_walk_cycle_alternates_frames() {
        let (mut world, _dir) = world_at(2);
        let player = world.player.unwrap();
        press(&mut world, Key::D);
        world.handle_movement_keys(50.0);
        let first = world.registry.render_requests.get(player).unwrap().texture;
        world.handle_movement_keys(100.0);
        let second = world.registry.render_requests.get(player).unwrap().texture;
        assert_ne!(first, second);
    }

    #[test]
    fn test_jump_once_per_press() {
        let (mut world, _dir) = world_at(2);
        press(&mut world, Key::Space);
        assert_eq!(player_motion(&world).velocity.y, -PLAYER_JUMP);

        let player = world.player.unwrap();
        world.registry.motions.get_mut(player).unwrap().velocity.y = 0.0;
        press(&mut world, Key::Space);
        assert_eq!(player_motion(&world).velocity.y, 0.0);
        release(&mut world, Key::Space);
        press(&mut world, Key::Space);
        assert_eq!(player_motion(&world).velocity.y, -PLAYER_JUMP);
    }

    #[test]
    fn test_shoot_spends_bullets() {
        let (mut world, _dir) = world_at(2);
        press(&mut world, Key::J);
        assert!(world.registry.shoot_bullets.is_empty());

        world.level.bullets = 2;
        press(&mut world, Key::J);
        world.on_key(Key::J, KeyAction::Repeat, Modifiers::default());
        press(&mut world, Key::J);
        assert_eq!(world.registry.shoot_bullets.len(), 2);
        assert_eq!(world.level.bullets, 0);
        assert!(world.registry.small_bullets.is_empty());

        let bullet = world.registry.shoot_bullets.entities()[0];
        assert_eq!(world.registry.motions.get(bullet).unwrap().velocity.x, BULLET_SPEED);
    }

    #[test]
    fn test_no_shooting_while_paused() {
        let (mut world, _dir) = world_at(2);
        world.level.bullets = 1;
        press(&mut world, Key::Escape);
        press(&mut world, Key::J);
        assert!(world.registry.shoot_bullets.is_empty());
    }

    #[test]
    fn test_hide_and_come_out() {
        let (mut world, _dir) = world_at(2);
        let pos = world.player_position().unwrap();
        spawn::create_cabinet(&mut world.registry, pos + Vec2::new(30.0, 0.0));

        press(&mut world, Key::H);
        assert!(world.hidden.is_some());
        assert!(world.player.is_none());
        assert!(world.registry.players.is_empty());

        // Everything but H and Escape is ignored while hidden
        press(&mut world, Key::D);
        assert!(!world.input.right);

        press(&mut world, Key::Escape);
        assert!(world.hidden.is_none());
        assert!(!world.paused);
        assert_eq!(world.player_position(), Some(pos));
        assert_eq!(world.registry.players.len(), 1);
    }

    #[test]
    fn test_hide_needs_nearby_cabinet() {
        let (mut world, _dir) = world_at(2);
        let pos = world.player_position().unwrap();
        spawn::create_cabinet(&mut world.registry, pos + Vec2::new(300.0, 0.0));
        press(&mut world, Key::H);
        assert!(world.hidden.is_none());
        assert!(world.player.is_some());
    }

    #[test]
    fn test_restart_key_resets_vitals() {
        let (mut world, _dir) = world_at(3);
        world.level.hp = 1;
        world.level.bullets = 5;
        release(&mut world, Key::R);
        assert_eq!((world.level.hp, world.level.bullets), (INITIAL_HP, 0));
        assert_eq!(world.level.current, 3);
    }

    #[test]
    fn test_debug_level_step() {
        let (mut world, _dir) = world_at(3);
        world.on_key(Key::Period, KeyAction::Release, Modifiers::SHIFT);
        assert_eq!(world.level.current, 4);
        world.on_key(Key::Comma, KeyAction::Release, Modifiers::SHIFT);
        world.on_key(Key::Comma, KeyAction::Release, Modifiers::default());
        assert_eq!(world.level.current, 3);
    }

    #[test]
    fn test_escape_toggles_pause_but_not_on_start_screen() {
        let (mut world, _dir) = world_at(0);
        press(&mut world, Key::Escape);
        assert!(!world.paused);

        world.goto_level(2);
        press(&mut world, Key::Escape);
        assert!(world.paused);
        press(&mut world, Key::Escape);
        assert!(!world.paused);
    }

    #[test]
    fn test_menu_navigation_keys() {
        let (mut world, _dir) = world_at(0);
        let first = world.menu.focused();
        release(&mut world, Key::Down);
        assert_ne!(world.menu.focused(), first);
        release(&mut world, Key::Up);
        assert_eq!(world.menu.focused(), first);
        release(&mut world, Key::Enter);
        assert_eq!(world.level.current, 1);
    }
}
