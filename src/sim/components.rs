//! Component records
//!
//! Plain data attached to entities through the registry tables. Marker types
//! carry no data; their presence classifies the entity.

use std::collections::VecDeque;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::ecs::Entity;
use crate::consts::*;

/// Render tint (RGB, 0-1)
pub type Color = Vec3;

/// Position, velocity and scale. The sign of `scale.x` is the facing direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    pub position: Vec2,
    pub angle: f32,
    pub velocity: Vec2,
    pub scale: Vec2,
}

impl Motion {
    pub fn at(position: Vec2, scale: Vec2) -> Self {
        Self {
            position,
            angle: 0.0,
            velocity: Vec2::ZERO,
            scale,
        }
    }

    /// Axis-aligned bounding box size
    pub fn bounding_box(&self) -> Vec2 {
        self.scale.abs()
    }
}

/// The controllable character
#[derive(Debug, Clone, Copy, Default)]
pub struct Player {
    /// Pressed into a wall; facing does not flip
    pub against_wall: bool,
}

/// Takes part in collision detection
#[derive(Debug, Clone, Copy, Default)]
pub struct Collider;

/// Falls under gravity
#[derive(Debug, Clone, Copy, Default)]
pub struct Gravity;

/// One-shot color transition; installs `end` as a plain color when done
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorChange {
    pub start: Color,
    pub end: Color,
    pub duration_secs: f32,
    pub elapsed_secs: f32,
}

impl ColorChange {
    pub fn new(start: Color, end: Color, duration_secs: f32) -> Self {
        Self {
            start,
            end,
            duration_secs,
            elapsed_secs: 0.0,
        }
    }
}

/// One-shot straight-line move; stays attached after arriving
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearMovement {
    pub start: Vec2,
    pub end: Vec2,
    pub duration_secs: f32,
    pub elapsed_secs: f32,
}

impl LinearMovement {
    pub fn new(start: Vec2, end: Vec2, duration_secs: f32) -> Self {
        Self {
            start,
            end,
            duration_secs,
            elapsed_secs: 0.0,
        }
    }
}

/// Back-and-forth patrol along a cubic Bezier curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BezierPath {
    pub points: [Vec2; 4],
    /// Curve parameter, always in [0, 1]
    pub t: f32,
    pub forward: bool,
    /// Parameter units per second
    pub speed: f32,
}

impl BezierPath {
    pub fn new(points: [Vec2; 4], speed: f32) -> Self {
        Self {
            points,
            t: 0.0,
            forward: true,
            speed,
        }
    }
}

/// Player is dying; the level restarts when this runs out
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeathTimer {
    pub counter_ms: f32,
}

impl Default for DeathTimer {
    fn default() -> Self {
        Self {
            counter_ms: DEATH_TIMER_MS,
        }
    }
}

/// Cooldown after taking damage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeductHpTimer {
    pub counter_ms: f32,
}

impl Default for DeductHpTimer {
    fn default() -> Self {
        Self {
            counter_ms: DAMAGE_COOLDOWN_MS,
        }
    }
}

/// Hurt flash; restores `restore_color` when it runs out
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvincibleTimer {
    pub counter_ms: f32,
    pub restore_color: Color,
}

/// One line of a playing conversation
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechLine {
    /// Dialog speaker id: 0 for the player, otherwise an NPC id. Resolved
    /// to an entity when drawn, so a recreated player still gets the line.
    pub speaker: u32,
    pub text: String,
    pub duration_ms: f32,
}

/// Queue of timed speech lines; the head line is the one on screen
#[derive(Debug, Clone, Default)]
pub struct Speech {
    pub lines: VecDeque<SpeechLine>,
    /// Time left on the head line
    pub counter_ms: f32,
}

/// Dialog trigger placed in the map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeechPoint {
    pub index: u32,
    pub is_done: bool,
}

/// Walking enemy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zombie {
    pub is_dead: bool,
    /// Corpse countdown, only ticks once dead
    pub death_counter_ms: f32,
}

impl Default for Zombie {
    fn default() -> Self {
        Self {
            is_dead: false,
            death_counter_ms: ZOMBIE_CORPSE_MS,
        }
    }
}

/// Hurts the player on contact
#[derive(Debug, Clone, Copy, Default)]
pub struct Deadly;

/// Can be picked up by the player
#[derive(Debug, Clone, Copy, Default)]
pub struct Eatable;

#[derive(Debug, Clone, Copy, Default)]
pub struct Food;

/// Ammunition lying in the level
#[derive(Debug, Clone, Copy, Default)]
pub struct BulletPickup;

/// Bullet fired by the player
#[derive(Debug, Clone, Copy, Default)]
pub struct ShootBullet;

#[derive(Debug, Clone, Copy, Default)]
pub struct Key;

/// Lethal bonus: collecting it ends the run
#[derive(Debug, Clone, Copy, Default)]
pub struct Gold;

/// One-hit-kill hazard
#[derive(Debug, Clone, Copy, Default)]
pub struct Fireball;

#[derive(Debug, Clone, Copy, Default)]
pub struct Door {
    pub is_open: bool,
}

/// Hiding spot
#[derive(Debug, Clone, Copy, Default)]
pub struct Cabinet;

#[derive(Debug, Clone, Copy, Default)]
pub struct Platform;

/// Non-player speaker
#[derive(Debug, Clone, Copy, Default)]
pub struct Npc {
    pub id: u32,
}

/// Shows `text` once when touched
#[derive(Debug, Clone, Default)]
pub struct TextBlock {
    pub text: String,
}

/// On-screen text
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub content: String,
    pub scale: f32,
    pub color: Color,
}

/// HUD icons
#[derive(Debug, Clone, Copy, Default)]
pub struct Heart;

#[derive(Debug, Clone, Copy, Default)]
pub struct SmallBullet;

#[derive(Debug, Clone, Copy, Default)]
pub struct SmallKey;

/// What a menu entry does when activated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuFunc {
    /// Decoration, never focusable
    All,
    NewGame,
    Resume,
    Save,
    Load,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuElement {
    pub func: MenuFunc,
}

/// A detected overlap: `entity` touched `other`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collision {
    pub entity: Entity,
    pub other: Entity,
}

/// Global screen effects
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScreenState {
    /// 0 = normal, 1 = fully dark
    pub darken_screen_factor: f32,
}

/// Texture handles understood by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureId {
    Josh,
    JoshGun,
    JoshGun1,
    Zombie,
    ZombieDie,
    ZombieDie1,
    Platform,
    PlatformVert,
    Food,
    Bullet,
    BulletShoot,
    BulletSmall,
    Door,
    DoorOpen,
    Key,
    SmallKey,
    Cabinet,
    Object,
    Npc,
    Gold,
    Fireball,
    Spikeball,
    Heart,
    Title,
    MenuBackground,
    Background { level: u32 },
}

/// Shader programs understood by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectId {
    Textured,
    Text,
    Colored,
}

/// Geometry buffers understood by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryId {
    Sprite,
    Glyphs,
}

/// What to draw for an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderRequest {
    pub texture: Option<TextureId>,
    pub effect: EffectId,
    pub geometry: GeometryId,
}

impl RenderRequest {
    pub fn sprite(texture: TextureId) -> Self {
        Self {
            texture: Some(texture),
            effect: EffectId::Textured,
            geometry: GeometryId::Sprite,
        }
    }

    pub fn text() -> Self {
        Self {
            texture: None,
            effect: EffectId::Text,
            geometry: GeometryId::Glyphs,
        }
    }
}
