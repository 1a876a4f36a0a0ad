//! Escape from Celestria - simulation core
//!
//! Core modules:
//! - `sim`: Entity-component store, per-tick simulation, collisions, tutorial, levels
//! - `dialog`: Per-level speech data and timed speech playback
//! - `audio`: Fire-and-forget sound/music requests
//! - `persistence`: Save/load of the playthrough state
//! - `settings`: Player preferences and data locations

pub mod audio;
pub mod dialog;
pub mod persistence;
pub mod settings;
pub mod sim;

pub use settings::{Settings, TutorialClock};
pub use sim::World;

/// Game configuration constants
pub mod consts {
    use glam::{Vec2, Vec3};

    /// Fixed simulation timestep in milliseconds (60 Hz)
    pub const SIM_DT_MS: f32 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Window dimensions in pixels
    pub const WINDOW_WIDTH: f32 = 1200.0;
    pub const WINDOW_HEIGHT: f32 = 800.0;
    /// One map character covers this many pixels on both axes
    pub const TILE_SIZE: f32 = 10.0;

    /// Player movement
    pub const PLAYER_SPEED: f32 = 200.0;
    pub const PLAYER_JUMP: f32 = 1000.0;
    /// Downward acceleration (pixels/s²)
    pub const GRAVITY: f32 = 3000.0;
    /// Fired bullet speed (pixels/s)
    pub const BULLET_SPEED: f32 = 500.0;

    /// How close the player must be to use a door or a cabinet
    pub const INTERACT_DISTANCE: f32 = 50.0;
    /// Max distance between consecutive platform anchors joined by a walk edge
    pub const NAV_EDGE_DISTANCE: f32 = 10.0;

    /// Hit-points at the start of a level and after death
    pub const INITIAL_HP: i32 = 3;
    /// Hit-points the tutorial asks the player to reach by eating
    pub const TUTORIAL_HP_GOAL: i32 = 4;

    /// Timers (milliseconds unless noted)
    pub const DEATH_TIMER_MS: f32 = 3000.0;
    pub const DEATH_FADE_SECS: f32 = 1.0;
    pub const DAMAGE_COOLDOWN_MS: f32 = 1000.0;
    pub const INVINCIBLE_MS: f32 = 1000.0;
    pub const ZOMBIE_CORPSE_MS: f32 = 2000.0;
    pub const WALK_FRAME_MS: f32 = 100.0;

    /// Colors
    pub const PLAYER_COLOR: Vec3 = Vec3::new(1.0, 0.8, 0.8);
    pub const DEATH_COLOR: Vec3 = Vec3::new(1.0, 0.0, 0.0);
    pub const HURT_COLOR: Vec3 = Vec3::new(1.0, 0.35, 0.35);
    pub const TEXT_COLOR: Vec3 = Vec3::new(1.0, 1.0, 1.0);
    pub const FOCUS_COLOR: Vec3 = Vec3::new(1.0, 1.0, 0.0);

    /// Bounding boxes
    pub const PLAYER_SIZE: Vec2 = Vec2::new(60.0, 80.0);
    pub const ZOMBIE_SIZE: Vec2 = Vec2::new(60.0, 80.0);
    pub const PLATFORM_HEIGHT: f32 = 10.0;
    pub const PICKUP_SIZE: Vec2 = Vec2::new(30.0, 30.0);
    pub const DOOR_SIZE: Vec2 = Vec2::new(60.0, 100.0);
    pub const HAZARD_SIZE: Vec2 = Vec2::new(50.0, 50.0);
    pub const FIRED_BULLET_SIZE: Vec2 = Vec2::new(20.0, 20.0);

    /// HUD layout
    pub const HEART_HEIGHT: f32 = 30.0;
    pub const HEART_SPACING: f32 = 40.0;
    pub const SMALL_BULLET_HEIGHT: f32 = 20.0;
    pub const SMALL_BULLET_SPACING: f32 = 20.0;
    pub const HUD_LEFT: f32 = 30.0;

    /// Where tutorial text appears (extra lines stack upward by 50px)
    pub const TUTORIAL_TEXT_POS: Vec2 = Vec2::new(60.0, 200.0);
    pub const TUTORIAL_TEXT_SCALE: f32 = 0.5;

    /// Bezier patrol paths for the gold bonus and the fireball hazard
    pub const BEZIER_SPEED: f32 = 0.2;
    pub const GOLD_PATH: [Vec2; 4] = [
        Vec2::new(50.0, 150.0),
        Vec2::new(255.0, 1000.0),
        Vec2::new(765.0, 50.0),
        Vec2::new(970.0, 150.0),
    ];
    pub const FIREBALL_PATH: [Vec2; 4] = [
        Vec2::new(100.0, 150.0),
        Vec2::new(345.0, 1000.0),
        Vec2::new(640.0, 50.0),
        Vec2::new(800.0, 150.0),
    ];
}
