//! Simulation module
//!
//! All gameplay logic lives here. The frontend only feeds key events into
//! [`World::on_key`], calls [`tick`] with the elapsed time and reads the
//! component tables back out for drawing:
//! - One explicit [`World`] context, no globals
//! - Sparse component tables, `Option` accessors only
//! - Systems run in a fixed order every tick
//! - No rendering or platform dependencies

pub mod animation;
pub mod collision;
pub mod components;
pub mod ecs;
pub mod hud;
pub mod input;
pub mod level;
pub mod map;
pub mod menu;
pub mod nav;
pub mod physics;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod tutorial;

pub use collision::resolve_collisions;
pub use ecs::{ComponentTable, Entity, Registry};
pub use input::{Key, KeyAction, Modifiers};
pub use map::{DataDir, DataError, LevelData, MemoryLevels};
pub use state::{LevelState, World};
pub use tick::tick;
pub use tutorial::{Tutorial, TutorialFlags};
