//! Heads-up display icons, rebuilt from the level state

use glam::Vec2;

use super::ecs::Entity;
use super::spawn;
use super::state::World;
use crate::consts::*;

/// Replace hearts, small bullets and the key icon so they match the level
/// state exactly. Hearts are hidden on the menu and the credits, bullets
/// only on the credits.
pub fn refresh(world: &mut World) {
    let registry = &mut world.registry;
    let mut stale: Vec<Entity> = registry.hearts.entities().to_vec();
    stale.extend_from_slice(registry.small_bullets.entities());
    stale.extend_from_slice(registry.small_keys.entities());
    registry.remove_entities(&stale);

    let level = world.level;
    if level.is_playable() {
        for i in 0..level.hp.max(0) {
            let pos = Vec2::new(HUD_LEFT + i as f32 * HEART_SPACING, HEART_HEIGHT);
            spawn::create_heart(registry, pos);
        }
    }
    if level.current != level.max {
        for i in 0..level.bullets.max(0) {
            let pos = Vec2::new(
                HUD_LEFT + i as f32 * SMALL_BULLET_SPACING,
                20.0 + HEART_HEIGHT,
            );
            spawn::create_bullet_small(registry, pos);
        }
    }
    if level.has_key {
        let pos = Vec2::new(HUD_LEFT, SMALL_BULLET_HEIGHT + HEART_HEIGHT + 25.0);
        spawn::create_small_key(registry, pos);
    }
}
