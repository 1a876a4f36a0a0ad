//! Entity factories, one per archetype
//!
//! World objects get a `Collider` so the physics phase reports their
//! contacts. HUD icons, text and menus are visual only.

use glam::{Vec2, Vec3};

use super::components::*;
use super::ecs::{Entity, Registry};
use crate::consts::*;

fn spawn(registry: &mut Registry, position: Vec2, scale: Vec2, texture: TextureId) -> Entity {
    let entity = registry.create_entity();
    registry.motions.insert(entity, Motion::at(position, scale));
    registry
        .render_requests
        .insert(entity, RenderRequest::sprite(texture));
    entity
}

fn spawn_collider(
    registry: &mut Registry,
    position: Vec2,
    scale: Vec2,
    texture: TextureId,
) -> Entity {
    let entity = spawn(registry, position, scale, texture);
    registry.colliders.insert(entity, Collider);
    entity
}

/// The player, tinted with the default player color
pub fn create_player(registry: &mut Registry, position: Vec2) -> Entity {
    let entity = spawn_collider(registry, position, PLAYER_SIZE, TextureId::JoshGun);
    registry.players.insert(entity, Player::default());
    registry.gravities.insert(entity, Gravity);
    registry.colors.insert(entity, PLAYER_COLOR);
    entity
}

pub fn create_zombie(registry: &mut Registry, position: Vec2) -> Entity {
    let entity = spawn_collider(registry, position, ZOMBIE_SIZE, TextureId::Zombie);
    registry.zombies.insert(entity, Zombie::default());
    registry.deadlys.insert(entity, Deadly);
    registry.gravities.insert(entity, Gravity);
    entity
}

pub fn create_platform(registry: &mut Registry, position: Vec2) -> Entity {
    let scale = Vec2::new(TILE_SIZE, PLATFORM_HEIGHT);
    let entity = spawn_collider(registry, position, scale, TextureId::Platform);
    registry.platforms.insert(entity, Platform);
    entity
}

pub fn create_platform_vert(registry: &mut Registry, position: Vec2) -> Entity {
    let scale = Vec2::new(TILE_SIZE, PLATFORM_HEIGHT);
    let entity = spawn_collider(registry, position, scale, TextureId::PlatformVert);
    registry.platforms.insert(entity, Platform);
    entity
}

pub fn create_food(registry: &mut Registry, position: Vec2) -> Entity {
    let entity = spawn_collider(registry, position, PICKUP_SIZE, TextureId::Food);
    registry.eatables.insert(entity, Eatable);
    registry.foods.insert(entity, Food);
    entity
}

/// Ammunition pickup
pub fn create_bullet(registry: &mut Registry, position: Vec2) -> Entity {
    let entity = spawn_collider(registry, position, PICKUP_SIZE, TextureId::Bullet);
    registry.eatables.insert(entity, Eatable);
    registry.bullets.insert(entity, BulletPickup);
    entity
}

/// A fired bullet travelling in the direction of `direction`'s sign
pub fn create_bullet_shoot(registry: &mut Registry, position: Vec2, direction: f32) -> Entity {
    let sign = if direction < 0.0 { -1.0 } else { 1.0 };
    let scale = Vec2::new(FIRED_BULLET_SIZE.x * sign, FIRED_BULLET_SIZE.y);
    let entity = spawn_collider(registry, position, scale, TextureId::BulletShoot);
    registry.shoot_bullets.insert(entity, ShootBullet);
    if let Some(motion) = registry.motions.get_mut(entity) {
        motion.velocity.x = BULLET_SPEED * sign;
    }
    entity
}

pub fn create_door(registry: &mut Registry, position: Vec2) -> Entity {
    let entity = spawn_collider(registry, position, DOOR_SIZE, TextureId::Door);
    registry.doors.insert(entity, Door::default());
    entity
}

pub fn create_key(registry: &mut Registry, position: Vec2) -> Entity {
    let entity = spawn_collider(registry, position, PICKUP_SIZE, TextureId::Key);
    registry.eatables.insert(entity, Eatable);
    registry.keys.insert(entity, Key);
    entity
}

pub fn create_cabinet(registry: &mut Registry, position: Vec2) -> Entity {
    let entity = spawn(registry, position, Vec2::new(60.0, 100.0), TextureId::Cabinet);
    registry.cabinets.insert(entity, Cabinet);
    entity
}

/// Decorative prop
pub fn create_object(registry: &mut Registry, position: Vec2) -> Entity {
    spawn(registry, position, Vec2::new(40.0, 40.0), TextureId::Object)
}

pub fn create_npc(registry: &mut Registry, position: Vec2, id: u32) -> Entity {
    let entity = spawn(registry, position, PLAYER_SIZE, TextureId::Npc);
    registry.npcs.insert(entity, Npc { id });
    entity
}

/// Invisible dialog trigger
pub fn create_speech_point(registry: &mut Registry, position: Vec2, index: u32) -> Entity {
    let entity = registry.create_entity();
    registry
        .motions
        .insert(entity, Motion::at(position, Vec2::new(TILE_SIZE, WINDOW_HEIGHT)));
    registry.colliders.insert(entity, Collider);
    registry.speech_points.insert(
        entity,
        SpeechPoint {
            index,
            is_done: false,
        },
    );
    entity
}

/// Invisible trigger that shows `text` once
pub fn create_text_block(registry: &mut Registry, position: Vec2, text: &str) -> Entity {
    let entity = registry.create_entity();
    registry
        .motions
        .insert(entity, Motion::at(position, Vec2::new(TILE_SIZE, WINDOW_HEIGHT)));
    registry.colliders.insert(entity, Collider);
    registry.text_blocks.insert(
        entity,
        TextBlock {
            text: text.to_string(),
        },
    );
    entity
}

/// Lethal bonus patrolling the gold Bezier path
pub fn create_gold(registry: &mut Registry, position: Vec2) -> Entity {
    let entity = spawn_collider(registry, position, HAZARD_SIZE, TextureId::Gold);
    registry.eatables.insert(entity, Eatable);
    registry.golds.insert(entity, Gold);
    registry
        .bezier_paths
        .insert(entity, BezierPath::new(GOLD_PATH, BEZIER_SPEED));
    entity
}

/// One-hit-kill hazard patrolling the fireball Bezier path
pub fn create_fireball(registry: &mut Registry, position: Vec2) -> Entity {
    let entity = spawn_collider(registry, position, HAZARD_SIZE, TextureId::Fireball);
    registry.deadlys.insert(entity, Deadly);
    registry.fireballs.insert(entity, Fireball);
    registry
        .bezier_paths
        .insert(entity, BezierPath::new(FIREBALL_PATH, BEZIER_SPEED));
    entity
}

pub fn create_spikeball(registry: &mut Registry, position: Vec2) -> Entity {
    let entity = spawn_collider(registry, position, HAZARD_SIZE, TextureId::Spikeball);
    registry.deadlys.insert(entity, Deadly);
    entity
}

pub fn create_heart(registry: &mut Registry, position: Vec2) -> Entity {
    let scale = Vec2::splat(HEART_HEIGHT);
    let entity = spawn(registry, position, scale, TextureId::Heart);
    registry.hearts.insert(entity, Heart);
    entity
}

pub fn create_bullet_small(registry: &mut Registry, position: Vec2) -> Entity {
    let scale = Vec2::splat(SMALL_BULLET_HEIGHT);
    let entity = spawn(registry, position, scale, TextureId::BulletSmall);
    registry.small_bullets.insert(entity, SmallBullet);
    entity
}

pub fn create_small_key(registry: &mut Registry, position: Vec2) -> Entity {
    let entity = spawn(registry, position, Vec2::splat(25.0), TextureId::SmallKey);
    registry.small_keys.insert(entity, SmallKey);
    entity
}

/// Screen text. Carries a Motion so level wipes and scrolling reach it.
pub fn create_text(
    registry: &mut Registry,
    position: Vec2,
    scale: f32,
    color: Vec3,
    content: &str,
) -> Entity {
    let entity = registry.create_entity();
    registry
        .motions
        .insert(entity, Motion::at(position, Vec2::splat(scale)));
    registry.texts.insert(
        entity,
        Text {
            content: content.to_string(),
            scale,
            color,
        },
    );
    registry.render_requests.insert(entity, RenderRequest::text());
    entity
}

pub fn create_title(registry: &mut Registry, position: Vec2) -> Entity {
    spawn(registry, position, Vec2::new(600.0, 150.0), TextureId::Title)
}

/// Full-screen backdrop for a level
pub fn create_background(registry: &mut Registry, level: u32) -> Entity {
    let center = Vec2::new(WINDOW_WIDTH / 2.0, WINDOW_HEIGHT / 2.0);
    spawn(
        registry,
        center,
        Vec2::new(WINDOW_WIDTH, WINDOW_HEIGHT),
        TextureId::Background { level },
    )
}

/// Menu entry; focusable entries are text, `MenuFunc::All` is a backdrop
pub fn create_menu_element(
    registry: &mut Registry,
    position: Vec2,
    func: MenuFunc,
    label: &str,
) -> Entity {
    let entity = if func == MenuFunc::All {
        let entity = spawn(registry, position, Vec2::new(500.0, 400.0), TextureId::MenuBackground);
        registry.render_requests.insert(
            entity,
            RenderRequest {
                texture: Some(TextureId::MenuBackground),
                effect: EffectId::Colored,
                geometry: GeometryId::Sprite,
            },
        );
        entity
    } else {
        create_text(registry, position, 0.8, TEXT_COLOR, label)
    };
    registry.menus.insert(entity, MenuElement { func });
    entity
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_archetype() {
        let mut registry = Registry::new();
        let p = create_player(&mut registry, Vec2::new(10.0, 20.0));
        assert!(registry.players.has(p));
        assert!(registry.colliders.has(p));
        assert_eq!(registry.colors.get(p), Some(&PLAYER_COLOR));
        assert_eq!(registry.motions.get(p).map(|m| m.position), Some(Vec2::new(10.0, 20.0)));
    }

    #[test]
    fn test_fired_bullet_direction() {
        let mut registry = Registry::new();
        let left = create_bullet_shoot(&mut registry, Vec2::ZERO, -1.0);
        let right = create_bullet_shoot(&mut registry, Vec2::ZERO, 1.0);
        let left_motion = registry.motions.get(left).copied().unwrap();
        let right_motion = registry.motions.get(right).copied().unwrap();
        assert_eq!(left_motion.velocity.x, -BULLET_SPEED);
        assert!(left_motion.scale.x < 0.0);
        assert_eq!(right_motion.velocity.x, BULLET_SPEED);
        assert!(!registry.eatables.has(left));
    }

    #[test]
    fn test_hazards_are_deadly() {
        let mut registry = Registry::new();
        let fireball = create_fireball(&mut registry, Vec2::ZERO);
        let zombie = create_zombie(&mut registry, Vec2::ZERO);
        let gold = create_gold(&mut registry, Vec2::ZERO);
        assert!(registry.deadlys.has(fireball));
        assert!(registry.deadlys.has(zombie));
        assert!(!registry.deadlys.has(gold));
        assert!(registry.bezier_paths.has(gold));
        assert!(registry.bezier_paths.has(fireball));
    }

    #[test]
    fn test_menu_element_kinds() {
        let mut registry = Registry::new();
        let backdrop = create_menu_element(&mut registry, Vec2::ZERO, MenuFunc::All, "");
        let button = create_menu_element(&mut registry, Vec2::ZERO, MenuFunc::Load, "Load");
        assert!(!registry.texts.has(backdrop));
        assert_eq!(registry.texts.get(button).map(|t| t.content.as_str()), Some("Load"));
        assert_eq!(registry.menus.len(), 2);
    }
}
