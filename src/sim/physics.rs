//! Movement integration and collision detection
//!
//! Boxes are axis-aligned, centred on `Motion::position`, sized by
//! `|Motion::scale|`.

use glam::Vec2;

use super::components::{Collision, Motion};
use super::ecs::{Entity, Registry};
use crate::consts::*;

/// Whether two centred boxes overlap
pub fn overlaps(a: &Motion, b: &Motion) -> bool {
    let half = (a.bounding_box() + b.bounding_box()) / 2.0;
    let d = (a.position - b.position).abs();
    d.x < half.x && d.y < half.y
}

fn top(m: &Motion) -> f32 {
    m.position.y - m.bounding_box().y / 2.0
}

fn bottom(m: &Motion) -> f32 {
    m.position.y + m.bounding_box().y / 2.0
}

fn horizontal_overlap(a: &Motion, b: &Motion) -> bool {
    (a.position.x - b.position.x).abs() < (a.bounding_box().x + b.bounding_box().x) / 2.0
}

/// Advance every moving entity by one step and refill the collision batch
pub fn step(registry: &mut Registry, dt_ms: f32) {
    let dt = dt_ms / 1000.0;

    let platforms: Vec<Motion> = registry
        .platforms
        .entities()
        .iter()
        .filter_map(|&p| registry.motions.get(p).copied())
        .collect();

    for (entity, motion) in registry.motions.iter_mut() {
        if motion.velocity == Vec2::ZERO && !registry.gravities.has(entity) {
            continue;
        }
        if registry.gravities.has(entity) {
            motion.velocity.y += GRAVITY * dt;
        }
        let before = *motion;
        motion.position += motion.velocity * dt;

        if !registry.gravities.has(entity) {
            continue;
        }
        let mut against_wall = false;
        for platform in &platforms {
            if !horizontal_overlap(motion, platform) {
                continue;
            }
            let surface = top(platform);
            let was_above = bottom(&before) <= surface;
            if was_above && motion.velocity.y >= 0.0 && bottom(motion) >= surface {
                motion.position.y = surface - motion.bounding_box().y / 2.0;
                motion.velocity.y = 0.0;
            } else if overlaps(motion, platform) && top(platform) < bottom(motion) - 1.0 {
                // Side hit: undo the horizontal move
                motion.position.x = before.position.x;
                against_wall = true;
            }
        }
        if let Some(player) = registry.players.get_mut(entity) {
            player.against_wall = against_wall;
        }
    }

    detect_collisions(registry);
}

/// Record every overlapping pair of colliders, in both orders. Platforms
/// never move, so platform-platform pairs are skipped.
pub fn detect_collisions(registry: &mut Registry) {
    let colliders: Vec<(Entity, Motion)> = registry
        .colliders
        .entities()
        .iter()
        .filter_map(|&e| registry.motions.get(e).map(|m| (e, *m)))
        .collect();

    for (i, (a, ma)) in colliders.iter().enumerate() {
        for (b, mb) in &colliders[i + 1..] {
            if registry.platforms.has(*a) && registry.platforms.has(*b) {
                continue;
            }
            if overlaps(ma, mb) {
                registry.collisions.push(Collision {
                    entity: *a,
                    other: *b,
                });
                registry.collisions.push(Collision {
                    entity: *b,
                    other: *a,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spawn;

    #[test]
    fn test_overlap() {
        let a = Motion::at(Vec2::ZERO, Vec2::new(10.0, 10.0));
        let b = Motion::at(Vec2::new(9.0, 0.0), Vec2::new(10.0, 10.0));
        let c = Motion::at(Vec2::new(10.0, 0.0), Vec2::new(-10.0, 10.0));
        assert!(overlaps(&a, &b));
        assert!(!overlaps(&a, &c));
    }

    #[test]
    fn test_falls_and_lands_on_platform() {
        let mut registry = Registry::new();
        let player = spawn::create_player(&mut registry, Vec2::new(50.0, 0.0));
        for i in 0..10 {
            spawn::create_platform(&mut registry, Vec2::new(i as f32 * TILE_SIZE, 50.0));
        }
        for _ in 0..60 {
            step(&mut registry, SIM_DT_MS);
        }
        let motion = registry.motions.get(player).unwrap();
        assert_eq!(motion.velocity.y, 0.0);
        assert_eq!(bottom(motion), 45.0);
    }

    #[test]
    fn test_walks_into_wall() {
        let mut registry = Registry::new();
        let player = spawn::create_player(&mut registry, Vec2::new(50.0, 0.0));
        for i in 0..20 {
            spawn::create_platform(&mut registry, Vec2::new(i as f32 * TILE_SIZE, 45.0));
        }
        // A column of wall tiles to the right
        for j in 0..8 {
            spawn::create_platform_vert(&mut registry, Vec2::new(90.0, 30.0 - j as f32 * 10.0));
        }
        registry.motions.get_mut(player).unwrap().velocity.x = PLAYER_SPEED;
        for _ in 0..30 {
            step(&mut registry, SIM_DT_MS);
        }
        assert!(registry.players.get(player).unwrap().against_wall);
        assert!(registry.motions.get(player).unwrap().position.x < 90.0 - 30.0);
    }

    #[test]
    fn test_collisions_reported_both_ways() {
        let mut registry = Registry::new();
        let player = spawn::create_player(&mut registry, Vec2::ZERO);
        let food = spawn::create_food(&mut registry, Vec2::new(10.0, 0.0));
        spawn::create_food(&mut registry, Vec2::new(500.0, 0.0));
        spawn::create_platform(&mut registry, Vec2::new(500.0, 500.0));
        spawn::create_platform(&mut registry, Vec2::new(505.0, 500.0));

        detect_collisions(&mut registry);
        assert_eq!(registry.collisions.len(), 2);
        assert!(registry.collisions.contains(&Collision {
            entity: player,
            other: food
        }));
        assert!(registry.collisions.contains(&Collision {
            entity: food,
            other: player
        }));
    }

    #[test]
    fn test_bullets_fly() {
        let mut registry = Registry::new();
        let bullet = spawn::create_bullet_shoot(&mut registry, Vec2::ZERO, -1.0);
        step(&mut registry, 1000.0);
        assert_eq!(registry.motions.get(bullet).unwrap().position.x, -BULLET_SPEED);
    }
}
