//! Collision resolution
//!
//! Consumes the batch gathered by the physics step. Pairs can repeat and
//! arrive in either order. Effects that must happen once are made safe by
//! consuming the other entity on first contact, and damage is guarded by
//! the cooldown timers, which are attached before the next pair is read.

use super::components::{ColorChange, DeathTimer, DeductHpTimer, InvincibleTimer, RenderRequest, TextureId};
use super::ecs::Entity;
use super::hud;
use super::spawn;
use super::state::World;
use crate::audio::SoundEffect;
use crate::consts::*;

/// Whether the batch must stop because the level was rebuilt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    LevelChanged,
}

/// Apply every collision in the batch, then clear it
pub fn resolve_collisions(world: &mut World) {
    let batch = std::mem::take(&mut world.registry.collisions);
    for collision in &batch {
        let flow = if world.registry.players.has(collision.entity) {
            player_collision(world, collision.entity, collision.other)
        } else if world.registry.zombies.has(collision.entity) {
            zombie_collision(world, collision.entity, collision.other);
            Flow::Continue
        } else {
            Flow::Continue
        };
        if flow == Flow::LevelChanged {
            break;
        }
    }
    world.registry.collisions.clear();
    hud::refresh(world);
}

fn tutorial_allows(world: &World, allowed: bool) -> bool {
    !world.on_tutorial_level() || allowed
}

fn player_collision(world: &mut World, player: Entity, other: Entity) -> Flow {
    let registry = &world.registry;

    if registry.text_blocks.has(other) {
        show_text_block(world, other);
    } else if registry.deadlys.has(other) {
        let guarded = registry.deduct_hp_timers.has(player)
            || registry.invincible_timers.has(player)
            || registry.death_timers.has(player);
        if !guarded {
            let one_hit_kill = registry.fireballs.has(other);
            take_damage(world, player, one_hit_kill);
        }
    } else if registry.eatables.has(other) {
        pick_up(world, other);
    } else if registry.doors.has(other) {
        return use_door(world, player, other);
    } else if let Some(point) = world.registry.speech_points.get_mut(other) {
        if !point.is_done {
            point.is_done = true;
            let index = point.index;
            if world.on_tutorial_level() {
                world.tutorial.speech_point = Some(index);
            } else {
                log::debug!("Speech point {index} reached");
                world.dialog.create_speech_point(&mut world.registry, index);
            }
        }
    }
    Flow::Continue
}

fn show_text_block(world: &mut World, block: Entity) {
    if let Some(tb) = world.registry.text_blocks.get(block) {
        let text = tb.text.clone();
        spawn::create_text(
            &mut world.registry,
            glam::Vec2::new(300.0, 300.0),
            1.0,
            TEXT_COLOR,
            &text,
        );
    }
    world.registry.remove_all_components_of(block);
}

fn take_damage(world: &mut World, player: Entity, one_hit_kill: bool) {
    if one_hit_kill || world.level.hp <= 1 {
        world.level.hp = 0;
        start_death(world, player);
        return;
    }

    world.level.hp = (world.level.hp - 1).max(0);
    let registry = &mut world.registry;
    registry.deduct_hp_timers.insert(player, DeductHpTimer::default());
    let restore_color = registry.colors.get(player).copied().unwrap_or(PLAYER_COLOR);
    registry.invincible_timers.insert(
        player,
        InvincibleTimer {
            counter_ms: INVINCIBLE_MS,
            restore_color,
        },
    );
    registry.colors.insert(player, HURT_COLOR);
    log::debug!("Player hit, {} hp left", world.level.hp);
    hud::refresh(world);
}

/// Begin the death sequence unless it is already running: freeze the
/// player and fade it to red until the death timer restarts the level
pub fn start_death(world: &mut World, player: Entity) {
    let registry = &mut world.registry;
    if registry.death_timers.has(player) {
        return;
    }
    registry.death_timers.insert(player, DeathTimer::default());
    if let Some(motion) = registry.motions.get_mut(player) {
        motion.velocity = glam::Vec2::ZERO;
    }
    let color = registry.colors.get(player).copied().unwrap_or(PLAYER_COLOR);
    registry
        .color_changes
        .insert(player, ColorChange::new(color, DEATH_COLOR, DEATH_FADE_SECS));
    log::info!("Player died on level {}", world.level.current);
}

fn pick_up(world: &mut World, item: Entity) {
    let flags = world.tutorial.flags;
    let registry = &world.registry;

    if registry.foods.has(item) && tutorial_allows(world, flags.can_eat) {
        world.registry.remove_all_components_of(item);
        world.level.hp += 1;
        world.audio.play(SoundEffect::Eat);
    } else if registry.bullets.has(item) && tutorial_allows(world, flags.can_get_bullet) {
        world.registry.remove_all_components_of(item);
        world.level.bullets += 1;
    } else if registry.keys.has(item) && tutorial_allows(world, flags.can_get_key) {
        world.registry.remove_all_components_of(item);
        world.level.has_key = true;
    } else if registry.golds.has(item) {
        world.registry.remove_all_components_of(item);
        world.level.hp = 0;
        world.audio.play(SoundEffect::Bonus);
    } else {
        return;
    }
    hud::refresh(world);
}

fn use_door(world: &mut World, player: Entity, door: Entity) -> Flow {
    if !world.level.has_key {
        return Flow::Continue;
    }
    let registry = &world.registry;
    let near = match (registry.motions.get(player), registry.motions.get(door)) {
        (Some(p), Some(d)) => p.position.distance(d.position) <= INTERACT_DISTANCE,
        _ => false,
    };
    if !near {
        return Flow::Continue;
    }

    if let Some(state) = world.registry.doors.get_mut(door) {
        state.is_open = true;
    }
    world
        .registry
        .render_requests
        .insert(door, RenderRequest::sprite(TextureId::DoorOpen));
    world.audio.play(SoundEffect::DoorOpen);

    if world.on_tutorial_level() {
        world.level.hp = world.settings.initial_hp;
        world.tutorial.clear_texts(&mut world.registry);
    }
    log::info!("Door opened on level {}", world.level.current);
    world.advance_level();
    Flow::LevelChanged
}

fn zombie_collision(world: &mut World, zombie: Entity, other: Entity) {
    let registry = &mut world.registry;
    let is_dead = registry.zombies.get(zombie).is_some_and(|z| z.is_dead);

    if registry.shoot_bullets.has(other) {
        if is_dead {
            return;
        }
        registry
            .render_requests
            .insert(zombie, RenderRequest::sprite(TextureId::ZombieDie));
        registry.remove_all_components_of(other);
        registry.deadlys.remove(zombie);
        if let Some(z) = registry.zombies.get_mut(zombie) {
            z.is_dead = true;
        }
    } else if registry.platforms.has(other) {
        if let Some(motion) = registry.motions.get_mut(zombie) {
            motion.velocity.y = 0.0;
        }
    }
}
