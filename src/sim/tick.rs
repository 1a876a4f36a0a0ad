//! Per-frame simulation step
//!
//! Every category of work finishes for all entities before the next one
//! starts, in the order below. Hearts are rebuilt after hit-points change
//! and collisions are resolved last, after the physics step produced them.

use super::animation;
use super::collision::{resolve_collisions, start_death};
use super::ecs::Entity;
use super::hud;
use super::physics;
use super::state::World;
use super::components::{RenderRequest, TextureId};
use crate::consts::*;
use crate::dialog;

/// Advance the world by `dt_ms` milliseconds
pub fn tick(world: &mut World, dt_ms: f32) {
    count_frame(world, dt_ms);

    world.update_tutorial();
    if world.paused || world.show_start_screen {
        world.menu.refresh_colors(&mut world.registry);
        return;
    }
    world.menu.clear();
    world.sim_time_ms += f64::from(dt_ms);

    world.handle_movement_keys(dt_ms);
    let advance_speech = !world.on_tutorial_level();
    dialog::update_speech(&mut world.registry, dt_ms, advance_speech);
    remove_off_screen(world);

    animation::update_color_changes(&mut world.registry, dt_ms);
    animation::update_linear_movements(&mut world.registry, dt_ms);

    if update_timers(world, dt_ms) == Timers::Restarted {
        return;
    }
    update_zombie_corpses(world, dt_ms);
    animation::update_bezier_paths(&mut world.registry, dt_ms);

    hud::refresh(world);
    if world.level.hp <= 0 {
        if let Some(player) = world.player {
            start_death(world, player);
        }
    }

    physics::step(&mut world.registry, dt_ms);
    resolve_collisions(world);
}

fn count_frame(world: &mut World, dt_ms: f32) {
    if !world.settings.show_fps {
        return;
    }
    world.fps_timer_ms += dt_ms;
    world.fps_count += 1;
    if world.fps_timer_ms >= 1000.0 {
        log::info!("FPS: {}", world.fps_count);
        world.fps_timer_ms -= 1000.0;
        world.fps_count = 0;
    }
}

/// Anything but the player that left through the left edge
fn remove_off_screen(world: &mut World) {
    let registry = &mut world.registry;
    let gone: Vec<Entity> = registry
        .motions
        .iter()
        .filter(|(entity, motion)| {
            motion.position.x + motion.scale.x.abs() < 0.0 && !registry.players.has(*entity)
        })
        .map(|(entity, _)| entity)
        .collect();
    registry.remove_entities(&gone);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Timers {
    Running,
    Restarted,
}

/// Count down death, damage-cooldown and hurt timers. Only a running death
/// timer darkens the screen.
fn update_timers(world: &mut World, dt_ms: f32) -> Timers {
    let registry = &mut world.registry;
    let mut min_death_ms: Option<f32> = None;

    let mut died = false;
    for (_, timer) in registry.death_timers.iter_mut() {
        timer.counter_ms -= dt_ms;
        min_death_ms = Some(min_death_ms.map_or(timer.counter_ms, |m| m.min(timer.counter_ms)));
        died |= timer.counter_ms <= 0.0;
    }
    if died {
        registry.death_timers.clear();
        registry.screen.darken_screen_factor = 0.0;
        log::info!("Death timer expired, restarting level {}", world.level.current);
        world.level.reset_vitals(world.settings.initial_hp);
        world.restart_game();
        return Timers::Restarted;
    }

    let mut cooled = Vec::new();
    for (entity, timer) in registry.deduct_hp_timers.iter_mut() {
        timer.counter_ms -= dt_ms;
        if timer.counter_ms <= 0.0 {
            cooled.push(entity);
        }
    }
    for entity in cooled {
        registry.deduct_hp_timers.remove(entity);
    }

    let mut recovered = Vec::new();
    for (entity, timer) in registry.invincible_timers.iter_mut() {
        timer.counter_ms -= dt_ms;
        if timer.counter_ms <= 0.0 {
            recovered.push((entity, timer.restore_color));
        }
    }
    for (entity, color) in recovered {
        registry.invincible_timers.remove(entity);
        registry.colors.insert(entity, color);
    }

    registry.screen.darken_screen_factor =
        min_death_ms.map_or(0.0, |ms| 1.0 - ms / DEATH_TIMER_MS);
    Timers::Running
}

/// Dead zombies show their second death frame, then disappear
fn update_zombie_corpses(world: &mut World, dt_ms: f32) {
    let registry = &mut world.registry;
    let mut gone = Vec::new();
    for (entity, zombie) in registry.zombies.iter_mut() {
        if !zombie.is_dead {
            continue;
        }
        zombie.death_counter_ms -= dt_ms;
        if zombie.death_counter_ms < 1.0 {
            gone.push(entity);
        } else if zombie.death_counter_ms >= ZOMBIE_CORPSE_MS / 2.0 {
            registry
                .render_requests
                .insert(entity, RenderRequest::sprite(TextureId::ZombieDie1));
        }
    }
    registry.remove_entities(&gone);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::components::Collision;
    use crate::sim::spawn;
    use crate::sim::state::test_support::world_at;
    use glam::Vec2;

    fn run(world: &mut World, ms: f32) {
        let steps = (ms / SIM_DT_MS).ceil() as u32;
        for _ in 0..steps {
            tick(world, SIM_DT_MS);
        }
    }

    #[test]
    fn test_paused_world_does_not_advance() {
        let (mut world, _dir) = world_at(2);
        let before = world.player_position();
        world.toggle_pause();
        run(&mut world, 500.0);
        assert_eq!(world.sim_time_ms, 0.0);
        assert_eq!(world.player_position(), before);
        assert_eq!(world.menu.buttons().len(), 4);
    }

    #[test]
    fn test_player_falls_onto_floor() {
        let (mut world, _dir) = world_at(2);
        let start = world.player_position().unwrap();
        run(&mut world, 2000.0);
        let player = world.player.unwrap();
        let motion = world.registry.motions.get(player).unwrap();
        assert!(motion.position.y > start.y);
        assert_eq!(motion.velocity.y, 0.0);
    }

    #[test]
    fn test_lethal_hit_restarts_after_death_timer() {
        let (mut world, _dir) = world_at(2);
        let player = world.player.unwrap();
        world.level.hp = 1;
        world.level.bullets = 2;
        let spikes = spawn::create_spikeball(&mut world.registry, Vec2::new(-500.0, -500.0));
        world.registry.collisions.push(Collision {
            entity: player,
            other: spikes,
        });
        resolve_collisions(&mut world);
        assert_eq!(world.level.hp, 0);

        run(&mut world, 1500.0);
        assert_eq!(world.player, Some(player));
        assert!(world.registry.screen.darken_screen_factor > 0.4);

        run(&mut world, 1500.0 + SIM_DT_MS);
        assert_eq!(world.level.current, 2);
        assert_eq!(world.level.hp, INITIAL_HP);
        assert_eq!(world.level.bullets, 0);
        assert_ne!(world.player, Some(player));
        assert!(world.registry.death_timers.is_empty());
        assert_eq!(world.registry.hearts.len(), INITIAL_HP as usize);
    }

    #[test]
    fn test_zero_hp_starts_death() {
        let (mut world, _dir) = world_at(2);
        world.level.hp = 0;
        tick(&mut world, SIM_DT_MS);
        assert!(world.registry.death_timers.has(world.player.unwrap()));
    }

    #[test]
    fn test_hurt_color_restored() {
        let (mut world, _dir) = world_at(2);
        let player = world.player.unwrap();
        let spikes = spawn::create_spikeball(&mut world.registry, Vec2::new(-500.0, -500.0));
        world.registry.collisions.push(Collision {
            entity: player,
            other: spikes,
        });
        resolve_collisions(&mut world);
        assert_eq!(world.registry.colors.get(player), Some(&HURT_COLOR));

        run(&mut world, INVINCIBLE_MS + SIM_DT_MS);
        assert_eq!(world.registry.colors.get(player), Some(&PLAYER_COLOR));
        assert!(!world.registry.invincible_timers.has(player));
        assert!(!world.registry.deduct_hp_timers.has(player));
        assert_eq!(world.registry.screen.darken_screen_factor, 0.0);
    }

    #[test]
    fn test_non_lethal_hit_keeps_screen_bright() {
        let (mut world, _dir) = world_at(2);
        let player = world.player.unwrap();
        assert_eq!(world.level.hp, INITIAL_HP);
        let spikes = spawn::create_spikeball(&mut world.registry, Vec2::new(-500.0, -500.0));
        world.registry.collisions.push(Collision {
            entity: player,
            other: spikes,
        });
        resolve_collisions(&mut world);
        tick(&mut world, SIM_DT_MS);
        assert_eq!(world.level.hp, INITIAL_HP - 1);
        assert!(world.registry.invincible_timers.has(player));
        assert_eq!(world.registry.screen.darken_screen_factor, 0.0);
    }

    #[test]
    fn test_corpse_removed() {
        let (mut world, _dir) = world_at(2);
        let zombie = spawn::create_zombie(&mut world.registry, Vec2::new(600.0, 0.0));
        world.registry.zombies.get_mut(zombie).unwrap().is_dead = true;
        tick(&mut world, SIM_DT_MS);
        assert_eq!(
            world.registry.render_requests.get(zombie).unwrap().texture,
            Some(TextureId::ZombieDie1)
        );
        run(&mut world, ZOMBIE_CORPSE_MS);
        assert!(!world.registry.zombies.has(zombie));
        assert!(!world.registry.motions.has(zombie));
    }

    #[test]
    fn test_off_screen_entities_removed() {
        let (mut world, _dir) = world_at(2);
        let bullet = spawn::create_bullet_shoot(&mut world.registry, Vec2::new(5.0, 100.0), -1.0);
        run(&mut world, 200.0);
        assert!(!world.registry.motions.has(bullet));
        assert!(world.player.is_some_and(|p| world.registry.motions.has(p)));
    }

    #[test]
    fn test_collisions_never_persist() {
        let (mut world, _dir) = world_at(2);
        let pos = world.player_position().unwrap();
        spawn::create_food(&mut world.registry, pos);
        tick(&mut world, SIM_DT_MS);
        assert!(world.registry.collisions.is_empty());
        assert_eq!(world.level.hp, INITIAL_HP + 1);
    }

    #[test]
    fn test_same_inputs_same_world() {
        let (mut a, _da) = world_at(2);
        let (mut b, _db) = world_at(2);
        for world in [&mut a, &mut b] {
            world.on_key(
                crate::sim::input::Key::D,
                crate::sim::input::KeyAction::Press,
                Default::default(),
            );
            run(world, 1000.0);
        }
        assert_eq!(a.player_position(), b.player_position());
        assert_eq!(a.level, b.level);
    }
}
