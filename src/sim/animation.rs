//! Time-based animation: color fades, straight-line moves, Bezier patrols
//!
//! All interpolation uses `t = clamp(elapsed / duration, 0, 1)`.

use glam::{Vec2, Vec3};

use super::ecs::Registry;

/// Component-wise linear interpolation, `t` clamped to [0, 1]
#[inline]
pub fn color_lerp(start: Vec3, end: Vec3, t: f32) -> Vec3 {
    let t = t.clamp(0.0, 1.0);
    start * (1.0 - t) + end * t
}

/// Same formula on positions
#[inline]
pub fn position_lerp(start: Vec2, end: Vec2, t: f32) -> Vec2 {
    let t = t.clamp(0.0, 1.0);
    start * (1.0 - t) + end * t
}

/// Interpolation parameter for an elapsed/duration pair
#[inline]
pub fn progress(elapsed: f32, duration: f32) -> f32 {
    if duration <= 0.0 {
        return 1.0;
    }
    (elapsed / duration).clamp(0.0, 1.0)
}

/// Cubic Bernstein evaluation of four control points
pub fn cubic_bezier(points: &[Vec2; 4], t: f32) -> Vec2 {
    let [p0, p1, p2, p3] = *points;
    let u = 1.0 - t;
    p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
}

/// Advance a ping-pong parameter by `step`, reversing at either bound
///
/// Returns the new `(t, forward)`. `t` is pinned to the bound it reached, so
/// it never leaves [0, 1].
pub fn ping_pong(t: f32, forward: bool, step: f32) -> (f32, bool) {
    if forward {
        let t = t + step;
        if t >= 1.0 { (1.0, false) } else { (t, true) }
    } else {
        let t = t - step;
        if t <= 0.0 { (0.0, true) } else { (t, false) }
    }
}

/// Advance every color transition. Finished ones leave the end color behind.
pub fn update_color_changes(registry: &mut Registry, dt_ms: f32) {
    let mut finished = Vec::new();
    for (entity, change) in registry.color_changes.iter_mut() {
        change.elapsed_secs += dt_ms / 1000.0;
        let t = progress(change.elapsed_secs, change.duration_secs);
        if t < 1.0 {
            registry
                .colors
                .insert(entity, color_lerp(change.start, change.end, t));
        } else {
            finished.push((entity, change.end));
        }
    }
    for (entity, end) in finished {
        registry.colors.insert(entity, end);
        registry.color_changes.remove(entity);
    }
}

/// Advance every straight-line move. Arrived entities sit at `end`.
pub fn update_linear_movements(registry: &mut Registry, dt_ms: f32) {
    for (entity, movement) in registry.linear_movements.iter_mut() {
        movement.elapsed_secs += dt_ms / 1000.0;
        let t = progress(movement.elapsed_secs, movement.duration_secs);
        match registry.motions.get_mut(entity) {
            Some(motion) => motion.position = position_lerp(movement.start, movement.end, t),
            None => log::error!("linear movement on entity {} without motion", entity.id()),
        }
    }
}

/// Advance every Bezier patrol and place its entity on the curve
pub fn update_bezier_paths(registry: &mut Registry, dt_ms: f32) {
    for (entity, path) in registry.bezier_paths.iter_mut() {
        let step = dt_ms / 1000.0 * path.speed;
        (path.t, path.forward) = ping_pong(path.t, path.forward, step);
        match registry.motions.get_mut(entity) {
            Some(motion) => motion.position = cubic_bezier(&path.points, path.t),
            None => log::error!("bezier path on entity {} without motion", entity.id()),
        }
    }
}
