//! Procedural obstacle spawner
//!
//! Decides when to spawn (interval shrinking with elapsed time, floored so
//! runs stay survivable), how big (uniform radius scaled by the spawn
//! factor), and where (weighted vertical bands once the run is 10s old).
//! Shape and color are cosmetic and drawn independently.

use glam::Vec2;
use rand::Rng;

use super::difficulty::spawn_factor;
use super::state::{GameState, Obstacle, ObstacleFate, ShapeKind, VerticalBand};

/// Hard floor on the randomized spawn interval (seconds)
const MIN_SPAWN_INTERVAL: f64 = 0.45;
/// Soft floor on the pre-jitter interval (seconds)
const BASE_INTERVAL_FLOOR: f64 = 0.8;
/// Ground-only grace period at run start (seconds)
const GROUND_ONLY_SECS: f64 = 10.0;
/// Band weights: ground 50%, mid 30%, high 20%
const GROUND_PROB: f64 = 0.5;
const MID_PROB: f64 = 0.3;
/// Number of cosmetic palette entries
const PALETTE_SIZE: u8 = 7;

/// Advance spawn timing and emit at most one obstacle for this tick
pub(crate) fn maybe_spawn(state: &mut GameState, elapsed: f64) {
    if elapsed - state.last_spawn_time <= state.current_spawn_interval {
        return;
    }
    state.last_spawn_time = elapsed;
    spawn_obstacle(state, elapsed);

    let base = (state.tuning.base_spawn_interval as f64 - elapsed / 30.0).max(BASE_INTERVAL_FLOOR);
    let jitter: f64 = state.rng.random_range(-0.3..=0.3);
    state.current_spawn_interval = (base + jitter).max(MIN_SPAWN_INTERVAL);
}

fn spawn_obstacle(state: &mut GameState, elapsed: f64) {
    let factor = spawn_factor(elapsed) as f32;
    let speed = state.tuning.base_obstacle_speed * factor;

    // Minimum inter-spawn gap so consecutive obstacles stay clearable
    let min_gap_secs = (4.0 * state.tuning.player_radius / speed) as f64;
    if elapsed - state.last_obstacle_spawn_time < min_gap_secs {
        return;
    }
    state.last_obstacle_spawn_time = elapsed;

    let radius = state
        .rng
        .random_range(state.tuning.min_obstacle_radius..=state.tuning.max_obstacle_radius)
        * factor;

    let (y, band) = place_vertically(state, elapsed, radius);
    push_obstacle(state, radius, y, band, speed);
}

/// Pick a vertical band and a concrete Y within it. Degenerate ranges fall
/// back to ground placement.
fn place_vertically(state: &mut GameState, elapsed: f64, radius: f32) -> (f32, VerticalBand) {
    let height = state.tuning.playfield_height;
    let ground_min = state.tuning.ground_height + radius;
    let max_possible = (height * 0.5).min(height - radius);

    if elapsed < GROUND_ONLY_SECS {
        return (ground_min, VerticalBand::Ground);
    }

    let high_minimum = ground_min + 20.0;
    let mid_max = max_possible.min(height * 0.6);

    let roll: f64 = state.rng.random_range(0.0..1.0);
    if roll < GROUND_PROB {
        (ground_min, VerticalBand::Ground)
    } else if roll < GROUND_PROB + MID_PROB {
        let mut min_y = high_minimum;
        let max_y = mid_max;
        if min_y > max_y {
            min_y = ground_min;
        }
        if min_y > max_y {
            return (ground_min, VerticalBand::Ground);
        }
        (state.rng.random_range(min_y..=max_y), VerticalBand::Mid)
    } else {
        let low_y = mid_max + 20.0;
        let high_y = max_possible;
        if low_y > high_y {
            return (ground_min, VerticalBand::Ground);
        }
        (state.rng.random_range(low_y..=high_y), VerticalBand::High)
    }
}

fn push_obstacle(state: &mut GameState, radius: f32, y: f32, band: VerticalBand, speed: f32) {
    let shape = ShapeKind::ALL[state.rng.random_range(0..ShapeKind::ALL.len())];
    let color = state.rng.random_range(0..PALETTE_SIZE);
    let id = state.next_entity_id();

    state.obstacles.push(Obstacle {
        id,
        shape,
        color,
        radius,
        pos: Vec2::new(state.tuning.playfield_width + radius, y),
        vel: Vec2::new(-speed, 0.0),
        band,
        fate: ObstacleFate::Unresolved,
    });
    log::debug!(
        "spawned {shape:?} r={radius:.1} at y={y:.1} ({band:?}), speed {speed:.0}"
    );
}
