//! Collision and margin scoring
//!
//! Two independent checks per tick against the active hitbox: engine contact
//! (damage) and clean passes (margin bonus). Each obstacle resolves exactly
//! once; whichever check fires first finalizes its fate.

use glam::Vec2;

use super::state::{GameState, Obstacle, ObstacleFate, RunOutcome};
use super::tick::GameEvent;

/// Margin bonus bands: clearance below each threshold awards the paired
/// points, anything at or above the last threshold awards the maximum.
const MARGIN_BANDS: [(f32, u32); 4] = [(10.0, 1), (25.0, 2), (45.0, 3), (60.0, 4)];
const MAX_MARGIN_BONUS: u32 = 5;

/// Bonus points for a pass clearance
pub fn margin_bonus(margin: f32) -> u32 {
    for (threshold, bonus) in MARGIN_BANDS {
        if margin < threshold {
            return bonus;
        }
    }
    MAX_MARGIN_BONUS
}

/// Reports overlap between the active player hitbox and an obstacle.
///
/// Hosts with a physics engine can route their contact callbacks through
/// this seam; [`CircleContact`] is the standalone default, a circle test
/// against the obstacle's bounding radius. Tests inject scripted oracles.
pub trait ContactOracle {
    fn contact(&self, player_center: Vec2, player_hitbox_radius: f32, obstacle: &Obstacle) -> bool;
}

/// Default oracle: circle-vs-circle overlap
#[derive(Debug, Clone, Copy, Default)]
pub struct CircleContact;

impl ContactOracle for CircleContact {
    fn contact(&self, player_center: Vec2, player_hitbox_radius: f32, obstacle: &Obstacle) -> bool {
        let reach = player_hitbox_radius + obstacle.radius;
        player_center.distance_squared(obstacle.pos) < reach * reach
    }
}

/// Damage check: first unresolved contact while vincible costs one hit point
/// and opens the invincibility window. Returns true if the run just ended.
pub(crate) fn resolve_contacts(
    state: &mut GameState,
    oracle: &dyn ContactOracle,
    elapsed: f64,
    events: &mut Vec<GameEvent>,
) -> bool {
    if state.player.invincible {
        return false;
    }

    let center = state.player.pos;
    let hitbox = state.player.hitbox_radius(&state.tuning);

    let mut hit = false;
    for obs in &mut state.obstacles {
        if obs.resolved() {
            continue;
        }
        if oracle.contact(center, hitbox, obs) {
            obs.fate = ObstacleFate::Collided;
            hit = true;
            break;
        }
    }
    if !hit {
        return false;
    }

    state.player.hit_points = state.player.hit_points.saturating_sub(1);
    state.player.invincible = true;
    state.player.invincible_until = elapsed + state.tuning.invincibility_duration as f64;
    events.push(GameEvent::Damage { amount: 1 });
    log::debug!("hit at t={elapsed:.2}, hp now {}", state.player.hit_points);

    if state.player.hit_points == 0 {
        state.finish(RunOutcome::Defeated);
        events.push(GameEvent::RunEnded {
            final_score: state.score.total(),
        });
        return true;
    }
    false
}

/// Pass check: once an obstacle's trailing edge clears the player's leading
/// edge, award banded bonus points by center-to-center clearance.
pub(crate) fn resolve_passes(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let center = state.player.pos;
    let active_radius = state.player.radius(&state.tuning);

    for obs in &mut state.obstacles {
        if obs.resolved() {
            continue;
        }
        if obs.pos.x + obs.radius < center.x - active_radius {
            obs.fate = ObstacleFate::Scored;
            let margin = center.distance(obs.pos) - (active_radius + obs.radius);
            let bonus = margin_bonus(margin);
            state.score.bonus += bonus;
            events.push(GameEvent::Bonus {
                amount: bonus,
                position: obs.pos,
            });
        }
    }
}
