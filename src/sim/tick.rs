//! Per-frame simulation tick
//!
//! The hosting loop calls [`tick`] once per rendered frame with the frame's
//! raw timestamp and touch counts. Everything else - difficulty, spawning,
//! physics, scoring, replay capture - happens here in a fixed order.

use glam::Vec2;

use super::difficulty::difficulty_factor;
use super::scoring::{ContactOracle, resolve_contacts, resolve_passes};
use super::spawn::maybe_spawn;
use super::state::{GamePhase, GameState, RunOutcome, Stance};
use crate::consts::MAX_FRAME_DT;
use crate::tuning::GameMode;

/// Input snapshot for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Raw frame timestamp from the host's monotonic clock (seconds)
    pub raw_time: f64,
    /// Touches that began since the previous tick
    pub touches_began: u32,
    /// Touches currently on the screen
    pub active_touches: u32,
}

/// Signals emitted during a tick for the presentation collaborator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Player took damage
    Damage { amount: u8 },
    /// A clean pass awarded margin points; position locates the popup label
    Bonus { amount: u32, position: Vec2 },
    /// The run reached a terminal state this tick
    RunEnded { final_score: u32 },
}

/// Snapshot returned from each tick
#[derive(Debug, Clone, Default)]
pub struct TickResult {
    pub score: u32,
    pub hit_points: u8,
    pub elapsed: f64,
    pub events: Vec<GameEvent>,
}

/// Advance the run by one frame
pub fn tick(state: &mut GameState, input: &TickInput, oracle: &dyn ContactOracle) -> TickResult {
    // Paused and finished runs skip simulation entirely
    if state.phase != GamePhase::Running {
        return TickResult {
            score: state.score.total(),
            hit_points: state.player.hit_points,
            elapsed: state.clock.elapsed(),
            events: Vec::new(),
        };
    }

    let (elapsed, dt) = state.clock.advance(input.raw_time);
    let dt = dt.min(MAX_FRAME_DT);
    let mut events = Vec::new();

    state.difficulty_factor = difficulty_factor(elapsed);

    apply_touch_input(state, input, elapsed);
    expire_invincibility(state, elapsed);
    apply_second_jump_hold(state, input, elapsed, dt);
    integrate_player(state, dt);
    snap_to_ground(state);

    maybe_spawn(state, elapsed);
    advance_obstacles(state, dt);

    // Base score: survival seconds in classic mode, nothing in level mode
    let prev_base = state.score.base;
    state.score.base = match state.mode {
        GameMode::Classic => elapsed.max(0.0) as u32,
        GameMode::Level { .. } => 0,
    };
    if state.score.base > prev_base && state.score.base % 5 == 0 {
        log::debug!(
            "t={}s difficulty={:.2} score={}",
            state.score.base,
            state.difficulty_factor,
            state.score.total()
        );
    }

    state.replay.push(elapsed, state.player.pos, state.score.total());

    let ended = resolve_contacts(state, oracle, elapsed, &mut events);
    if !ended {
        resolve_passes(state, &mut events);
        check_level_completion(state, &mut events);
    }

    TickResult {
        score: state.score.total(),
        hit_points: state.player.hit_points,
        elapsed,
        events,
    }
}

/// Translate touch counts into stance and jump transitions.
///
/// Two or more fingers duck (ground-proximity permitting); lifting back to
/// fewer than two stands up. A single fresh touch while standing jumps.
fn apply_touch_input(state: &mut GameState, input: &TickInput, elapsed: f64) {
    if input.active_touches >= 2 {
        enter_duck(state);
    } else {
        exit_duck(state);
    }

    if input.active_touches == 1 && input.touches_began == 1 && state.player.stance == Stance::Standing
    {
        do_jump(state, elapsed);
    }
}

fn do_jump(state: &mut GameState, elapsed: f64) {
    let player = &mut state.player;
    if player.can_first_jump {
        player.vertical_velocity = state.tuning.first_jump_velocity;
        player.can_first_jump = false;
        player.can_second_jump = true;
    } else if player.can_second_jump {
        player.vertical_velocity = state.tuning.second_jump_velocity;
        player.can_second_jump = false;
        player.hold_active = true;
        player.hold_deadline = elapsed + state.tuning.hold_duration as f64;
    }
}

/// Ducking swaps in the smaller actor at the same horizontal position. It is
/// refused while airborne beyond the ground tolerance.
fn enter_duck(state: &mut GameState) {
    if state.player.stance == Stance::Ducking {
        return;
    }
    let stand_rest = state.tuning.ground_height + state.tuning.player_radius;
    if (state.player.pos.y - stand_rest).abs() > state.tuning.duck_tolerance {
        return;
    }

    state.player.stance = Stance::Ducking;
    state.player.pos.y = state.tuning.duck_ground_y();
    state.player.vertical_velocity = 0.0;
    state.player.hold_active = false;
    state.player.restore_jumps();
}

fn exit_duck(state: &mut GameState) {
    if state.player.stance != Stance::Ducking {
        return;
    }
    state.player.stance = Stance::Standing;
    state.player.pos.y = state.tuning.stand_ground_y();
    state.player.vertical_velocity = 0.0;
    state.player.restore_jumps();
}

fn expire_invincibility(state: &mut GameState, elapsed: f64) {
    if state.player.invincible && elapsed >= state.player.invincible_until {
        state.player.invincible = false;
    }
}

/// While the hold window is open, continued contact keeps adding lift. The
/// window closes when all touches lift or the deadline passes.
fn apply_second_jump_hold(state: &mut GameState, input: &TickInput, elapsed: f64, dt: f32) {
    if !state.player.hold_active {
        return;
    }
    if input.active_touches == 0 || elapsed >= state.player.hold_deadline {
        state.player.hold_active = false;
        return;
    }
    state.player.vertical_velocity += state.tuning.hold_acceleration * dt;
}

fn integrate_player(state: &mut GameState, dt: f32) {
    let player = &mut state.player;
    player.vertical_velocity -= state.tuning.gravity * dt;
    player.pos.y += player.vertical_velocity * dt;
    // Pinned horizontally in the camera frame; level mode tracks course
    // distance separately for the progress marker
    player.pos.x = state.tuning.player_x();
    state.distance += player.horizontal_velocity * dt;
}

/// Post-physics floor clamp: snapping restores both jump charges
fn snap_to_ground(state: &mut GameState) {
    let ground_y = state.player.ground_y(&state.tuning);
    if state.player.pos.y < ground_y {
        state.player.pos.y = ground_y;
        state.player.vertical_velocity = 0.0;
        state.player.restore_jumps();
    }
}

fn advance_obstacles(state: &mut GameState, dt: f32) {
    for obs in &mut state.obstacles {
        obs.pos += obs.vel * dt;
    }
    let width = state.tuning.playfield_width;
    state.obstacles.retain(|o| !o.out_of_bounds(width));
}

fn check_level_completion(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if let GameMode::Level { length } = state.mode
        && state.distance >= length
    {
        state.finish(RunOutcome::Completed);
        events.push(GameEvent::RunEnded {
            final_score: state.score.total(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::scoring::CircleContact;
    use crate::sim::state::{Obstacle, ObstacleFate, ShapeKind, VerticalBand};

    /// Oracle that never reports contact; lets motion tests ignore obstacles
    struct NoContact;
    impl ContactOracle for NoContact {
        fn contact(&self, _: Vec2, _: f32, _: &Obstacle) -> bool {
            false
        }
    }

    fn input(raw_time: f64, began: u32, active: u32) -> TickInput {
        TickInput {
            raw_time,
            touches_began: began,
            active_touches: active,
        }
    }

    fn planted_obstacle(state: &GameState, id: u32, pos: Vec2, radius: f32) -> Obstacle {
        let _ = state;
        Obstacle {
            id,
            shape: ShapeKind::Triangle,
            color: 0,
            radius,
            pos,
            vel: Vec2::ZERO,
            band: VerticalBand::Ground,
            fate: ObstacleFate::Unresolved,
        }
    }

    #[test]
    fn first_tick_is_time_zero() {
        let mut state = GameState::new(1, GameMode::Classic);
        let result = tick(&mut state, &input(100.0, 0, 0), &NoContact);
        assert_eq!(result.elapsed, 0.0);
        assert_eq!(result.score, 0);
        assert_eq!(result.hit_points, 3);
    }

    #[test]
    fn classic_base_score_is_floor_of_elapsed() {
        let mut state = GameState::new(1, GameMode::Classic);
        tick(&mut state, &input(0.0, 0, 0), &NoContact);
        let result = tick(&mut state, &input(7.3, 0, 0), &NoContact);
        assert_eq!(result.score, 7);
        assert_eq!(state.score.base, 7);
    }

    #[test]
    fn level_base_score_stays_zero() {
        let mut state = GameState::new(1, GameMode::Level { length: 1.0e9 });
        tick(&mut state, &input(0.0, 0, 0), &NoContact);
        for i in 1..200 {
            let result = tick(&mut state, &input(i as f64 * 0.5, 0, 0), &NoContact);
            assert_eq!(state.score.base, 0);
            assert_eq!(result.score, state.score.bonus);
        }
    }

    #[test]
    fn tap_consumes_first_charge_and_grants_second() {
        let mut state = GameState::new(1, GameMode::Classic);
        tick(&mut state, &input(0.0, 0, 0), &NoContact);
        tick(&mut state, &input(5.0, 1, 1), &NoContact);

        assert!(!state.player.can_first_jump);
        assert!(state.player.can_second_jump);
        // One frame of gravity has already pulled on the impulse
        let expected = 550.0 - state.tuning.gravity * crate::consts::MAX_FRAME_DT.min(5.0);
        assert!((state.player.vertical_velocity - expected).abs() < 1e-3);
        assert!(state.player.pos.y > state.tuning.stand_ground_y());
    }

    #[test]
    fn second_tap_starts_hold_window() {
        let mut state = GameState::new(1, GameMode::Classic);
        tick(&mut state, &input(0.0, 0, 0), &NoContact);
        tick(&mut state, &input(5.0, 1, 1), &NoContact);
        tick(&mut state, &input(5.1, 1, 2), &NoContact);

        // Two simultaneous touches duck instead of jumping; use a fresh
        // single touch for the second jump
        assert!(state.player.can_second_jump);
        tick(&mut state, &input(5.2, 1, 1), &NoContact);
        assert!(!state.player.can_second_jump);
        assert!(state.player.hold_active);
        assert!((state.player.hold_deadline - 6.0).abs() < 1e-9);
    }

    #[test]
    fn hold_adds_lift_until_release() {
        let mut state = GameState::new(1, GameMode::Classic);
        tick(&mut state, &input(0.0, 0, 0), &NoContact);
        tick(&mut state, &input(1.0, 1, 1), &NoContact);
        tick(&mut state, &input(1.1, 1, 1), &NoContact);
        assert!(state.player.hold_active);

        let dt = 1.0 / 60.0;
        let before = state.player.vertical_velocity;
        tick(&mut state, &input(1.1 + dt, 0, 1), &NoContact);
        let gained = state.player.vertical_velocity - before;
        let expected = (state.tuning.hold_acceleration - state.tuning.gravity) * dt as f32;
        assert!((gained - expected).abs() < 1e-3);

        // All touches lifted: the window closes
        tick(&mut state, &input(1.2, 0, 0), &NoContact);
        assert!(!state.player.hold_active);
    }

    #[test]
    fn hold_expires_at_deadline() {
        let mut state = GameState::new(1, GameMode::Classic);
        tick(&mut state, &input(0.0, 0, 0), &NoContact);
        tick(&mut state, &input(1.0, 1, 1), &NoContact);
        tick(&mut state, &input(1.1, 1, 1), &NoContact);
        assert!((state.player.hold_deadline - 1.9).abs() < 1e-9);
        tick(&mut state, &input(2.0, 0, 1), &NoContact);
        assert!(!state.player.hold_active);
    }

    #[test]
    fn landing_restores_jump_charges() {
        let mut state = GameState::new(1, GameMode::Classic);
        tick(&mut state, &input(0.0, 0, 0), &NoContact);
        tick(&mut state, &input(1.0, 1, 1), &NoContact);
        assert!(!state.player.can_first_jump);

        // Step until gravity brings the player back down
        let mut t = 1.0;
        while state.player.pos.y > state.tuning.stand_ground_y() && t < 10.0 {
            t += 1.0 / 60.0;
            tick(&mut state, &input(t, 0, 0), &NoContact);
        }
        assert!(state.player.can_first_jump);
        assert!(!state.player.can_second_jump);
        assert_eq!(state.player.vertical_velocity, 0.0);
    }

    #[test]
    fn ducking_swaps_hitbox_and_resets_charges() {
        let mut state = GameState::new(1, GameMode::Classic);
        tick(&mut state, &input(0.0, 0, 0), &NoContact);
        tick(&mut state, &input(1.0, 1, 1), &NoContact);
        assert!(state.player.can_second_jump);

        // Land first; ducking is refused while airborne
        let mut t = 1.0;
        while state.player.pos.y > state.tuning.stand_ground_y() && t < 10.0 {
            t += 1.0 / 60.0;
            tick(&mut state, &input(t, 0, 0), &NoContact);
        }

        tick(&mut state, &input(t + 0.1, 2, 2), &NoContact);
        assert_eq!(state.player.stance, Stance::Ducking);
        assert_eq!(
            state.player.hitbox_radius(&state.tuning),
            state.tuning.duck_hitbox_radius
        );
        assert!(state.player.can_first_jump);
        assert!(!state.player.can_second_jump);

        tick(&mut state, &input(t + 0.2, 0, 0), &NoContact);
        assert_eq!(state.player.stance, Stance::Standing);
        assert_eq!(state.player.pos.y, state.tuning.stand_ground_y());
    }

    #[test]
    fn duck_refused_mid_air() {
        let mut state = GameState::new(1, GameMode::Classic);
        tick(&mut state, &input(0.0, 0, 0), &NoContact);
        tick(&mut state, &input(1.0, 1, 1), &NoContact);
        // Rise well past the tolerance
        tick(&mut state, &input(1.15, 0, 1), &NoContact);
        assert!(
            state.player.pos.y
                > state.tuning.ground_height
                    + state.tuning.player_radius
                    + state.tuning.duck_tolerance
        );
        tick(&mut state, &input(1.2, 1, 2), &NoContact);
        assert_eq!(state.player.stance, Stance::Standing);
    }

    #[test]
    fn paused_runs_skip_ticks() {
        let mut state = GameState::new(1, GameMode::Classic);
        tick(&mut state, &input(0.0, 0, 0), &NoContact);
        tick(&mut state, &input(5.0, 0, 0), &NoContact);
        let samples_before = state.replay.len();

        state.pause(5.0);
        let result = tick(&mut state, &input(60.0, 1, 1), &NoContact);
        assert!(result.events.is_empty());
        assert_eq!(state.replay.len(), samples_before);

        // A long real-world pause does not advance run time
        state.resume(65.0);
        let result = tick(&mut state, &input(66.0, 0, 0), &NoContact);
        assert_eq!(result.elapsed, 6.0);
    }

    #[test]
    fn replay_records_every_tick() {
        let mut state = GameState::new(1, GameMode::Classic);
        for i in 0..10 {
            tick(&mut state, &input(i as f64 * 0.016, 0, 0), &NoContact);
        }
        assert_eq!(state.replay.len(), 10);
        let samples = state.replay.samples();
        for pair in samples.windows(2) {
            assert!(pair[1].time >= pair[0].time);
        }
    }

    #[test]
    fn level_run_completes_at_finish_line() {
        let mut state = GameState::new(1, GameMode::Level { length: 400.0 });
        tick(&mut state, &input(0.0, 0, 0), &NoContact);
        let mut t = 0.0;
        let mut completed = false;
        // run_speed is 200/s, so the finish line is ~2s out
        for _ in 0..300 {
            t += 1.0 / 60.0;
            let result = tick(&mut state, &input(t, 0, 0), &NoContact);
            if result
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::RunEnded { .. }))
            {
                completed = true;
                break;
            }
        }
        assert!(completed);
        assert_eq!(state.outcome(), Some(RunOutcome::Completed));
        assert_eq!(state.progress(), 1.0);
        let record = state.take_run_record().unwrap();
        assert_eq!(record.final_score, state.score.bonus);
    }

    /// The end-to-end scenario: jump, double jump with hold, take a hit,
    /// then bank a narrow pass.
    #[test]
    fn full_classic_scenario() {
        let mut state = GameState::new(1, GameMode::Classic);
        let oracle = CircleContact;

        tick(&mut state, &input(0.0, 0, 0), &oracle);

        // t=5: first jump
        tick(&mut state, &input(5.0, 1, 1), &oracle);
        assert!(!state.player.can_first_jump);
        assert!(state.player.can_second_jump);

        // t=5.1: second jump with the finger held down
        tick(&mut state, &input(5.1, 1, 1), &oracle);
        assert!(!state.player.can_second_jump);
        assert!(state.player.hold_active);
        assert!((state.player.hold_deadline - 5.9).abs() < 1e-9);

        // t=6: plant an obstacle on the player and let the oracle see it
        let pos = state.player.pos;
        let obs = planted_obstacle(&state, 900, pos, 25.0);
        state.obstacles.push(obs);
        let result = tick(&mut state, &input(6.0, 0, 0), &oracle);
        assert_eq!(result.hit_points, 2);
        assert!(state.player.invincible);
        assert!((state.player.invincible_until - 6.9).abs() < 1e-9);
        assert!(
            result
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::Damage { amount: 1 }))
        );

        // t=7: an obstacle passed behind the player with margin ≈ 5
        let r = state.player.radius(&state.tuning);
        let obs_radius = 20.0;
        let planted = planted_obstacle(
            &state,
            901,
            Vec2::new(state.player.pos.x - r - obs_radius - 5.0, state.player.pos.y),
            obs_radius,
        );
        state.obstacles.push(planted);
        let bonus_before = state.score.bonus;
        let result = tick(&mut state, &input(7.0, 0, 0), &oracle);
        assert_eq!(state.score.bonus, bonus_before + 1);
        assert_eq!(result.score, 7 + state.score.bonus);
        assert!(
            result
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::Bonus { amount: 1, .. }))
        );
    }

    #[test]
    fn game_over_is_absorbing_until_reset() {
        let mut state = GameState::new(1, GameMode::Classic);
        let oracle = CircleContact;
        tick(&mut state, &input(0.0, 0, 0), &oracle);

        let mut t = 0.0;
        while state.phase != GamePhase::GameOver {
            t += 0.5;
            state.player.invincible = false;
            let pos = state.player.pos;
            let obs = planted_obstacle(&state, 800 + t as u32, pos, 30.0);
            state.obstacles.push(obs);
            tick(&mut state, &input(t, 0, 0), &oracle);
            assert!(t < 10.0, "run never ended");
        }

        let frozen = state.score.total();
        let result = tick(&mut state, &input(t + 5.0, 1, 1), &oracle);
        assert_eq!(result.score, frozen);
        assert!(result.events.is_empty());

        state.reset(1);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.player.hit_points, 3);
        assert_eq!(state.score.total(), 0);
        assert!(state.obstacles.is_empty());
        assert!(state.replay.is_empty());
    }
}
