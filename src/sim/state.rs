//! Game state and core simulation types
//!
//! All per-run state lives here; per-tick orchestration is in `tick`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::RunClock;
use super::replay::{ReplayTrace, RunRecord};
use crate::tuning::{GameMode, Tuning};

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Logical pause: ticks are skipped, pause time excluded from the clock
    Paused,
    /// Run ended; absorbing until an explicit reset
    GameOver,
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// Hit points depleted
    Defeated,
    /// Reached the finish line (level mode only)
    Completed,
}

/// Player stance - which actor/hitbox is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stance {
    Standing,
    Ducking,
}

/// The controllable actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub stance: Stance,
    pub pos: Vec2,
    pub vertical_velocity: f32,
    pub horizontal_velocity: f32,
    /// First jump charge available (grounded or freshly ducked)
    pub can_first_jump: bool,
    /// Second jump charge available (first jump consumed, not yet used)
    pub can_second_jump: bool,
    /// Hold-to-float window after the second jump
    pub hold_active: bool,
    /// Elapsed-run-time deadline for the hold window
    pub hold_deadline: f64,
    pub invincible: bool,
    /// Elapsed-run-time deadline for the invincibility window
    pub invincible_until: f64,
    pub hit_points: u8,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            stance: Stance::Standing,
            pos: Vec2::new(tuning.player_x(), tuning.stand_ground_y()),
            vertical_velocity: 0.0,
            horizontal_velocity: tuning.run_speed,
            can_first_jump: true,
            can_second_jump: false,
            hold_active: false,
            hold_deadline: 0.0,
            invincible: false,
            invincible_until: 0.0,
            hit_points: tuning.starting_hp,
        }
    }

    /// Active silhouette radius for the current stance
    pub fn radius(&self, tuning: &Tuning) -> f32 {
        match self.stance {
            Stance::Standing => tuning.player_radius,
            Stance::Ducking => tuning.duck_radius,
        }
    }

    /// Active hitbox radius for the current stance
    pub fn hitbox_radius(&self, tuning: &Tuning) -> f32 {
        match self.stance {
            Stance::Standing => tuning.hitbox_radius,
            Stance::Ducking => tuning.duck_hitbox_radius,
        }
    }

    /// Resting center height for the current stance
    pub fn ground_y(&self, tuning: &Tuning) -> f32 {
        match self.stance {
            Stance::Standing => tuning.stand_ground_y(),
            Stance::Ducking => tuning.duck_ground_y(),
        }
    }

    /// Restore jump charges to first-available (ground contact, duck)
    pub fn restore_jumps(&mut self) {
        self.can_first_jump = true;
        self.can_second_jump = false;
    }
}

/// Vertical placement band an obstacle was spawned into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerticalBand {
    Ground,
    Mid,
    High,
}

/// Polygon silhouette, cosmetic only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    Triangle,
    Square,
    Hexagon,
    Octagon,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 4] = [
        ShapeKind::Triangle,
        ShapeKind::Square,
        ShapeKind::Hexagon,
        ShapeKind::Octagon,
    ];

    pub fn sides(&self) -> u8 {
        match self {
            ShapeKind::Triangle => 3,
            ShapeKind::Square => 4,
            ShapeKind::Hexagon => 6,
            ShapeKind::Octagon => 8,
        }
    }
}

/// Scoring resolution for an obstacle. Each obstacle is resolved at most
/// once: either passed cleanly (scored) or collided, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObstacleFate {
    #[default]
    Unresolved,
    Scored,
    Collided,
}

/// A procedurally spawned hazard drifting across the playfield
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub shape: ShapeKind,
    /// Color palette index, cosmetic only
    pub color: u8,
    pub radius: f32,
    pub pos: Vec2,
    /// Constant drift velocity fixed at spawn time
    pub vel: Vec2,
    pub band: VerticalBand,
    pub fate: ObstacleFate,
}

impl Obstacle {
    /// True once the obstacle has been scored or has dealt damage
    pub fn resolved(&self) -> bool {
        self.fate != ObstacleFate::Unresolved
    }

    /// True once the obstacle has fully left the playfield
    pub fn out_of_bounds(&self, playfield_width: f32) -> bool {
        self.pos.x < -self.radius || self.pos.x > playfield_width * 3.0 + self.radius
    }
}

/// Base + bonus score accumulator
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ScoreLedger {
    /// Survival score: floor of elapsed seconds in classic mode, always zero
    /// in level mode
    pub base: u32,
    /// Sum of margin bonuses (1-5 each)
    pub bonus: u32,
}

impl ScoreLedger {
    pub fn total(&self) -> u32 {
        self.base + self.bonus
    }
}

/// Complete state for one run
#[derive(Debug, Clone)]
pub struct GameState {
    pub seed: u64,
    pub mode: GameMode,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub clock: RunClock,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub score: ScoreLedger,
    pub replay: ReplayTrace,
    /// Current difficulty multiplier, recomputed each tick from elapsed time
    pub difficulty_factor: f64,
    /// Course distance travelled (level mode); drives the progress marker
    pub distance: f32,
    pub(crate) rng: Pcg32,
    /// Elapsed time at the most recent spawn-interval rollover
    pub(crate) last_spawn_time: f64,
    /// Elapsed time of the most recent actual spawn (min-gap bookkeeping)
    pub(crate) last_obstacle_spawn_time: f64,
    /// Current randomized target interval between spawns
    pub(crate) current_spawn_interval: f64,
    /// Outcome of a finished run, until the record is taken
    outcome: Option<RunOutcome>,
    pending_record: Option<RunRecord>,
    next_id: u32,
}

impl GameState {
    /// Create a run with the mode's tuning preset
    pub fn new(seed: u64, mode: GameMode) -> Self {
        Self::with_tuning(seed, mode, Tuning::for_mode(mode))
    }

    /// Create a run with explicit tuning (balance experiments, tests)
    pub fn with_tuning(seed: u64, mode: GameMode, tuning: Tuning) -> Self {
        let mut tuning = tuning;
        if !mode.is_level() {
            tuning.run_speed = 0.0;
        }
        Self {
            seed,
            mode,
            phase: GamePhase::Running,
            player: Player::new(&tuning),
            obstacles: Vec::new(),
            score: ScoreLedger::default(),
            replay: ReplayTrace::new(),
            difficulty_factor: 1.0,
            distance: 0.0,
            clock: RunClock::new(),
            rng: Pcg32::seed_from_u64(seed),
            last_spawn_time: 0.0,
            last_obstacle_spawn_time: 0.0,
            current_spawn_interval: 1.0,
            outcome: None,
            pending_record: None,
            next_id: 1,
            tuning,
        }
    }

    /// Discard all run state and start over with a new seed. Valid from any
    /// phase; aborting a run mid-flight does not require reaching GameOver.
    pub fn reset(&mut self, seed: u64) {
        *self = Self::with_tuning(seed, self.mode, self.tuning.clone());
    }

    /// Allocate a new obstacle ID
    pub(crate) fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Enter the logical paused state. No-op unless running.
    pub fn pause(&mut self, raw_time: f64) {
        if self.phase == GamePhase::Running {
            self.clock.record_pause_start(raw_time);
            self.phase = GamePhase::Paused;
        }
    }

    /// Resume from pause, folding the pause duration into the clock offset
    pub fn resume(&mut self, raw_time: f64) {
        if self.phase == GamePhase::Paused {
            self.clock.record_pause_end(raw_time);
            self.phase = GamePhase::Running;
        }
    }

    /// Freeze the run and stage the record for the persistence collaborator
    pub(crate) fn finish(&mut self, outcome: RunOutcome) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.outcome = Some(outcome);
        self.pending_record = Some(RunRecord {
            final_score: self.score.total(),
            duration_seconds: self.clock.elapsed(),
            outcome,
            trace: self.replay.clone(),
        });
        log::info!(
            "run over ({outcome:?}): score {} in {:.1}s",
            self.score.total(),
            self.clock.elapsed()
        );
    }

    /// How the run ended, if it has
    pub fn outcome(&self) -> Option<RunOutcome> {
        self.outcome
    }

    /// Take the finished run's record. Yields once per run; the caller owns
    /// the copy and may move it across threads for persistence.
    pub fn take_run_record(&mut self) -> Option<RunRecord> {
        self.pending_record.take()
    }

    /// Level-mode course progress in [0, 1]; always 0 in classic mode
    pub fn progress(&self) -> f32 {
        match self.mode {
            GameMode::Level { length } if length > 0.0 => {
                (self.distance / length).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_run_starts_grounded_with_first_jump() {
        let state = GameState::new(7, GameMode::Classic);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.player.hit_points, 3);
        assert!(state.player.can_first_jump);
        assert!(!state.player.can_second_jump);
        assert_eq!(state.player.pos.y, state.tuning.stand_ground_y());
    }

    #[test]
    fn reset_is_idempotent() {
        let mut a = GameState::new(42, GameMode::Classic);
        a.reset(42);
        let first = (
            a.score.total(),
            a.player.hit_points,
            a.obstacles.len(),
            a.replay.len(),
        );
        a.reset(42);
        let second = (
            a.score.total(),
            a.player.hit_points,
            a.obstacles.len(),
            a.replay.len(),
        );
        assert_eq!(first, (0, 3, 0, 0));
        assert_eq!(first, second);
    }

    #[test]
    fn classic_mode_forces_zero_run_speed() {
        let state = GameState::with_tuning(1, GameMode::Classic, Tuning::level());
        assert_eq!(state.player.horizontal_velocity, 0.0);
    }

    #[test]
    fn run_record_is_taken_once() {
        let mut state = GameState::new(3, GameMode::Classic);
        state.finish(RunOutcome::Defeated);
        assert!(state.take_run_record().is_some());
        assert!(state.take_run_record().is_none());
        assert_eq!(state.outcome(), Some(RunOutcome::Defeated));
    }

    #[test]
    fn pause_only_from_running() {
        let mut state = GameState::new(3, GameMode::Classic);
        state.finish(RunOutcome::Defeated);
        state.pause(10.0);
        assert_eq!(state.phase, GamePhase::GameOver);
    }
}
