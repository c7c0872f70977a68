//! Deterministic simulation module
//!
//! All gameplay logic lives here. The module is pure and deterministic:
//! - Driven only by the host's frame timestamps and touch counts
//! - Seeded RNG only
//! - No rendering, audio, or platform dependencies
//! - No I/O; run records are handed off by value at run end

pub mod clock;
pub mod difficulty;
pub mod replay;
pub mod scoring;
pub mod spawn;
pub mod state;
pub mod tick;

pub use clock::RunClock;
pub use difficulty::{difficulty_factor, spawn_factor};
pub use replay::{GhostSample, ReplaySample, ReplayTrace, RunRecord};
pub use scoring::{CircleContact, ContactOracle, margin_bonus};
pub use state::{
    GamePhase, GameState, Obstacle, ObstacleFate, Player, RunOutcome, ScoreLedger, ShapeKind,
    Stance, VerticalBand,
};
pub use tick::{GameEvent, TickInput, TickResult, tick};
