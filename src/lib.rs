//! Shape Dash - an endless-runner obstacle course
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player motion, spawning, scoring)
//! - `tuning`: Data-driven game balance, one preset per game mode
//! - `records`: Local high scores and best-run storage for ghost replays
//!
//! Rendering, touch widgets, audio, and networked leaderboards are external
//! collaborators. The simulation emits score/HP/events for display and hands
//! off a [`sim::RunRecord`] at run end; it never blocks on persistence.

pub mod records;
pub mod sim;
pub mod tuning;

pub use records::{BestRun, HighScores};
pub use sim::GameState;
pub use tuning::{GameMode, Tuning};

/// Frame-rate constants for hosts that drive the sim
pub mod consts {
    /// Nominal frame interval on the target device (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Largest frame delta the sim will integrate in one tick; longer gaps
    /// (debugger stops, scene reloads) are truncated rather than simulated
    pub const MAX_FRAME_DT: f32 = 0.1;
}
