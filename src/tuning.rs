//! Data-driven game balance
//!
//! Every gameplay constant lives here so Classic and Level modes are
//! configuration instances of one state machine rather than separate
//! implementations. Values can be overridden from JSON for balance work.

use serde::{Deserialize, Serialize};

/// Which ruleset a run uses
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameMode {
    /// Endless run: base score is survival seconds plus margin bonuses
    Classic,
    /// Fixed-length course: only margin bonuses count, run completes at the
    /// finish line
    Level {
        /// Horizontal distance from start to finish, in playfield units
        length: f32,
    },
}

impl GameMode {
    /// True for any fixed-length level variant
    pub fn is_level(&self) -> bool {
        matches!(self, GameMode::Level { .. })
    }
}

/// Complete balance configuration for one game mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Downward acceleration on the airborne player (units/s²)
    pub gravity: f32,
    /// Upward impulse for the first jump (units/s)
    pub first_jump_velocity: f32,
    /// Upward impulse for the second jump (units/s)
    pub second_jump_velocity: f32,
    /// How long held input keeps boosting after the second jump (s)
    pub hold_duration: f32,
    /// Upward acceleration applied while the hold window is active (units/s²)
    pub hold_acceleration: f32,
    /// Invincibility window after taking damage (s)
    pub invincibility_duration: f32,
    /// Max height above ground at which ducking is still allowed
    pub duck_tolerance: f32,

    /// Standing actor radius (visual silhouette)
    pub player_radius: f32,
    /// Standing hitbox radius (smaller than the silhouette for forgiveness)
    pub hitbox_radius: f32,
    /// Ducking actor radius
    pub duck_radius: f32,
    /// Ducking hitbox radius
    pub duck_hitbox_radius: f32,

    /// Height of the floor strip
    pub ground_height: f32,
    /// Standing actor sinks this far into the floor when grounded
    pub ground_offset: f32,
    /// Extra rest height while ducking
    pub duck_offset: f32,

    /// Playfield width; obstacles spawn just past the right edge
    pub playfield_width: f32,
    /// Playfield height; bounds the spawn bands
    pub playfield_height: f32,
    /// Horizontal position the player is pinned to, as a fraction of width
    pub player_x_fraction: f32,

    /// Target seconds between spawns before difficulty shrinks it
    pub base_spawn_interval: f32,
    /// Obstacle drift speed before the spawn factor scales it (units/s)
    pub base_obstacle_speed: f32,
    /// Obstacle radius range before the spawn factor scales it
    pub min_obstacle_radius: f32,
    pub max_obstacle_radius: f32,

    /// Hit points at run start
    pub starting_hp: u8,
    /// Forward speed of the player in level mode (units/s); zero in classic
    /// mode, where the world scrolls instead
    pub run_speed: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self::classic()
    }
}

impl Tuning {
    /// Classic endless-mode balance
    pub fn classic() -> Self {
        Self {
            gravity: 1470.0,
            first_jump_velocity: 550.0,
            second_jump_velocity: 275.0,
            hold_duration: 0.8,
            hold_acceleration: 465.0,
            invincibility_duration: 0.9,
            duck_tolerance: 35.0,
            player_radius: 22.5,
            hitbox_radius: 12.6,
            duck_radius: 11.25,
            duck_hitbox_radius: 9.375,
            ground_height: 50.0,
            ground_offset: 4.0,
            duck_offset: 2.0,
            playfield_width: 750.0,
            playfield_height: 1334.0,
            player_x_fraction: 0.2,
            base_spawn_interval: 2.0,
            base_obstacle_speed: 200.0,
            min_obstacle_radius: 20.0,
            max_obstacle_radius: 40.0,
            starting_hp: 3,
            run_speed: 0.0,
        }
    }

    /// Level-mode balance: slightly softer jumps, longer float window, and a
    /// forward-moving player
    pub fn level() -> Self {
        Self {
            first_jump_velocity: 520.0,
            second_jump_velocity: 260.0,
            hold_duration: 0.8175,
            run_speed: 200.0,
            ..Self::classic()
        }
    }

    /// Preset matching a game mode
    pub fn for_mode(mode: GameMode) -> Self {
        match mode {
            GameMode::Classic => Self::classic(),
            GameMode::Level { .. } => Self::level(),
        }
    }

    /// Parse a tuning override from JSON. Missing fields fall back to the
    /// classic preset via `#[serde(default)]`.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Resting center height of the standing actor
    pub fn stand_ground_y(&self) -> f32 {
        self.ground_height + self.player_radius - self.ground_offset
    }

    /// Resting center height of the ducking actor
    pub fn duck_ground_y(&self) -> f32 {
        self.ground_height + self.duck_radius - self.ground_offset + self.duck_offset
    }

    /// Horizontal position the player is pinned to
    pub fn player_x(&self) -> f32 {
        self.playfield_width * self.player_x_fraction
    }
}
