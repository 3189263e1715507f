//! Stick Bridge - simulation core for a stick-stretching reflex game
//!
//! Core modules:
//! - `sim`: Phase state machine, world generation, landing geometry
//! - `render`: Snapshot to draw-command translation
//! - `config`: Tunable gameplay constants
//! - `highscore`: The single persisted best score

pub mod config;
pub mod highscore;
pub mod render;
pub mod sim;

pub use config::{Config, ConfigError};
pub use highscore::HighScore;
pub use sim::{Game, GameEvent, GamePhase, GameState, StepResult};

/// Fixed layout constants
pub mod consts {
    /// Every run starts on the same platform
    pub const FIRST_PLATFORM_X: f32 = 50.0;
    pub const FIRST_PLATFORM_WIDTH: f32 = 50.0;

    /// Trees planted by a reset
    pub const INITIAL_TREE_COUNT: usize = 20;
    /// Trees added after each successful landing
    pub const TREES_PER_LANDING: usize = 2;

    /// Stick rotation (degrees) when it bridges the gap
    pub const LANDED_ROTATION: f32 = 90.0;
    /// Stick rotation (degrees) once it has dropped flat
    pub const FALLEN_ROTATION: f32 = 180.0;

    /// Background layers scroll at this fraction of the camera speed
    pub const BACKGROUND_SPEED: f32 = 0.2;
    /// Widest part of a background tree
    pub const TREE_CROWN_WIDTH: f32 = 10.0;
}

/// Sine of an angle given in degrees
#[inline]
pub fn sin_degrees(degrees: f32) -> f32 {
    degrees.to_radians().sin()
}
