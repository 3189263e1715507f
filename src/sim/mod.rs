//! Simulation module
//!
//! All gameplay logic lives here. It never draws, sleeps or reads a clock:
//! - Time only arrives through `Game::step` timestamps
//! - Randomness only through an injected `RandomSource`
//! - Platforms and trees are kept in increasing x order

pub mod collision;
pub mod game;
pub mod generator;
pub mod state;

pub use collision::{Hit, is_perfect, platform_under, resolve_hit};
pub use game::{Game, GameEvent, StepResult};
pub use generator::{RandomSource, ScriptedSource};
pub use state::{GamePhase, GameState, Hero, Platform, Stick, Tree, TreeColor, Viewport};
