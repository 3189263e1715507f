//! Game state and core simulation types
//!
//! Everything the renderer and UI collaborators read lives here. All of it is
//! rebuilt by a reset; only the state machine in `game` mutates it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::generator::{self, RandomSource};
use crate::config::Config;
use crate::consts::*;

/// Current phase of an attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Idle, waiting for the player to press
    Waiting,
    /// Stick grows while the press is held
    Stretching,
    /// Stick falls forward toward 90°
    Turning,
    /// Hero walks along the stick
    Walking,
    /// Camera scrolls to the landed platform
    Transitioning,
    /// Hero drops off the end of the stick
    Falling,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Waiting => "waiting",
            GamePhase::Stretching => "stretching",
            GamePhase::Turning => "turning",
            GamePhase::Walking => "walking",
            GamePhase::Transitioning => "transitioning",
            GamePhase::Falling => "falling",
        }
    }
}

/// A platform the hero can stand on. `x` is the left edge in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub x: f32,
    pub width: f32,
}

impl Platform {
    /// The platform every run starts on
    pub const FIRST: Platform = Platform {
        x: FIRST_PLATFORM_X,
        width: FIRST_PLATFORM_WIDTH,
    };

    pub const fn new(x: f32, width: f32) -> Self {
        Self { x, width }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn midpoint(&self) -> f32 {
        self.x + self.width / 2.0
    }
}

/// A stick anchored at `x` on the top of a platform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stick {
    pub x: f32,
    pub length: f32,
    /// Degrees clockwise from upright (90 = bridging the gap, 180 = flat)
    pub rotation: f32,
}

impl Stick {
    /// A fresh, zero-length upright stick
    pub const fn planted_at(x: f32) -> Self {
        Self {
            x,
            length: 0.0,
            rotation: 0.0,
        }
    }

    /// Far end of the stick once it has fallen forward
    #[inline]
    pub fn tip(&self) -> f32 {
        self.x + self.length
    }
}

/// The player character
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hero {
    /// `x` in world space, `y` as a downward offset from the platform top
    pub pos: Vec2,
    /// Current downward speed while falling (px/ms)
    pub fall_speed: f32,
}

impl Hero {
    pub fn standing_at(x: f32, fall_speed: f32) -> Self {
        Self {
            pos: Vec2::new(x, 0.0),
            fall_speed,
        }
    }
}

/// Palette for background trees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreeColor {
    Olive,
    Moss,
    Lime,
}

impl TreeColor {
    pub const ALL: [TreeColor; 3] = [TreeColor::Olive, TreeColor::Moss, TreeColor::Lime];
}

/// Decorative tree on the near hill (no gameplay effect)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub x: f32,
    pub color: TreeColor,
}

/// Size of the visible board in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Longest a stick may grow: the board width or half its height
    pub fn max_stick_length(&self) -> f32 {
        self.width.min(self.height / 2.0)
    }

    /// Height of the platform columns (they fill the lower half)
    pub fn platform_height(&self) -> f32 {
        self.height / 2.0
    }

    /// Screen-space y of the platform tops
    pub fn platform_top(&self) -> f32 {
        self.height - self.platform_height()
    }
}

/// Complete state of one attempt, exposed read-only to renderers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Current phase
    pub phase: GamePhase,
    /// Platforms in increasing x order
    pub platforms: Vec<Platform>,
    /// Sticks already bridged, oldest first
    pub planted_sticks: Vec<Stick>,
    /// The stick currently in play
    pub stick: Stick,
    /// Background trees in increasing x order
    pub trees: Vec<Tree>,
    pub hero: Hero,
    /// Camera scroll along x
    pub scene_offset: f32,
    pub score: u64,
    pub viewport: Viewport,
    /// Set once the hero has fallen off screen
    pub game_over: bool,
}

impl GameState {
    /// Build the start-of-run layout
    pub fn fresh<R: RandomSource + ?Sized>(config: &Config, viewport: Viewport, rng: &mut R) -> Self {
        let first = Platform::FIRST;

        let mut platforms = vec![first];
        generator::fill_platforms(&mut platforms, viewport.width, config, rng);

        let mut trees = Vec::with_capacity(INITIAL_TREE_COUNT);
        generator::extend_trees(&mut trees, INITIAL_TREE_COUNT, config, rng);

        Self {
            phase: GamePhase::Waiting,
            platforms,
            planted_sticks: Vec::new(),
            stick: Stick::planted_at(first.right()),
            trees,
            hero: Hero::standing_at(first.right() - config.hero_edge_offset, config.fall_initial_speed),
            scene_offset: 0.0,
            score: 0,
            viewport,
            game_over: false,
        }
    }

    /// All sticks in draw order; the one in play is always last
    pub fn sticks(&self) -> impl Iterator<Item = &Stick> {
        self.planted_sticks.iter().chain(std::iter::once(&self.stick))
    }

    /// Retire the current stick and start a new one at `x`
    pub fn plant_new_stick(&mut self, x: f32) {
        let done = std::mem::replace(&mut self.stick, Stick::planted_at(x));
        self.planted_sticks.push(done);
    }

    /// Drop entities the hero can never return to.
    ///
    /// Platforms and sticks are measured from the stick in play, so the
    /// platform it stands on and everything ahead survive however far the
    /// camera has scrolled. Trees follow the background scroll.
    pub fn prune_offscreen(&mut self) {
        let anchor = self.stick.x;
        let stick_cutoff = anchor - self.viewport.width;
        self.platforms.retain(|p| p.right() >= anchor);
        self.planted_sticks.retain(|s| s.x > stick_cutoff);

        let tree_cutoff = self.scene_offset * BACKGROUND_SPEED - TREE_CROWN_WIDTH / 2.0;
        self.trees.retain(|t| t.x >= tree_cutoff);
    }

    /// Rightmost platform edge generated so far
    pub fn furthest_platform_edge(&self) -> f32 {
        generator::furthest_edge(&self.platforms)
    }
}
