//! Procedural world generation
//!
//! Platforms and trees are appended ahead of the hero. Each new element sits a
//! random gap to the right of the previous one; gaps and widths are floored
//! to whole pixels.

use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{Platform, Tree, TreeColor};
use crate::config::Config;

/// Source of uniform samples in `[0, 1)`
pub trait RandomSource {
    fn unit(&mut self) -> f32;

    /// Uniform whole-pixel offset in `[0, span)`
    fn offset(&mut self, span: f32) -> f32 {
        (self.unit() * span).floor()
    }
}

impl RandomSource for Pcg32 {
    fn unit(&mut self) -> f32 {
        self.random::<f32>()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn unit(&mut self) -> f32 {
        (**self).unit()
    }
}

/// Replays a fixed list of samples, cycling when exhausted.
///
/// Lets tests and replays pin every gap, width and colour.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    samples: Vec<f32>,
    cursor: usize,
}

impl ScriptedSource {
    /// Samples are clamped into `[0, 1)`. An empty list behaves like `[0.0]`.
    pub fn new(samples: impl IntoIterator<Item = f32>) -> Self {
        let mut samples: Vec<f32> = samples
            .into_iter()
            .map(|s| s.clamp(0.0, 1.0 - f32::EPSILON))
            .collect();
        if samples.is_empty() {
            samples.push(0.0);
        }
        Self { samples, cursor: 0 }
    }

    pub fn constant(sample: f32) -> Self {
        Self::new([sample])
    }
}

impl RandomSource for ScriptedSource {
    fn unit(&mut self) -> f32 {
        let sample = self.samples[self.cursor % self.samples.len()];
        self.cursor = (self.cursor + 1) % self.samples.len();
        sample
    }
}

/// Rightmost edge of a platform list (0 when empty)
pub fn furthest_edge(platforms: &[Platform]) -> f32 {
    platforms.iter().map(Platform::right).fold(0.0, f32::max)
}

/// Roll the platform that follows a right edge
pub fn next_platform<R: RandomSource + ?Sized>(after: f32, config: &Config, rng: &mut R) -> Platform {
    let gap = config.platform_min_gap + rng.offset(config.platform_max_gap - config.platform_min_gap);
    let width =
        config.platform_min_width + rng.offset(config.platform_max_width - config.platform_min_width);
    Platform::new(after + gap, width)
}

/// Append one platform past the current furthest edge
pub fn push_platform<R: RandomSource + ?Sized>(platforms: &mut Vec<Platform>, config: &Config, rng: &mut R) {
    let platform = next_platform(furthest_edge(platforms), config, rng);
    platforms.push(platform);
}

/// Append platforms until they reach at least `width`
pub fn fill_platforms<R: RandomSource + ?Sized>(
    platforms: &mut Vec<Platform>,
    width: f32,
    config: &Config,
    rng: &mut R,
) {
    while furthest_edge(platforms) < width {
        push_platform(platforms, config, rng);
    }
}

/// Roll the tree that follows the tree at `after` (0 for the first)
pub fn next_tree<R: RandomSource + ?Sized>(after: f32, config: &Config, rng: &mut R) -> Tree {
    let x = after + config.tree_min_gap + rng.offset(config.tree_max_gap - config.tree_min_gap);
    let index = (rng.unit() * TreeColor::ALL.len() as f32) as usize;
    let color = TreeColor::ALL[index.min(TreeColor::ALL.len() - 1)];
    Tree { x, color }
}

/// Append `count` trees
pub fn extend_trees<R: RandomSource + ?Sized>(trees: &mut Vec<Tree>, count: usize, config: &Config, rng: &mut R) {
    for _ in 0..count {
        let after = trees.last().map_or(0.0, |t| t.x);
        let tree = next_tree(after, config, rng);
        trees.push(tree);
    }
}
