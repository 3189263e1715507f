//! Scene rendering
//!
//! Turns a read-only `GameState` into an ordered list of screen-space
//! primitives. Executing them is up to a `Surface` implementation.

pub mod command;
pub mod shapes;

pub use command::{Color, DrawCommand, Surface, colors};

use crate::config::Config;
use crate::sim::GameState;

/// Build the draw list for one frame, back to front
pub fn build_frame(state: &GameState, config: &Config) -> Vec<DrawCommand> {
    let viewport = &state.viewport;
    let mut out = Vec::with_capacity(64 + state.trees.len() * 2 + state.platforms.len() * 2);

    // Background
    out.push(shapes::sky(viewport));
    out.push(shapes::hill(&shapes::NEAR_HILL, state.scene_offset, viewport));
    out.push(shapes::hill(&shapes::FAR_HILL, state.scene_offset, viewport));
    for tree in &state.trees {
        shapes::tree(tree, state.scene_offset, viewport, &mut out);
    }

    // Scene (camera-relative)
    shapes::platforms(state, config, &mut out);
    shapes::hero(state, config, &mut out);
    shapes::sticks(state, &mut out);

    out
}

/// Build a frame and replay it onto `surface`
pub fn render<S: Surface + ?Sized>(state: &GameState, config: &Config, surface: &mut S) {
    for command in &build_frame(state, config) {
        surface.draw(command);
    }
}
