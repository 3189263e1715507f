//! Command generation for each scene layer

use glam::Vec2;

use super::command::{Color, DrawCommand, colors};
use crate::config::Config;
use crate::consts::{BACKGROUND_SPEED, TREE_CROWN_WIDTH};
use crate::sim::{GameState, Tree, TreeColor, Viewport};
use crate::sin_degrees;

/// Horizontal spacing of hill outline samples (px)
pub const HILL_SAMPLE_STEP: f32 = 2.0;

/// A sine-shaped background hill
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hill {
    /// Distance of the resting line above the bottom of the screen
    pub base_height: f32,
    pub amplitude: f32,
    /// Horizontal squash of the sine (degrees per pixel)
    pub stretch: f32,
    pub color: Color,
}

/// Hill the trees stand on
pub const NEAR_HILL: Hill = Hill {
    base_height: 100.0,
    amplitude: 10.0,
    stretch: 1.0,
    color: colors::NEAR_HILL,
};

pub const FAR_HILL: Hill = Hill {
    base_height: 70.0,
    amplitude: 20.0,
    stretch: 0.5,
    color: colors::FAR_HILL,
};

const TRUNK_WIDTH: f32 = 2.0;
const TRUNK_HEIGHT: f32 = 5.0;
const CROWN_HEIGHT: f32 = 25.0;

const STICK_WIDTH: f32 = 2.0;

impl Hill {
    /// Screen y of the hill outline at screen x
    pub fn y_at(&self, window_x: f32, scene_offset: f32, viewport: &Viewport) -> f32 {
        let phase = (scene_offset * BACKGROUND_SPEED + window_x) * self.stretch;
        sin_degrees(phase) * self.amplitude + viewport.height - self.base_height
    }
}

pub fn tree_color(color: TreeColor) -> Color {
    match color {
        TreeColor::Olive => colors::TREE_OLIVE,
        TreeColor::Moss => colors::TREE_MOSS,
        TreeColor::Lime => colors::TREE_LIME,
    }
}

/// Full-screen sky gradient
pub fn sky(viewport: &Viewport) -> DrawCommand {
    DrawCommand::Gradient {
        min: Vec2::ZERO,
        size: Vec2::new(viewport.width, viewport.height),
        top: colors::SKY_TOP,
        bottom: colors::SKY_BOTTOM,
    }
}

/// Hill silhouette closed along the bottom of the screen
pub fn hill(hill: &Hill, scene_offset: f32, viewport: &Viewport) -> DrawCommand {
    let samples = (viewport.width / HILL_SAMPLE_STEP).ceil() as usize;
    let mut points = Vec::with_capacity(samples + 3);

    points.push(Vec2::new(0.0, viewport.height));
    for i in 0..samples {
        let x = i as f32 * HILL_SAMPLE_STEP;
        points.push(Vec2::new(x, hill.y_at(x, scene_offset, viewport)));
    }
    points.push(Vec2::new(viewport.width, hill.y_at(viewport.width, scene_offset, viewport)));
    points.push(Vec2::new(viewport.width, viewport.height));

    DrawCommand::Polygon {
        points,
        color: hill.color,
    }
}

/// Where a tree's trunk base sits on screen
pub fn tree_origin(tree: &Tree, scene_offset: f32, viewport: &Viewport) -> Vec2 {
    let x = (tree.x - scene_offset * BACKGROUND_SPEED) * NEAR_HILL.stretch;
    let y = sin_degrees(tree.x) * NEAR_HILL.amplitude + viewport.height - NEAR_HILL.base_height;
    Vec2::new(x, y)
}

/// Trunk and crown, skipped when fully off screen
pub fn tree(tree: &Tree, scene_offset: f32, viewport: &Viewport, out: &mut Vec<DrawCommand>) {
    let origin = tree_origin(tree, scene_offset, viewport);
    let half = TREE_CROWN_WIDTH / 2.0;
    if origin.x + half < 0.0 || origin.x - half > viewport.width {
        return;
    }

    out.push(DrawCommand::Rect {
        min: origin + Vec2::new(-TRUNK_WIDTH / 2.0, -TRUNK_HEIGHT),
        size: Vec2::new(TRUNK_WIDTH, TRUNK_HEIGHT),
        color: colors::TREE_TRUNK,
    });
    out.push(DrawCommand::triangle(
        origin + Vec2::new(-half, -TRUNK_HEIGHT),
        origin + Vec2::new(0.0, -(TRUNK_HEIGHT + CROWN_HEIGHT)),
        origin + Vec2::new(half, -TRUNK_HEIGHT),
        tree_color(tree.color),
    ));
}

/// Platform columns, plus the perfect-area marker on platforms not yet reached
pub fn platforms(state: &GameState, config: &Config, out: &mut Vec<DrawCommand>) {
    let top = state.viewport.platform_top();
    let height = state.viewport.platform_height();
    let area = config.perfect_area_size;

    for platform in &state.platforms {
        let x = platform.x - state.scene_offset;
        out.push(DrawCommand::Rect {
            min: Vec2::new(x, top),
            size: Vec2::new(platform.width, height),
            color: colors::PLATFORM,
        });

        if state.stick.x < platform.x {
            out.push(DrawCommand::Rect {
                min: Vec2::new(platform.midpoint() - area / 2.0 - state.scene_offset, top),
                size: Vec2::new(area, area),
                color: colors::PERFECT_AREA,
            });
        }
    }
}

/// Hero body, legs, eye and headband
pub fn hero(state: &GameState, config: &Config, out: &mut Vec<DrawCommand>) {
    let w = config.hero_width;
    let h = config.hero_height;
    let pos = state.hero.pos;
    let origin = Vec2::new(
        pos.x - w / 2.0 - state.scene_offset,
        pos.y + state.viewport.platform_top() - h / 2.0,
    );

    out.push(DrawCommand::RoundedRect {
        min: origin + Vec2::new(-w / 2.0, -h / 2.0),
        size: Vec2::new(w, h - 4.0),
        radius: 5.0,
        color: colors::HERO,
    });

    for leg_x in [5.0, -5.0] {
        out.push(DrawCommand::Circle {
            center: origin + Vec2::new(leg_x, 11.5),
            radius: 3.0,
            color: colors::HERO,
        });
    }

    out.push(DrawCommand::Circle {
        center: origin + Vec2::new(5.0, -7.0),
        radius: 3.0,
        color: colors::HERO_EYE,
    });

    out.push(DrawCommand::Rect {
        min: origin + Vec2::new(-w / 2.0 - 1.0, -12.0),
        size: Vec2::new(w + 2.0, 4.5),
        color: colors::HERO_BAND,
    });
    // Headband tails
    out.push(DrawCommand::triangle(
        origin + Vec2::new(-9.0, -14.5),
        origin + Vec2::new(-17.0, -18.5),
        origin + Vec2::new(-14.0, -8.5),
        colors::HERO_BAND,
    ));
    out.push(DrawCommand::triangle(
        origin + Vec2::new(-10.0, -10.5),
        origin + Vec2::new(-15.0, -3.5),
        origin + Vec2::new(-5.0, -7.0),
        colors::HERO_BAND,
    ));
}

/// Screen-space far end of a stick rotated clockwise from upright
pub fn stick_end(anchor: Vec2, length: f32, rotation: f32) -> Vec2 {
    let (sin, cos) = rotation.to_radians().sin_cos();
    anchor + Vec2::new(sin * length, -cos * length)
}

/// Every stick with a visible length
pub fn sticks(state: &GameState, out: &mut Vec<DrawCommand>) {
    let top = state.viewport.platform_top();
    for stick in state.sticks().filter(|s| s.length > 0.0) {
        let anchor = Vec2::new(stick.x - state.scene_offset, top);
        out.push(DrawCommand::Line {
            from: anchor,
            to: stick_end(anchor, stick.length, stick.rotation),
            width: STICK_WIDTH,
            color: colors::STICK,
        });
    }
}
