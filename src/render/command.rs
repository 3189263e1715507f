//! Draw commands handed to the drawing surface

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Linear RGBA
pub type Color = [f32; 4];

/// One primitive in screen space (y grows downward)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    /// Rectangle filled with a top-to-bottom gradient
    Gradient { min: Vec2, size: Vec2, top: Color, bottom: Color },
    Rect { min: Vec2, size: Vec2, color: Color },
    RoundedRect { min: Vec2, size: Vec2, radius: f32, color: Color },
    /// Filled closed polygon
    Polygon { points: Vec<Vec2>, color: Color },
    Circle { center: Vec2, radius: f32, color: Color },
    Line { from: Vec2, to: Vec2, width: f32, color: Color },
}

impl DrawCommand {
    pub fn triangle(a: Vec2, b: Vec2, c: Vec2, color: Color) -> Self {
        DrawCommand::Polygon {
            points: vec![a, b, c],
            color,
        }
    }
}

/// Anything that can execute draw commands (canvas, GPU batcher, test recorder)
pub trait Surface {
    fn draw(&mut self, command: &DrawCommand);
}

impl Surface for Vec<DrawCommand> {
    fn draw(&mut self, command: &DrawCommand) {
        self.push(command.clone());
    }
}

/// Colors for game elements
pub mod colors {
    use super::Color;

    pub const SKY_TOP: Color = [0.733, 0.839, 0.569, 1.0]; // #BBD691
    pub const SKY_BOTTOM: Color = [0.996, 0.945, 0.882, 1.0]; // #FEF1E1
    pub const NEAR_HILL: Color = [0.584, 0.776, 0.161, 1.0]; // #95C629
    pub const FAR_HILL: Color = [0.396, 0.624, 0.110, 1.0]; // #659F1C
    pub const TREE_TRUNK: Color = [0.490, 0.514, 0.235, 1.0]; // #7D833C
    pub const TREE_OLIVE: Color = [0.427, 0.533, 0.129, 1.0]; // #6D8821
    pub const TREE_MOSS: Color = [0.561, 0.675, 0.204, 1.0]; // #8FAC34
    pub const TREE_LIME: Color = [0.596, 0.702, 0.200, 1.0]; // #98B333
    pub const PLATFORM: Color = [0.0, 0.0, 0.0, 1.0];
    pub const PERFECT_AREA: Color = [1.0, 0.0, 0.0, 1.0];
    pub const HERO: Color = [0.0, 0.0, 0.0, 1.0];
    pub const HERO_EYE: Color = [1.0, 1.0, 1.0, 1.0];
    pub const HERO_BAND: Color = [1.0, 0.0, 0.0, 1.0];
    pub const STICK: Color = [0.0, 0.0, 0.0, 1.0];
}
