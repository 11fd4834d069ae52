//! Rendering boundary
//!
//! The core never owns a window. Entities and the scene describe themselves
//! as primitives on a [`Surface`] supplied by the host.

pub mod recording;
pub mod scene;

pub use recording::{DrawCommand, RecordingSurface};
pub use scene::draw_scene;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// RGBA color, components in 0..=1
pub type Color = [f32; 4];

/// Sprite images the host is expected to provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sprite {
    Airplane,
    Tower,
}

/// Target of every draw call
pub trait Surface {
    /// Sprite centered on `center`, rotated by `angle` degrees
    fn draw_sprite(&mut self, sprite: Sprite, center: Vec2, angle: f32, size: Vec2);

    /// Closed polygon outline
    fn draw_polygon(&mut self, points: &[Vec2], color: Color);

    /// Circle outline
    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color);

    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color);
}

/// Colors for map elements
pub mod colors {
    use super::Color;

    pub const HITBOX: Color = [0.18, 0.68, 0.18, 1.0];
    pub const TOWER_AREA: Color = [0.0, 0.0, 0.61, 1.0];
    pub const ROUTE: Color = [0.85, 0.85, 0.85, 0.6];
    /// Outline of the selected entity in editor sessions
    pub const SELECTION: Color = [1.0, 0.75, 0.1, 1.0];
}
