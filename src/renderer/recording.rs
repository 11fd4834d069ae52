//! In-memory surface
//!
//! Captures draw calls instead of rasterizing them. The headless binary
//! draws every frame into one, and tests use it to assert draw order.

use glam::Vec2;

use super::{Color, Sprite, Surface};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Sprite {
        sprite: Sprite,
        center: Vec2,
        angle: f32,
        size: Vec2,
    },
    Polygon {
        points: Vec<Vec2>,
        color: Color,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Line {
        from: Vec2,
        to: Vec2,
        color: Color,
    },
}

#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Sprites drawn so far, in draw order
    pub fn sprites(&self) -> impl Iterator<Item = (Sprite, Vec2)> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Sprite { sprite, center, .. } => Some((*sprite, *center)),
            _ => None,
        })
    }
}

impl Surface for RecordingSurface {
    fn draw_sprite(&mut self, sprite: Sprite, center: Vec2, angle: f32, size: Vec2) {
        self.commands.push(DrawCommand::Sprite {
            sprite,
            center,
            angle,
            size,
        });
    }

    fn draw_polygon(&mut self, points: &[Vec2], color: Color) {
        self.commands.push(DrawCommand::Polygon {
            points: points.to_vec(),
            color,
        });
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color) {
        self.commands.push(DrawCommand::Line { from, to, color });
    }
}
