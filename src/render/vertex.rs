use crate::colors::Color;
use crate::math::{Vec2, Vec4};

/// A vertex as it flows through the pipeline.
///
/// `position` starts in object space and is rewritten to clip space by the
/// vertex stage. `world_position` is filled in by the vertex stage for
/// lighting that needs a world-space point.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vertex {
    pub position: Vec4,
    pub world_position: Vec4,
    /// Direction, `w = 0`.
    pub normal: Vec4,
    pub uv: Vec2,
    pub color: Color,
}

impl Vertex {
    /// A white vertex at `position` with no normal or uv.
    pub fn new(position: Vec4) -> Self {
        Self {
            position,
            color: Color::WHITE,
            ..Default::default()
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_uv(mut self, uv: Vec2) -> Self {
        self.uv = uv;
        self
    }

    pub fn with_normal(mut self, normal: Vec4) -> Self {
        self.normal = normal;
        self
    }
}
