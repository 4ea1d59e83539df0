//! Interpolation and screen-space geometry helpers.
//!
//! [`Interpolate`] gives every per-vertex attribute the same two operations:
//! a linear blend between two values and a barycentric blend of three. The
//! rasterizer uses the first to clip lines and walk them, the second to fill
//! triangles.

use crate::colors::Color;
use crate::math::{Vec2, Vec3, Vec4};

use super::vertex::Vertex;

pub trait Interpolate: Sized {
    /// `(to - from) * t + from`, component-wise.
    fn lerp(self, to: Self, t: f32) -> Self;

    /// `a * w.x + b * w.y + c * w.z`, component-wise.
    fn barycentric(a: Self, b: Self, c: Self, weights: Vec3) -> Self;
}

impl Interpolate for f32 {
    #[inline]
    fn lerp(self, to: Self, t: f32) -> Self {
        (to - self) * t + self
    }

    #[inline]
    fn barycentric(a: Self, b: Self, c: Self, weights: Vec3) -> Self {
        a * weights.x + b * weights.y + c * weights.z
    }
}

impl Interpolate for Vec2 {
    #[inline]
    fn lerp(self, to: Self, t: f32) -> Self {
        Vec2::lerp(self, to, t)
    }

    #[inline]
    fn barycentric(a: Self, b: Self, c: Self, weights: Vec3) -> Self {
        Vec2::new(
            f32::barycentric(a.x, b.x, c.x, weights),
            f32::barycentric(a.y, b.y, c.y, weights),
        )
    }
}

impl Interpolate for Vec3 {
    #[inline]
    fn lerp(self, to: Self, t: f32) -> Self {
        Vec3::lerp(self, to, t)
    }

    #[inline]
    fn barycentric(a: Self, b: Self, c: Self, weights: Vec3) -> Self {
        Vec3::new(
            f32::barycentric(a.x, b.x, c.x, weights),
            f32::barycentric(a.y, b.y, c.y, weights),
            f32::barycentric(a.z, b.z, c.z, weights),
        )
    }
}

impl Interpolate for Vec4 {
    #[inline]
    fn lerp(self, to: Self, t: f32) -> Self {
        Vec4::lerp(self, to, t)
    }

    #[inline]
    fn barycentric(a: Self, b: Self, c: Self, weights: Vec3) -> Self {
        Vec4::new(
            f32::barycentric(a.x, b.x, c.x, weights),
            f32::barycentric(a.y, b.y, c.y, weights),
            f32::barycentric(a.z, b.z, c.z, weights),
            f32::barycentric(a.w, b.w, c.w, weights),
        )
    }
}

/// Colors blend per channel, never as a packed integer.
impl Interpolate for Color {
    #[inline]
    fn lerp(self, to: Self, t: f32) -> Self {
        Color::lerp(self, to, t)
    }

    #[inline]
    fn barycentric(a: Self, b: Self, c: Self, weights: Vec3) -> Self {
        Color::blend3(a, b, c, weights)
    }
}

impl Interpolate for Vertex {
    fn lerp(self, to: Self, t: f32) -> Self {
        Vertex {
            position: self.position.lerp(to.position, t),
            world_position: self.world_position.lerp(to.world_position, t),
            normal: self.normal.lerp(to.normal, t),
            uv: self.uv.lerp(to.uv, t),
            color: self.color.lerp(to.color, t),
        }
    }

    fn barycentric(a: Self, b: Self, c: Self, weights: Vec3) -> Self {
        Vertex {
            position: Vec4::barycentric(a.position, b.position, c.position, weights),
            world_position: Vec4::barycentric(
                a.world_position,
                b.world_position,
                c.world_position,
                weights,
            ),
            normal: Vec4::barycentric(a.normal, b.normal, c.normal, weights),
            uv: Vec2::barycentric(a.uv, b.uv, c.uv, weights),
            color: Color::barycentric(a.color, b.color, c.color, weights),
        }
    }
}

/// Signed value of the line through `start` and `end` evaluated at `p`.
///
/// Zero on the line; the sign tells which side `p` is on and the magnitude is
/// proportional to its distance from the line. Only x and y are used.
#[inline]
pub fn implicit_line_equation(start: Vec4, end: Vec4, p: Vec4) -> f32 {
    (start.y - end.y) * p.x + (end.x - start.x) * p.y + start.x * end.y - start.y * end.x
}

/// Barycentric weights of `p` with respect to triangle `(a, b, c)`.
///
/// Each weight is the ratio of `p`'s implicit-line value against the edge
/// opposite a vertex to that vertex's own value against the same edge. The
/// weights sum to one for any `p`; all three lie in `[0, 1]` exactly when
/// `p` is inside or on the triangle. A degenerate triangle yields non-finite
/// weights, so callers reject it first.
#[inline]
pub fn barycentric_coordinates(a: Vec4, b: Vec4, c: Vec4, p: Vec4) -> Vec3 {
    let max_a = implicit_line_equation(c, b, a);
    let max_b = implicit_line_equation(a, c, b);
    let max_c = implicit_line_equation(a, b, c);

    let sub_a = implicit_line_equation(c, b, p);
    let sub_b = implicit_line_equation(a, c, p);
    let sub_c = implicit_line_equation(a, b, p);

    Vec3::new(sub_a / max_a, sub_b / max_b, sub_c / max_c)
}

/// Twice the signed area of the screen-space triangle `(a, b, c)`.
#[inline]
pub fn signed_area(a: Vec4, b: Vec4, c: Vec4) -> f32 {
    implicit_line_equation(a, b, c)
}

/// Divide x, y and z by w in place. `w` itself is kept so callers still have
/// the view depth; a zero `w` leaves the position untouched.
#[inline]
pub fn perspective_divide(position: &mut Vec4) {
    if position.w != 0.0 {
        position.x /= position.w;
        position.y /= position.w;
        position.z /= position.w;
    }
}

/// Map NDC x/y in `[-1, 1]` to raster coordinates, y pointing down.
///
/// The scale is the integer half of the target size, so odd sizes lose their
/// last column or row at `x = 1` / `y = -1`.
#[inline]
pub fn ndc_to_raster(position: &mut Vec4, width: u32, height: u32) {
    position.x = (position.x + 1.0) * (width >> 1) as f32;
    position.y = (1.0 - position.y) * (height >> 1) as f32;
}
