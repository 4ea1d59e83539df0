//! 2D line drawing directly on a color surface.
//!
//! These work in raster space with no transform, clipping or depth, and are
//! used for overlays and for comparing line algorithms. Out of bounds pixels
//! are dropped by the surface.

use crate::colors::Color;
use crate::math::{Vec2, Vec4};
use crate::texture::Texture2D;

use super::interpolate::implicit_line_equation;

/// A raster-space point with a color.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vertex2D {
    pub position: Vec2,
    pub color: Color,
}

impl Vertex2D {
    pub const fn new(x: f32, y: f32, color: Color) -> Self {
        Self {
            position: Vec2::new(x, y),
            color,
        }
    }
}

/// Draws a line between two points using Bresenham's line algorithm.
///
/// Bresenham's algorithm efficiently determines which pixels to illuminate
/// by using only integer arithmetic. It works by tracking an "error" term
/// that represents the distance between the ideal line and the current pixel.
///
/// The key insight: for each step along the major axis (the axis with greater
/// distance), we decide whether to also step along the minor axis based on
/// accumulated error. When the error exceeds a threshold, we step diagonally
/// instead of straight.
///
/// Both end points are drawn.
pub fn draw_bresenham_line(
    surface: &mut Texture2D<Color>,
    (x0, y0): (i32, i32),
    (x1, y1): (i32, i32),
    color: Color,
) {
    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();

    // +1 if we're moving in the positive direction, -1 if negative.
    let x_step = if x0 < x1 { 1 } else { -1 };
    let y_step = if y0 < y1 { 1 } else { -1 };

    // A positive error favors x movement, negative favors y.
    let mut err = dx - dy;
    let (mut x, mut y) = (x0, y0);

    loop {
        surface.set(x, y, color);

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;

        // Both conditions can hold, resulting in a diagonal step.
        if e2 > -dy {
            err -= dy;
            x += x_step;
        }
        if e2 < dx {
            err += dx;
            y += y_step;
        }
    }
}

/// Draws a line by testing the implicit line equation at the midpoint between
/// the two candidate pixels of each step.
///
/// End points are rounded to the nearest pixel first. Both are drawn.
pub fn draw_midpoint_line(surface: &mut Texture2D<Color>, start: Vec2, end: Vec2, color: Color) {
    let round = |v: Vec2| ((v.x + 0.5).floor() as i32, (v.y + 0.5).floor() as i32);
    let (mut a, mut b) = (round(start), round(end));
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;

    let point = |(x, y): (i32, i32)| Vec4::new(x as f32, y as f32, 0.0, 0.0);

    if dx.abs() >= dy.abs() {
        // x-major: always walk left to right.
        if a.0 > b.0 {
            std::mem::swap(&mut a, &mut b);
        }
        let y_step = if b.1 >= a.1 { 1 } else { -1 };
        let (pa, pb) = (point(a), point(b));
        let mut y = a.1;
        for x in a.0..=b.0 {
            surface.set(x, y, color);
            let mid = Vec4::new((x + 1) as f32, y as f32 + 0.5 * y_step as f32, 0.0, 0.0);
            if implicit_line_equation(pa, pb, mid) * (y_step as f32) < 0.0 {
                y += y_step;
            }
        }
    } else {
        // y-major: always walk top to bottom.
        if a.1 > b.1 {
            std::mem::swap(&mut a, &mut b);
        }
        let x_step = if b.0 >= a.0 { 1 } else { -1 };
        let (pa, pb) = (point(a), point(b));
        let mut x = a.0;
        for y in a.1..=b.1 {
            surface.set(x, y, color);
            let mid = Vec4::new(x as f32 + 0.5 * x_step as f32, (y + 1) as f32, 0.0, 0.0);
            if implicit_line_equation(pa, pb, mid) * (x_step as f32) > 0.0 {
                x += x_step;
            }
        }
    }
}

/// Walks the longer axis in `floor(max(|dx|, |dy|))` equal steps, rounding
/// each sample half-up and blending the two end colors per channel.
///
/// The end point itself is not drawn, matching the 3D line walk.
pub fn draw_parametric_line(surface: &mut Texture2D<Color>, start: Vertex2D, end: Vertex2D) {
    let (a, b) = (start.position, end.position);
    let steps = (b.x - a.x).abs().max((b.y - a.y).abs()) as i32;

    for i in 0..steps {
        let r = i as f32 / steps as f32;
        let p = a.lerp(b, r);
        let x = (p.x + 0.5).floor() as i32;
        let y = (p.y + 0.5).floor() as i32;
        surface.set(x, y, start.color.lerp(end.color, r));
    }
}
