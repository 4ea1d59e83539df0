//! Near-plane clipping of lines in clip space.
//!
//! With the projection used here, clip-space z is 0 on the near plane and
//! negative behind it, so the test needs no w comparison.

use crate::render::interpolate::Interpolate;
use crate::render::vertex::Vertex;

/// How a line relates to the near plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClip {
    /// Both ends are behind the near plane; nothing to draw.
    Hidden,
    /// One end was behind the near plane and has been moved onto it.
    OneClipped,
    /// Both ends are in front of the near plane; nothing changed.
    BothPresent,
}

impl LineClip {
    pub fn is_visible(self) -> bool {
        self != LineClip::Hidden
    }
}

/// Clips the segment `a`-`b` against the near plane in place.
///
/// When exactly one end is behind, every attribute of that end is moved
/// toward the other by `|z_behind| / |z_a - z_b|`, which puts it at z = 0.
pub fn near_plane_clip(a: &mut Vertex, b: &mut Vertex) -> LineClip {
    let a_behind = a.position.z < 0.0;
    let b_behind = b.position.z < 0.0;

    match (a_behind, b_behind) {
        (true, true) => LineClip::Hidden,
        (false, false) => LineClip::BothPresent,
        (true, false) => {
            let t = a.position.z.abs() / (b.position.z - a.position.z).abs();
            *a = a.lerp(*b, t);
            LineClip::OneClipped
        }
        (false, true) => {
            let t = b.position.z.abs() / (a.position.z - b.position.z).abs();
            *b = b.lerp(*a, t);
            LineClip::OneClipped
        }
    }
}
