//! Color and depth planes rendered into together.
//!
//! Depth follows the post-projection convention: 0.0 at the near plane, 1.0
//! at the far plane, smaller is closer. The test is less-or-equal, so a pixel
//! drawn twice at the same depth ends up with the later color.

use tracing::debug;

use crate::colors::Color;
use crate::texture::Texture2D;

/// Depth the planes reset to when nothing is specified.
pub const DEFAULT_CLEAR_DEPTH: f32 = 1.0;

pub struct RenderTarget {
    color: Texture2D<Color>,
    depth: Texture2D<f32>,
    depth_enable: bool,
}

impl RenderTarget {
    /// A target cleared to black at the far plane. Depth testing starts off.
    pub fn new(width: u32, height: u32) -> Self {
        debug!(width, height, "creating render target");
        Self {
            color: Texture2D::filled(width, height, Color::BLACK),
            depth: Texture2D::filled(width, height, DEFAULT_CLEAR_DEPTH),
            depth_enable: false,
        }
    }

    pub fn width(&self) -> u32 {
        self.color.width()
    }

    pub fn height(&self) -> u32 {
        self.color.height()
    }

    pub fn depth_enable(&self) -> bool {
        self.depth_enable
    }

    pub fn set_depth_enable(&mut self, enable: bool) {
        self.depth_enable = enable;
    }

    /// Write a pixel through the depth test.
    ///
    /// With depth testing on, color and depth are only written when `depth`
    /// is less than or equal to the stored value. With it off, only the color
    /// is written. Out of bounds coordinates are ignored.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color, depth: f32) {
        if !self.color.is_within_bounds(x, y) {
            return;
        }

        if self.depth_enable {
            if depth <= self.depth.get(x, y) {
                self.color.set(x, y, color);
                self.depth.set(x, y, depth);
            }
        } else {
            self.color.set(x, y, color);
        }
    }

    /// Reset both planes.
    pub fn clear(&mut self, color: Color, depth: f32) {
        self.color.clear(color);
        self.depth.clear(depth);
    }

    pub fn clear_color(&mut self, color: Color) {
        self.color.clear(color);
    }

    pub fn clear_depth(&mut self, depth: f32) {
        self.depth.clear(depth);
    }

    pub fn color_plane(&self) -> &Texture2D<Color> {
        &self.color
    }

    /// Mutable access to the color plane, for 2D work such as blits and
    /// unshaded lines that bypass the depth test.
    pub fn color_plane_mut(&mut self) -> &mut Texture2D<Color> {
        &mut self.color
    }

    pub fn depth_plane(&self) -> &Texture2D<f32> {
        &self.depth
    }

    /// Color plane as packed ARGB words, the layout display sinks consume.
    pub fn pixels_argb(&self) -> &[u32] {
        bytemuck::cast_slice(&self.color.as_slice()[..self.color.num_pixels()])
    }
}
