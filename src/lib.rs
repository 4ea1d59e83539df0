//! A CPU software rasterizer.
//!
//! Geometry goes through a programmable vertex stage, is clipped, divided and
//! mapped to raster space, then filled pixel by pixel with perspective-correct
//! attributes, a programmable pixel stage and an optional depth test. Finished
//! frames go to a [`display::DisplaySink`] or to a PNG file.
//!
//! # Quick Start
//!
//! ```no_run
//! use pixelforge::prelude::*;
//!
//! let mut target = RenderTarget::new(64, 64);
//! let constants = ConstantBuffer::default();
//! let rasterizer = Rasterizer::new();
//!
//! let v = |x, y| Vertex::new(Vec4::new(x, y, 0.5, 1.0));
//! rasterizer.fill_triangle(&mut target, &constants, v(-0.5, -0.5), v(0.0, 0.5), v(0.5, -0.5));
//! ```

pub mod camera;
pub mod colors;
pub mod config;
pub mod display;
pub mod error;
pub mod light;
pub mod math;
pub mod output;
pub mod render;
pub mod texture;
#[cfg(feature = "window")]
pub mod window;

pub use error::PixelforgeError;

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use pixelforge::prelude::*;
/// ```
pub mod prelude {
    // Camera & lights
    pub use crate::camera::Camera;
    pub use crate::light::{DirectionalLight, PointLight};

    // Color & surfaces
    pub use crate::colors::Color;
    pub use crate::texture::{AddressMode, BlitRect, Texture2D};

    // Math
    pub use crate::math::{Mat4, Vec2, Vec3, Vec4};

    // Rendering
    pub use crate::render::{
        ConstantBuffer, DefaultVertexShader, Filter, LineClip, PixelStage, Rasterizer,
        RenderTarget, Vertex, VertexStage,
    };

    // Output
    pub use crate::config::RenderConfig;
    pub use crate::display::{DisplaySink, HeadlessSink};
    pub use crate::output::save_png;
}

/// Module exposing internals for benchmarking. Not part of the stable API.
pub mod bench {
    pub use crate::render::interpolate::barycentric_coordinates;
    pub use crate::render::lines::{draw_bresenham_line, draw_midpoint_line};
    pub use crate::texture::alpha_blend;
}
