//! Programmable shading stages.
//!
//! This module provides a trait-based abstraction for per-vertex and per-pixel
//! computations, similar to how GPUs separate the fixed-function rasterizer
//! from programmable vertex and fragment shaders.
//!
//! # Architecture
//!
//! The rasterizer handles:
//! - Perspective divide and viewport mapping
//! - Bounding box computation and inside testing
//! - Barycentric and perspective-correct attribute interpolation
//! - Depth testing
//!
//! The stages handle:
//! - Object to clip space transformation ([`VertexStage`])
//! - Texture sampling and lighting ([`PixelStage`])
//!
//! Everything a stage may read lives in the [`ConstantBuffer`] passed to each
//! draw call. Stages never hold global state, and plain closures with the
//! right signature are stages too.

use crate::camera::Camera;
use crate::colors::Color;
use crate::light::{DirectionalLight, PointLight};
use crate::math::{Mat4, Vec3};
use crate::texture::{AddressMode, Texture2D};

use super::vertex::Vertex;

/// Texture lookup used by the lit shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    Nearest,
    #[default]
    Bilinear,
}

/// Per-draw shading configuration. Read-only while a draw call runs.
#[derive(Debug, Clone, Copy)]
pub struct ConstantBuffer<'a> {
    /// Object to world transform.
    pub world: Mat4,
    pub camera: Camera,
    pub texture: Option<&'a Texture2D<Color>>,
    pub filter: Filter,
    pub address_mode: AddressMode,
    pub light: DirectionalLight,
    pub point_light: PointLight,
}

impl Default for ConstantBuffer<'_> {
    fn default() -> Self {
        Self {
            world: Mat4::identity(),
            camera: Camera::default(),
            texture: None,
            filter: Filter::default(),
            address_mode: AddressMode::default(),
            light: DirectionalLight::default(),
            point_light: PointLight::default(),
        }
    }
}

impl<'a> ConstantBuffer<'a> {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            ..Self::default()
        }
    }

    pub fn with_world(mut self, world: Mat4) -> Self {
        self.world = world;
        self
    }

    pub fn with_texture(mut self, texture: &'a Texture2D<Color>) -> Self {
        self.texture = Some(texture);
        self
    }

    /// Mip level for a pixel at normalized device `depth`.
    ///
    /// Depth in `[0, 1]` is scaled linearly across the bound texture's levels.
    /// This is a distance heuristic, not a screen-space derivative.
    pub fn mip_level_for_depth(&self, depth: f32) -> u32 {
        let Some(texture) = self.texture else {
            return 0;
        };
        let levels = texture.mip_levels();
        let level = (depth.clamp(0.0, 1.0) * levels as f32) as u32;
        level.min(levels.saturating_sub(1))
    }
}

/// What the rasterizer knows about a pixel when it calls the pixel stage.
#[derive(Debug, Clone, Copy)]
pub struct PixelInput {
    /// Raster coordinates.
    pub x: i32,
    pub y: i32,
    /// The vertex interpolated at this pixel, with perspective-correct uv.
    pub vertex: Vertex,
    pub barycentrics: Vec3,
    /// Mip level chosen from this pixel's depth.
    pub mip_level: u32,
}

/// Transforms one vertex in place, object space in, clip space out.
pub trait VertexStage {
    fn shade(&self, constants: &ConstantBuffer<'_>, vertex: &mut Vertex);
}

impl<F> VertexStage for F
where
    F: Fn(&ConstantBuffer<'_>, &mut Vertex),
{
    #[inline]
    fn shade(&self, constants: &ConstantBuffer<'_>, vertex: &mut Vertex) {
        self(constants, vertex)
    }
}

/// Computes a pixel's color. `color` arrives holding the interpolated vertex
/// color and leaves holding the value written to the target.
pub trait PixelStage {
    fn shade(&self, constants: &ConstantBuffer<'_>, input: &PixelInput, color: &mut Color);
}

impl<F> PixelStage for F
where
    F: Fn(&ConstantBuffer<'_>, &PixelInput, &mut Color),
{
    #[inline]
    fn shade(&self, constants: &ConstantBuffer<'_>, input: &PixelInput, color: &mut Color) {
        self(constants, input, color)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Vertex stages
// ─────────────────────────────────────────────────────────────────────────────

/// Object → world → view → projection.
///
/// The normal goes through the world matrix only, which is exact for
/// rotations and uniform scale.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultVertexShader;

impl VertexStage for DefaultVertexShader {
    fn shade(&self, constants: &ConstantBuffer<'_>, vertex: &mut Vertex) {
        let world = vertex.position * constants.world;
        vertex.world_position = world;
        vertex.normal = vertex.normal * constants.world;
        vertex.position = world * constants.camera.view() * constants.camera.projection();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Pixel stages
// ─────────────────────────────────────────────────────────────────────────────

/// Keeps the interpolated vertex color.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatColorShader;

impl PixelStage for FlatColorShader {
    #[inline]
    fn shade(&self, _constants: &ConstantBuffer<'_>, _input: &PixelInput, _color: &mut Color) {}
}

/// Writes one constant color, for debugging coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolidColorShader(pub Color);

impl SolidColorShader {
    pub const WHITE: Self = Self(Color::WHITE);
    pub const RED: Self = Self(Color::RED);
    pub const GREEN: Self = Self(Color::GREEN);
    pub const BLUE: Self = Self(Color::BLUE);
    pub const PURPLE: Self = Self(Color::PURPLE);
}

impl PixelStage for SolidColorShader {
    #[inline]
    fn shade(&self, _constants: &ConstantBuffer<'_>, _input: &PixelInput, color: &mut Color) {
        *color = self.0;
    }
}

/// Nearest texel from level 0 of the bound texture.
///
/// Without a texture the interpolated color passes through.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextureShader;

impl PixelStage for TextureShader {
    fn shade(&self, constants: &ConstantBuffer<'_>, input: &PixelInput, color: &mut Color) {
        if let Some(texture) = constants.texture {
            *color = texture
                .mip_level_clamped(0)
                .sample_nearest(input.vertex.uv, constants.address_mode);
        }
    }
}

/// Bilinear sample from the mip level selected for this pixel.
#[derive(Debug, Clone, Copy, Default)]
pub struct MipTextureShader;

impl PixelStage for MipTextureShader {
    fn shade(&self, constants: &ConstantBuffer<'_>, input: &PixelInput, color: &mut Color) {
        if let Some(texture) = constants.texture {
            *color = texture
                .mip_level_clamped(input.mip_level)
                .sample_bilinear(input.vertex.uv, constants.address_mode);
        }
    }
}

/// Texture (or vertex color) modulated by a directional light plus a point
/// light with quadratic radius falloff.
#[derive(Debug, Clone, Copy, Default)]
pub struct LitShader;

impl PixelStage for LitShader {
    fn shade(&self, constants: &ConstantBuffer<'_>, input: &PixelInput, color: &mut Color) {
        let vertex = &input.vertex;

        let albedo = match constants.texture {
            Some(texture) => {
                let level = texture.mip_level_clamped(input.mip_level);
                match constants.filter {
                    Filter::Nearest => level.sample_nearest(vertex.uv, constants.address_mode),
                    Filter::Bilinear => level.sample_bilinear(vertex.uv, constants.address_mode),
                }
            }
            None => *color,
        };

        let normal = vertex.normal.normalize();
        let directional = constants.light.shade(normal);
        let point = constants.point_light.shade(vertex.world_position, normal);

        *color = albedo.modulate(directional.combine(point));
    }
}
