//! The rendering pipeline: render target, interpolation, rasterization and
//! shading stages.

pub mod interpolate;
pub mod lines;
pub mod rasterizer;
pub mod shader;
pub mod target;
pub mod vertex;

pub use lines::Vertex2D;
pub use rasterizer::{LineClip, Rasterizer};
pub use shader::{
    ConstantBuffer, DefaultVertexShader, Filter, FlatColorShader, LitShader, MipTextureShader,
    PixelInput, PixelStage, SolidColorShader, TextureShader, VertexStage,
};
pub use target::RenderTarget;
pub use vertex::Vertex;
