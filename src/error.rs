//! Error types.
//!
//! The geometric core never fails: out-of-bounds access is ignored and
//! degenerate primitives are skipped. These errors cover surface contract
//! violations and the peripheral collaborators (display, image output).

#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("surface size mismatch: destination has {expected} pixels, source has {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("invalid mip chain: {0}")]
    InvalidMipChain(String),
}

#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    #[error("display init error: {0}")]
    Init(String),

    #[error("display present error: {0}")]
    Present(String),

    #[error("failed to spawn presentation thread: {0}")]
    ThreadSpawn(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("cannot save an empty surface")]
    EmptySurface,

    #[error("image encode error: {0}")]
    Encode(#[from] image::ImageError),
}

#[derive(Debug, thiserror::Error)]
pub enum PixelforgeError {
    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error(transparent)]
    Display(#[from] DisplayError),

    #[error(transparent)]
    Output(#[from] OutputError),
}
