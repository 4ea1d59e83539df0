//! Render settings for the demo binary and headless runs.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::colors::Color;
use crate::render::Filter;
use crate::texture::AddressMode;

pub const DEFAULT_WIDTH: u32 = 500;
pub const DEFAULT_HEIGHT: u32 = 500;
pub const DEFAULT_FRAMES: usize = 60;
pub const DEFAULT_OUTPUT: &str = "pixelforge.png";

/// Environment variable overriding [`RenderConfig::frames`].
pub const FRAMES_VAR: &str = "PIXELFORGE_FRAMES";
/// Environment variable overriding [`RenderConfig::output`].
pub const OUTPUT_VAR: &str = "PIXELFORGE_OUTPUT";

#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub depth_test: bool,
    pub clear_color: Color,
    pub clear_depth: f32,
    pub address_mode: AddressMode,
    pub filter: Filter,
    /// Frames rendered before a headless sink stops.
    pub frames: usize,
    /// Where the last frame is saved as PNG.
    pub output: PathBuf,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            depth_test: true,
            clear_color: Color::BLACK,
            clear_depth: 1.0,
            address_mode: AddressMode::Clamp,
            filter: Filter::Bilinear,
            frames: DEFAULT_FRAMES,
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

impl RenderConfig {
    /// Defaults overridden by `PIXELFORGE_FRAMES` and `PIXELFORGE_OUTPUT`.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key/value source. Unparsable values are
    /// logged and ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(frames) = lookup(FRAMES_VAR) {
            match frames.trim().parse::<usize>() {
                Ok(frames) => {
                    debug!(frames, "frame count override");
                    self.frames = frames;
                }
                Err(e) => warn!(value = %frames, error = %e, "ignoring {FRAMES_VAR}"),
            }
        }

        if let Some(output) = lookup(OUTPUT_VAR) {
            let output = output.trim();
            if output.is_empty() {
                warn!("ignoring empty {OUTPUT_VAR}");
            } else {
                debug!(output, "output path override");
                self.output = PathBuf::from(output);
            }
        }

        self
    }
}
