//! 2D pixel surfaces with an optional mip chain.
//!
//! A [`Texture2D`] owns one contiguous buffer. Level 0 occupies the first
//! `width * height` elements; further mip levels live in the same buffer at
//! the offsets recorded in the level table. Offsets are only ever resolved
//! through [`MipLevel`], so shading code never does index arithmetic.
//!
//! Out-of-bounds reads return `T::default()` and out-of-bounds writes are
//! ignored. Rasterization probes pixels near the border all the time, so this
//! is a policy, not an error.

use crate::colors::Color;
use crate::error::SurfaceError;
use crate::math::Vec2;

/// How texel coordinates outside a level are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressMode {
    /// Coordinates stick to the nearest edge texel.
    #[default]
    Clamp,
    /// Coordinates repeat.
    Wrap,
    /// Coordinates repeat, every other tile flipped.
    Mirror,
}

impl AddressMode {
    /// Maps `coord` into `[0, size)`.
    #[inline]
    pub fn resolve(self, coord: i32, size: u32) -> i32 {
        let size = size.max(1) as i32;
        match self {
            AddressMode::Clamp => coord.clamp(0, size - 1),
            AddressMode::Wrap => coord.rem_euclid(size),
            AddressMode::Mirror => {
                let m = coord.rem_euclid(size * 2);
                if m < size {
                    m
                } else {
                    2 * size - 1 - m
                }
            }
        }
    }
}

/// A source sub-rectangle for [`Texture2D::blit`]. `right` and `bottom` are
/// exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlitRect {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl BlitRect {
    pub const fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Texture2D<T> {
    pixels: Vec<T>,
    width: u32,
    height: u32,
    mip_offsets: Vec<usize>,
}

impl<T: Copy + Default> Texture2D<T> {
    /// A single-level surface filled with `T::default()`.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, T::default())
    }

    pub fn filled(width: u32, height: u32, value: T) -> Self {
        Self {
            pixels: vec![value; width as usize * height as usize],
            width,
            height,
            mip_offsets: vec![0],
        }
    }

    /// A single-level surface over existing pixel data.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<T>) -> Result<Self, SurfaceError> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(SurfaceError::SizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            pixels,
            width,
            height,
            mip_offsets: vec![0],
        })
    }

    /// A surface whose buffer holds a full mip chain. Level `i` starts at
    /// `mip_offsets[i]` and is `(width >> i) x (height >> i)` (at least 1x1).
    pub fn with_mips(
        width: u32,
        height: u32,
        mip_offsets: Vec<usize>,
        pixels: Vec<T>,
    ) -> Result<Self, SurfaceError> {
        if mip_offsets.is_empty() {
            return Err(SurfaceError::InvalidMipChain("no levels".into()));
        }
        for (level, &offset) in mip_offsets.iter().enumerate() {
            let (w, h) = level_dimensions(width, height, level as u32);
            let end = offset + w as usize * h as usize;
            if end > pixels.len() {
                return Err(SurfaceError::InvalidMipChain(format!(
                    "level {level} ends at {end}, buffer holds {}",
                    pixels.len()
                )));
            }
        }
        Ok(Self {
            pixels,
            width,
            height,
            mip_offsets,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel count of level 0.
    pub fn num_pixels(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn mip_levels(&self) -> u32 {
        self.mip_offsets.len() as u32
    }

    pub fn as_slice(&self) -> &[T] {
        &self.pixels
    }

    #[inline]
    pub fn is_within_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && (x as u32) < self.width && y >= 0 && (y as u32) < self.height
    }

    /// Read a level-0 pixel, `T::default()` when out of bounds.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> T {
        if self.is_within_bounds(x, y) {
            self.pixels[y as usize * self.width as usize + x as usize]
        } else {
            T::default()
        }
    }

    /// Write a level-0 pixel. Out of bounds writes are ignored.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, value: T) {
        if self.is_within_bounds(x, y) {
            self.pixels[y as usize * self.width as usize + x as usize] = value;
        }
    }

    /// Read any element of the flat buffer, `T::default()` past the end.
    #[inline]
    pub fn at(&self, index: usize) -> T {
        self.pixels.get(index).copied().unwrap_or_default()
    }

    /// Fill the whole buffer, mip levels included.
    pub fn clear(&mut self, value: T) {
        self.pixels.fill(value);
    }

    /// Exact element-wise copy from a surface with the same pixel count.
    ///
    /// On mismatch nothing is written.
    pub fn copy_from(&mut self, other: &Texture2D<T>) -> Result<(), SurfaceError> {
        if self.pixels.len() != other.pixels.len() {
            return Err(SurfaceError::SizeMismatch {
                expected: self.pixels.len(),
                actual: other.pixels.len(),
            });
        }
        self.pixels.copy_from_slice(&other.pixels);
        Ok(())
    }

    /// View of one mip level, `None` when the level does not exist.
    pub fn mip_level(&self, level: u32) -> Option<MipLevel<'_, T>> {
        let offset = *self.mip_offsets.get(level as usize)?;
        let (width, height) = level_dimensions(self.width, self.height, level);
        let end = offset + width as usize * height as usize;
        Some(MipLevel {
            level,
            width,
            height,
            texels: &self.pixels[offset..end],
        })
    }

    /// Like [`mip_level`](Self::mip_level) but clamps to the last level.
    pub fn mip_level_clamped(&self, level: u32) -> MipLevel<'_, T> {
        let level = level.min(self.mip_levels().saturating_sub(1));
        let offset = self.mip_offsets[level as usize];
        let (width, height) = level_dimensions(self.width, self.height, level);
        MipLevel {
            level,
            width,
            height,
            texels: &self.pixels[offset..offset + width as usize * height as usize],
        }
    }
}

/// Dimensions of `level`, never below 1x1.
pub fn level_dimensions(width: u32, height: u32, level: u32) -> (u32, u32) {
    let w = width.checked_shr(level).unwrap_or(0).max(1);
    let h = height.checked_shr(level).unwrap_or(0).max(1);
    (w, h)
}

/// Read-only view of a single mip level.
#[derive(Debug, Clone, Copy)]
pub struct MipLevel<'a, T> {
    level: u32,
    width: u32,
    height: u32,
    texels: &'a [T],
}

impl<T: Copy + Default> MipLevel<'_, T> {
    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Texel at `(x, y)`, `T::default()` outside the level.
    #[inline]
    pub fn texel(&self, x: i32, y: i32) -> T {
        if x >= 0 && (x as u32) < self.width && y >= 0 && (y as u32) < self.height {
            self.texels[y as usize * self.width as usize + x as usize]
        } else {
            T::default()
        }
    }

    /// Texel at `(x, y)` after resolving the coordinates with `mode`.
    #[inline]
    pub fn fetch(&self, x: i32, y: i32, mode: AddressMode) -> T {
        self.texel(
            mode.resolve(x, self.width),
            mode.resolve(y, self.height),
        )
    }
}

impl MipLevel<'_, Color> {
    /// Nearest texel for a continuous uv.
    pub fn sample_nearest(&self, uv: Vec2, mode: AddressMode) -> Color {
        let x = (uv.x * self.width as f32).floor() as i32;
        let y = (uv.y * self.height as f32).floor() as i32;
        self.fetch(x, y, mode)
    }

    /// Bilinear blend of the 2x2 neighborhood whose top-left texel holds `uv`.
    pub fn sample_bilinear(&self, uv: Vec2, mode: AddressMode) -> Color {
        let x = uv.x * self.width as f32;
        let y = uv.y * self.height as f32;
        let (x0, y0) = (x.floor(), y.floor());
        let (fx, fy) = (x - x0, y - y0);
        let (x0, y0) = (x0 as i32, y0 as i32);

        // Far-out uv saturates to i32::MAX; the neighbor must not overflow.
        let (x1, y1) = (x0.saturating_add(1), y0.saturating_add(1));

        let top_left = self.fetch(x0, y0, mode);
        let top_right = self.fetch(x1, y0, mode);
        let bottom_left = self.fetch(x0, y1, mode);
        let bottom_right = self.fetch(x1, y1, mode);

        let top = top_left.lerp(top_right, fx);
        let bottom = bottom_left.lerp(bottom_right, fx);
        top.lerp(bottom, fy)
    }
}

impl Texture2D<Color> {
    /// Wrap BGRA-ordered pixel data (the atlas wire format) as a color surface.
    pub fn from_bgra(
        width: u32,
        height: u32,
        mip_offsets: Vec<usize>,
        bgra: &[u32],
    ) -> Result<Self, SurfaceError> {
        let pixels = bgra.iter().map(|&p| Color::from_bgra(p)).collect();
        Self::with_mips(width, height, mip_offsets, pixels)
    }

    /// Alpha-composite a block of a BGRA source onto this surface.
    ///
    /// `source_width` is the stride of `source` in pixels. Each channel
    /// becomes `(src * alpha + dst * (255 - alpha)) / 255`. Destination pixels
    /// outside the surface and source pixels outside `source` are skipped.
    pub fn blit(
        &mut self,
        source: &[u32],
        source_width: u32,
        rect: BlitRect,
        dst_x: i32,
        dst_y: i32,
    ) {
        for y in 0..rect.height() {
            for x in 0..rect.width() {
                let (Some(px), Some(py)) =
                    (dst_x.checked_add(x as i32), dst_y.checked_add(y as i32))
                else {
                    continue;
                };
                if !self.is_within_bounds(px, py) {
                    continue;
                }

                let src_index =
                    (rect.top + y) as usize * source_width as usize + (rect.left + x) as usize;
                let Some(&src) = source.get(src_index) else {
                    continue;
                };

                let src = Color::from_bgra(src);
                let dst = self.get(px, py);
                self.set(px, py, alpha_blend(src, dst));
            }
        }
    }

    /// Builds a surface holding `self`'s level 0 plus a full chain of 2x2
    /// box-filtered levels down to 1x1.
    pub fn generate_mips(&self) -> Texture2D<Color> {
        let mut offsets = vec![0];
        let mut pixels: Vec<Color> = self.pixels[..self.num_pixels()].to_vec();

        let (mut prev_w, mut prev_h) = (self.width.max(1), self.height.max(1));
        let mut prev_offset = 0;
        let mut level = 0;
        while prev_w > 1 || prev_h > 1 {
            level += 1;
            let (w, h) = level_dimensions(self.width, self.height, level);
            let offset = pixels.len();
            for y in 0..h {
                for x in 0..w {
                    let mut sum = [0u32; 4];
                    for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
                        let sx = (2 * x + dx).min(prev_w - 1);
                        let sy = (2 * y + dy).min(prev_h - 1);
                        let c = pixels[prev_offset + (sy * prev_w + sx) as usize].channels();
                        for i in 0..4 {
                            sum[i] += c[i] as u32;
                        }
                    }
                    pixels.push(Color::from_channels(sum.map(|s| (s / 4) as u8)));
                }
            }
            offsets.push(offset);
            prev_offset = offset;
            (prev_w, prev_h) = (w, h);
        }

        Texture2D {
            pixels,
            width: self.width,
            height: self.height,
            mip_offsets: offsets,
        }
    }
}

/// `(src * a + dst * (255 - a)) / 255` on every channel, alpha included.
#[inline]
pub fn alpha_blend(src: Color, dst: Color) -> Color {
    let alpha = src.a() as u32;
    let s = src.channels();
    let d = dst.channels();
    Color::from_channels(std::array::from_fn(|i| {
        ((s[i] as u32 * alpha + d[i] as u32 * (255 - alpha)) / 255) as u8
    }))
}
