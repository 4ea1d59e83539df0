//! Packed 32-bit color.
//!
//! [`Color`] stores **ARGB** (alpha in the high byte, blue in the low byte),
//! the layout of render targets and of the presented XRGB frame. Sprite atlases
//! arrive in **BGRA** order (blue in the high byte, alpha in the low byte); the
//! only way between the two is [`Color::from_bgra`] / [`Color::to_bgra`].

use bytemuck::{Pod, Zeroable};

use crate::math::Vec3;

#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Color(u32);

impl Color {
    pub const TRANSPARENT: Color = Color(0x0000_0000);
    pub const BLACK: Color = Color(0xff00_0000);
    pub const WHITE: Color = Color(0xffff_ffff);
    pub const RED: Color = Color(0xffff_0000);
    pub const GREEN: Color = Color(0xff00_ff00);
    pub const BLUE: Color = Color(0xff00_00ff);
    pub const YELLOW: Color = Color(0xffff_ff00);
    pub const MAGENTA: Color = Color(0xffff_00ff);
    pub const CYAN: Color = Color(0xff00_ffff);
    pub const PURPLE: Color = Color(0xff8a_2be2);

    pub const fn from_argb(argb: u32) -> Self {
        Color(argb)
    }

    pub const fn argb(self) -> u32 {
        self.0
    }

    pub const fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color((a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    /// Opaque color from red, green and blue.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba(r, g, b, 0xff)
    }

    /// Decode a BGRA-ordered pixel (blue high byte, alpha low byte).
    pub const fn from_bgra(bgra: u32) -> Self {
        let b = (bgra >> 24) as u8;
        let g = (bgra >> 16) as u8;
        let r = (bgra >> 8) as u8;
        let a = bgra as u8;
        Self::from_rgba(r, g, b, a)
    }

    /// Encode as BGRA (blue high byte, alpha low byte).
    pub const fn to_bgra(self) -> u32 {
        (self.b() as u32) << 24 | (self.g() as u32) << 16 | (self.r() as u32) << 8 | self.a() as u32
    }

    #[inline]
    pub const fn a(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn b(self) -> u8 {
        self.0 as u8
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self::from_rgba(self.r(), self.g(), self.b(), a)
    }

    /// Channels as `[a, r, g, b]`.
    #[inline]
    pub const fn channels(self) -> [u8; 4] {
        [self.a(), self.r(), self.g(), self.b()]
    }

    #[inline]
    pub const fn from_channels(c: [u8; 4]) -> Self {
        Self::from_rgba(c[1], c[2], c[3], c[0])
    }

    /// Per-channel linear blend toward `other`; fractional results truncate.
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let a = self.channels();
        let b = other.channels();
        Color::from_channels(std::array::from_fn(|i| {
            let (s, e) = (a[i] as f32, b[i] as f32);
            ((e - s) * t + s) as u8
        }))
    }

    /// Per-channel barycentric blend of three colors.
    pub fn blend3(c0: Color, c1: Color, c2: Color, weights: Vec3) -> Color {
        let (a, b, c) = (c0.channels(), c1.channels(), c2.channels());
        Color::from_channels(std::array::from_fn(|i| {
            (a[i] as f32 * weights.x + b[i] as f32 * weights.y + c[i] as f32 * weights.z) as u8
        }))
    }

    /// Per-channel product in normalized space.
    pub fn modulate(self, other: Color) -> Color {
        let a = self.channels();
        let b = other.channels();
        Color::from_channels(std::array::from_fn(|i| {
            (a[i] as f32 / 255.0 * (b[i] as f32 / 255.0) * 255.0) as u8
        }))
    }

    /// Per-channel sum, saturated at full intensity.
    pub fn combine(self, other: Color) -> Color {
        let a = self.channels();
        let b = other.channels();
        Color::from_channels(std::array::from_fn(|i| a[i].saturating_add(b[i])))
    }
}

impl From<u32> for Color {
    fn from(argb: u32) -> Self {
        Color::from_argb(argb)
    }
}

impl From<Color> for u32 {
    fn from(color: Color) -> Self {
        color.argb()
    }
}
