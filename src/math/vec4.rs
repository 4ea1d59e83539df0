//! 4D vector for homogeneous coordinates.

use std::ops::{Add, Div, Index, IndexMut, Mul, Neg, Sub};

use approx::{AbsDiffEq, RelativeEq};

use super::vec3::Vec3;
use super::{is_equal, is_zero};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    pub const X_AXIS: Self = Self::new(1.0, 0.0, 0.0, 0.0);
    pub const Y_AXIS: Self = Self::new(0.0, 1.0, 0.0, 0.0);
    pub const Z_AXIS: Self = Self::new(0.0, 0.0, 1.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Create a point (w=1) from x, y, z coordinates.
    pub const fn point(x: f32, y: f32, z: f32) -> Self {
        Self::new(x, y, z, 1.0)
    }

    /// Create a direction vector (w=0) from x, y, z coordinates.
    pub const fn direction(x: f32, y: f32, z: f32) -> Self {
        Self::new(x, y, z, 0.0)
    }

    pub const fn from_array(e: [f32; 4]) -> Self {
        Self::new(e[0], e[1], e[2], e[3])
    }

    pub const fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }

    /// Convert to Vec3, discarding w.
    pub const fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Component-wise comparison within [`EPSILON`](super::EPSILON).
    pub fn is_equal(&self, other: Self) -> bool {
        is_equal(self.x, other.x)
            && is_equal(self.y, other.y)
            && is_equal(self.z, other.z)
            && is_equal(self.w, other.w)
    }

    pub fn is_zero(&self) -> bool {
        is_zero(self.x) && is_zero(self.y) && is_zero(self.z) && is_zero(self.w)
    }

    pub fn length_squared(&self) -> f32 {
        self.dot(*self)
    }

    pub fn magnitude(&self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Normalizes all four components. A (near) zero vector yields zero.
    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if is_zero(mag) {
            return Self::ZERO;
        }
        *self / mag
    }

    /// Four-component dot product.
    pub fn dot(&self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Three-component cross product; the result is a direction (w=0).
    pub fn cross(&self, other: Self) -> Self {
        Self::direction(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn scale(&self, scalar: f32) -> Self {
        Self::new(
            self.x * scalar,
            self.y * scalar,
            self.z * scalar,
            self.w * scalar,
        )
    }

    /// Divides every component by w. Returns zero when w is (near) zero.
    pub fn homogenise(&self) -> Self {
        if is_zero(self.w) {
            return Self::ZERO;
        }
        *self / self.w
    }

    pub fn max(self, other: Self) -> Self {
        Self::new(
            self.x.max(other.x),
            self.y.max(other.y),
            self.z.max(other.z),
            self.w.max(other.w),
        )
    }

    pub fn min(self, other: Self) -> Self {
        Self::new(
            self.x.min(other.x),
            self.y.min(other.y),
            self.z.min(other.z),
            self.w.min(other.w),
        )
    }

    pub fn average(self, other: Self) -> Self {
        (self + other) / 2.0
    }

    /// Angle between two vectors in degrees.
    pub fn angle_between(&self, other: Self) -> f32 {
        let denom = self.magnitude() * other.magnitude();
        if is_zero(denom) {
            return 0.0;
        }
        (self.dot(other) / denom).clamp(-1.0, 1.0).acos().to_degrees()
    }

    /// Signed length of `self` along the direction of `other`.
    pub fn component(&self, other: Self) -> f32 {
        if self.is_zero() || other.is_zero() {
            return 0.0;
        }
        self.dot(other.normalize())
    }

    /// Projection of `self` onto `other`.
    pub fn project(&self, other: Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::ZERO;
        }
        other.normalize() * self.component(other)
    }

    /// Reflection of `self` across the axis `other`. A zero axis yields `-self`.
    pub fn reflect(&self, other: Self) -> Self {
        let n = other.normalize();
        n * (2.0 * self.dot(n)) - *self
    }

    /// Linearly interpolate between two vectors.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
            self.z + (other.z - self.z) * t,
            self.w + (other.w - self.w) * t,
        )
    }
}

impl Add<Vec4> for Vec4 {
    type Output = Vec4;

    fn add(self, rhs: Vec4) -> Self::Output {
        Self::new(
            self.x + rhs.x,
            self.y + rhs.y,
            self.z + rhs.z,
            self.w + rhs.w,
        )
    }
}

impl Sub<Vec4> for Vec4 {
    type Output = Vec4;

    fn sub(self, rhs: Vec4) -> Self::Output {
        Self::new(
            self.x - rhs.x,
            self.y - rhs.y,
            self.z - rhs.z,
            self.w - rhs.w,
        )
    }
}

impl Mul<f32> for Vec4 {
    type Output = Vec4;

    fn mul(self, rhs: f32) -> Self::Output {
        self.scale(rhs)
    }
}

impl Div<f32> for Vec4 {
    type Output = Vec4;

    fn div(self, rhs: f32) -> Self::Output {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs, self.w / rhs)
    }
}

impl Neg for Vec4 {
    type Output = Vec4;

    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z, -self.w)
    }
}

impl Index<usize> for Vec4 {
    type Output = f32;

    fn index(&self, index: usize) -> &f32 {
        match index {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            3 => &self.w,
            _ => panic!("Vec4 index out of range: {index}"),
        }
    }
}

impl IndexMut<usize> for Vec4 {
    fn index_mut(&mut self, index: usize) -> &mut f32 {
        match index {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            3 => &mut self.w,
            _ => panic!("Vec4 index out of range: {index}"),
        }
    }
}

impl From<Vec3> for Vec4 {
    /// Convert Vec3 to Vec4 as a point (w=1).
    fn from(v: Vec3) -> Self {
        Self::point(v.x, v.y, v.z)
    }
}

impl AbsDiffEq for Vec4 {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        (0..4).all(|i| self[i].abs_diff_eq(&other[i], epsilon))
    }
}

impl RelativeEq for Vec4 {
    fn default_max_relative() -> f32 {
        f32::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        (0..4).all(|i| self[i].relative_eq(&other[i], epsilon, max_relative))
    }
}
