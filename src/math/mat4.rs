//! 4x4 transformation matrix stored row-major.
//!
//! # Convention
//! - Vectors are **row vectors** on the left: `v * Mat4`
//! - Translation is stored in the **last row**
//! - Transforms chain **left-to-right**: `v * A * B` applies A first, then B
//!
//! # Example
//! ```ignore
//! let world = Mat4::rotation_y(angle) * Mat4::translation(0.0, 0.0, 2.0);
//! let world_pos = vertex * world; // rotate, then translate
//! ```

use std::ops::{Add, Index, IndexMut, Mul, Neg, Sub};

use approx::{AbsDiffEq, RelativeEq};

use super::vec4::Vec4;

/// 4x4 matrix stored as 16 floats in row-major order (`e[row * 4 + col]`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    e: [f32; 16],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat4 {
    pub const fn new(e: [f32; 16]) -> Self {
        Mat4 { e }
    }

    pub const fn from_rows(rows: [[f32; 4]; 4]) -> Self {
        let [r0, r1, r2, r3] = rows;
        Mat4::new([
            r0[0], r0[1], r0[2], r0[3], //
            r1[0], r1[1], r1[2], r1[3], //
            r2[0], r2[1], r2[2], r2[3], //
            r3[0], r3[1], r3[2], r3[3],
        ])
    }

    pub const fn zero() -> Self {
        Mat4::new([0.0; 16])
    }

    pub const fn identity() -> Self {
        Mat4::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a translation matrix. Translation lives in the last row.
    pub const fn translation(x: f32, y: f32, z: f32) -> Self {
        Mat4::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [x, y, z, 1.0],
        ])
    }

    pub const fn scaling(x: f32, y: f32, z: f32) -> Self {
        Mat4::from_rows([
            [x, 0.0, 0.0, 0.0],
            [0.0, y, 0.0, 0.0],
            [0.0, 0.0, z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Rotation about the X axis, angle in radians.
    pub fn rotation_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Mat4::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, -s, 0.0],
            [0.0, s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Rotation about the Y axis, angle in radians.
    pub fn rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Mat4::from_rows([
            [c, 0.0, s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Rotation about the Z axis, angle in radians.
    pub fn rotation_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Mat4::from_rows([
            [c, -s, 0.0, 0.0],
            [s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Left-handed perspective projection mapping view depth `[near, far]` to
    /// clip `z / w` in `[0, 1]`. Clip `w` carries the view-space depth.
    pub fn perspective_lh(fov_y: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        let y_scale = 1.0 / (fov_y * 0.5).tan();
        let x_scale = y_scale / aspect_ratio;
        let depth = far / (far - near);
        Mat4::from_rows([
            [x_scale, 0.0, 0.0, 0.0],
            [0.0, y_scale, 0.0, 0.0],
            [0.0, 0.0, depth, 1.0],
            [0.0, 0.0, -near * depth, 0.0],
        ])
    }

    /// Access element at (row, col).
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.e[row * 4 + col]
    }

    /// Set element at (row, col).
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.e[row * 4 + col] = value;
    }

    pub fn as_array(&self) -> &[f32; 16] {
        &self.e
    }

    pub fn row(&self, row: usize) -> Vec4 {
        Vec4::new(
            self.get(row, 0),
            self.get(row, 1),
            self.get(row, 2),
            self.get(row, 3),
        )
    }

    pub fn scale(&self, s: f32) -> Self {
        Mat4::new(self.e.map(|v| v * s))
    }

    pub fn transpose(&self) -> Self {
        let mut out = Mat4::zero();
        for row in 0..4 {
            for col in 0..4 {
                out.set(col, row, self.get(row, col));
            }
        }
        out
    }

    /// Determinant of the 3x3 minor left after removing `row` and `col`.
    fn minor(&self, row: usize, col: usize) -> f32 {
        let mut m = [0.0f32; 9];
        let mut i = 0;
        for r in (0..4).filter(|&r| r != row) {
            for c in (0..4).filter(|&c| c != col) {
                m[i] = self.get(r, c);
                i += 1;
            }
        }
        m[0] * (m[4] * m[8] - m[7] * m[5]) - m[1] * (m[3] * m[8] - m[6] * m[5])
            + m[2] * (m[3] * m[7] - m[6] * m[4])
    }

    fn cofactor(&self, row: usize, col: usize) -> f32 {
        let sign = if (row + col) % 2 == 0 { 1.0 } else { -1.0 };
        sign * self.minor(row, col)
    }

    /// Laplace expansion along the first row.
    pub fn determinant(&self) -> f32 {
        (0..4).map(|col| self.get(0, col) * self.cofactor(0, col)).sum()
    }

    /// Computes the inverse, or `None` when the determinant is exactly zero.
    pub fn try_inverse(&self) -> Option<Mat4> {
        let det = self.determinant();
        if det == 0.0 {
            return None;
        }

        // Adjugate is the transpose of the cofactor matrix.
        let mut adjugate = Mat4::zero();
        for row in 0..4 {
            for col in 0..4 {
                adjugate.set(col, row, self.cofactor(row, col));
            }
        }
        Some(adjugate.scale(1.0 / det))
    }

    /// Computes the inverse. A singular matrix is returned unchanged.
    pub fn inverse(&self) -> Mat4 {
        self.try_inverse().unwrap_or(*self)
    }
}

/// Named element accessors `e11()` through `e44()`, one-based `(row, col)`.
macro_rules! element_accessors {
    ($($name:ident => ($row:expr, $col:expr)),* $(,)?) => {
        impl Mat4 {
            $(
                #[inline]
                pub fn $name(&self) -> f32 {
                    self.get($row, $col)
                }
            )*
        }
    };
}

element_accessors! {
    e11 => (0, 0), e12 => (0, 1), e13 => (0, 2), e14 => (0, 3),
    e21 => (1, 0), e22 => (1, 1), e23 => (1, 2), e24 => (1, 3),
    e31 => (2, 0), e32 => (2, 1), e33 => (2, 2), e34 => (2, 3),
    e41 => (3, 0), e42 => (3, 1), e43 => (3, 2), e44 => (3, 3),
}

impl Index<usize> for Mat4 {
    type Output = f32;

    fn index(&self, index: usize) -> &f32 {
        &self.e[index]
    }
}

impl IndexMut<usize> for Mat4 {
    fn index_mut(&mut self, index: usize) -> &mut f32 {
        &mut self.e[index]
    }
}

impl Add<Mat4> for Mat4 {
    type Output = Mat4;

    fn add(self, rhs: Mat4) -> Self::Output {
        let mut out = self;
        for (a, b) in out.e.iter_mut().zip(rhs.e) {
            *a += b;
        }
        out
    }
}

impl Sub<Mat4> for Mat4 {
    type Output = Mat4;

    fn sub(self, rhs: Mat4) -> Self::Output {
        let mut out = self;
        for (a, b) in out.e.iter_mut().zip(rhs.e) {
            *a -= b;
        }
        out
    }
}

impl Neg for Mat4 {
    type Output = Mat4;

    fn neg(self) -> Self::Output {
        self.scale(-1.0)
    }
}

/// Matrix multiplication: Mat4 * Mat4.
///
/// With row vectors, `v * (A * B)` applies A first, then B.
impl Mul<Mat4> for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Self::Output {
        let mut out = Mat4::zero();
        for row in 0..4 {
            for col in 0..4 {
                out.set(
                    row,
                    col,
                    self.get(row, 0) * rhs.get(0, col)
                        + self.get(row, 1) * rhs.get(1, col)
                        + self.get(row, 2) * rhs.get(2, col)
                        + self.get(row, 3) * rhs.get(3, col),
                );
            }
        }
        out
    }
}

/// Transform a row vector: Vec4 * Mat4.
impl Mul<Mat4> for Vec4 {
    type Output = Vec4;

    fn mul(self, m: Mat4) -> Self::Output {
        Vec4::new(
            self.x * m.get(0, 0) + self.y * m.get(1, 0) + self.z * m.get(2, 0) + self.w * m.get(3, 0),
            self.x * m.get(0, 1) + self.y * m.get(1, 1) + self.z * m.get(2, 1) + self.w * m.get(3, 1),
            self.x * m.get(0, 2) + self.y * m.get(1, 2) + self.z * m.get(2, 2) + self.w * m.get(3, 2),
            self.x * m.get(0, 3) + self.y * m.get(1, 3) + self.z * m.get(2, 3) + self.w * m.get(3, 3),
        )
    }
}

/// Transform a column vector: Mat4 * Vec4.
impl Mul<Vec4> for Mat4 {
    type Output = Vec4;

    fn mul(self, v: Vec4) -> Self::Output {
        Vec4::new(
            self.row(0).dot(v),
            self.row(1).dot(v),
            self.row(2).dot(v),
            self.row(3).dot(v),
        )
    }
}

impl AbsDiffEq for Mat4 {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.e
            .iter()
            .zip(other.e.iter())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl RelativeEq for Mat4 {
    fn default_max_relative() -> f32 {
        f32::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.e
            .iter()
            .zip(other.e.iter())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}
