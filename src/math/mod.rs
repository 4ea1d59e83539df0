//! Linear algebra core: vectors, row-major matrices and scalar helpers.

pub mod mat4;
pub mod vec2;
pub mod vec3;
pub mod vec4;

pub use mat4::Mat4;
pub use vec2::Vec2;
pub use vec3::Vec3;
pub use vec4::Vec4;

/// Roundoff tolerance for floating point comparisons.
pub const EPSILON: f32 = 0.00001;

/// `|a - b| < EPSILON`
#[inline]
pub fn is_equal(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

#[inline]
pub fn is_zero(a: f32) -> bool {
    a.abs() < EPSILON
}

/// Clamp to `[0, 1]`.
#[inline]
pub fn saturate(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

#[inline]
pub fn degrees_to_radians(degrees: f32) -> f32 {
    degrees.to_radians()
}

#[inline]
pub fn radians_to_degrees(radians: f32) -> f32 {
    radians.to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saturate_clamps() {
        assert_eq!(saturate(-0.5), 0.0);
        assert_eq!(saturate(0.25), 0.25);
        assert_eq!(saturate(3.0), 1.0);
    }

    #[test]
    fn epsilon_comparisons() {
        assert!(is_equal(1.0, 1.000001));
        assert!(!is_equal(1.0, 1.001));
        assert!(is_zero(-0.000001));
    }
}
