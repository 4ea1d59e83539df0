//! Lighting types for the shading stages.

use crate::colors::Color;
use crate::math::{saturate, Vec4};

/// A directional light that illuminates the scene uniformly from a direction.
///
/// Directional lights are ideal for simulating distant light sources like the sun,
/// where all rays are effectively parallel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// The normalized direction the light is pointing (not where it comes from).
    pub direction: Vec4,
    pub color: Color,
}

impl DirectionalLight {
    /// Create a new directional light pointing in the given direction.
    /// The direction will be normalized automatically.
    pub fn new(direction: Vec4, color: Color) -> Self {
        let direction = Vec4::direction(direction.x, direction.y, direction.z);
        Self {
            direction: direction.normalize(),
            color,
        }
    }

    /// Lambert term `saturate(N . L)` for a surface normal.
    pub fn intensity(&self, normal: Vec4) -> f32 {
        // Negate direction: light pointing at surface = positive dot product
        saturate((-self.direction).dot(normal))
    }

    /// Light contribution at a surface, faded from black by the Lambert term.
    pub fn shade(&self, normal: Vec4) -> Color {
        Color::BLACK.lerp(self.color, self.intensity(normal))
    }
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self::new(Vec4::direction(0.0, 0.0, 1.0), Color::WHITE)
    }
}

/// A light radiating from a point, fading out quadratically at `radius`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec4,
    pub color: Color,
    pub radius: f32,
}

impl PointLight {
    pub fn new(position: Vec4, color: Color, radius: f32) -> Self {
        Self {
            position,
            color,
            radius,
        }
    }

    /// `(1 - saturate(distance / radius))^2`
    pub fn attenuation(&self, surface: Vec4) -> f32 {
        let distance = (self.position.to_vec3() - surface.to_vec3()).magnitude();
        if self.radius <= 0.0 {
            return 0.0;
        }
        let falloff = 1.0 - saturate(distance / self.radius);
        falloff * falloff
    }

    /// Attenuated Lambert term for a surface point and normal.
    pub fn intensity(&self, surface: Vec4, normal: Vec4) -> f32 {
        let d = self.position.to_vec3() - surface.to_vec3();
        let to_light = Vec4::direction(d.x, d.y, d.z).normalize();
        self.attenuation(surface) * saturate(to_light.dot(normal))
    }

    /// Light contribution at a surface, faded from black.
    pub fn shade(&self, surface: Vec4, normal: Vec4) -> Color {
        Color::BLACK.lerp(self.color, self.intensity(surface, normal))
    }
}

impl Default for PointLight {
    fn default() -> Self {
        Self::new(Vec4::point(0.0, 0.0, 0.0), Color::BLACK, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_direct_illumination() {
        // Light pointing toward -Z, normal facing +Z (toward the light)
        let light = DirectionalLight::new(Vec4::direction(0.0, 0.0, -1.0), Color::WHITE);
        let normal = Vec4::direction(0.0, 0.0, 1.0);
        assert_relative_eq!(light.intensity(normal), 1.0);
        assert_eq!(light.shade(normal), Color::WHITE);
    }

    #[test]
    fn test_no_illumination() {
        // Light pointing toward -Z, normal facing -Z (away from light)
        let light = DirectionalLight::new(Vec4::direction(0.0, 0.0, -1.0), Color::WHITE);
        let normal = Vec4::direction(0.0, 0.0, -1.0);
        assert_eq!(light.intensity(normal), 0.0);
        assert_eq!(light.shade(normal), Color::BLACK);
    }

    #[test]
    fn test_angled_illumination() {
        // Light pointing straight down (-Y), normal at 45 degrees
        let light = DirectionalLight::new(Vec4::direction(0.0, -1.0, 0.0), Color::WHITE);
        let normal = Vec4::direction(0.0, 1.0, 1.0).normalize();
        assert_relative_eq!(light.intensity(normal), 0.70710677, epsilon = 1e-5);
    }

    #[test]
    fn point_light_fades_to_zero_at_radius() {
        let light = PointLight::new(Vec4::point(0.0, 1.0, 0.0), Color::WHITE, 2.0);
        let up = Vec4::direction(0.0, 1.0, 0.0);
        assert_relative_eq!(light.intensity(Vec4::point(0.0, 0.0, 0.0), up), 0.25);
        assert_eq!(light.intensity(Vec4::point(0.0, -1.0, 0.0), up), 0.0);
        assert_eq!(light.intensity(Vec4::point(0.0, -5.0, 0.0), up), 0.0);
    }

    #[test]
    fn point_light_ignores_surfaces_facing_away() {
        let light = PointLight::new(Vec4::point(0.0, 1.0, 0.0), Color::WHITE, 10.0);
        let down = Vec4::direction(0.0, -1.0, 0.0);
        assert_eq!(light.intensity(Vec4::point(0.0, 0.0, 0.0), down), 0.0);
    }
}
