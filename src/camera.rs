//! Perspective camera.
//!
//! # Coordinate System
//!
//! Uses a **left-handed** coordinate system with row vectors:
//! - X: positive right
//! - Y: positive up
//! - Z: positive forward (into screen)
//!
//! The camera is placed with a world matrix; the view matrix is its inverse.
//! After projection, clip-space z is 0 at the near plane and w at the far
//! plane, so a negative clip z means "behind the near plane".

use crate::math::{Mat4, Vec3};

pub const DEFAULT_NEAR: f32 = 0.1;
pub const DEFAULT_FAR: f32 = 10.0;
/// Vertical field of view in degrees.
pub const DEFAULT_FOV: f32 = 90.0;
pub const DEFAULT_ASPECT: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Placement of the camera in the world.
    pub world: Mat4,
    /// Near clipping plane distance.
    pub near: f32,
    /// Far clipping plane distance.
    pub far: f32,
    /// Vertical field of view in degrees.
    pub fov: f32,
    /// Width divided by height.
    pub aspect_ratio: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            world: Mat4::identity(),
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            fov: DEFAULT_FOV,
            aspect_ratio: DEFAULT_ASPECT,
        }
    }
}

impl Camera {
    /// A camera with default projection parameters placed by `world`.
    pub fn new(world: Mat4) -> Self {
        Self {
            world,
            ..Self::default()
        }
    }

    /// A camera at `eye` looking toward `target`, with +Y as the up hint.
    pub fn looking_at(eye: Vec3, target: Vec3) -> Self {
        Self::new(look_at(eye, target, Vec3::new(0.0, 1.0, 0.0)))
    }

    /// World to view space.
    pub fn view(&self) -> Mat4 {
        self.world.inverse()
    }

    /// View to clip space.
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_lh(self.fov.to_radians(), self.aspect_ratio, self.near, self.far)
    }

    /// `view * projection`, applied as `v * view_projection`.
    pub fn view_projection(&self) -> Mat4 {
        self.view() * self.projection()
    }

    /// Updates the aspect ratio (typically called on window resize).
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }
}

/// World matrix of an object at `eye` facing `target`.
///
/// Rows are right, up, forward and position, matching `v * M`. If `target`
/// coincides with `eye` or the view is parallel to `up`, the result is the
/// translation to `eye`.
pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    let normalize = |v: Vec3| {
        let len = v.magnitude();
        if len > 0.0 {
            Some(v / len)
        } else {
            None
        }
    };

    let basis = normalize(target - eye).and_then(|forward| {
        let right = normalize(up.cross(forward))?;
        Some((right, forward.cross(right), forward))
    });

    match basis {
        Some((right, up, forward)) => Mat4::from_rows([
            [right.x, right.y, right.z, 0.0],
            [up.x, up.y, up.z, 0.0],
            [forward.x, forward.y, forward.z, 0.0],
            [eye.x, eye.y, eye.z, 1.0],
        ]),
        None => Mat4::translation(eye.x, eye.y, eye.z),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec4;
    use approx::assert_relative_eq;

    #[test]
    fn default_camera_parameters() {
        let camera = Camera::default();
        assert_eq!(camera.near, 0.1);
        assert_eq!(camera.far, 10.0);
        assert_eq!(camera.fov, 90.0);
        assert_eq!(camera.aspect_ratio, 1.0);
        assert_eq!(camera.view(), Mat4::identity());
    }

    #[test]
    fn view_undoes_camera_translation() {
        let camera = Camera::new(Mat4::translation(0.0, 0.0, -1.0));
        let p = Vec4::point(0.0, 0.0, 0.0) * camera.view();
        assert_relative_eq!(p, Vec4::point(0.0, 0.0, 1.0), epsilon = 1e-6);
    }

    #[test]
    fn projection_maps_near_and_far() {
        let camera = Camera::default();
        let near = Vec4::point(0.0, 0.0, camera.near) * camera.projection();
        let far = Vec4::point(0.0, 0.0, camera.far) * camera.projection();
        assert_relative_eq!(near.z / near.w, 0.0, epsilon = 1e-6);
        assert_relative_eq!(far.z / far.w, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn looking_at_places_target_on_forward_axis() {
        let camera = Camera::looking_at(Vec3::new(0.0, 0.0, -3.0), Vec3::ZERO);
        let p = Vec4::point(0.0, 0.0, 0.0) * camera.view();
        assert_relative_eq!(p, Vec4::point(0.0, 0.0, 3.0), epsilon = 1e-5);

        let side = Camera::looking_at(Vec3::new(-2.0, 0.0, 0.0), Vec3::ZERO);
        let p = Vec4::point(0.0, 0.0, 0.0) * side.view();
        assert_relative_eq!(p, Vec4::point(0.0, 0.0, 2.0), epsilon = 1e-5);
    }

    #[test]
    fn degenerate_look_at_is_translation() {
        let m = look_at(Vec3::ONE, Vec3::ONE, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(m, Mat4::translation(1.0, 1.0, 1.0));
    }
}
