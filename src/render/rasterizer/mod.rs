//! Point, line and triangle rasterization.
//!
//! The [`Rasterizer`] runs the fixed-function part of the pipeline:
//!
//! 1. The bound [`VertexStage`] moves each vertex to clip space.
//! 2. Lines are clipped against the near plane.
//! 3. Perspective divide and NDC to raster mapping.
//! 4. Coverage: one pixel for a point, a parametric walk for a line, a
//!    bounded barycentric scan for a triangle.
//! 5. The bound [`PixelStage`] computes the color, and the pixel is written
//!    through the render target's depth test.
//!
//! # Barycentric Coordinates
//!
//! For triangles each weight is the implicit line equation of the edge
//! opposite a vertex, evaluated at the pixel, divided by the same equation
//! evaluated at that vertex:
//!
//! ```text
//! lambda_a = L_cb(p) / L_cb(a)
//! ```
//!
//! A pixel is covered when all three weights are in `[0, 1]`. The interval is
//! closed, so pixels exactly on a shared edge are drawn by both triangles.
//!
//! # Perspective Correction
//!
//! uv is divided by w before the scan and the interpolated result divided by
//! the interpolated 1/w afterwards, so textures stay straight under
//! perspective.

mod clip;

pub use clip::{near_plane_clip, LineClip};

use tracing::trace;

use crate::colors::Color;
use crate::math::{Vec3, Vec4, EPSILON};

use super::interpolate::{
    barycentric_coordinates, ndc_to_raster, perspective_divide, signed_area, Interpolate,
};
use super::shader::{ConstantBuffer, PixelInput, PixelStage, VertexStage};
use super::target::RenderTarget;
use super::vertex::Vertex;

/// Fixed-function rasterizer with pluggable vertex and pixel stages.
///
/// Either stage may be unbound: without a vertex stage positions are taken
/// as clip space already, without a pixel stage the interpolated color is
/// written as is.
#[derive(Default)]
pub struct Rasterizer {
    vertex_stage: Option<Box<dyn VertexStage>>,
    pixel_stage: Option<Box<dyn PixelStage>>,
}

impl Rasterizer {
    /// A rasterizer with no stages bound.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vertex_stage<S: VertexStage + 'static>(mut self, stage: S) -> Self {
        self.set_vertex_stage(stage);
        self
    }

    pub fn with_pixel_stage<S: PixelStage + 'static>(mut self, stage: S) -> Self {
        self.set_pixel_stage(stage);
        self
    }

    pub fn set_vertex_stage<S: VertexStage + 'static>(&mut self, stage: S) {
        self.vertex_stage = Some(Box::new(stage));
    }

    pub fn set_pixel_stage<S: PixelStage + 'static>(&mut self, stage: S) {
        self.pixel_stage = Some(Box::new(stage));
    }

    pub fn clear_vertex_stage(&mut self) {
        self.vertex_stage = None;
    }

    pub fn clear_pixel_stage(&mut self) {
        self.pixel_stage = None;
    }

    #[inline]
    fn run_vertex_stage(&self, constants: &ConstantBuffer<'_>, vertex: &mut Vertex) {
        if let Some(stage) = &self.vertex_stage {
            stage.shade(constants, vertex);
        }
    }

    #[inline]
    fn run_pixel_stage(&self, constants: &ConstantBuffer<'_>, input: &PixelInput, color: &mut Color) {
        if let Some(stage) = &self.pixel_stage {
            stage.shade(constants, input, color);
        }
    }

    /// Draw a single point.
    ///
    /// Points behind the near plane are dropped. The pixel stage starts from
    /// white, and the point lands on the truncated raster coordinate with its
    /// normalized depth.
    ///
    /// # Arguments
    /// * `target` - The render target to draw into
    /// * `constants` - Shading configuration for this draw
    /// * `vertex` - The point, in object space if a vertex stage is bound
    pub fn draw_point(
        &self,
        target: &mut RenderTarget,
        constants: &ConstantBuffer<'_>,
        mut vertex: Vertex,
    ) {
        self.run_vertex_stage(constants, &mut vertex);

        if vertex.position.z < 0.0 {
            trace!(z = vertex.position.z, "point behind near plane");
            return;
        }

        perspective_divide(&mut vertex.position);
        ndc_to_raster(&mut vertex.position, target.width(), target.height());

        let x = vertex.position.x as i32;
        let y = vertex.position.y as i32;
        let depth = vertex.position.z;

        let mut color = Color::WHITE;
        vertex.color = color;
        let input = PixelInput {
            x,
            y,
            vertex,
            barycentrics: Vec3::new(1.0, 0.0, 0.0),
            mip_level: constants.mip_level_for_depth(depth),
        };
        self.run_pixel_stage(constants, &input, &mut color);

        target.set_pixel(x, y, color, depth);
    }

    /// Draw a line by walking it parametrically in raster space.
    ///
    /// The line is clipped against the near plane first. The walk takes
    /// `floor(max(|dx|, |dy|))` steps, rounds each sample half-up, and blends
    /// color per channel. Depth is the interpolated clip-space w. The end
    /// point itself is not drawn.
    ///
    /// # Returns
    ///
    /// How the line related to the near plane. Nothing is drawn for
    /// [`LineClip::Hidden`].
    pub fn draw_parametric_line(
        &self,
        target: &mut RenderTarget,
        constants: &ConstantBuffer<'_>,
        mut a: Vertex,
        mut b: Vertex,
    ) -> LineClip {
        self.run_vertex_stage(constants, &mut a);
        self.run_vertex_stage(constants, &mut b);

        let clip = near_plane_clip(&mut a, &mut b);
        if clip == LineClip::Hidden {
            trace!("line behind near plane");
            return clip;
        }

        let (width, height) = (target.width(), target.height());
        for v in [&mut a, &mut b] {
            perspective_divide(&mut v.position);
            ndc_to_raster(&mut v.position, width, height);
        }

        let (pa, pb) = (a.position, b.position);
        let dx = (pb.x - pa.x).abs();
        let dy = (pb.y - pa.y).abs();
        let steps = dx.max(dy) as i32;

        for i in 0..steps {
            let r = i as f32 / steps as f32;
            let x = (Interpolate::lerp(pa.x, pb.x, r) + 0.5).floor() as i32;
            let y = (Interpolate::lerp(pa.y, pb.y, r) + 0.5).floor() as i32;
            let depth = Interpolate::lerp(pa.w, pb.w, r);
            let color = a.color.lerp(b.color, r);
            target.set_pixel(x, y, color, depth);
        }

        clip
    }

    /// Fill a triangle with a bounded brute-force barycentric scan.
    ///
    /// Every integer pixel in the raster bounding box (intersected with the
    /// target) is tested. Covered pixels get a perspective-correct
    /// interpolated vertex, a mip level from their depth, and a color from the
    /// pixel stage seeded with the barycentric blend of the vertex colors.
    ///
    /// Triangles with (near) zero area, or with a vertex at or behind the eye
    /// (`w <= 0`), are skipped.
    ///
    /// # Returns
    ///
    /// The number of pixels that passed the coverage test, whether or not
    /// they survived the depth test.
    pub fn fill_triangle(
        &self,
        target: &mut RenderTarget,
        constants: &ConstantBuffer<'_>,
        v0: Vertex,
        v1: Vertex,
        v2: Vertex,
    ) -> usize {
        let mut vertices = [v0, v1, v2];
        for v in &mut vertices {
            self.run_vertex_stage(constants, v);
        }

        if vertices.iter().any(|v| v.position.w <= 0.0) {
            trace!("triangle crosses the eye plane");
            return 0;
        }

        // ─────────────────────────────────────────────────────────────────────
        // Step 1: Perspective correction setup, divide, raster mapping
        // ─────────────────────────────────────────────────────────────────────
        let (width, height) = (target.width(), target.height());
        let mut reciprocal_w = [0.0f32; 3];
        for (v, rw) in vertices.iter_mut().zip(reciprocal_w.iter_mut()) {
            *rw = 1.0 / v.position.w;
            v.uv = v.uv * *rw;
            perspective_divide(&mut v.position);
            ndc_to_raster(&mut v.position, width, height);
        }
        let [a, b, c] = vertices;

        if signed_area(a.position, b.position, c.position).abs() < EPSILON {
            trace!("degenerate triangle skipped");
            return 0;
        }

        // ─────────────────────────────────────────────────────────────────────
        // Step 2: Bounding box, clipped to the target
        // ─────────────────────────────────────────────────────────────────────
        let (pa, pb, pc) = (a.position, b.position, c.position);
        let min_x = (pa.x.min(pb.x).min(pc.x).floor() as i32).max(0);
        let min_y = (pa.y.min(pb.y).min(pc.y).floor() as i32).max(0);
        let max_x = (pa.x.max(pb.x).max(pc.x).ceil() as i32).min(width as i32 - 1);
        let max_y = (pa.y.max(pb.y).max(pc.y).ceil() as i32).min(height as i32 - 1);

        // ─────────────────────────────────────────────────────────────────────
        // Step 3: Scan
        // ─────────────────────────────────────────────────────────────────────
        let in_unit = |w: f32| (0.0..=1.0).contains(&w);
        let mut covered = 0;

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = Vec4::new(x as f32, y as f32, 0.0, 0.0);
                let weights = barycentric_coordinates(pa, pb, pc, p);
                if !(in_unit(weights.x) && in_unit(weights.y) && in_unit(weights.z)) {
                    continue;
                }
                covered += 1;

                let rw = f32::barycentric(reciprocal_w[0], reciprocal_w[1], reciprocal_w[2], weights);
                let mut vertex = Vertex::barycentric(a, b, c, weights);
                vertex.uv = vertex.uv / rw;

                let depth = vertex.position.z;
                let mut color = vertex.color;
                let input = PixelInput {
                    x,
                    y,
                    vertex,
                    barycentrics: weights,
                    mip_level: constants.mip_level_for_depth(depth),
                };
                self.run_pixel_stage(constants, &input, &mut color);

                target.set_pixel(x, y, color, depth);
            }
        }

        covered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use crate::math::{Mat4, Vec2};
    use crate::render::shader::{DefaultVertexShader, SolidColorShader, TextureShader};
    use crate::texture::Texture2D;
    use approx::assert_abs_diff_eq;

    /// Raster coordinates to NDC for a `size` x `size` target, w = 1.
    fn ndc(x: f32, y: f32, size: f32) -> Vec4 {
        Vec4::new(x / (size / 2.0) - 1.0, 1.0 - y / (size / 2.0), 0.5, 1.0)
    }

    fn lit_pixels(target: &RenderTarget) -> Vec<(i32, i32)> {
        let plane = target.color_plane();
        let mut out = Vec::new();
        for y in 0..target.height() as i32 {
            for x in 0..target.width() as i32 {
                if plane.get(x, y) != Color::BLACK {
                    out.push((x, y));
                }
            }
        }
        out
    }

    #[test]
    fn point_lands_on_truncated_raster_coordinate() {
        let mut target = RenderTarget::new(20, 20);
        let cb = ConstantBuffer::default();
        let rasterizer = Rasterizer::new();
        rasterizer.draw_point(&mut target, &cb, Vertex::new(ndc(5.7, 3.2, 20.0)));
        assert_eq!(lit_pixels(&target), vec![(5, 3)]);
        assert_eq!(target.color_plane().get(5, 3), Color::WHITE);
    }

    #[test]
    fn point_behind_near_plane_is_dropped() {
        let mut target = RenderTarget::new(20, 20);
        let mut behind = Vertex::new(ndc(5.0, 5.0, 20.0));
        behind.position.z = -0.1;
        Rasterizer::new().draw_point(&mut target, &ConstantBuffer::default(), behind);
        assert!(lit_pixels(&target).is_empty());
    }

    #[test]
    fn point_color_comes_from_pixel_stage() {
        let mut target = RenderTarget::new(4, 4);
        let rasterizer = Rasterizer::new().with_pixel_stage(SolidColorShader::GREEN);
        rasterizer.draw_point(&mut target, &ConstantBuffer::default(), Vertex::new(ndc(1.0, 1.0, 4.0)));
        assert_eq!(target.color_plane().get(1, 1), Color::GREEN);
    }

    #[test]
    fn horizontal_line_covers_start_to_end_exclusive() {
        let mut target = RenderTarget::new(20, 20);
        let a = Vertex::new(Vec4::new(-1.0, 1.0, 0.0, 1.0));
        let b = Vertex::new(Vec4::new(0.0, 1.0, 0.0, 1.0));
        let clip = Rasterizer::new().draw_parametric_line(&mut target, &ConstantBuffer::default(), a, b);

        assert_eq!(clip, LineClip::BothPresent);
        let expected: Vec<_> = (0..10).map(|x| (x, 0)).collect();
        assert_eq!(lit_pixels(&target), expected);
    }

    #[test]
    fn line_blends_color_per_channel() {
        let mut target = RenderTarget::new(20, 20);
        let a = Vertex::new(Vec4::new(-1.0, 1.0, 0.0, 1.0)).with_color(Color::rgb(0, 0, 200));
        let b = Vertex::new(Vec4::new(0.0, 1.0, 0.0, 1.0)).with_color(Color::rgb(200, 0, 0));
        Rasterizer::new().draw_parametric_line(&mut target, &ConstantBuffer::default(), a, b);
        assert_eq!(target.color_plane().get(0, 0), Color::rgb(0, 0, 200));
        assert_eq!(target.color_plane().get(5, 0), Color::rgb(100, 0, 100));
    }

    #[test]
    fn hidden_line_draws_nothing() {
        let mut target = RenderTarget::new(20, 20);
        let a = Vertex::new(Vec4::new(-1.0, 1.0, -1.0, 1.0));
        let b = Vertex::new(Vec4::new(0.0, 1.0, -0.5, 1.0));
        let clip = Rasterizer::new().draw_parametric_line(&mut target, &ConstantBuffer::default(), a, b);
        assert_eq!(clip, LineClip::Hidden);
        assert!(lit_pixels(&target).is_empty());
    }

    #[test]
    fn line_crossing_near_plane_is_clipped() {
        let mut target = RenderTarget::new(20, 20);
        let a = Vertex::new(Vec4::new(-1.0, 1.0, -1.0, 1.0));
        let b = Vertex::new(Vec4::new(1.0, 1.0, 1.0, 1.0));
        let clip = Rasterizer::new().draw_parametric_line(&mut target, &ConstantBuffer::default(), a, b);
        assert_eq!(clip, LineClip::OneClipped);
        // Clipped start sits at x = 0 in NDC, raster column 10.
        assert_eq!(lit_pixels(&target).first(), Some(&(10, 0)));
    }

    #[test]
    fn zero_area_triangle_draws_nothing() {
        let mut target = RenderTarget::new(16, 16);
        let rasterizer = Rasterizer::new();
        let v = |x, y| Vertex::new(ndc(x, y, 16.0));
        let count = rasterizer.fill_triangle(
            &mut target,
            &ConstantBuffer::default(),
            v(2.0, 2.0),
            v(4.0, 4.0),
            v(8.0, 8.0),
        );
        assert_eq!(count, 0);
        assert!(lit_pixels(&target).is_empty());
    }

    #[test]
    fn triangle_pixel_count_tracks_area() {
        let mut target = RenderTarget::new(64, 64);
        let v = |x, y| Vertex::new(ndc(x, y, 64.0));
        let count = Rasterizer::new().fill_triangle(
            &mut target,
            &ConstantBuffer::default(),
            v(4.0, 4.0),
            v(60.0, 4.0),
            v(4.0, 60.0),
        );
        let area = 56.0 * 56.0 / 2.0;
        let perimeter = 56.0 * 2.0 + 56.0 * std::f32::consts::SQRT_2;
        assert!((count as f32 - area).abs() <= perimeter, "count {count}, area {area}");
        assert_eq!(lit_pixels(&target).len(), count);
    }

    /// Records the barycentrics of every pixel it shades.
    struct WeightRecorder(std::sync::Arc<parking_lot::Mutex<Vec<Vec3>>>);

    impl PixelStage for WeightRecorder {
        fn shade(&self, _: &ConstantBuffer<'_>, input: &PixelInput, _: &mut Color) {
            self.0.lock().push(input.barycentrics);
        }
    }

    #[test]
    fn shaded_pixel_barycentrics_are_normalized() {
        let weights = std::sync::Arc::new(parking_lot::Mutex::new(Vec::new()));
        let mut target = RenderTarget::new(64, 64);
        let v = |x, y| Vertex::new(ndc(x, y, 64.0));

        let count = Rasterizer::new()
            .with_pixel_stage(WeightRecorder(std::sync::Arc::clone(&weights)))
            .fill_triangle(
                &mut target,
                &ConstantBuffer::default(),
                v(3.0, 5.0),
                v(61.0, 17.0),
                v(20.0, 58.0),
            );

        let weights = weights.lock();
        assert!(count > 0);
        assert_eq!(weights.len(), count);
        for w in weights.iter() {
            assert_abs_diff_eq!(w.x + w.y + w.z, 1.0, epsilon = 1e-5);
            for c in [w.x, w.y, w.z] {
                assert!((0.0..=1.0).contains(&c), "weight {c} outside [0, 1]");
            }
        }
    }

    #[test]
    fn triangle_covers_vertices_with_closed_edges() {
        let mut target = RenderTarget::new(16, 16);
        let v = |x, y| Vertex::new(ndc(x, y, 16.0));
        Rasterizer::new().fill_triangle(
            &mut target,
            &ConstantBuffer::default(),
            v(2.0, 2.0),
            v(10.0, 2.0),
            v(2.0, 10.0),
        );
        let plane = target.color_plane();
        assert_eq!(plane.get(2, 2), Color::WHITE);
        assert_eq!(plane.get(10, 2), Color::WHITE);
        assert_eq!(plane.get(2, 10), Color::WHITE);
        assert_eq!(plane.get(6, 6), Color::WHITE);
        assert_eq!(plane.get(7, 7), Color::BLACK);
    }

    #[test]
    fn winding_does_not_matter() {
        let v = |x, y| Vertex::new(ndc(x, y, 32.0));
        let (a, b, c) = (v(3.0, 3.0), v(28.0, 7.0), v(9.0, 25.0));
        let cb = ConstantBuffer::default();

        let mut cw = RenderTarget::new(32, 32);
        let mut ccw = RenderTarget::new(32, 32);
        let n1 = Rasterizer::new().fill_triangle(&mut cw, &cb, a, b, c);
        let n2 = Rasterizer::new().fill_triangle(&mut ccw, &cb, a, c, b);
        assert_eq!(n1, n2);
        assert_eq!(cw.pixels_argb(), ccw.pixels_argb());
    }

    #[test]
    fn triangle_off_target_is_clamped() {
        let mut target = RenderTarget::new(8, 8);
        let v = |x, y| Vertex::new(ndc(x, y, 8.0));
        let count = Rasterizer::new().fill_triangle(
            &mut target,
            &ConstantBuffer::default(),
            v(-20.0, -20.0),
            v(60.0, -20.0),
            v(-20.0, 60.0),
        );
        assert_eq!(count, 64);
    }

    #[test]
    fn triangle_depth_test_keeps_nearest() {
        let mut target = RenderTarget::new(16, 16);
        target.set_depth_enable(true);
        let rasterizer = Rasterizer::new();
        let cb = ConstantBuffer::default();

        let tri = |z: f32, color: Color| {
            let v = |x, y| {
                let mut p = ndc(x, y, 16.0);
                p.z = z;
                Vertex::new(p).with_color(color)
            };
            (v(0.0, 0.0), v(16.0, 0.0), v(0.0, 16.0))
        };

        let (a, b, c) = tri(0.5, Color::RED);
        rasterizer.fill_triangle(&mut target, &cb, a, b, c);
        let (a, b, c) = tri(0.625, Color::GREEN);
        rasterizer.fill_triangle(&mut target, &cb, a, b, c);
        assert_eq!(target.color_plane().get(2, 2), Color::RED);

        let (a, b, c) = tri(0.375, Color::BLUE);
        rasterizer.fill_triangle(&mut target, &cb, a, b, c);
        assert_eq!(target.color_plane().get(2, 2), Color::BLUE);
        assert_abs_diff_eq!(target.depth_plane().get(2, 2), 0.375, epsilon = 1e-6);
    }

    #[test]
    fn pixel_stage_sees_interpolated_vertex() {
        let mut target = RenderTarget::new(16, 16);
        let texture =
            Texture2D::from_pixels(2, 1, vec![Color::RED, Color::BLUE]).unwrap();
        let cb = ConstantBuffer::default().with_texture(&texture);
        let v = |x, y, u| Vertex::new(ndc(x, y, 16.0)).with_uv(Vec2::new(u, 0.0));

        let rasterizer = Rasterizer::new().with_pixel_stage(TextureShader);
        rasterizer.fill_triangle(&mut target, &cb, v(0.0, 0.0, 0.0), v(16.0, 0.0, 1.0), v(0.0, 16.0, 0.0));

        let plane = target.color_plane();
        assert_eq!(plane.get(1, 1), Color::RED);
        assert_eq!(plane.get(12, 1), Color::BLUE);
    }

    #[test]
    fn perspective_correct_uv_differs_from_affine() {
        // The right-hand vertex is four times as far away as the others.
        let mut target = RenderTarget::new(32, 32);
        let texture =
            Texture2D::from_pixels(2, 1, vec![Color::RED, Color::BLUE]).unwrap();
        let cb = ConstantBuffer::default().with_texture(&texture);

        let v = |x: f32, y: f32, u: f32, w: f32| {
            let p = ndc(x, y, 32.0);
            Vertex::new(Vec4::new(p.x * w, p.y * w, p.z * w, w)).with_uv(Vec2::new(u, 0.0))
        };

        let rasterizer = Rasterizer::new().with_pixel_stage(TextureShader);
        rasterizer.fill_triangle(
            &mut target,
            &cb,
            v(0.0, 0.0, 0.0, 1.0),
            v(32.0, 0.0, 1.0, 4.0),
            v(0.0, 32.0, 0.0, 1.0),
        );

        // Along the top edge affine u would reach 0.5 at x = 16; with the far
        // vertex weighted by 1/w it only gets there at x = 25.6.
        let plane = target.color_plane();
        assert_eq!(plane.get(20, 0), Color::RED);
        assert_eq!(plane.get(28, 0), Color::BLUE);
    }

    #[test]
    fn default_vertex_shader_pipeline_draws_in_front_of_camera() {
        let mut target = RenderTarget::new(32, 32);
        let camera = Camera::new(Mat4::translation(0.0, 0.0, -2.0));
        let cb = ConstantBuffer::new(camera);
        let rasterizer = Rasterizer::new()
            .with_vertex_stage(DefaultVertexShader)
            .with_pixel_stage(SolidColorShader::RED);

        let count = rasterizer.fill_triangle(
            &mut target,
            &cb,
            Vertex::new(Vec4::point(-1.0, -1.0, 0.0)),
            Vertex::new(Vec4::point(0.0, 1.0, 0.0)),
            Vertex::new(Vec4::point(1.0, -1.0, 0.0)),
        );
        assert!(count > 0);
        assert_eq!(target.color_plane().get(16, 16), Color::RED);
    }

    #[test]
    fn triangle_behind_eye_is_skipped() {
        let mut target = RenderTarget::new(8, 8);
        let mut behind = Vertex::new(ndc(0.0, 0.0, 8.0));
        behind.position.w = -1.0;
        let count = Rasterizer::new().fill_triangle(
            &mut target,
            &ConstantBuffer::default(),
            behind,
            Vertex::new(ndc(8.0, 0.0, 8.0)),
            Vertex::new(ndc(0.0, 8.0, 8.0)),
        );
        assert_eq!(count, 0);
    }
}
