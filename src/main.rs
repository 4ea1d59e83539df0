use pixelforge::camera::Camera;
use pixelforge::colors::Color;
use pixelforge::config::RenderConfig;
use pixelforge::display::{DisplaySink, HeadlessSink};
use pixelforge::light::{DirectionalLight, PointLight};
use pixelforge::math::{Mat4, Vec2, Vec3, Vec4};
use pixelforge::output::save_png;
use pixelforge::render::lines::draw_bresenham_line;
use pixelforge::render::{
    ConstantBuffer, DefaultVertexShader, LitShader, Rasterizer, RenderTarget, Vertex,
};
use pixelforge::texture::{BlitRect, Texture2D};
use pixelforge::PixelforgeError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const CHECKER_SIZE: u32 = 64;
const CHECKER_CELL: u32 = 8;
const SPRITE_SIZE: u32 = 24;
const STAR_COUNT: usize = 200;

/// Small deterministic generator for the starfield.
struct Lcg(u32);

impl Lcg {
    fn next_unit(&mut self) -> f32 {
        self.0 = self.0.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        (self.0 >> 8) as f32 / (1u32 << 24) as f32
    }
}

struct Scene {
    cube: Vec<[Vertex; 3]>,
    stars: Vec<Vertex>,
    checker: Texture2D<Color>,
    sprite: Vec<u32>,
}

impl Scene {
    fn new() -> Result<Self, PixelforgeError> {
        let mut rng = Lcg(0x2545_f491);
        let stars = (0..STAR_COUNT)
            .map(|_| {
                let x = rng.next_unit() * 16.0 - 8.0;
                let y = rng.next_unit() * 16.0 - 8.0;
                let z = rng.next_unit() * 4.0 + 5.0;
                Vertex::new(Vec4::point(x, y, z))
            })
            .collect();

        Ok(Self {
            cube: cube_triangles(),
            stars,
            checker: checker_texture()?.generate_mips(),
            sprite: sprite_bgra(),
        })
    }
}

/// Unit cube centered on the origin, two triangles per face.
fn cube_triangles() -> Vec<[Vertex; 3]> {
    // (normal, u axis, v axis)
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([0.0, 0.0, -1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, 1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
    ];
    // (u sign, v sign, tex u, tex v)
    let corners = [
        (-1.0, -1.0, 0.0, 1.0),
        (1.0, -1.0, 1.0, 1.0),
        (1.0, 1.0, 1.0, 0.0),
        (-1.0, 1.0, 0.0, 0.0),
    ];

    let mut triangles = Vec::with_capacity(12);
    for (n, u, v) in faces {
        let quad = corners.map(|(su, sv, tu, tv)| {
            let p = |i: usize| 0.5 * (n[i] + su * u[i] + sv * v[i]);
            Vertex::new(Vec4::point(p(0), p(1), p(2)))
                .with_normal(Vec4::direction(n[0], n[1], n[2]))
                .with_uv(Vec2::new(tu, tv))
        });
        triangles.push([quad[0], quad[1], quad[2]]);
        triangles.push([quad[0], quad[2], quad[3]]);
    }
    triangles
}

fn checker_texture() -> Result<Texture2D<Color>, PixelforgeError> {
    let light = Color::rgb(235, 235, 220);
    let dark = Color::rgb(60, 90, 160);
    let pixels = (0..CHECKER_SIZE * CHECKER_SIZE)
        .map(|i| {
            let (x, y) = (i % CHECKER_SIZE, i / CHECKER_SIZE);
            if (x / CHECKER_CELL + y / CHECKER_CELL) % 2 == 0 {
                light
            } else {
                dark
            }
        })
        .collect();
    Ok(Texture2D::from_pixels(CHECKER_SIZE, CHECKER_SIZE, pixels)?)
}

/// A soft round BGRA sprite, opaque in the middle and fading to the edge.
fn sprite_bgra() -> Vec<u32> {
    let center = (SPRITE_SIZE as f32 - 1.0) * 0.5;
    (0..SPRITE_SIZE * SPRITE_SIZE)
        .map(|i| {
            let dx = (i % SPRITE_SIZE) as f32 - center;
            let dy = (i / SPRITE_SIZE) as f32 - center;
            let falloff = 1.0 - ((dx * dx + dy * dy).sqrt() / center).min(1.0);
            let alpha = (falloff * 255.0) as u8;
            Color::from_rgba(255, 200, 40, alpha).to_bgra()
        })
        .collect()
}

fn render_frame(target: &mut RenderTarget, config: &RenderConfig, scene: &Scene, frame: usize) {
    let t = frame as f32 * 0.04;
    target.clear(config.clear_color, config.clear_depth);

    let mut camera = Camera::looking_at(Vec3::new(0.0, 1.2, -2.5), Vec3::new(0.0, 0.0, 0.0));
    camera.set_aspect_ratio(target.width() as f32 / target.height() as f32);

    let rasterizer = Rasterizer::new().with_vertex_stage(DefaultVertexShader);

    let sky = ConstantBuffer::new(camera);
    for star in &scene.stars {
        rasterizer.draw_point(target, &sky, *star);
    }

    let axes = [
        (Vec4::point(-1.5, -0.5, 0.0), Vec4::point(1.5, -0.5, 0.0), Color::RED),
        (Vec4::point(0.0, -0.5, -1.5), Vec4::point(0.0, -0.5, 1.5), Color::BLUE),
    ];
    for (a, b, color) in axes {
        let a = Vertex::new(a).with_color(color);
        let b = Vertex::new(b).with_color(Color::WHITE);
        rasterizer.draw_parametric_line(target, &sky, a, b);
    }

    let cube = ConstantBuffer {
        filter: config.filter,
        address_mode: config.address_mode,
        light: DirectionalLight::new(Vec4::direction(0.4, -0.6, 1.0), Color::rgb(200, 200, 200)),
        point_light: PointLight::new(Vec4::point(1.5, 1.0, -1.5), Color::rgb(255, 150, 70), 4.0),
        ..ConstantBuffer::new(camera)
    }
    .with_world(Mat4::rotation_y(t) * Mat4::rotation_x(t * 0.6))
    .with_texture(&scene.checker);

    let rasterizer = rasterizer.with_pixel_stage(LitShader);
    for [a, b, c] in &scene.cube {
        rasterizer.fill_triangle(target, &cube, *a, *b, *c);
    }

    let (w, h) = (target.width() as i32, target.height() as i32);
    let overlay = target.color_plane_mut();
    draw_bresenham_line(overlay, (0, 0), (w - 1, 0), Color::PURPLE);
    draw_bresenham_line(overlay, (0, h - 1), (w - 1, h - 1), Color::PURPLE);

    let bob = ((t * 2.0).sin() * 8.0) as i32;
    overlay.blit(
        &scene.sprite,
        SPRITE_SIZE,
        BlitRect::new(0, 0, SPRITE_SIZE, SPRITE_SIZE),
        w - SPRITE_SIZE as i32 - 12,
        12 + bob,
    );
}

#[cfg(feature = "window")]
fn open_sink(config: &RenderConfig) -> Box<dyn DisplaySink> {
    use pixelforge::display::FrontBufferSink;
    use pixelforge::window::SdlPresenter;

    let sink = FrontBufferSink::spawn(config.width, config.height, |w, h| {
        SdlPresenter::new("pixelforge", w, h)
    });
    match sink {
        Ok(sink) => Box::new(sink),
        Err(e) => {
            warn!("window unavailable, rendering headless: {e}");
            Box::new(HeadlessSink::new(config.frames))
        }
    }
}

#[cfg(not(feature = "window"))]
fn open_sink(config: &RenderConfig) -> Box<dyn DisplaySink> {
    Box::new(HeadlessSink::new(config.frames))
}

fn main() -> Result<(), PixelforgeError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pixelforge=info")),
        )
        .init();

    let config = RenderConfig::from_env();
    info!(
        width = config.width,
        height = config.height,
        frames = config.frames,
        "pixelforge starting"
    );

    let scene = Scene::new()?;
    let mut target = RenderTarget::new(config.width, config.height);
    target.set_depth_enable(config.depth_test);

    let mut sink = open_sink(&config);
    let mut frame = 0;
    loop {
        render_frame(&mut target, &config, &scene, frame);
        frame += 1;
        if !sink.submit(target.pixels_argb()) {
            break;
        }
    }
    sink.shutdown();

    if let Err(e) = save_png(target.color_plane(), &config.output) {
        warn!("could not save {}: {e}", config.output.display());
        return Err(e.into());
    }
    info!(frames = frame, output = %config.output.display(), "done");
    Ok(())
}
