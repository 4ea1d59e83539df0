use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pixelforge::bench::{draw_bresenham_line, draw_midpoint_line};
use pixelforge::prelude::*;
use pixelforge::render::{SolidColorShader, TextureShader};

const BUFFER_WIDTH: u32 = 800;
const BUFFER_HEIGHT: u32 = 600;

/// Vertex at raster position `(x, y)` with identity clip space (w = 1).
fn raster_vertex(x: f32, y: f32) -> Vertex {
    let half_w = (BUFFER_WIDTH / 2) as f32;
    let half_h = (BUFFER_HEIGHT / 2) as f32;
    Vertex::new(Vec4::new(x / half_w - 1.0, 1.0 - y / half_h, 0.5, 1.0))
}

fn triangle(points: [(f32, f32); 3]) -> [Vertex; 3] {
    let [a, b, c] = points.map(|(x, y)| raster_vertex(x, y));
    [
        a.with_uv(Vec2::new(0.0, 0.0)),
        b.with_uv(Vec2::new(1.0, 0.0)),
        c.with_uv(Vec2::new(0.5, 1.0)),
    ]
}

fn small_triangle() -> [Vertex; 3] {
    triangle([(100.0, 100.0), (120.0, 100.0), (110.0, 120.0)])
}

fn medium_triangle() -> [Vertex; 3] {
    triangle([(100.0, 100.0), (300.0, 100.0), (200.0, 300.0)])
}

fn large_triangle() -> [Vertex; 3] {
    triangle([(50.0, 50.0), (750.0, 100.0), (400.0, 550.0)])
}

fn checker() -> Texture2D<Color> {
    let pixels = (0..64 * 64)
        .map(|i| if (i % 64 / 8 + i / 64 / 8) % 2 == 0 { Color::WHITE } else { Color::BLUE })
        .collect();
    Texture2D::from_pixels(64, 64, pixels)
        .expect("checker size")
        .generate_mips()
}

fn benchmark_single_triangle(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_triangle");

    let solid = Rasterizer::new().with_pixel_stage(SolidColorShader::RED);
    let textured = Rasterizer::new().with_pixel_stage(TextureShader);
    let texture = checker();
    let constants = ConstantBuffer::default().with_texture(&texture);

    for (name, [v0, v1, v2]) in [
        ("small", small_triangle()),
        ("medium", medium_triangle()),
        ("large", large_triangle()),
    ] {
        group.bench_with_input(BenchmarkId::new("solid", name), &(v0, v1, v2), |b, tri| {
            let mut target = RenderTarget::new(BUFFER_WIDTH, BUFFER_HEIGHT);
            b.iter(|| solid.fill_triangle(&mut target, &constants, black_box(tri.0), tri.1, tri.2));
        });

        group.bench_with_input(BenchmarkId::new("textured", name), &(v0, v1, v2), |b, tri| {
            let mut target = RenderTarget::new(BUFFER_WIDTH, BUFFER_HEIGHT);
            target.set_depth_enable(true);
            b.iter(|| {
                target.clear_depth(1.0);
                textured.fill_triangle(&mut target, &constants, black_box(tri.0), tri.1, tri.2)
            });
        });
    }

    group.finish();
}

fn benchmark_many_triangles(c: &mut Criterion) {
    let mut group = c.benchmark_group("many_triangles");

    let rasterizer = Rasterizer::new();
    let constants = ConstantBuffer::default();

    // Generate a grid of small triangles
    let triangles: Vec<[Vertex; 3]> = (0..20)
        .flat_map(|row| {
            (0..20).map(move |col| {
                let x = col as f32 * 40.0;
                let y = row as f32 * 30.0;
                triangle([(x, y), (x + 35.0, y), (x + 17.5, y + 25.0)])
            })
        })
        .collect();

    group.bench_function("400_triangles", |b| {
        let mut target = RenderTarget::new(BUFFER_WIDTH, BUFFER_HEIGHT);
        b.iter(|| {
            for [v0, v1, v2] in &triangles {
                rasterizer.fill_triangle(&mut target, &constants, black_box(*v0), *v1, *v2);
            }
        });
    });

    group.finish();
}

fn benchmark_lines(c: &mut Criterion) {
    let mut group = c.benchmark_group("lines");

    let rasterizer = Rasterizer::new();
    let constants = ConstantBuffer::default();
    let from = raster_vertex(10.0, 20.0).with_color(Color::RED);
    let to = raster_vertex(780.0, 570.0).with_color(Color::BLUE);

    group.bench_function("parametric", |b| {
        let mut target = RenderTarget::new(BUFFER_WIDTH, BUFFER_HEIGHT);
        b.iter(|| rasterizer.draw_parametric_line(&mut target, &constants, black_box(from), to));
    });

    group.bench_function("bresenham", |b| {
        let mut surface = Texture2D::filled(BUFFER_WIDTH, BUFFER_HEIGHT, Color::BLACK);
        b.iter(|| draw_bresenham_line(&mut surface, black_box((10, 20)), (780, 570), Color::RED));
    });

    group.bench_function("midpoint", |b| {
        let mut surface = Texture2D::filled(BUFFER_WIDTH, BUFFER_HEIGHT, Color::BLACK);
        b.iter(|| {
            draw_midpoint_line(
                &mut surface,
                black_box(Vec2::new(10.0, 20.0)),
                Vec2::new(780.0, 570.0),
                Color::RED,
            )
        });
    });

    group.finish();
}

fn benchmark_blit(c: &mut Criterion) {
    let mut group = c.benchmark_group("blit");

    for size in [16u32, 64, 256] {
        let sprite: Vec<u32> = (0..size * size)
            .map(|i| Color::from_rgba(255, 128, (i % 256) as u8, (i % 256) as u8).to_bgra())
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), &sprite, |b, sprite| {
            let mut surface = Texture2D::filled(BUFFER_WIDTH, BUFFER_HEIGHT, Color::BLACK);
            b.iter(|| {
                surface.blit(
                    black_box(sprite),
                    size,
                    BlitRect::new(0, 0, size, size),
                    100,
                    100,
                )
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_single_triangle,
    benchmark_many_triangles,
    benchmark_lines,
    benchmark_blit
);
criterion_main!(benches);
