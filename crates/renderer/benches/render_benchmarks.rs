//! Benchmarks for map rendering and image encoding.
//!
//! Run with: cargo bench --package renderer --bench render_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use renderer::levels::MaxNLocator;
use renderer::{png, MapRenderer, ProjectionMode, RenderOptions, ShadingStyle, ValueRange};
use test_utils::{
    bbox, create_banded_pixels, create_test_rgba_pixels, global_coordinates, grid,
    regional_coordinates, temperature_field,
};

fn bench_options(shading: ShadingStyle) -> RenderOptions {
    RenderOptions {
        shading,
        value_range: ValueRange::Explicit { min: -30.0, max: 35.0 },
        level_count: 13,
        figure_size: (13.0, 10.0),
        dpi: 100,
        ..Default::default()
    }
}

// =============================================================================
// FULL RENDER BENCHMARKS
// =============================================================================

fn bench_render_global(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_global");
    group.sample_size(20);

    for (rows, cols, name) in [
        (grid::T31.0, grid::T31.1, "T31"),
        (grid::NCEP_2P5.0, grid::NCEP_2P5.1, "NCEP_2.5deg"),
    ] {
        let field = temperature_field(rows, cols);
        let coords = global_coordinates(rows, cols);
        group.throughput(Throughput::Elements((rows * cols) as u64));

        for (shading, label) in [
            (ShadingStyle::Mesh, "mesh"),
            (ShadingStyle::FilledContour, "filled_contour"),
        ] {
            let renderer = MapRenderer::new(bench_options(shading)).unwrap();
            group.bench_with_input(BenchmarkId::new(label, name), &field, |b, field| {
                b.iter(|| renderer.render(black_box(field), &coords).unwrap());
            });
        }
    }

    group.finish();
}

fn bench_render_regional(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_regional");
    group.sample_size(20);

    let region = bbox::NORTH_ATLANTIC;
    let field = temperature_field(80, 120);
    let coords = regional_coordinates(region, 80, 120);
    let renderer = MapRenderer::new(RenderOptions {
        projection: ProjectionMode::Regional { bbox: region },
        ..bench_options(ShadingStyle::Mesh)
    })
    .unwrap();

    group.bench_function("north_atlantic_80x120", |b| {
        b.iter(|| renderer.render(black_box(&field), &coords).unwrap());
    });

    group.finish();
}

// =============================================================================
// ENCODING BENCHMARKS
// =============================================================================

fn bench_png_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("png_encoding");

    for (width, height) in [(650, 500), (1300, 1000)] {
        group.throughput(Throughput::Elements((width * height) as u64));

        let banded = create_banded_pixels(width, height);
        group.bench_with_input(
            BenchmarkId::new("indexed", format!("{}x{}", width, height)),
            &banded,
            |b, pixels| b.iter(|| png::create_png_auto(black_box(pixels), width, height, Some(200))),
        );

        let gradient = create_test_rgba_pixels(width, height);
        group.bench_with_input(
            BenchmarkId::new("rgba", format!("{}x{}", width, height)),
            &gradient,
            |b, pixels| b.iter(|| png::create_png(black_box(pixels), width, height, Some(200))),
        );
    }

    group.finish();
}

// =============================================================================
// LEVEL BENCHMARKS
// =============================================================================

fn bench_tick_values(c: &mut Criterion) {
    let locator = MaxNLocator::new(50);
    c.bench_function("max_n_locator_50", |b| {
        b.iter(|| locator.tick_values(black_box(-12.0), black_box(12.0)));
    });
}

criterion_group!(
    benches,
    bench_render_global,
    bench_render_regional,
    bench_png_encoding,
    bench_tick_values,
);

criterion_main!(benches);
