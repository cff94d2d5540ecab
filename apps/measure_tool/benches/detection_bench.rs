use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use image::{Rgba, RgbaImage};
use mt_app::{DEGENERATE_MIN_SIZE, MeasureAxes, PointI32};
use mt_detect::{ColorTolerance, DetectionStrategy, EdgeDetector, SimilarityReference};

/// Sample-radius sized buffer: a 200x120 panel on a flat background.
fn panel_buffer() -> RgbaImage {
    let mut img = RgbaImage::from_pixel(513, 513, Rgba([240, 240, 240, 255]));
    for y in 180..300 {
        for x in 150..350 {
            img.put_pixel(x, y, Rgba([30, 90, 200, 255]));
        }
    }
    img
}

fn bench_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("Edge Detection");
    let buffer = panel_buffer();

    for strategy in [
        DetectionStrategy::PerAxis,
        DetectionStrategy::ConnectedComponent,
    ] {
        let detector = EdgeDetector::new(
            strategy,
            ColorTolerance::default(),
            SimilarityReference::Origin,
            MeasureAxes::Cross,
        );
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{strategy:?}")),
            &detector,
            |b, detector| {
                b.iter(|| {
                    black_box(detector.measure(
                        black_box(&buffer),
                        PointI32::new(0, 0),
                        PointI32::new(256, 256),
                        DEGENERATE_MIN_SIZE,
                    ))
                });
            },
        );
    }

    group.finish();
}

fn bench_uniform_region(c: &mut Criterion) {
    let buffer = RgbaImage::from_pixel(513, 513, Rgba([0, 0, 255, 255]));
    let detector = EdgeDetector::default();

    // Worst case for the per-axis walk: every axis runs to the buffer edge.
    c.bench_function("Per-axis uniform 513x513", |b| {
        b.iter(|| {
            black_box(detector.measure(
                &buffer,
                PointI32::new(0, 0),
                PointI32::new(256, 256),
                DEGENERATE_MIN_SIZE,
            ))
        });
    });
}

criterion_group!(benches, bench_strategies, bench_uniform_region);
criterion_main!(benches);
