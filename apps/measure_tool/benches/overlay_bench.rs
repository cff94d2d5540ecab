use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use mt_app::{
    BoundingBox, DEGENERATE_MIN_SIZE, MeasureAxes, Measurement, MeasurementSnapshot, Phase,
};
use mt_rendering::MonospaceMetrics;
use mt_skia::{LabelFont, PixmapBackend};
use mt_ui::{OverlayStyle, build_measurement_overlay_render_list};

fn snapshot(locked: usize) -> MeasurementSnapshot {
    let mut boxes: Vec<Measurement> = (0..=locked)
        .map(|i| {
            let offset = (i as i32 % 8) * 200;
            let bounds =
                BoundingBox::new(40 + offset, 60 + offset / 2, 180 + offset, 140 + offset / 2);
            Measurement::new(bounds, bounds.center(), MeasureAxes::Cross, DEGENERATE_MIN_SIZE)
        })
        .collect();
    let live = boxes.pop();

    MeasurementSnapshot {
        phase: if boxes.is_empty() {
            Phase::Tracking
        } else {
            Phase::Locked
        },
        live,
        locked: boxes,
    }
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("Overlay Render List");
    let style = OverlayStyle::default();

    for locked in [0usize, 4, 16] {
        let snap = snapshot(locked);
        group.bench_with_input(BenchmarkId::new("build", locked), &snap, |b, snap| {
            b.iter(|| {
                black_box(build_measurement_overlay_render_list(
                    snap,
                    (1920, 1080),
                    &style,
                    &MonospaceMetrics,
                ))
            });
        });
    }

    group.finish();
}

fn bench_rasterize(c: &mut Criterion) {
    let mut group = c.benchmark_group("Overlay Raster");
    let style = OverlayStyle::default();
    let mut backend = PixmapBackend::new(1920, 1080).expect("pixmap");
    if let Some(font) = LabelFont::system() {
        backend = backend.with_font(font);
    }

    for locked in [0usize, 4] {
        let snap = snapshot(locked);
        group.bench_with_input(BenchmarkId::new("1080p", locked), &snap, |b, snap| {
            b.iter(|| {
                backend.clear();
                if let Some(mut list) =
                    build_measurement_overlay_render_list(snap, (1920, 1080), &style, &backend)
                {
                    list.execute(&mut backend).expect("render");
                }
                black_box(backend.data().len())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_rasterize);
criterion_main!(benches);
