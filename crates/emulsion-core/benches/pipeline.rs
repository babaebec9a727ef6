//! Benchmarks for emulsion-core pipeline operations
//!
//! Run with: cargo bench -p emulsion-core

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use emulsion_core::math::CurvePoint;
use emulsion_core::{
    process_image, FilmProfile, FilmType, LinearImage, ProcessOptions, SimulationEngine, ToneMode,
};

/// Generate synthetic linear RGBA test data.
fn generate_test_image(width: u32, height: u32) -> LinearImage {
    let pixel_count = (width * height) as usize;
    let mut data = Vec::with_capacity(pixel_count * 4);

    for i in 0..pixel_count {
        let x = (i % width as usize) as f32 / width as f32;
        let y = (i / width as usize) as f32 / height as f32;

        data.push(0.05 + 0.9 * x);
        data.push(0.05 + 0.9 * y);
        data.push(0.05 + 0.9 * (x + y) / 2.0);
        data.push(1.0);
    }

    LinearImage {
        width,
        height,
        data,
    }
}

fn bench_profile() -> FilmProfile {
    FilmProfile {
        name: "Bench Negative 400".to_string(),
        process: "C-41".to_string(),
        iso: 400.0,
        film_type: Some(FilmType::Negative),
        sensitivity: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        dye_density: None,
        dye_coupling: None,
        curves: [
            vec![
                CurvePoint { x: -3.0, y: 0.2 },
                CurvePoint { x: 1.0, y: 2.8 },
            ],
            vec![
                CurvePoint { x: -2.8, y: 0.2 },
                CurvePoint { x: 1.2, y: 2.8 },
            ],
            vec![
                CurvePoint { x: -2.6, y: 0.2 },
                CurvePoint { x: 1.4, y: 2.8 },
            ],
        ],
        tone_mode: ToneMode::Aces,
        white_point: 2.0,
    }
}

fn bench_full_pipeline(c: &mut Criterion) {
    let profile = bench_profile();
    let engine = SimulationEngine::new(&profile);
    let options = ProcessOptions::default();

    let mut group = c.benchmark_group("full_pipeline");
    for size in [256u32, 512, 1024] {
        let image = generate_test_image(size, size);
        group.throughput(Throughput::Elements(u64::from(size) * u64::from(size)));
        group.bench_with_input(BenchmarkId::from_parameter(size), &image, |b, image| {
            b.iter(|| process_image(black_box(image), &engine, &options).unwrap());
        });
    }
    group.finish();
}

fn bench_engine_transform(c: &mut Criterion) {
    let profile = bench_profile();
    let engine = SimulationEngine::new(&profile);

    c.bench_function("process_pixel", |b| {
        b.iter(|| engine.process_pixel(black_box([0.18, 0.22, 0.15]), 0.0));
    });
}

criterion_group!(benches, bench_full_pipeline, bench_engine_transform);
criterion_main!(benches);
