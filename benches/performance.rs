// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nalgebra::{Matrix4, Point3};
use surface_integrity::capture::{
    CameraIntrinsics, FaceBuffer, FrameSnapshot, LabelImage, MeshAnchor, StridedBuffer,
};
use surface_integrity::geometry::{
    build_topology, connected_components, fit_plane_pca, ComponentParams, MeshPart,
};
use surface_integrity::integrity::IntegrityCalculator;

/// `n × n` quads on z = -5 with a gentle ripple, spanning -1..1
fn wall(n: usize) -> (Vec<[f32; 3]>, Vec<[u32; 3]>) {
    let step = 2.0 / n as f32;
    let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
    for j in 0..=n {
        for i in 0..=n {
            let x = -1.0 + step * i as f32;
            let y = -1.0 + step * j as f32;
            vertices.push([x, y, -5.0 + 0.05 * (x * 7.0).sin() * (y * 5.0).cos()]);
        }
    }

    let stride = n as u32 + 1;
    let mut faces = Vec::with_capacity(2 * n * n);
    for j in 0..n as u32 {
        for i in 0..n as u32 {
            let v00 = j * stride + i;
            faces.push([v00, v00 + 1, v00 + stride + 1]);
            faces.push([v00, v00 + stride + 1, v00 + stride]);
        }
    }
    (vertices, faces)
}

fn snapshot(n: usize) -> FrameSnapshot {
    let (vertices, faces) = wall(n);
    let anchor = MeshAnchor::new(
        Matrix4::identity(),
        StridedBuffer::from_points(&vertices),
        FaceBuffer::from_u32(&faces),
    );
    FrameSnapshot::new(0.0)
        .with_camera_transform(Matrix4::identity())
        .with_intrinsics(CameraIntrinsics::new(500.0, 500.0, 500.0, 500.0))
        .with_label_image(LabelImage::filled(1000, 1000, 1))
        .with_anchor(anchor)
}

fn bench_plane_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("plane_fit");

    for n in [16, 64, 128] {
        let (vertices, _) = wall(n);
        let points: Vec<Point3<f32>> = vertices.iter().map(|v| Point3::new(v[0], v[1], v[2])).collect();
        let weights = vec![1.0; points.len()];
        group.bench_with_input(BenchmarkId::new("pca", n), &points, |b, points| {
            b.iter(|| fit_plane_pca(black_box(points), black_box(&weights)))
        });
    }

    group.finish();
}

fn bench_components(c: &mut Criterion) {
    let mut group = c.benchmark_group("components");

    for n in [32, 128] {
        let (vertices, faces) = wall(n);
        let part = MeshPart::indexed(
            vertices.iter().map(|v| Point3::new(v[0], v[1], v[2])).collect(),
            faces,
        );
        let parts = vec![part];

        group.bench_with_input(BenchmarkId::new("topology", n), &parts, |b, parts| {
            b.iter(|| build_topology(black_box(parts)))
        });

        let topology = build_topology(&parts);
        group.bench_with_input(BenchmarkId::new("connected", n), &topology, |b, topology| {
            b.iter(|| connected_components(black_box(topology), &ComponentParams::default()))
        });
    }

    group.finish();
}

fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze");
    group.sample_size(20);

    let calculator = IntegrityCalculator::default();
    for n in [32, 128] {
        let frame = snapshot(n);
        group.bench_with_input(BenchmarkId::new("wall", n), &frame, |b, frame| {
            b.iter(|| calculator.analyze(black_box(frame)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_plane_fit, bench_components, bench_analyze);
criterion_main!(benches);
