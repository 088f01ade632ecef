// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Vec2};
use understory_coordinate::Coordinate;
use understory_snap::SnapGrid;

fn points(len: usize) -> Vec<Point> {
    (0..len)
        .map(|i| {
            let t = i as f64;
            Point::new((t * 37.3) % 1_000.0 - 500.0, (t * 91.7) % 800.0 - 400.0)
        })
        .collect()
}

fn bench_conversions(c: &mut Criterion) {
    let mut group = c.benchmark_group("coordinate/convert");
    let rotated = Coordinate::new(Vec2::new(120.0, -40.0), 1.75, 0.6);

    for len in [256usize, 4_096] {
        let screen = points(len);
        group.throughput(Throughput::Elements(len as u64));

        group.bench_with_input(BenchmarkId::new("position_at", len), &screen, |b, screen| {
            b.iter(|| {
                for p in screen {
                    black_box(rotated.position_at(*p));
                }
            });
        });

        // Reference point for the polar round-trip cost.
        let affine = rotated.to_affine().inverse();
        group.bench_with_input(BenchmarkId::new("affine_inverse", len), &screen, |b, screen| {
            b.iter(|| {
                for p in screen {
                    black_box(affine * *p);
                }
            });
        });
    }

    group.finish();
}

fn bench_snap(c: &mut Criterion) {
    let mut group = c.benchmark_group("snap");
    let content = points(4_096);
    group.throughput(Throughput::Elements(content.len() as u64));

    for (name, grid) in [
        ("square", SnapGrid::Square(16.0)),
        ("triangle", SnapGrid::Triangle(16.0)),
    ] {
        group.bench_with_input(BenchmarkId::new(name, content.len()), &content, |b, content| {
            b.iter(|| {
                for p in content {
                    black_box(grid.snap(*p));
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_conversions, bench_snap);
criterion_main!(benches);
