// Copyright 2025 the Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bulk transforms and culling over flat geometry strands.

use atlas_strand::{Kind, Strand};
use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use kurbo::{Point, Rect, Vec2};

/// `n` 40×30 boxes on a 50-unit lattice, 100 per row.
fn lattice(n: usize) -> Strand {
    let mut strand = Strand::with_capacity(n);
    for i in 0..n {
        let (col, row) = ((i % 100) as f64, (i / 100) as f64);
        strand.push(
            Kind::VISIBLE,
            Rect::from_origin_size((col * 50.0, row * 50.0), (40.0, 30.0)),
        );
    }
    strand
}

fn bench_transforms(c: &mut Criterion) {
    let mut group = c.benchmark_group("strand/transform");
    for n in [1_000usize, 10_000, 100_000] {
        let base = lattice(n);
        group.throughput(Throughput::Elements(n as u64));

        group.bench_with_input(BenchmarkId::new("scale_at", n), &base, |b, base| {
            b.iter_batched(
                || base.clone(),
                |mut s| {
                    s.scale_at(1.5, Point::new(2_500.0, 2_500.0));
                    black_box(s);
                },
                BatchSize::LargeInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("translate", n), &base, |b, base| {
            b.iter_batched(
                || base.clone(),
                |mut s| {
                    s.translate(Vec2::new(12.5, -7.0));
                    black_box(s);
                },
                BatchSize::LargeInput,
            );
        });

        group.bench_with_input(
            BenchmarkId::new("extend_transformed", n),
            &base,
            |b, base| {
                b.iter_batched(
                    Strand::new,
                    |mut s| {
                        s.extend_transformed(base, 0.25, Vec2::new(100.0, 100.0));
                        black_box(s);
                    },
                    BatchSize::LargeInput,
                );
            },
        );
    }
    group.finish();
}

fn bench_cull(c: &mut Criterion) {
    let mut group = c.benchmark_group("strand/cull");
    let strand = lattice(100_000);
    for side in [500.0_f64, 2_000.0, 5_000.0] {
        let area = Rect::from_origin_size((1_000.0, 1_000.0), (side, side));
        group.bench_with_input(BenchmarkId::from_parameter(side), &area, |b, area| {
            b.iter(|| black_box(strand.cull(*area).count()));
        });
    }
    group.bench_function("bounds", |b| b.iter(|| black_box(strand.bounds())));
    group.finish();
}

criterion_group!(benches, bench_transforms, bench_cull);
criterion_main!(benches);
