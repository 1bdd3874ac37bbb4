// Copyright 2025 the Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sparse grid materialization and level-of-detail requests.

use atlas_grid::{SparseGrid, TileLevels, TileSource};
use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect};

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid/generate");

    // A viewport-sized window panned across an unbounded plane, one tile at a time.
    for tile in [64.0_f64, 256.0] {
        group.bench_with_input(BenchmarkId::new("pan_sweep", tile), &tile, |b, &tile| {
            b.iter_batched(
                || SparseGrid::new(tile, |p: Point| (p.x as i64, p.y as i64)).unwrap(),
                |mut grid| {
                    for step in 0..64 {
                        let x = f64::from(step) * tile;
                        black_box(grid.generate(Rect::new(x, 0.0, x + 1_920.0, 1_080.0)));
                    }
                    black_box(grid.total_loaded());
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.bench_function("revisit", |b| {
        let mut grid = SparseGrid::new(256.0, |p: Point| (p.x as i64, p.y as i64)).unwrap();
        let view = Rect::new(0.0, 0.0, 4_096.0, 4_096.0);
        grid.generate(view);
        b.iter(|| black_box(grid.generate(view)));
    });
    group.finish();
}

fn bench_levels(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid/levels");
    let source = TileSource::new(65_536.0, 65_536.0, 256.0)
        .with_scale_factors([1, 2, 4, 8, 16, 32, 64, 128, 256]);

    // Zoom from overview to full resolution over a fixed 1920×1080 screen.
    group.bench_function("zoom_in", |b| {
        b.iter_batched(
            || TileLevels::new(source.clone()).unwrap(),
            |mut levels| {
                let mut scale = 1.0 / 256.0;
                while scale <= 1.0 {
                    let w = 1_920.0 / scale;
                    let h = 1_080.0 / scale;
                    let rect = Rect::from_center_size((32_768.0, 32_768.0), (w, h));
                    let request = levels.request(rect, scale);
                    black_box(levels.visible(request.level, rect).count());
                    scale *= 1.25;
                }
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_generate, bench_levels);
criterion_main!(benches);
