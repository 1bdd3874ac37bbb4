// Copyright 2025 the Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene tree flattening, layout and hit testing.

use atlas_responder::hit_test;
use atlas_world::{EventMask, ObjectId, ObjectKind, World};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect, Vec2};

/// A board of `groups` groups, each holding a 10×10 grid of cards.
fn board(groups: usize) -> (World, Vec<ObjectId>) {
    let mut world = World::new();
    let root = world.root();
    let mut cards = Vec::new();
    for g in 0..groups {
        let origin = Point::new((g % 10) as f64 * 1_100.0, (g / 10) as f64 * 1_100.0);
        let group = world
            .insert(
                root,
                ObjectKind::Group,
                Rect::from_origin_size(origin, (1_000.0, 1_000.0)),
            )
            .unwrap();
        for i in 0..100 {
            let at = Point::new((i % 10) as f64 * 100.0, (i / 10) as f64 * 100.0);
            let card = world
                .insert(
                    group,
                    ObjectKind::Box,
                    Rect::from_origin_size(at, (90.0, 90.0)),
                )
                .unwrap();
            world.set_listening(card, EventMask::CLICK);
            cards.push(card);
        }
    }
    world.recalculate_world_size();
    (world, cards)
}

fn bench_world(c: &mut Criterion) {
    let mut group = c.benchmark_group("world");
    for groups in [10usize, 100] {
        let (mut world, cards) = board(groups);
        let n = groups * 100;

        group.bench_with_input(BenchmarkId::new("world_strand", n), &world, |b, world| {
            b.iter(|| black_box(world.world_strand()));
        });

        group.bench_with_input(BenchmarkId::new("hit_test", n), &world, |b, world| {
            let points: Vec<Point> = (0..64)
                .map(|i| Point::new(f64::from(i) * 137.0 % 10_000.0, f64::from(i) * 91.0 % 1_000.0))
                .collect();
            b.iter(|| {
                for &p in &points {
                    black_box(hit_test(world, p, EventMask::CLICK));
                }
            });
        });

        group.bench_function(BenchmarkId::new("move_and_relayout", n), |b| {
            let mut flip = 1.0;
            b.iter(|| {
                for &card in cards.iter().step_by(97) {
                    world.translate(card, Vec2::new(flip, 0.0));
                }
                flip = -flip;
                black_box(world.recalculate_world_size());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_world);
criterion_main!(benches);
