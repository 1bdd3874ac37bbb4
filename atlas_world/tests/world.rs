// Copyright 2025 the Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for the `atlas_world` crate.
//!
//! Structural edits across several levels, checked against the invariant
//! that each container's record is the union of its visible children once
//! the world size is recalculated.

use atlas_world::{ObjectKind, World};
use kurbo::{Point, Rect, Size, Vec2};

fn union_of_children(world: &World, id: atlas_world::ObjectId) -> Option<Rect> {
    world
        .children(id)
        .iter()
        .filter(|c| {
            world
                .flags(**c)
                .is_some_and(|f| f.contains(atlas_world::ObjectFlags::VISIBLE))
        })
        .filter_map(|c| world.local_bounds(*c))
        .reduce(|a, b| a.union(b))
}

fn assert_containers_consistent(world: &World) {
    for id in world.objects() {
        let kind = world.kind(id).unwrap();
        if !kind.is_container() {
            continue;
        }
        let Some(union) = union_of_children(world, id) else {
            continue;
        };
        let origin = world.origin(id).unwrap();
        let scale = world.scale(id).unwrap();
        let expected = Rect::new(
            origin.x + union.x0 * scale,
            origin.y + union.y0 * scale,
            origin.x + union.x1 * scale,
            origin.y + union.y1 * scale,
        );
        assert_eq!(world.local_bounds(id), Some(expected), "{kind:?} {id:?}");
    }
}

#[test]
fn bounds_stay_consistent_through_edits() {
    let mut world = World::new();
    let root = world.root();
    let g1 = world
        .insert(root, ObjectKind::Group, Rect::new(50.0, 50.0, 50.0, 50.0))
        .unwrap();
    let g2 = world
        .insert(g1, ObjectKind::Composite, Rect::new(10.0, 0.0, 10.0, 0.0))
        .unwrap();
    world.set_scale(g2, 0.25);
    let img = world
        .insert(g2, ObjectKind::TiledImage, Rect::new(0.0, 0.0, 4000.0, 2000.0))
        .unwrap();
    let label = world
        .insert(g1, ObjectKind::Text, Rect::new(0.0, -20.0, 300.0, 0.0))
        .unwrap();
    world.recalculate_world_size();
    assert_containers_consistent(&world);
    assert_eq!(world.world_bounds(img), Some(Rect::new(60.0, 50.0, 1060.0, 550.0)));

    world.translate(label, Vec2::new(-100.0, 0.0));
    world.set_size(img, Size::new(8000.0, 2000.0));
    world.append_child(root, label).unwrap();
    world.recalculate_world_size();
    assert_containers_consistent(&world);
    assert_eq!(world.bounds(), Rect::new(-100.0, -20.0, 2060.0, 550.0));

    let removed = world.remove_child(g1, g2);
    assert_eq!(removed, vec![g2, img]);
    world.recalculate_world_size();
    assert_containers_consistent(&world);
}

#[test]
fn removal_of_missing_child_is_a_noop() {
    let mut world = World::new();
    let root = world.root();
    let stray = world.create(ObjectKind::Box, Rect::new(0.0, 0.0, 1.0, 1.0));
    assert!(world.remove_child(root, stray).is_empty());
    world.recalculate_world_size();
    assert!(world.remove_child(root, stray).is_empty());
    assert!(!world.is_layout_dirty());
}

#[test]
fn path_runs_root_to_target() {
    let mut world = World::new();
    let root = world.root();
    let g = world.insert(root, ObjectKind::Group, Rect::ZERO).unwrap();
    let leaf = world
        .insert(g, ObjectKind::Image, Rect::new(0.0, 0.0, 2.0, 2.0))
        .unwrap();
    assert_eq!(world.path(leaf), vec![root, g, leaf]);
    let tf = world.world_transform(leaf).unwrap();
    assert_eq!(tf * Point::new(1.0, 1.0), Point::new(1.0, 1.0));
}
