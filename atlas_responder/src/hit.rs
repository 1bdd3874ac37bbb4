// Copyright 2025 the Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hit testing over the scene tree.

use alloc::vec::Vec;

use atlas_strand::contains_point;
use atlas_world::{EventMask, ObjectFlags, ObjectId, World};
use kurbo::Point;

/// A resolved hit: the target and its root→target path.
#[derive(Clone, Debug, PartialEq)]
pub struct HitPath {
    /// Deepest matching object.
    pub target: ObjectId,
    /// Root→target path, inclusive.
    pub path: Vec<ObjectId>,
    /// The query point in the target's local space.
    pub local: Point,
}

/// Finds the topmost, deepest object under `point` (world space) that is
/// interactive and listens for any kind in `mask`.
///
/// The walk is depth-first in reverse paint order and only descends into
/// visible objects whose bounds contain the point (edges included).
/// Objects that do not listen for `mask` are transparent: their children are
/// still searched, and a miss falls through to earlier siblings.
///
/// Container bounds are those of the last
/// [`World::recalculate_world_size`].
#[must_use]
pub fn hit_test(world: &World, point: Point, mask: EventMask) -> Option<HitPath> {
    if mask.is_empty() {
        return None;
    }
    let mut path = Vec::new();
    let (target, local) = visit(world, world.root(), point, mask, &mut path)?;
    Some(HitPath {
        target,
        path,
        local,
    })
}

fn visit(
    world: &World,
    id: ObjectId,
    parent_pt: Point,
    mask: EventMask,
    path: &mut Vec<ObjectId>,
) -> Option<(ObjectId, Point)> {
    let flags = world.flags(id)?;
    if !flags.contains(ObjectFlags::VISIBLE) {
        return None;
    }
    let bounds = world.local_bounds(id)?;
    if !contains_point(bounds, parent_pt) {
        return None;
    }
    let origin = world.origin(id)?;
    let scale = world.scale(id)?;
    let local = ((parent_pt - origin) / scale).to_point();

    path.push(id);
    for &child in world.children(id).iter().rev() {
        if let Some(hit) = visit(world, child, local, mask, path) {
            return Some(hit);
        }
    }
    let listening = world.listening(id).unwrap_or_default();
    if flags.contains(ObjectFlags::INTERACTIVE) && listening.intersects(mask) {
        return Some((id, local));
    }
    path.pop();
    None
}
