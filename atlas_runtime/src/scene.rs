// Copyright 2025 the Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use atlas_view::{GotoOptions, Viewport};
use atlas_world::{ObjectFlags, ObjectId, World};
use kurbo::Rect;
use std::cell::Cell;
use std::rc::Rc;

/// The mutable state listeners and frame hooks operate on.
#[derive(Debug)]
pub struct Scene {
    /// Scene tree.
    pub world: World,
    /// Camera over the tree.
    pub viewport: Viewport,
}

impl Scene {
    /// Visible objects in paint order, skipping hidden subtrees.
    ///
    /// The root is not included.
    #[must_use]
    pub fn painted_objects(&self) -> Vec<ObjectId> {
        let mut out = Vec::new();
        let mut stack: Vec<ObjectId> = self
            .world
            .children(self.world.root())
            .iter()
            .rev()
            .copied()
            .collect();
        while let Some(id) = stack.pop() {
            let visible = self
                .world
                .flags(id)
                .is_some_and(|f| f.contains(ObjectFlags::VISIBLE));
            if !visible {
                continue;
            }
            out.push(id);
            stack.extend(self.world.children(id).iter().rev().copied());
        }
        out
    }

    /// Returns `true` if `id` and all of its ancestors are visible.
    #[must_use]
    pub fn is_displayed(&self, id: ObjectId) -> bool {
        let path = self.world.path(id);
        !path.is_empty()
            && path.first() == Some(&self.world.root())
            && path.iter().all(|&o| {
                self.world
                    .flags(o)
                    .is_some_and(|f| f.contains(ObjectFlags::VISIBLE))
            })
    }
}

/// Carries root bounds published by the world's layout subscription into
/// the viewport.
#[derive(Debug)]
pub(crate) struct LayoutSync {
    published: Rc<Cell<Option<Rect>>>,
    homed: bool,
}

impl LayoutSync {
    pub(crate) fn new(published: Rc<Cell<Option<Rect>>>) -> Self {
        Self {
            published,
            homed: false,
        }
    }

    /// Recomputes container extents and applies new root bounds. The first
    /// non-empty bounds also send the viewport home.
    pub(crate) fn apply(&mut self, scene: &mut Scene) -> Option<Rect> {
        scene.world.recalculate_world_size();
        let bounds = self.published.take()?;
        tracing::debug!(?bounds, "world resized");
        scene.viewport.set_world_bounds(Some(bounds));
        if !self.homed && bounds.width() > 0.0 && bounds.height() > 0.0 {
            self.homed = true;
            scene.viewport.go_home(GotoOptions::immediate());
        }
        Some(bounds)
    }
}
