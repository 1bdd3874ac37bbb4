// Copyright 2025 the Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core scene tree: structure, editing, bounds and flattening.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use atlas_strand::{Kind, Strand};
use kurbo::{Affine, Point, Rect, Size, Vec2};

use crate::layout::{LayoutEvent, LayoutSubscription, Subscribers};
use crate::types::{EventMask, ObjectFlags, ObjectId, ObjectKind, WorldError};

#[derive(Clone, Debug)]
struct Object {
    generation: u32,
    kind: ObjectKind,
    parent: Option<ObjectId>,
    children: Vec<ObjectId>,
    origin: Point,
    scale: f64,
    content: Size,
    /// Local-space extent: content for leaves, union of children for containers.
    extent: Rect,
    flags: ObjectFlags,
    listening: EventMask,
}

impl Object {
    fn new(generation: u32, kind: ObjectKind, rect: Rect) -> Self {
        let rect = rect.abs();
        let content = rect.size();
        Self {
            generation,
            kind,
            parent: None,
            children: Vec::new(),
            origin: rect.origin(),
            scale: 1.0,
            content,
            extent: Rect::from_origin_size(Point::ORIGIN, content),
            flags: ObjectFlags::default(),
            listening: EventMask::empty(),
        }
    }

    /// Bounds in the parent's coordinate space: `origin + extent * scale`.
    fn parent_bounds(&self) -> Rect {
        Rect::new(
            self.origin.x + self.extent.x0 * self.scale,
            self.origin.y + self.extent.y0 * self.scale,
            self.origin.x + self.extent.x1 * self.scale,
            self.origin.y + self.extent.y1 * self.scale,
        )
    }

    /// Local → parent transform.
    fn local_transform(&self) -> Affine {
        Affine::translate(self.origin.to_vec2()) * Affine::scale(self.scale)
    }
}

/// World geometry flattened into paint order.
///
/// `strand` record `i` is the world-space bounds of `ids[i]`, tagged with
/// [`ObjectKind::tag`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorldStrand {
    /// World-space bounds in paint order.
    pub strand: Strand,
    /// Object for each record.
    pub ids: Vec<ObjectId>,
}

/// Hierarchical container of positioned, scaled objects.
///
/// Every object owns one record of [`World::geometry`], at its slot index,
/// holding its bounds in the parent's coordinate space (`origin + extent ×
/// scale`). Leaf records follow edits immediately. Container extents are the
/// union of their visible children's records and are only refreshed by
/// [`World::recalculate_world_size`], which batches the bottom-up pass.
pub struct World {
    objects: Vec<Option<Object>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    geometry: Strand,
    root: ObjectId,
    layout_dirty: bool,
    published: Option<Rect>,
    subscribers: Subscribers,
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.objects.len();
        let alive = self.objects.iter().filter(|o| o.is_some()).count();
        f.debug_struct("World")
            .field("objects_total", &total)
            .field("objects_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("layout_dirty", &self.layout_dirty)
            .field("bounds", &self.published)
            .field("subscribers", &self.subscribers)
            .finish_non_exhaustive()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Creates a world holding only an empty root.
    #[must_use]
    pub fn new() -> Self {
        let mut world = Self {
            objects: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            geometry: Strand::new(),
            root: ObjectId::new(0, 1),
            layout_dirty: true,
            published: None,
            subscribers: Subscribers::default(),
        };
        world.root = world.create(ObjectKind::World, Rect::ZERO);
        world
    }

    /// The root object.
    #[must_use]
    pub fn root(&self) -> ObjectId {
        self.root
    }

    /// Returns `true` if `id` refers to a live object.
    #[must_use]
    pub fn is_alive(&self, id: ObjectId) -> bool {
        self.objects
            .get(id.idx())
            .and_then(|o| o.as_ref())
            .is_some_and(|o| o.generation == id.1)
    }

    /// Number of live objects, attached or not, including the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len() - self.free_list.len()
    }

    /// Always `false`: the root is always live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Creates a detached object whose parent-space bounds are `rect`.
    ///
    /// The object starts with scale `1`, origin `rect.origin()` and content
    /// size `rect.size()`. Attach it with [`World::append_child`].
    pub fn create(&mut self, kind: ObjectKind, rect: Rect) -> ObjectId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.objects[idx] = Some(Object::new(generation, kind, rect));
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.objects.push(Some(Object::new(generation, kind, rect)));
            self.generations.push(generation);
            (self.objects.len() - 1, generation)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "ObjectId uses 32-bit slot indices."
        )]
        let id = ObjectId::new(idx as u32, generation);
        self.write_geometry(id);
        id
    }

    /// Creates an object and appends it to `parent`.
    pub fn insert(
        &mut self,
        parent: ObjectId,
        kind: ObjectKind,
        rect: Rect,
    ) -> Result<ObjectId, WorldError> {
        self.check_container(parent)?;
        let id = self.create(kind, rect);
        self.link_parent(id, parent);
        self.layout_dirty = true;
        Ok(id)
    }

    /// Appends `child` as the last (topmost) child of `parent`.
    ///
    /// A child already attached elsewhere, or already under `parent`, is
    /// detached first and re-attached at the end.
    pub fn append_child(&mut self, parent: ObjectId, child: ObjectId) -> Result<(), WorldError> {
        self.check_container(parent)?;
        if !self.is_alive(child) {
            return Err(WorldError::UnknownObject(child));
        }
        if child == self.root {
            return Err(WorldError::RootImmovable);
        }
        if parent == child || self.is_ancestor(child, parent) {
            return Err(WorldError::Cycle { parent, child });
        }
        if let Some(old) = self.object(child).parent {
            self.unlink_parent(child, old);
        }
        self.link_parent(child, parent);
        self.layout_dirty = true;
        Ok(())
    }

    /// Detaches `child` from `parent` and destroys its subtree.
    ///
    /// Returns every destroyed id (the child first). A `child` that is not a
    /// live child of `parent` is a no-op and yields an empty list.
    pub fn remove_child(&mut self, parent: ObjectId, child: ObjectId) -> Vec<ObjectId> {
        if !self.is_alive(parent) || !self.is_alive(child) {
            return Vec::new();
        }
        if self.object(child).parent != Some(parent) {
            return Vec::new();
        }
        self.remove(child)
    }

    /// Detaches `id` from its parent (if any) and destroys its subtree.
    ///
    /// Returns every destroyed id. The root and stale ids are ignored.
    pub fn remove(&mut self, id: ObjectId) -> Vec<ObjectId> {
        if !self.is_alive(id) || id == self.root {
            return Vec::new();
        }
        if let Some(parent) = self.object(id).parent {
            self.unlink_parent(id, parent);
            self.layout_dirty = true;
        }
        let mut removed = Vec::new();
        self.destroy_subtree(id, &mut removed);
        removed
    }

    /// Recomputes container extents bottom-up and publishes the root bounds.
    ///
    /// This is a no-op unless something changed since the last call. When the
    /// root bounds differ from the last published value, every subscriber
    /// receives [`LayoutEvent::RecalculateWorldSize`] and the new bounds are
    /// returned.
    pub fn recalculate_world_size(&mut self) -> Option<Rect> {
        if !self.layout_dirty {
            return None;
        }
        self.layout_dirty = false;
        self.refresh_extent(self.root);
        let bounds = self.geometry.rect(self.root.idx()).unwrap_or(Rect::ZERO);
        if self.published == Some(bounds) {
            return None;
        }
        self.published = Some(bounds);
        self.subscribers
            .emit(&LayoutEvent::RecalculateWorldSize { bounds });
        Some(bounds)
    }

    /// Root bounds as of the last [`World::recalculate_world_size`].
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.published.unwrap_or(Rect::ZERO)
    }

    /// Returns `true` if structure or geometry changed since the last
    /// [`World::recalculate_world_size`].
    #[must_use]
    pub fn is_layout_dirty(&self) -> bool {
        self.layout_dirty
    }

    /// Registers a layout-change callback.
    pub fn subscribe(
        &mut self,
        callback: impl FnMut(&LayoutEvent) + 'static,
    ) -> LayoutSubscription {
        self.subscribers.insert(Box::new(callback))
    }

    /// Removes a callback. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, subscription: LayoutSubscription) -> bool {
        self.subscribers.remove(subscription)
    }

    /// Number of layout subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Every attached object in paint order (pre-order, earlier siblings first).
    #[must_use]
    pub fn objects(&self) -> Vec<ObjectId> {
        let mut out = Vec::with_capacity(self.len());
        let mut stack = alloc::vec![self.root];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.object(id).children.iter().rev().copied());
        }
        out
    }

    /// Object kind.
    #[must_use]
    pub fn kind(&self, id: ObjectId) -> Option<ObjectKind> {
        self.object_opt(id).map(|o| o.kind)
    }

    /// Parent of a live object (`None` for the root and detached objects).
    #[must_use]
    pub fn parent(&self, id: ObjectId) -> Option<ObjectId> {
        self.object_opt(id).and_then(|o| o.parent)
    }

    /// Children of `id` in paint order. Empty for stale ids.
    #[must_use]
    pub fn children(&self, id: ObjectId) -> &[ObjectId] {
        self.object_opt(id).map_or(&[], |o| o.children.as_slice())
    }

    /// Path from the root to `id`, inclusive.
    ///
    /// For detached objects the path starts at the topmost detached ancestor.
    #[must_use]
    pub fn path(&self, id: ObjectId) -> Vec<ObjectId> {
        if !self.is_alive(id) {
            return Vec::new();
        }
        let mut out = Vec::new();
        let mut cur = Some(id);
        while let Some(c) = cur {
            out.push(c);
            cur = self.object(c).parent;
        }
        out.reverse();
        out
    }

    /// Origin in the parent's coordinate space.
    #[must_use]
    pub fn origin(&self, id: ObjectId) -> Option<Point> {
        self.object_opt(id).map(|o| o.origin)
    }

    /// Local → parent scale factor.
    #[must_use]
    pub fn scale(&self, id: ObjectId) -> Option<f64> {
        self.object_opt(id).map(|o| o.scale)
    }

    /// Intrinsic content size in local units.
    #[must_use]
    pub fn size(&self, id: ObjectId) -> Option<Size> {
        self.object_opt(id).map(|o| o.content)
    }

    /// Visibility and picking flags.
    #[must_use]
    pub fn flags(&self, id: ObjectId) -> Option<ObjectFlags> {
        self.object_opt(id).map(|o| o.flags)
    }

    /// Event kinds the object listens for.
    #[must_use]
    pub fn listening(&self, id: ObjectId) -> Option<EventMask> {
        self.object_opt(id).map(|o| o.listening)
    }

    /// Bounds in the parent's coordinate space (the object's geometry record).
    #[must_use]
    pub fn local_bounds(&self, id: ObjectId) -> Option<Rect> {
        self.object_opt(id)?;
        self.geometry.rect(id.idx())
    }

    /// Local → world transform.
    #[must_use]
    pub fn world_transform(&self, id: ObjectId) -> Option<Affine> {
        self.object_opt(id)?;
        let mut tf = Affine::IDENTITY;
        let mut cur = Some(id);
        while let Some(c) = cur {
            let o = self.object(c);
            tf = o.local_transform() * tf;
            cur = o.parent;
        }
        Some(tf)
    }

    /// World-space bounds.
    ///
    /// Container bounds reflect the last [`World::recalculate_world_size`].
    #[must_use]
    pub fn world_bounds(&self, id: ObjectId) -> Option<Rect> {
        let local = self.local_bounds(id)?;
        let parent_tf = match self.parent(id) {
            Some(p) => self.world_transform(p)?,
            None => Affine::IDENTITY,
        };
        Some(parent_tf.transform_rect_bbox(local))
    }

    /// Per-slot parent-space geometry. Record `i` belongs to the object in
    /// slot `i`; freed slots hold hidden records.
    #[must_use]
    pub fn geometry(&self) -> &Strand {
        &self.geometry
    }

    /// Moves an object so its origin is `origin` (parent space).
    pub fn set_origin(&mut self, id: ObjectId, origin: Point) {
        if let Some(o) = self.object_opt_mut(id) {
            o.origin = origin;
            self.touch(id);
        }
    }

    /// Moves an object by `delta` (parent space).
    pub fn translate(&mut self, id: ObjectId, delta: Vec2) {
        if let Some(o) = self.object_opt_mut(id) {
            o.origin += delta;
            self.touch(id);
        }
    }

    /// Sets intrinsic content size (box draw/resize).
    ///
    /// Container extents stay as last computed until the next
    /// [`World::recalculate_world_size`]; the size is their fallback extent
    /// when they have no visible children.
    pub fn set_size(&mut self, id: ObjectId, size: Size) {
        if let Some(o) = self.object_opt_mut(id) {
            o.content = Size::new(size.width.abs(), size.height.abs());
            if !o.kind.is_container() {
                o.extent = Rect::from_origin_size(Point::ORIGIN, o.content);
            }
            self.touch(id);
        }
    }

    /// Sets the local → parent scale. Non-positive or non-finite values are ignored.
    pub fn set_scale(&mut self, id: ObjectId, scale: f64) {
        if !(scale > 0.0 && scale.is_finite()) {
            return;
        }
        if let Some(o) = self.object_opt_mut(id) {
            o.scale = scale;
            self.touch(id);
        }
    }

    /// Replaces the visibility and picking flags.
    pub fn set_flags(&mut self, id: ObjectId, flags: ObjectFlags) {
        if let Some(o) = self.object_opt_mut(id) {
            o.flags = flags;
            self.touch(id);
        }
    }

    /// Replaces the listened event mask.
    pub fn set_listening(&mut self, id: ObjectId, mask: EventMask) {
        if let Some(o) = self.object_opt_mut(id) {
            o.listening = mask;
        }
    }

    /// Flattens the visible, attached tree into world space, in paint order.
    ///
    /// Sibling records are mapped into world space with one bulk strand
    /// transform per container. Hidden objects and their subtrees are skipped.
    #[must_use]
    pub fn world_strand(&self) -> WorldStrand {
        let mut out = WorldStrand::default();
        let root = self.object(self.root);
        if !root.flags.contains(ObjectFlags::VISIBLE) {
            return out;
        }
        if let Some(r) = self.geometry.rect(self.root.idx()) {
            out.strand.push(root.kind.tag(), r);
            out.ids.push(self.root);
        }
        self.flatten(self.root, root.scale, root.origin.to_vec2(), &mut out);
        out
    }

    // --- internals ---

    fn flatten(&self, id: ObjectId, scale: f64, offset: Vec2, out: &mut WorldStrand) {
        let visible: Vec<ObjectId> = self
            .object(id)
            .children
            .iter()
            .copied()
            .filter(|c| self.object(*c).flags.contains(ObjectFlags::VISIBLE))
            .collect();
        if visible.is_empty() {
            return;
        }
        let mut local = Strand::with_capacity(visible.len());
        for c in &visible {
            let tag = self.object(*c).kind.tag();
            local.push(tag, self.geometry.rect(c.idx()).unwrap_or(Rect::ZERO));
        }
        let mut world = Strand::with_capacity(visible.len());
        world.extend_transformed(&local, scale, offset);
        for (i, record) in world.iter().enumerate() {
            let child = visible[i];
            out.strand.push(record.kind, record.rect());
            out.ids.push(child);
            let o = self.object(child);
            self.flatten(child, scale * o.scale, offset + o.origin.to_vec2() * scale, out);
        }
    }

    fn refresh_extent(&mut self, id: ObjectId) {
        let children = self.object(id).children.clone();
        for c in &children {
            self.refresh_extent(*c);
        }
        if !self.object(id).kind.is_container() {
            return;
        }
        let union = children
            .iter()
            .filter(|c| self.geometry.kind(c.idx()).is_some_and(Kind::is_visible))
            .filter_map(|c| self.geometry.rect(c.idx()))
            .reduce(|acc, r| acc.union(r));
        let o = self.object_mut(id);
        o.extent = union.unwrap_or(Rect::from_origin_size(Point::ORIGIN, o.content));
        self.write_geometry(id);
    }

    fn touch(&mut self, id: ObjectId) {
        self.write_geometry(id);
        self.layout_dirty = true;
    }

    fn write_geometry(&mut self, id: ObjectId) {
        let o = self.object(id);
        let kind = if o.flags.contains(ObjectFlags::VISIBLE) {
            Kind::VISIBLE
        } else {
            Kind::HIDDEN
        };
        let rect = o.parent_bounds();
        self.geometry.ensure_len(id.idx() + 1);
        // In range after `ensure_len`.
        let _ = self.geometry.write_rect(id.idx(), kind, rect);
    }

    fn destroy_subtree(&mut self, id: ObjectId, removed: &mut Vec<ObjectId>) {
        removed.push(id);
        let children = core::mem::take(&mut self.object_mut(id).children);
        for c in children {
            self.destroy_subtree(c, removed);
        }
        self.geometry.hide(id.idx());
        self.objects[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    fn check_container(&self, id: ObjectId) -> Result<(), WorldError> {
        let o = self.object_opt(id).ok_or(WorldError::UnknownObject(id))?;
        if o.kind.is_container() {
            Ok(())
        } else {
            Err(WorldError::NotAContainer(id))
        }
    }

    /// Returns `true` if `ancestor` is a strict ancestor of `id`.
    fn is_ancestor(&self, ancestor: ObjectId, id: ObjectId) -> bool {
        let mut cur = self.object(id).parent;
        while let Some(c) = cur {
            if c == ancestor {
                return true;
            }
            cur = self.object(c).parent;
        }
        false
    }

    fn link_parent(&mut self, id: ObjectId, parent: ObjectId) {
        self.object_mut(parent).children.push(id);
        self.object_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: ObjectId, parent: ObjectId) {
        self.object_mut(parent).children.retain(|c| *c != id);
        self.object_mut(id).parent = None;
    }

    fn object(&self, id: ObjectId) -> &Object {
        self.objects[id.idx()].as_ref().expect("dangling ObjectId")
    }

    fn object_mut(&mut self, id: ObjectId) -> &mut Object {
        self.objects[id.idx()].as_mut().expect("dangling ObjectId")
    }

    fn object_opt(&self, id: ObjectId) -> Option<&Object> {
        let o = self.objects.get(id.idx())?.as_ref()?;
        (o.generation == id.1).then_some(o)
    }

    fn object_opt_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
        let o = self.objects.get_mut(id.idx())?.as_mut()?;
        (o.generation == id.1).then_some(o)
    }
}
