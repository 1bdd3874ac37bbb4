// Copyright 2025 the Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=atlas_world --heading-base-level=0

//! Atlas World: the scene tree of a deep-zoom viewer.
//!
//! A [`World`] is a hierarchy of positioned, scaled objects (images, tiled
//! images, boxes, text) under a single root. Each object maps its local
//! space into its parent's with `p' = origin + p × scale`.
//!
//! - Geometry lives in one [`Strand`](atlas_strand::Strand) indexed by slot:
//!   every object owns the record holding its bounds in parent space.
//! - Container bounds are the union of their visible children and are
//!   recomputed lazily by [`World::recalculate_world_size`], so a burst of
//!   edits costs one bottom-up pass.
//! - Layout changes are announced to subscribers as
//!   [`LayoutEvent::RecalculateWorldSize`] (named `"recalculate-world-size"`);
//!   this is how a viewport re-homes without polling.
//! - [`World::world_strand`] flattens the visible tree into world space in
//!   paint order for renderers and culling.
//!
//! ## API overview
//!
//! - [`World::insert`] / [`World::create`] + [`World::append_child`] → [`ObjectId`]
//! - [`World::remove_child`] / [`World::remove`] return every destroyed id so
//!   owners can release resources bound to them.
//! - [`World::set_origin`], [`World::translate`], [`World::set_size`],
//!   [`World::set_scale`], [`World::set_flags`] for direct edits.
//! - [`World::world_bounds`], [`World::world_transform`], [`World::path`].
//!
//! ## Minimal example
//!
//! ```rust
//! use atlas_world::{ObjectKind, World};
//! use kurbo::Rect;
//!
//! let mut world = World::new();
//! let root = world.root();
//! let image = world
//!     .insert(root, ObjectKind::Image, Rect::new(0.0, 0.0, 1200.0, 1800.0))
//!     .unwrap();
//! world.insert(root, ObjectKind::Box, Rect::new(1300.0, 0.0, 1400.0, 50.0)).unwrap();
//!
//! let bounds = world.recalculate_world_size().unwrap();
//! assert_eq!(bounds, Rect::new(0.0, 0.0, 1400.0, 1800.0));
//!
//! // Removing a child returns the destroyed ids.
//! assert_eq!(world.remove_child(root, image), vec![image]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod layout;
mod types;
mod world;

pub use layout::{LayoutEvent, LayoutSubscription};
pub use types::{EventMask, ObjectFlags, ObjectId, ObjectKind, WorldError};
pub use world::{World, WorldStrand};
