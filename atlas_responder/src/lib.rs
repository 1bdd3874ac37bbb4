// Copyright 2025 the Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=atlas_responder --heading-base-level=0

//! Atlas Responder: hit testing and event routing over an Atlas world.
//!
//! ## Overview
//!
//! - [`hit_test`] walks the scene tree depth-first in reverse paint order and
//!   returns the deepest visible, interactive object under a world point that
//!   listens for the requested kinds, with its root→target path.
//! - [`ListenerRegistry`] keeps per-object listeners keyed by [`EventKind`]
//!   and mirrors them into each object's listened [`EventMask`](atlas_world::EventMask).
//! - [`dispatcher::run`] walks a capture → target → bubble sequence and
//!   honors [`Outcome::Stop`] and [`Outcome::StopAndConsume`].
//! - [`EventRouter`] turns raw [`PointerInput`] into [`RoutedEvent`]s: hover
//!   enter/leave from path changes, press → click, and drags that stay with
//!   the object pressed at the start.
//!
//! Every event carries the pointer position in viewport pixels and, as
//! `atlas`, in world units.
//!
//! ## Workflow
//!
//! ```rust
//! use atlas_responder::{EventKind, EventRouter, ListenerRegistry, PointerButton, PointerInput};
//! use atlas_view::{GotoOptions, Viewport};
//! use atlas_world::{ObjectKind, World};
//! use kurbo::{Point, Rect};
//!
//! let mut world = World::new();
//! let root = world.root();
//! let card = world
//!     .insert(root, ObjectKind::Box, Rect::new(0.0, 0.0, 100.0, 100.0))
//!     .unwrap();
//! let bounds = world.recalculate_world_size();
//!
//! let mut view = Viewport::new(Rect::new(0.0, 0.0, 100.0, 100.0));
//! view.set_world_bounds(bounds);
//! view.go_home(GotoOptions::immediate());
//!
//! let mut clicks: ListenerRegistry<Vec<Point>> = ListenerRegistry::new();
//! clicks
//!     .add_listener(&mut world, card, EventKind::Click, false, |log, ev| log.push(ev.atlas))
//!     .unwrap();
//!
//! let mut router = EventRouter::new();
//! let mut log = Vec::new();
//! for input in [
//!     PointerInput::Down { position: Point::new(40.0, 40.0), button: PointerButton::Primary },
//!     PointerInput::Up { position: Point::new(40.0, 40.0), button: PointerButton::Primary },
//! ] {
//!     for mut routed in router.route(&world, &view, input).events {
//!         clicks.dispatch(&mut log, &routed.sequence, &mut routed.event);
//!     }
//! }
//! assert_eq!(log, vec![Point::new(40.0, 40.0)]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod dispatcher;
pub mod drag;
pub mod hover;

mod hit;
mod listeners;
mod router;
mod types;

pub use hit::{HitPath, hit_test};
pub use listeners::{Listener, ListenerId, ListenerRegistry};
pub use router::{EventRouter, Routed, RoutedEvent, RouterConfig};
pub use types::{AtlasEvent, Dispatch, EventKind, Outcome, Phase, PointerButton, PointerInput};
