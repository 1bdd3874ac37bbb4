// Copyright 2025 the Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=atlas_strand --heading-base-level=0

//! Atlas Strand: flat, fixed-stride geometry for large sets of boxes.
//!
//! A [`Strand`] stores a sequence of axis-aligned boxes as one contiguous
//! `f64` buffer. Every record is [`STRIDE`] numbers wide:
//!
//! ```text
//! [ kind, x1, y1, x2, y2 ]
//! ```
//!
//! where `kind` is a numeric tag (see [`Kind`]) and `(x1, y1)`/`(x2, y2)` are
//! two opposite corners with `x2 >= x1` and `y2 >= y1`.
//!
//! Storing boxes this way lets a whole subtree be scaled or translated with a
//! single arithmetic pass over the buffer instead of visiting objects one by
//! one. Records are addressed by index, never by reference.
//!
//! The human-facing form of one record is a [`Projection`]
//! (`x`, `y`, `width`, `height`).
//!
//! ## Predicates
//!
//! [`intersects`] and [`contains_point`] use closed-interval semantics:
//! boxes that only share an edge intersect. Culling relies on this, so an
//! object exactly edge-adjacent to the viewport is still considered visible.
//!
//! ## Minimal example
//!
//! ```rust
//! use atlas_strand::{Kind, Strand, intersects};
//! use kurbo::{Point, Rect};
//!
//! let mut strand = Strand::allocate(2);
//! strand.write(0, Kind::VISIBLE, 0.0, 0.0, 10.0, 10.0).unwrap();
//! strand.write(1, Kind::VISIBLE, 10.0, 0.0, 20.0, 10.0).unwrap();
//!
//! // Double everything around the origin in one pass.
//! strand.scale_at(2.0, Point::ORIGIN);
//! let p = strand.projection(1).unwrap();
//! assert_eq!((p.x, p.y, p.width, p.height), (20.0, 0.0, 20.0, 20.0));
//!
//! // Edge-adjacent boxes intersect.
//! assert!(intersects(
//!     Rect::new(0.0, 0.0, 20.0, 20.0),
//!     Rect::new(20.0, 0.0, 40.0, 20.0),
//! ));
//! ```
//!
//! ## Rotation
//!
//! [`Strand::rotate`] only tracks the two stored corners of each record, so
//! a rotated record is a re-bounded box, not an exact rotated rectangle.
//! Treat it as an approximation.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod predicate;
mod projection;
mod strand;

pub use predicate::{contains_point, intersects};
pub use projection::Projection;
pub use strand::{Kind, Record, STRIDE, Strand, StrandError};
