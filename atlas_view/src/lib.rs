// Copyright 2025 the Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=atlas_view --heading-base-level=0

//! Atlas View: the viewport transform engine of a deep-zoom viewer.
//!
//! A [`Viewport`] maps world units to screen pixels with a uniform scale and
//! a pan offset. It provides:
//! - Exact inverse conversions ([`Viewport::world_to_viewer`],
//!   [`Viewport::viewer_to_world`]).
//! - Home and region navigation that fits a rectangle into the view minus
//!   per-edge [`HomePadding`], preserving aspect ratio.
//! - Zoom limits relative to the home scale and pan clamping against a
//!   bounding box, enforced after every mutation.
//! - Two navigation primitives, "set now" and "set over time", with an
//!   ease-in-out transition advanced by [`Viewport::step`].
//!
//! It does not own a scene. Feed it the scene's aggregate bounds through
//! [`Viewport::set_world_bounds`] whenever they change.
//!
//! ## Minimal example
//!
//! ```rust
//! use atlas_view::{GotoOptions, Viewport};
//! use kurbo::{Point, Rect};
//!
//! let mut view = Viewport::new(Rect::new(0.0, 0.0, 600.0, 300.0));
//! view.set_world_bounds(Some(Rect::new(0.0, 0.0, 1200.0, 1800.0)));
//! view.go_home(GotoOptions::immediate());
//!
//! // Height is the binding axis: 300 / 1800.
//! assert!((view.scale_factor() - 1.0 / 6.0).abs() < 1e-12);
//!
//! let world = view.viewer_to_world(Point::new(300.0, 150.0));
//! assert!((world.x - 600.0).abs() < 1e-9 && (world.y - 900.0).abs() < 1e-9);
//! ```
//!
//! ## Degenerate geometry
//!
//! Fitting a rectangle with zero width or height (or fitting into a view
//! whose padded area is empty) uses scale `1` instead of dividing by zero.
//!
//! This crate is `no_std`.

#![no_std]

mod config;
mod transition;
mod viewport;

pub use config::{ClampMode, FitMode, GotoOptions, HomePadding, ViewConfig};
pub use viewport::{ViewRegion, Viewport, ViewportDebugInfo};
