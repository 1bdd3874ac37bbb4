// Copyright 2025 the Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=atlas_grid --heading-base-level=0

//! Atlas Grid: sparse tile grids and level-of-detail selection.
//!
//! A [`SparseGrid`] answers one question: given a rectangle of interest,
//! which tiles have never been requested before? The grid is conceptually
//! infinite (negative indices included); a cell only exists once a request
//! rectangle has touched it, and it is materialized exactly once.
//!
//! - [`SparseGrid::generate`] floor-divides the rectangle by the tile size,
//!   walks the inclusive column/row range in row-major order and appends a
//!   [`Strand`](atlas_strand::Strand) record for every unseen cell.
//! - Repeated or overlapping rectangles are cheap and idempotent: seen cells
//!   are skipped and never re-counted.
//!
//! [`TileLevels`] stacks one grid per scale factor of a tiled image and picks
//! the level matching the current viewport scale.
//!
//! ## Minimal example
//!
//! ```rust
//! use atlas_grid::SparseGrid;
//! use kurbo::{Point, Rect};
//!
//! let mut grid = SparseGrid::new(256.0, |p: Point| (p.x, p.y)).unwrap();
//! let first = grid.generate(Rect::new(0.0, 0.0, 10.0, 10.0));
//! assert_eq!(first.loaded, 1);
//! assert_eq!(grid.strand().rect(0), Some(Rect::new(0.0, 0.0, 256.0, 256.0)));
//!
//! // Asking again materializes nothing new.
//! assert_eq!(grid.generate(Rect::new(0.0, 0.0, 10.0, 10.0)).loaded, 0);
//! assert_eq!(grid.total_loaded(), 1);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod grid;
mod levels;

pub use grid::{Cell, CellRange, Generated, GridError, SparseGrid, TileCoord};
pub use levels::{LevelRequest, TileKey, TileLevels, TileSource};
