// Copyright 2025 the Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sparse grid: lazily materialized cells over an unbounded plane.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;
use core::ops::Range;

use atlas_strand::{Kind, Strand};
use hashbrown::{HashMap, HashSet};
use kurbo::{Point, Rect, Size};

/// Errors returned when configuring a grid.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum GridError {
    /// Tile edge length must be finite and strictly positive.
    #[error("invalid tile size {0}")]
    InvalidTileSize(f64),
    /// A tiled image needs at least one scale factor.
    #[error("tile source has no scale factors")]
    NoLevels,
}

/// Integer cell address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    /// Column index (`floor(x / tile_size)`).
    pub col: i64,
    /// Row index (`floor(y / tile_size)`).
    pub row: i64,
}

impl TileCoord {
    /// Creates a coordinate.
    #[must_use]
    pub const fn new(col: i64, row: i64) -> Self {
        Self { col, row }
    }
}

/// Inclusive range of columns and rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRange {
    /// First column.
    pub col_start: i64,
    /// Last column (inclusive).
    pub col_end: i64,
    /// First row.
    pub row_start: i64,
    /// Last row (inclusive).
    pub row_end: i64,
}

impl CellRange {
    /// Number of cells covered.
    #[must_use]
    ///
    /// Saturates at `usize::MAX` for ranges too large to count.
    pub fn len(&self) -> usize {
        if self.col_end < self.col_start || self.row_end < self.row_start {
            return 0;
        }
        let span = |start: i64, end: i64| end.checked_sub(start)?.checked_add(1);
        span(self.col_start, self.col_end)
            .zip(span(self.row_start, self.row_end))
            .and_then(|(cols, rows)| cols.checked_mul(rows))
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(usize::MAX)
    }

    /// Returns `true` if the range covers no cell.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if `coord` is inside the range.
    #[must_use]
    pub fn contains(&self, coord: TileCoord) -> bool {
        (self.col_start..=self.col_end).contains(&coord.col)
            && (self.row_start..=self.row_end).contains(&coord.row)
    }

    /// Iterates the range in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = TileCoord> + '_ {
        (self.row_start..=self.row_end)
            .flat_map(move |row| {
                (self.col_start..=self.col_end).map(move |col| TileCoord { col, row })
            })
    }
}

/// A materialized cell and the key generated for it.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell<K> {
    /// Grid address.
    pub coord: TileCoord,
    /// Key produced by the grid's key function for the cell origin.
    pub key: K,
}

/// Result of [`SparseGrid::generate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Generated {
    /// Number of newly materialized cells.
    pub loaded: usize,
    /// Strand record indices (and [`SparseGrid::cells`] indices) of the new cells.
    pub records: Range<usize>,
}

/// Lazily materialized tile grid.
///
/// Every cell is recorded in a row → column `loaded_map` the first time a
/// request rectangle touches it and is never emitted again. `total_loaded`
/// only grows. Each materialized cell owns one record in [`SparseGrid::strand`]
/// and one entry in [`SparseGrid::cells`], at the same index.
pub struct SparseGrid<K> {
    tile_size: f64,
    extent: Option<Size>,
    key_for: Box<dyn Fn(Point) -> K>,
    loaded_map: HashMap<i64, HashSet<i64>>,
    total_loaded: usize,
    strand: Strand,
    cells: Vec<Cell<K>>,
}

impl<K> fmt::Debug for SparseGrid<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SparseGrid")
            .field("tile_size", &self.tile_size)
            .field("extent", &self.extent)
            .field("total_loaded", &self.total_loaded)
            .finish_non_exhaustive()
    }
}

impl<K> SparseGrid<K> {
    /// Largest cell range a single [`SparseGrid::generate`] call materializes.
    pub const MAX_REQUEST_CELLS: usize = 1 << 22;

    /// Creates an unbounded grid of `tile_size` cells.
    ///
    /// `key_for` receives the world-space origin of each new cell and returns
    /// the key (for example a tile URL) used to load it.
    pub fn new(tile_size: f64, key_for: impl Fn(Point) -> K + 'static) -> Result<Self, GridError> {
        if !tile_size.is_finite() || tile_size <= 0.0 {
            return Err(GridError::InvalidTileSize(tile_size));
        }
        Ok(Self {
            tile_size,
            extent: None,
            key_for: Box::new(key_for),
            loaded_map: HashMap::new(),
            total_loaded: 0,
            strand: Strand::new(),
            cells: Vec::new(),
        })
    }

    /// Restricts the grid to `[0, extent)`.
    ///
    /// Cells outside the extent are never materialized and cells straddling
    /// its far edges get records clipped to it.
    #[must_use]
    pub fn with_extent(mut self, extent: Size) -> Self {
        self.extent = Some(extent);
        self
    }

    /// Tile edge length.
    #[must_use]
    pub fn tile_size(&self) -> f64 {
        self.tile_size
    }

    /// Optional extent.
    #[must_use]
    pub fn extent(&self) -> Option<Size> {
        self.extent
    }

    /// Number of distinct cells ever materialized.
    #[must_use]
    pub fn total_loaded(&self) -> usize {
        self.total_loaded
    }

    /// Geometry of every materialized cell, in materialization order.
    #[must_use]
    pub fn strand(&self) -> &Strand {
        &self.strand
    }

    /// Every materialized cell, parallel to [`SparseGrid::strand`].
    #[must_use]
    pub fn cells(&self) -> &[Cell<K>] {
        &self.cells
    }

    /// Returns `true` if `coord` has been materialized.
    #[must_use]
    pub fn is_loaded(&self, coord: TileCoord) -> bool {
        self.loaded_map
            .get(&coord.row)
            .is_some_and(|cols| cols.contains(&coord.col))
    }

    /// Inclusive cell range overlapping `rect`, clipped to the extent if any.
    ///
    /// Returns `None` for non-finite rects or rects entirely outside the extent.
    #[must_use]
    pub fn cell_range(&self, rect: Rect) -> Option<CellRange> {
        if !rect.is_finite() {
            return None;
        }
        let rect = rect.abs();
        let mut range = CellRange {
            col_start: floor_div(rect.x0, self.tile_size),
            col_end: floor_div(rect.x1, self.tile_size),
            row_start: floor_div(rect.y0, self.tile_size),
            row_end: floor_div(rect.y1, self.tile_size),
        };
        if let Some(extent) = self.extent {
            let cols = ceil_div(extent.width, self.tile_size);
            let rows = ceil_div(extent.height, self.tile_size);
            range.col_start = range.col_start.max(0);
            range.row_start = range.row_start.max(0);
            range.col_end = range.col_end.min(cols.saturating_sub(1));
            range.row_end = range.row_end.min(rows.saturating_sub(1));
        }
        (!range.is_empty()).then_some(range)
    }

    /// World-space rect of `coord`, clipped to the extent if any.
    #[must_use]
    pub fn cell_rect(&self, coord: TileCoord) -> Rect {
        #[allow(
            clippy::cast_precision_loss,
            reason = "Tile indices stay far below 2^52 for any finite plane."
        )]
        let origin = Point::new(
            coord.col as f64 * self.tile_size,
            coord.row as f64 * self.tile_size,
        );
        let mut rect = Rect::from_origin_size(origin, (self.tile_size, self.tile_size));
        if let Some(extent) = self.extent {
            rect.x1 = rect.x1.min(extent.width);
            rect.y1 = rect.y1.min(extent.height);
        }
        rect
    }

    /// Materializes every unseen cell overlapping `rect`.
    ///
    /// Cells are visited in row-major order. Each new cell is marked loaded,
    /// gets a strand record and a key, and is counted in `loaded`. Cells seen
    /// by an earlier call are skipped.
    ///
    /// A range covering more than [`Self::MAX_REQUEST_CELLS`] cells
    /// materializes nothing.
    pub fn generate(&mut self, rect: Rect) -> Generated {
        let start = self.cells.len();
        let Some(range) = self
            .cell_range(rect)
            .filter(|r| r.len() <= Self::MAX_REQUEST_CELLS)
        else {
            return Generated {
                loaded: 0,
                records: start..start,
            };
        };
        for coord in range.iter() {
            let fresh = self
                .loaded_map
                .entry(coord.row)
                .or_default()
                .insert(coord.col);
            if !fresh {
                continue;
            }
            let cell_rect = self.cell_rect(coord);
            self.strand.push(Kind::VISIBLE, cell_rect);
            self.cells.push(Cell {
                coord,
                key: (self.key_for)(cell_rect.origin()),
            });
            self.total_loaded += 1;
        }
        let end = self.cells.len();
        Generated {
            loaded: end - start,
            records: start..end,
        }
    }

    /// Materialized cells intersecting `rect` (edges inclusive), with their index.
    pub fn visible(&self, rect: Rect) -> impl Iterator<Item = (usize, &Cell<K>)> + '_ {
        self.strand.cull(rect).map(|i| (i, &self.cells[i]))
    }
}

/// `floor(v / step)` as an integer, without `std` float intrinsics.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    reason = "Saturating float-to-int conversion is the intended clamp."
)]
fn floor_div(v: f64, step: f64) -> i64 {
    let q = v / step;
    let t = q as i64;
    if (t as f64) > q { t.saturating_sub(1) } else { t }
}

/// `ceil(v / step)` as an integer.
#[allow(clippy::cast_precision_loss, reason = "Only compared against the quotient.")]
fn ceil_div(v: f64, step: f64) -> i64 {
    let q = v / step;
    let f = floor_div(v, step);
    if (f as f64) < q { f.saturating_add(1) } else { f }
}
