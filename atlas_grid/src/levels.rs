// Copyright 2025 the Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Level-of-detail selection over a tiled image.

use alloc::vec::Vec;

use kurbo::{Point, Rect, Size};

use crate::grid::{Generated, GridError, SparseGrid};

/// Geometry of a tiled image pyramid, as reported by an image resolver.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileSource {
    /// Full-resolution width in image pixels.
    pub width: f64,
    /// Full-resolution height in image pixels.
    pub height: f64,
    /// Tile edge length in tile pixels.
    pub tile_size: f64,
    /// Available downsampling factors (1 is full resolution).
    pub scale_factors: Vec<u32>,
}

impl TileSource {
    /// Creates a single-level source at full resolution.
    #[must_use]
    pub fn new(width: f64, height: f64, tile_size: f64) -> Self {
        Self {
            width,
            height,
            tile_size,
            scale_factors: alloc::vec![1],
        }
    }

    /// Replaces the available scale factors.
    #[must_use]
    pub fn with_scale_factors(mut self, factors: impl IntoIterator<Item = u32>) -> Self {
        self.scale_factors = factors.into_iter().collect();
        self
    }

    /// Full-resolution image size.
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Key for one tile of one level.
///
/// `x` and `y` are the tile origin in full-resolution image pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileKey {
    /// Level index (0 is the finest).
    pub level: usize,
    /// Downsampling factor of the level.
    pub scale_factor: u32,
    /// Tile origin x in image pixels.
    pub x: i64,
    /// Tile origin y in image pixels.
    pub y: i64,
}

/// Result of [`TileLevels::request`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelRequest {
    /// Level the request was served from.
    pub level: usize,
    /// Newly materialized cells of that level.
    pub generated: Generated,
}

/// One [`SparseGrid`] per scale factor of a [`TileSource`].
///
/// Levels are ordered finest first. A level with factor `f` covers
/// `tile_size × f` image pixels per tile and is bounded by the image size.
#[derive(Debug)]
pub struct TileLevels {
    source: TileSource,
    factors: Vec<u32>,
    grids: Vec<SparseGrid<TileKey>>,
}

impl TileLevels {
    /// Builds the level stack. Duplicate and zero factors are dropped.
    pub fn new(source: TileSource) -> Result<Self, GridError> {
        let mut factors: Vec<u32> = source
            .scale_factors
            .iter()
            .copied()
            .filter(|f| *f > 0)
            .collect();
        factors.sort_unstable();
        factors.dedup();
        if factors.is_empty() {
            return Err(GridError::NoLevels);
        }
        let extent = source.size();
        let grids = factors
            .iter()
            .enumerate()
            .map(|(level, &scale_factor)| {
                let edge = source.tile_size * f64::from(scale_factor);
                SparseGrid::new(edge, move |p: Point| tile_key(level, scale_factor, p))
                    .map(|g| g.with_extent(extent))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            source,
            factors,
            grids,
        })
    }

    /// The source this stack was built from.
    #[must_use]
    pub fn source(&self) -> &TileSource {
        &self.source
    }

    /// Number of levels.
    #[must_use]
    pub fn level_count(&self) -> usize {
        self.grids.len()
    }

    /// Scale factor of `level`.
    #[must_use]
    pub fn scale_factor(&self, level: usize) -> Option<u32> {
        self.factors.get(level).copied()
    }

    /// Grid of `level`.
    #[must_use]
    pub fn grid(&self, level: usize) -> Option<&SparseGrid<TileKey>> {
        self.grids.get(level)
    }

    /// Picks the coarsest level that still has at least one tile pixel per
    /// screen pixel at `scale` (screen pixels per image pixel).
    ///
    /// Falls back to the finest level when zoomed in past full resolution.
    #[must_use]
    pub fn level_for_scale(&self, scale: f64) -> usize {
        if !(scale > 0.0) || !scale.is_finite() {
            return 0;
        }
        let budget = 1.0 / scale;
        self.factors
            .iter()
            .rposition(|&f| f64::from(f) <= budget)
            .unwrap_or(0)
    }

    /// Materializes the unseen tiles of the level matching `scale` that
    /// overlap `rect` (image pixels).
    pub fn request(&mut self, rect: Rect, scale: f64) -> LevelRequest {
        let level = self.level_for_scale(scale);
        let generated = self.grids[level].generate(rect);
        LevelRequest { level, generated }
    }

    /// Materialized tiles of `level` intersecting `rect`.
    pub fn visible(
        &self,
        level: usize,
        rect: Rect,
    ) -> impl Iterator<Item = (Rect, TileKey)> + '_ {
        self.grids.get(level).into_iter().flat_map(move |grid| {
            grid.visible(rect)
                .filter_map(|(i, cell)| Some((grid.strand().rect(i)?, cell.key)))
        })
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "Tile origins are integral multiples of the tile edge."
)]
fn tile_key(level: usize, scale_factor: u32, origin: Point) -> TileKey {
    TileKey {
        level,
        scale_factor,
        x: origin.x as i64,
        y: origin.y as i64,
    }
}
