// Copyright 2025 the Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tiled image bookkeeping: resource keys, resolution state and the
//! world ↔ image pixel mapping.

use std::rc::Rc;

use atlas_grid::{TileKey, TileLevels};
use atlas_host::{Completion, Host, KeyedCompletion, ResolvedImage, Thumbnail};
use atlas_world::ObjectId;
use kurbo::{Rect, Size, Vec2};

/// Identifies one loadable resource of one image.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKey {
    /// A pyramid tile.
    Tile {
        /// Owning image object.
        image: ObjectId,
        /// Image descriptor id.
        source: Rc<str>,
        /// Level and origin of the tile.
        tile: TileKey,
    },
    /// The low-resolution stand-in.
    Thumbnail {
        /// Owning image object.
        image: ObjectId,
        /// Thumbnail resource id.
        id: Rc<str>,
    },
}

impl ResourceKey {
    /// Owning image object.
    #[must_use]
    pub fn image(&self) -> ObjectId {
        match self {
            Self::Tile { image, .. } | Self::Thumbnail { image, .. } => *image,
        }
    }

    /// Descriptor id for tiles, resource id for thumbnails.
    #[must_use]
    pub fn source(&self) -> &str {
        match self {
            Self::Tile { source, .. } => source,
            Self::Thumbnail { id, .. } => id,
        }
    }
}

/// A finished tile or thumbnail load, for
/// [`Runtime::complete_tile`](crate::Runtime::complete_tile).
pub type ResourceCompletion<T> = KeyedCompletion<ResourceKey, T>;

/// A finished image resolution, for
/// [`Runtime::attach_resolved`](crate::Runtime::attach_resolved).
#[derive(Clone, Debug, PartialEq)]
pub struct ImageCompletion {
    /// Image object the resolution was started for.
    pub image: ObjectId,
    /// Attempt result.
    pub completion: Completion<ResolvedImage>,
}

#[derive(Debug)]
pub(crate) struct ImageState {
    pub(crate) descriptor: Rc<str>,
    pub(crate) resolving: Host<ResolvedImage>,
    pub(crate) levels: Option<TileLevels>,
    pub(crate) thumbnail: Option<Thumbnail>,
}

impl ImageState {
    pub(crate) fn new(descriptor: &str) -> Self {
        Self {
            descriptor: descriptor.into(),
            resolving: Host::new(),
            levels: None,
            thumbnail: None,
        }
    }

    pub(crate) fn tile_key(&self, image: ObjectId, tile: TileKey) -> ResourceKey {
        ResourceKey::Tile {
            image,
            source: self.descriptor.clone(),
            tile,
        }
    }

    pub(crate) fn thumbnail_key(&self, image: ObjectId) -> Option<ResourceKey> {
        self.thumbnail.as_ref().map(|t| ResourceKey::Thumbnail {
            image,
            id: t.id.as_str().into(),
        })
    }
}

/// The part of an image inside the visible world rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ImageView {
    bounds: Rect,
    ratio: Vec2,
    /// Visible part in image pixels.
    pub(crate) image_rect: Rect,
    /// Screen pixels per image pixel.
    pub(crate) scale: f64,
}

impl ImageView {
    /// Maps an image placed at `bounds` (world units) with pixel size `size`
    /// against the `visible` world rectangle. `None` when nothing shows.
    pub(crate) fn new(bounds: Rect, size: Size, visible: Rect, scale_factor: f64) -> Option<Self> {
        let degenerate = !(bounds.width() > 0.0 && bounds.height() > 0.0)
            || !(size.width > 0.0 && size.height > 0.0);
        if degenerate {
            return None;
        }
        if !atlas_strand::intersects(bounds, visible) {
            return None;
        }
        let ratio = Vec2::new(size.width / bounds.width(), size.height / bounds.height());
        let overlap = bounds.intersect(visible);
        let image_rect = Rect::new(
            (overlap.x0 - bounds.x0) * ratio.x,
            (overlap.y0 - bounds.y0) * ratio.y,
            (overlap.x1 - bounds.x0) * ratio.x,
            (overlap.y1 - bounds.y0) * ratio.y,
        );
        Some(Self {
            bounds,
            ratio,
            image_rect,
            scale: scale_factor / ratio.x,
        })
    }

    /// Image pixels → world units.
    pub(crate) fn to_world(&self, r: Rect) -> Rect {
        Rect::new(
            self.bounds.x0 + r.x0 / self.ratio.x,
            self.bounds.y0 + r.y0 / self.ratio.y,
            self.bounds.x0 + r.x1 / self.ratio.x,
            self.bounds.y0 + r.y1 / self.ratio.y,
        )
    }
}
