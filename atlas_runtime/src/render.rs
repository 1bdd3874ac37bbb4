// Copyright 2025 the Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The render boundary: what a backend sees on a paint frame.

use atlas_grid::TileKey;
use atlas_host::{LoadError, TileStore};
use atlas_world::{ObjectId, ObjectKind};
use hashbrown::HashMap;
use kurbo::Rect;

use crate::images::{ImageState, ImageView, ResourceKey};
use crate::scene::Scene;

/// Receives paint frames. The only thing a backend gives back to the
/// runtime is a repaint request, through
/// [`Runtime::schedule_update`](crate::Runtime::schedule_update) or an
/// [`UpdateHandle`](atlas_frame::UpdateHandle).
pub trait RenderBackend<T> {
    /// Draws one frame.
    fn paint(&mut self, frame: &PaintFrame<'_, T>);
}

/// A visible scene object in view space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaintObject {
    /// Object id.
    pub id: ObjectId,
    /// Object kind.
    pub kind: ObjectKind,
    /// Bounds in viewport pixels.
    pub view_rect: Rect,
}

/// One tile slot of a visible image.
#[derive(Debug)]
pub struct PaintTile<'a, T> {
    /// Image object the tile belongs to.
    pub image: ObjectId,
    /// Level and origin.
    pub key: TileKey,
    /// Bounds in viewport pixels.
    pub view_rect: Rect,
    /// Decoded tile, when resident.
    pub resource: Option<&'a T>,
    /// A load is in flight.
    pub loading: bool,
    /// The last load failed.
    pub error: Option<&'a LoadError>,
}

/// A visible image's thumbnail.
#[derive(Debug)]
pub struct PaintThumbnail<'a, T> {
    /// Image object.
    pub image: ObjectId,
    /// Image bounds in viewport pixels.
    pub view_rect: Rect,
    /// Decoded thumbnail, when resident.
    pub resource: Option<&'a T>,
}

/// Everything visible on one paint frame.
///
/// Draw order is `objects`, then per image its thumbnail, then `tiles`
/// (coarser resident levels before the current level), so a missing tile
/// leaves whatever lower resolution is already there.
#[derive(Debug)]
pub struct PaintFrame<'a, T> {
    /// Viewport rectangle in pixels.
    pub view_rect: Rect,
    /// Screen pixels per world unit.
    pub scale: f64,
    /// Visible world rectangle.
    pub visible_world: Rect,
    /// Visible objects in paint order.
    pub objects: Vec<PaintObject>,
    /// Thumbnails of visible images.
    pub thumbnails: Vec<PaintThumbnail<'a, T>>,
    /// Tile slots of visible images.
    pub tiles: Vec<PaintTile<'a, T>>,
}

impl<'a, T> PaintFrame<'a, T> {
    /// Tile slots with no resident resource.
    pub fn missing_tiles(&self) -> impl Iterator<Item = &PaintTile<'a, T>> + '_ {
        self.tiles.iter().filter(|t| t.resource.is_none())
    }
}

pub(crate) fn build_frame<'a, T>(
    scene: &Scene,
    images: &HashMap<ObjectId, ImageState>,
    tiles: &'a TileStore<ResourceKey, T>,
    thumbnails: &'a TileStore<ResourceKey, T>,
) -> PaintFrame<'a, T> {
    let viewport = &scene.viewport;
    let visible_world = viewport.visible_world_rect();
    let mut frame = PaintFrame {
        view_rect: viewport.view_rect(),
        scale: viewport.scale_factor(),
        visible_world,
        objects: Vec::new(),
        thumbnails: Vec::new(),
        tiles: Vec::new(),
    };

    for id in scene.painted_objects() {
        let (Some(kind), Some(bounds)) = (scene.world.kind(id), scene.world.world_bounds(id)) else {
            continue;
        };
        if !atlas_strand::intersects(bounds, visible_world) {
            continue;
        }
        frame.objects.push(PaintObject {
            id,
            kind,
            view_rect: viewport.world_to_viewer(bounds),
        });

        let Some(state) = images.get(&id) else {
            continue;
        };
        if let Some(key) = state.thumbnail_key(id) {
            frame.thumbnails.push(PaintThumbnail {
                image: id,
                view_rect: viewport.world_to_viewer(bounds),
                resource: thumbnails.get(&key),
            });
        }
        let Some(levels) = &state.levels else {
            continue;
        };
        let Some(view) = ImageView::new(bounds, levels.source().size(), visible_world, frame.scale)
        else {
            continue;
        };
        let current = levels.level_for_scale(view.scale);
        for level in (current..levels.level_count()).rev() {
            for (rect, key) in levels.visible(level, view.image_rect) {
                let rk = state.tile_key(id, key);
                let resource = tiles.get(&rk);
                if level != current && resource.is_none() {
                    continue;
                }
                frame.tiles.push(PaintTile {
                    image: id,
                    key,
                    view_rect: viewport.world_to_viewer(view.to_world(rect)),
                    resource,
                    loading: tiles.is_loading(&rk),
                    error: tiles.error(&rk),
                });
            }
        }
    }
    frame
}
