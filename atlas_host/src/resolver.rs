// Copyright 2025 the Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collaborator seams: image resolution and resource loading.

use atlas_grid::TileSource;
use futures::future::LocalBoxFuture;
use kurbo::Size;

use crate::error::LoadError;

/// A low-resolution stand-in shown while (or instead of) tiles load.
#[derive(Clone, Debug, PartialEq)]
pub struct Thumbnail {
    /// Resource identifier understood by the loader.
    pub id: String,
    /// Pixel width.
    pub width: f64,
    /// Pixel height.
    pub height: f64,
}

/// What a [`TileResolver`] knows about an image.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolvedImage {
    /// Tile pyramid, if the image is tiled.
    pub tiles: Option<TileSource>,
    /// Thumbnail, if one exists.
    pub thumbnail: Option<Thumbnail>,
}

impl ResolvedImage {
    /// No tiles and no thumbnail.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns `true` if there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_none() && self.thumbnail.is_none()
    }
}

/// Describes images: tile geometry and thumbnail for a descriptor id.
///
/// Passed explicitly to whoever needs it; there is no shared global
/// resolver.
pub trait TileResolver {
    /// Resolves `id` for display at roughly `target` pixels.
    fn resolve(
        &self,
        id: &str,
        target: Size,
    ) -> LocalBoxFuture<'static, Result<ResolvedImage, LoadError>>;
}

/// Fetches and decodes one resource.
pub trait ResourceLoader<K> {
    /// Decoded resource.
    type Output;

    /// Starts loading `key`.
    fn load(&self, key: &K) -> LocalBoxFuture<'static, Result<Self::Output, LoadError>>;
}

/// Resolves `id`, turning a failure into an empty result.
///
/// The failure is logged and returned next to the empty result so callers
/// can still store it.
pub async fn resolve_or_empty<R: TileResolver + ?Sized>(
    resolver: &R,
    id: &str,
    target: Size,
) -> (ResolvedImage, Option<LoadError>) {
    match resolver.resolve(id, target).await {
        Ok(image) => (image, None),
        Err(err) => {
            tracing::warn!(image = id, error = %err, "image resolution failed");
            (ResolvedImage::empty(), Some(err))
        }
    }
}
