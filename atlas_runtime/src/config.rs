// Copyright 2025 the Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use atlas_view::ViewConfig;

/// Runtime configuration.
///
/// Passed to [`Runtime::new`](crate::Runtime::new); there is no global
/// configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuntimeConfig {
    /// Viewport limits, padding, clamping and transitions.
    pub view: ViewConfig,
    /// Decoded tiles kept resident across all images.
    pub tile_cache_capacity: usize,
    /// Decoded thumbnails kept resident. Thumbnails are pinned while their
    /// image lives, so this only bounds the unpinned remainder.
    pub thumbnail_cache_capacity: usize,
    /// Tile edge used when a resolver reports a non-positive one.
    pub fallback_tile_size: f64,
    /// Go home after every viewport resize instead of keeping the center.
    pub rehome_on_resize: bool,
    /// Pixels the pointer travels with a button held before a drag starts.
    pub drag_threshold: f64,
    /// Wheel delta, in pixels, that zooms by one
    /// [`ViewConfig::zoom_step`].
    pub wheel_step: f64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            view: ViewConfig::default(),
            tile_cache_capacity: 256,
            thumbnail_cache_capacity: 32,
            fallback_tile_size: 256.0,
            rehome_on_resize: false,
            drag_threshold: 3.0,
            wheel_step: 100.0,
        }
    }
}

impl RuntimeConfig {
    /// Sets [`RuntimeConfig::view`].
    #[must_use]
    pub fn with_view(mut self, view: ViewConfig) -> Self {
        self.view = view;
        self
    }

    /// Sets [`RuntimeConfig::tile_cache_capacity`].
    #[must_use]
    pub fn with_tile_cache_capacity(mut self, capacity: usize) -> Self {
        self.tile_cache_capacity = capacity;
        self
    }

    /// Sets [`RuntimeConfig::thumbnail_cache_capacity`].
    #[must_use]
    pub fn with_thumbnail_cache_capacity(mut self, capacity: usize) -> Self {
        self.thumbnail_cache_capacity = capacity;
        self
    }

    /// Sets [`RuntimeConfig::fallback_tile_size`].
    #[must_use]
    pub fn with_fallback_tile_size(mut self, edge: f64) -> Self {
        self.fallback_tile_size = edge;
        self
    }

    /// Sets [`RuntimeConfig::rehome_on_resize`].
    #[must_use]
    pub fn with_rehome_on_resize(mut self, rehome: bool) -> Self {
        self.rehome_on_resize = rehome;
        self
    }

    /// Sets [`RuntimeConfig::drag_threshold`].
    #[must_use]
    pub fn with_drag_threshold(mut self, px: f64) -> Self {
        self.drag_threshold = px;
        self
    }
}
