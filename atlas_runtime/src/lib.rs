// Copyright 2025 the Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=atlas_runtime --heading-base-level=0

//! Atlas Runtime: a deep-zoom spatial viewer core.
//!
//! [`Runtime`] wires the Atlas crates together:
//!
//! - a scene tree ([`atlas_world`]) whose root bounds feed the viewport
//!   ([`atlas_view`]) every time they change, going home the first time;
//! - pointer routing with capture and bubble listeners
//!   ([`atlas_responder`]), with default wheel zoom and background drag pan;
//! - a cooperative frame scheduler ([`atlas_frame`]) that hands a
//!   [`RenderBackend`] a [`PaintFrame`] whenever a paint is pending;
//! - tiled images: a [`TileResolver`] describes each image, a
//!   [`ResourceLoader`] fetches thumbnails and tiles, and bounded
//!   [`TileStore`](atlas_host::TileStore)s keep the decoded results.
//!
//! The runtime never spawns work. Loads come back as futures for the
//! embedder to drive; their completions are fed back in.
//!
//! ```rust
//! use atlas_runtime::{
//!     LoadError, PaintFrame, RenderBackend, ResolvedImage, ResourceKey, ResourceLoader,
//!     Runtime, RuntimeConfig, TileResolver, TileSource,
//! };
//! use futures::executor::block_on;
//! use futures::future::{self, FutureExt, LocalBoxFuture};
//! use kurbo::{Rect, Size};
//!
//! struct Pyramids;
//! impl TileResolver for Pyramids {
//!     fn resolve(&self, _id: &str, _target: Size) -> LocalBoxFuture<'static, Result<ResolvedImage, LoadError>> {
//!         let tiles = TileSource::new(1024.0, 1024.0, 256.0).with_scale_factors([1, 2, 4]);
//!         future::ready(Ok(ResolvedImage { tiles: Some(tiles), thumbnail: None })).boxed_local()
//!     }
//! }
//!
//! struct Pixels;
//! impl ResourceLoader<ResourceKey> for Pixels {
//!     type Output = String;
//!     fn load(&self, key: &ResourceKey) -> LocalBoxFuture<'static, Result<String, LoadError>> {
//!         future::ready(Ok(format!("{key:?}"))).boxed_local()
//!     }
//! }
//!
//! struct Drawn(usize);
//! impl RenderBackend<String> for Drawn {
//!     fn paint(&mut self, frame: &PaintFrame<'_, String>) {
//!         self.0 = frame.tiles.iter().filter(|t| t.resource.is_some()).count();
//!     }
//! }
//!
//! let mut rt = Runtime::new(Rect::new(0.0, 0.0, 512.0, 512.0), RuntimeConfig::default(), Pyramids, Pixels)?;
//! let root = rt.world().root();
//! let page = rt.add_tiled_image(root, Rect::new(0.0, 0.0, 1024.0, 1024.0), "page-1")?;
//! rt.recalculate_world_size();
//! assert_eq!(rt.scale_factor(), 0.5);
//!
//! let resolving = rt.resolve_image(page)?.expect("idle image");
//! rt.attach_resolved(block_on(resolving))?;
//! for load in rt.request_visible_tiles() {
//!     rt.complete_tile(block_on(load));
//! }
//!
//! // Half scale picks the factor-2 level: 2×2 tiles of 512 image pixels.
//! let mut backend = Drawn(0);
//! assert!(rt.tick(1.0 / 60.0, &mut backend).painted);
//! assert_eq!(backend.0, 4);
//! # Ok::<(), atlas_runtime::RuntimeError>(())
//! ```

mod config;
mod error;
mod images;
mod render;
mod runtime;
mod scene;

pub use config::RuntimeConfig;
pub use error::RuntimeError;
pub use images::{ImageCompletion, ResourceCompletion, ResourceKey};
pub use render::{PaintFrame, PaintObject, PaintThumbnail, PaintTile, RenderBackend};
pub use runtime::Runtime;
pub use scene::Scene;

pub use atlas_frame::{FrameInfo, FrameReport, HookHandle, HookKind, UpdateHandle};
pub use atlas_grid::{TileKey, TileLevels, TileSource};
pub use atlas_host::{
    Completion, KeyedCompletion, LoadError, LoadOutcome, ResolvedImage, ResourceLoader, Thumbnail,
    TileResolver,
};
pub use atlas_responder::{AtlasEvent, EventKind, ListenerId, Phase, PointerButton, PointerInput};
pub use atlas_view::{GotoOptions, HomePadding, ViewConfig, ViewRegion, Viewport};
pub use atlas_world::{ObjectFlags, ObjectId, ObjectKind, World, WorldError};
