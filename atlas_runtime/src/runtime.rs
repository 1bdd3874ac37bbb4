// Copyright 2025 the Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The runtime facade.

use core::fmt;
use std::cell::Cell;
use std::rc::Rc;

use atlas_frame::{FrameInfo, FrameReport, FrameScheduler, HookHandle, HookKind, UpdateHandle};
use atlas_grid::TileLevels;
use atlas_host::{LoadError, ResolvedImage, ResourceLoader, Thumbnail, TileResolver, TileStore};
use atlas_responder::{
    AtlasEvent, EventKind, EventRouter, ListenerId, ListenerRegistry, PointerInput, RoutedEvent,
    RouterConfig,
};
use atlas_view::{GotoOptions, ViewRegion, Viewport};
use atlas_world::{LayoutEvent, ObjectId, ObjectKind, World};
use futures::future::{FutureExt, LocalBoxFuture};
use hashbrown::HashMap;
use kurbo::{Point, Rect, Size, Vec2};

use crate::config::RuntimeConfig;
use crate::error::RuntimeError;
use crate::images::{ImageCompletion, ImageState, ImageView, ResourceCompletion, ResourceKey};
use crate::render::{RenderBackend, build_frame};
use crate::scene::{LayoutSync, Scene};

/// A deep-zoom viewer runtime.
///
/// Owns the scene tree, the viewport, pointer routing and listeners, the
/// frame scheduler and per-image tile state. The resolver `R` and loader `L`
/// are passed in by the embedder.
///
/// Nothing here spawns tasks. Methods that start loads return futures; the
/// embedder drives them on its executor and hands the completions back to
/// [`Runtime::attach_resolved`] or [`Runtime::complete_tile`].
pub struct Runtime<R, L: ResourceLoader<ResourceKey>> {
    config: RuntimeConfig,
    scene: Scene,
    layout: LayoutSync,
    router: EventRouter,
    listeners: ListenerRegistry<Scene>,
    frames: FrameScheduler<Scene>,
    images: HashMap<ObjectId, ImageState>,
    tiles: TileStore<ResourceKey, L::Output>,
    thumbnails: TileStore<ResourceKey, L::Output>,
    resolver: R,
    loader: L,
}

impl<R, L: ResourceLoader<ResourceKey>> fmt::Debug for Runtime<R, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("scene", &self.scene)
            .field("images", &self.images.len())
            .field("tiles", &self.tiles.len())
            .field("thumbnails", &self.thumbnails.len())
            .field("listeners", &self.listeners.len())
            .field("hooks", &self.frames.hook_count())
            .finish_non_exhaustive()
    }
}

impl<R, L> Runtime<R, L>
where
    R: TileResolver,
    L: ResourceLoader<ResourceKey>,
    L::Output: 'static,
{
    /// Creates a runtime showing an empty world in `view_rect` (pixels).
    ///
    /// Fails if a cache capacity is zero.
    pub fn new(
        view_rect: Rect,
        config: RuntimeConfig,
        resolver: R,
        loader: L,
    ) -> Result<Self, RuntimeError> {
        let tiles = TileStore::new(config.tile_cache_capacity)?;
        let thumbnails = TileStore::new(config.thumbnail_cache_capacity)?;
        let frames = FrameScheduler::new();

        let mut world = World::new();
        let published = Rc::new(Cell::new(None));
        let sink = published.clone();
        let update = frames.update_handle();
        world.subscribe(move |event| match *event {
            LayoutEvent::RecalculateWorldSize { bounds } => {
                sink.set(Some(bounds));
                update.schedule_update();
            }
        });

        let viewport = Viewport::new(view_rect).with_config(config.view.clone());
        let router = EventRouter::with_config(RouterConfig {
            drag_threshold: config.drag_threshold,
        });
        Ok(Self {
            config,
            scene: Scene { world, viewport },
            layout: LayoutSync::new(published),
            router,
            listeners: ListenerRegistry::new(),
            frames,
            images: HashMap::new(),
            tiles,
            thumbnails,
            resolver,
            loader,
        })
    }

    /// Configuration the runtime was built with.
    #[must_use]
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// World and viewport.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable world and viewport.
    ///
    /// Objects removed through here are cleaned up on the next input or
    /// tick. Schedules a paint.
    pub fn scene_mut(&mut self) -> &mut Scene {
        self.frames.schedule_update();
        &mut self.scene
    }

    /// The scene tree.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.scene.world
    }

    // --- tree ---

    /// Creates an object under `parent`.
    pub fn insert(
        &mut self,
        parent: ObjectId,
        kind: ObjectKind,
        rect: Rect,
    ) -> Result<ObjectId, RuntimeError> {
        let id = self.scene.world.insert(parent, kind, rect)?;
        self.frames.schedule_update();
        Ok(id)
    }

    /// Moves `child` under `parent`, on top of its siblings.
    pub fn append_child(&mut self, parent: ObjectId, child: ObjectId) -> Result<(), RuntimeError> {
        self.scene.world.append_child(parent, child)?;
        self.frames.schedule_update();
        Ok(())
    }

    /// Destroys `child` and its subtree if it is a child of `parent`.
    ///
    /// Listeners, hover state, image state and cached tiles of the removed
    /// objects are dropped with them.
    pub fn remove_child(&mut self, parent: ObjectId, child: ObjectId) -> Vec<ObjectId> {
        let removed = self.scene.world.remove_child(parent, child);
        self.collect_garbage();
        self.frames.schedule_update();
        removed
    }

    /// Destroys `id` and its subtree. See [`Runtime::remove_child`].
    pub fn remove(&mut self, id: ObjectId) -> Vec<ObjectId> {
        let removed = self.scene.world.remove(id);
        self.collect_garbage();
        self.frames.schedule_update();
        removed
    }

    /// Recomputes container extents and feeds changed root bounds to the
    /// viewport. The first non-empty bounds send the viewport home.
    ///
    /// Returns the new root bounds if they changed.
    pub fn recalculate_world_size(&mut self) -> Option<Rect> {
        self.layout.apply(&mut self.scene)
    }

    // --- viewport ---

    /// Visible world region.
    #[must_use]
    pub fn viewport(&self) -> ViewRegion {
        self.scene.viewport.viewport()
    }

    /// Screen pixels per world unit.
    #[must_use]
    pub fn scale_factor(&self) -> f64 {
        self.scene.viewport.scale_factor()
    }

    /// World rectangle → viewport pixels.
    #[must_use]
    pub fn world_to_viewer(&self, rect: Rect) -> Rect {
        self.scene.viewport.world_to_viewer(rect)
    }

    /// Viewport pixel → world point.
    #[must_use]
    pub fn viewer_to_world(&self, pt: Point) -> Point {
        self.scene.viewport.viewer_to_world(pt)
    }

    /// Resizes the viewport, keeping the visible center and scale unless
    /// [`RuntimeConfig::rehome_on_resize`] is set.
    pub fn resize(&mut self, size: Size) {
        self.scene.viewport.resize(size);
        if self.config.rehome_on_resize {
            self.scene.viewport.go_home(GotoOptions::immediate());
        }
        self.frames.schedule_update();
    }

    /// Fits the home rectangle.
    pub fn go_home(&mut self, options: GotoOptions) {
        self.layout.apply(&mut self.scene);
        self.scene.viewport.go_home(options);
        self.frames.schedule_update();
    }

    /// Fits `region` (world units).
    pub fn goto_region(&mut self, region: Rect, options: GotoOptions) {
        self.scene.viewport.goto_region(region, options);
        self.frames.schedule_update();
    }

    /// Sets or clears the explicit home rectangle.
    pub fn set_home_position(&mut self, home: Option<Rect>) {
        self.scene.viewport.set_home_position(home);
        self.frames.schedule_update();
    }

    // --- images ---

    /// Adds a tiled image for `descriptor` occupying `rect` under `parent`.
    ///
    /// Nothing is fetched until [`Runtime::resolve_image`].
    pub fn add_tiled_image(
        &mut self,
        parent: ObjectId,
        rect: Rect,
        descriptor: &str,
    ) -> Result<ObjectId, RuntimeError> {
        let id = self.insert(parent, ObjectKind::TiledImage, rect)?;
        self.images.insert(id, ImageState::new(descriptor));
        tracing::debug!(image = ?id, descriptor, "tiled image added");
        Ok(id)
    }

    /// Starts resolving `image`'s descriptor.
    ///
    /// Returns `None` while a resolution is already in flight. The future
    /// resolves to an [`ImageCompletion`] for [`Runtime::attach_resolved`].
    pub fn resolve_image(
        &mut self,
        image: ObjectId,
    ) -> Result<Option<LocalBoxFuture<'static, ImageCompletion>>, RuntimeError> {
        let target = self.scene.world.size(image).unwrap_or(Size::ZERO);
        let state = self
            .images
            .get_mut(&image)
            .ok_or(RuntimeError::NotAnImage(image))?;
        let Some(ticket) = state.resolving.begin_load() else {
            return Ok(None);
        };
        tracing::debug!(image = ?image, descriptor = %state.descriptor, "resolving image");
        let load = self.resolver.resolve(&state.descriptor, target);
        Ok(Some(
            async move {
                ImageCompletion {
                    image,
                    completion: ticket.run(load).await,
                }
            }
            .boxed_local(),
        ))
    }

    /// Commits a resolution started by [`Runtime::resolve_image`].
    ///
    /// Returns `Ok(false)` if the result was stale (aborted, superseded or
    /// the image is gone). A failed resolution is stored on the image and
    /// leaves it without tiles; it still counts as applied.
    pub fn attach_resolved(&mut self, done: ImageCompletion) -> Result<bool, RuntimeError> {
        let Some(state) = self.images.get_mut(&done.image) else {
            return Ok(false);
        };
        if !state.resolving.settle(done.completion) {
            return Ok(false);
        }
        match state.resolving.take_element() {
            Some(resolved) => self.attach_image(done.image, resolved)?,
            None => self.frames.schedule_update(),
        }
        Ok(true)
    }

    /// Installs tile geometry and thumbnail for `image`, replacing any
    /// previous ones and dropping their cached resources.
    ///
    /// A non-positive tile size is replaced by
    /// [`RuntimeConfig::fallback_tile_size`].
    pub fn attach_image(
        &mut self,
        image: ObjectId,
        resolved: ResolvedImage,
    ) -> Result<(), RuntimeError> {
        let fallback = self.config.fallback_tile_size;
        let state = self
            .images
            .get_mut(&image)
            .ok_or(RuntimeError::NotAnImage(image))?;
        let levels = resolved
            .tiles
            .map(|mut source| {
                if !(source.tile_size > 0.0 && source.tile_size.is_finite()) {
                    source.tile_size = fallback;
                }
                TileLevels::new(source)
            })
            .transpose()?;

        let released = self.tiles.release_where(|k| k.image() == image)
            + self.thumbnails.release_where(|k| k.image() == image);
        state.levels = levels;
        state.thumbnail = resolved.thumbnail;
        tracing::debug!(
            image = ?image,
            levels = state.levels.as_ref().map_or(0, TileLevels::level_count),
            thumbnail = state.thumbnail.is_some(),
            released,
            "image attached"
        );
        self.frames.schedule_update();
        Ok(())
    }

    /// Tile pyramid of `image`, once resolved.
    #[must_use]
    pub fn tile_levels(&self, image: ObjectId) -> Option<&TileLevels> {
        self.images.get(&image)?.levels.as_ref()
    }

    /// Thumbnail descriptor of `image`, once resolved.
    #[must_use]
    pub fn thumbnail(&self, image: ObjectId) -> Option<&Thumbnail> {
        self.images.get(&image)?.thumbnail.as_ref()
    }

    /// Returns `true` while `image` is being resolved.
    #[must_use]
    pub fn is_resolving(&self, image: ObjectId) -> bool {
        self.images
            .get(&image)
            .is_some_and(|s| s.resolving.is_loading())
    }

    /// Error of the last failed resolution of `image`.
    #[must_use]
    pub fn image_error(&self, image: ObjectId) -> Option<&LoadError> {
        self.images.get(&image)?.resolving.error()
    }

    /// Starts loads for the thumbnails and current-level tiles of every
    /// displayed image overlapping the view.
    ///
    /// Resident, in-flight and failed resources are skipped; see
    /// [`Runtime::retry_failed`]. Each future resolves to
    /// a completion for [`Runtime::complete_tile`].
    pub fn request_visible_tiles(
        &mut self,
    ) -> Vec<LocalBoxFuture<'static, ResourceCompletion<L::Output>>> {
        self.layout.apply(&mut self.scene);
        let visible = self.scene.viewport.visible_world_rect();
        let scale_factor = self.scene.viewport.scale_factor();
        let mut out = Vec::new();

        for (&id, state) in &mut self.images {
            if !self.scene.is_displayed(id) {
                continue;
            }
            let Some(bounds) = self.scene.world.world_bounds(id) else {
                continue;
            };
            if !atlas_strand::intersects(bounds, visible) {
                continue;
            }
            if let Some(key) = state.thumbnail_key(id)
                && self.thumbnails.error(&key).is_none()
                && let Some(ticket) = self.thumbnails.begin(key)
            {
                let load = self.loader.load(ticket.key());
                out.push(ticket.run(load).boxed_local());
            }

            let Some(levels) = &mut state.levels else {
                continue;
            };
            let Some(view) = ImageView::new(bounds, levels.source().size(), visible, scale_factor)
            else {
                continue;
            };
            let request = levels.request(view.image_rect, view.scale);
            let wanted: Vec<_> = levels
                .visible(request.level, view.image_rect)
                .map(|(_, tile)| tile)
                .collect();
            for tile in wanted {
                let key = state.tile_key(id, tile);
                if self.tiles.error(&key).is_some() {
                    continue;
                }
                if let Some(ticket) = self.tiles.begin(key) {
                    let load = self.loader.load(ticket.key());
                    out.push(ticket.run(load).boxed_local());
                }
            }
        }
        tracing::trace!(requests = out.len(), "visible tiles requested");
        out
    }

    /// Commits a tile or thumbnail load.
    ///
    /// Returns `false` if the completion was stale. Loaded thumbnails are
    /// pinned until their image is removed or re-attached.
    pub fn complete_tile(&mut self, done: ResourceCompletion<L::Output>) -> bool {
        if !self.images.contains_key(&done.key.image()) {
            return false;
        }
        let settled = if matches!(done.key, ResourceKey::Tile { .. }) {
            self.tiles.settle(done)
        } else {
            let key = done.key.clone();
            let settled = self.thumbnails.settle(done);
            if settled && self.thumbnails.lock(&key).is_ok() {
                tracing::trace!(thumbnail = key.source(), "thumbnail pinned");
            }
            settled
        };
        if settled {
            self.frames.schedule_update();
        }
        settled
    }

    /// Resident tile or thumbnail.
    #[must_use]
    pub fn resource(&self, key: &ResourceKey) -> Option<&L::Output> {
        match key {
            ResourceKey::Tile { .. } => self.tiles.get(key),
            ResourceKey::Thumbnail { .. } => self.thumbnails.get(key),
        }
    }

    /// Error of the last failed load of `key`.
    #[must_use]
    pub fn resource_error(&self, key: &ResourceKey) -> Option<&LoadError> {
        match key {
            ResourceKey::Tile { .. } => self.tiles.error(key),
            ResourceKey::Thumbnail { .. } => self.thumbnails.error(key),
        }
    }

    /// Forgets stored tile and thumbnail failures so the next
    /// [`Runtime::request_visible_tiles`] retries them. Returns how many were
    /// forgotten.
    pub fn retry_failed(&mut self) -> usize {
        let n = self.tiles.clear_errors() + self.thumbnails.clear_errors();
        if n > 0 {
            self.frames.schedule_update();
        }
        n
    }

    /// Tile and thumbnail loads in flight.
    #[must_use]
    pub fn loading_count(&self) -> usize {
        self.tiles.loading_count() + self.thumbnails.loading_count()
    }

    /// Aborts every in-flight resolution and load. Their completions will
    /// be dropped. Returns how many were aborted.
    pub fn abort_loads(&mut self) -> usize {
        let resolutions = self
            .images
            .values_mut()
            .map(|s| s.resolving.abort())
            .filter(|&a| a)
            .count();
        let n = resolutions + self.tiles.abort_all() + self.thumbnails.abort_all();
        tracing::debug!(aborted = n, "loads aborted");
        n
    }

    // --- events ---

    /// Registers a listener for `kind` on `object`. See
    /// [`ListenerRegistry::add_listener`].
    pub fn add_event_listener(
        &mut self,
        object: ObjectId,
        kind: EventKind,
        capture: bool,
        callback: impl FnMut(&mut Scene, &mut AtlasEvent) + 'static,
    ) -> Result<ListenerId, RuntimeError> {
        Ok(self
            .listeners
            .add_listener(&mut self.scene.world, object, kind, capture, callback)?)
    }

    /// Removes a listener. Returns `false` if it was already gone.
    pub fn remove_event_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove_listener(&mut self.scene.world, id)
    }

    /// Object under the pointer, if it listens for enter/leave.
    #[must_use]
    pub fn hovered(&self) -> Option<ObjectId> {
        self.router.hovered()
    }

    /// Routes one pointer input through hit testing and the listeners.
    ///
    /// Unless a listener consumed an event, a wheel zooms about the pointer
    /// and a drag that started over no drag listener pans the view. Returns
    /// `true` if any event was consumed.
    pub fn handle_input(&mut self, input: PointerInput) -> bool {
        self.layout.apply(&mut self.scene);
        let routed = self
            .router
            .route(&self.scene.world, &self.scene.viewport, input);
        let mut consumed = false;
        for RoutedEvent {
            mut event,
            sequence,
        } in routed.events
        {
            consumed |= self
                .listeners
                .dispatch(&mut self.scene, &sequence, &mut event);
        }

        if !consumed {
            if let PointerInput::Wheel { position, delta } = input {
                self.wheel_zoom(position, delta);
            }
            if let Some(delta) = routed.background_drag {
                self.scene.viewport.pan_by_view(delta);
            }
        }
        self.collect_garbage();
        self.frames.schedule_update();
        consumed
    }

    fn wheel_zoom(&mut self, anchor: Point, delta: Vec2) {
        let step = self.config.wheel_step;
        if delta.y == 0.0 || !(step > 0.0) {
            return;
        }
        let zoom_step = self.scene.viewport.config().zoom_step;
        let factor = zoom_step.powf(-delta.y / step);
        self.scene.viewport.zoom_about_view_point(anchor, factor);
    }

    // --- frames ---

    /// Registers a frame hook. See [`FrameScheduler::register_hook`].
    pub fn register_hook(
        &mut self,
        kind: HookKind,
        callback: impl FnMut(&mut Scene, &mut FrameInfo) + 'static,
    ) -> HookHandle {
        self.frames.register_hook(kind, callback)
    }

    /// Schedules a paint on the next tick.
    pub fn schedule_update(&self) {
        self.frames.schedule_update();
    }

    /// A detached handle that can schedule paints, for backends and loaders.
    #[must_use]
    pub fn update_handle(&self) -> UpdateHandle {
        self.frames.update_handle()
    }

    /// Returns `true` if the embedder should tick again: a paint is pending
    /// or a viewport transition is running.
    #[must_use]
    pub fn needs_frame(&self) -> bool {
        self.frames.is_update_pending() || self.scene.viewport.is_animating()
    }

    /// Runs one frame: advances viewport transitions by `dt` seconds, runs
    /// the hooks and, when a paint is pending, hands `backend` a
    /// [`PaintFrame`](crate::PaintFrame).
    pub fn tick(&mut self, dt: f64, backend: &mut impl RenderBackend<L::Output>) -> FrameReport {
        self.layout.apply(&mut self.scene);
        if self.scene.viewport.is_animating() {
            self.scene.viewport.step(dt);
            self.frames.schedule_update();
        }

        let Self {
            scene,
            layout,
            frames,
            images,
            tiles,
            thumbnails,
            ..
        } = self;
        let report = frames.tick(scene, dt, |scene, _info| {
            layout.apply(scene);
            let frame = build_frame(scene, images, tiles, thumbnails);
            backend.paint(&frame);
        });
        self.collect_garbage();
        tracing::trace!(
            frame = report.frame_number,
            painted = report.painted,
            hooks = report.hooks_run,
            "tick"
        );
        report
    }

    fn collect_garbage(&mut self) {
        let world = &self.scene.world;
        let dead: Vec<ObjectId> = self
            .images
            .keys()
            .copied()
            .filter(|id| !world.is_alive(*id))
            .collect();
        for id in dead {
            self.forget_image(id);
        }
        self.listeners.prune(&self.scene.world);
        self.router.forget_dead(&self.scene.world);
    }

    fn forget_image(&mut self, id: ObjectId) {
        if let Some(mut state) = self.images.remove(&id) {
            state.resolving.abort();
        }
        let released = self.tiles.release_where(|k| k.image() == id)
            + self.thumbnails.release_where(|k| k.image() == id);
        tracing::debug!(image = ?id, released, "image removed");
    }
}
