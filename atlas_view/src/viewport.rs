// Copyright 2025 the Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Rect, Size, Vec2};

use crate::config::{ClampMode, FitMode, GotoOptions, HomePadding, ViewConfig};
use crate::transition::Transition;

/// The visible world region and scale, as reported by [`Viewport::viewport`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewRegion {
    /// Left edge of the visible region in world units.
    pub x: f64,
    /// Top edge of the visible region in world units.
    pub y: f64,
    /// Width of the visible region in world units.
    pub width: f64,
    /// Height of the visible region in world units.
    pub height: f64,
    /// Screen pixels per world unit.
    pub scale: f64,
}

impl ViewRegion {
    /// The region as a rect.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }
}

/// Deep-zoom viewport over a world plane.
///
/// The viewport maps world coordinates into a screen rectangle with a uniform
/// scale (screen pixels per world unit) and a pan offset. Every mutation is
/// followed by constraint enforcement: the scale is clamped to
/// [`Viewport::scale_limits`] and the pan is clamped against the bounding box
/// per [`ClampMode`], so queries never observe an illegal state.
///
/// Navigation has two primitives, [`Viewport::set_viewport_now`] and
/// [`Viewport::set_viewport_over`]. Home and region navigation compute a
/// target rectangle and go through one of them.
#[derive(Clone, Debug)]
pub struct Viewport {
    view_rect: Rect,
    config: ViewConfig,
    world_bounds: Option<Rect>,
    home: Option<Rect>,
    zoom: f64,
    pan: Vec2,
    world_to_view: Affine,
    view_to_world: Affine,
    transition: Option<Transition>,
}

impl Viewport {
    /// Creates a viewport covering `view_rect` (screen pixels) at scale `1`
    /// with the default configuration.
    #[must_use]
    pub fn new(view_rect: Rect) -> Self {
        let mut vp = Self {
            view_rect: view_rect.abs(),
            config: ViewConfig::default(),
            world_bounds: None,
            home: None,
            zoom: 1.0,
            pan: Vec2::ZERO,
            world_to_view: Affine::IDENTITY,
            view_to_world: Affine::IDENTITY,
            transition: None,
        };
        vp.rebuild_transforms();
        vp
    }

    /// Replaces the configuration, builder style.
    #[must_use]
    pub fn with_config(mut self, config: ViewConfig) -> Self {
        self.set_config(config);
        self
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Replaces the configuration and re-applies constraints.
    pub fn set_config(&mut self, config: ViewConfig) {
        self.config = config;
        self.constrain();
    }

    /// Screen rectangle in pixels.
    #[must_use]
    pub fn view_rect(&self) -> Rect {
        self.view_rect
    }

    /// Root bounds used as the default home and bounding box.
    #[must_use]
    pub fn world_bounds(&self) -> Option<Rect> {
        self.world_bounds
    }

    /// Updates the world bounds and re-applies constraints.
    ///
    /// This is what a scene tree's `recalculate-world-size` notification feeds.
    pub fn set_world_bounds(&mut self, bounds: Option<Rect>) {
        if self.world_bounds == bounds {
            return;
        }
        self.world_bounds = bounds;
        self.constrain();
    }

    /// The rectangle [`Viewport::go_home`] fits: the explicit home position if
    /// set, otherwise the world bounds.
    #[must_use]
    pub fn home_rect(&self) -> Option<Rect> {
        self.home.or(self.world_bounds)
    }

    /// Sets (or clears, with `None`) an explicit home rectangle.
    pub fn set_home_position(&mut self, home: Option<Rect>) {
        self.home = home.map(|r| r.abs());
        self.constrain();
    }

    /// Scale at which the home rectangle fits the padded view.
    ///
    /// Degenerate cases (no home, zero-area home or zero-area padded view)
    /// yield `1`.
    #[must_use]
    pub fn home_scale(&self) -> f64 {
        let Some(home) = self.home_rect() else {
            return 1.0;
        };
        let area = self.config.home_padding.inset(self.view_rect);
        fit_scale(home.size(), area.size())
    }

    /// Smallest and largest allowed scale.
    #[must_use]
    pub fn scale_limits(&self) -> (f64, f64) {
        let home = self.home_scale();
        let under = if self.config.max_under_zoom.is_finite() {
            self.config.max_under_zoom.max(1.0)
        } else {
            1.0
        };
        let min = (home / under).max(f64::MIN_POSITIVE);
        let max = self.config.max_over_zoom.max(home);
        (min, max)
    }

    /// Screen pixels per world unit. Always strictly positive.
    #[must_use]
    pub fn scale_factor(&self) -> f64 {
        self.zoom
    }

    /// World units per screen pixel.
    #[must_use]
    pub fn world_units_per_pixel(&self) -> f64 {
        1.0 / self.zoom
    }

    /// Visible world region and scale.
    #[must_use]
    pub fn viewport(&self) -> ViewRegion {
        let r = self.visible_world_rect();
        ViewRegion {
            x: r.x0,
            y: r.y0,
            width: r.width(),
            height: r.height(),
            scale: self.zoom,
        }
    }

    /// World → screen transform.
    #[must_use]
    pub fn world_to_view_transform(&self) -> Affine {
        self.world_to_view
    }

    /// Maps a world rectangle to screen pixels.
    #[must_use]
    pub fn world_to_viewer(&self, rect: Rect) -> Rect {
        self.world_to_view.transform_rect_bbox(rect)
    }

    /// Maps a world point to screen pixels.
    #[must_use]
    pub fn world_to_viewer_point(&self, pt: Point) -> Point {
        self.world_to_view * pt
    }

    /// Maps a screen point to world coordinates.
    #[must_use]
    pub fn viewer_to_world(&self, pt: Point) -> Point {
        self.view_to_world * pt
    }

    /// Maps a screen rectangle to world coordinates.
    #[must_use]
    pub fn viewer_to_world_rect(&self, rect: Rect) -> Rect {
        self.view_to_world.transform_rect_bbox(rect)
    }

    /// World rectangle currently visible.
    #[must_use]
    pub fn visible_world_rect(&self) -> Rect {
        self.viewer_to_world_rect(self.view_rect)
    }

    /// Changes the screen size, keeping the world point at the view center
    /// and the scale, then re-applies constraints.
    pub fn resize(&mut self, size: Size) {
        let rect = Rect::from_origin_size(self.view_rect.origin(), size);
        self.set_view_rect(rect);
    }

    /// Changes the screen rectangle, keeping the world point at its center.
    pub fn set_view_rect(&mut self, rect: Rect) {
        let rect = rect.abs();
        if rect == self.view_rect {
            return;
        }
        let world_center = self.viewer_to_world(self.view_rect.center());
        self.view_rect = rect;
        self.pan = self.pan_for(world_center, rect.center());
        self.rebuild_transforms();
        self.constrain();
    }

    /// Fits the home rectangle into the padded view.
    ///
    /// Without a home rectangle this shows the world origin at scale `1`.
    pub fn go_home(&mut self, options: GotoOptions) {
        match self.home_rect() {
            Some(home) => self.goto_region(home, options),
            None => {
                let target = Rect::from_origin_size(Point::ORIGIN, self.view_rect.size());
                self.navigate(target, options);
            }
        }
    }

    /// Fits `region` (world units) into the padded view, preserving aspect
    /// ratio, and centers it in the padded area.
    ///
    /// A zero-width or zero-height region is shown at scale `1`.
    pub fn goto_region(&mut self, region: Rect, options: GotoOptions) {
        let padding = options.padding.unwrap_or(self.config.home_padding);
        let target = self.fit_target(region.abs(), padding);
        self.navigate(target, options);
    }

    /// Shows `rect` (world units) immediately, cancelling any transition.
    ///
    /// The rect is fitted into the full view and then constrained.
    pub fn set_viewport_now(&mut self, rect: Rect) {
        self.transition = None;
        self.apply_rect(rect.abs());
    }

    /// Starts a transition from the current visible rect to `rect` over
    /// `duration` seconds. Non-positive durations apply immediately.
    pub fn set_viewport_over(&mut self, rect: Rect, duration: f64) {
        if !(duration > 0.0) {
            self.set_viewport_now(rect);
            return;
        }
        self.transition = Some(Transition::new(
            self.visible_world_rect(),
            rect.abs(),
            duration,
        ));
    }

    /// Advances the in-flight transition by `dt` seconds.
    ///
    /// Returns `true` while the transition is still running.
    pub fn step(&mut self, dt: f64) -> bool {
        let Some(mut transition) = self.transition.take() else {
            return false;
        };
        let (rect, done) = transition.advance(dt);
        self.apply_rect(rect);
        if !done {
            self.transition = Some(transition);
        }
        !done
    }

    /// Returns `true` while a transition is in flight.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Target of the in-flight transition.
    #[must_use]
    pub fn transition_target(&self) -> Option<Rect> {
        self.transition.as_ref().map(Transition::target)
    }

    /// Stops the in-flight transition where it is.
    pub fn cancel_transition(&mut self) {
        self.transition = None;
    }

    /// Sets the scale about the view center.
    pub fn set_scale(&mut self, scale: f64) {
        self.zoom_about_view_point(self.view_rect.center(), scale / self.zoom);
    }

    /// Zooms by `factor` keeping `anchor` (screen pixels) fixed as far as the
    /// limits allow. Cancels any transition.
    pub fn zoom_about_view_point(&mut self, anchor: Point, factor: f64) {
        if !(factor > 0.0 && factor.is_finite()) {
            return;
        }
        self.transition = None;
        let (min, max) = self.scale_limits();
        let new_zoom = (self.zoom * factor).clamp(min, max);
        let anchor_world = self.viewer_to_world(anchor);
        self.zoom = new_zoom;
        self.pan = self.pan_for(anchor_world, anchor);
        self.rebuild_transforms();
        self.constrain();
    }

    /// Zooms in by [`ViewConfig::zoom_step`] about the view center.
    pub fn zoom_in(&mut self) {
        self.zoom_about_view_point(self.view_rect.center(), self.config.zoom_step);
    }

    /// Zooms out by [`ViewConfig::zoom_step`] about the view center.
    pub fn zoom_out(&mut self) {
        self.zoom_about_view_point(self.view_rect.center(), 1.0 / self.config.zoom_step);
    }

    /// Pans by `delta` screen pixels. Cancels any transition.
    pub fn pan_by_view(&mut self, delta: Vec2) {
        self.transition = None;
        if delta == Vec2::ZERO {
            return;
        }
        self.pan += delta;
        self.rebuild_transforms();
        self.clamp_pan();
    }

    /// Centers the view on a world point.
    pub fn center_on(&mut self, world_pt: Point) {
        let delta = self.view_rect.center() - self.world_to_viewer_point(world_pt);
        self.pan_by_view(delta);
    }

    /// Snapshot of the current state for debugging and inspection.
    #[must_use]
    pub fn debug_info(&self) -> ViewportDebugInfo {
        let (min_scale, max_scale) = self.scale_limits();
        ViewportDebugInfo {
            view_rect: self.view_rect,
            world_bounds: self.world_bounds,
            home_rect: self.home_rect(),
            visible_world_rect: self.visible_world_rect(),
            scale: self.zoom,
            pan: self.pan,
            home_scale: self.home_scale(),
            min_scale,
            max_scale,
            clamp_mode: self.config.clamp_mode,
            fit_mode: self.config.fit_mode,
            animating: self.is_animating(),
        }
    }

    // --- internals ---

    fn navigate(&mut self, target: Rect, options: GotoOptions) {
        if options.immediate {
            self.set_viewport_now(target);
        } else {
            let duration = options.duration.unwrap_or(self.config.transition_duration);
            self.set_viewport_over(target, duration);
        }
    }

    /// Full-view world rect that shows `region` fitted into the padded area.
    fn fit_target(&self, region: Rect, padding: HomePadding) -> Rect {
        let area = padding.inset(self.view_rect);
        let scale = fit_scale(region.size(), area.size());
        let (anchor_view, anchor_world) = match self.config.fit_mode {
            FitMode::Center => (area.center(), region.center()),
            FitMode::AlignMin => (area.origin(), region.origin()),
        };
        let x0 = anchor_world.x - (anchor_view.x - self.view_rect.x0) / scale;
        let y0 = anchor_world.y - (anchor_view.y - self.view_rect.y0) / scale;
        Rect::new(
            x0,
            y0,
            x0 + self.view_rect.width() / scale,
            y0 + self.view_rect.height() / scale,
        )
    }

    /// Fits `rect` into the full view, centered, then constrains.
    fn apply_rect(&mut self, rect: Rect) {
        self.zoom = fit_scale(rect.size(), self.view_rect.size());
        self.pan = self.pan_for(rect.center(), self.view_rect.center());
        self.rebuild_transforms();
        self.constrain();
    }

    /// Pan that maps `world` onto `view` at the current zoom.
    fn pan_for(&self, world: Point, view: Point) -> Vec2 {
        view.to_vec2() - self.view_rect.origin().to_vec2() - world.to_vec2() * self.zoom
    }

    fn rebuild_transforms(&mut self) {
        let view_origin = self.view_rect.origin().to_vec2();
        self.world_to_view = Affine::translate(view_origin + self.pan) * Affine::scale(self.zoom);
        self.view_to_world = self.world_to_view.inverse();
    }

    fn constrain(&mut self) {
        let (min, max) = self.scale_limits();
        let clamped = self.zoom.clamp(min, max);
        if clamped != self.zoom {
            let center = self.view_rect.center();
            let world_center = self.viewer_to_world(center);
            self.zoom = clamped;
            self.pan = self.pan_for(world_center, center);
            self.rebuild_transforms();
        }
        self.clamp_pan();
    }

    fn clamp_pan(&mut self) {
        let bounds = match self.config.bounds.or(self.world_bounds) {
            Some(b) if b.width() > 0.0 && b.height() > 0.0 => b,
            _ => return,
        };
        let visible = self.visible_world_rect();
        let (dx, dy) = match self.config.clamp_mode {
            ClampMode::None => return,
            ClampMode::KeepSomeVisible => (
                keep_overlap(visible.x0, visible.x1, bounds.x0, bounds.x1),
                keep_overlap(visible.y0, visible.y1, bounds.y0, bounds.y1),
            ),
            ClampMode::KeepCenterInside => {
                let c = visible.center();
                (
                    c.x.clamp(bounds.x0, bounds.x1) - c.x,
                    c.y.clamp(bounds.y0, bounds.y1) - c.y,
                )
            }
        };
        if dx != 0.0 || dy != 0.0 {
            // Moving the visible rect by +d in world space moves the world by -d on screen.
            self.pan -= Vec2::new(dx, dy) * self.zoom;
            self.rebuild_transforms();
        }
    }
}

/// World-space shift that restores overlap between `[v0, v1]` and `[b0, b1]`.
fn keep_overlap(v0: f64, v1: f64, b0: f64, b1: f64) -> f64 {
    if v1 < b0 {
        b0 - v1
    } else if v0 > b1 {
        b1 - v0
    } else {
        0.0
    }
}

/// Largest scale at which `content` fits inside `area`, or `1` when either
/// is degenerate.
fn fit_scale(content: Size, area: Size) -> f64 {
    if !(content.width > 0.0 && content.height > 0.0 && area.width > 0.0 && area.height > 0.0) {
        return 1.0;
    }
    let s = (area.width / content.width).min(area.height / content.height);
    if s.is_finite() && s > 0.0 { s } else { 1.0 }
}

/// Debug snapshot of a [`Viewport`].
#[derive(Clone, Copy, Debug)]
pub struct ViewportDebugInfo {
    /// Screen rectangle.
    pub view_rect: Rect,
    /// World bounds, if known.
    pub world_bounds: Option<Rect>,
    /// Effective home rectangle.
    pub home_rect: Option<Rect>,
    /// Visible world rectangle.
    pub visible_world_rect: Rect,
    /// Current scale.
    pub scale: f64,
    /// Pan offset in screen pixels.
    pub pan: Vec2,
    /// Scale at which home fits.
    pub home_scale: f64,
    /// Lower scale limit.
    pub min_scale: f64,
    /// Upper scale limit.
    pub max_scale: f64,
    /// Pan clamp behavior.
    pub clamp_mode: ClampMode,
    /// Fit placement.
    pub fit_mode: FitMode,
    /// Whether a transition is in flight.
    pub animating: bool,
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Rect, Size, Vec2};

    use super::Viewport;
    use crate::config::{ClampMode, FitMode, GotoOptions, HomePadding, ViewConfig};

    const EPS: f64 = 1e-9;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    fn rect_close(a: Rect, b: Rect) -> bool {
        close(a.x0, b.x0) && close(a.y0, b.y0) && close(a.x1, b.x1) && close(a.y1, b.y1)
    }

    #[test]
    fn point_roundtrip() {
        let mut vp = Viewport::new(Rect::new(0.0, 0.0, 800.0, 600.0))
            .with_config(ViewConfig::default().with_clamp_mode(ClampMode::None));
        vp.zoom_about_view_point(Point::new(100.0, 50.0), 3.0);
        vp.pan_by_view(Vec2::new(-37.0, 12.5));
        let world = Point::new(10.0, -5.0);
        let back = vp.viewer_to_world(vp.world_to_viewer_point(world));
        assert!((back.x - world.x).abs() < EPS);
        assert!((back.y - world.y).abs() < EPS);
    }

    #[test]
    fn zoom_about_anchor_keeps_anchor_fixed() {
        let mut vp = Viewport::new(Rect::new(0.0, 0.0, 800.0, 600.0));
        let anchor = Point::new(200.0, 400.0);
        let before = vp.viewer_to_world(anchor);
        vp.zoom_about_view_point(anchor, 2.0);
        let after = vp.viewer_to_world(anchor);
        assert!(close(before.x, after.x) && close(before.y, after.y));
        assert!(close(vp.scale_factor(), 2.0));
    }

    #[test]
    fn home_fits_the_binding_axis_and_centers_the_other() {
        let mut vp = Viewport::new(Rect::new(0.0, 0.0, 600.0, 300.0));
        let home = Rect::new(0.0, 0.0, 1200.0, 1800.0);
        vp.set_world_bounds(Some(home));
        vp.go_home(GotoOptions::immediate());
        assert!(close(vp.scale_factor(), 300.0 / 1800.0));
        let on_screen = vp.world_to_viewer(home);
        assert!(rect_close(on_screen, Rect::new(200.0, 0.0, 400.0, 300.0)), "{on_screen:?}");
    }

    #[test]
    fn home_padding_is_per_edge() {
        let mut vp = Viewport::new(Rect::new(0.0, 0.0, 600.0, 300.0)).with_config(
            ViewConfig::default().with_home_padding(HomePadding {
                top: 20.0,
                right: 0.0,
                bottom: 80.0,
                left: 100.0,
            }),
        );
        vp.set_world_bounds(Some(Rect::new(0.0, 0.0, 100.0, 100.0)));
        vp.go_home(GotoOptions::immediate());
        // Padded area is 500×200 at (100, 20); 100×100 fits at scale 2.
        assert!(close(vp.scale_factor(), 2.0));
        let on_screen = vp.world_to_viewer(Rect::new(0.0, 0.0, 100.0, 100.0));
        assert!(rect_close(on_screen, Rect::new(250.0, 20.0, 450.0, 220.0)), "{on_screen:?}");
    }

    #[test]
    fn degenerate_home_uses_unit_scale() {
        let mut vp = Viewport::new(Rect::new(0.0, 0.0, 400.0, 400.0));
        vp.set_world_bounds(Some(Rect::new(10.0, 10.0, 10.0, 500.0)));
        assert_eq!(vp.home_scale(), 1.0);
        vp.go_home(GotoOptions::immediate());
        assert_eq!(vp.scale_factor(), 1.0);
        vp.goto_region(Rect::new(5.0, 5.0, 5.0, 5.0), GotoOptions::immediate());
        assert_eq!(vp.scale_factor(), 1.0);
    }

    #[test]
    fn align_min_fit_places_region_at_padded_origin() {
        let mut vp = Viewport::new(Rect::new(0.0, 0.0, 200.0, 100.0)).with_config(
            ViewConfig::default()
                .with_fit_mode(FitMode::AlignMin)
                .with_home_padding(HomePadding::uniform(10.0)),
        );
        let region = Rect::new(-50.0, -20.0, 150.0, 80.0);
        vp.goto_region(region, GotoOptions::immediate());
        let p = vp.world_to_viewer_point(region.origin());
        assert!(close(p.x, 10.0) && close(p.y, 10.0), "{p:?}");
    }

    #[test]
    fn resize_keeps_center_and_scale() {
        let mut vp = Viewport::new(Rect::new(0.0, 0.0, 400.0, 300.0));
        vp.set_world_bounds(Some(Rect::new(0.0, 0.0, 1000.0, 1000.0)));
        vp.go_home(GotoOptions::immediate());
        vp.zoom_about_view_point(Point::new(100.0, 100.0), 1.5);
        let center = vp.viewer_to_world(vp.view_rect().center());
        let scale = vp.scale_factor();
        vp.resize(Size::new(800.0, 600.0));
        let after = vp.viewer_to_world(vp.view_rect().center());
        assert!(close(center.x, after.x) && close(center.y, after.y));
        // Home scale doubled, so the limits moved but the scale is still legal.
        let (min, max) = vp.scale_limits();
        assert!(scale >= min && scale <= max);
        assert!(close(vp.scale_factor(), scale));
    }

    #[test]
    fn zoom_limits_follow_home_scale() {
        let mut vp = Viewport::new(Rect::new(0.0, 0.0, 100.0, 100.0)).with_config(
            ViewConfig::default()
                .with_max_over_zoom(4.0)
                .with_max_under_zoom(2.0),
        );
        vp.set_world_bounds(Some(Rect::new(0.0, 0.0, 1000.0, 1000.0)));
        vp.go_home(GotoOptions::immediate());
        assert!(close(vp.scale_factor(), 0.1));
        vp.zoom_about_view_point(Point::new(50.0, 50.0), 0.01);
        assert!(close(vp.scale_factor(), 0.05));
        vp.zoom_about_view_point(Point::new(50.0, 50.0), 1e6);
        assert!(close(vp.scale_factor(), 4.0));
    }

    #[test]
    fn home_is_reachable_past_max_over_zoom() {
        // A tiny world fits at scale 100, far above max_over_zoom.
        let mut vp = Viewport::new(Rect::new(0.0, 0.0, 100.0, 100.0))
            .with_config(ViewConfig::default().with_max_over_zoom(2.0));
        vp.set_world_bounds(Some(Rect::new(0.0, 0.0, 1.0, 1.0)));
        vp.go_home(GotoOptions::immediate());
        assert!(close(vp.scale_factor(), 100.0));
    }

    #[test]
    fn keep_some_visible_pulls_back() {
        let mut vp = Viewport::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        let bounds = Rect::new(0.0, 0.0, 50.0, 50.0);
        vp.set_world_bounds(Some(bounds));
        vp.go_home(GotoOptions::immediate());
        vp.pan_by_view(Vec2::new(1000.0, 1000.0));
        let visible = vp.visible_world_rect();
        assert!(visible.x1 >= bounds.x0 - 1e-6);
        assert!(visible.y1 >= bounds.y0 - 1e-6);
    }

    #[test]
    fn keep_center_inside_clamps_center() {
        let mut vp = Viewport::new(Rect::new(0.0, 0.0, 100.0, 100.0))
            .with_config(ViewConfig::default().with_clamp_mode(ClampMode::KeepCenterInside));
        let bounds = Rect::new(0.0, 0.0, 200.0, 200.0);
        vp.set_world_bounds(Some(bounds));
        vp.go_home(GotoOptions::immediate());
        vp.center_on(Point::new(-500.0, 900.0));
        let c = vp.visible_world_rect().center();
        assert!(close(c.x, 0.0) && close(c.y, 200.0), "{c:?}");
    }

    #[test]
    fn transitions_ease_to_target() {
        let mut vp = Viewport::new(Rect::new(0.0, 0.0, 100.0, 100.0))
            .with_config(ViewConfig::default().with_clamp_mode(ClampMode::None));
        vp.set_world_bounds(Some(Rect::new(0.0, 0.0, 100.0, 100.0)));
        vp.go_home(GotoOptions::immediate());
        vp.goto_region(Rect::new(0.0, 0.0, 50.0, 50.0), GotoOptions::over(1.0));
        assert!(vp.is_animating());
        assert!(close(vp.scale_factor(), 1.0));
        assert!(vp.step(0.5));
        let mid = vp.scale_factor();
        assert!(mid > 1.0 && mid < 2.0);
        assert!(!vp.step(0.5));
        assert!(!vp.is_animating());
        assert!(close(vp.scale_factor(), 2.0));
        assert!(!vp.step(0.1));
    }

    #[test]
    fn user_input_cancels_transition() {
        let mut vp = Viewport::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        vp.set_viewport_over(Rect::new(0.0, 0.0, 10.0, 10.0), 2.0);
        assert!(vp.transition_target().is_some());
        vp.pan_by_view(Vec2::new(1.0, 0.0));
        assert!(!vp.is_animating());
    }

    #[test]
    fn viewport_region_and_debug_info() {
        let mut vp = Viewport::new(Rect::new(0.0, 0.0, 400.0, 200.0));
        vp.set_home_position(Some(Rect::new(0.0, 0.0, 800.0, 400.0)));
        vp.go_home(GotoOptions::immediate());
        let region = vp.viewport();
        assert!(close(region.scale, 0.5));
        assert!(rect_close(region.rect(), Rect::new(0.0, 0.0, 800.0, 400.0)));
        let info = vp.debug_info();
        assert_eq!(info.home_rect, Some(Rect::new(0.0, 0.0, 800.0, 400.0)));
        assert!(info.min_scale <= info.scale && info.scale <= info.max_scale);
        assert!(!info.animating);
        assert!(close(vp.world_units_per_pixel(), 2.0));
    }
}
