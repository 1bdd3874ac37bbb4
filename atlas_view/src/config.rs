// Copyright 2025 the Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Rect;

/// Clamp behavior for panning relative to the bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClampMode {
    /// No clamping; the view may move freely.
    None,
    /// Keep at least part of the bounding box visible.
    #[default]
    KeepSomeVisible,
    /// Keep the center of the view inside the bounding box.
    KeepCenterInside,
}

/// How fitted content is placed in the padded view area.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FitMode {
    /// Center the fitted rectangle.
    #[default]
    Center,
    /// Align the rectangle's minimum corner with the padded area's origin.
    AlignMin,
}

/// Screen-space padding around fitted content, in pixels, per edge.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HomePadding {
    /// Top edge.
    pub top: f64,
    /// Right edge.
    pub right: f64,
    /// Bottom edge.
    pub bottom: f64,
    /// Left edge.
    pub left: f64,
}

impl HomePadding {
    /// No padding.
    pub const ZERO: Self = Self::uniform(0.0);

    /// The same padding on every edge.
    #[must_use]
    pub const fn uniform(px: f64) -> Self {
        Self {
            top: px,
            right: px,
            bottom: px,
            left: px,
        }
    }

    /// Shrinks `view` by this padding. Negative extents collapse to zero.
    #[must_use]
    pub fn inset(&self, view: Rect) -> Rect {
        let x0 = view.x0 + self.left;
        let y0 = view.y0 + self.top;
        let x1 = (view.x1 - self.right).max(x0);
        let y1 = (view.y1 - self.bottom).max(y0);
        Rect::new(x0, y0, x1, y1)
    }
}

/// Viewport configuration.
///
/// Zoom limits are relative to the home scale (the scale at which the home
/// rectangle fits the padded view):
///
/// - the largest scale is `max(max_over_zoom, home_scale)`, so home is
///   always reachable;
/// - the smallest scale is `home_scale / max_under_zoom`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewConfig {
    /// Padding applied when fitting home and regions.
    pub home_padding: HomePadding,
    /// Largest allowed scale, in screen pixels per world unit.
    pub max_over_zoom: f64,
    /// How far past home the view may zoom out (at least `1`).
    pub max_under_zoom: f64,
    /// Explicit bounding box for pan clamping. Defaults to the world bounds.
    pub bounds: Option<Rect>,
    /// Pan clamp behavior.
    pub clamp_mode: ClampMode,
    /// Fit placement.
    pub fit_mode: FitMode,
    /// Default transition length in seconds for non-immediate navigation.
    pub transition_duration: f64,
    /// Factor applied by [`Viewport::zoom_in`](crate::Viewport::zoom_in) and
    /// [`Viewport::zoom_out`](crate::Viewport::zoom_out).
    pub zoom_step: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            home_padding: HomePadding::ZERO,
            max_over_zoom: 4.0,
            max_under_zoom: 2.0,
            bounds: None,
            clamp_mode: ClampMode::default(),
            fit_mode: FitMode::default(),
            transition_duration: 0.3,
            zoom_step: 2.0,
        }
    }
}

impl ViewConfig {
    /// Sets [`ViewConfig::home_padding`].
    #[must_use]
    pub fn with_home_padding(mut self, padding: HomePadding) -> Self {
        self.home_padding = padding;
        self
    }

    /// Sets [`ViewConfig::max_over_zoom`].
    #[must_use]
    pub fn with_max_over_zoom(mut self, scale: f64) -> Self {
        self.max_over_zoom = scale;
        self
    }

    /// Sets [`ViewConfig::max_under_zoom`].
    #[must_use]
    pub fn with_max_under_zoom(mut self, factor: f64) -> Self {
        self.max_under_zoom = factor;
        self
    }

    /// Sets [`ViewConfig::bounds`].
    #[must_use]
    pub fn with_bounds(mut self, bounds: Option<Rect>) -> Self {
        self.bounds = bounds;
        self
    }

    /// Sets [`ViewConfig::clamp_mode`].
    #[must_use]
    pub fn with_clamp_mode(mut self, mode: ClampMode) -> Self {
        self.clamp_mode = mode;
        self
    }

    /// Sets [`ViewConfig::fit_mode`].
    #[must_use]
    pub fn with_fit_mode(mut self, mode: FitMode) -> Self {
        self.fit_mode = mode;
        self
    }

    /// Sets [`ViewConfig::transition_duration`].
    #[must_use]
    pub fn with_transition_duration(mut self, seconds: f64) -> Self {
        self.transition_duration = seconds;
        self
    }

    /// Sets [`ViewConfig::zoom_step`].
    #[must_use]
    pub fn with_zoom_step(mut self, step: f64) -> Self {
        self.zoom_step = step;
        self
    }
}

/// Options for [`Viewport::goto_region`](crate::Viewport::goto_region) and
/// [`Viewport::go_home`](crate::Viewport::go_home).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GotoOptions {
    /// Snap without a transition.
    pub immediate: bool,
    /// Padding override; `None` uses [`ViewConfig::home_padding`].
    pub padding: Option<HomePadding>,
    /// Transition length override in seconds.
    pub duration: Option<f64>,
}

impl GotoOptions {
    /// Options that snap immediately.
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            immediate: true,
            ..Self::default()
        }
    }

    /// Options that animate over `seconds`.
    #[must_use]
    pub fn over(seconds: f64) -> Self {
        Self {
            duration: Some(seconds),
            ..Self::default()
        }
    }

    /// Sets a padding override.
    #[must_use]
    pub fn with_padding(mut self, padding: HomePadding) -> Self {
        self.padding = Some(padding);
        self
    }
}
