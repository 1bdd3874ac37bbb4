// Copyright 2025 the Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Rect;

/// An in-flight interpolation between two visible world rectangles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Transition {
    from: Rect,
    to: Rect,
    elapsed: f64,
    duration: f64,
}

impl Transition {
    pub(crate) fn new(from: Rect, to: Rect, duration: f64) -> Self {
        Self {
            from,
            to,
            elapsed: 0.0,
            duration,
        }
    }

    pub(crate) fn target(&self) -> Rect {
        self.to
    }

    /// Advances by `dt` seconds and returns the rect to show and whether the
    /// transition has finished.
    pub(crate) fn advance(&mut self, dt: f64) -> (Rect, bool) {
        self.elapsed += dt.max(0.0);
        let t = if self.duration > 0.0 {
            (self.elapsed / self.duration).min(1.0)
        } else {
            1.0
        };
        if t >= 1.0 {
            return (self.to, true);
        }
        (lerp_rect(self.from, self.to, ease_in_out(t)), false)
    }
}

/// Smoothstep: zero slope at both ends.
pub(crate) fn ease_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

fn lerp_rect(a: Rect, b: Rect, t: f64) -> Rect {
    Rect::new(
        a.x0 + (b.x0 - a.x0) * t,
        a.y0 + (b.y0 - a.y0) * t,
        a.x1 + (b.x1 - a.x1) * t,
        a.y1 + (b.y1 - a.y1) * t,
    )
}
