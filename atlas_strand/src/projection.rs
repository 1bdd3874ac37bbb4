// Copyright 2025 the Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect, Size};

/// Human-facing `{x, y, width, height}` form of one strand record.
///
/// Conversion to and from a record is lossless; the record's [`Kind`](crate::Kind)
/// is not part of the projection and must be kept separately.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Projection {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Horizontal extent (`x2 - x1`).
    pub width: f64,
    /// Vertical extent (`y2 - y1`).
    pub height: f64,
}

impl Projection {
    /// Creates a projection from its components.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Builds a projection from two opposite corners.
    #[must_use]
    pub fn from_corners(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(x1, y1, x2 - x1, y2 - y1)
    }

    /// Returns the `(x1, y1, x2, y2)` corners of this projection.
    #[must_use]
    pub fn corners(self) -> (f64, f64, f64, f64) {
        (self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Top-left corner.
    #[must_use]
    pub fn origin(self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Width and height.
    #[must_use]
    pub fn size(self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Converts to a Kurbo rect.
    #[must_use]
    pub fn to_rect(self) -> Rect {
        Rect::from_origin_size(self.origin(), self.size())
    }
}

impl From<Rect> for Projection {
    fn from(rect: Rect) -> Self {
        let rect = rect.abs();
        Self::new(rect.x0, rect.y0, rect.width(), rect.height())
    }
}

impl From<Projection> for Rect {
    fn from(p: Projection) -> Self {
        p.to_rect()
    }
}
