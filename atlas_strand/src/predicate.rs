// Copyright 2025 the Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Closed-interval box predicates.

use kurbo::{Point, Rect};

/// Returns `true` if `a` and `b` overlap on both axes.
///
/// Edges are inclusive: two boxes that share exactly one edge (or one corner)
/// intersect. The test is symmetric. Callers must pass normalized rects
/// (`x0 <= x1`, `y0 <= y1`).
#[inline]
#[must_use]
pub fn intersects(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && a.x1 >= b.x0 && a.y0 <= b.y1 && a.y1 >= b.y0
}

/// Returns `true` if `pt` lies inside `rect` or on its boundary.
///
/// Unlike [`Rect::contains`], the right and bottom edges are included.
#[inline]
#[must_use]
pub fn contains_point(rect: Rect, pt: Point) -> bool {
    pt.x >= rect.x0 && pt.x <= rect.x1 && pt.y >= rect.y0 && pt.y <= rect.y1
}
