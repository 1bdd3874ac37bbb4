// Copyright 2025 the Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag state: movement deltas and total offsets from position changes.
//!
//! ```
//! use atlas_responder::drag::DragState;
//! use kurbo::{Point, Vec2};
//!
//! let mut drag = DragState::default();
//! drag.start(Point::new(10.0, 20.0));
//! assert_eq!(drag.update(Point::new(15.0, 25.0)), Some(Vec2::new(5.0, 5.0)));
//! assert_eq!(drag.total_offset(Point::new(15.0, 25.0)), Some(Vec2::new(5.0, 5.0)));
//! ```

use kurbo::{Point, Vec2};

/// Tracks a drag between a start position and the last seen position.
#[derive(Debug, Clone, Default, Copy, PartialEq)]
pub struct DragState {
    /// Where the drag started.
    pub start_pos: Option<Point>,
    /// Last recorded position.
    pub last_pos: Option<Point>,
}

impl DragState {
    /// Starts tracking at `pos`.
    pub fn start(&mut self, pos: Point) {
        self.start_pos = Some(pos);
        self.last_pos = Some(pos);
    }

    /// Records `pos` and returns the movement since the last update.
    pub fn update(&mut self, pos: Point) -> Option<Vec2> {
        self.start_pos?;
        let last = self.last_pos.replace(pos)?;
        Some(pos - last)
    }

    /// Offset of `current_pos` from the drag start.
    #[must_use]
    pub fn total_offset(&self, current_pos: Point) -> Option<Vec2> {
        self.start_pos.map(|start| current_pos - start)
    }

    /// Ends the drag.
    pub fn end(&mut self) {
        self.start_pos = None;
        self.last_pos = None;
    }

    /// Returns `true` while a drag is active.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.start_pos.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_returns_none_when_not_dragging() {
        let mut drag = DragState::default();
        assert_eq!(drag.update(Point::new(15.0, 25.0)), None);
        assert!(drag.last_pos.is_none());
    }

    #[test]
    fn deltas_accumulate_to_total() {
        let mut drag = DragState::default();
        drag.start(Point::new(0.0, 0.0));
        assert_eq!(drag.update(Point::new(3.0, 0.0)), Some(Vec2::new(3.0, 0.0)));
        assert_eq!(drag.update(Point::new(3.0, 4.0)), Some(Vec2::new(0.0, 4.0)));
        assert_eq!(
            drag.total_offset(Point::new(3.0, 4.0)),
            Some(Vec2::new(3.0, 4.0))
        );
        drag.end();
        assert!(!drag.is_dragging());
        assert_eq!(drag.total_offset(Point::ORIGIN), None);
    }
}
