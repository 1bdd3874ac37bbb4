// Copyright 2025 the Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event vocabulary: kinds, phases, dispatch steps and the event payload.

use atlas_world::{EventMask, ObjectId};
use kurbo::{Point, Vec2};

/// Propagation phase of a dispatch step.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Root toward the target's parent.
    Capture,
    /// The target itself.
    Target,
    /// The target's parent back toward the root.
    Bubble,
}

/// Result of handling one dispatch step.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Outcome {
    /// Keep propagating.
    #[default]
    Continue,
    /// Stop propagation; the event is not marked consumed.
    Stop,
    /// Stop propagation and mark the event consumed, suppressing default
    /// behavior such as viewport zoom or pan.
    StopAndConsume,
}

/// One step of a propagation sequence.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Dispatch<K> {
    /// Phase of this step.
    pub phase: Phase,
    /// Node receiving the step.
    pub node: K,
}

impl<K> Dispatch<K> {
    /// A capture-phase step.
    pub fn capture(node: K) -> Self {
        Self {
            phase: Phase::Capture,
            node,
        }
    }

    /// A target-phase step.
    pub fn target(node: K) -> Self {
        Self {
            phase: Phase::Target,
            node,
        }
    }

    /// A bubble-phase step.
    pub fn bubble(node: K) -> Self {
        Self {
            phase: Phase::Bubble,
            node,
        }
    }
}

/// Kinds of events delivered to listeners.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A button was pressed.
    PointerDown,
    /// A button was released.
    PointerUp,
    /// The pointer moved.
    PointerMove,
    /// Press and release resolved to the same object without a drag.
    Click,
    /// Scroll wheel or trackpad scroll.
    Wheel,
    /// The pointer moved past the drag threshold with a button held.
    DragStart,
    /// Motion during a drag.
    Drag,
    /// The button was released during a drag.
    DragEnd,
    /// The pointer entered the object or one of its descendants.
    PointerEnter,
    /// The pointer left the object and all of its descendants.
    PointerLeave,
}

impl EventKind {
    /// Listener mask bit that makes an object a hit candidate for this kind.
    #[must_use]
    pub const fn mask(self) -> EventMask {
        match self {
            Self::PointerDown => EventMask::POINTER_DOWN,
            Self::PointerUp => EventMask::POINTER_UP,
            Self::PointerMove => EventMask::POINTER_MOVE,
            Self::Click => EventMask::CLICK,
            Self::Wheel => EventMask::WHEEL,
            Self::DragStart | Self::Drag | Self::DragEnd => EventMask::DRAG,
            Self::PointerEnter | Self::PointerLeave => EventMask::HOVER,
        }
    }

    /// Conventional lowercase event name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::PointerDown => "pointerdown",
            Self::PointerUp => "pointerup",
            Self::PointerMove => "pointermove",
            Self::Click => "click",
            Self::Wheel => "wheel",
            Self::DragStart => "dragstart",
            Self::Drag => "drag",
            Self::DragEnd => "dragend",
            Self::PointerEnter => "pointerenter",
            Self::PointerLeave => "pointerleave",
        }
    }

    /// Enter and leave are delivered to each node on its own, without
    /// capture or bubble steps.
    #[must_use]
    pub const fn bubbles(self) -> bool {
        !matches!(self, Self::PointerEnter | Self::PointerLeave)
    }
}

/// Pointer button.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Usually the left button.
    Primary,
    /// Usually the right button.
    Secondary,
    /// Usually the middle button.
    Auxiliary,
    /// Any other button, by platform index.
    Other(u8),
}

/// Raw pointer input in viewport coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PointerInput {
    /// Button press.
    Down {
        /// Viewport position.
        position: Point,
        /// Pressed button.
        button: PointerButton,
    },
    /// Button release.
    Up {
        /// Viewport position.
        position: Point,
        /// Released button.
        button: PointerButton,
    },
    /// Pointer motion.
    Move {
        /// Viewport position.
        position: Point,
    },
    /// Scroll.
    Wheel {
        /// Viewport position.
        position: Point,
        /// Scroll delta in pixels; positive `y` scrolls down.
        delta: Vec2,
    },
    /// The pointer left the viewport.
    Leave,
}

impl PointerInput {
    /// Viewport position carried by the input, if any.
    #[must_use]
    pub fn position(&self) -> Option<Point> {
        match *self {
            Self::Down { position, .. }
            | Self::Up { position, .. }
            | Self::Move { position }
            | Self::Wheel { position, .. } => Some(position),
            Self::Leave => None,
        }
    }
}

/// Event payload handed to listeners.
#[derive(Clone, Debug, PartialEq)]
pub struct AtlasEvent {
    /// What happened.
    pub kind: EventKind,
    /// Resolved target.
    pub target: ObjectId,
    /// Node whose listeners are running.
    pub current: ObjectId,
    /// Phase of the current step.
    pub phase: Phase,
    /// Pointer position in viewport pixels.
    pub position: Point,
    /// Pointer position in world units.
    pub atlas: Point,
    /// Pointer position in the target's local space.
    pub local: Point,
    /// Button for press, release, click and drag events.
    pub button: Option<PointerButton>,
    /// Wheel delta, or drag motion since the previous drag event, in pixels.
    pub delta: Vec2,
    /// `delta` in world units.
    pub atlas_delta: Vec2,
    stopped: bool,
    consumed: bool,
}

impl AtlasEvent {
    /// Creates an event aimed at `target` with zero deltas and no button.
    #[must_use]
    pub fn new(kind: EventKind, target: ObjectId, position: Point, atlas: Point) -> Self {
        Self {
            kind,
            target,
            current: target,
            phase: Phase::Target,
            position,
            atlas,
            local: atlas,
            button: None,
            delta: Vec2::ZERO,
            atlas_delta: Vec2::ZERO,
            stopped: false,
            consumed: false,
        }
    }

    /// Stops propagation after the current node's listeners.
    pub fn stop_propagation(&mut self) {
        self.stopped = true;
    }

    /// Stops propagation and marks the event consumed.
    pub fn consume(&mut self) {
        self.stopped = true;
        self.consumed = true;
    }

    /// Returns `true` once a listener stopped propagation.
    #[must_use]
    pub fn is_propagation_stopped(&self) -> bool {
        self.stopped
    }

    /// Returns `true` once a listener consumed the event.
    #[must_use]
    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    pub(crate) fn outcome(&self) -> Outcome {
        match (self.stopped, self.consumed) {
            (_, true) => Outcome::StopAndConsume,
            (true, false) => Outcome::Stop,
            (false, false) => Outcome::Continue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_kinds_share_a_mask() {
        assert_eq!(EventKind::DragStart.mask(), EventMask::DRAG);
        assert_eq!(EventKind::DragEnd.mask(), EventKind::Drag.mask());
        assert_eq!(EventKind::PointerLeave.mask(), EventMask::HOVER);
        assert!(!EventKind::PointerEnter.bubbles());
        assert!(EventKind::Click.bubbles());
    }

    #[test]
    fn outcome_follows_flags() {
        let mut world = atlas_world::World::new();
        let root = world.root();
        let mut ev = AtlasEvent::new(EventKind::Click, root, Point::ORIGIN, Point::ORIGIN);
        assert_eq!(ev.outcome(), Outcome::Continue);
        ev.stop_propagation();
        assert_eq!(ev.outcome(), Outcome::Stop);
        ev.consume();
        assert_eq!(ev.outcome(), Outcome::StopAndConsume);
        assert!(ev.is_consumed());
    }
}
