// Copyright 2025 the Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer router: turns raw viewport input into routed [`AtlasEvent`]s.

use alloc::vec;
use alloc::vec::Vec;

use atlas_view::Viewport;
use atlas_world::{EventMask, ObjectId, World};
use kurbo::{Point, Vec2};

use crate::dispatcher;
use crate::drag::DragState;
use crate::hit::{HitPath, hit_test};
use crate::hover::{HoverEvent, HoverState};
use crate::types::{AtlasEvent, Dispatch, EventKind, PointerButton, PointerInput};

/// Router tuning.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RouterConfig {
    /// Distance in pixels the pointer must travel with a button held before
    /// a drag starts.
    pub drag_threshold: f64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            drag_threshold: 3.0,
        }
    }
}

/// An event with its propagation sequence, ready for
/// [`ListenerRegistry::dispatch`](crate::ListenerRegistry::dispatch).
#[derive(Clone, Debug, PartialEq)]
pub struct RoutedEvent {
    /// Payload.
    pub event: AtlasEvent,
    /// Capture → target → bubble steps (target only for enter/leave).
    pub sequence: Vec<Dispatch<ObjectId>>,
}

/// Everything one input produced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Routed {
    /// Events in delivery order.
    pub events: Vec<RoutedEvent>,
    /// Drag motion in pixels when the press started over no drag listener.
    /// Embedders typically pan the viewport by it.
    pub background_drag: Option<Vec2>,
}

#[derive(Clone, Debug)]
struct Press {
    button: PointerButton,
    position: Point,
    click: Option<ObjectId>,
    drag: Option<ObjectId>,
    dragging: bool,
}

/// Stateful pointer router.
///
/// Holds hover, press and drag state between inputs. Targets are resolved
/// per event kind with [`hit_test`], except drag events, which stay with the
/// object that was under the pointer when the button went down.
#[derive(Clone, Debug, Default)]
pub struct EventRouter {
    config: RouterConfig,
    hover: HoverState<ObjectId>,
    press: Option<Press>,
    drag: DragState,
}

impl EventRouter {
    /// Creates a router with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a router with `config`.
    #[must_use]
    pub fn with_config(config: RouterConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Innermost hovered object.
    #[must_use]
    pub fn hovered(&self) -> Option<ObjectId> {
        self.hover.current_path().last().copied()
    }

    /// Returns `true` while a drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.press.as_ref().is_some_and(|p| p.dragging)
    }

    /// Object receiving the current drag, if any.
    #[must_use]
    pub fn drag_target(&self) -> Option<ObjectId> {
        self.press.as_ref().and_then(|p| p.drag)
    }

    /// Forgets objects that are no longer alive.
    pub fn forget_dead(&mut self, world: &World) {
        self.hover.retain(|id| world.is_alive(id));
        if let Some(press) = &mut self.press {
            press.click = press.click.filter(|id| world.is_alive(*id));
            press.drag = press.drag.filter(|id| world.is_alive(*id));
        }
    }

    /// Drops press, drag and hover state without emitting events.
    pub fn reset(&mut self) {
        self.hover = HoverState::new();
        self.press = None;
        self.drag.end();
    }

    /// Routes one input.
    ///
    /// `world` should have up-to-date bounds (see
    /// [`World::recalculate_world_size`]).
    pub fn route(&mut self, world: &World, viewport: &Viewport, input: PointerInput) -> Routed {
        let mut out = Routed::default();
        let Some(position) = input.position() else {
            let transitions = self.hover.clear();
            push_hover(world, &mut out, transitions, Point::ORIGIN, Point::ORIGIN);
            return out;
        };
        let atlas = viewport.viewer_to_world(position);
        let scale = viewport.world_units_per_pixel();

        match input {
            PointerInput::Move { .. } => {
                let path = hit_test(world, atlas, EventMask::HOVER)
                    .map(|h| h.path)
                    .unwrap_or_default();
                let transitions = self.hover.update_path(&path);
                push_hover(world, &mut out, transitions, position, atlas);
                if let Some(hit) = hit_test(world, atlas, EventKind::PointerMove.mask()) {
                    out.events
                        .push(routed(EventKind::PointerMove, &hit, position, atlas));
                }
                self.route_drag_motion(world, &mut out, position, atlas, scale);
            }
            PointerInput::Down { button, .. } => {
                if let Some(hit) = hit_test(world, atlas, EventKind::PointerDown.mask()) {
                    let mut r = routed(EventKind::PointerDown, &hit, position, atlas);
                    r.event.button = Some(button);
                    out.events.push(r);
                }
                if self.press.is_none() {
                    self.press = Some(Press {
                        button,
                        position,
                        click: hit_test(world, atlas, EventMask::CLICK).map(|h| h.target),
                        drag: hit_test(world, atlas, EventMask::DRAG).map(|h| h.target),
                        dragging: false,
                    });
                }
            }
            PointerInput::Up { button, .. } => {
                if let Some(hit) = hit_test(world, atlas, EventKind::PointerUp.mask()) {
                    let mut r = routed(EventKind::PointerUp, &hit, position, atlas);
                    r.event.button = Some(button);
                    out.events.push(r);
                }
                if self.press.as_ref().is_some_and(|p| p.button == button) {
                    self.release(world, &mut out, position, atlas, scale);
                }
            }
            PointerInput::Wheel { delta, .. } => {
                if let Some(hit) = hit_test(world, atlas, EventKind::Wheel.mask()) {
                    let mut r = routed(EventKind::Wheel, &hit, position, atlas);
                    r.event.delta = delta;
                    r.event.atlas_delta = delta * scale;
                    out.events.push(r);
                }
            }
            PointerInput::Leave => {}
        }
        out
    }

    fn route_drag_motion(
        &mut self,
        world: &World,
        out: &mut Routed,
        position: Point,
        atlas: Point,
        scale: f64,
    ) {
        let Some(press) = &mut self.press else {
            return;
        };
        let kind = if press.dragging {
            EventKind::Drag
        } else {
            if (position - press.position).hypot() < self.config.drag_threshold {
                return;
            }
            press.dragging = true;
            self.drag.start(press.position);
            EventKind::DragStart
        };
        let delta = self.drag.update(position).unwrap_or_default();
        let (button, target) = (press.button, press.drag);
        match target {
            Some(target) => {
                out.events.push(drag_event(
                    world, kind, target, button, position, atlas, delta, scale,
                ));
            }
            None => out.background_drag = Some(delta),
        }
    }

    fn release(
        &mut self,
        world: &World,
        out: &mut Routed,
        position: Point,
        atlas: Point,
        scale: f64,
    ) {
        let Some(press) = self.press.take() else {
            return;
        };
        if press.dragging {
            let delta = self.drag.update(position).unwrap_or_default();
            self.drag.end();
            match press.drag {
                Some(target) => out.events.push(drag_event(
                    world,
                    EventKind::DragEnd,
                    target,
                    press.button,
                    position,
                    atlas,
                    delta,
                    scale,
                )),
                None if delta != Vec2::ZERO => out.background_drag = Some(delta),
                None => {}
            }
            return;
        }
        let Some(hit) = hit_test(world, atlas, EventMask::CLICK) else {
            return;
        };
        if press.click == Some(hit.target) {
            let mut r = routed(EventKind::Click, &hit, position, atlas);
            r.event.button = Some(press.button);
            out.events.push(r);
        }
    }
}

fn push_hover(
    world: &World,
    out: &mut Routed,
    transitions: Vec<HoverEvent<ObjectId>>,
    position: Point,
    atlas: Point,
) {
    for t in transitions {
        let (kind, node) = match t {
            HoverEvent::Enter(n) => (EventKind::PointerEnter, n),
            HoverEvent::Leave(n) => (EventKind::PointerLeave, n),
        };
        let mut event = AtlasEvent::new(kind, node, position, atlas);
        event.local = to_local(world, node, atlas);
        out.events.push(RoutedEvent {
            event,
            sequence: vec![Dispatch::target(node)],
        });
    }
}

fn routed(kind: EventKind, hit: &HitPath, position: Point, atlas: Point) -> RoutedEvent {
    let mut event = AtlasEvent::new(kind, hit.target, position, atlas);
    event.local = hit.local;
    RoutedEvent {
        event,
        sequence: dispatcher::sequence(&hit.path),
    }
}

fn drag_event(
    world: &World,
    kind: EventKind,
    target: ObjectId,
    button: PointerButton,
    position: Point,
    atlas: Point,
    delta: Vec2,
    scale: f64,
) -> RoutedEvent {
    let mut event = AtlasEvent::new(kind, target, position, atlas);
    event.local = to_local(world, target, atlas);
    event.button = Some(button);
    event.delta = delta;
    event.atlas_delta = delta * scale;
    RoutedEvent {
        event,
        sequence: dispatcher::sequence(&world.path(target)),
    }
}

fn to_local(world: &World, id: ObjectId, atlas: Point) -> Point {
    world
        .world_transform(id)
        .map_or(atlas, |tf| tf.inverse() * atlas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_view::GotoOptions;
    use atlas_world::ObjectKind;
    use kurbo::Rect;

    fn setup() -> (World, Viewport, ObjectId, ObjectId) {
        let mut w = World::new();
        let root = w.root();
        let a = w
            .insert(root, ObjectKind::Box, Rect::new(0.0, 0.0, 100.0, 100.0))
            .unwrap();
        let b = w
            .insert(root, ObjectKind::Box, Rect::new(200.0, 0.0, 300.0, 100.0))
            .unwrap();
        let bounds = w.recalculate_world_size();
        let mut view = Viewport::new(Rect::new(0.0, 0.0, 300.0, 100.0));
        view.set_world_bounds(bounds);
        view.go_home(GotoOptions::immediate());
        (w, view, a, b)
    }

    fn kinds(r: &Routed) -> Vec<EventKind> {
        r.events.iter().map(|e| e.event.kind).collect()
    }

    fn down(x: f64, y: f64) -> PointerInput {
        PointerInput::Down {
            position: Point::new(x, y),
            button: PointerButton::Primary,
        }
    }

    fn up(x: f64, y: f64) -> PointerInput {
        PointerInput::Up {
            position: Point::new(x, y),
            button: PointerButton::Primary,
        }
    }

    fn mv(x: f64, y: f64) -> PointerInput {
        PointerInput::Move {
            position: Point::new(x, y),
        }
    }

    #[test]
    fn click_requires_same_target() {
        let (mut w, view, a, b) = setup();
        w.set_listening(a, EventMask::CLICK);
        w.set_listening(b, EventMask::CLICK);
        let mut router = EventRouter::new();

        router.route(&w, &view, down(50.0, 50.0));
        let r = router.route(&w, &view, up(51.0, 50.0));
        assert_eq!(kinds(&r), vec![EventKind::Click]);
        assert_eq!(r.events[0].event.target, a);
        assert_eq!(r.events[0].event.atlas, Point::new(51.0, 50.0));

        router.route(&w, &view, down(50.0, 50.0));
        let r = router.route(&w, &view, up(250.0, 50.0));
        assert!(r.events.is_empty());
        assert!(!router.is_dragging());
    }

    #[test]
    fn drag_stays_with_press_target() {
        let (mut w, view, a, _b) = setup();
        w.set_listening(a, EventMask::DRAG | EventMask::CLICK);
        let mut router = EventRouter::new();

        router.route(&w, &view, down(50.0, 50.0));
        let r = router.route(&w, &view, mv(51.0, 50.0));
        assert!(r.events.is_empty(), "below threshold");

        let r = router.route(&w, &view, mv(60.0, 50.0));
        assert_eq!(kinds(&r), vec![EventKind::DragStart]);
        assert_eq!(r.events[0].event.delta, Vec2::new(10.0, 0.0));

        // Leaves `a`'s bounds; still routed to `a`.
        let r = router.route(&w, &view, mv(250.0, 50.0));
        assert_eq!(kinds(&r), vec![EventKind::Drag]);
        assert_eq!(r.events[0].event.target, a);
        assert_eq!(r.events[0].event.delta, Vec2::new(190.0, 0.0));

        let r = router.route(&w, &view, up(250.0, 50.0));
        assert_eq!(kinds(&r), vec![EventKind::DragEnd]);
        assert!(!router.is_dragging());
    }

    #[test]
    fn background_drag_reports_pan() {
        let (w, view, _a, _b) = setup();
        let mut router = EventRouter::new();
        router.route(&w, &view, down(150.0, 50.0));
        let r = router.route(&w, &view, mv(160.0, 55.0));
        assert!(r.events.is_empty());
        assert_eq!(r.background_drag, Some(Vec2::new(10.0, 5.0)));
        let r = router.route(&w, &view, up(160.0, 55.0));
        assert_eq!(r.background_drag, None);
    }

    #[test]
    fn hover_enter_and_leave() {
        let (mut w, view, a, b) = setup();
        w.set_listening(a, EventMask::HOVER);
        w.set_listening(b, EventMask::HOVER);
        let root = w.root();
        let mut router = EventRouter::new();

        let r = router.route(&w, &view, mv(10.0, 10.0));
        assert_eq!(
            kinds(&r),
            vec![EventKind::PointerEnter, EventKind::PointerEnter]
        );
        assert_eq!(r.events[0].event.target, root);
        assert_eq!(r.events[1].event.target, a);
        assert_eq!(r.events[1].sequence, vec![Dispatch::target(a)]);

        let r = router.route(&w, &view, mv(210.0, 10.0));
        assert_eq!(
            kinds(&r),
            vec![EventKind::PointerLeave, EventKind::PointerEnter]
        );
        assert_eq!(r.events[1].event.local, Point::new(10.0, 10.0));

        let r = router.route(&w, &view, PointerInput::Leave);
        assert_eq!(
            kinds(&r),
            vec![EventKind::PointerLeave, EventKind::PointerLeave]
        );
        assert_eq!(router.hovered(), None);
    }

    #[test]
    fn wheel_carries_world_delta() {
        let (mut w, mut view, a, _b) = setup();
        w.set_listening(a, EventMask::WHEEL);
        view.set_scale(2.0);
        view.center_on(Point::new(50.0, 50.0));
        let mut router = EventRouter::new();
        let r = router.route(
            &w,
            &view,
            PointerInput::Wheel {
                position: Point::new(150.0, 50.0),
                delta: Vec2::new(0.0, 10.0),
            },
        );
        assert_eq!(kinds(&r), vec![EventKind::Wheel]);
        assert_eq!(r.events[0].event.atlas_delta, Vec2::new(0.0, 5.0));
    }
}
