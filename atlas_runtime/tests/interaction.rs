// Copyright 2025 the Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport wiring, default input behavior, listeners and frame hooks.

use std::cell::Cell;
use std::rc::Rc;

use atlas_runtime::{
    EventKind, GotoOptions, HookKind, LoadError, ObjectId, ObjectKind, PaintFrame, PointerButton,
    PointerInput, RenderBackend, ResolvedImage, ResourceKey, ResourceLoader, Runtime,
    RuntimeConfig, TileResolver,
};
use futures::future::{self, FutureExt, LocalBoxFuture};
use kurbo::{Point, Rect, Size, Vec2};

struct NoImages;

impl TileResolver for NoImages {
    fn resolve(
        &self,
        _id: &str,
        _target: Size,
    ) -> LocalBoxFuture<'static, Result<ResolvedImage, LoadError>> {
        future::ready(Ok(ResolvedImage::empty())).boxed_local()
    }
}

struct NoPixels;

impl ResourceLoader<ResourceKey> for NoPixels {
    type Output = ();

    fn load(&self, _key: &ResourceKey) -> LocalBoxFuture<'static, Result<(), LoadError>> {
        future::ready(Ok(())).boxed_local()
    }
}

#[derive(Default)]
struct Frames {
    painted: usize,
    objects: Vec<ObjectId>,
}

impl RenderBackend<()> for Frames {
    fn paint(&mut self, frame: &PaintFrame<'_, ()>) {
        self.painted += 1;
        self.objects = frame.objects.iter().map(|o| o.id).collect();
    }
}

type Rt = Runtime<NoImages, NoPixels>;

fn runtime(view: Size, config: RuntimeConfig) -> Rt {
    Runtime::new(Rect::from_origin_size(Point::ORIGIN, view), config, NoImages, NoPixels).unwrap()
}

/// A 1000×1000 backdrop in a 500×500 view, homed at half scale.
fn board() -> (Rt, ObjectId) {
    let mut rt = runtime(Size::new(500.0, 500.0), RuntimeConfig::default());
    let root = rt.world().root();
    let backdrop = rt
        .insert(root, ObjectKind::Box, Rect::new(0.0, 0.0, 1000.0, 1000.0))
        .unwrap();
    rt.recalculate_world_size();
    (rt, backdrop)
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn close_pt(a: Point, b: Point) -> bool {
    close(a.x, b.x) && close(a.y, b.y)
}

#[test]
fn first_world_bounds_go_home() {
    let mut rt = runtime(Size::new(600.0, 300.0), RuntimeConfig::default());
    let root = rt.world().root();
    rt.insert(root, ObjectKind::Image, Rect::new(0.0, 0.0, 1200.0, 1800.0))
        .unwrap();
    assert_eq!(
        rt.recalculate_world_size(),
        Some(Rect::new(0.0, 0.0, 1200.0, 1800.0))
    );

    // Height binds; the width is centered.
    assert!(close(rt.scale_factor(), 300.0 / 1800.0));
    let shown = rt.world_to_viewer(Rect::new(0.0, 0.0, 1200.0, 1800.0));
    assert!(close(shown.x0, 200.0) && close(shown.x1, 400.0));
    assert!(close(shown.y0, 0.0) && close(shown.y1, 300.0));
    assert!(close(rt.viewport().height, 1800.0));
    assert_eq!(rt.recalculate_world_size(), None);
}

#[test]
fn growing_the_world_keeps_the_view() {
    let (mut rt, _) = board();
    let root = rt.world().root();
    rt.insert(root, ObjectKind::Box, Rect::new(2000.0, 2000.0, 2100.0, 2100.0))
        .unwrap();
    rt.tick(0.0, &mut Frames::default());
    assert_eq!(
        rt.scene().viewport.world_bounds(),
        Some(Rect::new(0.0, 0.0, 2100.0, 2100.0))
    );
    assert!(close(rt.scale_factor(), 0.5));
}

#[test]
fn resize_keeps_center_unless_rehoming() {
    let world = Rect::new(0.0, 0.0, 1200.0, 1800.0);
    for (rehome, expected) in [(false, 300.0 / 1800.0), (true, 500.0 / 1800.0)] {
        let mut rt = runtime(
            Size::new(600.0, 300.0),
            RuntimeConfig::default().with_rehome_on_resize(rehome),
        );
        let root = rt.world().root();
        rt.insert(root, ObjectKind::Image, world).unwrap();
        rt.recalculate_world_size();
        rt.resize(Size::new(1000.0, 500.0));
        assert!(close(rt.scale_factor(), expected), "rehome = {rehome}");
        assert!(close_pt(
            rt.viewer_to_world(Point::new(500.0, 250.0)),
            world.center()
        ));
    }
}

#[test]
fn wheel_zooms_about_the_pointer_unless_consumed() {
    let (mut rt, backdrop) = board();
    let anchor = Point::new(100.0, 400.0);
    let under = rt.viewer_to_world(anchor);
    let wheel = PointerInput::Wheel {
        position: anchor,
        delta: Vec2::new(0.0, -100.0),
    };
    assert!(!rt.handle_input(wheel));
    assert!(close(rt.scale_factor(), 1.0));
    assert!(close_pt(rt.viewer_to_world(anchor), under));

    let seen = Rc::new(Cell::new(Vec2::ZERO));
    let sink = seen.clone();
    rt.add_event_listener(backdrop, EventKind::Wheel, false, move |_, ev| {
        sink.set(ev.atlas_delta);
        ev.consume();
    })
    .unwrap();
    assert!(rt.handle_input(wheel));
    assert!(close(rt.scale_factor(), 1.0));
    assert_eq!(seen.get(), Vec2::new(0.0, -100.0));
}

#[test]
fn background_drag_pans() {
    let (mut rt, _) = board();
    let center = Point::new(250.0, 250.0);
    rt.handle_input(PointerInput::Down {
        position: center,
        button: PointerButton::Primary,
    });
    // Below the drag threshold nothing moves.
    rt.handle_input(PointerInput::Move {
        position: Point::new(251.0, 250.0),
    });
    assert!(close_pt(rt.viewer_to_world(center), Point::new(500.0, 500.0)));

    rt.handle_input(PointerInput::Move {
        position: Point::new(300.0, 250.0),
    });
    rt.handle_input(PointerInput::Up {
        position: Point::new(300.0, 250.0),
        button: PointerButton::Primary,
    });
    assert!(close_pt(rt.viewer_to_world(center), Point::new(400.0, 500.0)));
}

#[test]
fn dragging_an_object_moves_it_instead_of_the_view() {
    let (mut rt, _) = board();
    let root = rt.world().root();
    let card = rt
        .insert(root, ObjectKind::Box, Rect::new(100.0, 100.0, 200.0, 200.0))
        .unwrap();
    for kind in [EventKind::DragStart, EventKind::Drag] {
        rt.add_event_listener(card, kind, false, |scene, ev| {
            scene.world.translate(ev.target, ev.atlas_delta);
        })
        .unwrap();
    }

    // The card's center sits at (75, 75) on screen.
    rt.handle_input(PointerInput::Down {
        position: Point::new(75.0, 75.0),
        button: PointerButton::Primary,
    });
    rt.handle_input(PointerInput::Move {
        position: Point::new(95.0, 75.0),
    });
    rt.handle_input(PointerInput::Up {
        position: Point::new(95.0, 75.0),
        button: PointerButton::Primary,
    });
    assert_eq!(rt.world().origin(card), Some(Point::new(140.0, 100.0)));
    assert!(close_pt(
        rt.viewer_to_world(Point::new(250.0, 250.0)),
        Point::new(500.0, 500.0)
    ));
}

#[test]
fn listeners_can_remove_their_own_object() {
    let (mut rt, _) = board();
    let root = rt.world().root();
    let card = rt
        .insert(root, ObjectKind::Box, Rect::new(100.0, 100.0, 200.0, 200.0))
        .unwrap();
    let clicks = Rc::new(Cell::new(0));
    let counter = clicks.clone();
    rt.add_event_listener(card, EventKind::Click, false, move |scene, ev| {
        counter.set(counter.get() + 1);
        scene.world.remove(ev.target);
    })
    .unwrap();

    let at = Point::new(75.0, 75.0);
    for _ in 0..2 {
        rt.handle_input(PointerInput::Down {
            position: at,
            button: PointerButton::Primary,
        });
        rt.handle_input(PointerInput::Up {
            position: at,
            button: PointerButton::Primary,
        });
    }
    assert_eq!(clicks.get(), 1);
    assert!(!rt.world().is_alive(card));

    let mut frames = Frames::default();
    rt.tick(0.0, &mut frames);
    assert!(!frames.objects.contains(&card));
}

#[test]
fn hooks_run_around_paints() {
    let (mut rt, backdrop) = board();
    let root = rt.world().root();
    let dot = rt
        .insert(root, ObjectKind::Box, Rect::new(10.0, 10.0, 20.0, 20.0))
        .unwrap();

    let mover = rt.register_hook(HookKind::BeforeFrame, move |scene, info| {
        scene.world.translate(dot, Vec2::new(10.0, 0.0));
        info.request_update();
    });
    let frames_seen = Rc::new(Cell::new(0));
    let counter = frames_seen.clone();
    let painter = rt.register_hook(HookKind::Frame, move |_, info| {
        assert!(info.is_painting());
        counter.set(counter.get() + 1);
    });

    let mut backend = Frames::default();
    for _ in 0..3 {
        assert!(rt.tick(1.0 / 60.0, &mut backend).painted);
    }
    assert_eq!(backend.painted, 3);
    assert_eq!(frames_seen.get(), 3);
    assert_eq!(rt.world().origin(dot), Some(Point::new(40.0, 10.0)));
    assert_eq!(backend.objects, vec![backdrop, dot]);

    mover.unregister();
    painter.unregister();
    rt.schedule_update();
    rt.tick(1.0 / 60.0, &mut backend);
    rt.tick(1.0 / 60.0, &mut backend);
    assert_eq!(frames_seen.get(), 3);
    assert_eq!(rt.world().origin(dot), Some(Point::new(40.0, 10.0)));
    assert!(!rt.needs_frame());
}

#[test]
fn animated_navigation_settles_over_ticks() {
    let (mut rt, _) = board();
    rt.goto_region(Rect::new(0.0, 0.0, 250.0, 250.0), GotoOptions::over(1.0));
    assert!(rt.needs_frame());

    let mut backend = Frames::default();
    let mut ticks = 0;
    while rt.scene().viewport.is_animating() {
        assert!(rt.tick(0.25, &mut backend).painted);
        ticks += 1;
        assert!(ticks <= 5, "transition did not finish");
    }
    assert!(close(rt.scale_factor(), 2.0));
    assert!(close_pt(
        rt.viewer_to_world(Point::new(250.0, 250.0)),
        Point::new(125.0, 125.0)
    ));
}
