// Copyright 2025 the Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The frame scheduler and its hook registry.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::Cell;
use core::fmt;

/// When a hook runs within a frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HookKind {
    /// Every tick, before the update check.
    BeforeFrame,
    /// Only on ticks that paint, after the paint callback.
    Frame,
    /// Every tick, last.
    AfterFrame,
}

/// Per-tick information handed to hooks.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameInfo {
    frame_number: u64,
    delta: f64,
    painting: bool,
    requested: bool,
}

impl FrameInfo {
    /// Number of this tick, starting at `1`.
    #[must_use]
    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    /// Seconds since the previous tick, as passed to
    /// [`FrameScheduler::tick`].
    #[must_use]
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Returns `true` once this tick has decided to paint.
    #[must_use]
    pub fn is_painting(&self) -> bool {
        self.painting
    }

    /// Requests a paint.
    ///
    /// From a [`HookKind::BeforeFrame`] hook this makes the current tick
    /// paint; from later hooks it makes the next tick paint.
    pub fn request_update(&mut self) {
        self.requested = true;
    }
}

/// Deregistration handle returned by [`FrameScheduler::register_hook`].
///
/// Cloning yields another handle to the same hook. Dropping a handle leaves
/// the hook registered.
#[derive(Clone, Debug)]
pub struct HookHandle {
    alive: Rc<Cell<bool>>,
}

impl HookHandle {
    /// Removes the hook. Safe to call from inside any hook, including the
    /// hook itself; a removed hook never runs again, even later in the same
    /// pass.
    pub fn unregister(&self) {
        self.alive.set(false);
    }

    /// Returns `true` until [`HookHandle::unregister`] is called.
    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.alive.get()
    }
}

/// Shared flag that schedules a paint on the next tick.
///
/// Useful for code that cannot borrow the scheduler, such as a layout
/// subscriber.
#[derive(Clone, Debug)]
pub struct UpdateHandle {
    pending: Rc<Cell<bool>>,
}

impl UpdateHandle {
    /// Schedules a paint on the next tick.
    pub fn schedule_update(&self) {
        self.pending.set(true);
    }
}

/// What a tick did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FrameReport {
    /// Number of the tick.
    pub frame_number: u64,
    /// Whether the paint callback and [`HookKind::Frame`] hooks ran.
    pub painted: bool,
    /// Number of hook invocations.
    pub hooks_run: usize,
    /// Whether a paint is already scheduled for the next tick.
    pub update_pending: bool,
}

/// Boxed hook callback.
pub type Hook<C> = Box<dyn FnMut(&mut C, &mut FrameInfo)>;

struct Slot<C> {
    kind: HookKind,
    alive: Rc<Cell<bool>>,
    callback: Hook<C>,
}

/// Single cooperative frame loop driven by an external animation source.
///
/// Each [`FrameScheduler::tick`]:
/// 1. runs [`HookKind::BeforeFrame`] hooks;
/// 2. if an update is pending, runs the paint callback and then
///    [`HookKind::Frame`] hooks;
/// 3. runs [`HookKind::AfterFrame`] hooks;
/// 4. clears the pending flag, keeping only requests made after step 1.
///
/// Hooks run in registration order within a kind. `C` is the context every
/// hook receives mutably.
pub struct FrameScheduler<C> {
    hooks: Vec<Slot<C>>,
    pending: Rc<Cell<bool>>,
    frame_number: u64,
}

impl<C> fmt::Debug for FrameScheduler<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("hooks", &self.hook_count())
            .field("pending", &self.pending.get())
            .field("frame_number", &self.frame_number)
            .finish_non_exhaustive()
    }
}

impl<C> Default for FrameScheduler<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> FrameScheduler<C> {
    /// Creates a scheduler with no hooks and no pending update.
    #[must_use]
    pub fn new() -> Self {
        Self {
            hooks: Vec::new(),
            pending: Rc::new(Cell::new(false)),
            frame_number: 0,
        }
    }

    /// Registers `callback` to run at `kind` on every tick.
    pub fn register_hook(
        &mut self,
        kind: HookKind,
        callback: impl FnMut(&mut C, &mut FrameInfo) + 'static,
    ) -> HookHandle {
        let alive = Rc::new(Cell::new(true));
        self.hooks.push(Slot {
            kind,
            alive: alive.clone(),
            callback: Box::new(callback),
        });
        HookHandle { alive }
    }

    /// Number of registered hooks.
    #[must_use]
    pub fn hook_count(&self) -> usize {
        self.hooks.iter().filter(|s| s.alive.get()).count()
    }

    /// Schedules a paint on the next tick.
    pub fn schedule_update(&self) {
        self.pending.set(true);
    }

    /// A detached handle that can schedule paints.
    #[must_use]
    pub fn update_handle(&self) -> UpdateHandle {
        UpdateHandle {
            pending: self.pending.clone(),
        }
    }

    /// Returns `true` if the next tick will paint.
    #[must_use]
    pub fn is_update_pending(&self) -> bool {
        self.pending.get()
    }

    /// Number of the last tick (`0` before the first).
    #[must_use]
    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    /// Runs one frame. `dt` is the time since the previous tick in seconds.
    pub fn tick(
        &mut self,
        ctx: &mut C,
        dt: f64,
        paint: impl FnOnce(&mut C, &FrameInfo),
    ) -> FrameReport {
        self.frame_number += 1;
        let mut info = FrameInfo {
            frame_number: self.frame_number,
            delta: dt,
            painting: false,
            requested: self.pending.replace(false),
        };

        let mut hooks_run = self.run(HookKind::BeforeFrame, ctx, &mut info);
        let painted = info.requested;
        info.requested = false;
        info.painting = painted;
        if painted {
            paint(ctx, &info);
            hooks_run += self.run(HookKind::Frame, ctx, &mut info);
        }
        hooks_run += self.run(HookKind::AfterFrame, ctx, &mut info);

        self.hooks.retain(|s| s.alive.get());
        if info.requested {
            self.pending.set(true);
        }
        FrameReport {
            frame_number: self.frame_number,
            painted,
            hooks_run,
            update_pending: self.pending.get(),
        }
    }

    fn run(&mut self, kind: HookKind, ctx: &mut C, info: &mut FrameInfo) -> usize {
        let mut count = 0;
        for slot in &mut self.hooks {
            if slot.kind == kind && slot.alive.get() {
                (slot.callback)(ctx, info);
                count += 1;
            }
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    type Log = Vec<&'static str>;

    #[test]
    fn idle_tick_skips_frame_hooks() {
        let mut s: FrameScheduler<Log> = FrameScheduler::new();
        s.register_hook(HookKind::BeforeFrame, |log, _| log.push("before"));
        s.register_hook(HookKind::Frame, |log, _| log.push("frame"));
        s.register_hook(HookKind::AfterFrame, |log, _| log.push("after"));

        let mut log = Log::new();
        let report = s.tick(&mut log, 0.016, |log, _| log.push("paint"));
        assert_eq!(log, vec!["before", "after"]);
        assert!(!report.painted);
        assert_eq!(report.hooks_run, 2);
        assert_eq!(report.frame_number, 1);
    }

    #[test]
    fn scheduled_update_paints_once() {
        let mut s: FrameScheduler<Log> = FrameScheduler::new();
        s.register_hook(HookKind::BeforeFrame, |log, _| log.push("before"));
        s.register_hook(HookKind::Frame, |log, _| log.push("frame"));
        s.register_hook(HookKind::AfterFrame, |log, _| log.push("after"));
        s.schedule_update();
        assert!(s.is_update_pending());

        let mut log = Log::new();
        let report = s.tick(&mut log, 0.016, |log, info| {
            assert!(info.is_painting());
            log.push("paint");
        });
        assert_eq!(log, vec!["before", "paint", "frame", "after"]);
        assert!(report.painted);
        assert!(!s.is_update_pending());

        log.clear();
        assert!(!s.tick(&mut log, 0.016, |_, _| {}).painted);
    }

    #[test]
    fn before_frame_request_paints_this_tick() {
        let mut s: FrameScheduler<Log> = FrameScheduler::new();
        s.register_hook(HookKind::BeforeFrame, |_, info| info.request_update());
        let mut log = Log::new();
        let report = s.tick(&mut log, 0.0, |log, _| log.push("paint"));
        assert!(report.painted);
        assert!(!report.update_pending);
        assert_eq!(log, vec!["paint"]);
    }

    #[test]
    fn later_requests_carry_to_next_tick() {
        let mut s: FrameScheduler<Log> = FrameScheduler::new();
        let handle = s.register_hook(HookKind::AfterFrame, |_, info| info.request_update());
        let mut log = Log::new();
        let report = s.tick(&mut log, 0.0, |_, _| {});
        assert!(!report.painted);
        assert!(report.update_pending);
        handle.unregister();
        assert!(s.tick(&mut log, 0.0, |_, _| {}).painted);
        assert!(!s.is_update_pending());
    }

    #[test]
    fn unregister_inside_a_hook_is_safe() {
        let mut s: FrameScheduler<Log> = FrameScheduler::new();
        let second: Rc<Cell<Option<HookHandle>>> = Rc::new(Cell::new(None));
        let slot = second.clone();
        let first = s.register_hook(HookKind::BeforeFrame, move |log, _| {
            log.push("first");
            if let Some(h) = slot.take() {
                h.unregister();
            }
        });
        second.set(Some(
            s.register_hook(HookKind::BeforeFrame, |log, _| log.push("second")),
        ));
        let me = s.register_hook(HookKind::BeforeFrame, |log, _| log.push("third"));
        let me_inner = me.clone();
        s.register_hook(HookKind::AfterFrame, move |_, _| me_inner.unregister());

        let mut log = Log::new();
        s.tick(&mut log, 0.0, |_, _| {});
        assert_eq!(log, vec!["first", "third"]);
        assert!(!me.is_registered());
        assert_eq!(s.hook_count(), 2);

        log.clear();
        first.unregister();
        s.tick(&mut log, 0.0, |_, _| {});
        assert!(log.is_empty());
        assert_eq!(s.hook_count(), 1);
    }

    #[test]
    fn update_handle_schedules() {
        let mut s: FrameScheduler<()> = FrameScheduler::new();
        let h = s.update_handle();
        h.schedule_update();
        assert!(s.tick(&mut (), 0.0, |_, _| {}).painted);
    }
}
