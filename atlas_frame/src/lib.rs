// Copyright 2025 the Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=atlas_frame --heading-base-level=0

//! Atlas Frame: a cooperative frame scheduler.
//!
//! The scheduler never owns a timer. An external animation driver calls
//! [`FrameScheduler::tick`] once per display frame; each tick runs
//! before-frame hooks, then (only when an update is pending) the paint
//! callback and frame hooks, then after-frame hooks.
//!
//! Hooks are removed through the [`HookHandle`] returned at registration,
//! which is safe from inside any hook.
//!
//! ```rust
//! use atlas_frame::{FrameScheduler, HookKind};
//!
//! let mut frames: FrameScheduler<u32> = FrameScheduler::new();
//! let handle = frames.register_hook(HookKind::Frame, |painted, _| *painted += 1);
//!
//! let mut painted = 0;
//! frames.tick(&mut painted, 1.0 / 60.0, |_, _| {});
//! assert_eq!(painted, 0);
//!
//! frames.schedule_update();
//! let report = frames.tick(&mut painted, 1.0 / 60.0, |_, _| {});
//! assert!(report.painted);
//! assert_eq!(painted, 1);
//!
//! handle.unregister();
//! assert_eq!(frames.hook_count(), 1);
//! frames.tick(&mut painted, 1.0 / 60.0, |_, _| {});
//! assert_eq!(frames.hook_count(), 0);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod scheduler;

pub use scheduler::{
    FrameInfo, FrameReport, FrameScheduler, Hook, HookHandle, HookKind, UpdateHandle,
};
