// Copyright 2025 the Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout-change notifications.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use kurbo::Rect;

/// A structural layout change of a [`World`](crate::World).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LayoutEvent {
    /// The root's aggregate bounds changed during
    /// [`World::recalculate_world_size`](crate::World::recalculate_world_size).
    RecalculateWorldSize {
        /// New root bounds in world units.
        bounds: Rect,
    },
}

impl LayoutEvent {
    /// Stable event name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::RecalculateWorldSize { .. } => "recalculate-world-size",
        }
    }
}

/// Token returned by [`World::subscribe`](crate::World::subscribe).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct LayoutSubscription(u64);

type Callback = Box<dyn FnMut(&LayoutEvent)>;

/// Ordered list of layout subscribers.
#[derive(Default)]
pub(crate) struct Subscribers {
    next: u64,
    entries: Vec<(LayoutSubscription, Callback)>,
}

impl fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("len", &self.entries.len())
            .finish_non_exhaustive()
    }
}

impl Subscribers {
    pub(crate) fn insert(&mut self, cb: Callback) -> LayoutSubscription {
        let token = LayoutSubscription(self.next);
        self.next += 1;
        self.entries.push((token, cb));
        token
    }

    pub(crate) fn remove(&mut self, token: LayoutSubscription) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(t, _)| *t != token);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn emit(&mut self, event: &LayoutEvent) {
        for (_, cb) in &mut self.entries {
            cb(event);
        }
    }
}
