// Copyright 2025 the Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover state: enter/leave transitions from changes of the hovered path.
//!
//! ```
//! use atlas_responder::hover::{HoverState, HoverEvent};
//! let mut h: HoverState<u32> = HoverState::new();
//! assert_eq!(h.update_path(&[1, 2]), vec![HoverEvent::Enter(1), HoverEvent::Enter(2)]);
//! assert_eq!(h.update_path(&[1, 3]), vec![HoverEvent::Leave(2), HoverEvent::Enter(3)]);
//! ```

use alloc::vec::Vec;

/// Tracks the hovered root→target path.
///
/// - Leave events are emitted from inner-most to outer-most.
/// - Enter events are emitted from outer-most to inner-most.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HoverState<K: Copy + Eq> {
    current: Vec<K>,
}

/// A hover transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HoverEvent<K> {
    /// The pointer entered the node.
    Enter(K),
    /// The pointer left the node.
    Leave(K),
}

impl<K: Copy + Eq> Default for HoverState<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq> HoverState<K> {
    /// Creates an empty hover state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: Vec::new(),
        }
    }

    /// The hovered root→target path.
    #[must_use]
    pub fn current_path(&self) -> &[K] {
        &self.current
    }

    /// Clears the path, returning leave events (inner→outer).
    pub fn clear(&mut self) -> Vec<HoverEvent<K>> {
        let out = self.current.iter().rev().map(|&k| HoverEvent::Leave(k)).collect();
        self.current.clear();
        out
    }

    /// Replaces the path and returns the transitions between the two.
    pub fn update_path(&mut self, new_path: &[K]) -> Vec<HoverEvent<K>> {
        let lca = self
            .current
            .iter()
            .zip(new_path)
            .take_while(|(a, b)| a == b)
            .count();

        let mut out = Vec::new();
        out.extend(self.current[lca..].iter().rev().map(|&k| HoverEvent::Leave(k)));
        out.extend(new_path[lca..].iter().map(|&k| HoverEvent::Enter(k)));
        self.current.clear();
        self.current.extend_from_slice(new_path);
        out
    }

    /// Drops nodes for which `alive` is false, without emitting events.
    pub fn retain(&mut self, mut alive: impl FnMut(K) -> bool) {
        if let Some(first_dead) = self.current.iter().position(|&k| !alive(k)) {
            self.current.truncate(first_dead);
        }
    }
}
