// Copyright 2025 the Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatcher helper: build a propagation sequence and walk it, honoring
//! stop/consume outcomes.
//!
//! - Process entries in order.
//! - [`Outcome::Stop`] aborts propagation immediately (no target/bubble if raised in capture).
//! - [`Outcome::StopAndConsume`] aborts propagation and returns `true`.
//! - Returns `true` if consumed; otherwise `false` (for both `Continue` and `Stop`).
//!
//! ## Minimal example
//!
//! ```
//! use atlas_responder::dispatcher;
//! use atlas_responder::{Outcome, Phase};
//!
//! let seq = dispatcher::sequence(&[1_u32, 2, 3]);
//! let mut handled: Vec<(Phase, u32)> = Vec::new();
//! let consumed = dispatcher::run(&seq, &mut (), |d, _| {
//!     handled.push((d.phase, d.node));
//!     Outcome::Continue
//! });
//!
//! assert!(!consumed);
//! assert_eq!(handled, vec![
//!     (Phase::Capture, 1), (Phase::Capture, 2),
//!     (Phase::Target, 3),
//!     (Phase::Bubble, 2), (Phase::Bubble, 1),
//! ]);
//! ```

use alloc::vec::Vec;

use crate::types::{Dispatch, Outcome};

/// Builds the capture → target → bubble sequence for a root→target path.
///
/// Ancestors get one capture step (outer→inner) and one bubble step
/// (inner→outer); the last node gets a single target step. An empty path
/// yields an empty sequence.
#[must_use]
pub fn sequence<K: Copy>(path: &[K]) -> Vec<Dispatch<K>> {
    let Some((&target, ancestors)) = path.split_last() else {
        return Vec::new();
    };
    let mut out = Vec::with_capacity(ancestors.len() * 2 + 1);
    out.extend(ancestors.iter().map(|&k| Dispatch::capture(k)));
    out.push(Dispatch::target(target));
    out.extend(ancestors.iter().rev().map(|&k| Dispatch::bubble(k)));
    out
}

/// Run a handler over a dispatch sequence and honor stop/consume outcomes.
///
/// Returns `true` when a handler returned [`Outcome::StopAndConsume`].
pub fn run<K, E>(
    seq: &[Dispatch<K>],
    event: &mut E,
    mut handler: impl FnMut(&Dispatch<K>, &mut E) -> Outcome,
) -> bool {
    for d in seq {
        match handler(d, event) {
            Outcome::Continue => {}
            Outcome::Stop => return false,
            Outcome::StopAndConsume => return true,
        }
    }
    false
}
