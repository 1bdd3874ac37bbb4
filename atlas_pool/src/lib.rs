// Copyright 2025 the Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=atlas_pool --heading-base-level=0

//! Atlas Pool: a fixed-capacity resource pool with pinning.
//!
//! [`ResourcePool`] bounds how many decoded resources (typically image tiles)
//! are held at once. It is a ring of `N` slots plus an out-of-ring table of
//! pinned entries:
//!
//! - [`ResourcePool::set`] writes at the ring's cursor, evicting whatever key
//!   owned that slot, then advances the cursor modulo `N`.
//! - [`ResourcePool::lock`] pins a present key: it moves out of the ring and
//!   is never evicted.
//! - [`ResourcePool::unlock`] drops the pin. The key becomes absent; its old
//!   ring slot may long since have been overwritten, so the caller re-supplies
//!   the value on the next miss.
//!
//! ## Eviction is FIFO, not LRU
//!
//! Eviction order is the physical slot order. Reads do not refresh an entry.
//! This keeps every operation O(1) with no recency bookkeeping; pin the
//! entries you must keep instead of relying on access order.
//!
//! ## Minimal example
//!
//! ```rust
//! use atlas_pool::ResourcePool;
//!
//! let mut pool = ResourcePool::new(3).unwrap();
//! pool.set("a", 'A');
//! pool.set("b", 'B');
//! pool.set("c", 'C');
//! pool.lock(&"a").unwrap();
//!
//! pool.set("d", 'D'); // takes a's old slot, a is pinned
//! assert_eq!(pool.get(&"b"), Some(&'B'));
//!
//! pool.set("e", 'E'); // evicts b
//! assert_eq!(pool.get(&"b"), None);
//! assert_eq!(pool.get(&"a"), Some(&'A'));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod pool;

pub use pool::{PoolError, ResourcePool};
