// Copyright 2025 the Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=atlas_host --heading-base-level=0

//! Atlas Host: resource bindings with cancellable, deduplicated loads.
//!
//! - [`Host`] binds one resource: `loading`, `element`, `error` and an abort
//!   signal. [`Host::begin_load`] hands out a [`LoadTicket`] only when idle;
//!   [`LoadTicket::run`] wraps the loader future in
//!   [`futures::future::Abortable`]; [`Host::settle`] commits the result
//!   unless it is stale.
//! - [`TileStore`] keeps decoded resources in a bounded
//!   [`ResourcePool`](atlas_pool::ResourcePool) with one host per key.
//! - [`TileResolver`] and [`ResourceLoader`] are the seams to the outside
//!   world. They are passed in explicitly.
//!
//! Loads are cooperative: nothing here spawns threads or tasks. The embedder
//! drives the futures and feeds completions back on the thread that owns the
//! host.
//!
//! ```rust
//! use atlas_host::{Host, LoadOutcome};
//! use futures::executor::block_on;
//! use futures::future;
//!
//! let mut host: Host<&str> = Host::new();
//! let ticket = host.begin_load().unwrap();
//! assert!(host.begin_load().is_none());
//!
//! let done = block_on(ticket.run(future::ready(Ok("pixels"))));
//! assert_eq!(done.outcome, LoadOutcome::Loaded("pixels"));
//! host.settle(done);
//! assert_eq!(host.element(), Some(&"pixels"));
//! ```

mod error;
mod host;
mod resolver;
mod store;

pub use error::LoadError;
pub use host::{Completion, Host, LoadId, LoadOutcome, LoadTicket};
pub use resolver::{ResolvedImage, ResourceLoader, Thumbnail, TileResolver, resolve_or_empty};
pub use store::{KeyedCompletion, KeyedTicket, TileStore};
