// Copyright 2025 the Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyed resource store: bounded residency plus per-key load hosts.

use core::fmt;
use core::future::Future;
use core::hash::Hash;

use atlas_pool::{PoolError, ResourcePool};
use hashbrown::{HashMap, HashSet};

use crate::error::LoadError;
use crate::host::{Completion, Host, LoadTicket};

/// Permission to load one key, issued by [`TileStore::begin`].
#[derive(Debug)]
pub struct KeyedTicket<K> {
    key: K,
    ticket: LoadTicket,
}

impl<K> KeyedTicket<K> {
    /// Key being loaded.
    #[must_use]
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Drives `load` until it resolves or the store aborts it.
    pub async fn run<T, F>(self, load: F) -> KeyedCompletion<K, T>
    where
        F: Future<Output = Result<T, LoadError>>,
    {
        let completion = self.ticket.run(load).await;
        KeyedCompletion {
            key: self.key,
            completion,
        }
    }
}

/// A completion tagged with its key, for [`TileStore::settle`].
#[derive(Clone, Debug, PartialEq)]
pub struct KeyedCompletion<K, T> {
    /// Loaded key.
    pub key: K,
    /// Attempt result.
    pub completion: Completion<T>,
}

/// Decoded resources keyed by `K`.
///
/// - Resident values live in a [`ResourcePool`]: at most `capacity`
///   unpinned values, oldest evicted first. Evicted keys are simply absent
///   and may be requested again.
/// - Each key has at most one load in flight.
/// - Failures are kept per key until the next attempt or
///   [`TileStore::release`].
pub struct TileStore<K, T> {
    resident: ResourcePool<K, T>,
    hosts: HashMap<K, Host<T>>,
}

impl<K: fmt::Debug, T> fmt::Debug for TileStore<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TileStore")
            .field("resident", &self.resident)
            .field("hosts", &self.hosts.len())
            .finish_non_exhaustive()
    }
}

impl<K, T> TileStore<K, T>
where
    K: Clone + Eq + Hash + fmt::Debug,
{
    /// Creates a store holding at most `capacity` unpinned values.
    pub fn new(capacity: usize) -> Result<Self, PoolError> {
        Ok(Self {
            resident: ResourcePool::new(capacity)?,
            hosts: HashMap::new(),
        })
    }

    /// Residency limit.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.resident.capacity()
    }

    /// Number of resident values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resident.len()
    }

    /// Returns `true` if nothing is resident.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resident.is_empty()
    }

    /// Resident value for `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&T> {
        self.resident.get(key)
    }

    /// Returns `true` if `key` has a load in flight.
    #[must_use]
    pub fn is_loading(&self, key: &K) -> bool {
        self.hosts.get(key).is_some_and(Host::is_loading)
    }

    /// Number of loads in flight.
    #[must_use]
    pub fn loading_count(&self) -> usize {
        self.hosts.values().filter(|h| h.is_loading()).count()
    }

    /// Error of the last failed attempt for `key`.
    #[must_use]
    pub fn error(&self, key: &K) -> Option<&LoadError> {
        self.hosts.get(key).and_then(Host::error)
    }

    /// Starts loading `key`.
    ///
    /// Returns `None` if the value is resident or a load is already in flight.
    pub fn begin(&mut self, key: K) -> Option<KeyedTicket<K>> {
        if self.resident.contains(&key) {
            return None;
        }
        let ticket = self.hosts.entry(key.clone()).or_default().begin_load()?;
        Some(KeyedTicket { key, ticket })
    }

    /// Commits a completion. Returns `false` if it was stale and dropped.
    pub fn settle(&mut self, done: KeyedCompletion<K, T>) -> bool {
        let Some(host) = self.hosts.get_mut(&done.key) else {
            return false;
        };
        let applied = host.settle(done.completion);
        if let Some(value) = host.take_element() {
            if let Some((evicted, _)) = self.resident.set(done.key.clone(), value) {
                tracing::trace!(key = ?evicted, "evicted");
            }
        }
        self.forget_idle(&done.key);
        applied
    }

    /// Aborts the in-flight load for `key`.
    pub fn abort(&mut self, key: &K) -> bool {
        let aborted = self.hosts.get_mut(key).is_some_and(Host::abort);
        self.forget_idle(key);
        aborted
    }

    /// Aborts every in-flight load. Returns how many were aborted.
    pub fn abort_all(&mut self) -> usize {
        let n = self.hosts.values_mut().map(Host::abort).filter(|&a| a).count();
        self.hosts.retain(|_, h| h.error().is_some());
        n
    }

    /// Aborts, evicts and forgets `key`, including its error and pin.
    pub fn release(&mut self, key: &K) -> Option<T> {
        if let Some(mut host) = self.hosts.remove(key) {
            host.reset();
        }
        self.resident.remove(key)
    }

    /// Releases every key matching `pred`, whether resident, loading or
    /// failed. Returns how many keys were dropped.
    pub fn release_where(&mut self, mut pred: impl FnMut(&K) -> bool) -> usize {
        let doomed: HashSet<K> = self
            .hosts
            .keys()
            .chain(self.resident.keys())
            .filter(|k| pred(*k))
            .cloned()
            .collect();
        for key in &doomed {
            self.release(key);
        }
        doomed.len()
    }

    /// Forgets every stored failure so those keys can be requested again.
    /// Returns how many were forgotten.
    pub fn clear_errors(&mut self) -> usize {
        let before = self.hosts.len();
        self.hosts.retain(|_, h| h.is_loading());
        before - self.hosts.len()
    }

    /// Pins a resident value so it is never evicted.
    pub fn lock(&mut self, key: &K) -> Result<(), PoolError> {
        self.resident.lock(key)
    }

    /// Drops the pin on `key`. The value becomes absent.
    pub fn unlock(&mut self, key: &K) -> Option<T> {
        self.resident.unlock(key)
    }

    /// Resident keys.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.resident.keys()
    }

    /// Aborts every load and drops every value and error.
    pub fn clear(&mut self) {
        for host in self.hosts.values_mut() {
            host.reset();
        }
        self.hosts.clear();
        self.resident.clear();
    }

    fn forget_idle(&mut self, key: &K) {
        if self
            .hosts
            .get(key)
            .is_some_and(|h| !h.is_loading() && h.error().is_none())
        {
            self.hosts.remove(key);
        }
    }
}
