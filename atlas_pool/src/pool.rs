// Copyright 2025 the Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;
use core::fmt;
use core::hash::Hash;

use hashbrown::HashMap;

/// Errors returned by [`ResourcePool`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// The key is not present, so it cannot be pinned.
    #[error("resource not found in pool")]
    NotFound,
    /// A pool needs at least one slot.
    #[error("pool capacity must be at least one")]
    ZeroCapacity,
}

/// Fixed-capacity associative pool with FIFO ring eviction and pinning.
///
/// A key maps to at most one place: a ring slot, the pinned table, or
/// nowhere (absent). See the [crate docs](crate) for the eviction policy.
pub struct ResourcePool<K, V> {
    slots: Vec<Option<(K, V)>>,
    index: HashMap<K, usize>,
    locked: HashMap<K, V>,
    cursor: usize,
}

impl<K, V> fmt::Debug for ResourcePool<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourcePool")
            .field("capacity", &self.slots.len())
            .field("live", &self.index.len())
            .field("locked", &self.locked.len())
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

impl<K, V> ResourcePool<K, V>
where
    K: Clone + Eq + Hash,
{
    /// Creates a pool with `capacity` ring slots.
    pub fn new(capacity: usize) -> Result<Self, PoolError> {
        if capacity == 0 {
            return Err(PoolError::ZeroCapacity);
        }
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Ok(Self {
            slots,
            index: HashMap::with_capacity(capacity),
            locked: HashMap::new(),
            cursor: 0,
        })
    }

    /// Number of ring slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of retrievable entries (ring plus pinned).
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len() + self.locked.len()
    }

    /// Returns `true` if nothing is retrievable.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of pinned entries.
    #[must_use]
    pub fn locked_len(&self) -> usize {
        self.locked.len()
    }

    /// Returns `true` if `key` is retrievable.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.locked.contains_key(key) || self.index.contains_key(key)
    }

    /// Returns `true` if `key` is pinned.
    #[must_use]
    pub fn is_locked(&self, key: &K) -> bool {
        self.locked.contains_key(key)
    }

    /// Stores `value` under `key` at the ring cursor.
    ///
    /// Whatever key owned the cursor slot is evicted and returned. If `key`
    /// already owned another ring slot, that slot is vacated first. If `key`
    /// is pinned, the pinned value is replaced in place and the ring is left
    /// untouched.
    pub fn set(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(pinned) = self.locked.get_mut(&key) {
            *pinned = value;
            return None;
        }
        let (slot, evicted) = self.claim_cursor(&key);
        self.slots[slot] = Some((key, value));
        evicted
    }

    /// Returns the value for `key`: pinned first, then the ring.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        if let Some(v) = self.locked.get(key) {
            return Some(v);
        }
        let slot = *self.index.get(key)?;
        self.slots[slot].as_ref().map(|(_, v)| v)
    }

    /// Returns the value for `key`, producing and storing it on a miss.
    ///
    /// `fallback` runs at most once and only when `key` is absent; the
    /// produced value goes through [`ResourcePool::set`] and may evict.
    pub fn get_or_insert_with(&mut self, key: K, fallback: impl FnOnce() -> V) -> &V {
        if self.locked.contains_key(&key) {
            return &self.locked[&key];
        }
        let slot = match self.index.get(&key) {
            Some(&slot) => slot,
            None => {
                let (slot, _evicted) = self.claim_cursor(&key);
                self.slots[slot] = Some((key, fallback()));
                slot
            }
        };
        // Every indexed slot is occupied.
        &self.slots[slot].as_ref().expect("dangling pool index").1
    }

    /// Pins `key` so it is never evicted.
    ///
    /// Fails with [`PoolError::NotFound`] if the key is absent. Pinning an
    /// already pinned key is a no-op.
    pub fn lock(&mut self, key: &K) -> Result<(), PoolError> {
        if self.locked.contains_key(key) {
            return Ok(());
        }
        let slot = self.index.remove(key).ok_or(PoolError::NotFound)?;
        let (k, v) = self.slots[slot].take().ok_or(PoolError::NotFound)?;
        self.locked.insert(k, v);
        Ok(())
    }

    /// Drops the pin on `key`, returning the formerly pinned value.
    ///
    /// The key becomes absent. Unlocking a key that is not pinned is a no-op
    /// and returns `None`.
    pub fn unlock(&mut self, key: &K) -> Option<V> {
        self.locked.remove(key)
    }

    /// Drops every pin. All formerly pinned keys become absent.
    pub fn unlock_all(&mut self) {
        self.locked.clear();
    }

    /// Removes `key` from wherever it lives.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        if let Some(v) = self.locked.remove(key) {
            return Some(v);
        }
        let slot = self.index.remove(key)?;
        self.slots[slot].take().map(|(_, v)| v)
    }

    /// Removes everything and rewinds the cursor.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
        self.index.clear();
        self.locked.clear();
        self.cursor = 0;
    }

    /// Iterates over all retrievable keys (pinned first, then ring order).
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.locked
            .keys()
            .chain(self.slots.iter().filter_map(|s| s.as_ref().map(|(k, _)| k)))
    }

    /// Vacates any slot `key` already owns, evicts the cursor slot, records
    /// `key` at the cursor and advances it. Returns the slot to fill.
    fn claim_cursor(&mut self, key: &K) -> (usize, Option<(K, V)>) {
        if let Some(old) = self.index.remove(key) {
            self.slots[old] = None;
        }
        let slot = self.cursor;
        let evicted = self.slots[slot].take();
        if let Some((old_key, _)) = &evicted {
            self.index.remove(old_key);
        }
        self.index.insert(key.clone(), slot);
        self.cursor = (self.cursor + 1) % self.slots.len();
        (slot, evicted)
    }
}
