// Copyright 2025 the Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-object listener registry.

use alloc::boxed::Box;
use core::fmt;

use atlas_world::{EventMask, ObjectId, World, WorldError};
use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::dispatcher;
use crate::types::{AtlasEvent, Dispatch, EventKind, Phase};

/// Boxed listener callback. `C` is the embedder's mutable context.
pub type Listener<C> = Box<dyn FnMut(&mut C, &mut AtlasEvent)>;

/// Handle returned by [`ListenerRegistry::add_listener`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

struct Entry<C> {
    id: ListenerId,
    kind: EventKind,
    capture: bool,
    callback: Listener<C>,
}

/// Listeners keyed by object and event kind.
///
/// Adding or removing a listener rewrites the object's listened
/// [`EventMask`] in the world, which is what makes the object a hit-test
/// candidate for that kind.
pub struct ListenerRegistry<C> {
    next: u64,
    by_object: HashMap<ObjectId, SmallVec<[Entry<C>; 2]>>,
    owners: HashMap<ListenerId, ObjectId>,
}

impl<C> fmt::Debug for ListenerRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("objects", &self.by_object.len())
            .field("listeners", &self.owners.len())
            .finish_non_exhaustive()
    }
}

impl<C> Default for ListenerRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> ListenerRegistry<C> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next: 1,
            by_object: HashMap::new(),
            owners: HashMap::new(),
        }
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    /// Returns `true` if no listeners are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    /// Number of listeners on `object`.
    #[must_use]
    pub fn listener_count(&self, object: ObjectId) -> usize {
        self.by_object.get(&object).map_or(0, SmallVec::len)
    }

    /// Union of the kinds `object` listens for.
    #[must_use]
    pub fn mask_for(&self, object: ObjectId) -> EventMask {
        self.by_object
            .get(&object)
            .map(|entries| {
                entries
                    .iter()
                    .fold(EventMask::empty(), |m, e| m | e.kind.mask())
            })
            .unwrap_or_default()
    }

    /// Registers `callback` for `kind` events on `object`.
    ///
    /// Capture listeners run while the event travels toward the target;
    /// the others run while it bubbles back. Both run at the target.
    pub fn add_listener(
        &mut self,
        world: &mut World,
        object: ObjectId,
        kind: EventKind,
        capture: bool,
        callback: impl FnMut(&mut C, &mut AtlasEvent) + 'static,
    ) -> Result<ListenerId, WorldError> {
        if !world.is_alive(object) {
            return Err(WorldError::UnknownObject(object));
        }
        let id = ListenerId(self.next);
        self.next += 1;
        self.by_object.entry(object).or_default().push(Entry {
            id,
            kind,
            capture,
            callback: Box::new(callback),
        });
        self.owners.insert(id, object);
        world.set_listening(object, self.mask_for(object));
        Ok(id)
    }

    /// Removes one listener. Returns `false` if it was already gone.
    pub fn remove_listener(&mut self, world: &mut World, id: ListenerId) -> bool {
        let Some(object) = self.owners.remove(&id) else {
            return false;
        };
        if let Some(entries) = self.by_object.get_mut(&object) {
            entries.retain(|e| e.id != id);
            if entries.is_empty() {
                self.by_object.remove(&object);
            }
        }
        world.set_listening(object, self.mask_for(object));
        true
    }

    /// Drops every listener on `object`. Returns how many were removed.
    ///
    /// Call this for ids returned by [`World::remove`] and
    /// [`World::remove_child`].
    pub fn clear_object(&mut self, object: ObjectId) -> usize {
        let Some(entries) = self.by_object.remove(&object) else {
            return 0;
        };
        for e in &entries {
            self.owners.remove(&e.id);
        }
        entries.len()
    }

    /// Drops listeners whose objects are no longer alive.
    pub fn prune(&mut self, world: &World) -> usize {
        let dead: SmallVec<[ObjectId; 8]> = self
            .by_object
            .keys()
            .copied()
            .filter(|o| !world.is_alive(*o))
            .collect();
        dead.into_iter().map(|o| self.clear_object(o)).sum()
    }

    /// Runs matching listeners over `seq`.
    ///
    /// Every listener on a node runs even if one of them stops propagation;
    /// the stop takes effect before the next node. Returns `true` when a
    /// listener consumed the event.
    pub fn dispatch(
        &mut self,
        ctx: &mut C,
        seq: &[Dispatch<ObjectId>],
        event: &mut AtlasEvent,
    ) -> bool {
        let by_object = &mut self.by_object;
        dispatcher::run(seq, event, |d, ev| {
            ev.phase = d.phase;
            ev.current = d.node;
            if let Some(entries) = by_object.get_mut(&d.node) {
                for e in entries.iter_mut() {
                    let wants = match d.phase {
                        Phase::Capture => e.capture,
                        Phase::Target => true,
                        Phase::Bubble => !e.capture,
                    };
                    if e.kind == ev.kind && wants {
                        (e.callback)(ctx, ev);
                    }
                }
            }
            ev.outcome()
        })
    }
}
