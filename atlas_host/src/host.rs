// Copyright 2025 the Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A single resource binding with at most one load in flight.

use core::fmt;
use core::future::Future;
use core::sync::atomic::{AtomicU64, Ordering};

use futures::future::{AbortHandle, AbortRegistration, Abortable, Aborted};

use crate::error::LoadError;

/// Identifies one load attempt. Unique within the process, so a completion
/// can never be mistaken for a later attempt on a recreated host.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadId(u64);

impl LoadId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// How a load attempt ended.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadOutcome<T> {
    /// The resource is ready.
    Loaded(T),
    /// The loader failed; the error is stored on the host.
    Failed(LoadError),
    /// The abort signal fired first; nothing changes.
    Aborted,
}

/// The result of [`LoadTicket::run`], to be handed back to
/// [`Host::settle`].
#[derive(Clone, Debug, PartialEq)]
pub struct Completion<T> {
    /// Attempt this completion belongs to.
    pub id: LoadId,
    /// How it ended.
    pub outcome: LoadOutcome<T>,
}

/// Permission to run one load, issued by [`Host::begin_load`].
pub struct LoadTicket {
    id: LoadId,
    registration: AbortRegistration,
}

impl fmt::Debug for LoadTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadTicket")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl LoadTicket {
    /// Attempt id.
    #[must_use]
    pub fn id(&self) -> LoadId {
        self.id
    }

    /// Drives `load` until it resolves or the host aborts it.
    ///
    /// Abortion is observed at the future's suspension points; a loader that
    /// never yields cannot be interrupted, but its result is still discarded
    /// by [`Host::settle`].
    pub async fn run<T, F>(self, load: F) -> Completion<T>
    where
        F: Future<Output = Result<T, LoadError>>,
    {
        let outcome = match Abortable::new(load, self.registration).await {
            Ok(Ok(value)) => LoadOutcome::Loaded(value),
            Ok(Err(err)) => LoadOutcome::Failed(err),
            Err(Aborted) => LoadOutcome::Aborted,
        };
        Completion {
            id: self.id,
            outcome,
        }
    }
}

/// A resource binding: `{ loading, element, error, abort }`.
///
/// A host owns at most one in-flight load. While loading, further
/// [`Host::begin_load`] calls return `None` instead of starting a duplicate.
/// A completion is committed only if it belongs to the current attempt, so a
/// load that resolves after [`Host::abort`] (or after a newer attempt began)
/// is dropped.
pub struct Host<T> {
    element: Option<T>,
    error: Option<LoadError>,
    in_flight: Option<(LoadId, AbortHandle)>,
}

impl<T> fmt::Debug for Host<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host")
            .field("loading", &self.is_loading())
            .field("has_element", &self.element.is_some())
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<T> Default for Host<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Host<T> {
    /// An empty, idle host.
    #[must_use]
    pub fn new() -> Self {
        Self {
            element: None,
            error: None,
            in_flight: None,
        }
    }

    /// Returns `true` while a load is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// The loaded resource.
    #[must_use]
    pub fn element(&self) -> Option<&T> {
        self.element.as_ref()
    }

    /// Removes and returns the loaded resource.
    pub fn take_element(&mut self) -> Option<T> {
        self.element.take()
    }

    /// Error of the last failed attempt.
    #[must_use]
    pub fn error(&self) -> Option<&LoadError> {
        self.error.as_ref()
    }

    /// Id of the in-flight attempt.
    #[must_use]
    pub fn current_load(&self) -> Option<LoadId> {
        self.in_flight.as_ref().map(|(id, _)| *id)
    }

    /// Starts a load attempt and clears the previous error.
    ///
    /// Returns `None` while another attempt is in flight.
    pub fn begin_load(&mut self) -> Option<LoadTicket> {
        if self.in_flight.is_some() {
            return None;
        }
        let id = LoadId::next();
        let (handle, registration) = AbortHandle::new_pair();
        self.in_flight = Some((id, handle));
        self.error = None;
        tracing::debug!(load = id.0, "load started");
        Some(LoadTicket { id, registration })
    }

    /// Commits a completion. Returns `false` if it was stale and dropped.
    pub fn settle(&mut self, completion: Completion<T>) -> bool {
        if self.current_load() != Some(completion.id) {
            tracing::debug!(load = completion.id.0, "stale completion dropped");
            return false;
        }
        self.in_flight = None;
        match completion.outcome {
            LoadOutcome::Loaded(value) => {
                tracing::debug!(load = completion.id.0, "load settled");
                self.element = Some(value);
                self.error = None;
            }
            LoadOutcome::Failed(err) => {
                tracing::warn!(load = completion.id.0, error = %err, "load failed");
                self.error = Some(err);
            }
            LoadOutcome::Aborted => {
                tracing::debug!(load = completion.id.0, "load aborted");
            }
        }
        true
    }

    /// Fires the abort signal of the in-flight attempt, if any.
    ///
    /// The host is idle afterwards; the attempt's completion will be dropped.
    pub fn abort(&mut self) -> bool {
        let Some((id, handle)) = self.in_flight.take() else {
            return false;
        };
        handle.abort();
        tracing::debug!(load = id.0, "abort requested");
        true
    }

    /// Aborts any load and forgets the element and error.
    pub fn reset(&mut self) {
        self.abort();
        self.element = None;
        self.error = None;
    }
}
