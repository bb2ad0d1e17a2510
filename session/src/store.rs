//! Session store: the single source of truth for "who is logged in".
//!
//! DESIGN
//! ======
//! The store is an explicit object owned by the root component and handed to
//! consumers through context. Reads are synchronous snapshots; consumers that
//! need to re-render subscribe and are called on every applied transition.
//! Only [`crate::SessionSubscriber`] writes, hence `set_state` is crate-private.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::listeners::{Listeners, Subscription};
use crate::types::SessionState;

#[derive(Default)]
struct Snapshot {
    state: SessionState,
    revision: u64,
}

struct Inner {
    snapshot: Mutex<Snapshot>,
    listeners: Listeners<SessionState>,
}

/// Clonable handle to the shared session state.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = self.snapshot();
        f.debug_struct("SessionStore")
            .field("state", &snapshot.state)
            .field("revision", &snapshot.revision)
            .finish()
    }
}

impl SessionStore {
    /// Create a store in the `Uninitialized` state.
    #[must_use]
    pub fn new() -> Self {
        Self { inner: Arc::new(Inner { snapshot: Mutex::new(Snapshot::default()), listeners: Listeners::new() }) }
    }

    fn snapshot(&self) -> MutexGuard<'_, Snapshot> {
        self.inner
            .snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Current state. Never blocks on provider I/O.
    #[must_use]
    pub fn get_state(&self) -> SessionState {
        self.snapshot().state.clone()
    }

    /// Number of transitions applied so far; `0` means still loading.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.snapshot().revision
    }

    /// Call `listener` after every applied transition.
    #[must_use = "dropping the subscription immediately unregisters the listener"]
    pub fn subscribe(&self, listener: impl Fn(&SessionState) + Send + Sync + 'static) -> Subscription {
        self.inner.listeners.register(Arc::new(listener))
    }

    /// Apply a transition and notify subscribers.
    ///
    /// Returns `false` when the transition is refused: once the first provider
    /// callback has landed the store never goes back to `Uninitialized`.
    pub(crate) fn set_state(&self, next: SessionState) -> bool {
        {
            let mut snapshot = self.snapshot();
            if next.is_loading() && snapshot.revision > 0 {
                tracing::warn!(revision = snapshot.revision, "refusing to move session back to uninitialized");
                return false;
            }
            snapshot.state = next.clone();
            snapshot.revision += 1;
        }
        self.inner.listeners.emit(&next);
        true
    }
}
