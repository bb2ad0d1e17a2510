//! Session subscriber: bridges the provider's notification channel into the
//! session store.
//!
//! LIFECYCLE
//! =========
//! `mount` registers the change listener immediately and hands back the
//! initial "current session" fetch as a future for the caller to spawn on its
//! executor. Whichever of the two completes last wins; no ordering is enforced
//! between them. `unmount` (or drop) flips the shared `alive` flag and releases
//! the listener, so a fetch that resolves afterwards is discarded.

#[cfg(test)]
#[path = "subscriber_test.rs"]
mod subscriber_test;

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::deadline::with_deadline;
use crate::error::AuthError;
use crate::listeners::Subscription;
use crate::provider::AuthProvider;
use crate::store::SessionStore;
use crate::types::{AuthEvent, SessionState};

/// Client-side deadline for the initial session fetch.
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(10);

/// A mounted bridge between one provider and one store.
#[derive(Debug)]
pub struct SessionSubscriber {
    alive: Arc<AtomicBool>,
    listener: Option<Subscription>,
}

impl SessionSubscriber {
    /// Register the change listener and build the initial session fetch.
    ///
    /// The returned future must be spawned (or awaited) by the caller. It
    /// gives up when `timer` completes first, leaving the viewer anonymous.
    pub fn mount<T>(
        provider: Arc<dyn AuthProvider>,
        store: SessionStore,
        timer: T,
    ) -> (Self, impl Future<Output = ()>)
    where
        T: Future<Output = ()>,
    {
        let alive = Arc::new(AtomicBool::new(true));

        let listener_alive = Arc::clone(&alive);
        let listener_store = store.clone();
        let listener = provider.on_change(Arc::new(move |event: &AuthEvent| {
            if !listener_alive.load(Ordering::Acquire) {
                return;
            }
            tracing::debug!(kind = ?event.kind, "auth state changed");
            listener_store.set_state(event.to_state());
        }));

        let fetch_alive = Arc::clone(&alive);
        let initial_fetch = async move {
            let next = match with_deadline(provider.get_session(), timer).await {
                Some(Ok(identity)) => SessionState::from_identity(identity),
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "initial session fetch failed; continuing as anonymous");
                    SessionState::Anonymous
                }
                None => {
                    tracing::warn!(error = %AuthError::Timeout, "initial session fetch gave up; continuing as anonymous");
                    SessionState::Anonymous
                }
            };
            if fetch_alive.load(Ordering::Acquire) {
                store.set_state(next);
            } else {
                tracing::debug!("subscriber unmounted before initial session resolved");
            }
        };

        (Self { alive, listener: Some(listener) }, initial_fetch)
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Stop applying provider results and release the listener.
    pub fn unmount(mut self) {
        self.detach();
    }

    fn detach(&mut self) {
        self.alive.store(false, Ordering::Release);
        if let Some(listener) = self.listener.take() {
            listener.unsubscribe();
        }
    }
}

impl Drop for SessionSubscriber {
    fn drop(&mut self) {
        self.detach();
    }
}
