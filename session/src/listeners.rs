//! Observer registry used by the session store and by auth providers.
//!
//! Listeners are invoked outside the registry lock, so a listener may
//! register or drop subscriptions while it runs.

#[cfg(test)]
#[path = "listeners_test.rs"]
mod listeners_test;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Callback invoked with every emitted value.
pub type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Registry<T> {
    next_id: AtomicU64,
    entries: Mutex<Vec<(u64, Listener<T>)>>,
}

fn lock<V>(mutex: &Mutex<V>) -> MutexGuard<'_, V> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Shared, clonable set of listeners for values of type `T`.
pub struct Listeners<T> {
    inner: Arc<Registry<T>>,
}

impl<T> Clone for Listeners<T> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<T: 'static> Default for Listeners<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Listeners<T> {
    #[must_use]
    pub fn new() -> Self {
        Self { inner: Arc::new(Registry { next_id: AtomicU64::new(0), entries: Mutex::new(Vec::new()) }) }
    }

    /// Add a listener. It stays registered until the returned handle drops.
    #[must_use = "dropping the subscription immediately unregisters the listener"]
    pub fn register(&self, listener: Listener<T>) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.inner.entries).push((id, listener));

        let registry = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(registry) = registry.upgrade() {
                lock(&registry.entries).retain(|(entry_id, _)| *entry_id != id);
            }
        })
    }

    /// Invoke every registered listener, in registration order.
    pub fn emit(&self, value: &T) {
        let snapshot: Vec<Listener<T>> = lock(&self.inner.entries)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in snapshot {
            listener(value);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.inner.entries).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Handle returned by [`Listeners::register`]; unregisters on drop.
pub struct Subscription {
    detach: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    fn new(detach: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self { detach: Some(Box::new(detach)) }
    }

    /// A handle that is not attached to anything.
    #[must_use]
    pub fn detached() -> Self {
        Self { detach: None }
    }

    /// Explicitly release the listener.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("attached", &self.detach.is_some())
            .finish()
    }
}
