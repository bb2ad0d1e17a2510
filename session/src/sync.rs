//! Backend sync: make sure every authenticated identity has exactly one
//! application user record.
//!
//! DESIGN
//! ======
//! `ensure_user` reads first so the common case (returning user) is a single
//! lookup. Creation goes through [`RecordStore::upsert_user`], which must be
//! atomic at the storage layer (a primary-key conflict keeps the existing
//! row). Two tabs racing the first login therefore both end up with the same
//! record and the starting balance is granted once.

#[cfg(test)]
#[path = "sync_test.rs"]
mod sync_test;

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::SyncError;
use crate::types::{ApplicationUserRecord, Identity, NewUserRecord};

/// Inkbucks granted to a brand-new user.
pub const STARTING_BALANCE: i32 = 5;

/// Persistence for application user records.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait RecordStore: Send + Sync {
    async fn get_user_by_id(&self, id: &str) -> Result<Option<ApplicationUserRecord>, SyncError>;

    /// Insert `record` unless a row with the same id exists; either way return
    /// the stored row. An existing row is never modified.
    async fn upsert_user(&self, record: NewUserRecord) -> Result<ApplicationUserRecord, SyncError>;
}

/// Idempotent "ensure user exists" over any [`RecordStore`].
pub struct BackendSync<S: ?Sized> {
    store: Arc<S>,
    starting_balance: i32,
}

impl<S: ?Sized> Clone for BackendSync<S> {
    fn clone(&self) -> Self {
        Self { store: Arc::clone(&self.store), starting_balance: self.starting_balance }
    }
}

impl<S: RecordStore + ?Sized> BackendSync<S> {
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store, starting_balance: STARTING_BALANCE }
    }

    #[must_use]
    pub fn with_starting_balance(mut self, balance: i32) -> Self {
        self.starting_balance = balance;
        self
    }

    #[must_use]
    pub fn starting_balance(&self) -> i32 {
        self.starting_balance
    }

    /// Return the record for `identity`, creating it on first sight.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidIdentity`] for an empty id, otherwise
    /// whatever the store reports.
    pub async fn ensure_user(&self, identity: &Identity) -> Result<ApplicationUserRecord, SyncError> {
        if identity.id.trim().is_empty() {
            return Err(SyncError::InvalidIdentity("empty user id".into()));
        }

        if let Some(existing) = self.store.get_user_by_id(&identity.id).await? {
            return Ok(existing);
        }

        let record = self
            .store
            .upsert_user(NewUserRecord::from_identity(identity, self.starting_balance))
            .await?;
        tracing::info!(user_id = %record.id, balance = record.balance, "user record ensured");
        Ok(record)
    }
}

// =============================================================================
// IN-MEMORY STORE
// =============================================================================

/// Process-local [`RecordStore`], used by tests and the server's route tests.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    users: Mutex<HashMap<String, ApplicationUserRecord>>,
    inserts: AtomicUsize,
}

impl InMemoryRecordStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.users.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of rows actually created.
    #[must_use]
    pub fn insert_count(&self) -> usize {
        self.inserts.load(Ordering::Relaxed)
    }

    /// Overwrite a user's balance. Returns `false` if the user is unknown.
    pub fn set_balance(&self, id: &str, balance: i32) -> bool {
        let mut users = self.users.lock().unwrap_or_else(PoisonError::into_inner);
        match users.get_mut(id) {
            Some(user) => {
                user.balance = balance;
                true
            }
            None => false,
        }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl RecordStore for InMemoryRecordStore {
    async fn get_user_by_id(&self, id: &str) -> Result<Option<ApplicationUserRecord>, SyncError> {
        let users = self.users.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(users.get(id).cloned())
    }

    async fn upsert_user(&self, record: NewUserRecord) -> Result<ApplicationUserRecord, SyncError> {
        let mut users = self.users.lock().unwrap_or_else(PoisonError::into_inner);
        match users.entry(record.id.clone()) {
            Entry::Occupied(existing) => Ok(existing.get().clone()),
            Entry::Vacant(slot) => {
                self.inserts.fetch_add(1, Ordering::Relaxed);
                let stored = ApplicationUserRecord {
                    id: record.id,
                    email: record.email,
                    display_name: record.display_name,
                    balance: record.balance,
                    created_at: now_ms(),
                };
                Ok(slot.insert(stored).clone())
            }
        }
    }
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
}
