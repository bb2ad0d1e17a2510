//! Session context for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! The root `App` owns one [`SessionContext`] and provides it by context.
//! The framework-agnostic [`SessionStore`] is the source of truth; `state` is
//! a reactive mirror of it for views. `sync` tracks the backend user-record
//! sync that runs whenever a new identity signs in.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::Arc;

use leptos::prelude::*;
use session::{ApplicationUserRecord, Identity, SessionState, SessionStore, SyncError};

use crate::net::supabase::SupabaseAuth;

/// Progress of the backend user-record sync for the signed-in identity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SyncStatus {
    #[default]
    Idle,
    Syncing,
    Synced(ApplicationUserRecord),
    Failed(SyncError),
}

impl SyncStatus {
    #[must_use]
    pub fn record(&self) -> Option<&ApplicationUserRecord> {
        match self {
            Self::Synced(record) => Some(record),
            _ => None,
        }
    }

    #[must_use]
    pub fn balance(&self) -> Option<i32> {
        self.record().map(|r| r.balance)
    }

    /// Warning text for the non-blocking sync banner, if any.
    #[must_use]
    pub fn warning(&self) -> Option<String> {
        match self {
            Self::Failed(SyncError::Unauthorized) => {
                Some("Your session expired. Log in again to load your account.".to_owned())
            }
            Self::Failed(e) => Some(format!("We couldn't load your account: {e}")),
            _ => None,
        }
    }
}

/// Which identity has been synced during this page session.
///
/// A sync starts at most once per identity; token refreshes for the same
/// identity do not trigger another one. Signing out forgets everything so
/// the next sign-in syncs again.
#[derive(Clone, Debug, Default)]
pub struct SyncTracker {
    synced: Option<String>,
    in_flight: Option<String>,
}

impl SyncTracker {
    /// Identity to sync now, given the latest session state.
    pub fn next(&mut self, state: &SessionState) -> Option<Identity> {
        let Some(identity) = state.identity() else {
            if !state.is_loading() {
                *self = Self::default();
            }
            return None;
        };
        let id = Some(&identity.id);
        if self.synced.as_ref() == id || self.in_flight.as_ref() == id {
            return None;
        }
        self.in_flight = Some(identity.id.clone());
        Some(identity.clone())
    }

    /// Record the outcome of a sync started by [`Self::next`].
    ///
    /// Returns `false` when `id` is no longer the sync in flight (the user
    /// signed out or switched accounts meanwhile); its result must be dropped.
    pub fn finish(&mut self, id: &str, succeeded: bool) -> bool {
        if self.in_flight.as_deref() != Some(id) {
            return false;
        }
        self.in_flight = None;
        if succeeded {
            self.synced = Some(id.to_owned());
        }
        true
    }

    /// Forget a completed sync so [`Self::next`] runs it again.
    pub fn reset_completed(&mut self) {
        self.synced = None;
    }

    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }
}

/// Root-owned session handle shared through context.
#[derive(Clone)]
pub struct SessionContext {
    pub store: SessionStore,
    pub state: RwSignal<SessionState>,
    pub auth: Arc<SupabaseAuth>,
    pub sync: RwSignal<SyncStatus>,
    tracker: StoredValue<SyncTracker>,
}

impl SessionContext {
    #[must_use]
    pub fn new(auth: Arc<SupabaseAuth>) -> Self {
        let store = SessionStore::new();
        let state = RwSignal::new(store.get_state());
        Self {
            store,
            state,
            auth,
            sync: RwSignal::new(SyncStatus::Idle),
            tracker: StoredValue::new(SyncTracker::default()),
        }
    }

    /// Start a backend sync if `state` carries an identity not yet synced.
    pub fn on_session_change(&self, state: &SessionState) {
        let mut next = None;
        self.tracker.update_value(|tracker| next = tracker.next(state));
        if state.identity().is_none() && !state.is_loading() {
            self.sync.set(SyncStatus::Idle);
        }
        if let Some(identity) = next {
            self.run_sync(identity);
        }
    }

    /// Manual retry from the sync warning banner.
    pub fn retry_sync(&self) {
        self.tracker.update_value(SyncTracker::reset_completed);
        self.on_session_change(&self.state.get_untracked());
    }

    /// Reload the signed-in user's record (`GET /api/users/me`) so the
    /// balance reflects spending from other tabs or devices.
    pub fn refresh_record(&self) {
        if self.tracker.with_value(SyncTracker::is_in_flight) {
            return;
        }
        #[cfg(feature = "hydrate")]
        {
            let auth = Arc::clone(&self.auth);
            let state = self.state;
            let sync = self.sync;
            let tracker = self.tracker;
            leptos::task::spawn_local(async move {
                let token = match auth.access_token().await {
                    Ok(Some(token)) => token,
                    Ok(None) => return,
                    Err(e) => {
                        log::debug!("record refresh skipped: {e}");
                        return;
                    }
                };
                match crate::net::api::fetch_me(&token).await {
                    Ok(Some(record)) => {
                        if tracker.with_value(SyncTracker::is_in_flight) {
                            return;
                        }
                        if let Some(status) = refreshed_status(&state.get_untracked(), record) {
                            sync.set(status);
                        }
                    }
                    Ok(None) => log::debug!("record refresh: no record yet"),
                    Err(e) => log::debug!("record refresh failed: {e}"),
                }
            });
        }
    }

    /// Sign out locally and at the provider; the store follows via the
    /// provider's change notification.
    pub fn sign_out(&self) {
        #[cfg(feature = "hydrate")]
        {
            use session::AuthProvider;

            let auth = Arc::clone(&self.auth);
            leptos::task::spawn_local(async move {
                if let Err(e) = auth.sign_out().await {
                    log::warn!("sign out failed: {e}");
                }
            });
        }
    }

    fn run_sync(&self, identity: Identity) {
        self.sync.set(SyncStatus::Syncing);
        #[cfg(feature = "hydrate")]
        {
            let auth = Arc::clone(&self.auth);
            let sync = self.sync;
            let tracker = self.tracker;
            leptos::task::spawn_local(async move {
                let result = sync_with_token(&auth).await;
                let mut current = false;
                tracker.update_value(|t| current = t.finish(&identity.id, result.is_ok()));
                if !current {
                    log::debug!("dropping sync result for signed-out identity {}", identity.id);
                    return;
                }
                match result {
                    Ok(record) => {
                        log::info!("user record synced (balance {})", record.balance);
                        sync.set(SyncStatus::Synced(record));
                    }
                    Err(e) => {
                        log::warn!("user record sync failed: {e}");
                        sync.set(SyncStatus::Failed(e));
                    }
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = identity;
        }
    }
}

#[cfg(any(test, feature = "hydrate"))]
/// Status to show for a freshly fetched record, or `None` when it belongs to
/// an identity that is no longer signed in.
pub(crate) fn refreshed_status(state: &SessionState, record: ApplicationUserRecord) -> Option<SyncStatus> {
    let identity = state.identity()?;
    (identity.id == record.id).then(|| SyncStatus::Synced(record))
}

#[cfg(feature = "hydrate")]
async fn sync_with_token(auth: &SupabaseAuth) -> Result<ApplicationUserRecord, SyncError> {
    let token = match auth.access_token().await {
        Ok(Some(token)) => token,
        Ok(None) => return Err(SyncError::Unauthorized),
        Err(e) if e.retryable() => return Err(SyncError::Unreachable(e.to_string())),
        Err(_) => return Err(SyncError::Unauthorized),
    };
    crate::net::api::sync_user(&token).await
}
