//! Session and route-guard core shared by `client` and `server`.
//!
//! This crate owns who-is-logged-in state for the browser app and the
//! exactly-once creation of the application user record. It has no UI or
//! HTTP dependencies so it compiles both natively and to `wasm32`; the
//! concrete identity provider and record store are plugged in through the
//! [`AuthProvider`] and [`RecordStore`] traits.
//!
//! ARCHITECTURE
//! ============
//! - [`SessionStore`]: single source of truth, `{get_state, subscribe}`.
//! - [`SessionSubscriber`]: the only writer; bridges provider notifications
//!   into the store.
//! - [`RouteGuard`]: pure render/redirect decision over a [`SessionState`].
//! - [`BackendSync`]: idempotent user-record upsert keyed by identity id.

pub mod deadline;
pub mod error;
pub mod guard;
pub mod listeners;
pub mod provider;
pub mod store;
pub mod subscriber;
pub mod sync;
pub mod types;

pub use deadline::with_deadline;
pub use error::{AuthError, SyncError};
pub use guard::{AccessPolicy, GuardConfig, GuardConfigError, GuardDecision, RedirectLatch, RouteGuard};
pub use listeners::{Listener, Listeners, Subscription};
pub use provider::{AuthProvider, OAuthProvider};
pub use store::SessionStore;
pub use subscriber::{DEFAULT_SESSION_TIMEOUT, SessionSubscriber};
pub use sync::{BackendSync, InMemoryRecordStore, RecordStore, STARTING_BALANCE};
pub use types::{
    ApplicationUserRecord, AuthEvent, AuthEventKind, GeneratedIcon, Identity, NewUserRecord, SessionState, SupabaseUser,
    UserMetadata,
};
