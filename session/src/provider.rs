//! Identity-provider capability interface.
//!
//! The session store, subscriber and route guard only talk to this trait, so
//! the concrete provider (Supabase GoTrue in the browser, a mock in tests) can
//! be swapped without touching them.
//!
//! In the browser HTTP futures are `!Send`, so the trait drops the `Send`
//! bound on `wasm32` and keeps it everywhere else.

use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::listeners::{Listener, Subscription};
use crate::types::{AuthEvent, Identity};

/// Third-party OAuth identity sources offered on the signup page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OAuthProvider {
    Google,
    Github,
}

impl OAuthProvider {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Github => "github",
        }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait AuthProvider: Send + Sync {
    /// Current session, if any. `Ok(None)` means nobody is signed in.
    async fn get_session(&self) -> Result<Option<Identity>, AuthError>;

    /// Register a listener for every future sign-in, sign-out and refresh.
    fn on_change(&self, listener: Listener<AuthEvent>) -> Subscription;

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    async fn sign_up(&self, email: &str, password: &str, display_name: Option<&str>) -> Result<Identity, AuthError>;

    /// Start an OAuth redirect flow; returns the URL the browser must visit.
    async fn sign_in_with_oauth(&self, provider: OAuthProvider) -> Result<String, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;
}
