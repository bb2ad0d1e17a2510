//! Supabase GoTrue implementation of [`AuthProvider`].
//!
//! SYSTEM CONTEXT
//! ==============
//! The browser talks to the Supabase auth server directly over its REST API
//! (`/auth/v1/*`). The resulting session (access + refresh token) is kept in
//! memory and mirrored to `localStorage` so a reload stays signed in. Every
//! sign-in, sign-out and refresh is announced to registered listeners, which
//! is how the session subscriber learns about it.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): every request fails with `AuthError::NotAvailable`; the
//! subscriber is never mounted during SSR, so nothing calls them there.
//!
//! TRADE-OFFS
//! ==========
//! OAuth uses the implicit flow: the provider redirects back with tokens in
//! the URL fragment, which `get_session` consumes and then strips from the
//! address bar. This avoids a PKCE verifier round-trip through storage.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "supabase_test.rs"]
mod supabase_test;

use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use session::{
    AuthError, AuthEvent, AuthProvider, Identity, Listener, Listeners, OAuthProvider, Subscription, SupabaseUser,
};

use crate::util::storage;

const STORAGE_KEY: &str = "inkblink.auth.session";
/// Where OAuth sign-ins land after the provider redirect.
pub const OAUTH_RETURN_PATH: &str = "/dashboard";
/// Refresh this many seconds before the access token actually expires.
const EXPIRY_MARGIN_SECS: i64 = 30;
#[cfg(feature = "hydrate")]
const AUTH_REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

// =============================================================================
// CONFIG + SESSION
// =============================================================================

/// Project URL and public anon key, injected by the server into the shell.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SupabaseClientConfig {
    pub url: String,
    pub anon_key: String,
}

impl SupabaseClientConfig {
    #[must_use]
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self { url: url.into().trim_end_matches('/').to_owned(), anon_key: anon_key.into() }
    }

    /// Read `<meta name="supabase-url">` / `<meta name="supabase-anon-key">`.
    #[must_use]
    pub fn from_document() -> Self {
        let url = crate::util::browser::meta_content("supabase-url").unwrap_or_default();
        let anon_key = crate::util::browser::meta_content("supabase-anon-key").unwrap_or_default();
        Self::new(url, anon_key)
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty() && !self.anon_key.is_empty()
    }
}

/// Tokens and identity of the signed-in browser user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSession {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix seconds.
    pub expires_at: i64,
    pub identity: Identity,
}

impl ProviderSession {
    #[must_use]
    pub fn needs_refresh(&self, now_secs: i64) -> bool {
        self.expires_at.saturating_sub(EXPIRY_MARGIN_SECS) <= now_secs
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: SupabaseUser,
}

#[derive(Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Default GoTrue access-token lifetime when the response omits it.
const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

/// Absolute expiry: `expires_at` if given, else `now + expires_in`.
pub(crate) fn expiry_from(now_secs: i64, expires_at: Option<i64>, expires_in: Option<i64>) -> i64 {
    expires_at.unwrap_or_else(|| now_secs.saturating_add(expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS)))
}

pub(crate) fn session_from_token_response(body: &str, now_secs: i64) -> Result<ProviderSession, AuthError> {
    let token: TokenResponse =
        serde_json::from_str(body).map_err(|e| AuthError::Rejected(format!("unexpected auth response: {e}")))?;
    let expires_at = expiry_from(now_secs, token.expires_at, token.expires_in);
    Ok(ProviderSession {
        access_token: token.access_token,
        refresh_token: token.refresh_token,
        expires_at,
        identity: token.user.into_identity(),
    })
}

/// A signup either signs the user in (tokens present) or, when the project
/// requires email confirmation, only returns the new user.
pub(crate) fn session_from_signup_response(body: &str, now_secs: i64) -> Result<Option<ProviderSession>, AuthError> {
    if let Ok(session) = session_from_token_response(body, now_secs) {
        return Ok(Some(session));
    }
    serde_json::from_str::<SupabaseUser>(body)
        .map(|_| None)
        .map_err(|e| AuthError::Rejected(format!("unexpected auth response: {e}")))
}

pub(crate) fn identity_from_user_response(body: &str) -> Result<Identity, AuthError> {
    serde_json::from_str::<SupabaseUser>(body)
        .map(SupabaseUser::into_identity)
        .map_err(|e| AuthError::Rejected(format!("unexpected auth response: {e}")))
}

/// Classify a non-2xx GoTrue response.
pub(crate) fn auth_error_from_response(status: u16, body: &str) -> AuthError {
    if status >= 500 {
        return AuthError::Unavailable { status };
    }
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let invalid_credentials = parsed.error.as_deref() == Some("invalid_grant")
        || parsed.error_code.as_deref() == Some("invalid_credentials");
    if invalid_credentials {
        return AuthError::InvalidCredentials;
    }
    let message = parsed
        .msg
        .or(parsed.error_description)
        .or(parsed.message)
        .or(parsed.error)
        .unwrap_or_else(|| format!("auth request failed: {status}"));
    AuthError::Rejected(message)
}

// =============================================================================
// OAUTH REDIRECTS
// =============================================================================

/// Tokens handed back in the URL fragment after an OAuth redirect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FragmentTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: Option<i64>,
    pub expires_at: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OAuthRedirect {
    Tokens(FragmentTokens),
    Failed(String),
}

/// Parse `#access_token=…&refresh_token=…` (or `#error=…`) from a URL
/// fragment. Returns `None` for fragments unrelated to auth.
#[must_use]
pub fn parse_oauth_fragment(fragment: &str) -> Option<OAuthRedirect> {
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
    let mut access_token = None;
    let mut refresh_token = None;
    let mut expires_in = None;
    let mut expires_at = None;
    let mut error = None;
    let mut error_description = None;

    for pair in fragment.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let value = decode_fragment_value(value);
        match key {
            "access_token" => access_token = Some(value),
            "refresh_token" => refresh_token = Some(value),
            "expires_in" => expires_in = value.parse().ok(),
            "expires_at" => expires_at = value.parse().ok(),
            "error" => error = Some(value),
            "error_description" => error_description = Some(value),
            _ => {}
        }
    }

    if let Some(error) = error {
        return Some(OAuthRedirect::Failed(error_description.unwrap_or(error)));
    }
    match (access_token, refresh_token) {
        (Some(access_token), Some(refresh_token)) if !access_token.is_empty() => {
            Some(OAuthRedirect::Tokens(FragmentTokens { access_token, refresh_token, expires_in, expires_at }))
        }
        _ => None,
    }
}

/// `GET /auth/v1/authorize` URL that starts an OAuth sign-in.
#[must_use]
pub fn authorize_url(base_url: &str, provider: OAuthProvider, redirect_to: &str) -> String {
    format!(
        "{base_url}/auth/v1/authorize?provider={}&redirect_to={}",
        provider.as_str(),
        urlencoding::encode(redirect_to)
    )
}

/// Fragment values use form encoding: `+` is a space, bad escapes are kept.
fn decode_fragment_value(raw: &str) -> String {
    let raw = raw.replace('+', " ");
    String::from_utf8_lossy(&urlencoding::decode_binary(raw.as_bytes())).into_owned()
}

// =============================================================================
// PROVIDER
// =============================================================================

pub struct SupabaseAuth {
    config: SupabaseClientConfig,
    current: Mutex<Option<ProviderSession>>,
    listeners: Listeners<AuthEvent>,
}

impl SupabaseAuth {
    #[must_use]
    pub fn new(config: SupabaseClientConfig) -> Self {
        Self { config, current: Mutex::new(None), listeners: Listeners::new() }
    }

    #[must_use]
    pub fn config(&self) -> &SupabaseClientConfig {
        &self.config
    }

    /// A valid access token for API calls, refreshing it if it is about to
    /// expire. `Ok(None)` means nobody is signed in.
    ///
    /// # Errors
    ///
    /// Returns an error if a needed refresh fails.
    pub async fn access_token(&self) -> Result<Option<String>, AuthError> {
        let Some(session) = self.current_session() else {
            return Ok(None);
        };
        if !session.needs_refresh(now_secs()) {
            return Ok(Some(session.access_token));
        }
        let refreshed = self.refresh(&session.refresh_token).await?;
        Ok(Some(refreshed.access_token))
    }

    fn current_session(&self) -> Option<ProviderSession> {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if current.is_none() {
            *current = load_persisted();
        }
        current.clone()
    }

    fn store_session(&self, session: Option<ProviderSession>) {
        persist(session.as_ref());
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = session;
    }

    async fn refresh(&self, refresh_token: &str) -> Result<ProviderSession, AuthError> {
        let body = serde_json::json!({ "refresh_token": refresh_token });
        let (status, text) = self
            .send(HttpMethod::Post, "/auth/v1/token?grant_type=refresh_token", None, Some(&body))
            .await?;
        if !(200..300).contains(&status) {
            return Err(auth_error_from_response(status, &text));
        }
        let session = session_from_token_response(&text, now_secs())?;
        self.store_session(Some(session.clone()));
        self.listeners
            .emit(&AuthEvent::token_refreshed(session.identity.clone()));
        Ok(session)
    }

    /// Complete an OAuth redirect if the current URL carries one.
    async fn complete_oauth_redirect(&self) -> Option<Identity> {
        let redirect = parse_oauth_fragment(&crate::util::browser::take_auth_fragment()?)?;
        let tokens = match redirect {
            OAuthRedirect::Tokens(tokens) => tokens,
            OAuthRedirect::Failed(reason) => {
                tracing_warn(&format!("oauth sign-in failed: {reason}"));
                return None;
            }
        };
        let identity = match self
            .send(HttpMethod::Get, "/auth/v1/user", Some(tokens.access_token.as_str()), None)
            .await
        {
            Ok((200, text)) => identity_from_user_response(&text).ok()?,
            Ok((status, text)) => {
                tracing_warn(&format!("oauth user lookup failed: {}", auth_error_from_response(status, &text)));
                return None;
            }
            Err(e) => {
                tracing_warn(&format!("oauth user lookup failed: {e}"));
                return None;
            }
        };
        let expires_at = expiry_from(now_secs(), tokens.expires_at, tokens.expires_in);
        self.store_session(Some(ProviderSession {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_at,
            identity: identity.clone(),
        }));
        Some(identity)
    }

    async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        bearer: Option<&str>,
        body: Option<&serde_json::Value>,
    ) -> Result<(u16, String), AuthError> {
        if !self.config.is_configured() {
            return Err(AuthError::NotAvailable("auth is not configured".to_owned()));
        }
        #[cfg(feature = "hydrate")]
        {
            use gloo_net::http::Request;

            let url = format!("{}{path}", self.config.url);
            let mut builder = match method {
                HttpMethod::Get => Request::get(&url),
                HttpMethod::Post => Request::post(&url),
            }
            .header("apikey", &self.config.anon_key);
            if let Some(token) = bearer {
                builder = builder.header("Authorization", &format!("Bearer {token}"));
            }
            let request = async move {
                let response = match body {
                    Some(body) => builder
                        .json(body)
                        .map_err(|e| AuthError::Network(e.to_string()))?
                        .send()
                        .await,
                    None => builder.send().await,
                }
                .map_err(|e| AuthError::Network(e.to_string()))?;
                let status = response.status();
                let text = response
                    .text()
                    .await
                    .map_err(|e| AuthError::Network(e.to_string()))?;
                Ok::<_, AuthError>((status, text))
            };
            session::with_deadline(request, gloo_timers::future::sleep(AUTH_REQUEST_TIMEOUT))
                .await
                .unwrap_or(Err(AuthError::Timeout))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (method, path, bearer, body);
            Err(AuthError::NotAvailable("auth requests run in the browser".to_owned()))
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum HttpMethod {
    Get,
    Post,
}

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl AuthProvider for SupabaseAuth {
    async fn get_session(&self) -> Result<Option<Identity>, AuthError> {
        if let Some(identity) = self.complete_oauth_redirect().await {
            return Ok(Some(identity));
        }

        let Some(session) = self.current_session() else {
            return Ok(None);
        };
        if !session.needs_refresh(now_secs()) {
            return Ok(Some(session.identity));
        }

        match self.refresh(&session.refresh_token).await {
            Ok(refreshed) => Ok(Some(refreshed.identity)),
            Err(e) if e.retryable() => Err(e),
            Err(e) => {
                tracing_warn(&format!("stored session could not be refreshed: {e}"));
                self.store_session(None);
                Ok(None)
            }
        }
    }

    fn on_change(&self, listener: Listener<AuthEvent>) -> Subscription {
        self.listeners.register(listener)
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let body = serde_json::json!({ "email": email, "password": password });
        let (status, text) = self
            .send(HttpMethod::Post, "/auth/v1/token?grant_type=password", None, Some(&body))
            .await?;
        if !(200..300).contains(&status) {
            return Err(auth_error_from_response(status, &text));
        }
        let session = session_from_token_response(&text, now_secs())?;
        let identity = session.identity.clone();
        self.store_session(Some(session));
        self.listeners.emit(&AuthEvent::signed_in(identity.clone()));
        Ok(identity)
    }

    async fn sign_up(&self, email: &str, password: &str, display_name: Option<&str>) -> Result<Identity, AuthError> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "data": { "display_name": display_name.unwrap_or_default() },
        });
        let (status, text) = self
            .send(HttpMethod::Post, "/auth/v1/signup", None, Some(&body))
            .await?;
        if !(200..300).contains(&status) {
            return Err(auth_error_from_response(status, &text));
        }
        let Some(session) = session_from_signup_response(&text, now_secs())? else {
            return Err(AuthError::Rejected("Check your inbox to confirm your email, then log in.".to_owned()));
        };
        let identity = session.identity.clone();
        self.store_session(Some(session));
        self.listeners.emit(&AuthEvent::signed_in(identity.clone()));
        Ok(identity)
    }

    async fn sign_in_with_oauth(&self, provider: OAuthProvider) -> Result<String, AuthError> {
        if !self.config.is_configured() {
            return Err(AuthError::NotAvailable("auth is not configured".to_owned()));
        }
        let origin = crate::util::browser::origin().unwrap_or_default();
        Ok(authorize_url(&self.config.url, provider, &format!("{origin}{OAUTH_RETURN_PATH}")))
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let previous = self.current_session();
        self.store_session(None);
        self.listeners.emit(&AuthEvent::signed_out());

        // Server-side revocation is best-effort; the local session is gone either way.
        if let Some(previous) = previous {
            if let Err(e) = self
                .send(HttpMethod::Post, "/auth/v1/logout", Some(previous.access_token.as_str()), None)
                .await
            {
                tracing_warn(&format!("logout request failed: {e}"));
            }
        }
        Ok(())
    }
}

// =============================================================================
// BROWSER GLUE
// =============================================================================

fn load_persisted() -> Option<ProviderSession> {
    storage::load_json(STORAGE_KEY)
}

fn persist(session: Option<&ProviderSession>) {
    match session {
        Some(session) => storage::save_json(STORAGE_KEY, session),
        None => storage::remove(STORAGE_KEY),
    }
}

fn tracing_warn(message: &str) {
    #[cfg(feature = "hydrate")]
    tracing::warn!("{message}");
    #[cfg(not(feature = "hydrate"))]
    let _ = message;
}

#[allow(clippy::cast_possible_truncation)]
fn now_secs() -> i64 {
    #[cfg(feature = "hydrate")]
    {
        (js_sys::Date::now() / 1000.0) as i64
    }
    #[cfg(not(feature = "hydrate"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |d| d.as_secs() as i64)
    }
}
