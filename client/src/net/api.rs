//! REST API helpers for communicating with the server.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`, authenticated with
//! the Supabase access token.
//! Server-side (SSR): stubs returning errors since these endpoints are only
//! meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Sync failures come back as [`SyncError`] so the dashboard can show a
//! non-blocking warning and a retry button. Icon failures are already
//! user-facing strings.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use session::{ApplicationUserRecord, GeneratedIcon, SyncError};

const SYNC_ENDPOINT: &str = "/api/users/sync";
const ME_ENDPOINT: &str = "/api/users/me";
const ICONS_ENDPOINT: &str = "/api/icons";
const STYLE_ENDPOINT: &str = "/api/icons/style";

/// Client-side deadline for the sync request.
#[cfg(feature = "hydrate")]
const SYNC_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

#[cfg(any(test, feature = "hydrate"))]
fn sync_error_for_status(status: u16) -> SyncError {
    match status {
        401 | 403 => SyncError::Unauthorized,
        500..=599 => SyncError::Unreachable(format!("server error: {status}")),
        _ => SyncError::Rejected(format!("sync failed: {status}")),
    }
}

#[cfg(any(test, feature = "hydrate"))]
fn icon_error_message(status: u16) -> String {
    match status {
        400 => "Enter a prompt of at most 200 characters.".to_owned(),
        401 => "Your session expired. Log in again.".to_owned(),
        402 => "You are out of InkBucks.".to_owned(),
        413 => "The base image is too large to style.".to_owned(),
        404 => "Your account is still being set up. Try again in a moment.".to_owned(),
        502 => "The image service failed. Your InkBuck was refunded.".to_owned(),
        503 => "Icon generation is not available right now.".to_owned(),
        _ => format!("generation failed: {status}"),
    }
}

/// Ensure the caller's application user record exists via
/// `POST /api/users/sync`.
///
/// # Errors
///
/// Returns a [`SyncError`] if the request fails, times out, or the server
/// refuses it.
pub async fn sync_user(token: &str) -> Result<ApplicationUserRecord, SyncError> {
    #[cfg(feature = "hydrate")]
    {
        let request = async {
            let resp = gloo_net::http::Request::post(SYNC_ENDPOINT)
                .header("Authorization", &format!("Bearer {token}"))
                .send()
                .await
                .map_err(|e| SyncError::Unreachable(e.to_string()))?;
            if !resp.ok() {
                return Err(sync_error_for_status(resp.status()));
            }
            resp.json::<ApplicationUserRecord>()
                .await
                .map_err(|e| SyncError::Rejected(e.to_string()))
        };
        session::with_deadline(request, gloo_timers::future::sleep(SYNC_TIMEOUT))
            .await
            .unwrap_or(Err(SyncError::Timeout))
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (token, SYNC_ENDPOINT);
        Err(SyncError::Unreachable("not available on server".to_owned()))
    }
}

/// Fetch the caller's record from `GET /api/users/me`.
/// Returns `Ok(None)` when the record does not exist yet.
///
/// # Errors
///
/// Returns a [`SyncError`] if the request fails.
pub async fn fetch_me(token: &str) -> Result<Option<ApplicationUserRecord>, SyncError> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::get(ME_ENDPOINT)
            .header("Authorization", &format!("Bearer {token}"))
            .send()
            .await
            .map_err(|e| SyncError::Unreachable(e.to_string()))?;
        if resp.status() == 404 {
            return Ok(None);
        }
        if !resp.ok() {
            return Err(sync_error_for_status(resp.status()));
        }
        resp.json::<ApplicationUserRecord>()
            .await
            .map(Some)
            .map_err(|e| SyncError::Rejected(e.to_string()))
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (token, ME_ENDPOINT);
        Err(SyncError::Unreachable("not available on server".to_owned()))
    }
}

/// Generate one icon via `POST /api/icons`, spending one credit.
///
/// # Errors
///
/// Returns a user-facing message if generation fails.
pub async fn generate_icon(token: &str, prompt: &str) -> Result<GeneratedIcon, String> {
    post_icon(ICONS_ENDPOINT, token, serde_json::json!({ "prompt": prompt })).await
}

/// Restyle a subject after a base icon via `POST /api/icons/style`,
/// spending one credit.
///
/// # Errors
///
/// Returns a user-facing message if styling fails.
pub async fn style_icon(token: &str, prompt: &str, base: &GeneratedIcon) -> Result<GeneratedIcon, String> {
    let body = serde_json::json!({ "prompt": prompt, "image_base64": base.image_base64 });
    post_icon(STYLE_ENDPOINT, token, body).await
}

async fn post_icon(endpoint: &str, token: &str, body: serde_json::Value) -> Result<GeneratedIcon, String> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::post(endpoint)
            .header("Authorization", &format!("Bearer {token}"))
            .json(&body)
            .map_err(|e| e.to_string())?
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(icon_error_message(resp.status()));
        }
        resp.json::<GeneratedIcon>().await.map_err(|e| e.to_string())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (endpoint, token, body);
        Err("not available on server".to_owned())
    }
}
