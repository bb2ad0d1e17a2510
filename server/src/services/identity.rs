//! Access-token verification against the Supabase auth server.
//!
//! SYSTEM CONTEXT
//! ==============
//! The browser signs in with Supabase directly and sends the resulting
//! access token as a bearer token. The server never sees passwords; it asks
//! Supabase who the token belongs to (`GET /auth/v1/user`) and trusts the
//! answer for the lifetime of one request.

use session::{Identity, SupabaseUser};

use crate::config::SupabaseConfig;

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("access token rejected")]
    Unauthorized,
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
    #[error("auth server request failed: {0}")]
    Request(String),
    #[error("auth server error: status {status}")]
    Upstream { status: u16 },
    #[error("auth server response parse failed: {0}")]
    Parse(String),
}

#[async_trait::async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Resolve a bearer access token to the identity it was issued for.
    async fn verify(&self, access_token: &str) -> Result<Identity, IdentityError>;
}

pub struct SupabaseVerifier {
    http: reqwest::Client,
    url: String,
    anon_key: String,
}

impl SupabaseVerifier {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &SupabaseConfig) -> Result<Self, IdentityError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.request_timeout)
            .build()
            .map_err(|e| IdentityError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, url: config.url.clone(), anon_key: config.anon_key.clone() })
    }
}

#[async_trait::async_trait]
impl IdentityVerifier for SupabaseVerifier {
    async fn verify(&self, access_token: &str) -> Result<Identity, IdentityError> {
        let response = self
            .http
            .get(format!("{}/auth/v1/user", self.url))
            .bearer_auth(access_token)
            .header("apikey", &self.anon_key)
            .send()
            .await
            .map_err(|e| IdentityError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        match status {
            200 => {}
            401 | 403 => return Err(IdentityError::Unauthorized),
            _ => return Err(IdentityError::Upstream { status }),
        }

        let body = response
            .text()
            .await
            .map_err(|e| IdentityError::Request(e.to_string()))?;
        identity_from_user_json(&body)
    }
}

/// Map a `GET /auth/v1/user` body to an [`Identity`].
pub(crate) fn identity_from_user_json(body: &str) -> Result<Identity, IdentityError> {
    let user: SupabaseUser = serde_json::from_str(body).map_err(|e| IdentityError::Parse(e.to_string()))?;
    if user.id.is_empty() {
        return Err(IdentityError::Parse("user id is empty".into()));
    }
    Ok(user.into_identity())
}

#[cfg(test)]
#[path = "identity_test.rs"]
mod tests;
