//! Bearer-token authentication for API routes.

use axum::extract::FromRef;
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use session::Identity;

use crate::services::identity::IdentityError;
use crate::state::AppState;

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Authenticated caller, resolved from `Authorization: Bearer <token>`.
/// Use as a handler parameter to require authentication.
pub struct AuthUser {
    pub identity: Identity,
}

impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        let token = bearer_token(header).ok_or(StatusCode::UNAUTHORIZED)?;

        let app_state = AppState::from_ref(state);
        let Some(verifier) = app_state.verifier.as_ref() else {
            return Err(StatusCode::SERVICE_UNAVAILABLE);
        };

        let identity = verifier.verify(token).await.map_err(|e| {
            if !matches!(e, IdentityError::Unauthorized) {
                tracing::warn!(error = %e, "access token verification failed");
            }
            identity_error_to_status(&e)
        })?;

        Ok(Self { identity })
    }
}

/// Extract the token from an `Authorization` header value.
pub(crate) fn bearer_token(header: Option<&str>) -> Option<&str> {
    let (scheme, token) = header?.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() { None } else { Some(token) }
}

pub(crate) fn identity_error_to_status(err: &IdentityError) -> StatusCode {
    match err {
        IdentityError::Unauthorized => StatusCode::UNAUTHORIZED,
        IdentityError::Request(_) | IdentityError::Upstream { .. } | IdentityError::Parse(_) => {
            StatusCode::BAD_GATEWAY
        }
        IdentityError::HttpClientBuild(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
