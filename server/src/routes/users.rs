//! Application user record routes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use session::{ApplicationUserRecord, SyncError};

use super::auth::AuthUser;
use crate::state::AppState;

/// `POST /api/users/sync`: ensure the caller's record exists and return it.
///
/// Idempotent: repeated calls never create a second record or reset the
/// balance.
pub async fn sync_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApplicationUserRecord>, StatusCode> {
    state
        .sync
        .ensure_user(&auth.identity)
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!(error = %e, user_id = %auth.identity.id, "user sync failed");
            sync_error_to_status(&e)
        })
}

/// `GET /api/users/me`: the caller's record, or 404 before the first sync.
pub async fn me(State(state): State<AppState>, auth: AuthUser) -> Result<Json<ApplicationUserRecord>, StatusCode> {
    state
        .records
        .get_user_by_id(&auth.identity.id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id = %auth.identity.id, "user lookup failed");
            sync_error_to_status(&e)
        })?
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

pub(crate) fn sync_error_to_status(err: &SyncError) -> StatusCode {
    match err {
        SyncError::InvalidIdentity(_) => StatusCode::BAD_REQUEST,
        SyncError::Unauthorized => StatusCode::UNAUTHORIZED,
        SyncError::Unreachable(_) | SyncError::Timeout => StatusCode::SERVICE_UNAVAILABLE,
        SyncError::Rejected(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
#[path = "users_test.rs"]
mod tests;
