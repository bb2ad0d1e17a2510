//! Icon generation and styling routes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use session::GeneratedIcon;

use super::auth::AuthUser;
use crate::services::credits::CreditError;
use crate::services::icons::{self, IconError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateIconRequest {
    pub prompt: String,
}

#[derive(Debug, Deserialize)]
pub struct StyleIconRequest {
    pub prompt: String,
    pub image_base64: String,
}

/// `POST /api/icons`: spend one credit and generate an icon.
pub async fn generate(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<GenerateIconRequest>,
) -> Result<Json<GeneratedIcon>, StatusCode> {
    let Some(images) = state.images.as_deref() else {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };

    icons::generate_icon(state.ledger.as_ref(), images, &auth.identity.id, &body.prompt)
        .await
        .map(Json)
        .map_err(|e| icon_error_to_status(&e))
}

/// `POST /api/icons/style`: spend one credit and restyle a base icon.
pub async fn style(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<StyleIconRequest>,
) -> Result<Json<GeneratedIcon>, StatusCode> {
    let Some(images) = state.images.as_deref() else {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };

    icons::style_icon(state.ledger.as_ref(), images, &auth.identity.id, &body.prompt, &body.image_base64)
        .await
        .map(Json)
        .map_err(|e| icon_error_to_status(&e))
}

pub(crate) fn icon_error_to_status(err: &IconError) -> StatusCode {
    match err {
        IconError::EmptyPrompt | IconError::PromptTooLong | IconError::InvalidSourceImage => {
            StatusCode::BAD_REQUEST
        }
        IconError::SourceImageTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        IconError::Credit(CreditError::Insufficient) => StatusCode::PAYMENT_REQUIRED,
        IconError::Credit(CreditError::UnknownUser(_)) => StatusCode::NOT_FOUND,
        IconError::Credit(CreditError::Db(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        IconError::Image(_) => StatusCode::BAD_GATEWAY,
    }
}

#[cfg(test)]
#[path = "icons_test.rs"]
mod tests;
