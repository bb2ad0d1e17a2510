//! Icon generation workflow: spend, generate, refund on failure, log.
//!
//! Styling follows the same flow with a previously generated icon as the
//! style reference.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use session::GeneratedIcon;

use super::credits::{CreditError, CreditLedger};
use super::image::{GeneratedImage, ImageError, ImageGenerator};

pub const MAX_PROMPT_CHARS: usize = 200;

/// Largest decoded style reference accepted.
pub const MAX_SOURCE_IMAGE_BYTES: usize = 4 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum IconError {
    #[error("prompt is empty")]
    EmptyPrompt,
    #[error("prompt is longer than {MAX_PROMPT_CHARS} characters")]
    PromptTooLong,
    #[error("source image is missing or not valid base64")]
    InvalidSourceImage,
    #[error("source image is larger than {MAX_SOURCE_IMAGE_BYTES} bytes")]
    SourceImageTooLarge,
    #[error(transparent)]
    Credit(#[from] CreditError),
    #[error(transparent)]
    Image(#[from] ImageError),
}

/// Trim and bound-check a user prompt.
///
/// # Errors
///
/// Returns an error if the prompt is blank or too long.
pub fn validate_prompt(raw: &str) -> Result<&str, IconError> {
    let prompt = raw.trim();
    if prompt.is_empty() {
        return Err(IconError::EmptyPrompt);
    }
    if prompt.chars().count() > MAX_PROMPT_CHARS {
        return Err(IconError::PromptTooLong);
    }
    Ok(prompt)
}

/// Generate one icon for `user_id`, charging one credit.
///
/// The credit is taken before calling the image API and given back if the
/// call fails, so the balance never goes negative under concurrent requests.
///
/// # Errors
///
/// Returns an error for invalid prompts, an empty balance, or a failed image
/// request (after refunding).
pub async fn generate_icon(
    ledger: &dyn CreditLedger,
    images: &dyn ImageGenerator,
    user_id: &str,
    raw_prompt: &str,
) -> Result<GeneratedIcon, IconError> {
    let prompt = validate_prompt(raw_prompt)?;
    charge_and_render(ledger, images, user_id, prompt, images.generate(prompt)).await
}

/// Decode a base64 style reference and bound its size.
///
/// # Errors
///
/// Returns an error if the payload is empty, not base64, or too large.
pub fn decode_source_image(encoded: &str) -> Result<Vec<u8>, IconError> {
    let encoded = encoded.trim();
    if encoded.len() > MAX_SOURCE_IMAGE_BYTES.div_ceil(3) * 4 {
        return Err(IconError::SourceImageTooLarge);
    }
    let bytes = STANDARD.decode(encoded).map_err(|_| IconError::InvalidSourceImage)?;
    if bytes.is_empty() {
        return Err(IconError::InvalidSourceImage);
    }
    if bytes.len() > MAX_SOURCE_IMAGE_BYTES {
        return Err(IconError::SourceImageTooLarge);
    }
    Ok(bytes)
}

/// Restyle a subject after a base icon, charging one credit.
///
/// # Errors
///
/// Returns an error for invalid prompts or source images, an empty balance,
/// or a failed image request (after refunding).
pub async fn style_icon(
    ledger: &dyn CreditLedger,
    images: &dyn ImageGenerator,
    user_id: &str,
    raw_prompt: &str,
    source_base64: &str,
) -> Result<GeneratedIcon, IconError> {
    let prompt = validate_prompt(raw_prompt)?;
    let source = decode_source_image(source_base64)?;
    charge_and_render(ledger, images, user_id, prompt, images.stylize(&source, prompt)).await
}

async fn charge_and_render(
    ledger: &dyn CreditLedger,
    images: &dyn ImageGenerator,
    user_id: &str,
    prompt: &str,
    render: impl std::future::Future<Output = Result<GeneratedImage, ImageError>>,
) -> Result<GeneratedIcon, IconError> {
    let balance = ledger.spend(user_id).await?;

    let image = match render.await {
        Ok(image) => image,
        Err(e) => {
            tracing::error!(error = %e, %user_id, model = images.model(), "image request failed; refunding credit");
            if let Err(refund_err) = ledger.refund(user_id).await {
                tracing::error!(error = %refund_err, %user_id, "credit refund failed");
            }
            return Err(e.into());
        }
    };

    match ledger.record_icon(user_id, prompt, &image.format).await {
        Ok(icon_id) => tracing::info!(%icon_id, %user_id, balance, "icon generated"),
        Err(e) => tracing::warn!(error = %e, %user_id, "icon log write failed"),
    }

    Ok(GeneratedIcon {
        prompt: prompt.to_owned(),
        format: image.format,
        image_base64: STANDARD.encode(&image.bytes),
        balance,
    })
}

#[cfg(test)]
#[path = "icons_test.rs"]
mod tests;
