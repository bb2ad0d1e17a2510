//! Icon generation through the Stability AI stable-image API.
//!
//! DESIGN
//! ======
//! Handlers only see the [`ImageGenerator`] trait so the external API can be
//! mocked in tests. The user's prompt is never sent as-is: it is wrapped in a
//! fixed template that pins the house style (single-weight black ink on a
//! white square).

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::config::ImageConfig;

const GENERATE_PATH: &str = "/v2beta/stable-image/generate/sd3";
const STYLE_PATH: &str = "/v2beta/stable-image/control/style";

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
    #[error("image API request failed: {0}")]
    ApiRequest(String),
    #[error("image API response error: status {status}: {message}")]
    ApiResponse { status: u16, message: String },
    #[error("image API returned an empty body")]
    EmptyImage,
}

impl ImageError {
    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::ApiRequest(_) | Self::ApiResponse { status: 429 | 500..=599, .. })
    }
}

/// Raw image bytes plus the format they are encoded in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub format: String,
}

#[async_trait::async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Render one icon for a user-supplied subject.
    async fn generate(&self, subject: &str) -> Result<GeneratedImage, ImageError>;

    /// Re-render a subject using `source` as the style reference.
    async fn stylize(&self, source: &[u8], subject: &str) -> Result<GeneratedImage, ImageError>;

    /// Model identifier, for logs.
    fn model(&self) -> &str;
}

/// Wrap a subject in the house icon style.
#[must_use]
pub fn icon_prompt(subject: &str) -> String {
    let subject = subject.trim();
    format!(
        "Generate a minimalist icon for {subject}. Draw the {subject} using simple geometric shapes \
         (circles, squares, triangles, or lines) with a flowy feel, as if sketched by a v5 ink pen. \
         Center the {subject} symmetrically on a solid white square canvas, using only solid black. \
         Ensure the {subject} is bold, simple, and recognizable, avoiding gradients and complexity."
    )
}

// =============================================================================
// STABILITY CLIENT
// =============================================================================

pub struct StabilityClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    output_format: String,
}

impl StabilityClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: ImageConfig) -> Result<Self, ImageError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ImageError::HttpClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            api_key: config.api_key,
            base_url: config.base_url,
            model: config.model,
            output_format: config.output_format,
        })
    }

    async fn post_form(&self, path: &str, form: Form) -> Result<GeneratedImage, ImageError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, "image/*")
            .multipart(form)
            .send()
            .await
            .map_err(|e| ImageError::ApiRequest(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(ImageError::ApiResponse { status, message: summarize_error_body(&body) });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ImageError::ApiRequest(e.to_string()))?;
        if bytes.is_empty() {
            return Err(ImageError::EmptyImage);
        }
        Ok(GeneratedImage { bytes: bytes.to_vec(), format: self.output_format.clone() })
    }
}

#[async_trait::async_trait]
impl ImageGenerator for StabilityClient {
    async fn generate(&self, subject: &str) -> Result<GeneratedImage, ImageError> {
        let form = Form::new()
            .text("prompt", icon_prompt(subject))
            .text("output_format", self.output_format.clone())
            .text("model", self.model.clone());
        self.post_form(GENERATE_PATH, form).await
    }

    async fn stylize(&self, source: &[u8], subject: &str) -> Result<GeneratedImage, ImageError> {
        let image = Part::bytes(source.to_vec()).file_name("source");
        let form = Form::new()
            .part("image", image)
            .text("prompt", icon_prompt(subject))
            .text("output_format", self.output_format.clone());
        self.post_form(STYLE_PATH, form).await
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    errors: Vec<String>,
}

/// Condense the API's JSON error body into one line for logs.
pub(crate) fn summarize_error_body(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) if !parsed.errors.is_empty() => parsed.errors.join("; "),
        Ok(ApiErrorBody { name: Some(name), .. }) => name,
        _ => body.chars().take(200).collect(),
    }
}

#[cfg(test)]
#[path = "image_test.rs"]
mod tests;
