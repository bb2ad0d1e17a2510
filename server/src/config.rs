//! Server configuration parsed from environment variables.
//!
//! `.env` is loaded by `main` through `dotenvy` before any of these run, so
//! every value can come from either the process environment or the file.

use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_AUTH_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_STABILITY_BASE_URL: &str = "https://api.stability.ai";
pub const DEFAULT_STABILITY_MODEL: &str = "sd3.5-large-turbo";
pub const DEFAULT_STABILITY_OUTPUT_FORMAT: &str = "jpeg";
pub const DEFAULT_IMAGE_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_IMAGE_CONNECT_TIMEOUT_SECS: u64 = 10;

const OUTPUT_FORMATS: &[&str] = &["jpeg", "png", "webp"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env var {var}")]
    Missing { var: String },
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: String, value: String },
}

// =============================================================================
// SERVER
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub database_url: String,
    pub port: u16,
}

impl ServerConfig {
    /// Required: `DATABASE_URL`. Optional: `PORT` (default 3000).
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is unset or `PORT` is not a port.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = required("DATABASE_URL")?;
        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { var: "PORT".into(), value: raw })?,
            Err(_) => DEFAULT_PORT,
        };
        Ok(Self { database_url, port })
    }
}

// =============================================================================
// SUPABASE
// =============================================================================

/// Identity provider settings shared by token verification and the HTML shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
    pub request_timeout: Duration,
}

impl SupabaseConfig {
    /// Load from `SUPABASE_URL` and `SUPABASE_ANON_KEY`.
    /// Returns `None` if either is missing (authenticated API disabled).
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let url = non_empty("SUPABASE_URL")?.trim_end_matches('/').to_string();
        let anon_key = non_empty("SUPABASE_ANON_KEY")?;
        let request_timeout =
            Duration::from_secs(env_parse_u64("AUTH_REQUEST_TIMEOUT_SECS", DEFAULT_AUTH_REQUEST_TIMEOUT_SECS));
        Some(Self { url, anon_key, request_timeout })
    }
}

// =============================================================================
// IMAGE GENERATION
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub output_format: String,
    pub timeouts: ImageTimeouts,
}

impl ImageConfig {
    /// Build typed image-API config from environment variables.
    ///
    /// Required:
    /// - `STABILITY_API_KEY`
    ///
    /// Optional:
    /// - `STABILITY_BASE_URL`: default `https://api.stability.ai`
    /// - `STABILITY_MODEL`: default `sd3.5-large-turbo`
    /// - `STABILITY_OUTPUT_FORMAT`: `jpeg` (default), `png` or `webp`
    /// - `IMAGE_REQUEST_TIMEOUT_SECS`: default 60
    /// - `IMAGE_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if the key is missing or the output format is unknown.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = non_empty("STABILITY_API_KEY").ok_or_else(|| ConfigError::Missing {
            var: "STABILITY_API_KEY".into(),
        })?;
        let base_url = std::env::var("STABILITY_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_STABILITY_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let model = std::env::var("STABILITY_MODEL").unwrap_or_else(|_| DEFAULT_STABILITY_MODEL.to_string());
        let output_format = parse_output_format(std::env::var("STABILITY_OUTPUT_FORMAT").ok().as_deref())?;
        let timeouts = ImageTimeouts {
            request_secs: env_parse_u64("IMAGE_REQUEST_TIMEOUT_SECS", DEFAULT_IMAGE_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("IMAGE_CONNECT_TIMEOUT_SECS", DEFAULT_IMAGE_CONNECT_TIMEOUT_SECS),
        };

        Ok(Self { api_key, base_url, model, output_format, timeouts })
    }
}

fn parse_output_format(raw: Option<&str>) -> Result<String, ConfigError> {
    let format = raw
        .unwrap_or(DEFAULT_STABILITY_OUTPUT_FORMAT)
        .trim()
        .to_ascii_lowercase();
    if OUTPUT_FORMATS.contains(&format.as_str()) {
        Ok(format)
    } else {
        Err(ConfigError::Invalid { var: "STABILITY_OUTPUT_FORMAT".into(), value: format })
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn required(key: &str) -> Result<String, ConfigError> {
    non_empty(key).ok_or_else(|| ConfigError::Missing { var: key.into() })
}

fn non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

pub(crate) fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
