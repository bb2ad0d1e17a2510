mod config;
mod db;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use client::app::PublicConfig;

use crate::config::{ImageConfig, ServerConfig, SupabaseConfig};
use crate::services::identity::{IdentityVerifier, SupabaseVerifier};
use crate::services::image::{ImageGenerator, StabilityClient};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = ServerConfig::from_env().expect("server configuration");
    let pool = db::init_pool(&config.database_url)
        .await
        .expect("database init failed");

    // Token verification (non-fatal: authenticated API disabled if config missing).
    let supabase = SupabaseConfig::from_env();
    let verifier: Option<Arc<dyn IdentityVerifier>> = match supabase.as_ref().map(SupabaseVerifier::new) {
        Some(Ok(verifier)) => Some(Arc::new(verifier)),
        Some(Err(e)) => {
            tracing::warn!(error = %e, "supabase verifier failed to build; authenticated API disabled");
            None
        }
        None => {
            tracing::warn!("SUPABASE_URL/SUPABASE_ANON_KEY not set; authenticated API disabled");
            None
        }
    };

    // Image API client (non-fatal: icon generation disabled if config missing).
    let images: Option<Arc<dyn ImageGenerator>> =
        match ImageConfig::from_env().map_err(|e| e.to_string()).and_then(|c| {
            StabilityClient::from_config(c).map_err(|e| e.to_string())
        }) {
            Ok(client) => {
                tracing::info!(model = client.model(), "image client initialized");
                Some(Arc::new(client))
            }
            Err(e) => {
                tracing::warn!(error = %e, "image client not configured; icon generation disabled");
                None
            }
        };

    let public = supabase
        .map(|s| PublicConfig { supabase_url: s.url, supabase_anon_key: s.anon_key })
        .unwrap_or_default();

    let state = state::AppState::new(pool, verifier, images, public);
    let app = routes::leptos_app(state).expect("leptos app");

    let port = config.port;
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "inkblink listening");
    axum::serve(listener, app).await.expect("server failed");
}
