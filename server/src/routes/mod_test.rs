use super::*;
use crate::state::test_helpers::{self, ALICE_TOKEN};

/// Serve the API router on an ephemeral port and return its base URL.
async fn spawn_api(state: AppState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, api_routes(state)).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn healthz_is_ok() {
    assert_eq!(healthz().await, StatusCode::OK);
}

#[tokio::test]
async fn api_requires_bearer_token() {
    let (state, _) = test_helpers::memory_app_state(None);
    let base = spawn_api(state).await;

    let resp = reqwest::get(format!("{base}/api/users/me")).await.unwrap();
    assert_eq!(resp.status().as_u16(), 401);

    let resp = reqwest::get(format!("{base}/healthz")).await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
}

#[tokio::test]
async fn sync_then_me_over_http() {
    let (state, _) = test_helpers::memory_app_state(None);
    let base = spawn_api(state).await;
    let http = reqwest::Client::new();

    let synced: session::ApplicationUserRecord = http
        .post(format!("{base}/api/users/sync"))
        .bearer_auth(ALICE_TOKEN)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(synced.balance, 5);

    let me: session::ApplicationUserRecord = http
        .get(format!("{base}/api/users/me"))
        .bearer_auth(ALICE_TOKEN)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(me, synced);
}

#[tokio::test]
async fn icons_route_rejects_malformed_body() {
    let (state, _) = test_helpers::memory_app_state(None);
    let base = spawn_api(state).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/api/icons"))
        .bearer_auth(ALICE_TOKEN)
        .header("content-type", "application/json")
        .body("{\"subject\":1}")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 422);
}

#[tokio::test]
async fn style_route_accepts_bodies_above_the_default_limit() {
    use base64::Engine as _;
    use std::sync::Arc;

    let (state, _) = test_helpers::memory_app_state(Some(Arc::new(test_helpers::MockImages { fail: false })));
    let base = spawn_api(state).await;
    let http = reqwest::Client::new();

    http.post(format!("{base}/api/users/sync"))
        .bearer_auth(ALICE_TOKEN)
        .send()
        .await
        .unwrap();

    let source = base64::engine::general_purpose::STANDARD.encode(vec![7u8; 3 * 1024 * 1024]);
    let resp = http
        .post(format!("{base}/api/icons/style"))
        .bearer_auth(ALICE_TOKEN)
        .json(&serde_json::json!({ "prompt": "owl", "image_base64": source }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let icon: session::GeneratedIcon = resp.json().await.unwrap();
    assert_eq!(icon.balance, 4);
    assert_eq!(icon.format, "webp");
}
