use super::*;
use std::time::Duration;

#[test]
fn parses_email_signup_user() {
    let body = r#"{
        "id": "u1",
        "aud": "authenticated",
        "email": "a@b.com",
        "user_metadata": {"display_name": "Alice"}
    }"#;
    let identity = identity_from_user_json(body).unwrap();
    assert_eq!(identity, Identity::new("u1", "a@b.com").with_display_name("Alice"));
}

#[test]
fn oauth_profile_name_is_used_when_no_display_name() {
    let body = r#"{"id":"u2","email":"g@b.com","user_metadata":{"full_name":"Grace Hopper","name":"grace"}}"#;
    let identity = identity_from_user_json(body).unwrap();
    assert_eq!(identity.display_name.as_deref(), Some("Grace Hopper"));
}

#[test]
fn missing_metadata_leaves_display_name_empty() {
    let identity = identity_from_user_json(r#"{"id":"u3","email":"c@b.com"}"#).unwrap();
    assert_eq!(identity.display_name, None);
    assert_eq!(identity.label(), "c");
}

#[test]
fn empty_id_is_a_parse_error() {
    assert!(matches!(identity_from_user_json(r#"{"id":"","email":"x@y.z"}"#), Err(IdentityError::Parse(_))));
}

#[test]
fn garbage_body_is_a_parse_error() {
    assert!(matches!(identity_from_user_json("<html>"), Err(IdentityError::Parse(_))));
}

#[tokio::test]
async fn unreachable_auth_server_is_a_request_error() {
    let config = SupabaseConfig {
        url: "http://127.0.0.1:1".into(),
        anon_key: "anon".into(),
        request_timeout: Duration::from_secs(1),
    };
    let verifier = SupabaseVerifier::new(&config).unwrap();

    let err = verifier.verify("token").await.unwrap_err();
    assert!(matches!(err, IdentityError::Request(_)), "got {err:?}");
}
