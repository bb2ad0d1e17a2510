use super::*;

#[test]
fn auth_error_retryable_classification() {
    assert!(AuthError::Network("reset".into()).retryable());
    assert!(AuthError::Unavailable { status: 503 }.retryable());
    assert!(AuthError::Timeout.retryable());
    assert!(!AuthError::InvalidCredentials.retryable());
    assert!(!AuthError::Rejected("User already registered".into()).retryable());
}

#[test]
fn rejected_auth_error_displays_provider_message() {
    let err = AuthError::Rejected("User already registered".into());
    assert_eq!(err.to_string(), "User already registered");
}

#[test]
fn sync_error_retryable_classification() {
    assert!(SyncError::Unreachable("connection refused".into()).retryable());
    assert!(SyncError::Timeout.retryable());
    assert!(!SyncError::Unauthorized.retryable());
    assert!(!SyncError::InvalidIdentity("empty id".into()).retryable());
}
