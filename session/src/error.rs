//! Error taxonomy for authentication and backend sync.
//!
//! `AuthError` is shown inline on the login/signup form. `SyncError` is a
//! non-blocking warning: the user is already authenticated when it occurs.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Errors reported by an [`crate::AuthProvider`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Email/password pair was not accepted.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The provider refused the request with its own message
    /// (e.g. "User already registered").
    #[error("{0}")]
    Rejected(String),

    /// The request never reached the provider.
    #[error("network error: {0}")]
    Network(String),

    /// The provider answered with a server-side failure.
    #[error("auth provider unavailable: status {status}")]
    Unavailable { status: u16 },

    /// No answer within the client-side deadline.
    #[error("auth request timed out")]
    Timeout,

    /// The operation cannot run in this environment (e.g. during SSR).
    #[error("not available: {0}")]
    NotAvailable(String),
}

impl AuthError {
    /// Whether retrying the same request may succeed.
    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Unavailable { .. } | Self::Timeout)
    }
}

/// Errors from ensuring the application user record exists.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    /// The record store could not be reached.
    #[error("record store unreachable: {0}")]
    Unreachable(String),

    /// The record store answered but refused the write.
    #[error("record store rejected the request: {0}")]
    Rejected(String),

    /// The caller's identity is missing or malformed.
    #[error("invalid identity: {0}")]
    InvalidIdentity(String),

    /// The caller is not authenticated (or the token expired).
    #[error("not authenticated")]
    Unauthorized,

    /// No answer within the client-side deadline.
    #[error("sync request timed out")]
    Timeout,
}

impl SyncError {
    /// Whether re-running the idempotent sync may succeed.
    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::Unreachable(_) | Self::Timeout)
    }
}
