//! Session data model shared across the workspace.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

// =============================================================================
// IDENTITY
// =============================================================================

/// The externally authenticated principal, as reported by the auth provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Provider-assigned opaque user id.
    pub id: String,
    /// Email address the account was registered with.
    pub email: String,
    /// Optional display name (signup form name or OAuth profile name).
    #[serde(default)]
    pub display_name: Option<String>,
}

impl Identity {
    #[must_use]
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self { id: id.into(), email: email.into(), display_name: None }
    }

    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.display_name = if name.trim().is_empty() { None } else { Some(name) };
        self
    }

    /// Name to greet the user with: display name, else the email local part.
    #[must_use]
    pub fn label(&self) -> &str {
        if let Some(name) = self.display_name.as_deref().filter(|n| !n.trim().is_empty()) {
            return name;
        }
        self.email
            .split('@')
            .next()
            .filter(|local| !local.is_empty())
            .unwrap_or(&self.email)
    }

    /// Uppercased first character of the email, used for the avatar badge.
    #[must_use]
    pub fn initial(&self) -> char {
        self.email
            .chars()
            .next()
            .map_or('?', |c| c.to_ascii_uppercase())
    }
}

/// User object returned by the Supabase auth server (`GET /auth/v1/user`,
/// and the `user` field of token responses).
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct SupabaseUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

/// Profile fields from signup metadata or the OAuth provider.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl SupabaseUser {
    /// The display name comes from signup metadata (`display_name`) or, for
    /// OAuth accounts, the provider profile (`full_name`, then `name`).
    #[must_use]
    pub fn into_identity(self) -> Identity {
        let metadata = self.user_metadata;
        let display_name = metadata
            .display_name
            .or(metadata.full_name)
            .or(metadata.name)
            .unwrap_or_default();
        Identity::new(self.id, self.email.unwrap_or_default()).with_display_name(display_name)
    }
}

// =============================================================================
// SESSION STATE
// =============================================================================

/// Who is logged in right now.
///
/// `Uninitialized` is the loading state and only exists before the first
/// provider callback has been applied.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "identity", rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Uninitialized,
    Authenticated(Identity),
    Anonymous,
}

impl SessionState {
    #[must_use]
    pub fn from_identity(identity: Option<Identity>) -> Self {
        identity.map_or(Self::Anonymous, Self::Authenticated)
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Uninitialized)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Authenticated(identity) => Some(identity),
            Self::Uninitialized | Self::Anonymous => None,
        }
    }
}

// =============================================================================
// AUTH EVENTS
// =============================================================================

/// Kind of change reported by the provider's notification channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthEventKind {
    InitialSession,
    SignedIn,
    SignedOut,
    TokenRefreshed,
    UserUpdated,
}

/// A single provider notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthEvent {
    pub kind: AuthEventKind,
    pub identity: Option<Identity>,
}

impl AuthEvent {
    #[must_use]
    pub fn signed_in(identity: Identity) -> Self {
        Self { kind: AuthEventKind::SignedIn, identity: Some(identity) }
    }

    #[must_use]
    pub fn signed_out() -> Self {
        Self { kind: AuthEventKind::SignedOut, identity: None }
    }

    #[must_use]
    pub fn token_refreshed(identity: Identity) -> Self {
        Self { kind: AuthEventKind::TokenRefreshed, identity: Some(identity) }
    }

    #[must_use]
    pub fn user_updated(identity: Identity) -> Self {
        Self { kind: AuthEventKind::UserUpdated, identity: Some(identity) }
    }

    /// Session state this event should leave the store in.
    ///
    /// `SignedOut` is always anonymous, even if a provider attaches a stale
    /// identity to it.
    #[must_use]
    pub fn to_state(&self) -> SessionState {
        match self.kind {
            AuthEventKind::SignedOut => SessionState::Anonymous,
            _ => SessionState::from_identity(self.identity.clone()),
        }
    }
}

// =============================================================================
// APPLICATION USER RECORD
// =============================================================================

/// Application-level user row, one per provider identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationUserRecord {
    /// Same value as [`Identity::id`].
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    /// Remaining generation credits ("Inkbucks").
    pub balance: i32,
    /// Creation timestamp in milliseconds since the Unix epoch.
    pub created_at: i64,
}

/// Insert payload for [`crate::RecordStore::upsert_user`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUserRecord {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub balance: i32,
}

impl NewUserRecord {
    #[must_use]
    pub fn from_identity(identity: &Identity, balance: i32) -> Self {
        Self {
            id: identity.id.clone(),
            email: identity.email.clone(),
            display_name: identity.display_name.clone(),
            balance,
        }
    }
}

// =============================================================================
// ICONS
// =============================================================================

/// Response body of an icon generation request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedIcon {
    /// The subject the user typed, before styling.
    pub prompt: String,
    /// Image encoding (`jpeg`, `png` or `webp`).
    pub format: String,
    /// Standard base64 of the image bytes.
    pub image_base64: String,
    /// Credits left after this generation.
    pub balance: i32,
}

impl GeneratedIcon {
    /// `data:` URL suitable for an `<img src>`.
    #[must_use]
    pub fn data_url(&self) -> String {
        format!("data:image/{};base64,{}", self.format, self.image_base64)
    }
}
