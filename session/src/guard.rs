//! Route guard: decides whether a view renders, waits, or redirects.
//!
//! The decision is a pure function of the session state and the current path;
//! issuing the navigation is left to the UI layer. [`RedirectLatch`] keeps that
//! layer from redirecting more than once per mount.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use crate::types::SessionState;

/// Who may see a view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AccessPolicy {
    /// Everyone, regardless of session.
    Public,
    /// Signed-in viewers only; anonymous viewers go to the entry path.
    #[default]
    Authenticated,
    /// Anonymous viewers only (signup/login); signed-in viewers go home.
    GuestOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GuardConfigError {
    #[error("redirect target {0:?} must be an absolute path")]
    RelativeTarget(String),
    #[error("redirect target {0:?} is not a registered route")]
    UnregisteredTarget(String),
}

/// Redirect targets, validated against the app's route table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuardConfig {
    entry_path: String,
    home_path: String,
}

impl GuardConfig {
    /// Build a config whose targets are guaranteed to be routable.
    ///
    /// # Errors
    ///
    /// Returns an error if either target is relative or missing from
    /// `registered_routes`.
    pub fn new(
        entry_path: impl Into<String>,
        home_path: impl Into<String>,
        registered_routes: &[&str],
    ) -> Result<Self, GuardConfigError> {
        let entry_path = validate_target(entry_path.into(), registered_routes)?;
        let home_path = validate_target(home_path.into(), registered_routes)?;
        Ok(Self { entry_path, home_path })
    }

    /// Where anonymous viewers of protected pages are sent.
    #[must_use]
    pub fn entry_path(&self) -> &str {
        &self.entry_path
    }

    /// Where signed-in viewers of guest-only pages are sent.
    #[must_use]
    pub fn home_path(&self) -> &str {
        &self.home_path
    }
}

fn validate_target(target: String, registered_routes: &[&str]) -> Result<String, GuardConfigError> {
    if !target.starts_with('/') {
        return Err(GuardConfigError::RelativeTarget(target));
    }
    let normalized = normalize_path(&target);
    if !registered_routes
        .iter()
        .any(|route| normalize_path(route) == normalized)
    {
        return Err(GuardConfigError::UnregisteredTarget(target));
    }
    Ok(normalized.to_owned())
}

/// Strip query, fragment and trailing slash (except for the root).
fn normalize_path(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

/// What the guarded view should do right now.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session not known yet: show a neutral placeholder.
    Loading,
    /// Show the wrapped content.
    Render,
    /// Navigate away. `replace` drops the guarded page from history.
    Redirect { to: String, replace: bool },
}

/// Policy enforcement point for one view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteGuard {
    policy: AccessPolicy,
    config: GuardConfig,
}

impl RouteGuard {
    #[must_use]
    pub fn new(policy: AccessPolicy, config: GuardConfig) -> Self {
        Self { policy, config }
    }

    #[must_use]
    pub fn policy(&self) -> AccessPolicy {
        self.policy
    }

    #[must_use]
    pub fn decide(&self, state: &SessionState, current_path: &str) -> GuardDecision {
        match (self.policy, state) {
            (AccessPolicy::Public, _)
            | (AccessPolicy::Authenticated, SessionState::Authenticated(_))
            | (AccessPolicy::GuestOnly, SessionState::Anonymous) => GuardDecision::Render,
            (_, SessionState::Uninitialized) => GuardDecision::Loading,
            (AccessPolicy::Authenticated, SessionState::Anonymous) => {
                redirect_unless_current(self.config.entry_path(), current_path)
            }
            (AccessPolicy::GuestOnly, SessionState::Authenticated(_)) => {
                redirect_unless_current(self.config.home_path(), current_path)
            }
        }
    }
}

/// Redirecting to the page already shown would loop; hold on the placeholder.
fn redirect_unless_current(target: &str, current_path: &str) -> GuardDecision {
    if normalize_path(current_path) == target {
        tracing::warn!(redirect_to = target, "guard redirect target is the current page; not redirecting");
        return GuardDecision::Loading;
    }
    GuardDecision::Redirect { to: target.to_owned(), replace: true }
}

/// Lets a redirect fire once per run of redirect decisions.
///
/// A `Render` decision re-arms the latch, so a later sign-out on the same
/// mounted view redirects again.
#[derive(Clone, Debug, Default)]
pub struct RedirectLatch {
    fired: bool,
}

impl RedirectLatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the target to navigate to, or `None` if nothing should happen.
    pub fn observe(&mut self, decision: &GuardDecision) -> Option<String> {
        match decision {
            GuardDecision::Redirect { to, .. } if !self.fired => {
                self.fired = true;
                Some(to.clone())
            }
            GuardDecision::Render => {
                self.fired = false;
                None
            }
            GuardDecision::Redirect { .. } | GuardDecision::Loading => None,
        }
    }

    #[must_use]
    pub fn has_fired(&self) -> bool {
        self.fired
    }
}
