use super::*;

#[test]
fn guard_targets_are_registered_routes() {
    let config = guard_config().unwrap();
    assert_eq!(config.entry_path(), "/signup");
    assert_eq!(config.home_path(), "/dashboard");
}

#[test]
fn signed_in_viewer_of_signup_is_replaced_with_home() {
    use session::{Identity, RouteGuard, SessionState};

    let guard = RouteGuard::new(AccessPolicy::GuestOnly, guard_config().unwrap());
    let signed_in = SessionState::Authenticated(Identity::new("u1", "a@b.com"));
    assert_eq!(
        guard.decide(&signed_in, ENTRY_PATH),
        session::GuardDecision::Redirect { to: HOME_PATH.to_owned(), replace: true }
    );
}

#[test]
fn login_path_is_not_a_route() {
    assert!(!ROUTES.contains(&"/login"));
    assert!(GuardConfig::new("/login", HOME_PATH, &ROUTES).is_err());
}

#[test]
fn public_config_defaults_to_empty() {
    let public = PublicConfig::default();
    assert!(public.supabase_url.is_empty());
    assert!(public.supabase_anon_key.is_empty());
}
