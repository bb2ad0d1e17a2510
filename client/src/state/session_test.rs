use super::*;

fn alice() -> Identity {
    Identity::new("u1", "a@b.com")
}

fn record(balance: i32) -> ApplicationUserRecord {
    ApplicationUserRecord {
        id: "u1".to_owned(),
        email: "a@b.com".to_owned(),
        display_name: None,
        balance,
        created_at: 1_700_000_000_000,
    }
}

#[test]
fn tracker_waits_while_loading() {
    let mut tracker = SyncTracker::default();
    assert_eq!(tracker.next(&SessionState::Uninitialized), None);
    assert!(!tracker.is_in_flight());
}

#[test]
fn tracker_starts_one_sync_per_identity() {
    let mut tracker = SyncTracker::default();
    let signed_in = SessionState::Authenticated(alice());

    assert_eq!(tracker.next(&signed_in), Some(alice()));
    assert!(tracker.is_in_flight());
    assert_eq!(tracker.next(&signed_in), None);

    assert!(tracker.finish("u1", true));
    assert!(!tracker.is_in_flight());
    assert_eq!(tracker.next(&signed_in), None);
}

#[test]
fn tracker_retries_after_failure_on_next_authenticated_state() {
    let mut tracker = SyncTracker::default();
    let signed_in = SessionState::Authenticated(alice());

    tracker.next(&signed_in);
    tracker.finish("u1", false);

    assert_eq!(tracker.next(&signed_in), Some(alice()));
}

#[test]
fn tracker_resyncs_after_sign_out() {
    let mut tracker = SyncTracker::default();
    let signed_in = SessionState::Authenticated(alice());
    tracker.next(&signed_in);
    tracker.finish("u1", true);

    assert_eq!(tracker.next(&SessionState::Anonymous), None);
    assert_eq!(tracker.next(&signed_in), Some(alice()));
}

#[test]
fn tracker_syncs_a_different_identity() {
    let mut tracker = SyncTracker::default();
    tracker.next(&SessionState::Authenticated(alice()));
    tracker.finish("u1", true);

    let bob = Identity::new("u2", "b@b.com");
    assert_eq!(tracker.next(&SessionState::Authenticated(bob.clone())), Some(bob));
}

#[test]
fn tracker_ignores_stale_finish() {
    let mut tracker = SyncTracker::default();
    tracker.next(&SessionState::Authenticated(alice()));
    assert!(!tracker.finish("someone-else", true));
    assert!(tracker.is_in_flight());
}

#[test]
fn sync_result_for_signed_out_identity_is_dropped() {
    let mut tracker = SyncTracker::default();
    let bob = Identity::new("u2", "b@b.com");

    assert_eq!(tracker.next(&SessionState::Authenticated(alice())), Some(alice()));
    assert_eq!(tracker.next(&SessionState::Anonymous), None);
    assert_eq!(tracker.next(&SessionState::Authenticated(bob.clone())), Some(bob));

    assert!(!tracker.finish("u1", true));
    assert!(tracker.is_in_flight());
    assert!(tracker.finish("u2", true));
    assert_eq!(tracker.next(&SessionState::Authenticated(Identity::new("u2", "b@b.com"))), None);
}

#[test]
fn sync_result_after_sign_out_is_dropped() {
    let mut tracker = SyncTracker::default();
    tracker.next(&SessionState::Authenticated(alice()));
    tracker.next(&SessionState::Anonymous);

    assert!(!tracker.finish("u1", true));
    assert_eq!(tracker.next(&SessionState::Authenticated(alice())), Some(alice()));
}

#[test]
fn refreshed_record_applies_only_to_current_identity() {
    let signed_in = SessionState::Authenticated(alice());
    assert_eq!(refreshed_status(&signed_in, record(3)), Some(SyncStatus::Synced(record(3))));

    let bob = SessionState::Authenticated(Identity::new("u2", "b@b.com"));
    assert_eq!(refreshed_status(&bob, record(3)), None);
    assert_eq!(refreshed_status(&SessionState::Anonymous, record(3)), None);
}

#[test]
fn reset_completed_allows_manual_retry() {
    let mut tracker = SyncTracker::default();
    let signed_in = SessionState::Authenticated(alice());
    tracker.next(&signed_in);
    tracker.finish("u1", true);

    tracker.reset_completed();
    assert_eq!(tracker.next(&signed_in), Some(alice()));
}

#[test]
fn sync_status_exposes_balance_and_warning() {
    assert_eq!(SyncStatus::Synced(record(5)).balance(), Some(5));
    assert_eq!(SyncStatus::Syncing.balance(), None);
    assert_eq!(SyncStatus::Idle.warning(), None);

    let warning = SyncStatus::Failed(SyncError::Timeout).warning().unwrap();
    assert!(warning.contains("timed out"));
    let warning = SyncStatus::Failed(SyncError::Unauthorized).warning().unwrap();
    assert!(warning.contains("Log in again"));
}
