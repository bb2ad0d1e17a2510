use super::*;
use crate::types::Identity;

fn alice() -> Identity {
    Identity::new("u1", "a@b.com")
}

#[test]
fn new_store_is_uninitialized() {
    let store = SessionStore::new();
    assert_eq!(store.get_state(), SessionState::Uninitialized);
    assert_eq!(store.revision(), 0);
}

#[test]
fn set_state_updates_snapshot_and_revision() {
    let store = SessionStore::new();
    assert!(store.set_state(SessionState::Authenticated(alice())));
    assert_eq!(store.get_state(), SessionState::Authenticated(alice()));
    assert_eq!(store.revision(), 1);

    assert!(store.set_state(SessionState::Anonymous));
    assert_eq!(store.get_state(), SessionState::Anonymous);
    assert_eq!(store.revision(), 2);
}

#[test]
fn loading_never_returns_after_first_transition() {
    let store = SessionStore::new();
    store.set_state(SessionState::Anonymous);
    assert!(!store.set_state(SessionState::Uninitialized));
    assert_eq!(store.get_state(), SessionState::Anonymous);
    assert_eq!(store.revision(), 1);
}

#[test]
fn subscribers_see_every_transition_in_order() {
    let store = SessionStore::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_in = Arc::clone(&seen);
    let _sub = store.subscribe(move |state| seen_in.lock().unwrap().push(state.clone()));

    store.set_state(SessionState::Authenticated(alice()));
    store.set_state(SessionState::Anonymous);

    let seen = seen.lock().unwrap();
    assert_eq!(*seen, vec![SessionState::Authenticated(alice()), SessionState::Anonymous]);
}

#[test]
fn refused_transition_does_not_notify() {
    let store = SessionStore::new();
    store.set_state(SessionState::Anonymous);
    let calls = Arc::new(Mutex::new(0_u32));
    let calls_in = Arc::clone(&calls);
    let _sub = store.subscribe(move |_| *calls_in.lock().unwrap() += 1);

    store.set_state(SessionState::Uninitialized);
    assert_eq!(*calls.lock().unwrap(), 0);
}

#[test]
fn clones_share_state() {
    let store = SessionStore::new();
    let reader = store.clone();
    store.set_state(SessionState::Authenticated(alice()));
    assert!(reader.get_state().is_authenticated());
}

#[test]
fn subscriber_can_read_store_while_notified() {
    let store = SessionStore::new();
    let reader = store.clone();
    let observed = Arc::new(Mutex::new(None));
    let observed_in = Arc::clone(&observed);
    let _sub = store.subscribe(move |_| {
        *observed_in.lock().unwrap() = Some(reader.get_state());
    });

    store.set_state(SessionState::Anonymous);
    assert_eq!(*observed.lock().unwrap(), Some(SessionState::Anonymous));
}
