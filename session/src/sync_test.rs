use super::*;

fn alice() -> Identity {
    Identity::new("u1", "a@b.com")
}

// =========================================================================
// FailingStore
// =========================================================================

struct FailingStore;

#[async_trait::async_trait]
impl RecordStore for FailingStore {
    async fn get_user_by_id(&self, _id: &str) -> Result<Option<ApplicationUserRecord>, SyncError> {
        Err(SyncError::Unreachable("connection refused".into()))
    }

    async fn upsert_user(&self, _record: NewUserRecord) -> Result<ApplicationUserRecord, SyncError> {
        Err(SyncError::Unreachable("connection refused".into()))
    }
}

/// Reports "absent" on every read so each caller reaches the upsert path.
struct BlindReadStore {
    inner: InMemoryRecordStore,
}

#[async_trait::async_trait]
impl RecordStore for BlindReadStore {
    async fn get_user_by_id(&self, _id: &str) -> Result<Option<ApplicationUserRecord>, SyncError> {
        tokio::task::yield_now().await;
        Ok(None)
    }

    async fn upsert_user(&self, record: NewUserRecord) -> Result<ApplicationUserRecord, SyncError> {
        tokio::task::yield_now().await;
        self.inner.upsert_user(record).await
    }
}

// =========================================================================
// ensure_user
// =========================================================================

#[tokio::test]
async fn first_sync_creates_record_with_starting_balance() {
    let store = Arc::new(InMemoryRecordStore::new());
    let sync = BackendSync::new(store.clone());

    let record = sync.ensure_user(&alice()).await.unwrap();

    assert_eq!(record.id, "u1");
    assert_eq!(record.email, "a@b.com");
    assert_eq!(record.balance, STARTING_BALANCE);
    assert_eq!(record.balance, 5);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn repeated_sync_returns_same_record() {
    let store = Arc::new(InMemoryRecordStore::new());
    let sync = BackendSync::new(store.clone());

    let first = sync.ensure_user(&alice()).await.unwrap();
    let second = sync.ensure_user(&alice()).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(store.insert_count(), 1);
}

#[tokio::test]
async fn resync_never_resets_spent_balance() {
    let store = Arc::new(InMemoryRecordStore::new());
    let sync = BackendSync::new(store.clone());
    sync.ensure_user(&alice()).await.unwrap();

    assert!(store.set_balance("u1", 2));
    let record = sync.ensure_user(&alice()).await.unwrap();

    assert_eq!(record.balance, 2);
}

#[tokio::test]
async fn display_name_is_carried_into_new_record() {
    let store = Arc::new(InMemoryRecordStore::new());
    let sync = BackendSync::new(store);

    let record = sync
        .ensure_user(&alice().with_display_name("Alice"))
        .await
        .unwrap();

    assert_eq!(record.display_name.as_deref(), Some("Alice"));
}

#[tokio::test]
async fn custom_starting_balance_is_used() {
    let store = Arc::new(InMemoryRecordStore::new());
    let sync = BackendSync::new(store).with_starting_balance(12);

    assert_eq!(sync.ensure_user(&alice()).await.unwrap().balance, 12);
}

#[tokio::test]
async fn empty_id_is_rejected_without_touching_store() {
    let store = Arc::new(InMemoryRecordStore::new());
    let sync = BackendSync::new(store.clone());

    let err = sync.ensure_user(&Identity::new("  ", "a@b.com")).await.unwrap_err();

    assert!(matches!(err, SyncError::InvalidIdentity(_)));
    assert!(store.is_empty());
}

#[tokio::test]
async fn store_failure_propagates_as_retryable() {
    let sync = BackendSync::new(Arc::new(FailingStore));

    let err = sync.ensure_user(&alice()).await.unwrap_err();

    assert_eq!(err, SyncError::Unreachable("connection refused".into()));
    assert!(err.retryable());
}

// =========================================================================
// Concurrency
// =========================================================================

#[tokio::test]
async fn interleaved_first_syncs_create_one_record() {
    let store = Arc::new(BlindReadStore { inner: InMemoryRecordStore::new() });
    let sync = BackendSync::new(store.clone());

    let (user_a, user_b) = (alice(), alice());
    let (a, b) = tokio::join!(sync.ensure_user(&user_a), sync.ensure_user(&user_b));

    assert_eq!(a.unwrap(), b.unwrap());
    assert_eq!(store.inner.insert_count(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_first_syncs_create_one_record() {
    let store = Arc::new(InMemoryRecordStore::new());
    let sync = BackendSync::new(store.clone());

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let sync = sync.clone();
            tokio::spawn(async move { sync.ensure_user(&alice()).await })
        })
        .collect();

    let mut records = Vec::new();
    for handle in handles {
        records.push(handle.await.unwrap().unwrap());
    }

    assert!(records.iter().all(|r| *r == records[0]));
    assert_eq!(store.len(), 1);
    assert_eq!(store.insert_count(), 1);
}

#[tokio::test]
async fn unknown_user_balance_update_is_refused() {
    let store = InMemoryRecordStore::new();
    assert!(!store.set_balance("nobody", 3));
}
