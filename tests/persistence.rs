//! Persistence scheduler integration tests
//!
//! Debounce-and-coalesce behavior under a paused clock: bursts of edits
//! inside one quiet period produce exactly one durable write holding the
//! final content; failures are reported to the originating session only
//! and retried implicitly by the next edit's timer.

mod common;

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use tokio_test::assert_ok;
use uuid::Uuid;

use codelab::backend::persist::{DocumentStore, FlushScheduler, MemoryStore, SqliteDocumentStore};
use codelab::backend::rooms::{PublishOutcome, RoomRegistry};
use codelab::backend::server::config;
use codelab::backend::sync::subscription::should_deliver;
use codelab::shared::EventKind;

use common::{identity, seed_room, test_pool, FailingStore};

const QUIET: Duration = Duration::from_millis(2000);

async fn open_room(
    store: Arc<dyn DocumentStore>,
) -> (Arc<RoomRegistry>, codelab::backend::rooms::RoomHandle) {
    let pool = test_pool().await;
    let room_id = seed_room(&pool, "algo-lab", "alice").await;
    let registry = Arc::new(RoomRegistry::new(
        pool,
        store,
        config::EVENT_CHANNEL_CAPACITY,
    ));
    let handle = registry.open(room_id).await.unwrap();
    (registry, handle)
}

#[tokio::test]
async fn test_burst_of_edits_coalesces_to_one_write() {
    let store = Arc::new(MemoryStore::new());
    let scheduler = FlushScheduler::new(store.clone(), QUIET);
    let (_registry, handle) = open_room(store.clone()).await;
    tokio::time::pause();
    let conn = Uuid::new_v4();
    let alice = identity("alice", "Alice");

    // "x = 1" typed, then within the quiet period "x = 1;y = 2".
    for code in ["x = 1", "x = 1;y = 2"] {
        let outcome = handle
            .publish(conn, alice.clone(), code.to_string())
            .await
            .unwrap();
        assert_eq!(outcome, PublishOutcome::Applied);
        scheduler.schedule_flush(handle.clone(), conn, alice.clone());
        tokio::time::sleep(Duration::from_millis(1500)).await;
    }
    tokio::time::sleep(Duration::from_millis(2500)).await;

    // Exactly one durable write, holding the content after the last edit.
    assert_eq!(store.write_count(), 1);
    let writes = store.writes();
    assert_eq!(writes[0].1, "x = 1;y = 2");
    assert_eq!(writes[0].2, "alice");
}

#[tokio::test]
async fn test_flush_reports_success_to_originating_session() {
    let store = Arc::new(MemoryStore::new());
    let scheduler = FlushScheduler::new(store.clone(), QUIET);
    let (_registry, handle) = open_room(store.clone()).await;
    tokio::time::pause();
    let conn = Uuid::new_v4();
    let alice = identity("alice", "Alice");

    let mut rx = handle.subscribe().await.unwrap();
    handle
        .publish(conn, alice.clone(), "x = 1".to_string())
        .await
        .unwrap();
    scheduler.schedule_flush(handle.clone(), conn, alice);

    // Skip the codeUpdate, then observe the flush outcome.
    let code_update = rx.recv().await.unwrap();
    assert_eq!(code_update.kind, EventKind::CodeUpdate);

    tokio::time::sleep(Duration::from_millis(2500)).await;
    let status = rx.recv().await.unwrap();
    assert_eq!(status.kind, EventKind::PersistStatus);
    assert_eq!(status.payload["ok"], true);
    assert_eq!(status.target, Some(conn));

    // Another session's subscription would filter it out.
    assert!(!should_deliver(&status, Uuid::new_v4()));
    assert_eq!(store.document(handle.room_id()).as_deref(), Some("x = 1"));
}

#[tokio::test]
async fn test_failed_flush_is_reported_and_not_retried() {
    let store = Arc::new(FailingStore::new());
    let scheduler = FlushScheduler::new(store.clone(), QUIET);
    let (_registry, handle) = open_room(store.clone()).await;
    tokio::time::pause();
    let conn = Uuid::new_v4();
    let alice = identity("alice", "Alice");

    let mut rx = handle.subscribe().await.unwrap();
    handle
        .publish(conn, alice.clone(), "x = 1".to_string())
        .await
        .unwrap();
    scheduler.schedule_flush(handle.clone(), conn, alice.clone());

    let code_update = rx.recv().await.unwrap();
    assert_eq!(code_update.kind, EventKind::CodeUpdate);

    tokio::time::sleep(Duration::from_millis(2500)).await;
    let status = rx.recv().await.unwrap();
    assert_eq!(status.kind, EventKind::PersistStatus);
    assert_eq!(status.payload["ok"], false);
    assert_eq!(status.target, Some(conn));

    // No out-of-band retry: one attempt so far, even well past the window.
    tokio::time::sleep(Duration::from_millis(5000)).await;
    assert_eq!(store.attempts(), 1);

    // The next edit's timer retries the newer content implicitly.
    handle
        .publish(conn, alice.clone(), "x = 2".to_string())
        .await
        .unwrap();
    scheduler.schedule_flush(handle.clone(), conn, alice);
    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert_eq!(store.attempts(), 2);
}

#[tokio::test]
async fn test_sessions_debounce_independently() {
    let store = Arc::new(MemoryStore::new());
    let scheduler = FlushScheduler::new(store.clone(), QUIET);
    let (_registry, handle) = open_room(store.clone()).await;
    tokio::time::pause();
    let alice = identity("alice", "Alice");

    let tab1 = Uuid::new_v4();
    let tab2 = Uuid::new_v4();

    handle
        .publish(tab1, alice.clone(), "x = 1".to_string())
        .await
        .unwrap();
    scheduler.schedule_flush(handle.clone(), tab1, alice.clone());

    handle
        .publish(tab2, alice.clone(), "x = 2".to_string())
        .await
        .unwrap();
    scheduler.schedule_flush(handle.clone(), tab2, alice);

    tokio::time::sleep(Duration::from_millis(2500)).await;

    // One timer per session: both fired, both wrote the then-current
    // buffer.
    assert_eq!(store.write_count(), 2);
    for (_, content, _) in store.writes() {
        assert_eq!(content, "x = 2");
    }
}

#[tokio::test]
async fn test_durable_buffer_survives_reconnect_across_pools() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("rooms.db").display());
    let room_id = Uuid::new_v4();

    {
        let pool = config::connect(&url).await.unwrap();
        config::run_migrations(&pool).await.unwrap();
        let store = SqliteDocumentStore::new(pool);
        store.write(room_id, "print(1)", "alice").await.unwrap();
    }

    // A fresh connection (a "restarted server") reads the same document.
    let pool = config::connect(&url).await.unwrap();
    let store = SqliteDocumentStore::new(pool);
    let read = assert_ok!(store.read(room_id).await);
    assert_eq!(read.as_deref(), Some("print(1)"));
}
