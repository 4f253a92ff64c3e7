//! Common test utilities and helpers
//!
//! Shared fixtures for the integration tests: an in-memory database with
//! the schema applied, seeded rooms and participants, a write-counting
//! failing store, and identity headers for HTTP requests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::{HeaderName, HeaderValue};
use axum_test::TestServer;
use sqlx::SqlitePool;
use uuid::Uuid;

use codelab::backend::debounce::Debouncer;
use codelab::backend::directory::DirectoryClient;
use codelab::backend::membership;
use codelab::backend::persist::{DocumentStore, FlushScheduler, StoreError};
use codelab::backend::rooms::{self, RoomRegistry};
use codelab::backend::routes::create_router;
use codelab::backend::sandbox::SandboxClient;
use codelab::backend::server::config;
use codelab::backend::server::state::AppState;
use codelab::shared::room::{Role, UserIdentity};

/// Fresh in-memory database with the schema applied
pub async fn test_pool() -> SqlitePool {
    let pool = config::connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite must open");
    config::run_migrations(&pool)
        .await
        .expect("migrations must apply");
    pool
}

/// Create a room owned by `admin_id`, with the admin's implicit edit grant
pub async fn seed_room(pool: &SqlitePool, room_name: &str, admin_id: &str) -> Uuid {
    let room = rooms::db::create_room(pool, room_name, admin_id, "javascript")
        .await
        .expect("room insert");
    membership::db::upsert_participant(pool, room.room_id, admin_id, Role::Edit)
        .await
        .expect("admin grant");
    room.room_id
}

/// Grant `role` to `user_id` in a room
pub async fn seed_participant(pool: &SqlitePool, room_id: Uuid, user_id: &str, role: Role) {
    membership::db::upsert_participant(pool, room_id, user_id, role)
        .await
        .expect("participant grant");
}

pub fn identity(user_id: &str, display_name: &str) -> UserIdentity {
    UserIdentity {
        user_id: user_id.to_string(),
        display_name: display_name.to_string(),
    }
}

/// Application state over an explicit store and flush quiet period
///
/// Collaborator clients start disabled; tests that need a live directory
/// or sandbox construct the state themselves.
pub fn state_with_store(
    pool: SqlitePool,
    store: Arc<dyn DocumentStore>,
    quiet_period: Duration,
) -> AppState {
    let registry = Arc::new(RoomRegistry::new(
        pool.clone(),
        store.clone(),
        config::EVENT_CHANNEL_CAPACITY,
    ));
    let scheduler = Arc::new(FlushScheduler::new(store, quiet_period));
    AppState {
        pool,
        registry,
        scheduler,
        directory: Arc::new(DirectoryClient::new(None)),
        sandbox: Arc::new(SandboxClient::new(None)),
        search_debounce: Arc::new(Debouncer::new(config::SEARCH_QUIET_PERIOD)),
    }
}

/// Test server over the given state
pub fn test_server(state: AppState) -> TestServer {
    TestServer::new(create_router(state)).expect("test server")
}

/// Identity headers for HTTP requests
pub fn identity_headers(user_id: &str, display_name: &str) -> [(HeaderName, HeaderValue); 2] {
    [
        (
            HeaderName::from_static("x-user-id"),
            HeaderValue::from_str(user_id).expect("header value"),
        ),
        (
            HeaderName::from_static("x-user-name"),
            HeaderValue::from_str(display_name).expect("header value"),
        ),
    ]
}

/// Document store that rejects every write, counting the attempts
#[derive(Debug, Default)]
pub struct FailingStore {
    attempts: AtomicUsize,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn read(&self, _room_id: Uuid) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    async fn write(
        &self,
        _room_id: Uuid,
        _content: &str,
        _author_id: &str,
    ) -> Result<(), StoreError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Unavailable("injected failure".to_string()))
    }
}
