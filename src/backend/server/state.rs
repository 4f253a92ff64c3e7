/**
 * Application State Management
 *
 * `AppState` is the central state container shared by every handler:
 * the database pool, the registry of live room actors, the flush
 * scheduler, the search debouncer and the external collaborator clients.
 *
 * The `FromRef` implementations let handlers extract exactly the piece
 * they need instead of the whole state, following Axum's recommended
 * pattern.
 */
use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::backend::debounce::Debouncer;
use crate::backend::directory::DirectoryClient;
use crate::backend::persist::FlushScheduler;
use crate::backend::rooms::RoomRegistry;
use crate::backend::sandbox::SandboxClient;

/// Central state container for the Axum application
#[derive(Clone)]
pub struct AppState {
    /// SQLite connection pool (rooms, participant grants, buffers)
    pub pool: SqlitePool,

    /// Registry of live room actors
    pub registry: Arc<RoomRegistry>,

    /// Debounced buffer flusher; the only writer of durable buffers
    pub scheduler: Arc<FlushScheduler>,

    /// User directory collaborator
    pub directory: Arc<DirectoryClient>,

    /// Execution sandbox collaborator
    pub sandbox: Arc<SandboxClient>,

    /// Per-user debouncer for search-as-you-type directory queries
    pub search_debounce: Arc<Debouncer<String>>,
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.pool.clone()
    }
}

impl FromRef<AppState> for Arc<RoomRegistry> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.registry.clone()
    }
}

impl FromRef<AppState> for Arc<FlushScheduler> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.scheduler.clone()
    }
}

impl FromRef<AppState> for Arc<DirectoryClient> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.directory.clone()
    }
}

impl FromRef<AppState> for Arc<SandboxClient> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.sandbox.clone()
    }
}

impl FromRef<AppState> for Arc<Debouncer<String>> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.search_debounce.clone()
    }
}
