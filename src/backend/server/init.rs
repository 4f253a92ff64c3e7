/**
 * Server Initialization
 *
 * Assembles the application: database pool, durable store, room registry,
 * flush scheduler, collaborator clients, router, and the periodic sweep
 * that evicts idle room actors.
 */
use std::sync::Arc;

use axum::Router;
use sqlx::SqlitePool;

use crate::backend::debounce::Debouncer;
use crate::backend::directory::DirectoryClient;
use crate::backend::persist::{FlushScheduler, SqliteDocumentStore};
use crate::backend::rooms::RoomRegistry;
use crate::backend::routes::router::create_router;
use crate::backend::sandbox::SandboxClient;
use crate::backend::server::config;
use crate::backend::server::state::AppState;

/// Create and configure the Axum application
///
/// # Initialization Steps
///
/// 1. Open the database and run migrations
/// 2. Build the application state (store, registry, scheduler, clients)
/// 3. Start the idle-room sweep task
/// 4. Create the router
pub async fn create_app() -> Router {
    tracing::info!("Initializing codelab server");

    let pool = config::load_database().await;
    let app_state = build_state(pool);

    // Step 3: periodically evict rooms with no presence and no subscribers.
    let sweep_registry = app_state.registry.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(config::IDLE_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let evicted = sweep_registry.evict_idle().await;
            if evicted > 0 {
                tracing::debug!("Evicted {} idle room actors", evicted);
            }
        }
    });

    tracing::info!("Router configured with idle-room sweep task");

    create_router(app_state)
}

/// Build the application state around an existing pool
pub fn build_state(pool: SqlitePool) -> AppState {
    let store = Arc::new(SqliteDocumentStore::new(pool.clone()));
    let registry = Arc::new(RoomRegistry::new(
        pool.clone(),
        store.clone(),
        config::EVENT_CHANNEL_CAPACITY,
    ));
    let scheduler = Arc::new(FlushScheduler::new(store, config::FLUSH_QUIET_PERIOD));
    let directory = Arc::new(DirectoryClient::new(config::directory_url()));
    let sandbox = Arc::new(SandboxClient::new(config::sandbox_url()));
    let search_debounce = Arc::new(Debouncer::new(config::SEARCH_QUIET_PERIOD));

    AppState {
        pool,
        registry,
        scheduler,
        directory,
        sandbox,
        search_debounce,
    }
}
