/**
 * Server Configuration
 *
 * Environment-driven configuration plus the policy constants of the live
 * room subsystem. Configuration errors are logged but never prevent
 * startup: a missing database URL falls back to an in-memory database
 * (buffers then do not survive restarts), and missing collaborator URLs
 * disable the respective feature.
 */
use std::time::Duration;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

/// Quiet period after the last edit before the buffer is flushed
pub const FLUSH_QUIET_PERIOD: Duration = Duration::from_millis(2000);

/// Quiet period for search-as-you-type directory queries
pub const SEARCH_QUIET_PERIOD: Duration = Duration::from_millis(400);

/// Minimum prefix length before a search touches the directory
pub const MIN_SEARCH_PREFIX: usize = 2;

/// Capacity of each room's broadcast channel
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// How often idle room actors are swept
pub const IDLE_SWEEP_INTERVAL: Duration = Duration::from_secs(300);

/// Default database when `DATABASE_URL` is not set
const DEFAULT_DATABASE_URL: &str = "sqlite://codelab.db?mode=rwc";

/// Load the SQLite pool and run migrations
///
/// Reads `DATABASE_URL`; falls back to a local file database, and as a last
/// resort to an in-memory database so the server always comes up.
pub async fn load_database() -> SqlitePool {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            tracing::warn!(
                "DATABASE_URL not set, using default {}",
                DEFAULT_DATABASE_URL
            );
            DEFAULT_DATABASE_URL.to_string()
        }
    };

    let pool = match connect(&url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to open database {}: {:?}", url, e);
            tracing::warn!("Falling back to in-memory database; buffers will not survive restarts");
            connect("sqlite::memory:")
                .await
                .expect("in-memory sqlite must open")
        }
    };

    tracing::info!("Database connection pool created successfully");

    if let Err(e) = run_migrations(&pool).await {
        tracing::error!("Failed to run database migrations: {:?}", e);
        // Continue anyway - migrations might have already been run
        tracing::warn!("Continuing without migrations - database might not be up to date");
    }

    pool
}

/// Open a pool for `url`
///
/// In-memory databases are pinned to a single connection; separate
/// connections would each see their own empty database.
pub async fn connect(url: &str) -> Result<SqlitePool, sqlx::Error> {
    let max_connections = if url.contains(":memory:") { 1 } else { 5 };
    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await
}

/// Run the bundled migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!().run(pool).await
}

/// Base URL of the user directory collaborator, if configured
pub fn directory_url() -> Option<String> {
    std::env::var("USER_DIRECTORY_URL").ok().filter(|v| !v.is_empty())
}

/// Base URL of the execution sandbox collaborator, if configured
pub fn sandbox_url() -> Option<String> {
    std::env::var("SANDBOX_URL").ok().filter(|v| !v.is_empty())
}
