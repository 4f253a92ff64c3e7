/**
 * Durable Buffer Store
 *
 * The durable side of a room's buffer: one document per room, read once at
 * room open and replaced atomically on every flush. The `DocumentStore`
 * trait is the only write path to durable storage; nothing else in the
 * service touches `room_buffers`.
 *
 * `SqliteDocumentStore` performs the replace as a single upsert statement,
 * so a crash mid-flush can never leave a partial document. `MemoryStore`
 * backs tests and ephemeral deployments.
 */
use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use thiserror::Error;
use uuid::Uuid;

use crate::backend::error::ApiError;

/// Error raised by the durable buffer store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying database failure
    #[error("document store error: {0}")]
    Database(#[from] sqlx::Error),

    /// Store is unreachable or misconfigured
    #[error("document store unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::transient(err.to_string())
    }
}

/// Key-value document store for room buffers
///
/// Implementations must make `write` an all-or-nothing replace of the
/// single document keyed by `room_id`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read the persisted buffer for a room
    ///
    /// `Ok(None)` means the room has never been flushed; callers treat it
    /// as the explicit empty document, not an error.
    async fn read(&self, room_id: Uuid) -> Result<Option<String>, StoreError>;

    /// Atomically replace the persisted buffer, tagged with the acting user
    async fn write(&self, room_id: Uuid, content: &str, author_id: &str) -> Result<(), StoreError>;
}

/// SQLite-backed document store
#[derive(Debug, Clone)]
pub struct SqliteDocumentStore {
    pool: SqlitePool,
}

impl SqliteDocumentStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn read(&self, room_id: Uuid) -> Result<Option<String>, StoreError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT content FROM room_buffers WHERE room_id = $1")
                .bind(room_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(content,)| content))
    }

    async fn write(&self, room_id: Uuid, content: &str, author_id: &str) -> Result<(), StoreError> {
        // Single-statement upsert: the document is replaced atomically.
        sqlx::query(
            r#"
            INSERT INTO room_buffers (room_id, content, author_id, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (room_id) DO UPDATE
            SET content = excluded.content,
                author_id = excluded.author_id,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(room_id)
        .bind(content)
        .bind(author_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

/// In-memory document store
///
/// Used by tests and by deployments that accept losing buffers on restart.
/// Records every write so tests can assert on coalescing behavior.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryStoreInner>,
}

#[derive(Debug, Default)]
struct MemoryStoreInner {
    documents: HashMap<Uuid, String>,
    writes: Vec<(Uuid, String, String)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a persisted document, bypassing the write log
    pub fn seed(&self, room_id: Uuid, content: impl Into<String>) {
        let mut inner = self.inner.lock().expect("memory store lock poisoned");
        inner.documents.insert(room_id, content.into());
    }

    /// Number of writes performed since creation
    pub fn write_count(&self) -> usize {
        self.inner.lock().expect("memory store lock poisoned").writes.len()
    }

    /// All writes performed, in order: (room, content, author)
    pub fn writes(&self) -> Vec<(Uuid, String, String)> {
        self.inner.lock().expect("memory store lock poisoned").writes.clone()
    }

    /// Current persisted document for a room
    pub fn document(&self, room_id: Uuid) -> Option<String> {
        self.inner
            .lock()
            .expect("memory store lock poisoned")
            .documents
            .get(&room_id)
            .cloned()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn read(&self, room_id: Uuid) -> Result<Option<String>, StoreError> {
        Ok(self.document(room_id))
    }

    async fn write(&self, room_id: Uuid, content: &str, author_id: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("memory store lock poisoned");
        inner.documents.insert(room_id, content.to_string());
        inner
            .writes
            .push((room_id, content.to_string(), author_id.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_read_absent_is_none() {
        let store = MemoryStore::new();
        let read = store.read(Uuid::new_v4()).await.unwrap();
        assert_eq!(read, None);
    }

    #[tokio::test]
    async fn test_memory_store_write_replaces() {
        let store = MemoryStore::new();
        let room = Uuid::new_v4();

        store.write(room, "x = 1", "alice").await.unwrap();
        store.write(room, "x = 2", "bob").await.unwrap();

        assert_eq!(store.read(room).await.unwrap().as_deref(), Some("x = 2"));
        assert_eq!(store.write_count(), 2);
        assert_eq!(store.writes()[1].2, "bob");
    }
}
