//! Persistence Module
//!
//! The only writer of durable room buffers. `store` holds the key-value
//! document store (one atomic replace per room); `scheduler` owns the
//! debounce-and-coalesce policy that turns bursts of edits into single
//! writes.

/// Durable buffer store trait and implementations
pub mod store;

/// Debounced flush scheduling
pub mod scheduler;

pub use scheduler::FlushScheduler;
pub use store::{DocumentStore, MemoryStore, SqliteDocumentStore, StoreError};
