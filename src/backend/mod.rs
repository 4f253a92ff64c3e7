//! Backend Module
//!
//! The collaborative coding room service: an Axum HTTP server where each
//! open room runs as a serialized actor owning the shared buffer, presence
//! set and role grants, with edits fanned out over per-room broadcast
//! channels and persisted by a debounced, coalescing flusher.
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── server/      - initialization, state, configuration
//! ├── routes/      - route configuration
//! ├── rooms/       - room directory, per-room actor, registry
//! ├── presence/    - who-is-connected bookkeeping
//! ├── sync/        - SSE subscriptions and the publish path
//! ├── persist/     - durable buffer store and flush scheduling
//! ├── membership/  - participant grants, search, admission
//! ├── directory/   - user directory collaborator client
//! ├── sandbox/     - execution sandbox collaborator client
//! ├── middleware/  - verified-identity extraction
//! ├── debounce     - keyed cancellable-task debouncer
//! └── error/       - error taxonomy and HTTP conversion
//! ```
//!
//! # Concurrency
//!
//! All operations for one room are processed in arrival order on that
//! room's actor task; different rooms are fully independent. Store,
//! directory and sandbox calls are async and never run on an actor loop.
//! The debounce timer is the only cancellable unit of work: a new edit
//! aborts and reschedules the pending flush for its (room, session).

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Room directory and per-room actors
pub mod rooms;

/// Presence bookkeeping
pub mod presence;

/// Live synchronization channel
pub mod sync;

/// Debounced durable persistence
pub mod persist;

/// Membership and role registry
pub mod membership;

/// User directory collaborator
pub mod directory;

/// Execution sandbox collaborator
pub mod sandbox;

/// Request middleware
pub mod middleware;

/// Keyed cancellable-task debouncer
pub mod debounce;

/// Backend error types
pub mod error;

/// Re-export commonly used types
pub use error::ApiError;
pub use server::{create_app, AppState};
