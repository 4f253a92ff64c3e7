//! Rooms Module
//!
//! The room directory and the live heart of the service: the per-room
//! serialized actor.
//!
//! - **`db`** - room metadata CRUD
//! - **`handlers`** - lifecycle endpoints (create, list, read, buffer)
//! - **`actor`** - the per-room task owning buffer, presence and roles
//! - **`registry`** - open-room map with the seeding sequence and idle
//!   eviction

/// Room metadata CRUD
pub mod db;

/// Room lifecycle endpoints
pub mod handlers;

/// Per-room serialized actor
pub mod actor;

/// Open-room registry
pub mod registry;

// Re-export commonly used types
pub use actor::{PublishOutcome, RoomHandle};
pub use registry::RoomRegistry;
