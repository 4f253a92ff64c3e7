//! Shared Module
//!
//! Types and data structures shared between the service and its clients.
//! Everything here is designed for serialization and transmission over
//! HTTP/SSE; field names follow the camelCase wire contract.

/// Room, participant and edit-event data structures
pub mod room;

/// Room live-channel event system
pub mod event;

/// Shared error types
pub mod error;

/// Re-export commonly used types for convenience
pub use error::SharedError;
pub use event::{EventKind, RoomEvent};
pub use room::{
    EditEvent, Participant, ParticipantInfo, Role, Room, RoomSummary, UserIdentity,
};
