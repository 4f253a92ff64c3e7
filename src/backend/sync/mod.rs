//! Sync Module
//!
//! The live channel between editors: SSE subscriptions fed by the room's
//! broadcast sender, and the role-gated publish path. Delivery is
//! best-effort, at-most-once, last-writer-wins at the receiver; lagging
//! receivers self-heal because every event carries the full buffer.

/// SSE subscription endpoint and delivery filtering
pub mod subscription;

/// Publish endpoint
pub mod handlers;

pub use subscription::room_events;
