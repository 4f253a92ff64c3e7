//! Presence Module
//!
//! Ephemeral who-is-connected state, per room. The room actor owns a
//! `PresenceSet` and broadcasts `participants-update` on every join/leave;
//! the SSE subscription layer guarantees that a dropped transport issues
//! the same leave as an explicit one.

/// Connection-level presence bookkeeping
pub mod set;

pub use set::PresenceSet;
