//! Membership Module
//!
//! Durable (room, user, role) grants and the admin-gated admission flow.
//! Distinct from presence: leaving a room affects who is connected, never
//! who is a member.

/// Participant grant persistence
pub mod db;

/// Search and admission endpoints
pub mod handlers;
