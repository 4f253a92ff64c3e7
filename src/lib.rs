//! Codelab - Collaborative Coding Rooms
//!
//! Codelab is the collaborative coding room service of a campus portal:
//! multiple participants view and edit one shared code buffer per room,
//! see each other's edits with low latency, and have the buffer durably
//! persisted without every keystroke hitting storage.
//!
//! # Overview
//!
//! - **Room directory** - create, list and read admin-owned rooms
//! - **Presence** - ephemeral who-is-connected state, broadcast on change
//! - **Live sync** - per-room broadcast of edit events over SSE,
//!   last-writer-wins, no echo-back to the author
//! - **Persistence** - debounced, coalescing flushes of the buffer to a
//!   key-value document store, one atomic replace per room
//! - **Membership** - durable (room, user, role) grants with `edit`/`view`
//!   roles, admitted by the room admin via user search
//!
//! External collaborators are consumed, not implemented: the identity
//! provider (verified id/name headers), the user directory, the execution
//! sandbox, and the network transport primitive.
//!
//! # Module Structure
//!
//! - **`shared`** - wire types (rooms, participants, events, errors)
//! - **`backend`** - the Axum service itself
//!
//! # Concurrency Model
//!
//! Every open room is a serialized actor: one task owns the live buffer,
//! presence set and role grants, and processes commands in arrival order.
//! Rooms are independent; blocking I/O never runs on an actor loop.

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
pub mod backend;
