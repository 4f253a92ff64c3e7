//! User Directory Module
//!
//! Client for the external user directory collaborator.

/// Directory HTTP client
pub mod client;

pub use client::{DirectoryClient, DirectoryUser};
