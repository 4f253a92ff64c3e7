//! Middleware Module
//!
//! Request-processing extractors shared by all handlers.

/// Verified-identity extraction
pub mod auth;

pub use auth::Identity;
