//! Sandbox Module
//!
//! Client and endpoint for the external code-execution sandbox.

/// Sandbox HTTP client
pub mod client;

/// Run-code endpoint
pub mod handlers;

pub use client::{CompileOutcome, SandboxClient};
