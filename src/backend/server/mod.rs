//! Server Module
//!
//! Server initialization and shared state.
//!
//! - **`state`** - `AppState` and `FromRef` implementations
//! - **`config`** - environment loading and policy constants
//! - **`init`** - application assembly

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

// Re-export commonly used types
pub use init::create_app;
pub use state::AppState;
