//! Backend Error Module
//!
//! Service error taxonomy and its HTTP response conversion.
//!
//! - **`types`** - `ApiError` definition and constructors
//! - **`conversion`** - `IntoResponse` implementation

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::ApiError;
