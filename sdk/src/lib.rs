//! Session Report SDK
//!
//! Shared error taxonomy and data-model types for the session report
//! generator. The engine crate and its integration tests both depend on it.

/// Error types and handling
pub mod errors;

/// Data-model types shared across the pipeline
pub mod types;

// Re-export commonly used types
pub use errors::{ReportError, ReportErrorExt};
pub use types::{CompletionResult, SentinelStatus, SourceCategory};
