//! Error types and handling
//!
//! This module provides the error types used throughout the session report
//! generator. All errors implement the `ReportErrorExt` trait which provides
//! user-friendly hints and indicates whether the run can continue.
//!
//! # Error Categories
//!
//! - **Configuration**: missing or unreadable config, secrets, or master prompt
//! - **Source**: a data source could not be fetched or copied
//! - **Completion service**: the hosted model call failed
//! - **Content validation**: the model answered with a sentinel error code
//!
//! Only source-level failures are recoverable: the affected category is
//! dropped from the prompt and the run continues.

use crate::types::SourceCategory;
use thiserror::Error;

/// Trait for report error extensions
pub trait ReportErrorExt {
    /// Returns a user-friendly hint for the error
    ///
    /// The hint never contains secrets or the raw error payload.
    fn user_hint(&self) -> &str;

    /// Returns whether the run can continue after this error
    fn is_recoverable(&self) -> bool;
}

/// Main error type for a report run
///
/// # Examples
///
/// ```
/// use sdk::errors::{ReportError, ReportErrorExt};
/// use sdk::types::SourceCategory;
///
/// let error = ReportError::SourceUnavailable {
///     category: SourceCategory::Notes,
///     reason: "HTTP 404".to_string(),
/// };
/// assert!(error.is_recoverable());
///
/// let fatal = ReportError::CompletionService("timeout".to_string());
/// assert!(!fatal.is_recoverable());
/// ```
#[derive(Debug, Error)]
pub enum ReportError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing secret: {0}")]
    MissingSecret(String),

    #[error("Master prompt error: {0}")]
    MasterPrompt(String),

    // Source errors
    #[error("Source unavailable for {category}: {reason}")]
    SourceUnavailable {
        category: SourceCategory,
        reason: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    // Completion service errors
    #[error("Completion service error: {0}")]
    CompletionService(String),

    // Response errors
    #[error("Response rejected with sentinel: {0}")]
    ContentValidation(String),

    // Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReportErrorExt for ReportError {
    fn user_hint(&self) -> &str {
        match self {
            Self::Config(_) => "Check your configuration file for errors",
            Self::MissingSecret(_) => "Add the API key for the configured provider to the secrets file",
            Self::MasterPrompt(_) => "Check that the master prompt file defines 'master_prompt'",

            Self::SourceUnavailable { .. } => {
                "Source skipped. The report will be generated without it"
            }
            Self::Network(_) => "Network operation failed. Check your connection",

            Self::CompletionService(_) => {
                "Completion service unavailable. Check your API key and network"
            }

            Self::ContentValidation(_) => {
                "The model reported missing input data. See the diagnostic file"
            }

            Self::Io(_) => "File system operation failed",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::SourceUnavailable { .. } | Self::Network(_))
    }
}
