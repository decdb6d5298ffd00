//! Response validation
//!
//! The master prompt asks the model to start its answer with a fixed
//! error code when required input is missing. Only the first line of the
//! response is checked, against each sentinel in order, with a
//! case-sensitive substring test. Nothing guarantees the model follows
//! this convention, so a clean verdict is best effort.

use sdk::types::{CompletionResult, SentinelStatus};

/// Known sentinel codes, in the order they are checked
pub const SENTINEL_CODES: [&str; 6] = [
    "ERROR: lightning talks URL inaccessible",
    "ERROR: program information not found",
    "ERROR: notes URL not found",
    "ERROR: participants URL not found",
    "ERROR: local files not found",
    "ERROR: missing input",
];

/// Classifies completion responses by their first line
#[derive(Debug, Clone)]
pub struct ResponseValidator {
    sentinels: Vec<String>,
}

impl Default for ResponseValidator {
    fn default() -> Self {
        Self::with_sentinels(SENTINEL_CODES)
    }
}

impl ResponseValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sentinels<I, S>(sentinels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sentinels: sentinels.into_iter().map(Into::into).collect(),
        }
    }

    /// First sentinel contained in the first line, if any
    ///
    /// The first line is taken as is: a response opening with a blank line
    /// has an empty first line and is never flagged.
    pub fn detect(&self, text: &str) -> Option<&str> {
        let first_line = text.lines().next().unwrap_or_default();

        self.sentinels
            .iter()
            .find(|code| first_line.contains(code.as_str()))
            .map(String::as_str)
    }

    /// Attach a sentinel verdict to the raw response
    pub fn classify(&self, raw_text: String) -> CompletionResult {
        let sentinel_status = match self.detect(&raw_text) {
            Some(code) => {
                tracing::warn!("Response flagged with sentinel: {}", code);
                SentinelStatus::Error(code.to_string())
            }
            None => SentinelStatus::Ok,
        };

        CompletionResult {
            raw_text,
            sentinel_status,
        }
    }
}
