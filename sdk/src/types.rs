//! Data-model types shared across the pipeline

use serde::{Deserialize, Serialize};
use std::fmt;

/// The four kinds of input a session report is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceCategory {
    /// Conference program listing
    Program,

    /// Lightning-talk signup sheet (CSV)
    LightningTalks,

    /// Attendee list (CSV)
    Attendees,

    /// Free-text discussion notes
    Notes,
}

impl SourceCategory {
    /// All categories in resolution order
    pub const ALL: [SourceCategory; 4] = [
        SourceCategory::Program,
        SourceCategory::LightningTalks,
        SourceCategory::Attendees,
        SourceCategory::Notes,
    ];

    /// File name the category is staged under
    pub fn staged_name(&self) -> &'static str {
        match self {
            SourceCategory::Program => "program.html",
            SourceCategory::LightningTalks => "lightning_talks.csv",
            SourceCategory::Attendees => "attendees.csv",
            SourceCategory::Notes => "notes.txt",
        }
    }

    /// Program and lightning talks always come from configured URLs
    pub fn is_always_fetched(&self) -> bool {
        matches!(
            self,
            SourceCategory::Program | SourceCategory::LightningTalks
        )
    }
}

impl fmt::Display for SourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceCategory::Program => write!(f, "program"),
            SourceCategory::LightningTalks => write!(f, "lightning_talks"),
            SourceCategory::Attendees => write!(f, "attendees"),
            SourceCategory::Notes => write!(f, "notes"),
        }
    }
}

/// Verdict on the first line of a completion response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "code", rename_all = "snake_case")]
pub enum SentinelStatus {
    /// Normal report
    Ok,

    /// The model reported a known data-availability failure
    Error(String),
}

/// Text returned by the completion service plus its sentinel verdict
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResult {
    pub raw_text: String,
    pub sentinel_status: SentinelStatus,
}

impl CompletionResult {
    /// Returns true when no sentinel was detected
    pub fn is_ok(&self) -> bool {
        self.sentinel_status == SentinelStatus::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staged_names_are_distinct() {
        let mut names: Vec<_> = SourceCategory::ALL.iter().map(|c| c.staged_name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), SourceCategory::ALL.len());
    }

    #[test]
    fn test_always_fetched_categories() {
        assert!(SourceCategory::Program.is_always_fetched());
        assert!(SourceCategory::LightningTalks.is_always_fetched());
        assert!(!SourceCategory::Attendees.is_always_fetched());
        assert!(!SourceCategory::Notes.is_always_fetched());
    }

    #[test]
    fn test_sentinel_status_serialization() {
        let status = SentinelStatus::Error("ERROR: missing input".to_string());
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, r#"{"status":"error","code":"ERROR: missing input"}"#);

        let ok = serde_json::to_string(&SentinelStatus::Ok).unwrap();
        assert_eq!(ok, r#"{"status":"ok"}"#);
    }
}
