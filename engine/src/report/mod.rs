//! Report persistence
//!
//! An accepted response is written to the stable report path. A response
//! flagged by a sentinel goes to a timestamped `error_response_*.txt`
//! diagnostic file instead, so the previous good report is left intact.

use crate::config::OutputConfig;
use chrono::NaiveDateTime;
use sdk::errors::ReportError;
use sdk::types::{CompletionResult, SentinelStatus};
use std::fs;
use std::path::{Path, PathBuf};

const HEADER_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const FILE_TIME_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Where a response ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    /// Written to the stable report path
    Accepted { path: PathBuf },
    /// Written to a diagnostic path because a sentinel was detected
    Rejected { path: PathBuf, code: String },
}

impl PersistOutcome {
    pub fn path(&self) -> &Path {
        match self {
            PersistOutcome::Accepted { path } | PersistOutcome::Rejected { path, .. } => path,
        }
    }
}

/// Writes report and diagnostic artifacts
#[derive(Debug, Clone)]
pub struct ReportPersister {
    output_dir: PathBuf,
    report_file: String,
    report_title: String,
}

impl ReportPersister {
    pub fn new(config: &OutputConfig) -> Self {
        Self {
            output_dir: config.directory.clone(),
            report_file: config.report_file.clone(),
            report_title: config.report_title.clone(),
        }
    }

    /// Stable path of the accepted report
    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(&self.report_file)
    }

    /// Timestamped path of a diagnostic artifact
    pub fn diagnostic_path(&self, generated_at: NaiveDateTime) -> PathBuf {
        self.output_dir.join(format!(
            "error_response_{}.txt",
            generated_at.format(FILE_TIME_FORMAT)
        ))
    }

    /// Three comment header lines, a blank line, then the body
    pub fn render(&self, body: &str, group: &str, model: &str, generated_at: NaiveDateTime) -> String {
        format!(
            "# {}: {}\n# Generated: {}\n# Model: {}\n\n{}",
            self.report_title,
            group,
            generated_at.format(HEADER_TIME_FORMAT),
            model,
            body
        )
    }

    /// Write `result` to the report or diagnostic path depending on its verdict
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Io` if the output directory or file cannot be written.
    pub fn persist(
        &self,
        result: &CompletionResult,
        group: &str,
        model: &str,
        generated_at: NaiveDateTime,
    ) -> Result<PersistOutcome, ReportError> {
        fs::create_dir_all(&self.output_dir)?;
        let contents = self.render(&result.raw_text, group, model, generated_at);

        match &result.sentinel_status {
            SentinelStatus::Ok => {
                let path = self.report_path();
                fs::write(&path, contents)?;
                tracing::info!(
                    "Report saved to {} ({} characters)",
                    path.display(),
                    result.raw_text.chars().count()
                );
                Ok(PersistOutcome::Accepted { path })
            }
            SentinelStatus::Error(code) => {
                let path = self.diagnostic_path(generated_at);
                fs::write(&path, contents)?;
                tracing::warn!("Diagnostic response saved to {}", path.display());
                Ok(PersistOutcome::Rejected {
                    path,
                    code: code.clone(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 7, 30)
            .unwrap()
            .and_hms_opt(14, 5, 9)
            .unwrap()
    }

    fn persister(dir: &Path) -> ReportPersister {
        ReportPersister::new(&OutputConfig {
            directory: dir.to_path_buf(),
            ..OutputConfig::default()
        })
    }

    #[test]
    fn test_accepted_report_written_with_header() {
        let temp = TempDir::new().unwrap();
        let persister = persister(temp.path());
        let result = CompletionResult {
            raw_text: "## Summary\nGreat session.".to_string(),
            sentinel_status: SentinelStatus::Ok,
        };

        let outcome = persister.persist(&result, "DWARF", "gpt-4o-mini", at()).unwrap();

        assert_eq!(
            outcome,
            PersistOutcome::Accepted {
                path: temp.path().join("draft_report.txt")
            }
        );
        let written = fs::read_to_string(outcome.path()).unwrap();
        assert_eq!(
            written,
            "# Session Report Draft: DWARF\n# Generated: 2025-07-30 14:05:09\n# Model: gpt-4o-mini\n\n## Summary\nGreat session."
        );
    }

    #[test]
    fn test_rejected_report_goes_to_diagnostic_path() {
        let temp = TempDir::new().unwrap();
        let persister = persister(temp.path());
        fs::write(persister.report_path(), "previous good report").unwrap();

        let result = CompletionResult {
            raw_text: "ERROR: missing input\nNo notes.".to_string(),
            sentinel_status: SentinelStatus::Error("ERROR: missing input".to_string()),
        };

        let outcome = persister.persist(&result, "DWARF", "gpt-4o-mini", at()).unwrap();

        let expected = temp.path().join("error_response_20250730_140509.txt");
        assert_eq!(
            outcome,
            PersistOutcome::Rejected {
                path: expected.clone(),
                code: "ERROR: missing input".to_string()
            }
        );
        assert!(fs::read_to_string(&expected)
            .unwrap()
            .ends_with("\n\nERROR: missing input\nNo notes."));
        assert_eq!(
            fs::read_to_string(persister.report_path()).unwrap(),
            "previous good report"
        );
    }

    #[test]
    fn test_output_directory_created() {
        let temp = TempDir::new().unwrap();
        let persister = persister(&temp.path().join("reports/2025"));
        let result = CompletionResult {
            raw_text: "body".to_string(),
            sentinel_status: SentinelStatus::Ok,
        };

        let outcome = persister.persist(&result, "AI", "m", at()).unwrap();
        assert!(outcome.path().is_file());
    }
}
