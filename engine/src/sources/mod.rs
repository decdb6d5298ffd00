//! Source acquisition and fallback
//!
//! Each of the four source categories is resolved to at most one staged
//! payload. Program and lightning talks are always fetched from their
//! configured URLs. Attendees and notes follow a strict priority chain:
//!
//! 1. a caller-supplied HTTP(S) URL (Google Docs edit links are rewritten to
//!    the plain-text export for notes)
//! 2. a caller-supplied local path, copied byte for byte
//! 3. with no caller value, the first existing conventional file name
//!
//! Every failure here is recoverable: the category is simply left
//! unresolved and the run continues.

pub mod fetch;
pub mod strategy;

pub use fetch::{google_doc_export_url, HttpFetcher};
pub use strategy::{LocalFile, RemoteUrl, SourceStrategy};

use crate::config::DataSourcesConfig;
use crate::staging::StagingArea;
use sdk::errors::{ReportError, ReportErrorExt};
use sdk::types::SourceCategory;
use std::path::{Path, PathBuf};

/// Conventional notes file stems, in preference order
pub const NOTES_STEMS: [&str; 3] = ["discussion_notes", "notes", "meeting_notes"];

/// Extensions tried for each notes stem, in preference order
pub const NOTES_EXTENSIONS: [&str; 3] = ["txt", "docx", "pdf"];

/// Conventional attendee file stems, in preference order
pub const ATTENDEE_STEMS: [&str; 3] = ["attendees", "participants", "registrants"];

/// Extensions tried for each attendee stem
pub const ATTENDEE_EXTENSIONS: [&str; 1] = ["csv"];

/// A caller-supplied value for an optional source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOverride {
    Url(String),
    Path(PathBuf),
}

impl SourceOverride {
    /// Values starting with an HTTP(S) scheme are URLs, anything else a path
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            SourceOverride::Url(trimmed.to_string())
        } else {
            SourceOverride::Path(PathBuf::from(trimmed))
        }
    }
}

/// How one category is to be resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    pub category: SourceCategory,
    /// Configured URL for always-fetched categories
    pub configured_url: Option<String>,
    /// Caller override for optional categories
    pub user_override: Option<SourceOverride>,
}

impl SourceSpec {
    /// Spec for an always-fetched category
    pub fn fetched(category: SourceCategory, url: Option<String>) -> Self {
        Self {
            category,
            configured_url: url,
            user_override: None,
        }
    }

    /// Spec for an optional category with an optional caller value
    pub fn optional(category: SourceCategory, value: Option<&str>) -> Self {
        Self {
            category,
            configured_url: None,
            user_override: value
                .filter(|v| !v.trim().is_empty())
                .map(SourceOverride::parse),
        }
    }

    /// Build the ordered candidate chain for this category
    ///
    /// Conventional file names are only consulted when the caller gave no
    /// value; a bad caller value does not fall through to them.
    pub fn strategies(&self, search_dir: &Path) -> Vec<Box<dyn SourceStrategy>> {
        if self.category.is_always_fetched() {
            return self
                .configured_url
                .iter()
                .map(|url| Box::new(RemoteUrl::new(url.clone())) as Box<dyn SourceStrategy>)
                .collect();
        }

        match &self.user_override {
            Some(SourceOverride::Url(url)) => {
                let url = match self.category {
                    SourceCategory::Notes => {
                        google_doc_export_url(url).unwrap_or_else(|| url.clone())
                    }
                    _ => url.clone(),
                };
                vec![Box::new(RemoteUrl::new(url))]
            }
            Some(SourceOverride::Path(path)) => vec![Box::new(LocalFile::new(path.clone()))],
            None => conventional_candidates(self.category, search_dir)
                .into_iter()
                .map(|path| Box::new(LocalFile::new(path)) as Box<dyn SourceStrategy>)
                .collect(),
        }
    }
}

/// Conventional local file names for a category, in the order they are tried
pub fn conventional_candidates(category: SourceCategory, search_dir: &Path) -> Vec<PathBuf> {
    let (stems, extensions): (&[&str], &[&str]) = match category {
        SourceCategory::Notes => (&NOTES_STEMS[..], &NOTES_EXTENSIONS[..]),
        SourceCategory::Attendees => (&ATTENDEE_STEMS[..], &ATTENDEE_EXTENSIONS[..]),
        _ => return Vec::new(),
    };

    stems
        .iter()
        .flat_map(move |stem| {
            extensions
                .iter()
                .map(move |ext| search_dir.join(format!("{}.{}", stem, ext)))
        })
        .collect()
}

/// Build the four specs for one run
pub fn default_specs(
    data_sources: &DataSourcesConfig,
    participants: Option<&str>,
    notes: Option<&str>,
) -> Vec<SourceSpec> {
    vec![
        SourceSpec::fetched(SourceCategory::Program, data_sources.program_url.clone()),
        SourceSpec::fetched(
            SourceCategory::LightningTalks,
            data_sources.lightning_talks_url.clone(),
        ),
        SourceSpec::optional(SourceCategory::Attendees, participants),
        SourceSpec::optional(SourceCategory::Notes, notes),
    ]
}

/// Result of resolving one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOutcome {
    Resolved { origin: String, bytes: usize },
    Unavailable { reason: String },
}

impl SourceOutcome {
    pub fn is_resolved(&self) -> bool {
        matches!(self, SourceOutcome::Resolved { .. })
    }
}

/// Per-category outcomes of a run's source resolution
#[derive(Debug, Clone, Default)]
pub struct ResolutionReport {
    entries: Vec<(SourceCategory, SourceOutcome)>,
}

impl ResolutionReport {
    pub fn entries(&self) -> &[(SourceCategory, SourceOutcome)] {
        &self.entries
    }

    pub fn outcome(&self, category: SourceCategory) -> Option<&SourceOutcome> {
        self.entries
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, outcome)| outcome)
    }

    pub fn resolved_count(&self) -> usize {
        self.entries.iter().filter(|(_, o)| o.is_resolved()).count()
    }

    pub fn unavailable_count(&self) -> usize {
        self.entries.len() - self.resolved_count()
    }
}

/// Resolves source specs into staged payloads
pub struct SourceResolver {
    fetcher: HttpFetcher,
    search_dir: PathBuf,
}

impl SourceResolver {
    pub fn new(fetcher: HttpFetcher, search_dir: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            search_dir: search_dir.into(),
        }
    }

    /// Resolve one category, staging the first candidate that succeeds
    ///
    /// A candidate that cannot be acquired is skipped in favour of the next
    /// one. When none is left the category is reported unavailable.
    ///
    /// # Errors
    ///
    /// Returns the underlying error when a failure is not recoverable,
    /// e.g. an acquired payload cannot be written to the staging area.
    pub async fn resolve(
        &self,
        spec: &SourceSpec,
        staging: &StagingArea,
    ) -> Result<SourceOutcome, ReportError> {
        let category = spec.category;
        let strategies = spec.strategies(&self.search_dir);

        if strategies.is_empty() {
            let reason = if category.is_always_fetched() {
                "no URL configured".to_string()
            } else {
                "no candidate sources".to_string()
            };
            tracing::warn!("{}", ReportError::SourceUnavailable { category, reason: reason.clone() });
            return Ok(SourceOutcome::Unavailable { reason });
        }

        let mut last_error = None;
        for strategy in &strategies {
            let origin = strategy.describe();
            match self.try_candidate(strategy.as_ref(), spec, staging).await {
                Ok(bytes) => {
                    tracing::info!("Resolved {} from {} ({} bytes)", category, origin, bytes);
                    return Ok(SourceOutcome::Resolved { origin, bytes });
                }
                Err(e) if e.is_recoverable() => {
                    tracing::debug!("Candidate {} for {} failed: {}", origin, category, e);
                    let reason = match e {
                        ReportError::SourceUnavailable { reason, .. } => reason,
                        other => other.to_string(),
                    };
                    last_error = Some(format!("{}: {}", origin, reason));
                }
                Err(e) => {
                    tracing::error!("Resolving {} from {} failed: {}", category, origin, e);
                    return Err(e);
                }
            }
        }

        let reason = if spec.user_override.is_none() && !category.is_always_fetched() {
            format!(
                "none of the conventional {} files exist in {}",
                category,
                self.search_dir.display()
            )
        } else {
            last_error.unwrap_or_else(|| "unknown failure".to_string())
        };

        tracing::warn!(
            "{}",
            ReportError::SourceUnavailable {
                category,
                reason: reason.clone()
            }
        );
        Ok(SourceOutcome::Unavailable { reason })
    }

    /// Acquire one candidate and stage it
    ///
    /// Acquisition failures come back as `SourceUnavailable`; staging
    /// failures keep their own error.
    async fn try_candidate(
        &self,
        strategy: &dyn SourceStrategy,
        spec: &SourceSpec,
        staging: &StagingArea,
    ) -> Result<usize, ReportError> {
        let bytes = strategy
            .acquire(&self.fetcher)
            .await
            .map_err(|e| ReportError::SourceUnavailable {
                category: spec.category,
                reason: e.to_string(),
            })?;
        staging.write(spec.category, &bytes)?;
        Ok(bytes.len())
    }

    /// Resolve all specs in order and log the tally
    ///
    /// # Errors
    ///
    /// Stops at the first unrecoverable error from [`SourceResolver::resolve`].
    pub async fn resolve_all(
        &self,
        specs: &[SourceSpec],
        staging: &StagingArea,
    ) -> Result<ResolutionReport, ReportError> {
        let mut report = ResolutionReport::default();

        for spec in specs {
            let outcome = self.resolve(spec, staging).await?;
            report.entries.push((spec.category, outcome));
        }

        tracing::info!(
            "Resolved {}/{} sources ({} unavailable)",
            report.resolved_count(),
            report.entries.len(),
            report.unavailable_count()
        );
        Ok(report)
    }
}
