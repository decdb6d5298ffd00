//! Command handlers for CLI operations
//!
//! `generate_report` drives one run end to end:
//! - load the master prompt and, unless dry-running, the credential
//! - reset staging and resolve every source category
//! - filter lightning talks for the target group
//! - assemble the prompt, invoke the model, classify and persist the response

use anyhow::{bail, Context, Result};
use chrono::Local;
use std::path::PathBuf;

use crate::config::{load_master_prompt, Config};
use crate::llm::{build_provider, CompletionInvoker};
use crate::prompt::{PromptAssembler, PromptDocument, SectionKind};
use crate::report::{PersistOutcome, ReportPersister};
use crate::secrets::Secrets;
use crate::sources::{default_specs, HttpFetcher, ResolutionReport, SourceOutcome, SourceResolver};
use crate::staging::StagingArea;
use crate::talks::{FilteredTalks, LightningTalkFilter};
use crate::validate::ResponseValidator;
use sdk::errors::{ReportError, ReportErrorExt};
use sdk::types::SourceCategory;

/// Per-run inputs that do not come from the configuration file
#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub group: String,
    pub participants: Option<String>,
    pub notes: Option<String>,
    pub secrets_path: PathBuf,
    pub master_prompt_path: PathBuf,
    pub dry_run: bool,
}

/// What happened before the completion call
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub group: String,
    pub sources: ResolutionReport,
    pub talks_scanned: usize,
    pub talks_matched: usize,
    pub sections: Vec<SectionKind>,
}

/// Terminal state of a run
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// Prompt assembled, completion service not called
    DryRun { summary: RunSummary, prompt: String },
    /// Report written to the stable path
    Accepted { summary: RunSummary, path: PathBuf },
    /// Model reported a sentinel; diagnostic artifact written
    Rejected {
        summary: RunSummary,
        path: PathBuf,
        code: String,
        body: String,
    },
}

impl RunOutcome {
    pub fn summary(&self) -> &RunSummary {
        match self {
            RunOutcome::DryRun { summary, .. }
            | RunOutcome::Accepted { summary, .. }
            | RunOutcome::Rejected { summary, .. } => summary,
        }
    }

    /// Error carried by a run that finished without a report
    pub fn error(&self) -> Option<ReportError> {
        match self {
            RunOutcome::Rejected { code, .. } => Some(ReportError::ContentValidation(code.clone())),
            _ => None,
        }
    }

    /// Process exit status for this outcome
    pub fn exit_code(&self) -> u8 {
        if self.error().is_some() {
            1
        } else {
            0
        }
    }
}

/// Generate the session report for one breakout group
///
/// Configuration, credential and master-prompt problems are fatal and
/// surface before any source is touched. Source and lightning-talk
/// problems only shrink the prompt.
///
/// # Errors
///
/// Returns the underlying `ReportError` (wrapped in `anyhow`) for fatal
/// configuration problems, staging failures, completion-service failures
/// and artifact write failures.
pub async fn generate_report(request: &ReportRequest, config: &Config) -> Result<RunOutcome> {
    let group = request.group.trim();
    if group.is_empty() {
        bail!(ReportError::Config(
            "Target group must not be empty".to_string()
        ));
    }

    let master_prompt = load_master_prompt(&request.master_prompt_path)?;

    let invoker = if request.dry_run {
        None
    } else {
        let secrets = Secrets::load_from_path(&request.secrets_path)?;
        let api_key = secrets.get(&config.model.secret_key())?;
        let provider = build_provider(&config.model, api_key)?;
        Some(CompletionInvoker::new(
            provider,
            config.system.system_message.clone(),
        ))
    };

    let staging = StagingArea::reset(&config.staging.directory).with_context(|| {
        format!(
            "Failed to prepare staging directory {}",
            config.staging.directory.display()
        )
    })?;
    let resolver = SourceResolver::new(HttpFetcher::new()?, &config.data_sources.search_dir);
    let specs = default_specs(
        &config.data_sources,
        request.participants.as_deref(),
        request.notes.as_deref(),
    );
    let sources = resolver.resolve_all(&specs, &staging).await?;
    tracing::debug!("Sources staged under {}", staging.root().display());

    let talks = filter_talks(&staging, group)?;

    let prompt = PromptAssembler::new(master_prompt, group)
        .lightning_talks(talks.block())
        .attendees(staging.read_text(SourceCategory::Attendees)?)
        .notes(staging.read_text(SourceCategory::Notes)?)
        .build();

    let summary = RunSummary {
        group: group.to_string(),
        sources,
        talks_scanned: talks.scanned,
        talks_matched: talks.matched.len(),
        sections: section_kinds(&prompt),
    };

    let Some(invoker) = invoker else {
        tracing::info!("Dry run: skipping completion call");
        return Ok(RunOutcome::DryRun {
            summary,
            prompt: prompt.render(),
        });
    };

    let raw_text = invoker.invoke(&prompt.render()).await?;
    let result = ResponseValidator::new().classify(raw_text);

    let persister = ReportPersister::new(&config.output);
    let outcome = persister
        .persist(&result, group, invoker.model(), Local::now().naive_local())
        .context("Failed to write report artifact")?;

    Ok(match outcome {
        PersistOutcome::Accepted { path } => RunOutcome::Accepted { summary, path },
        PersistOutcome::Rejected { path, code } => RunOutcome::Rejected {
            summary,
            path,
            code,
            body: result.raw_text,
        },
    })
}

/// Filter the staged lightning talks, if any
///
/// An unreadable or malformed talks payload yields an empty selection.
fn filter_talks(staging: &StagingArea, group: &str) -> Result<FilteredTalks> {
    let Some(payload) = staging.read_text(SourceCategory::LightningTalks)? else {
        tracing::info!("No lightning talks staged");
        return Ok(FilteredTalks::default());
    };

    match LightningTalkFilter::new().filter(&payload, group) {
        Ok(talks) => Ok(talks),
        Err(e) => {
            tracing::warn!("Skipping lightning talks: {}", e);
            Ok(FilteredTalks::default())
        }
    }
}

fn section_kinds(prompt: &PromptDocument) -> Vec<SectionKind> {
    prompt.sections().iter().map(|s| s.kind).collect()
}

/// Print the human-readable run summary to stdout
pub fn print_summary(outcome: &RunOutcome) {
    let summary = outcome.summary();

    println!("Target group: {}", summary.group);
    println!(
        "Sources resolved: {}/{}",
        summary.sources.resolved_count(),
        summary.sources.entries().len()
    );
    for (category, source) in summary.sources.entries() {
        match source {
            SourceOutcome::Resolved { origin, bytes } => {
                println!("  {:<15} {} ({} bytes)", category.to_string(), origin, bytes)
            }
            SourceOutcome::Unavailable { reason } => {
                println!("  {:<15} unavailable ({})", category.to_string(), reason)
            }
        }
    }
    println!(
        "Lightning talks matched: {} of {}",
        summary.talks_matched, summary.talks_scanned
    );

    match outcome {
        RunOutcome::DryRun { prompt, .. } => {
            let labels: Vec<String> = summary.sections.iter().map(|k| k.to_string()).collect();
            println!("Prompt sections: {}", labels.join(", "));
            println!();
            println!("{}", prompt);
        }
        RunOutcome::Accepted { path, .. } => {
            println!("Report saved to: {}", path.display());
        }
        RunOutcome::Rejected {
            path, code, body, ..
        } => {
            println!("Model reported an error: {}", code);
            println!("Diagnostic response saved to: {}", path.display());
            println!();
            println!("{}", body);
        }
    }

    if let Some(error) = outcome.error() {
        tracing::warn!("{}", error);
        eprintln!("Hint: {}", error.user_hint());
    }
}
