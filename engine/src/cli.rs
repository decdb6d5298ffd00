//! CLI interface
//!
//! One invocation generates the report for exactly one breakout group.

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;
use crate::handlers::ReportRequest;

/// Conference session report generator
///
/// Gathers the lightning talks, attendee list, and discussion notes for one
/// breakout group and asks a hosted model to draft the session report.
#[derive(Parser, Debug)]
#[command(name = "session-report")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Target breakout group name or acronym
    #[arg(short, long, value_name = "NAME")]
    pub group: String,

    /// Attendee data: URL or local CSV path
    #[arg(short, long, value_name = "URL|PATH")]
    pub participants: Option<String>,

    /// Discussion notes: URL (Google Docs links supported) or local path
    #[arg(short, long, value_name = "URL|PATH")]
    pub notes: Option<String>,

    /// Configuration file (YAML, or TOML by extension)
    #[arg(long, value_name = "PATH", default_value = "config.yaml")]
    pub config: PathBuf,

    /// Secrets file holding the provider API key
    #[arg(long, value_name = "PATH", default_value = "secrets.yml")]
    pub secrets: PathBuf,

    /// Master prompt file
    #[arg(long, value_name = "PATH", default_value = "master_prompt.yaml")]
    pub master_prompt: PathBuf,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL")]
    pub log: Option<String>,

    /// Override the staging directory
    #[arg(long, value_name = "PATH")]
    pub staging_dir: Option<PathBuf>,

    /// Override the report output directory
    #[arg(long, value_name = "PATH")]
    pub output_dir: Option<PathBuf>,

    /// Assemble and print the prompt without calling the completion service
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// Apply directory overrides on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(dir) = &self.staging_dir {
            config.staging.directory = dir.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output.directory = dir.clone();
        }
    }

    pub fn request(&self) -> ReportRequest {
        ReportRequest {
            group: self.group.clone(),
            participants: self.participants.clone(),
            notes: self.notes.clone(),
            secrets_path: self.secrets.clone(),
            master_prompt_path: self.master_prompt.clone(),
            dry_run: self.dry_run,
        }
    }
}
