//! Configuration management
//!
//! This module handles loading and validation of the session report
//! configuration. The configuration document is YAML by default; a `.toml`
//! extension switches the parser to TOML.
//!
//! # Configuration Sections
//!
//! - **data_sources**: program and lightning-talk URLs, local search directory
//! - **model**: completion provider, model name, token budget, temperature
//! - **system**: system instruction and log level
//! - **staging**: working directory for resolved payloads
//! - **output**: report directory, file name, and title
//!
//! # Examples
//!
//! ```no_run
//! use session_report::config::Config;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load_from_path(Path::new("config.yaml"))?;
//! println!("Model: {}", config.model.name);
//! # Ok(())
//! # }
//! ```

pub mod document;

use sdk::errors::ReportError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use document::{read_document, DocumentFormat};

/// Providers the completion invoker knows how to call
pub const VALID_PROVIDERS: [&str; 2] = ["openai", "anthropic"];

const VALID_LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote data sources
    #[serde(default)]
    pub data_sources: DataSourcesConfig,

    /// Completion model settings
    #[serde(default)]
    pub model: ModelConfig,

    /// System instruction and logging
    #[serde(default)]
    pub system: SystemConfig,

    /// Staging directory
    #[serde(default)]
    pub staging: StagingConfig,

    /// Report output
    #[serde(default)]
    pub output: OutputConfig,
}

/// Remote data source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSourcesConfig {
    /// Conference program listing URL
    #[serde(default)]
    pub program_url: Option<String>,

    /// Lightning-talk signup sheet URL (CSV export)
    #[serde(default)]
    pub lightning_talks_url: Option<String>,

    /// Directory searched for conventional attendee and notes files
    #[serde(default = "default_search_dir")]
    pub search_dir: PathBuf,
}

/// Completion model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Provider name (openai, anthropic)
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model identifier sent to the provider
    #[serde(default = "default_model_name")]
    pub name: String,

    /// Maximum output tokens
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Base URL override for the provider API
    #[serde(default)]
    pub base_url: Option<String>,
    // Note: API key lives in the secrets document, not in config
}

/// System instruction and logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Instruction sent as the system message with every prompt
    #[serde(default = "default_system_message")]
    pub system_message: String,

    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Staging directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagingConfig {
    /// Directory wiped and recreated at the start of every run
    #[serde(default = "default_staging_dir")]
    pub directory: PathBuf,
}

/// Report output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory reports and diagnostics are written to
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,

    /// File name of the accepted report
    #[serde(default = "default_report_file")]
    pub report_file: String,

    /// Label written on the first header line
    #[serde(default = "default_report_title")]
    pub report_title: String,
}

// Default value functions
fn default_search_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_model_name() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_tokens() -> u32 {
    4000
}

fn default_temperature() -> f64 {
    0.7
}

fn default_system_message() -> String {
    "You are a helpful assistant that generates detailed session reports for technical conferences."
        .to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_staging_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_report_file() -> String {
    "draft_report.txt".to_string()
}

fn default_report_title() -> String {
    "Session Report Draft".to_string()
}

impl Default for DataSourcesConfig {
    fn default() -> Self {
        Self {
            program_url: None,
            lightning_talks_url: None,
            search_dir: default_search_dir(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            name: default_model_name(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            base_url: None,
        }
    }
}

impl ModelConfig {
    /// Base URL of the provider API, falling back to the provider's public endpoint
    pub fn base_url(&self) -> &str {
        match self.base_url.as_deref() {
            Some(url) => url.trim_end_matches('/'),
            None if self.provider == "anthropic" => "https://api.anthropic.com/v1",
            None => "https://api.openai.com/v1",
        }
    }

    /// Key under which the provider credential is stored in the secrets document
    pub fn secret_key(&self) -> String {
        format!("{}_api_key", self.provider)
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            system_message: default_system_message(),
            log_level: default_log_level(),
        }
    }
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            directory: default_staging_dir(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            report_file: default_report_file(),
            report_title: default_report_title(),
        }
    }
}

impl Config {
    /// Load configuration from a specific path
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Config` if:
    /// - File cannot be read
    /// - YAML/TOML parsing fails
    /// - Validation fails
    pub fn load_from_path(path: &Path) -> Result<Self, ReportError> {
        let mut config: Config = read_document(path)
            .map_err(|e| ReportError::Config(format!("{}: {}", path.display(), e)))?;

        config.validate()?;

        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from a string in the given format
    pub fn from_str_with_format(contents: &str, format: DocumentFormat) -> Result<Self, ReportError> {
        let mut config: Config = format
            .parse(contents)
            .map_err(|e| ReportError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// Blank URL strings are normalized to `None` so that an empty key in
    /// the document behaves like an absent one.
    fn validate(&mut self) -> Result<(), ReportError> {
        if !VALID_LOG_LEVELS.contains(&self.system.log_level.as_str()) {
            return Err(ReportError::Config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.system.log_level,
                VALID_LOG_LEVELS.join(", ")
            )));
        }

        if !VALID_PROVIDERS.contains(&self.model.provider.as_str()) {
            return Err(ReportError::Config(format!(
                "Invalid provider '{}'. Must be one of: {}",
                self.model.provider,
                VALID_PROVIDERS.join(", ")
            )));
        }

        if self.model.name.trim().is_empty() {
            return Err(ReportError::Config("model.name must not be empty".to_string()));
        }

        if self.model.max_tokens == 0 {
            return Err(ReportError::Config(
                "model.max_tokens must be greater than 0".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.model.temperature) {
            return Err(ReportError::Config(
                "model.temperature must be between 0.0 and 2.0".to_string(),
            ));
        }

        if self.output.report_file.trim().is_empty() {
            return Err(ReportError::Config(
                "output.report_file must not be empty".to_string(),
            ));
        }

        for url in [
            &mut self.data_sources.program_url,
            &mut self.data_sources.lightning_talks_url,
        ] {
            if url.as_deref().is_some_and(|u| u.trim().is_empty()) {
                *url = None;
            }
        }

        Ok(())
    }
}

/// Master prompt document
#[derive(Debug, Clone, Deserialize)]
struct MasterPromptDocument {
    #[serde(default)]
    master_prompt: Option<String>,
}

/// Load the master prompt template text
///
/// # Errors
///
/// Returns `ReportError::MasterPrompt` when the document is missing,
/// unreadable, or has no non-empty `master_prompt` value.
pub fn load_master_prompt(path: &Path) -> Result<String, ReportError> {
    let doc: MasterPromptDocument = read_document(path)
        .map_err(|e| ReportError::MasterPrompt(format!("{}: {}", path.display(), e)))?;

    match doc.master_prompt {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(ReportError::MasterPrompt(format!(
            "'master_prompt' not found in {}",
            path.display()
        ))),
    }
}
