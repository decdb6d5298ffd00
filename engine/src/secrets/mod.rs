//! Secrets document loading and secret scrubbing
//!
//! Credentials for the completion service live in a separate secrets
//! document (`secrets.yml` by default) so the main configuration can be
//! shared. Values are held as [`SecretString`] and never logged.

pub mod string;

pub use string::SecretString;

use crate::config::read_document;
use regex::Regex;
use sdk::errors::ReportError;
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

/// Credentials loaded from the secrets document
#[derive(Debug, Clone, Default)]
pub struct Secrets {
    values: HashMap<String, SecretString>,
}

/// Regex patterns for detecting common secret formats.
static SECRET_PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();

/// Patterns match:
/// - OpenAI and Anthropic API keys: sk-... / sk-ant-...
/// - Bearer tokens: Bearer\s+[^\s]{20,}
fn get_secret_patterns() -> &'static Vec<Regex> {
    SECRET_PATTERNS.get_or_init(|| {
        vec![
            Regex::new(r"sk-[a-zA-Z0-9\-_]{20,}").expect("Invalid API key pattern"),
            Regex::new(r"Bearer\s+[^\s]{20,}").expect("Invalid Bearer pattern"),
        ]
    })
}

impl Secrets {
    /// Load the secrets document
    ///
    /// Only string values are kept; nested tables and other scalars are ignored.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Config` if the file is missing or cannot be parsed.
    pub fn load_from_path(path: &Path) -> Result<Self, ReportError> {
        let raw: HashMap<String, serde_json::Value> = read_document(path)
            .map_err(|e| ReportError::Config(format!("{}: {}", path.display(), e)))?;

        let values = raw
            .into_iter()
            .filter_map(|(key, value)| match value {
                serde_json::Value::String(s) => Some((key, SecretString::new(s))),
                _ => None,
            })
            .collect();

        Ok(Self { values })
    }

    #[cfg(test)]
    fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<SecretString>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Retrieve a credential by key
    ///
    /// # Errors
    ///
    /// Returns `ReportError::MissingSecret` if the key is absent or blank.
    pub fn get(&self, key: &str) -> Result<SecretString, ReportError> {
        match self.values.get(key) {
            Some(secret) if !secret.is_blank() => Ok(secret.clone()),
            _ => Err(ReportError::MissingSecret(key.to_string())),
        }
    }
}

/// Replace anything that looks like a credential with `[REDACTED]`.
///
/// Completion-service error bodies are passed through this before they are
/// logged or printed.
///
/// # Examples
/// ```
/// use session_report::secrets::scrub;
///
/// let scrubbed = scrub("Incorrect API key provided: sk-1234567890abcdefghij");
/// assert_eq!(scrubbed, "Incorrect API key provided: [REDACTED]");
/// ```
pub fn scrub(text: &str) -> String {
    let mut result = text.to_string();

    for pattern in get_secret_patterns() {
        result = pattern.replace_all(&result, "[REDACTED]").to_string();
    }

    result
}
