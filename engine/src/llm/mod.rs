//! Completion service abstraction
//!
//! The report is produced by a single chat-style completion call. The
//! [`LLMProvider`] trait hides the wire format of each hosted service;
//! [`build_provider`] picks the implementation named by `model.provider`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod anthropic;
pub mod invoker;
pub mod openai;

pub use invoker::CompletionInvoker;

use crate::config::ModelConfig;
use crate::secrets::SecretString;
use sdk::errors::ReportError;

/// Result type for LLM operations
pub type Result<T> = std::result::Result<T, LLMError>;

/// Errors that can occur during a completion call
#[derive(Debug, thiserror::Error)]
pub enum LLMError {
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

impl From<LLMError> for ReportError {
    fn from(e: LLMError) -> Self {
        ReportError::CompletionService(e.to_string())
    }
}

/// Message in the completion request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }
}

/// Role of a message sender
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    System,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::System => write!(f, "system"),
        }
    }
}

/// Completion provider trait
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Returns the name of the provider (e.g., "openai", "anthropic")
    fn name(&self) -> &str;

    /// Model identifier sent with every request
    fn model(&self) -> &str;

    /// Generate a completion for the conversation
    ///
    /// # Returns
    /// * `Ok(String)` - The response text
    /// * `Err(LLMError)` - If the request fails
    async fn generate(&self, messages: &[Message]) -> Result<String>;
}

/// Map a non-2xx completion response to an error
pub(crate) fn status_error(status: reqwest::StatusCode, body: &str) -> LLMError {
    let body = crate::secrets::scrub(body);
    match status.as_u16() {
        401 | 403 => LLMError::AuthenticationFailed(body),
        429 => LLMError::RateLimitExceeded,
        _ => LLMError::InvalidRequest(format!("HTTP {}: {}", status, body)),
    }
}

/// Build the provider named in `config.provider`
///
/// # Errors
///
/// Returns `ReportError::Config` for an unknown provider name.
pub fn build_provider(
    config: &ModelConfig,
    api_key: SecretString,
) -> std::result::Result<Box<dyn LLMProvider>, ReportError> {
    match config.provider.as_str() {
        "openai" => Ok(Box::new(openai::OpenAIProvider::new(config.clone(), api_key))),
        "anthropic" => Ok(Box::new(anthropic::AnthropicProvider::new(
            config.clone(),
            api_key,
        ))),
        other => Err(ReportError::Config(format!("Unknown provider '{}'", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_creation() {
        let user_msg = Message::user("Hello");
        assert_eq!(user_msg.role, MessageRole::User);
        assert_eq!(user_msg.content, "Hello");

        let system_msg = Message::system("You are a helpful assistant");
        assert_eq!(system_msg.role, MessageRole::System);
    }

    #[test]
    fn test_role_wire_names() {
        assert_eq!(serde_json::to_value(MessageRole::User).unwrap(), "user");
        assert_eq!(serde_json::to_value(MessageRole::System).unwrap(), "system");
        assert_eq!(MessageRole::User.to_string(), "user");
    }

    #[test]
    fn test_build_known_providers() {
        let mut config = ModelConfig::default();
        let provider = build_provider(&config, SecretString::new("k")).unwrap();
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.model(), "gpt-4o-mini");

        config.provider = "anthropic".to_string();
        let provider = build_provider(&config, SecretString::new("k")).unwrap();
        assert_eq!(provider.name(), "anthropic");
    }

    #[test]
    fn test_build_unknown_provider() {
        let config = ModelConfig {
            provider: "ollama".to_string(),
            ..ModelConfig::default()
        };
        assert!(build_provider(&config, SecretString::new("k")).is_err());
    }

    #[test]
    fn test_status_error_mapping() {
        assert!(matches!(
            status_error(reqwest::StatusCode::UNAUTHORIZED, "bad key"),
            LLMError::AuthenticationFailed(_)
        ));
        assert!(matches!(
            status_error(reqwest::StatusCode::TOO_MANY_REQUESTS, ""),
            LLMError::RateLimitExceeded
        ));
        match status_error(
            reqwest::StatusCode::BAD_REQUEST,
            "key sk-abcdefghijklmnopqrstuvwxyz rejected",
        ) {
            LLMError::InvalidRequest(msg) => {
                assert!(msg.contains("[REDACTED]"));
                assert!(!msg.contains("sk-abcdef"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_llm_error_is_fatal_report_error() {
        let err: ReportError = LLMError::RateLimitExceeded.into();
        assert!(matches!(err, ReportError::CompletionService(_)));
    }
}
