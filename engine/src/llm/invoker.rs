//! Completion invocation
//!
//! Sends the assembled prompt with the configured system instruction. A
//! failure here is fatal for the run: there is no retry and no fallback
//! provider.

use super::{LLMProvider, Message};
use sdk::errors::ReportError;

pub struct CompletionInvoker {
    provider: Box<dyn LLMProvider>,
    system_message: String,
}

impl CompletionInvoker {
    pub fn new(provider: Box<dyn LLMProvider>, system_message: impl Into<String>) -> Self {
        Self {
            provider,
            system_message: system_message.into(),
        }
    }

    /// Model identifier of the underlying provider
    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// Submit `prompt` and return the raw response text
    ///
    /// # Errors
    ///
    /// Returns `ReportError::CompletionService` for any provider failure.
    pub async fn invoke(&self, prompt: &str) -> Result<String, ReportError> {
        tracing::info!(
            "Calling {} with model {} (prompt: {} characters)",
            self.provider.name(),
            self.provider.model(),
            prompt.chars().count()
        );

        let messages = [Message::system(&self.system_message), Message::user(prompt)];

        let text = self.provider.generate(&messages).await.map_err(|e| {
            tracing::error!("Completion call failed: {}", e);
            ReportError::from(e)
        })?;

        tracing::info!("Received response ({} characters)", text.chars().count());
        Ok(text)
    }
}
