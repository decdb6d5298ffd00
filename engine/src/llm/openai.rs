use super::{status_error, LLMError, LLMProvider, Message};
use crate::config::ModelConfig;
use crate::secrets::SecretString;
use async_trait::async_trait;
use serde_json::json;

/// OpenAI chat-completions provider
pub struct OpenAIProvider {
    config: ModelConfig,
    api_key: SecretString,
    client: reqwest::Client,
}

impl OpenAIProvider {
    pub fn new(config: ModelConfig, api_key: SecretString) -> Self {
        Self {
            config,
            api_key,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.config.name
    }

    async fn generate(&self, messages: &[Message]) -> super::Result<String> {
        let url = format!("{}/chat/completions", self.config.base_url());

        let api_messages: Vec<_> = messages
            .iter()
            .map(|msg| {
                json!({
                    "role": msg.role.to_string(),
                    "content": msg.content
                })
            })
            .collect();

        let payload = json!({
            "model": self.config.name,
            "messages": api_messages,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
        });

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key.unsecure()))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| LLMError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(status_error(status, &text));
        }

        let data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LLMError::ParseError(e.to_string()))?;

        let choice = data
            .get("choices")
            .and_then(|c| c.as_array())
            .and_then(|c| c.first())
            .ok_or_else(|| LLMError::ParseError("No choices in response".to_string()))?;

        choice
            .get("message")
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .map(str::to_string)
            .ok_or_else(|| LLMError::ParseError("Empty content".to_string()))
    }
}
