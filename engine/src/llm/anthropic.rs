use super::{status_error, LLMError, LLMProvider, Message, MessageRole};
use crate::config::ModelConfig;
use crate::secrets::SecretString;
use async_trait::async_trait;
use serde_json::json;

/// Anthropic messages-API provider
pub struct AnthropicProvider {
    config: ModelConfig,
    api_key: SecretString,
    client: reqwest::Client,
}

impl AnthropicProvider {
    pub fn new(config: ModelConfig, api_key: SecretString) -> Self {
        Self {
            config,
            api_key,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl LLMProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn model(&self) -> &str {
        &self.config.name
    }

    async fn generate(&self, messages: &[Message]) -> super::Result<String> {
        let url = format!("{}/messages", self.config.base_url());

        // System text travels in its own field, not as a message
        let mut system_prompt = String::new();
        let mut api_messages = Vec::new();
        for msg in messages {
            if msg.role == MessageRole::System {
                system_prompt.push_str(&msg.content);
                system_prompt.push('\n');
                continue;
            }
            api_messages.push(json!({
                "role": msg.role,
                "content": msg.content
            }));
        }

        let payload = json!({
            "model": self.config.name,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "system": system_prompt.trim_end(),
            "messages": api_messages,
        });

        let response = self
            .client
            .post(&url)
            .header("x-api-key", self.api_key.unsecure())
            .header("anthropic-version", "2023-06-01")
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

        let content_arr = data
            .get("content")
            .and_then(|c| c.as_array())
            .ok_or_else(|| LLMError::ParseError("No content array in response".to_string()))?;

        let full_content: String = content_arr
            .iter()
            .filter_map(|item| item.get("text").and_then(|t| t.as_str()))
            .collect();

        Ok(full_content)
    }
}
