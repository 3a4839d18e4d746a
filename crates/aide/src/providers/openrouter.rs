use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::base::Provider;
use super::configs::OpenRouterProviderConfig;
use super::utils::{build_client, handle_response};

pub const OPENROUTER_HOST: &str = "https://openrouter.ai";
pub const OPENROUTER_MODEL: &str = "openai/gpt-4o-mini";

/// Chat completions over the OpenAI compatible OpenRouter API
pub struct OpenRouterProvider {
    client: Client,
    config: OpenRouterProviderConfig,
}

impl OpenRouterProvider {
    pub fn new(config: OpenRouterProviderConfig) -> Result<Self> {
        let client = build_client(config.timeout)?;
        Ok(Self { client, config })
    }

    async fn post(&self, payload: Value) -> Result<Value> {
        let url = format!(
            "{}/api/v1/chat/completions",
            self.config.host.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&payload)
            .send()
            .await?;

        handle_response(response).await
    }

    /// Only `choices[0].message.content` is consumed
    fn response_text(data: &Value) -> Result<String> {
        data.pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| anyhow!("No message content in response: {}", data))
    }
}

#[async_trait]
impl Provider for OpenRouterProvider {
    async fn generate_text(&self, prompt: &str) -> Result<String> {
        let payload = json!({
            "model": self.config.model,
            "messages": [{
                "role": "user",
                "content": prompt
            }]
        });

        let response = self.post(payload).await?;

        if let Some(error) = response.get("error") {
            return Err(anyhow!("OpenRouter API error: {}", error));
        }

        let text = Self::response_text(&response)?;
        tracing::debug!(model = %self.config.model, chars = text.len(), "openrouter completion");
        Ok(text)
    }
}
