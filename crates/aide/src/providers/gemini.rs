use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::base::Provider;
use super::configs::GeminiProviderConfig;
use super::utils::{build_client, handle_response};

pub const GEMINI_HOST: &str = "https://generativelanguage.googleapis.com";
pub const GEMINI_MODEL: &str = "gemini-1.5-flash";

pub struct GeminiProvider {
    client: Client,
    config: GeminiProviderConfig,
}

impl GeminiProvider {
    pub fn new(config: GeminiProviderConfig) -> Result<Self> {
        let client = build_client(config.timeout)?;
        Ok(Self { client, config })
    }

    async fn post(&self, payload: Value) -> Result<Value> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.host.trim_end_matches('/'),
            self.config.model
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        handle_response(response).await
    }

    /// Concatenate the text parts of the first candidate
    fn response_text(data: &Value) -> Result<String> {
        let parts = data
            .pointer("/candidates/0/content/parts")
            .and_then(Value::as_array)
            .ok_or_else(|| anyhow!("No candidates in response: {}", data))?;

        let text: String = parts
            .iter()
            .filter_map(|part| part.get("text").and_then(Value::as_str))
            .collect();

        if text.is_empty() {
            return Err(anyhow!("Empty candidate in response: {}", data));
        }
        Ok(text)
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    async fn generate_text(&self, prompt: &str) -> Result<String> {
        let payload = json!({
            "contents": [{
                "role": "user",
                "parts": [{"text": prompt}]
            }]
        });

        let response = self.post(payload).await?;

        if let Some(error) = response.get("error") {
            return Err(anyhow!("Gemini API error: {}", error));
        }

        let text = Self::response_text(&response)?;
        tracing::debug!(model = %self.config.model, chars = text.len(), "gemini completion");
        Ok(text)
    }
}
