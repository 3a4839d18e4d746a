use anyhow::Result;
use async_trait::async_trait;

/// Base trait for text generation providers (OpenRouter, Gemini, etc)
#[async_trait]
pub trait Provider: Send + Sync {
    /// Send a single prompt and return the raw generated text.
    ///
    /// Fails on transport errors and non-success responses. No timeout or retry
    /// is applied beyond what the provider's config asks for.
    async fn generate_text(&self, prompt: &str) -> Result<String>;
}
