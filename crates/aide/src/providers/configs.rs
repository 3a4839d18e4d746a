use std::time::Duration;

// Unified enum to wrap different provider configurations
#[derive(Debug, Clone)]
pub enum ProviderConfig {
    OpenRouter(OpenRouterProviderConfig),
    Gemini(GeminiProviderConfig),
}

#[derive(Debug, Clone)]
pub struct OpenRouterProviderConfig {
    pub host: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct GeminiProviderConfig {
    pub host: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Option<Duration>,
}
