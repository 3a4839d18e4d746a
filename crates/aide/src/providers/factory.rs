use super::{
    base::Provider, configs::ProviderConfig, gemini::GeminiProvider,
    openrouter::OpenRouterProvider,
};
use anyhow::Result;
use strum_macros::{Display, EnumIter, EnumString};

#[derive(EnumIter, EnumString, Display, Debug, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum ProviderType {
    OpenRouter,
    Gemini,
}

impl ProviderType {
    pub fn of(config: &ProviderConfig) -> Self {
        match config {
            ProviderConfig::OpenRouter(_) => ProviderType::OpenRouter,
            ProviderConfig::Gemini(_) => ProviderType::Gemini,
        }
    }
}

pub fn get_provider(config: ProviderConfig) -> Result<Box<dyn Provider + Send + Sync>> {
    match config {
        ProviderConfig::OpenRouter(openrouter_config) => {
            Ok(Box::new(OpenRouterProvider::new(openrouter_config)?))
        }
        ProviderConfig::Gemini(gemini_config) => Ok(Box::new(GeminiProvider::new(gemini_config)?)),
    }
}
