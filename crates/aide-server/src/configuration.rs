use crate::error::{to_env_var, ConfigError};
use aide::prompt::DEFAULT_HISTORY_LIMIT;
use aide::providers::{
    configs::{GeminiProviderConfig, OpenRouterProviderConfig, ProviderConfig},
    factory::ProviderType,
    gemini::{GEMINI_HOST, GEMINI_MODEL},
    openrouter::{OPENROUTER_HOST, OPENROUTER_MODEL},
};
use config::{Config, Environment};
use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Sessions untouched for this long are dropped
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            session_idle_secs: default_session_idle_secs(),
            max_sessions: default_max_sessions(),
        }
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }

    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase", tag = "type")]
pub enum ProviderSettings {
    OpenRouter {
        #[serde(default = "default_openrouter_host")]
        host: String,
        api_key: String,
        #[serde(default = "default_openrouter_model")]
        model: String,
        #[serde(default)]
        timeout_secs: Option<u64>,
    },
    Gemini {
        #[serde(default = "default_gemini_host")]
        host: String,
        api_key: String,
        #[serde(default = "default_gemini_model")]
        model: String,
        #[serde(default)]
        timeout_secs: Option<u64>,
    },
}

impl ProviderSettings {
    pub fn provider_type(&self) -> ProviderType {
        match self {
            ProviderSettings::OpenRouter { .. } => ProviderType::OpenRouter,
            ProviderSettings::Gemini { .. } => ProviderType::Gemini,
        }
    }

    // Convert to the aide ProviderConfig
    pub fn into_config(self) -> ProviderConfig {
        match self {
            ProviderSettings::OpenRouter {
                host,
                api_key,
                model,
                timeout_secs,
            } => ProviderConfig::OpenRouter(OpenRouterProviderConfig {
                host,
                api_key,
                model,
                timeout: timeout_secs.map(Duration::from_secs),
            }),
            ProviderSettings::Gemini {
                host,
                api_key,
                model,
                timeout_secs,
            } => ProviderConfig::Gemini(GeminiProviderConfig {
                host,
                api_key,
                model,
                timeout: timeout_secs.map(Duration::from_secs),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AssistantSettings {
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    pub provider: ProviderSettings,
    #[serde(default)]
    pub assistant: AssistantSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::load_and_validate()
    }

    fn load_and_validate() -> Result<Self, ConfigError> {
        // Start with default configuration
        let config = Config::builder()
            // Server defaults
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port())?
            .set_default("server.session_idle_secs", default_session_idle_secs())?
            .set_default("server.max_sessions", default_max_sessions() as u64)?
            .set_default("assistant.history_limit", default_history_limit() as u64)?
            // Layer on the environment variables
            .add_source(
                Environment::with_prefix("AIDE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let result: Result<Self, config::ConfigError> = config.try_deserialize();

        // Handle missing field errors specially
        match result {
            Ok(settings) => Ok(settings),
            Err(err) => {
                tracing::debug!("Configuration error: {:?}", &err);

                // Handle both NotFound and missing field message variants
                let error_str = err.to_string();
                if error_str.starts_with("missing field") {
                    // Extract field name from error message "missing field `type`"
                    let field = error_str
                        .trim_start_matches("missing field `")
                        .trim_end_matches('`');
                    let env_var = to_env_var(field);
                    Err(ConfigError::MissingEnvVar { env_var })
                } else if let config::ConfigError::NotFound(field) = &err {
                    let env_var = to_env_var(field);
                    Err(ConfigError::MissingEnvVar { env_var })
                } else {
                    Err(ConfigError::Other(err))
                }
            }
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_session_idle_secs() -> u64 {
    30 * 60
}

fn default_max_sessions() -> usize {
    1000
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

fn default_openrouter_host() -> String {
    OPENROUTER_HOST.to_string()
}

fn default_openrouter_model() -> String {
    OPENROUTER_MODEL.to_string()
}

fn default_gemini_host() -> String {
    GEMINI_HOST.to_string()
}

fn default_gemini_model() -> String {
    GEMINI_MODEL.to_string()
}
