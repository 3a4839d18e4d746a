mod configuration;
mod error;
mod routes;
mod sessions;
mod state;

use aide::assistant::Assistant;
use aide::providers::factory;
use anyhow::Context;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Pick up a local .env before reading configuration
    dotenv::dotenv().ok();

    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = configuration::Settings::new().context("failed to load settings")?;
    let addr = settings.server.socket_addr()?;

    let provider_type = settings.provider.provider_type();
    let provider = factory::get_provider(settings.provider.into_config())?;
    let assistant =
        Assistant::new(provider).with_history_limit(settings.assistant.history_limit);

    // Create app state
    let sessions = sessions::SessionStore::new(
        settings.server.session_idle_timeout(),
        settings.server.max_sessions,
    );
    let state = state::AppState::new(assistant, sessions);

    // Create router with CORS support
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes::configure(state).layer(cors);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(provider = %provider_type, "listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
