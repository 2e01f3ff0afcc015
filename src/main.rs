use std::sync::Arc;

use anyhow::Context;
use portal_assistant::config::RelayConfig;
use portal_assistant::routes;
use portal_assistant::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,portal_assistant=debug,tower_http=debug".into()),
        )
        .with_target(false)
        .init();

    let config = RelayConfig::from_env()?;
    if config.api_key.is_none() {
        tracing::warn!("GROQ_API_KEY is not set, chat requests will fail");
    }
    let bind_addr = config.bind_addr;
    let state = Arc::new(AppState::from_config(config));

    let app = routes::create_router().with_state(state);

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    tracing::info!(addr = %bind_addr, "portal assistant relay listening");
    axum::serve(listener, app).await?;
    Ok(())
}
