use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use tower_http::cors::{CorsLayer, Any};
use tracing_subscriber::{fmt, EnvFilter};

use deck_studio::{
    config::Config,
    history::InMemoryHistory,
    routes::{router, AppState},
    service::StudioService,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Init tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let config = Config::from_env();
    if config.is_demo() {
        tracing::warn!("GEMINI_API_KEY not set, running in demo mode with placeholder output");
    } else {
        let prefix: String = config.api_key.chars().take(10).collect();
        tracing::info!("Using API key: {}...", prefix);
    }

    let state = AppState {
        decks: Arc::default(),
        history: Arc::new(InMemoryHistory::default()),
        studio: Arc::new(StudioService::from_config(&config)),
    };

    let app = router(state).layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(%addr, "Starting server");
    let listener = tokio::net::TcpListener::bind(addr).await.with_context(|| format!("binding {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Shutting down");
        })
        .await
        .context("server error")?;
    Ok(())
}
