//! HTTP server for riskd

use crate::config::{mask_secret, Config, ServerConfig};
use crate::llm_client::{HttpLlmClient, LlmClient};
use crate::middleware::{body_size_limit, AccessGate};
use crate::narrative::NarrativeBuilder;
use crate::routes;
use anyhow::{Context, Result};
use axum::{extract::DefaultBodyLimit, middleware, Router};
use std::sync::Arc;
use std::time::Duration;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Application state shared across handlers
pub struct AppState {
    pub narrative: NarrativeBuilder,
}

impl AppState {
    pub fn new(client: Arc<dyn LlmClient>, timeout: Duration) -> Self {
        Self {
            narrative: NarrativeBuilder::new(client, timeout),
        }
    }

    /// State backed by the configured HTTP collaborator
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = HttpLlmClient::new(config.llm.clone())?;
        Ok(Self::new(
            Arc::new(client),
            Duration::from_secs(config.llm.timeout_secs),
        ))
    }
}

/// Assemble the full router
pub fn build_router(state: AppState, server: &ServerConfig) -> Router {
    let gate = AccessGate::new(server.access_token.clone());

    let mut app = Router::new()
        .merge(routes::analysis_routes(gate))
        .merge(routes::health_routes())
        .with_state(Arc::new(state));

    if let Some(dir) = &server.static_dir {
        info!("  Serving static files from {}", dir.display());
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(middleware::from_fn_with_state(
        server.max_body_bytes,
        body_size_limit,
    ))
    .layer(DefaultBodyLimit::max(server.max_body_bytes))
    .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server until ctrl-c
pub async fn run(config: Config) -> Result<()> {
    let state = AppState::from_config(&config)?;

    match &config.llm.api_key {
        Some(key) => info!("  Narrative model {} (key {})", config.llm.model, mask_secret(key)),
        None => warn!("  No API key configured for {}", config.llm.endpoint),
    }
    match &config.server.access_token {
        Some(_) => info!("  Access token required for /analyze_gameplay"),
        None => info!("  Access token gate disabled"),
    }

    let app = build_router(state, &config.server);

    let addr = config.server.bind_addr.as_str();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("  Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
}
