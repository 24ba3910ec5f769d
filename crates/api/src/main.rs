mod branding;
mod config;
mod cookie;
mod metrics;
mod routes;

use anyhow::{Context, Result};
use extract::{InferenceGateway, OllamaClient};
use session::SessionStore;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::metrics::Metrics;
use crate::routes::AppState;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = AppConfig::from_env().context("Invalid configuration")?;

    let backend = OllamaClient::new(
        config.backend.base_url.clone(),
        config.backend.model.clone(),
        config.backend.timeout(),
    );
    let base_url = backend.base_url().to_string();
    let gateway = InferenceGateway::new(Arc::new(backend), config.backend.timeout());

    let logo = match &config.server.logo_path {
        Some(path) => Some(branding::load_logo(path).await?),
        None => None,
    };

    let state = Arc::new(AppState {
        gateway,
        sessions: SessionStore::new(config.session.max_sessions),
        metrics: Metrics::new(),
        logo,
    });

    let app = routes::router(state, config.server.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_addr))?;

    tracing::info!(
        addr = %config.server.bind_addr,
        backend = %base_url,
        model = %config.backend.model,
        timeout_secs = config.backend.timeout_secs,
        "Server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
