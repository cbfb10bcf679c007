use anyhow::Context;
use axum::{extract::State, routing::get, Router};
use dashboard::config::Config;
use dashboard::device::DeviceClient;
use dashboard::metrics;
use dashboard::rest;
use dashboard::service::TelemetryService;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env();

    info!("Starting sensor dashboard");
    info!("Device: {} (timeout {:?})", config.device_url, config.device_timeout);
    info!("HTTP server: {}", config.http_addr);
    info!("History capacity: {}", config.history_capacity);

    metrics::init_metrics().context("failed to register metrics")?;

    let client = DeviceClient::new(&config.device_url, config.device_timeout)
        .context("failed to build device client")?;
    let service = Arc::new(TelemetryService::new(client, config.history_capacity));

    // REST API plus metrics endpoint, open to any origin
    let app = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(service.clone())
        .merge(rest::create_router(service))
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&config.http_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.http_addr))?;

    info!("HTTP server listening on {}", config.http_addr);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("HTTP server error: {}", e);
        }
    });

    tokio::select! {
        _ = server_handle => {
            error!("HTTP server terminated");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
    }

    info!("Shutting down");
    Ok(())
}

async fn metrics_handler(State(service): State<Arc<TelemetryService<DeviceClient>>>) -> String {
    metrics::render_metrics(service.history_len().await)
}
