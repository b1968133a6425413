//! Stockgate server entrypoint.

use clap::Parser;
use mimalloc::MiMalloc;
use tracing_subscriber::EnvFilter;

use stockgate::config::GatewayConfig;
use stockgate::forward::Forwarder;
use stockgate::proxy_service::{self, AppState};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = GatewayConfig::parse();
    let forwarder = Forwarder::new(config.upstream_timeout)?;

    let bind = config.bind;
    tracing::info!(addr = %bind, backend = %config.backend_url, "stockgate listening");

    let state = AppState::new(config, forwarder);
    let listener = tokio::net::TcpListener::bind(bind).await.map_err(|e| {
        tracing::error!("failed to bind to {}: {}", bind, e);
        e
    })?;

    axum::serve(listener, proxy_service::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}
