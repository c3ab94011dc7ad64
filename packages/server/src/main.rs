use tracing_subscriber::EnvFilter;

mod config;

use actors::Broadcaster;
use config::ServerConfig;

/// Wait for ctrl-c, then stop the broadcaster.
///
/// Event streams never end on their own, so graceful shutdown would wait on
/// them forever unless the broadcaster drops their sinks first.
async fn shutdown_signal(broadcaster: Broadcaster) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
    if let Err(e) = broadcaster.shutdown() {
        tracing::warn!("Broadcaster already stopped: {}", e);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load env first so RUST_LOG from .env applies
    let config = ServerConfig::from_env()?;

    // Tracing setup
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .init();

    // Shared state (broadcaster, chat relay)
    let (state, broadcaster_handle) =
        api::init_state(config.broadcaster.clone(), config.chat_capacity).await?;
    let broadcaster = state.broadcaster.clone();

    let app = api::app(state, api::cors_layer(&config.allowed_origins));

    let addr = config.addr()?;
    tracing::info!("listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(broadcaster))
        .await?;

    broadcaster_handle.await?;
    tracing::info!("Server stopped");
    Ok(())
}
