//! Server initialization for the notification broadcaster.

use actors::{Broadcaster, ChatRelay};
use notify_core::BroadcasterConfig;

use crate::routes::AppState;

/// Start the broadcaster and build the shared state.
///
/// This should be called once at server startup before handling requests.
pub async fn init_state(
    config: BroadcasterConfig,
    chat_capacity: usize,
) -> Result<(AppState, tokio::task::JoinHandle<()>), Box<dyn std::error::Error>> {
    tracing::info!("Initializing notification broadcaster...");
    tracing::debug!(
        "Broadcaster config: heartbeat={:?}s evict_failed={}",
        config.heartbeat_interval_secs,
        config.evict_failed_subscribers
    );

    let (broadcaster, handle) = Broadcaster::start(config).await?;
    let state = AppState::new(broadcaster, ChatRelay::new(chat_capacity));

    tracing::info!("Notification broadcaster initialized");
    Ok((state, handle))
}
