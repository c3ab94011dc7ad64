//! Message types for actor communication.

use std::sync::Arc;

use notify_core::{BroadcasterStats, NotificationDraft, NotificationId, ValidationError};
use ractor::RpcReplyPort;

use crate::sink::{SubscriberId, SubscriberSink};

/// Messages for the BroadcasterActor.
pub enum BroadcasterMessage {
    /// Append a validated notification and schedule a drain.
    Enqueue {
        draft: Box<NotificationDraft>,
        reply: RpcReplyPort<NotificationId>,
    },

    /// Register a subscriber and send it the opening heartbeat.
    Subscribe {
        sink: Arc<dyn SubscriberSink>,
        reply: RpcReplyPort<Result<SubscriberId, BroadcastError>>,
    },

    /// Deliver every queued notification to every subscriber.
    Drain,

    /// Get broadcaster stats.
    GetStats { reply: RpcReplyPort<BroadcasterStats> },

    /// Periodic heartbeat to all subscribers.
    Tick,

    /// Stop the broadcaster, dropping every subscriber.
    Shutdown,
}

impl std::fmt::Debug for BroadcasterMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BroadcasterMessage::Enqueue { draft, .. } => f
                .debug_struct("Enqueue")
                .field("kind", &draft.kind)
                .field("title", &draft.title)
                .finish(),
            BroadcasterMessage::Subscribe { .. } => f.write_str("Subscribe"),
            BroadcasterMessage::Drain => f.write_str("Drain"),
            BroadcasterMessage::GetStats { .. } => f.write_str("GetStats"),
            BroadcasterMessage::Tick => f.write_str("Tick"),
            BroadcasterMessage::Shutdown => f.write_str("Shutdown"),
        }
    }
}

/// Error type for broadcaster operations.
#[derive(Debug, thiserror::Error)]
pub enum BroadcastError {
    #[error("Invalid notification: {0}")]
    Validation(#[from] ValidationError),

    #[error("Failed to open subscription: {0}")]
    StreamSetup(String),

    #[error("Broadcaster unavailable: {0}")]
    Unavailable(String),
}
