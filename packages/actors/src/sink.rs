//! Subscriber sink trait and the channel-backed implementation.

use bytes::Bytes;
use tokio::sync::mpsc;

/// Identifier the broadcaster assigns to each registered subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(pub u64);

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "subscriber-{}", self.0)
    }
}

/// Failure to write one frame to one subscriber.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    #[error("subscriber stream closed")]
    Closed,

    #[error("delivery failed: {0}")]
    Failed(String),
}

/// Write half of a subscriber stream.
///
/// Implement this trait to attach a different transport to the broadcaster.
/// `deliver` is called from inside the actor and must not block.
pub trait SubscriberSink: Send + Sync + 'static {
    /// Write one encoded event-stream frame.
    fn deliver(&self, frame: Bytes) -> Result<(), DeliveryError>;
}

/// Sink that forwards frames into an unbounded channel.
///
/// The receiving half is owned by the HTTP response stream.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Bytes>,
}

impl ChannelSink {
    /// Create a sink and the receiver it feeds.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Bytes>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl SubscriberSink for ChannelSink {
    fn deliver(&self, frame: Bytes) -> Result<(), DeliveryError> {
        self.tx.send(frame).map_err(|_| DeliveryError::Closed)
    }
}
