//! Cloneable handle for talking to the broadcaster actor.

use std::sync::Arc;

use bytes::Bytes;
use notify_core::{BroadcasterConfig, BroadcasterStats, NotificationId, RawNotification};
use ractor::{Actor, ActorRef};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::broadcaster_actor::BroadcasterActor;
use crate::messages::{BroadcastError, BroadcasterMessage};
use crate::sink::{ChannelSink, SubscriberId, SubscriberSink};

fn unavailable() -> BroadcastError {
    BroadcastError::Unavailable("broadcaster is not running".into())
}

/// Handle to a running broadcaster.
///
/// Construct one per application (or per test) and share it by cloning.
#[derive(Clone)]
pub struct Broadcaster {
    actor: ActorRef<BroadcasterMessage>,
}

impl Broadcaster {
    /// Spawn the broadcaster actor with the given configuration.
    pub async fn start(
        config: BroadcasterConfig,
    ) -> Result<(Self, tokio::task::JoinHandle<()>), ractor::SpawnErr> {
        let (actor, handle) = Actor::spawn(None, BroadcasterActor, config).await?;
        Ok((Self { actor }, handle))
    }

    /// Validate and enqueue a notification.
    ///
    /// Returns once the notification is queued. Delivery happens later in a
    /// drain and is not reported back.
    pub async fn enqueue(&self, raw: RawNotification) -> Result<NotificationId, BroadcastError> {
        let draft = raw.validate()?;

        let (tx, rx) = ractor::concurrency::oneshot();
        self.actor
            .send_message(BroadcasterMessage::Enqueue {
                draft: Box::new(draft),
                reply: tx.into(),
            })
            .map_err(|_| unavailable())?;

        rx.await.map_err(|_| unavailable())
    }

    /// Open a new subscription backed by an in-memory channel.
    ///
    /// The first frame on the subscription is always a heartbeat.
    pub async fn subscribe(&self) -> Result<Subscription, BroadcastError> {
        let (sink, frames) = ChannelSink::channel();
        let id = self.subscribe_sink(Arc::new(sink)).await?;
        Ok(Subscription { id, frames })
    }

    /// Register a caller-provided sink.
    pub async fn subscribe_sink(
        &self,
        sink: Arc<dyn SubscriberSink>,
    ) -> Result<SubscriberId, BroadcastError> {
        let (tx, rx) = ractor::concurrency::oneshot();
        self.actor
            .send_message(BroadcasterMessage::Subscribe {
                sink,
                reply: tx.into(),
            })
            .map_err(|_| BroadcastError::StreamSetup("broadcaster is not running".into()))?;

        match rx.await {
            Ok(result) => result,
            Err(_) => Err(BroadcastError::StreamSetup(
                "broadcaster dropped the subscription request".into(),
            )),
        }
    }

    /// Current broadcaster counters.
    ///
    /// Messages are handled in order, so the returned stats reflect every
    /// drain scheduled by an enqueue that completed before this call.
    pub async fn stats(&self) -> Result<BroadcasterStats, BroadcastError> {
        let (tx, rx) = ractor::concurrency::oneshot();
        self.actor
            .send_message(BroadcasterMessage::GetStats { reply: tx.into() })
            .map_err(|_| unavailable())?;
        rx.await.map_err(|_| unavailable())
    }

    /// Stop the broadcaster. Open subscriptions end.
    pub fn shutdown(&self) -> Result<(), BroadcastError> {
        self.actor
            .send_message(BroadcasterMessage::Shutdown)
            .map_err(|_| unavailable())
    }
}

/// Receiving half of one subscriber stream.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriberId,
    frames: mpsc::UnboundedReceiver<Bytes>,
}

impl Subscription {
    /// Identifier assigned by the broadcaster.
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Wait for the next encoded frame.
    pub async fn recv(&mut self) -> Option<Bytes> {
        self.frames.recv().await
    }

    /// Take the next frame if one is already buffered.
    pub fn try_recv(&mut self) -> Result<Bytes, mpsc::error::TryRecvError> {
        self.frames.try_recv()
    }

    /// Convert into a stream of encoded frames for an HTTP body.
    pub fn into_stream(self) -> UnboundedReceiverStream<Bytes> {
        UnboundedReceiverStream::new(self.frames)
    }
}
