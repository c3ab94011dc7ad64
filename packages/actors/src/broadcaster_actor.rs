//! Broadcaster actor that owns the notification queue and subscriber set.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use bytes::Bytes;
use notify_core::{BroadcasterConfig, BroadcasterStats, HEARTBEAT_FRAME, Notification, StreamFrame};
use ractor::{Actor, ActorProcessingErr, ActorRef};

use crate::messages::{BroadcastError, BroadcasterMessage};
use crate::sink::{SubscriberId, SubscriberSink};

fn heartbeat_frame() -> Bytes {
    Bytes::from_static(HEARTBEAT_FRAME.as_bytes())
}

/// State for the broadcaster actor.
pub struct BroadcasterState {
    /// Broadcaster configuration.
    pub config: BroadcasterConfig,
    /// Notifications waiting for the next drain, oldest first.
    queue: VecDeque<Notification>,
    /// Registered subscribers.
    subscribers: HashMap<SubscriberId, Arc<dyn SubscriberSink>>,
    /// Counter for subscriber IDs.
    subscriber_counter: u64,
    /// Running counters.
    stats: BroadcasterStats,
}

impl BroadcasterState {
    /// Create a new broadcaster state.
    pub fn new(config: BroadcasterConfig) -> Self {
        Self {
            config,
            queue: VecDeque::new(),
            subscribers: HashMap::new(),
            subscriber_counter: 0,
            stats: BroadcasterStats::default(),
        }
    }

    fn next_subscriber_id(&mut self) -> SubscriberId {
        self.subscriber_counter += 1;
        SubscriberId(self.subscriber_counter)
    }

    fn stats(&self) -> BroadcasterStats {
        BroadcasterStats {
            queued: self.queue.len() as u64,
            subscribers: self.subscribers.len() as u64,
            ..self.stats.clone()
        }
    }

    /// Write a frame to every subscriber, returning how many writes succeeded.
    ///
    /// A failed write never stops delivery to the others. The failed
    /// subscriber is only removed when eviction is enabled.
    fn fan_out(&mut self, frame: &Bytes) -> u64 {
        let mut delivered = 0;
        let mut failed = Vec::new();

        for (id, sink) in &self.subscribers {
            match sink.deliver(frame.clone()) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::warn!("Delivery to {} failed: {}", id, e);
                    failed.push(*id);
                }
            }
        }

        self.stats.delivery_failures += failed.len() as u64;
        if self.config.evict_failed_subscribers {
            for id in failed {
                self.subscribers.remove(&id);
                self.stats.evicted += 1;
                tracing::info!("Evicted {}", id);
            }
        }

        delivered
    }

    /// Pop every queued notification and fan it out.
    fn drain(&mut self) {
        while let Some(notification) = self.queue.pop_front() {
            self.stats.drained += 1;

            if self.subscribers.is_empty() {
                self.stats.drained_without_subscribers += 1;
                tracing::debug!("Notification {} drained with no subscribers", notification.id);
                continue;
            }

            let frame = match StreamFrame::from(&notification).encode() {
                Ok(text) => Bytes::from(text),
                Err(e) => {
                    tracing::error!("Failed to encode notification {}: {}", notification.id, e);
                    continue;
                }
            };

            let delivered = self.fan_out(&frame);
            self.stats.frames_delivered += delivered;
            tracing::debug!(
                "Notification {} delivered to {}/{} subscribers",
                notification.id,
                delivered,
                self.subscribers.len()
            );
        }
    }
}

/// Broadcaster actor that fans notifications out to subscribers.
pub struct BroadcasterActor;

impl Actor for BroadcasterActor {
    type Msg = BroadcasterMessage;
    type State = BroadcasterState;
    type Arguments = BroadcasterConfig;

    async fn pre_start(
        &self,
        myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        tracing::info!("Starting notification broadcaster");

        if let Some(period) = args.heartbeat_interval() {
            let myself_clone = myself.clone();
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(period);
                // The first tick completes immediately.
                interval.tick().await;
                loop {
                    interval.tick().await;
                    if myself_clone.send_message(BroadcasterMessage::Tick).is_err() {
                        break;
                    }
                }
            });
        }

        Ok(BroadcasterState::new(args))
    }

    async fn handle(
        &self,
        myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            BroadcasterMessage::Enqueue { draft, reply } => {
                let notification = Notification::from_draft(*draft);
                let id = notification.id;
                state.queue.push_back(notification);
                state.stats.enqueued += 1;

                // Drain runs after this handler returns; the producer does not wait on it.
                if let Err(e) = myself.send_message(BroadcasterMessage::Drain) {
                    tracing::warn!("Failed to schedule drain: {}", e);
                }

                let _ = reply.send(id);
            }

            BroadcasterMessage::Subscribe { sink, reply } => {
                if let Err(e) = sink.deliver(heartbeat_frame()) {
                    let _ = reply.send(Err(BroadcastError::StreamSetup(e.to_string())));
                    return Ok(());
                }

                let id = state.next_subscriber_id();
                state.subscribers.insert(id, sink);
                tracing::info!(
                    "Registered {} ({} connected)",
                    id,
                    state.subscribers.len()
                );

                let _ = reply.send(Ok(id));
            }

            BroadcasterMessage::Drain => {
                state.drain();
            }

            BroadcasterMessage::GetStats { reply } => {
                let _ = reply.send(state.stats());
            }

            BroadcasterMessage::Tick => {
                state.fan_out(&heartbeat_frame());
            }

            BroadcasterMessage::Shutdown => {
                tracing::info!(
                    "Shutting down broadcaster with {} subscribers",
                    state.subscribers.len()
                );
                myself.stop(None);
                return Ok(());
            }
        }

        Ok(())
    }
}
