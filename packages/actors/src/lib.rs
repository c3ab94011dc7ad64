//! Actor system for the notification broadcaster.
//!
//! This crate provides the Ractor-based broadcaster that buffers
//! notifications and fans them out to every connected subscriber,
//! plus the WebSocket chat relay.
//!
//! # Architecture
//!
//! - `BroadcasterActor` - Owns the FIFO queue and the subscriber set
//! - `Broadcaster` - Cloneable handle used by request handlers
//! - `SubscriberSink` - Write half of one subscriber stream
//! - `ChatRelay` - Broadcast channel shared by chat sockets
//!
//! # Usage
//!
//! ```ignore
//! use actors::Broadcaster;
//! use notify_core::BroadcasterConfig;
//!
//! let (broadcaster, _handle) = Broadcaster::start(BroadcasterConfig::default()).await?;
//! let mut subscription = broadcaster.subscribe().await?;
//! let id = broadcaster.enqueue(raw).await?;
//! ```

mod broadcaster_actor;
mod chat;
mod handle;
mod messages;
mod sink;

pub use broadcaster_actor::{BroadcasterActor, BroadcasterState};
pub use chat::ChatRelay;
pub use handle::{Broadcaster, Subscription};
pub use messages::{BroadcastError, BroadcasterMessage};
pub use sink::{ChannelSink, DeliveryError, SubscriberId, SubscriberSink};

/// Re-export ractor types for convenience.
pub use ractor::{Actor, ActorRef, RpcReplyPort, concurrency};
