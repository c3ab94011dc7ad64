//! Core domain types for the notification broadcaster.
//!
//! This crate contains shared types used across all packages:
//! - Notification and its validated producer input
//! - Wire encoding for the server-sent event stream
//! - Broadcaster configuration and statistics
//! - Chat relay messages

mod broadcaster;
mod chat;
mod events;
mod notification;

pub use broadcaster::{BroadcasterConfig, BroadcasterStats};
pub use chat::{ChatMessage, ChatMessageId, IncomingChatMessage};
pub use events::{HEARTBEAT_FRAME, StreamFrame, WireNotification, WireType};
pub use notification::{
    Notification, NotificationDraft, NotificationId, NotificationKind, NotificationStyle,
    RawNotification, ValidationError,
};
