//! Chat relay messages exchanged over the WebSocket.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unique identifier for a relayed chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatMessageId(pub Ulid);

impl ChatMessageId {
    /// Create a new unique message ID.
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for ChatMessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ChatMessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A chat frame as sent by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingChatMessage {
    pub sender: String,
    pub body: String,
}

/// A chat message stamped by the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: ChatMessageId,
    pub sender: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Stamp an incoming message, or `None` if sender or body is blank.
    pub fn stamp(incoming: IncomingChatMessage) -> Option<Self> {
        if incoming.sender.trim().is_empty() || incoming.body.trim().is_empty() {
            return None;
        }
        Some(Self {
            id: ChatMessageId::new(),
            sender: incoming.sender,
            body: incoming.body,
            sent_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_messages_are_dropped() {
        let blank = IncomingChatMessage {
            sender: "ana".into(),
            body: " ".into(),
        };
        assert!(ChatMessage::stamp(blank).is_none());
    }

    #[test]
    fn stamped_message_serializes_camel_case() -> Result<(), Box<dyn std::error::Error>> {
        let msg = ChatMessage::stamp(IncomingChatMessage {
            sender: "ana".into(),
            body: "invoice sent".into(),
        })
        .ok_or("message dropped")?;
        let json = serde_json::to_value(&msg)?;
        assert_eq!(json["sender"], "ana");
        assert!(json.get("sentAt").is_some());
        Ok(())
    }
}
