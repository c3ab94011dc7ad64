//! In-memory chat relay shared by all chat sockets.

use notify_core::{ChatMessage, IncomingChatMessage};
use tokio::sync::broadcast;

/// Relays chat messages to every connected socket.
///
/// Nothing is stored; a socket only sees messages sent while it is connected.
#[derive(Clone)]
pub struct ChatRelay {
    sender: broadcast::Sender<ChatMessage>,
}

impl ChatRelay {
    /// Create a relay buffering up to `capacity` messages per lagging socket.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribe to relayed messages.
    pub fn subscribe(&self) -> broadcast::Receiver<ChatMessage> {
        self.sender.subscribe()
    }

    /// Stamp and relay a message. Returns `None` for blank messages.
    pub fn relay(&self, incoming: IncomingChatMessage) -> Option<ChatMessage> {
        let message = ChatMessage::stamp(incoming)?;
        // No receivers is fine: nobody is listening.
        let _ = self.sender.send(message.clone());
        Some(message)
    }

    /// Number of connected chat sockets.
    pub fn connected(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ChatRelay {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn relays_to_every_receiver() -> Result<(), Box<dyn std::error::Error>> {
        let relay = ChatRelay::new(8);
        let mut a = relay.subscribe();
        let mut b = relay.subscribe();
        assert_eq!(relay.connected(), 2);

        let sent = relay
            .relay(IncomingChatMessage {
                sender: "client".into(),
                body: "milestone approved".into(),
            })
            .ok_or("message dropped")?;

        assert_eq!(a.recv().await?.id, sent.id);
        assert_eq!(b.recv().await?.id, sent.id);
        Ok(())
    }
}
