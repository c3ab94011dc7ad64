//! WebSocket chat relay endpoint.

use std::ops::ControlFlow;

use axum::{
    Router,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
    routing::get,
};

use actors::ChatRelay;
use futures_util::{SinkExt, StreamExt};
use notify_core::IncomingChatMessage;
use tokio::sync::broadcast::error::RecvError;

use crate::routes::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/chat/ws", get(ws_handler))
}

async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(state, socket))
}

async fn handle_socket(state: AppState, socket: WebSocket) {
    let (mut sender, mut receiver) = socket.split();
    let mut rx = state.chat.subscribe();
    tracing::debug!("Chat socket connected ({} open)", state.chat.connected());

    // Forward relayed messages to this socket
    let mut forward = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(message) => {
                    let text = match serde_json::to_string(&message) {
                        Ok(text) => text,
                        Err(e) => {
                            tracing::error!("Failed to encode chat message {}: {}", message.id, e);
                            continue;
                        }
                    };
                    if sender.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Chat socket lagged, {} messages skipped", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    // Relay incoming frames until the client goes away
    let relay = state.chat.clone();
    let mut inbound = tokio::spawn(async move {
        while let Some(Ok(frame)) = receiver.next().await {
            if handle_frame(&relay, frame).is_break() {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut forward => inbound.abort(),
        _ = &mut inbound => forward.abort(),
    }
    tracing::debug!("Chat socket closed");
}

/// Relay one inbound frame. Breaks when the client closed the socket.
///
/// Malformed and blank text frames are logged and skipped.
fn handle_frame(relay: &ChatRelay, frame: Message) -> ControlFlow<()> {
    match frame {
        Message::Text(text) => match serde_json::from_str::<IncomingChatMessage>(&text) {
            Ok(incoming) => {
                if relay.relay(incoming).is_none() {
                    tracing::debug!("Ignored blank chat message");
                }
            }
            Err(e) => tracing::warn!("Malformed chat frame: {}", e),
        },
        Message::Close(_) => return ControlFlow::Break(()),
        _ => {}
    }
    ControlFlow::Continue(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(json: &str) -> Message {
        Message::Text(json.to_string())
    }

    #[test]
    fn valid_frame_is_relayed() -> Result<(), Box<dyn std::error::Error>> {
        let relay = ChatRelay::new(8);
        let mut rx = relay.subscribe();

        let flow = handle_frame(&relay, text(r#"{"sender":"ana","body":"hello"}"#));
        assert!(flow.is_continue());

        let message = rx.try_recv()?;
        assert_eq!(message.sender, "ana");
        assert_eq!(message.body, "hello");
        Ok(())
    }

    #[test]
    fn malformed_and_blank_frames_are_skipped() {
        let relay = ChatRelay::new(8);
        let mut rx = relay.subscribe();

        for frame in [
            text("not json"),
            text(r#"{"sender":"ana"}"#),
            text(r#"{"sender":"ana","body":"   "}"#),
            Message::Binary(vec![1, 2, 3]),
        ] {
            assert!(handle_frame(&relay, frame).is_continue());
        }
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn close_frame_ends_the_socket() {
        let relay = ChatRelay::new(8);
        assert!(handle_frame(&relay, Message::Close(None)).is_break());
    }
}
