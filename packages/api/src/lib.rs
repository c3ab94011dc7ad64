//! HTTP surface for the notification broadcaster.
//!
//! This crate contains the axum routes for:
//! - Producing notifications (`POST /api/notifications`)
//! - Subscribing to the event stream (`GET /api/notifications/stream`)
//! - Relaying chat over WebSocket (`GET /api/chat/ws`)

mod chat;
mod errors;
mod init;
mod notifications;
mod realtime;
mod routes;

pub use errors::{ApiError, ApiErrorBody, ApiResult};
pub use init::init_state;
pub use realtime::event_stream_response;
pub use routes::{AppState, api_router, app, cors_layer, health_router};

// Re-export core types for convenience
pub use notify_core::{BroadcasterConfig, NotificationId, RawNotification};
