//! Notification producer and subscriber endpoints.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Response,
    routing::{get, post},
};
use notify_core::{NotificationId, RawNotification};
use serde::{Deserialize, Serialize};

use crate::errors::ApiResult;
use crate::realtime::event_stream_response;
use crate::routes::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct EnqueueResponse {
    pub id: NotificationId,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/notifications", post(enqueue))
        .route("/notifications/stream", get(stream))
}

async fn enqueue(
    State(state): State<AppState>,
    payload: Result<Json<RawNotification>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<EnqueueResponse>)> {
    let Json(raw) = payload.inspect_err(|e| {
        tracing::debug!("Rejected notification body: {}", e.body_text());
    })?;
    let id = state.broadcaster.enqueue(raw).await.inspect_err(|e| {
        tracing::debug!("Rejected notification: {}", e);
    })?;
    tracing::info!("Accepted notification {}", id);
    Ok((StatusCode::ACCEPTED, Json(EnqueueResponse { id })))
}

async fn stream(State(state): State<AppState>) -> ApiResult<Response> {
    let subscription = state.broadcaster.subscribe().await.inspect_err(|e| {
        tracing::error!("Subscription failed: {}", e);
    })?;
    tracing::debug!("Opened event stream for {}", subscription.id());
    event_stream_response(subscription)
}
