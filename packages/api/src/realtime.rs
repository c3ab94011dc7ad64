//! Real-time notification delivery via Server-Sent Events.

use std::convert::Infallible;

use actors::Subscription;
use axum::{
    body::Body,
    http::{HeaderValue, StatusCode, header},
    response::Response,
};
use futures_util::StreamExt;

use crate::errors::ApiError;

/// Build the long-lived event-stream response for a subscription.
///
/// The heartbeat is already queued on the subscription, so the client sees
/// a frame as soon as headers are flushed.
pub fn event_stream_response(subscription: Subscription) -> Result<Response, ApiError> {
    let frames = subscription.into_stream().map(Ok::<_, Infallible>);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache, no-transform")
        .header(header::CONNECTION, "keep-alive")
        .header("x-accel-buffering", HeaderValue::from_static("no"))
        .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .body(Body::from_stream(frames))
        .map_err(|e| ApiError::Internal(format!("failed to build stream response: {}", e)))
}
