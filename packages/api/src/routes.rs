//! Router assembly and shared application state.

use std::time::Duration;

use actors::{Broadcaster, ChatRelay};
use axum::{Json, Router, http, routing::get};
use serde_json::{Value, json};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{chat, notifications};

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub broadcaster: Broadcaster,
    pub chat: ChatRelay,
}

impl AppState {
    pub fn new(broadcaster: Broadcaster, chat: ChatRelay) -> Self {
        Self { broadcaster, chat }
    }
}

pub fn health_router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(notifications::router())
        .merge(chat::router())
}

/// CORS layer from a comma-separated origin list, `*` allowing any origin.
pub fn cors_layer(allowed_origins: &str) -> CorsLayer {
    if allowed_origins.trim() == "*" {
        return CorsLayer::very_permissive();
    }

    let origins = parse_origins(allowed_origins);
    if origins.is_empty() {
        tracing::warn!("ALLOWED_ORIGINS has no valid origin, cross-origin requests will be refused");
    }
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([http::Method::GET, http::Method::POST])
        .allow_headers(Any)
        .max_age(Duration::from_secs(60 * 60))
}

/// Parse a comma-separated origin list, logging and skipping invalid entries.
fn parse_origins(allowed_origins: &str) -> Vec<http::HeaderValue> {
    let mut origins = Vec::new();
    for origin in allowed_origins.split(',').map(str::trim) {
        if origin.is_empty() {
            continue;
        }
        match origin.parse::<http::HeaderValue>() {
            Ok(value) => origins.push(value),
            Err(e) => {
                tracing::warn!("Ignoring invalid origin {:?} in ALLOWED_ORIGINS: {}", origin, e)
            }
        }
    }
    origins
}

/// Full application router.
pub fn app(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .merge(health_router())
        .nest("/api", api_router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_origin_list() {
        let origins = parse_origins("https://a.example, https://b.example,");
        assert_eq!(origins, ["https://a.example", "https://b.example"]);
    }

    #[test]
    fn skips_invalid_origins() {
        let origins = parse_origins("https://a.example,https://bad\u{7f}.example");
        assert_eq!(origins, ["https://a.example"]);
        assert!(parse_origins("\u{7f}").is_empty());
    }
}
