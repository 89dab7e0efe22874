//! Route configuration and setup

use crate::constants::{
    DEFAULT_CONCURRENCY_LIMIT, HEALTH_PATH, LEGACY_SEND_EMAIL_PATH, SEND_EMAIL_PATH,
};
use crate::handlers;
use crate::middleware::cors_headers_middleware;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{any, get},
    Router,
};
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::trace::TraceLayer;

/// Build the router. The relay path accepts any method; the handler gates it.
pub fn setup_routes(state: Arc<AppState>) -> Router<()> {
    let http_concurrency_limit = std::env::var("HTTP_CONCURRENCY_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_CONCURRENCY_LIMIT)
        .max(1);
    let max_body_bytes = state.config.max_request_body_bytes;
    tracing::debug!(
        http_concurrency_limit,
        max_body_bytes,
        "HTTP limits configured"
    );

    Router::new()
        .route(HEALTH_PATH, get(handlers::health::health_check))
        .route(SEND_EMAIL_PATH, any(handlers::send_email::send_email))
        .route(LEGACY_SEND_EMAIL_PATH, any(handlers::send_email::send_email))
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(cors_headers_middleware))
        .with_state(state)
}
