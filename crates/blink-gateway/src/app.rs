use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{create_url_handler, health_handler, redirect_handler, stats_handler};
use crate::state::AppState;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Self::router_with_timeout(state, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn router_with_timeout(state: AppState, request_timeout: Duration) -> Router {
        Router::new()
            .route("/", post(create_url_handler))
            .route("/health", get(health_handler))
            .route("/stats/{short_code}", get(stats_handler))
            .route("/{short_code}", get(redirect_handler))
            .with_state(state)
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                request_timeout,
            ))
            .layer(TraceLayer::new_for_http())
    }
}
