pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod run_manager;
pub mod sse;
pub mod state;

use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::handlers::{health, runs, stream, threads};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Health
        .route("/info", get(health::info))
        .route("/ok", get(health::ok))
        // Threads
        .route("/threads", post(threads::create_thread))
        // Runs
        .route("/threads/:thread_id/runs", post(runs::create_run))
        .route("/threads/:thread_id/runs/:run_id/join", get(runs::join_run))
        .route("/threads/:thread_id/runs/stream", post(stream::stream_run))
        // Docs
        .route("/openapi.json", get(openapi::openapi_json));

    let request_timeout = Duration::from_secs(state.config.server.request_timeout_secs);
    let cors = build_cors_layer(&state.config.server);

    api_routes
        .layer(axum::middleware::from_fn(middleware::logging::log_request))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if config.cors_origins.is_empty() || config.cors_origins.iter().any(|o| o == "*") {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    cors.allow_origin(AllowOrigin::list(origins))
}
