use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

/// Log method, path, status and latency of every request
///
/// For streaming responses the latency covers the time to the first byte
/// of the response, not the whole stream.
pub async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let started = Instant::now();

    let response = next.run(req).await;

    let status = response.status();
    let latency_ms = started.elapsed().as_millis() as u64;
    if status.is_server_error() {
        tracing::warn!(%method, %uri, status = status.as_u16(), latency_ms, "Request failed");
    } else {
        tracing::info!(%method, %uri, status = status.as_u16(), latency_ms, "Request handled");
    }

    response
}
