use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::header::{HeaderName, CACHE_CONTROL},
    response::{sse::Sse, IntoResponse},
    Json,
};
use ragent_types::{RunConfig, RunInput};
use serde::Deserialize;
use utoipa::ToSchema;

use super::runs::prepare_run;
use crate::error::ApiResult;
use crate::sse::{run_event_stream, FrameBuilder, DEFAULT_STREAM_MODE};
use crate::state::AppState;

const X_ACCEL_BUFFERING: HeaderName = HeaderName::from_static("x-accel-buffering");

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct StreamRunRequest {
    #[serde(default)]
    pub assistant_id: Option<String>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub input: RunInput,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub config: RunConfig,
    /// SSE `event:` name of every frame
    #[serde(default)]
    pub stream_mode: Option<String>,
}

/// Run and stream its execution events as Server-Sent Events
#[utoipa::path(
    post,
    path = "/threads/{thread_id}/runs/stream",
    params(("thread_id" = String, Path, description = "Thread id")),
    request_body = StreamRunRequest,
    responses(
        (status = 200, description = "Event stream", content_type = "text/event-stream"),
        (status = 400, description = "Malformed request body")
    ),
    tag = "runs"
)]
pub async fn stream_run(
    State(state): State<AppState>,
    Path(thread_id): Path<String>,
    payload: Result<Json<StreamRunRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = payload?;
    let stream_mode = req
        .stream_mode
        .clone()
        .filter(|mode| !mode.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_STREAM_MODE.to_string());
    let input = serde_json::to_value(&req.input).unwrap_or_default();

    let (ctx, run_state) = prepare_run(
        &state,
        &thread_id,
        req.assistant_id.as_deref(),
        req.input,
        &req.config,
    );
    tracing::info!(run_id = %ctx.run_id, thread_id = %thread_id, "Streaming run");

    let frames = FrameBuilder::new(ctx.run_id.clone());
    let events = state.graph.spawn_run(run_state, ctx);

    Ok((
        [
            (CACHE_CONTROL, "no-cache"),
            (X_ACCEL_BUFFERING, "no"),
        ],
        Sse::new(run_event_stream(events, frames, stream_mode, input)),
    ))
}
