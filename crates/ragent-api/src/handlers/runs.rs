use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use ragent_types::{RunConfig, RunContext, RunInput, RunState};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateRunRequest {
    #[serde(default)]
    pub assistant_id: Option<String>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub input: RunInput,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub config: RunConfig,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RunCreatedResponse {
    pub run_id: String,
    pub thread_id: String,
    pub status: String,
}

/// Identity, effective role and initial state of a new run
pub(crate) fn prepare_run(
    state: &AppState,
    thread_id: &str,
    assistant_id: Option<&str>,
    input: RunInput,
    config: &RunConfig,
) -> (RunContext, RunState) {
    let expected = state.config.server.assistant_id.as_str();
    if let Some(assistant_id) = assistant_id.filter(|id| *id != expected) {
        tracing::warn!(assistant_id, expected, "Unexpected assistant id, running anyway");
    }

    let run_id = uuid::Uuid::new_v4().to_string();
    let ctx = RunContext::from_request(
        run_id,
        thread_id,
        &config.configurable,
        input.user_role.as_deref(),
    );
    let run_state = RunState::from_input(input, thread_id, ctx.user_role);
    (ctx, run_state)
}

/// Schedule a run and return immediately
#[utoipa::path(
    post,
    path = "/threads/{thread_id}/runs",
    params(("thread_id" = String, Path, description = "Thread id")),
    request_body = CreateRunRequest,
    responses(
        (status = 200, description = "Run scheduled", body = RunCreatedResponse),
        (status = 400, description = "Malformed request body")
    ),
    tag = "runs"
)]
pub async fn create_run(
    State(state): State<AppState>,
    Path(thread_id): Path<String>,
    payload: Result<Json<CreateRunRequest>, JsonRejection>,
) -> ApiResult<Json<RunCreatedResponse>> {
    let Json(req) = payload?;
    let (ctx, run_state) = prepare_run(
        &state,
        &thread_id,
        req.assistant_id.as_deref(),
        req.input,
        &req.config,
    );
    let run_id = ctx.run_id.clone();

    let graph = state.graph.clone();
    state
        .runs
        .start(run_id.clone(), async move { graph.invoke(run_state, &ctx).await });

    Ok(Json(RunCreatedResponse {
        run_id,
        thread_id,
        status: "pending".to_string(),
    }))
}

/// Wait for a run and return its final state
///
/// The result is handed out once; joining again is a 404.
#[utoipa::path(
    get,
    path = "/threads/{thread_id}/runs/{run_id}/join",
    params(
        ("thread_id" = String, Path, description = "Thread id"),
        ("run_id" = String, Path, description = "Run id")
    ),
    responses(
        (status = 200, description = "Final run state wrapped in `values`"),
        (status = 404, description = "Unknown or already joined run"),
        (status = 500, description = "Run failed or timed out")
    ),
    tag = "runs"
)]
pub async fn join_run(
    State(state): State<AppState>,
    Path((thread_id, run_id)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    tracing::debug!(thread_id = %thread_id, run_id = %run_id, "Joining run");

    let timeout = state.config.runs.join_timeout();
    let final_state = state.runs.join(&run_id, timeout).await?;

    Ok(Json(json!({ "values": final_state })))
}
