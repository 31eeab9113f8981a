use axum::{extract::rejection::JsonRejection, Json};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::error::ApiResult;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateThreadRequest {
    #[serde(default)]
    pub thread_id: Option<String>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ThreadResponse {
    pub thread_id: String,
    #[schema(value_type = Object)]
    pub metadata: Map<String, Value>,
    pub status: String,
}

/// Create or acknowledge a thread
///
/// Threads are implicit: one exists as soon as its history has a checkpoint,
/// so this only echoes (or mints) the id.
#[utoipa::path(
    post,
    path = "/threads",
    request_body = CreateThreadRequest,
    responses((status = 200, description = "Thread acknowledged", body = ThreadResponse)),
    tag = "threads"
)]
pub async fn create_thread(
    payload: Result<Json<CreateThreadRequest>, JsonRejection>,
) -> ApiResult<Json<ThreadResponse>> {
    let Json(req) = payload?;
    let thread_id = req
        .thread_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    Ok(Json(ThreadResponse {
        thread_id,
        metadata: req.metadata,
        status: "ok".to_string(),
    }))
}
