use axum::Json;
use utoipa::OpenApi;

use crate::handlers::{health, runs, stream, threads};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Ragent API",
        description = "Retrieval-augmented agent runs over threads, with SSE streaming"
    ),
    paths(
        health::info,
        health::ok,
        threads::create_thread,
        runs::create_run,
        runs::join_run,
        stream::stream_run,
    ),
    components(schemas(
        health::InfoResponse,
        health::OkResponse,
        threads::CreateThreadRequest,
        threads::ThreadResponse,
        runs::CreateRunRequest,
        runs::RunCreatedResponse,
        stream::StreamRunRequest,
    )),
    tags(
        (name = "health", description = "Liveness and service info"),
        (name = "threads", description = "Conversation threads"),
        (name = "runs", description = "Agent runs")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
