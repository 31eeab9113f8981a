use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct InfoResponse {
    pub version: String,
    pub status: String,
    pub persistence: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OkResponse {
    pub ok: bool,
}

/// Service info and health
#[utoipa::path(
    get,
    path = "/info",
    responses((status = 200, description = "Service is healthy", body = InfoResponse)),
    tag = "health"
)]
pub async fn info(State(state): State<AppState>) -> Json<InfoResponse> {
    Json(InfoResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "ok".to_string(),
        persistence: state.persistence.to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/ok",
    responses((status = 200, description = "Liveness probe", body = OkResponse)),
    tag = "health"
)]
pub async fn ok() -> Json<OkResponse> {
    Json(OkResponse { ok: true })
}
