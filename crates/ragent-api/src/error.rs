use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::run_manager::RunError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Run not found: {0}")]
    RunNotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Run failed: {0}")]
    RunFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RunError> for ApiError {
    fn from(err: RunError) -> Self {
        match err {
            RunError::NotFound(_) => ApiError::RunNotFound(err.to_string()),
            RunError::TimedOut(_) | RunError::Failed { .. } => ApiError::RunFailed(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(format!("{:#}", err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::RunNotFound(_) => (StatusCode::NOT_FOUND, "Run not found".to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::RunFailed(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::RunNotFound("r1".into()), StatusCode::NOT_FOUND),
            (ApiError::BadRequest("bad".into()), StatusCode::BAD_REQUEST),
            (ApiError::RunFailed("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (ApiError::Internal("db".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn test_run_errors_map_to_api_errors() {
        assert!(matches!(
            ApiError::from(RunError::NotFound("r1".into())),
            ApiError::RunNotFound(_)
        ));
        assert!(matches!(
            ApiError::from(RunError::TimedOut("r1".into())),
            ApiError::RunFailed(msg) if msg == "Run r1 timed out"
        ));
    }
}
