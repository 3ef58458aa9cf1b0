use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use shared::asset_id::IdError;
use crate::store::error::StoreError;

/// Error returned by API handlers; renders as `{"error": ..., "code": ...}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    BadRequest(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::Store(err) => match err {
                StoreError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
                StoreError::Duplicate(_) => (StatusCode::CONFLICT, "DUPLICATE", err.to_string()),
                StoreError::Invalid(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string()),
                StoreError::Id(IdError::SequenceExhausted { .. }) => {
                    (StatusCode::CONFLICT, "ID_EXHAUSTED", err.to_string())
                }
                StoreError::Id(IdError::InvalidSegment { .. }) | StoreError::Internal(_) => {
                    tracing::error!("Store error: {:#}", err);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        (status, Json(json!({ "error": message, "code": code }))).into_response()
    }
}
