// src/api/error.rs
// Maps handler failures to HTTP responses

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::advice::ValidationError;
use crate::llm::UpstreamError;

/// Message returned for every server-side failure. Upstream detail stays in the logs.
pub const GENERIC_FAILURE: &str = "Failed to get advice";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("internal error: {0}")]
    Internal(String),
}

/// `{ "error": ... }` body shared by all failures
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match &self {
            ApiError::Validation(e) => {
                warn!("Rejected advice request: {}", e);
                e.to_string()
            }
            ApiError::Upstream(e) => {
                error!(upstream_status = ?e.status(), "Advice request failed: {}", e);
                GENERIC_FAILURE.to_string()
            }
            ApiError::Internal(e) => {
                error!("Advice request failed: {}", e);
                GENERIC_FAILURE.to_string()
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode as UpstreamStatus;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_error_is_client_error() {
        let err = ApiError::from(ValidationError::MissingFields(vec!["capital"]));
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "missing required fields: capital");
    }

    #[tokio::test]
    async fn test_upstream_error_is_generic() {
        let err = ApiError::from(UpstreamError::Status {
            status: UpstreamStatus::UNAUTHORIZED,
        });
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body, serde_json::json!({ "error": GENERIC_FAILURE }));
    }
}
