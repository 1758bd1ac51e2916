// src/api/handlers.rs
// HTTP handlers for the advice endpoint

use axum::{
    Json,
    body::Body,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::header,
    response::{IntoResponse, Response},
};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::error::{ApiError, ApiResult};
use crate::advice::{AdviceRequest, AdviceRequestBody, AdviceResult, AdviceStream, ValidationError};
use crate::state::AppState;

pub const STREAM_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

#[derive(Debug, Default, Deserialize)]
pub struct AdviceQuery {
    #[serde(default)]
    pub stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdviceResponse {
    pub advice: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub model: String,
    pub version: &'static str,
}

/// GET /api/status
pub async fn status_handler(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok",
        model: state.client.config().model.clone(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// POST /api/advice[?stream=true|false]
pub async fn advice_handler(
    State(state): State<AppState>,
    query: Result<Query<AdviceQuery>, QueryRejection>,
    body: Result<Json<AdviceRequestBody>, JsonRejection>,
) -> ApiResult<Response> {
    let Query(query) = query.map_err(|e| ValidationError::InvalidQuery(e.body_text()))?;
    let Json(body) = body.map_err(|e| ValidationError::Malformed(e.body_text()))?;

    let request = AdviceRequest::from_body(body, query.stream)?;
    let prompt = request.prompt();

    debug!(
        language = request.language.code(),
        stream = request.stream,
        prompt_bytes = prompt.len(),
        "Handling advice request"
    );

    match state.client.advise(&prompt, request.stream).await? {
        AdviceResult::Complete(advice) => {
            info!(bytes = advice.len(), "Advice generated");
            Ok(Json(AdviceResponse { advice }).into_response())
        }
        AdviceResult::Streaming(fragments) => stream_response(fragments),
    }
}

/// Chunked plain-text response carrying the relayed fragments
fn stream_response(fragments: AdviceStream) -> ApiResult<Response> {
    let body = fragments.inspect(|item| {
        if let Err(e) = item {
            // Aborts the chunked body; the client sees a truncated transfer
            warn!("Advice stream ended abnormally: {}", e);
        }
    });

    Response::builder()
        .header(header::CONTENT_TYPE, STREAM_CONTENT_TYPE)
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from_stream(body))
        .map_err(|e| ApiError::Internal(e.to_string()))
}
