//! HTTP middleware and error mapping for the web server

use axum::{
    extract::Request,
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use std::time::Instant;
use uuid::Uuid;

use crate::application::{OrchestratorError, PreviewError, WorkflowError};
use crate::presentation::models::ErrorResponse;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

fn error_response(status: StatusCode, code: &str, message: String) -> Response {
    let error_response = ErrorResponse {
        code: code.to_string(),
        message,
        details: None,
        request_id: Uuid::new_v4(),
        timestamp: Utc::now(),
    };
    (status, Json(error_response)).into_response()
}

/// Convert OrchestratorError to HTTP response
pub fn orchestrator_error_to_response(error: OrchestratorError) -> Response {
    let (status, code) = match &error {
        OrchestratorError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        OrchestratorError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        OrchestratorError::Conflict { .. } => (StatusCode::CONFLICT, "CONFLICT"),
        OrchestratorError::Workflow(WorkflowError::InvalidTransition(_)) => {
            (StatusCode::CONFLICT, "INVALID_TRANSITION")
        }
        OrchestratorError::Workflow(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    };

    if status.is_server_error() {
        tracing::error!(error = %error, http_status = %status, error_code = code, "Request failed");
    } else {
        tracing::debug!(error = %error, http_status = %status, error_code = code, "Request rejected");
    }
    error_response(status, code, error.to_string())
}

pub fn preview_error_to_response(error: PreviewError) -> Response {
    let (status, code) = match &error {
        PreviewError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        PreviewError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "PREVIEW_TIMEOUT"),
        PreviewError::Git(_) | PreviewError::Join(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "PREVIEW_FAILED")
        }
    };
    tracing::error!(error = %error, http_status = %status, error_code = code, "Preview failed");
    error_response(status, code, error.to_string())
}

/// Request logging middleware with timing and request ID.
/// A client supplied `x-request-id` is kept, otherwise one is generated.
pub async fn logging_middleware(request: Request<axum::body::Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let start_time = Instant::now();

    tracing::info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        "Processing request"
    );

    let mut response = next.run(request).await;
    let duration = start_time.elapsed();

    tracing::info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = %response.status(),
        duration_ms = duration.as_millis(),
        "Request completed"
    );

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
