use axum::{extract::State, response::Json};
use chrono::Utc;

use crate::presentation::controllers::AppState;
use crate::presentation::models::{HealthResponse, ServiceInfo};

/// GET /health
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse)),
    tag = "health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        active_jobs: state.orchestrator.active_jobs(),
    })
}

/// GET /
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service banner", body = ServiceInfo)),
    tag = "health"
)]
pub async fn root_handler(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "Javelin Java Migration API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        docs: state.enable_docs.then(|| "/docs".to_string()),
    })
}
