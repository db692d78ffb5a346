//! Migration job endpoints

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
};
use uuid::Uuid;

use crate::domain::entities::MigrationJob;
use crate::domain::request::MigrationRequest;
use crate::infrastructure::reports::{render_html_report, render_jmeter_plan};
use crate::presentation::controllers::AppState;
use crate::presentation::middleware::{orchestrator_error_to_response, preview_error_to_response};
use crate::presentation::models::{ErrorResponse, JobLogsResponse, PreviewResponse};

/// POST /api/migration/start - Validate and start a migration job
#[utoipa::path(
    post,
    path = "/api/migration/start",
    request_body = MigrationRequest,
    responses(
        (status = 200, description = "Job accepted in PENDING state", body = MigrationJob),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    ),
    tag = "migrations"
)]
pub async fn start_migration(
    State(state): State<AppState>,
    Json(request): Json<MigrationRequest>,
) -> Result<Json<MigrationJob>, Response> {
    state
        .orchestrator
        .create_job(request)
        .map(Json)
        .map_err(orchestrator_error_to_response)
}

/// GET /api/migration/{id} - Current job state
#[utoipa::path(
    get,
    path = "/api/migration/{id}",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Job found", body = MigrationJob),
        (status = 404, description = "Job not found", body = ErrorResponse)
    ),
    tag = "migrations"
)]
pub async fn get_migration(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MigrationJob>, Response> {
    state
        .orchestrator
        .get_job(id)
        .map(Json)
        .map_err(orchestrator_error_to_response)
}

/// GET /api/migration/{id}/logs - Job log lines
#[utoipa::path(
    get,
    path = "/api/migration/{id}/logs",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Log lines in order", body = JobLogsResponse),
        (status = 404, description = "Job not found", body = ErrorResponse)
    ),
    tag = "migrations"
)]
pub async fn get_migration_logs(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobLogsResponse>, Response> {
    let logs = state
        .orchestrator
        .job_logs(id)
        .map_err(orchestrator_error_to_response)?;
    Ok(Json(JobLogsResponse { job_id: id, logs }))
}

/// POST /api/migration/{id}/cancel - Request cancellation of a running job
#[utoipa::path(
    post,
    path = "/api/migration/{id}/cancel",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 202, description = "Cancellation requested", body = MigrationJob),
        (status = 404, description = "Job not found", body = ErrorResponse),
        (status = 409, description = "Job already finished", body = ErrorResponse)
    ),
    tag = "migrations"
)]
pub async fn cancel_migration(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<MigrationJob>), Response> {
    let job = state
        .orchestrator
        .cancel_job(id)
        .map_err(orchestrator_error_to_response)?;
    Ok((StatusCode::ACCEPTED, Json(job)))
}

/// GET /api/migrations - Every job, oldest first
#[utoipa::path(
    get,
    path = "/api/migrations",
    responses((status = 200, description = "All jobs", body = [MigrationJob])),
    tag = "migrations"
)]
pub async fn list_migrations(State(state): State<AppState>) -> Json<Vec<MigrationJob>> {
    Json(state.orchestrator.list_jobs())
}

fn attachment(content_type: &'static str, filename: String, body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", filename),
            ),
        ],
        body,
    )
        .into_response()
}

/// GET /api/migration/{id}/report - HTML report download
#[utoipa::path(
    get,
    path = "/api/migration/{id}/report",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "HTML report", content_type = "text/html"),
        (status = 404, description = "Job not found", body = ErrorResponse)
    ),
    tag = "migrations"
)]
pub async fn download_report(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match state.orchestrator.get_job(id) {
        Ok(job) => attachment(
            "text/html; charset=utf-8",
            format!("migration-report-{}.html", id),
            render_html_report(&job),
        ),
        Err(e) => orchestrator_error_to_response(e),
    }
}

/// GET /api/migration/{id}/jmeter - JMeter test plan download
#[utoipa::path(
    get,
    path = "/api/migration/{id}/jmeter",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "JMeter test plan", content_type = "application/xml"),
        (status = 404, description = "Job not found", body = ErrorResponse)
    ),
    tag = "migrations"
)]
pub async fn download_jmeter_plan(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match state.orchestrator.get_job(id) {
        Ok(job) => attachment(
            "application/xml",
            format!("migration-test-{}.jmx", id),
            render_jmeter_plan(&job),
        ),
        Err(e) => orchestrator_error_to_response(e),
    }
}

/// POST /api/migration/preview - Dry-run a migration without pushing anything
#[utoipa::path(
    post,
    path = "/api/migration/preview",
    request_body = MigrationRequest,
    responses(
        (status = 200, description = "Changes the migration would make", body = PreviewResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Preview failed", body = ErrorResponse),
        (status = 504, description = "Preview timed out", body = ErrorResponse)
    ),
    tag = "migrations"
)]
pub async fn preview_migration(
    State(state): State<AppState>,
    Json(request): Json<MigrationRequest>,
) -> Result<Json<PreviewResponse>, Response> {
    let outcome = state
        .preview
        .preview(request)
        .await
        .map_err(preview_error_to_response)?;
    Ok(Json(PreviewResponse::from_outcome(outcome, state.max_file_diffs)))
}
