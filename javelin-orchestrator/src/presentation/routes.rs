//! Route definitions and server setup

use axum::http::StatusCode;
use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use javelin_core::config::ServerConfig;

use crate::presentation::{
    controllers::{
        AppState,
        catalog::{conversion_types, java_versions, recipes},
        health::{health_check, root_handler},
        migrations::{
            cancel_migration, download_jmeter_plan, download_report, get_migration,
            get_migration_logs, list_migrations, preview_migration, start_migration,
        },
    },
    middleware::{REQUEST_ID_HEADER, logging_middleware},
    models::*,
};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::controllers::migrations::start_migration,
        crate::presentation::controllers::migrations::preview_migration,
        crate::presentation::controllers::migrations::get_migration,
        crate::presentation::controllers::migrations::get_migration_logs,
        crate::presentation::controllers::migrations::cancel_migration,
        crate::presentation::controllers::migrations::list_migrations,
        crate::presentation::controllers::migrations::download_report,
        crate::presentation::controllers::migrations::download_jmeter_plan,
        crate::presentation::controllers::catalog::conversion_types,
        crate::presentation::controllers::catalog::java_versions,
        crate::presentation::controllers::catalog::recipes,
        crate::presentation::controllers::health::health_check,
        crate::presentation::controllers::health::root_handler
    ),
    components(
        schemas(
            crate::domain::request::MigrationRequest,
            crate::domain::entities::MigrationJob,
            crate::domain::entities::QualityMetrics,
            crate::domain::value_objects::JobStatus,
            crate::domain::value_objects::JobTransition,
            crate::domain::value_objects::GitPlatform,
            javelin_core::ConversionType,
            javelin_core::domain::ConversionTypeInfo,
            javelin_core::domain::JavaVersionOption,
            javelin_rewrite::Issue,
            javelin_rewrite::IssueStatus,
            javelin_rewrite::ApiEndpoint,
            javelin_rewrite::PreviewReport,
            javelin_rewrite::FileDiff,
            javelin_rewrite::DependencyUpdate,
            javelin_rewrite::Recipe,
            javelin_deps::DependencyRecord,
            javelin_deps::UpgradeStatus,
            ErrorResponse,
            HealthResponse,
            ServiceInfo,
            JobLogsResponse,
            JavaVersionsResponse,
            PreviewResponse,
            PreviewSummary,
            DependencyOverview
        )
    ),
    tags(
        (name = "migrations", description = "Start, track, cancel and preview repository migrations"),
        (name = "catalog", description = "Conversion types, Java versions and recipe listings"),
        (name = "health", description = "Liveness and service information")
    ),
    info(
        title = "Javelin API",
        version = "1.0.0",
        description = "Migrates Java repositories between language versions and frameworks, runs tests and quality scans on the result, and publishes it as a new repository."
    ),
    servers(
        (url = "http://localhost:8001", description = "Local development server")
    )
)]
pub struct ApiDoc;

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let methods = [
        axum::http::Method::GET,
        axum::http::Method::POST,
        axum::http::Method::OPTIONS,
    ];
    let headers = [
        axum::http::header::CONTENT_TYPE,
        axum::http::header::ACCEPT,
        axum::http::header::ORIGIN,
        axum::http::HeaderName::from_static(REQUEST_ID_HEADER),
    ];

    if config.allowed_origins.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(tower_http::cors::AllowOrigin::any())
            .allow_methods(methods)
            .allow_headers(headers)
            .max_age(Duration::from_secs(3600));
    }

    let origins: Vec<axum::http::HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| {
            axum::http::HeaderValue::from_str(origin)
                .map_err(|_| {
                    tracing::warn!(origin, "Invalid CORS origin in config; skipping");
                })
                .ok()
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers(headers)
        .max_age(Duration::from_secs(3600))
}

/// Create the application router with its middleware stack
pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    // Preview clones and rewrites a whole repository inside the request
    let preview_routes = Router::new()
        .route("/migration/preview", post(preview_migration))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.preview_timeout_seconds),
        ));

    let job_routes = Router::new()
        .route("/migration/start", post(start_migration))
        .route("/migration/{id}", get(get_migration))
        .route("/migration/{id}/logs", get(get_migration_logs))
        .route("/migration/{id}/cancel", post(cancel_migration))
        .route("/migration/{id}/report", get(download_report))
        .route("/migration/{id}/jmeter", get(download_jmeter_plan))
        .route("/migrations", get(list_migrations))
        .route("/conversion-types", get(conversion_types))
        .route("/java-versions", get(java_versions))
        .route("/openrewrite/recipes", get(recipes))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_seconds),
        ));

    let health_routes = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check));

    let mut router = Router::new()
        .nest("/api", preview_routes.merge(job_routes))
        .merge(health_routes);

    if config.enable_docs {
        router =
            router.merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }

    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(config))
        .layer(middleware::from_fn(logging_middleware));

    router.layer(service_builder).with_state(state)
}
