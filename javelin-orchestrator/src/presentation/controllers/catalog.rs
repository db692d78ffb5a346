//! Static catalogs for building a migration request

use axum::response::Json;
use javelin_core::ConversionType;
use javelin_core::domain::{ConversionTypeInfo, java_version_catalog};
use javelin_rewrite::{Recipe, recipe_catalog};

use crate::presentation::models::JavaVersionsResponse;

/// GET /api/conversion-types
#[utoipa::path(
    get,
    path = "/api/conversion-types",
    responses((status = 200, description = "Selectable conversion types", body = [ConversionTypeInfo])),
    tag = "catalog"
)]
pub async fn conversion_types() -> Json<Vec<ConversionTypeInfo>> {
    Json(ConversionType::catalog())
}

/// GET /api/java-versions
#[utoipa::path(
    get,
    path = "/api/java-versions",
    responses((status = 200, description = "Supported source and target versions", body = JavaVersionsResponse)),
    tag = "catalog"
)]
pub async fn java_versions() -> Json<JavaVersionsResponse> {
    let versions = java_version_catalog();
    Json(JavaVersionsResponse {
        source_versions: versions.clone(),
        target_versions: versions,
    })
}

/// GET /api/openrewrite/recipes
#[utoipa::path(
    get,
    path = "/api/openrewrite/recipes",
    responses((status = 200, description = "Known OpenRewrite recipes", body = [Recipe])),
    tag = "catalog"
)]
pub async fn recipes() -> Json<&'static [Recipe]> {
    Json(recipe_catalog())
}
