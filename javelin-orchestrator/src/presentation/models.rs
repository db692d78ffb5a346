//! API request and response models

use chrono::{DateTime, Utc};
use javelin_core::domain::JavaVersionOption;
use javelin_deps::{DependencyRecord, UpgradeStatus};
use javelin_rewrite::{FileDiff, PreviewReport};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::PreviewOutcome;
use crate::domain::value_objects::GitPlatform;

/// Error response
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error code
    #[schema(example = "VALIDATION_ERROR")]
    pub code: String,

    /// Human-readable error message
    #[schema(example = "target_java_version 6 is outside the supported range 7-23")]
    pub message: String,

    /// Additional error context
    pub details: Option<serde_json::Value>,

    /// Unique request identifier for tracking and support
    pub request_id: Uuid,

    /// Error occurrence timestamp
    #[schema(example = "2024-01-15T10:30:00Z")]
    pub timestamp: DateTime<Utc>,
}

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,

    #[schema(example = "0.1.0")]
    pub version: String,

    pub timestamp: DateTime<Utc>,

    /// Jobs whose pipeline task is still running or queued
    pub active_jobs: usize,
}

/// Service banner served at `/`
#[derive(Serialize, ToSchema)]
pub struct ServiceInfo {
    #[schema(example = "Javelin Java Migration API")]
    pub message: String,
    pub version: String,
    /// Present when interactive docs are enabled
    pub docs: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct JobLogsResponse {
    pub job_id: Uuid,
    pub logs: Vec<String>,
}

#[derive(Serialize, ToSchema)]
pub struct JavaVersionsResponse {
    pub source_versions: Vec<JavaVersionOption>,
    pub target_versions: Vec<JavaVersionOption>,
}

#[derive(Serialize, ToSchema)]
pub struct PreviewSummary {
    pub files_to_modify: usize,
    pub files_to_create: usize,
    pub files_to_remove: usize,
    /// Rewrite occurrences across all files
    pub total_changes: usize,
}

#[derive(Serialize, ToSchema)]
pub struct DependencyOverview {
    pub current: Vec<DependencyRecord>,
    pub upgrades: Vec<DependencyRecord>,
}

/// What a migration would change, computed on a throwaway clone
#[derive(Serialize, ToSchema)]
pub struct PreviewResponse {
    pub repository: String,
    pub platform: GitPlatform,
    pub source_version: String,
    pub target_version: String,
    pub conversions: Vec<String>,
    pub business_logic_fixes: bool,
    pub summary: PreviewSummary,
    pub changes: PreviewReport,
    pub file_diffs: Vec<FileDiff>,
    pub dependencies: DependencyOverview,
}

impl PreviewResponse {
    pub fn from_outcome(outcome: PreviewOutcome, max_file_diffs: usize) -> Self {
        let PreviewOutcome {
            spec,
            analysis,
            mut report,
        } = outcome;

        let mut file_diffs = std::mem::take(&mut report.file_diffs);
        file_diffs.truncate(max_file_diffs);

        let upgrades = analysis
            .dependencies
            .iter()
            .filter(|d| d.status == UpgradeStatus::Upgraded)
            .cloned()
            .collect();

        Self {
            repository: spec.source_repo_url.clone(),
            platform: spec.platform,
            source_version: spec.source_version.to_string(),
            target_version: spec.target_version.to_string(),
            conversions: spec.conversions.iter().map(|c| c.as_str().to_string()).collect(),
            business_logic_fixes: spec.fix_business_logic,
            summary: PreviewSummary {
                files_to_modify: report.files_to_modify.len(),
                files_to_create: report.files_to_create.len(),
                files_to_remove: report.files_to_remove.len(),
                total_changes: report.total_changes(),
            },
            changes: report,
            file_diffs,
            dependencies: DependencyOverview {
                current: analysis.dependencies,
                upgrades,
            },
        }
    }
}
