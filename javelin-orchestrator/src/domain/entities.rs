//! Domain entities for the migration orchestrator

use chrono::{DateTime, Utc};
use javelin_core::ConversionType;
use javelin_deps::DependencyRecord;
use javelin_rewrite::{ApiEndpoint, Issue, IssueStatus};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::request::{JobSpec, MigrationRequest};
use super::value_objects::{GitPlatform, JobStatus, JobTransition, JobTransitionError};

/// Code quality figures gathered after migration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct QualityMetrics {
    /// `OK`, `ERROR`, `Passed`, ... as reported by the quality service
    pub quality_gate: Option<String>,
    pub bugs: u64,
    pub vulnerabilities: u64,
    pub code_smells: u64,
    pub coverage: f64,
    pub duplications: f64,
    pub analysis_url: Option<String>,
}

/// A repository migration tracked from request to completion
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MigrationJob {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub progress_percent: u8,
    pub current_step: String,
    pub source_repo: String,
    /// Web URL of the published repository
    pub target_repo: Option<String>,
    pub platform: GitPlatform,
    pub source_java_version: String,
    pub target_java_version: String,
    pub conversion_types: Vec<ConversionType>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    /// `[HH:MM:SS] message` lines in the order they happened
    pub migration_log: Vec<String>,
    pub issues: Vec<Issue>,
    pub dependencies: Vec<DependencyRecord>,
    pub api_endpoints: Vec<ApiEndpoint>,
    pub files_modified: usize,
    pub issues_fixed: usize,
    pub total_errors: usize,
    pub total_warnings: usize,
    pub errors_fixed: usize,
    pub warnings_fixed: usize,
    pub api_endpoints_validated: usize,
    pub api_endpoints_working: usize,
    pub quality: QualityMetrics,
    pub error_message: Option<String>,
    pub transitions: Vec<JobTransition>,
}

pub const INITIAL_STEP: &str = "Initializing migration...";

pub fn log_line(at: DateTime<Utc>, message: &str) -> String {
    format!("[{}] {}", at.format("%H:%M:%S"), message)
}

impl MigrationJob {
    pub fn new(request: &MigrationRequest, spec: &JobSpec) -> Self {
        Self {
            job_id: Uuid::new_v4(),
            status: JobStatus::Pending,
            progress_percent: 0,
            current_step: INITIAL_STEP.to_string(),
            source_repo: spec.source_repo_url.clone(),
            target_repo: None,
            platform: spec.platform,
            source_java_version: request.source_java_version.trim().to_string(),
            target_java_version: request.target_java_version.trim().to_string(),
            conversion_types: spec.conversions.clone(),
            started_at: Utc::now(),
            completed_at: None,
            migration_log: Vec::new(),
            issues: Vec::new(),
            dependencies: Vec::new(),
            api_endpoints: Vec::new(),
            files_modified: 0,
            issues_fixed: 0,
            total_errors: 0,
            total_warnings: 0,
            errors_fixed: 0,
            warnings_fixed: 0,
            api_endpoints_validated: 0,
            api_endpoints_working: 0,
            quality: QualityMetrics::default(),
            error_message: None,
            transitions: Vec::new(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn add_log(&mut self, message: &str) {
        self.migration_log.push(log_line(Utc::now(), message));
    }

    /// Moves to `target`, records the transition and logs `step`.
    /// Progress never goes backwards.
    pub fn transition_to(
        &mut self,
        target: JobStatus,
        progress: Option<u8>,
        step: &str,
    ) -> Result<(), JobTransitionError> {
        if !self.status.can_transition_to(&target) {
            return Err(JobTransitionError {
                from: self.status,
                to: target,
            });
        }
        self.transitions.push(JobTransition {
            from: self.status,
            to: target,
            timestamp: Utc::now(),
            reason: Some(step.to_string()),
        });
        self.status = target;
        if let Some(progress) = progress.or(target.entry_progress()) {
            self.raise_progress(progress);
        }
        self.current_step = step.to_string();
        self.add_log(step);
        if target.is_terminal() {
            self.completed_at = Some(Utc::now());
        }
        Ok(())
    }

    /// Step change inside the current state
    pub fn update_step(&mut self, progress: u8, step: &str) {
        self.raise_progress(progress);
        self.current_step = step.to_string();
        self.add_log(step);
    }

    fn raise_progress(&mut self, progress: u8) {
        self.progress_percent = self.progress_percent.max(progress.min(100));
    }

    pub fn fail(&mut self, message: &str) -> Result<(), JobTransitionError> {
        self.transition_to(JobStatus::Failed, None, "Migration failed")?;
        self.error_message = Some(message.to_string());
        self.add_log(&format!("ERROR: {}", message));
        Ok(())
    }

    pub fn cancel(&mut self, reason: &str) -> Result<(), JobTransitionError> {
        self.transition_to(JobStatus::Cancelled, None, reason)
    }

    /// Replaces the issue list and recomputes the error/warning totals
    pub fn record_issues(&mut self, issues: Vec<Issue>) {
        self.total_errors = issues.iter().filter(|i| i.is_error()).count();
        self.total_warnings = issues.iter().filter(|i| i.is_warning()).count();
        self.issues = issues;
        self.refresh_fixed_counters();
    }

    pub fn refresh_fixed_counters(&mut self) {
        let fixed = |issue: &&Issue| issue.status == IssueStatus::Fixed;
        self.errors_fixed = self.issues.iter().filter(|i| i.is_error()).filter(fixed).count();
        self.warnings_fixed = self.issues.iter().filter(|i| i.is_warning()).filter(fixed).count();
    }

    pub fn duration(&self) -> Option<chrono::Duration> {
        self.completed_at.map(|end| end - self.started_at)
    }
}

/// `1h 2m 3s`, `2m 3s` or `3s`
pub fn format_duration(duration: chrono::Duration) -> String {
    let total = duration.num_seconds().max(0);
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}
