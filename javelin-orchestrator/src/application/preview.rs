//! Dry-run previews against a throwaway clone

use std::sync::Arc;
use std::time::Duration;

use javelin_rewrite::{PreviewEngine, PreviewReport, ProjectAnalysis, ProjectAnalyzer};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::request::{JobSpec, MigrationRequest, ValidationError};
use crate::domain::services::{GitServiceError, RepositoryHost};
use crate::infrastructure::git::with_request_git_token;

#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Preview failed: {0}")]
    Git(#[from] GitServiceError),

    #[error("Preview did not finish within {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Preview failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Everything the preview endpoint reports
#[derive(Debug, Clone)]
pub struct PreviewOutcome {
    pub spec: JobSpec,
    pub analysis: ProjectAnalysis,
    pub report: PreviewReport,
}

pub struct PreviewService {
    repository_host: Arc<dyn RepositoryHost>,
    engine: Arc<PreviewEngine>,
    analyzer: Arc<ProjectAnalyzer>,
    budget: Duration,
}

impl PreviewService {
    pub fn new(repository_host: Arc<dyn RepositoryHost>, engine: PreviewEngine, budget: Duration) -> Self {
        Self {
            repository_host,
            engine: Arc::new(engine),
            analyzer: Arc::new(ProjectAnalyzer::new()),
            budget,
        }
    }

    /// Clones the repository, simulates the plan and throws the clone away.
    /// Nothing is pushed and no job is recorded.
    #[instrument(skip(self, request), fields(source = %request.source_repo_url))]
    pub async fn preview(&self, request: MigrationRequest) -> Result<PreviewOutcome, PreviewError> {
        let spec = request.validate()?;
        let preview_id = Uuid::new_v4();

        let outcome = tokio::time::timeout(
            self.budget,
            with_request_git_token(spec.token.clone(), self.simulate(preview_id, &spec)),
        )
        .await;
        self.repository_host.cleanup(preview_id).await;

        let (analysis, report) = outcome.map_err(|_| PreviewError::Timeout(self.budget))??;
        info!(
            files_to_modify = report.files_to_modify.len(),
            total_changes = report.total_changes(),
            "Preview finished"
        );
        Ok(PreviewOutcome {
            spec,
            analysis,
            report,
        })
    }

    async fn simulate(
        &self,
        preview_id: Uuid,
        spec: &JobSpec,
    ) -> Result<(ProjectAnalysis, PreviewReport), PreviewError> {
        let checkout = self
            .repository_host
            .clone_repository(preview_id, &spec.source_repo_url)
            .await?;

        let engine = self.engine.clone();
        let analyzer = self.analyzer.clone();
        let plan = spec.plan();
        let root = checkout.checkout_path;
        let result = tokio::task::spawn_blocking(move || {
            let analysis = analyzer.analyze(&root);
            let report = engine.preview(&root, &plan);
            (analysis, report)
        })
        .await?;
        Ok(result)
    }
}
