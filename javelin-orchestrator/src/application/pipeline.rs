//! The per-job migration pipeline.
//!
//! One call to [`MigrationPipeline::run`] drives a job from PENDING to a
//! terminal state:
//!
//! ```text
//! clone → analyze → migrate → [test] → [quality scan] → push → [notify] → complete
//! ```
//!
//! Each stage runs under its own time budget and races the job's
//! cancellation token. File-system heavy work (analysis, rewriting, fix
//! verification) runs on the blocking pool.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use javelin_core::config::PipelineConfig;
use javelin_rewrite::{
    IssueScanner, IssueStatus, ProjectAnalysis, ProjectAnalyzer, RuleCatalog, TransformationEngine,
    TransformationReport,
};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

use super::workflow::{JobWorkflow, WorkflowError};
use crate::domain::request::JobSpec;
use crate::domain::services::{
    Delivery, Notifier, PublishRequest, QualityScanner, RepositoryHost, TestRunner,
};
use crate::domain::value_objects::{JobStatus, progress};
use crate::infrastructure::git::with_request_git_token;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that end a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A collaborator (git host, test runner, quality service) failed
    #[error("{stage} failed: {source}")]
    External {
        stage: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("{stage} did not finish within {}s", budget.as_secs())]
    Timeout { stage: &'static str, budget: Duration },

    #[error("Migration cancelled")]
    Cancelled,

    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),
}

impl PipelineError {
    fn external<E>(stage: &'static str) -> impl FnOnce(E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        move |e| Self::External {
            stage,
            source: Box::new(e),
        }
    }
}

/// External systems a pipeline run talks to
#[derive(Clone)]
pub struct Collaborators {
    pub repository_host: Arc<dyn RepositoryHost>,
    pub quality_scanner: Arc<dyn QualityScanner>,
    pub notifier: Arc<dyn Notifier>,
    pub test_runner: Arc<dyn TestRunner>,
}

#[derive(Clone)]
pub struct MigrationPipeline {
    workflow: JobWorkflow,
    collaborators: Collaborators,
    scanner: Arc<IssueScanner>,
    engine: Arc<TransformationEngine>,
    analyzer: Arc<ProjectAnalyzer>,
    config: PipelineConfig,
}

async fn blocking<T, F>(work: F) -> Result<T, PipelineError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(work).await?)
}

impl MigrationPipeline {
    pub fn new(
        workflow: JobWorkflow,
        collaborators: Collaborators,
        catalog: Arc<RuleCatalog>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            workflow,
            collaborators,
            scanner: Arc::new(IssueScanner::new(catalog.clone())),
            engine: Arc::new(TransformationEngine::new(catalog)),
            analyzer: Arc::new(ProjectAnalyzer::new()),
            config,
        }
    }

    pub fn workflow(&self) -> &JobWorkflow {
        &self.workflow
    }

    /// Runs the job to a terminal state. Never returns an error: failures
    /// and cancellation are recorded on the job.
    pub async fn run(&self, job_id: Uuid, spec: JobSpec, cancel: CancellationToken) {
        let span = info_span!("migration", job_id = %job_id, source = %spec.source_repo_url);
        async {
            let outcome = if cancel.is_cancelled() {
                Err(PipelineError::Cancelled)
            } else {
                with_request_git_token(spec.token.clone(), self.execute(job_id, &spec, &cancel)).await
            };

            match outcome {
                Ok(()) => info!("Migration completed"),
                Err(PipelineError::Cancelled) => {
                    if let Err(e) = self.workflow.cancel(job_id, "Migration cancelled") {
                        warn!(error = %e, "Could not record cancellation");
                    }
                }
                Err(e) => {
                    error!(error = %e, "Migration failed");
                    if let Err(record) = self.workflow.fail(job_id, &e.to_string()) {
                        warn!(error = %record, "Could not record failure");
                    }
                }
            }

            self.collaborators.repository_host.cleanup(job_id).await;
        }
        .instrument(span)
        .await
    }

    /// Races `work` against cancellation and the stage budget
    async fn stage<T, F>(
        &self,
        cancel: &CancellationToken,
        stage: &'static str,
        budget: Duration,
        work: F,
    ) -> Result<T, PipelineError>
    where
        F: Future<Output = Result<T, PipelineError>>,
    {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(PipelineError::Cancelled),
            outcome = tokio::time::timeout(budget, work) => {
                outcome.map_err(|_| PipelineError::Timeout { stage, budget })?
            }
        }
    }

    async fn execute(
        &self,
        job_id: Uuid,
        spec: &JobSpec,
        cancel: &CancellationToken,
    ) -> Result<(), PipelineError> {
        let root = self.clone_stage(job_id, spec, cancel).await?;
        let analysis = self.analyze_stage(job_id, spec, &root, cancel).await?;
        self.migrate_stage(job_id, spec, &root, cancel).await?;

        if spec.run_tests {
            self.test_stage(job_id, &root, &analysis, cancel).await?;
        }
        if spec.run_sonar {
            self.quality_stage(job_id, &root, cancel).await?;
        }

        self.push_stage(job_id, spec, &root, cancel).await?;

        if let Some(email) = spec.email.as_deref() {
            self.notify_stage(job_id, email, cancel).await?;
        }

        self.workflow.complete(job_id)?;
        Ok(())
    }

    async fn clone_stage(
        &self,
        job_id: Uuid,
        spec: &JobSpec,
        cancel: &CancellationToken,
    ) -> Result<PathBuf, PipelineError> {
        self.workflow.advance(
            job_id,
            JobStatus::Cloning,
            Some(progress::CLONING),
            "Cloning source repository...",
        )?;
        let checkout = self
            .stage(cancel, "clone", self.config.clone_timeout(), async {
                self.collaborators
                    .repository_host
                    .clone_repository(job_id, &spec.source_repo_url)
                    .await
                    .map_err(PipelineError::external("clone"))
            })
            .await?;
        self.workflow.log(
            job_id,
            &format!("Repository cloned to {}", checkout.checkout_path.display()),
        )?;
        Ok(checkout.checkout_path)
    }

    async fn analyze_stage(
        &self,
        job_id: Uuid,
        spec: &JobSpec,
        root: &Path,
        cancel: &CancellationToken,
    ) -> Result<ProjectAnalysis, PipelineError> {
        self.workflow.advance(
            job_id,
            JobStatus::Analyzing,
            Some(progress::ANALYZING),
            "Analyzing project structure and detecting issues...",
        )?;

        let analyzer = self.analyzer.clone();
        let scanner = self.scanner.clone();
        let project_root = root.to_path_buf();
        let conversions = spec.conversions.clone();
        let (source, target) = (spec.source_version, spec.target_version);
        let (analysis, scan) = self
            .stage(
                cancel,
                "analysis",
                self.config.analysis_timeout(),
                blocking(move || {
                    let analysis = analyzer.analyze(&project_root);
                    let scan = scanner.scan(&project_root, &conversions, source, target);
                    (analysis, scan)
                }),
            )
            .await?;

        if !scan.skipped.is_empty() {
            warn!(skipped = scan.skipped.len(), "Some files could not be scanned");
        }
        let build_tool = analysis
            .build_tool
            .map(|tool| tool.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let summary = format!(
            "Detected {} project: {} source files, {} test files, {} dependencies, {} API endpoints",
            build_tool,
            analysis.source_files,
            analysis.test_files,
            analysis.dependencies.len(),
            analysis.api_endpoints.len()
        );

        let (errors, warnings) = self.workflow.update(job_id, |job| {
            job.dependencies = analysis.dependencies.clone();
            job.api_endpoints = analysis.api_endpoints.clone();
            job.record_issues(scan.issues);
            job.add_log(&summary);
            job.add_log(&format!(
                "Found {} errors, {} warnings to process",
                job.total_errors, job.total_warnings
            ));
            (job.total_errors, job.total_warnings)
        })?;
        info!(errors, warnings, files_scanned = scan.files_scanned, "Analysis finished");
        Ok(analysis)
    }

    async fn migrate_stage(
        &self,
        job_id: Uuid,
        spec: &JobSpec,
        root: &Path,
        cancel: &CancellationToken,
    ) -> Result<(), PipelineError> {
        let plan = spec.plan();
        let work = async {
            let mut total = TransformationReport::default();

            for (index, conversion) in spec.conversions.iter().copied().enumerate() {
                let step = format!("Running {} migration...", conversion.as_str());
                let pct = progress::migrating(index);
                if index == 0 {
                    self.workflow
                        .advance(job_id, JobStatus::Migrating, Some(pct), &step)?;
                } else {
                    self.workflow.step(job_id, pct, &step)?;
                }
                self.workflow.log(
                    job_id,
                    &format!("Processing conversion: {}", conversion.as_str()),
                )?;

                let engine = self.engine.clone();
                let project_root = root.to_path_buf();
                let pass_plan = plan.clone();
                let report =
                    blocking(move || engine.run_conversion(&project_root, conversion, &pass_plan))
                        .await?;
                total.absorb(report);
            }

            if spec.fix_business_logic {
                self.workflow.log(job_id, "Applying business logic fixes...")?;
                let engine = self.engine.clone();
                let project_root = root.to_path_buf();
                let pass_plan = plan.clone();
                let report =
                    blocking(move || engine.run_business_logic(&project_root, &pass_plan)).await?;
                total.absorb(report);
            }

            if !total.skipped.is_empty() {
                self.workflow.log(
                    job_id,
                    &format!(
                        "Skipped {} files that could not be rewritten",
                        total.skipped.len()
                    ),
                )?;
            }

            // Decide each detected issue against the rewritten tree
            let mut issues = self.workflow.get(job_id)?.issues;
            let scanner = self.scanner.clone();
            let project_root = root.to_path_buf();
            let issues = blocking(move || {
                let now = Utc::now();
                for issue in issues.iter_mut().filter(|i| i.status == IssueStatus::Detected) {
                    match scanner.is_resolved(&project_root, issue) {
                        Ok(true) => issue.mark_fixed(now),
                        Ok(false) => issue.mark_manual_review(),
                        Err(e) => {
                            warn!(issue = %issue.id, error = %e, "Could not verify issue");
                            issue.mark_manual_review();
                        }
                    }
                }
                issues
            })
            .await?;

            self.workflow.update(job_id, |job| {
                job.issues = issues;
                job.refresh_fixed_counters();
                job.files_modified += total.files_modified;
                job.issues_fixed += total.issues_fixed;
                job.add_log(&format!(
                    "Modified {} files, fixed {} issues",
                    job.files_modified, job.issues_fixed
                ));
            })?;
            Ok(())
        };
        self.stage(cancel, "migration", self.config.migration_timeout(), work)
            .await
    }

    async fn test_stage(
        &self,
        job_id: Uuid,
        root: &Path,
        analysis: &ProjectAnalysis,
        cancel: &CancellationToken,
    ) -> Result<(), PipelineError> {
        self.workflow.advance(
            job_id,
            JobStatus::Testing,
            Some(progress::TESTING),
            "Running tests and validating APIs...",
        )?;
        let summary = self
            .stage(cancel, "test", self.config.test_timeout(), async {
                self.collaborators
                    .test_runner
                    .run(root, analysis.build_tool, &analysis.api_endpoints)
                    .await
                    .map_err(PipelineError::external("test"))
            })
            .await?;

        self.workflow.update(job_id, |job| {
            job.api_endpoints_validated = summary.total_endpoints;
            job.api_endpoints_working = summary.working_endpoints;
            if summary.tests_run > 0 {
                job.add_log(&format!(
                    "Test suite: {} run, {} failed, {} skipped",
                    summary.tests_run, summary.tests_failed, summary.tests_skipped
                ));
            }
            job.add_log(&format!(
                "Tests: {}/{} endpoints working",
                summary.working_endpoints, summary.total_endpoints
            ));
        })?;
        Ok(())
    }

    async fn quality_stage(
        &self,
        job_id: Uuid,
        root: &Path,
        cancel: &CancellationToken,
    ) -> Result<(), PipelineError> {
        self.workflow.advance(
            job_id,
            JobStatus::QualityScan,
            Some(progress::QUALITY_SCAN),
            "Running SonarQube code quality analysis...",
        )?;
        let project_key = job_id.to_string();
        let metrics = self
            .stage(cancel, "quality scan", self.config.quality_timeout(), async {
                self.collaborators
                    .quality_scanner
                    .analyze(root, &project_key)
                    .await
                    .map_err(PipelineError::external("quality scan"))
            })
            .await?;

        self.workflow.update(job_id, |job| {
            job.add_log(&format!(
                "SonarQube: Quality Gate = {}",
                metrics.quality_gate.as_deref().unwrap_or("N/A")
            ));
            job.quality = metrics;
        })?;
        Ok(())
    }

    async fn push_stage(
        &self,
        job_id: Uuid,
        spec: &JobSpec,
        root: &Path,
        cancel: &CancellationToken,
    ) -> Result<(), PipelineError> {
        self.workflow.advance(
            job_id,
            JobStatus::Pushing,
            Some(progress::PUSHING),
            "Creating new repository and pushing migrated code...",
        )?;
        let request = PublishRequest {
            platform: spec.platform,
            checkout_path: root.to_path_buf(),
            repository_name: spec.target_repository_name(),
            description: format!(
                "Migrated from {} (Java {} → Java {})",
                spec.source_repo_url, spec.source_version, spec.target_version
            ),
        };
        let web_url = self
            .stage(cancel, "push", self.config.push_timeout(), async {
                self.collaborators
                    .repository_host
                    .publish(request)
                    .await
                    .map_err(PipelineError::external("push"))
            })
            .await?;

        self.workflow.update(job_id, |job| {
            job.add_log(&format!("Created new repository: {}", web_url));
            job.target_repo = Some(web_url);
        })?;
        Ok(())
    }

    /// Delivery problems are logged on the job and never fail it
    async fn notify_stage(
        &self,
        job_id: Uuid,
        email: &str,
        cancel: &CancellationToken,
    ) -> Result<(), PipelineError> {
        let job = self.workflow.get(job_id)?;
        let outcome = self
            .stage(cancel, "notify", self.config.notify_timeout(), async {
                self.collaborators
                    .notifier
                    .send_summary(email, &job)
                    .await
                    .map_err(PipelineError::external("notify"))
            })
            .await;

        let line = match outcome {
            Ok(Delivery::Sent) => format!("Migration summary sent to {}", email),
            Ok(Delivery::Logged) => format!(
                "Migration summary for {} logged (email delivery not configured)",
                email
            ),
            Err(PipelineError::Cancelled) => return Err(PipelineError::Cancelled),
            Err(e) => {
                warn!(error = %e, "Summary notification failed");
                format!("Failed to send migration summary to {}", email)
            }
        };
        self.workflow.log(job_id, &line)?;
        Ok(())
    }
}
