//! Application setup and wiring

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use axum::Router;
use tokio_util::sync::CancellationToken;

use javelin_core::Config;
use javelin_orchestrator::application::{
    Collaborators, JobWorkflow, MigrationPipeline, Orchestrator, PreviewService,
};
use javelin_orchestrator::infrastructure::{
    BuildToolTestRunner, GitService, GitServiceConfig, HostingApi, JobStore, notifier,
    quality_scanner,
};
use javelin_orchestrator::presentation::{AppState, create_router};
use javelin_rewrite::{PreviewEngine, RuleCatalog};

/// Handle returned from create_app for graceful shutdown coordination
pub struct AppHandle {
    pub router: Router,
    pub orchestrator: Arc<Orchestrator>,
    /// Cancelling this stops every running job
    pub shutdown_token: CancellationToken,
    pub shutdown_grace: Duration,
}

/// Create the application router and return an AppHandle for shutdown coordination
pub async fn create_app(config: Config) -> anyhow::Result<AppHandle> {
    let startup_time = Instant::now();
    let shutdown_token = CancellationToken::new();

    let hosting = HostingApi::new(&config.git).context("Failed to build hosting API client")?;
    let git_service = Arc::new(
        GitService::new(GitServiceConfig::from(&config), hosting)
            .context("Failed to prepare checkout directory")?,
    );

    let quality = quality_scanner(&config.quality).context("Failed to build SonarQube client")?;
    if config.quality.is_configured() {
        tracing::info!(url = %config.quality.url, "SonarQube analysis enabled");
    } else {
        tracing::info!("SonarQube not configured; quality figures will be simulated");
    }

    let summary_notifier = notifier(&config.smtp).context("Failed to build SMTP transport")?;
    if !config.smtp.has_credentials() {
        tracing::info!("SMTP credentials not configured; migration summaries will only be logged");
    }

    let catalog = Arc::new(RuleCatalog::new());
    tracing::info!(rules = catalog.len(), "Rule catalog loaded");

    let collaborators = Collaborators {
        repository_host: git_service.clone(),
        quality_scanner: quality,
        notifier: summary_notifier,
        test_runner: Arc::new(BuildToolTestRunner),
    };
    let workflow = JobWorkflow::new(Arc::new(JobStore::new()));
    let pipeline = MigrationPipeline::new(
        workflow,
        collaborators,
        catalog.clone(),
        config.pipeline.clone(),
    );
    let orchestrator = Arc::new(Orchestrator::new(
        pipeline,
        config.pipeline.max_concurrent_jobs,
        shutdown_token.clone(),
    ));

    let preview = PreviewService::new(
        git_service,
        PreviewEngine::new(catalog, config.preview.clone()),
        Duration::from_secs(config.server.preview_timeout_seconds),
    );

    let state = AppState {
        orchestrator: orchestrator.clone(),
        preview: Arc::new(preview),
        max_file_diffs: config.preview.max_file_diffs_returned,
        enable_docs: config.server.enable_docs,
    };
    let router = create_router(state, &config.server);

    tracing::info!(
        startup_ms = startup_time.elapsed().as_millis(),
        max_concurrent_jobs = config.pipeline.max_concurrent_jobs,
        "Application initialized"
    );

    Ok(AppHandle {
        router,
        orchestrator,
        shutdown_token,
        shutdown_grace: Duration::from_secs(config.pipeline.shutdown_timeout_seconds),
    })
}
