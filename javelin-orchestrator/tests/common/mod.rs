//! Shared harness for the javelin-orchestrator integration tests
#![allow(dead_code)]

pub mod fakes;
pub mod helpers;

use std::sync::Arc;
use std::time::Duration;

use javelin_core::config::{PipelineConfig, PreviewConfig, ServerConfig};
use javelin_rewrite::{PreviewEngine, RuleCatalog};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use javelin_orchestrator::application::{
    Collaborators, JobWorkflow, MigrationPipeline, Orchestrator, PreviewService,
};
use javelin_orchestrator::domain::entities::MigrationJob;
use javelin_orchestrator::domain::request::MigrationRequest;
use javelin_orchestrator::infrastructure::job_store::JobStore;
use javelin_orchestrator::presentation::{AppState, create_router};

use fakes::{FakeHost, FixedQuality, PassingTests, RecordingNotifier};

/// A servlet app with one deprecated wrapper constructor and a javax import
pub const LEGACY_APP: &[(&str, &str)] = &[(
    "src/main/java/com/acme/App.java",
    "package com.acme;\n\
     \n\
     import javax.servlet.http.HttpServlet;\n\
     \n\
     public class App extends HttpServlet {\n\
     \x20   private Integer count = new Integer(5);\n\
     }\n",
)];

pub struct Harness {
    pub orchestrator: Arc<Orchestrator>,
    pub host: Arc<FakeHost>,
    pub notifier: Arc<RecordingNotifier>,
    pub shutdown: CancellationToken,
}

pub fn harness(host: FakeHost) -> Harness {
    harness_with(host, 2)
}

pub fn harness_with(host: FakeHost, max_concurrent_jobs: usize) -> Harness {
    let host = Arc::new(host);
    let notifier = Arc::new(RecordingNotifier::default());
    let collaborators = Collaborators {
        repository_host: host.clone(),
        quality_scanner: Arc::new(FixedQuality),
        notifier: notifier.clone(),
        test_runner: Arc::new(PassingTests),
    };
    let workflow = JobWorkflow::new(Arc::new(JobStore::new()));
    let pipeline = MigrationPipeline::new(
        workflow,
        collaborators,
        Arc::new(RuleCatalog::new()),
        PipelineConfig::default(),
    );
    let shutdown = CancellationToken::new();
    Harness {
        orchestrator: Arc::new(Orchestrator::new(
            pipeline,
            max_concurrent_jobs,
            shutdown.clone(),
        )),
        host,
        notifier,
        shutdown,
    }
}

impl Harness {
    pub fn router(&self) -> axum::Router {
        let preview = PreviewService::new(
            self.host.clone(),
            PreviewEngine::new(Arc::new(RuleCatalog::new()), PreviewConfig::default()),
            Duration::from_secs(30),
        );
        let state = AppState {
            orchestrator: self.orchestrator.clone(),
            preview: Arc::new(preview),
            max_file_diffs: 10,
            enable_docs: true,
        };
        create_router(state, &ServerConfig::default())
    }
}

pub fn request(body: serde_json::Value) -> MigrationRequest {
    serde_json::from_value(body).expect("test request deserializes")
}

pub fn legacy_request() -> MigrationRequest {
    request(serde_json::json!({
        "source_repo_url": "https://github.com/acme/legacy-app.git",
        "source_java_version": "8",
        "target_java_version": "17",
        "token": "ghp_test",
        "email": "dev@acme.example",
    }))
}

/// Polls until the job reaches a terminal state
pub async fn wait_for_terminal(orchestrator: &Orchestrator, job_id: Uuid) -> MigrationJob {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(20);
    loop {
        let job = orchestrator.get_job(job_id).expect("job exists");
        if job.is_terminal() {
            return job;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "job {} stuck in {}",
            job_id,
            job.status
        );
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

/// Polls until no job task is left, so per-job cleanup has run
pub async fn wait_until_idle(orchestrator: &Orchestrator) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(20);
    while orchestrator.active_jobs() > 0 {
        assert!(tokio::time::Instant::now() < deadline, "jobs still active");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
