//! Job admission, supervision and cancellation.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::pipeline::MigrationPipeline;
use super::workflow::{JobWorkflow, WorkflowError};
use crate::domain::entities::MigrationJob;
use crate::domain::request::{MigrationRequest, ValidationError};
use crate::domain::value_objects::JobStatus;
use crate::infrastructure::job_store::JobStoreError;

#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Job not found: {0}")]
    NotFound(Uuid),

    #[error("Job {job_id} is already {status}")]
    Conflict { job_id: Uuid, status: JobStatus },

    #[error(transparent)]
    Workflow(WorkflowError),
}

impl From<WorkflowError> for OrchestratorError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::Store(JobStoreError::NotFound(id)) => Self::NotFound(id),
            other => Self::Workflow(other),
        }
    }
}

/// Owns every running job.
///
/// Each job gets a child of the shutdown token, so cancelling one job leaves
/// the others alone while [`Orchestrator::shutdown`] stops them all. At most
/// `max_concurrent_jobs` pipelines run at once; the rest stay PENDING until a
/// permit frees up.
pub struct Orchestrator {
    pipeline: Arc<MigrationPipeline>,
    workflow: JobWorkflow,
    permits: Arc<Semaphore>,
    shutdown: CancellationToken,
    running: Arc<DashMap<Uuid, CancellationToken>>,
    tracker: TaskTracker,
}

impl Orchestrator {
    pub fn new(pipeline: MigrationPipeline, max_concurrent_jobs: usize, shutdown: CancellationToken) -> Self {
        let concurrency = max_concurrent_jobs.max(1);
        info!("Job runner started with concurrency: {}", concurrency);
        Self {
            workflow: pipeline.workflow().clone(),
            pipeline: Arc::new(pipeline),
            permits: Arc::new(Semaphore::new(concurrency)),
            shutdown,
            running: Arc::new(DashMap::new()),
            tracker: TaskTracker::new(),
        }
    }

    /// Validates, stores a PENDING record and starts the job in the background
    pub fn create_job(&self, request: MigrationRequest) -> Result<MigrationJob, OrchestratorError> {
        let spec = request.validate()?;
        let job = self.workflow.create(MigrationJob::new(&request, &spec))?;
        let job_id = job.job_id;

        let token = self.shutdown.child_token();
        self.running.insert(job_id, token.clone());

        let pipeline = self.pipeline.clone();
        let permits = self.permits.clone();
        let running = self.running.clone();
        self.tracker.spawn(async move {
            let permit = tokio::select! {
                biased;
                _ = token.cancelled() => None,
                permit = permits.acquire_owned() => permit.ok(),
            };
            debug!(job_id = %job_id, admitted = permit.is_some(), "Job left the queue");
            pipeline.run(job_id, spec, token).await;
            drop(permit);
            running.remove(&job_id);
        });

        Ok(job)
    }

    pub fn get_job(&self, job_id: Uuid) -> Result<MigrationJob, OrchestratorError> {
        Ok(self.workflow.get(job_id)?)
    }

    pub fn list_jobs(&self) -> Vec<MigrationJob> {
        self.workflow.store().list_all()
    }

    pub fn job_logs(&self, job_id: Uuid) -> Result<Vec<String>, OrchestratorError> {
        Ok(self.workflow.get(job_id)?.migration_log)
    }

    /// Signals the job's task. The task records CANCELLED when it observes
    /// the signal, so the returned snapshot may still show the running state.
    pub fn cancel_job(&self, job_id: Uuid) -> Result<MigrationJob, OrchestratorError> {
        let job = self.workflow.get(job_id)?;
        if job.is_terminal() {
            return Err(OrchestratorError::Conflict {
                job_id,
                status: job.status,
            });
        }
        match self.running.get(&job_id) {
            Some(token) => {
                token.cancel();
                info!(job_id = %job_id, "Cancellation requested");
                Ok(job)
            }
            None => Err(OrchestratorError::Conflict {
                job_id,
                status: job.status,
            }),
        }
    }

    /// Number of jobs whose task has not finished
    pub fn active_jobs(&self) -> usize {
        self.running.len()
    }

    /// Cancels every job and waits up to `grace` for their tasks to record it
    pub async fn shutdown(&self, grace: Duration) {
        info!(active = self.active_jobs(), "Stopping migration jobs");
        self.shutdown.cancel();
        self.tracker.close();
        if tokio::time::timeout(grace, self.tracker.wait()).await.is_err() {
            warn!(active = self.active_jobs(), "Jobs still running after shutdown grace period");
        }
    }
}
