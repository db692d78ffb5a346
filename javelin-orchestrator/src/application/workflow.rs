//! Job Workflow: the single writer of job state.
//!
//! Every status transition and every log line goes through [`JobWorkflow`],
//! which validates the transition against the state machine on
//! [`JobStatus`] and applies it to the record in the [`JobStore`] under the
//! entry lock.
//!
//! ```text
//! Orchestrator        JobWorkflow            JobStore
//!     │                   │                     │
//!     ├─ create() ───────►│── create ──────────►│
//!     │                   │                     │
//! Pipeline                │                     │
//!     ├─ advance() ──────►│── apply_update ────►│  validate + transition
//!     ├─ step()/log() ───►│── apply_update ────►│
//!     ├─ complete() ─────►│── apply_update ────►│
//!     └─ fail()/cancel() ►│── apply_update ────►│
//! ```

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::entities::MigrationJob;
use crate::domain::value_objects::{JobStatus, JobTransitionError, progress};
use crate::infrastructure::job_store::{JobStore, JobStoreError};

/// Errors from the workflow layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    #[error("Invalid state transition: {0}")]
    InvalidTransition(#[from] JobTransitionError),

    #[error("Persistence error: {0}")]
    Store(#[from] JobStoreError),
}

/// Centralised job lifecycle controller.
#[derive(Debug, Clone)]
pub struct JobWorkflow {
    store: Arc<JobStore>,
}

impl JobWorkflow {
    pub fn new(store: Arc<JobStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<JobStore> {
        &self.store
    }

    pub fn create(&self, job: MigrationJob) -> Result<MigrationJob, WorkflowError> {
        let snapshot = job.clone();
        self.store.create(job)?;
        info!(job_id = %snapshot.job_id, source = %snapshot.source_repo, "Job created");
        Ok(snapshot)
    }

    pub fn get(&self, job_id: Uuid) -> Result<MigrationJob, WorkflowError> {
        Ok(self.store.get(job_id)?)
    }

    // ── Transition helpers ───────────────────────────────────────────

    /// Enter `status`. Progress defaults to the state's entry value.
    pub fn advance(
        &self,
        job_id: Uuid,
        status: JobStatus,
        progress: Option<u8>,
        step: &str,
    ) -> Result<(), WorkflowError> {
        self.store
            .apply_update(job_id, |job| job.transition_to(status, progress, step))??;
        info!(job_id = %job_id, status = %status, step, "Job advanced");
        Ok(())
    }

    pub fn complete(&self, job_id: Uuid) -> Result<(), WorkflowError> {
        self.advance(
            job_id,
            JobStatus::Completed,
            Some(progress::COMPLETED),
            "Migration completed successfully!",
        )
    }

    /// Terminal failure. A job that already reached a terminal state is left alone.
    pub fn fail(&self, job_id: Uuid, message: &str) -> Result<(), WorkflowError> {
        let outcome = self.store.apply_update(job_id, |job| {
            if job.is_terminal() {
                return Ok(false);
            }
            job.fail(message).map(|_| true)
        })??;
        if outcome {
            warn!(job_id = %job_id, error = message, "Job failed");
        }
        Ok(())
    }

    pub fn cancel(&self, job_id: Uuid, reason: &str) -> Result<(), WorkflowError> {
        self.store.apply_update(job_id, |job| job.cancel(reason))??;
        info!(job_id = %job_id, reason, "Job cancelled");
        Ok(())
    }

    // ── In-state updates ─────────────────────────────────────────────

    pub fn step(&self, job_id: Uuid, progress: u8, step: &str) -> Result<(), WorkflowError> {
        self.store
            .apply_update(job_id, |job| job.update_step(progress, step))?;
        Ok(())
    }

    pub fn log(&self, job_id: Uuid, message: &str) -> Result<(), WorkflowError> {
        self.store.apply_update(job_id, |job| job.add_log(message))?;
        Ok(())
    }

    /// Arbitrary field updates on the record
    pub fn update<F, R>(&self, job_id: Uuid, update: F) -> Result<R, WorkflowError>
    where
        F: FnOnce(&mut MigrationJob) -> R,
    {
        Ok(self.store.apply_update(job_id, update)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::request::MigrationRequest;

    fn workflow_with_job() -> (JobWorkflow, Uuid) {
        let request: MigrationRequest = serde_json::from_value(serde_json::json!({
            "source_repo_url": "https://github.com/acme/app",
        }))
        .unwrap();
        let job = MigrationJob::new(&request, &request.validate().unwrap());
        let workflow = JobWorkflow::new(Arc::new(JobStore::new()));
        let id = workflow.create(job).unwrap().job_id;
        (workflow, id)
    }

    #[test]
    fn test_advance_applies_entry_progress() {
        let (workflow, id) = workflow_with_job();
        workflow
            .advance(id, JobStatus::Cloning, None, "Cloning source repository...")
            .unwrap();
        let job = workflow.get(id).unwrap();
        assert_eq!(job.status, JobStatus::Cloning);
        assert_eq!(job.progress_percent, progress::CLONING);
        assert!(job.migration_log[0].ends_with("Cloning source repository..."));
    }

    #[test]
    fn test_invalid_transition_is_rejected() {
        let (workflow, id) = workflow_with_job();
        let err = workflow.advance(id, JobStatus::Pushing, None, "x").unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidTransition(_)));
        assert_eq!(workflow.get(id).unwrap().status, JobStatus::Pending);
    }

    #[test]
    fn test_fail_after_terminal_is_a_no_op() {
        let (workflow, id) = workflow_with_job();
        workflow.cancel(id, "Migration cancelled").unwrap();
        workflow.fail(id, "late error").unwrap();
        let job = workflow.get(id).unwrap();
        assert_eq!(job.status, JobStatus::Cancelled);
        assert!(job.error_message.is_none());
    }

    #[test]
    fn test_fail_records_message() {
        let (workflow, id) = workflow_with_job();
        workflow.advance(id, JobStatus::Cloning, None, "c").unwrap();
        workflow.fail(id, "clone refused").unwrap();
        let job = workflow.get(id).unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.error_message.as_deref(), Some("clone refused"));
        assert!(job.migration_log.last().unwrap().ends_with("ERROR: clone refused"));
        assert_eq!(job.progress_percent, progress::CLONING);
    }

    #[test]
    fn test_unknown_job() {
        let workflow = JobWorkflow::new(Arc::new(JobStore::new()));
        let err = workflow.log(Uuid::new_v4(), "x").unwrap_err();
        assert!(matches!(err, WorkflowError::Store(JobStoreError::NotFound(_))));
    }
}
