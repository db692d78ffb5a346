use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use crate::domain::entities::MigrationJob;

/// Job persistence errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobStoreError {
    #[error("Job not found: {0}")]
    NotFound(Uuid),
    #[error("Job already exists: {0}")]
    AlreadyExists(Uuid),
}

/// In-memory job records keyed by job id.
///
/// Every mutation runs through [`JobStore::apply_update`], which holds the
/// entry's shard lock while the closure runs. Readers get clones.
#[derive(Debug, Default)]
pub struct JobStore {
    jobs: DashMap<Uuid, MigrationJob>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, job: MigrationJob) -> Result<(), JobStoreError> {
        match self.jobs.entry(job.job_id) {
            Entry::Occupied(_) => Err(JobStoreError::AlreadyExists(job.job_id)),
            Entry::Vacant(slot) => {
                tracing::debug!(job_id = %job.job_id, "Job record created");
                slot.insert(job);
                Ok(())
            }
        }
    }

    pub fn get(&self, job_id: Uuid) -> Result<MigrationJob, JobStoreError> {
        self.jobs
            .get(&job_id)
            .map(|entry| entry.value().clone())
            .ok_or(JobStoreError::NotFound(job_id))
    }

    /// Snapshot of every job, oldest first
    pub fn list_all(&self) -> Vec<MigrationJob> {
        let mut jobs: Vec<MigrationJob> = self.jobs.iter().map(|e| e.value().clone()).collect();
        jobs.sort_by_key(|job| job.started_at);
        jobs
    }

    /// Runs `update` against the stored record and returns its result.
    /// The closure must not touch the store.
    pub fn apply_update<F, R>(&self, job_id: Uuid, update: F) -> Result<R, JobStoreError>
    where
        F: FnOnce(&mut MigrationJob) -> R,
    {
        let mut entry = self
            .jobs
            .get_mut(&job_id)
            .ok_or(JobStoreError::NotFound(job_id))?;
        Ok(update(entry.value_mut()))
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
