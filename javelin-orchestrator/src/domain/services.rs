//! Orchestrator domain services
//!
//! External systems the pipeline talks to. Each has a production adapter in
//! `infrastructure` and can be swapped for a fake in tests.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use javelin_deps::BuildTool;
use javelin_rewrite::ApiEndpoint;
use serde::Serialize;
use uuid::Uuid;

use super::entities::{MigrationJob, QualityMetrics};
use super::value_objects::GitPlatform;

/// Result data for a Git checkout.
#[derive(Debug, Clone)]
pub struct GitCheckout {
    /// Local filesystem path of the cloned repository root.
    pub checkout_path: PathBuf,
    /// HEAD commit SHA (if resolved).
    pub head_commit: Option<String>,
}

/// What to publish after a migration
#[derive(Debug, Clone)]
pub struct PublishRequest {
    pub platform: GitPlatform,
    pub checkout_path: PathBuf,
    pub repository_name: String,
    pub description: String,
}

/// Errors emitted by the Git service.
#[derive(Debug, thiserror::Error)]
pub enum GitServiceError {
    #[error("Unsupported Git URL scheme for {0}. Only HTTPS is supported.")]
    UnsupportedScheme(String),
    #[error("A {0} access token is required to create and push repositories")]
    MissingToken(GitPlatform),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),
    #[error("Push to {remote} was rejected for {reference}: {message}")]
    PushRejected {
        remote: String,
        reference: String,
        message: String,
    },
    #[error("Hosting API request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{platform} API returned {status}: {message}")]
    Api {
        platform: GitPlatform,
        status: u16,
        message: String,
    },
    #[error("Blocking git task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Clones source repositories and publishes migrated ones
#[async_trait]
pub trait RepositoryHost: Send + Sync {
    /// Shallow clone into a working directory owned by `job_id`.
    async fn clone_repository(
        &self,
        job_id: Uuid,
        repository_url: &str,
    ) -> Result<GitCheckout, GitServiceError>;

    /// Creates the remote repository, commits the checkout and pushes it.
    /// Returns the web URL of the new repository.
    async fn publish(&self, request: PublishRequest) -> Result<String, GitServiceError>;

    /// Removes the working directory of `job_id`. `false` when none was tracked.
    async fn cleanup(&self, job_id: Uuid) -> bool;
}

#[derive(Debug, thiserror::Error)]
pub enum QualityScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Quality service request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Quality service returned {status} for {endpoint}")]
    Api { endpoint: String, status: u16 },
}

/// Code quality gate run after migration
#[async_trait]
pub trait QualityScanner: Send + Sync {
    async fn analyze(
        &self,
        project_root: &Path,
        project_key: &str,
    ) -> Result<QualityMetrics, QualityScanError>;
}

/// How a summary notification was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    /// No transport configured; the message was only logged
    Logged,
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("Could not build message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("SMTP delivery failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Sends the migration summary to the requester
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_summary(&self, recipient: &str, job: &MigrationJob) -> Result<Delivery, NotifyError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TestOutcome {
    Passed,
    Failed,
    /// No build tool, or its executable is not installed
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestRunSummary {
    pub outcome: TestOutcome,
    pub tests_run: usize,
    pub tests_failed: usize,
    pub tests_skipped: usize,
    pub total_endpoints: usize,
    pub working_endpoints: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum TestRunError {
    #[error("Could not run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Runs the project's own test suite
#[async_trait]
pub trait TestRunner: Send + Sync {
    async fn run(
        &self,
        project_root: &Path,
        build_tool: Option<BuildTool>,
        endpoints: &[ApiEndpoint],
    ) -> Result<TestRunSummary, TestRunError>;
}
