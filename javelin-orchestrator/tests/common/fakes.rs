//! In-process stand-ins for git hosting, SonarQube, SMTP and the build tool

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use javelin_deps::BuildTool;
use javelin_rewrite::ApiEndpoint;
use tempfile::TempDir;
use uuid::Uuid;

use javelin_orchestrator::domain::entities::{MigrationJob, QualityMetrics};
use javelin_orchestrator::domain::services::{
    Delivery, GitCheckout, GitServiceError, Notifier, NotifyError, PublishRequest,
    QualityScanError, QualityScanner, RepositoryHost, TestOutcome, TestRunError, TestRunSummary,
    TestRunner,
};

/// What a publish call saw in the checkout
#[derive(Debug, Clone)]
pub struct Published {
    pub repository_name: String,
    pub description: String,
    pub files: BTreeMap<String, String>,
}

/// Serves a fixed file tree as every cloned repository
pub struct FakeHost {
    files: Vec<(String, String)>,
    checkouts: Mutex<HashMap<Uuid, TempDir>>,
    published: Mutex<Vec<Published>>,
    cleaned: Mutex<Vec<Uuid>>,
    clone_delay: Option<Duration>,
    fail_publish: bool,
}

impl FakeHost {
    pub fn new(files: &[(&str, &str)]) -> Self {
        Self {
            files: files
                .iter()
                .map(|(path, content)| (path.to_string(), content.to_string()))
                .collect(),
            checkouts: Mutex::new(HashMap::new()),
            published: Mutex::new(Vec::new()),
            cleaned: Mutex::new(Vec::new()),
            clone_delay: None,
            fail_publish: false,
        }
    }

    /// Clone blocks for `delay` before returning
    pub fn with_clone_delay(mut self, delay: Duration) -> Self {
        self.clone_delay = Some(delay);
        self
    }

    /// Publish answers like a hosting API refusing the token
    pub fn failing_publish(mut self) -> Self {
        self.fail_publish = true;
        self
    }

    pub fn published(&self) -> Vec<Published> {
        self.published.lock().unwrap().clone()
    }

    pub fn cleaned(&self) -> Vec<Uuid> {
        self.cleaned.lock().unwrap().clone()
    }

    pub fn live_checkouts(&self) -> usize {
        self.checkouts.lock().unwrap().len()
    }
}

fn read_tree(root: &Path) -> BTreeMap<String, String> {
    walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let relative = entry.path().strip_prefix(root).ok()?;
            let content = std::fs::read_to_string(entry.path()).ok()?;
            Some((relative.to_string_lossy().replace('\\', "/"), content))
        })
        .collect()
}

#[async_trait]
impl RepositoryHost for FakeHost {
    async fn clone_repository(
        &self,
        job_id: Uuid,
        repository_url: &str,
    ) -> Result<GitCheckout, GitServiceError> {
        if !repository_url.starts_with("https://") {
            return Err(GitServiceError::UnsupportedScheme(repository_url.to_string()));
        }
        if let Some(delay) = self.clone_delay {
            tokio::time::sleep(delay).await;
        }
        let dir = tempfile::Builder::new().prefix("javelin-test-").tempdir()?;
        for (path, content) in &self.files {
            let target = dir.path().join(path);
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(target, content)?;
        }
        let checkout_path = dir.path().to_path_buf();
        self.checkouts.lock().unwrap().insert(job_id, dir);
        Ok(GitCheckout {
            checkout_path,
            head_commit: None,
        })
    }

    async fn publish(&self, request: PublishRequest) -> Result<String, GitServiceError> {
        if self.fail_publish {
            return Err(GitServiceError::Api {
                platform: request.platform,
                status: 401,
                message: "Bad credentials".to_string(),
            });
        }
        let web_url = format!(
            "https://{}.example/acme/{}",
            request.platform, request.repository_name
        );
        self.published.lock().unwrap().push(Published {
            repository_name: request.repository_name,
            description: request.description,
            files: read_tree(&request.checkout_path),
        });
        Ok(web_url)
    }

    async fn cleanup(&self, job_id: Uuid) -> bool {
        self.cleaned.lock().unwrap().push(job_id);
        self.checkouts.lock().unwrap().remove(&job_id).is_some()
    }
}

pub struct FixedQuality;

#[async_trait]
impl QualityScanner for FixedQuality {
    async fn analyze(
        &self,
        _project_root: &Path,
        project_key: &str,
    ) -> Result<QualityMetrics, QualityScanError> {
        Ok(QualityMetrics {
            quality_gate: Some("Passed".to_string()),
            bugs: 1,
            vulnerabilities: 0,
            code_smells: 12,
            coverage: 81.0,
            duplications: 1.5,
            analysis_url: Some(format!("https://sonar.example/dashboard?id={}", project_key)),
        })
    }
}

/// Remembers every summary it was asked to send
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, Uuid)>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<(String, Uuid)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_summary(
        &self,
        recipient: &str,
        job: &MigrationJob,
    ) -> Result<Delivery, NotifyError> {
        self.sent
            .lock()
            .unwrap()
            .push((recipient.to_string(), job.job_id));
        Ok(Delivery::Sent)
    }
}

/// Reports every endpoint as working
pub struct PassingTests;

#[async_trait]
impl TestRunner for PassingTests {
    async fn run(
        &self,
        _project_root: &Path,
        _build_tool: Option<BuildTool>,
        endpoints: &[ApiEndpoint],
    ) -> Result<TestRunSummary, TestRunError> {
        Ok(TestRunSummary {
            outcome: TestOutcome::Passed,
            tests_run: 3,
            tests_failed: 0,
            tests_skipped: 0,
            total_endpoints: endpoints.len(),
            working_endpoints: endpoints.len(),
        })
    }
}
