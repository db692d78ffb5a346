use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use git2::{
    Cred, FetchOptions, IndexAddOption, PushOptions, RemoteCallbacks, Repository, Signature,
    build::RepoBuilder, opts,
};
use javelin_core::Config;
use tempfile::TempDir;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::hosting::HostingApi;
use super::token::current_request_git_token;
use crate::domain::services::{GitCheckout, GitServiceError, PublishRequest, RepositoryHost};
use crate::domain::value_objects::GitPlatform;

/// Local ref holding the publish commit
const PUBLISH_REF: &str = "refs/heads/javelin-migration";
const REMOTE_BRANCH: &str = "refs/heads/main";
const COMMIT_MESSAGE: &str =
    "Java migration completed - upgraded Java version, dependencies, and code quality";

/// Configuration for the Git service.
#[derive(Debug, Clone)]
pub struct GitServiceConfig {
    /// Optional parent directory for temporary checkouts. Defaults to std::env::temp_dir().
    pub checkout_parent: Option<PathBuf>,
    /// Timeout applied to network fetches (passed down to libgit2).
    pub fetch_timeout: Duration,
    pub author_name: String,
    pub author_email: String,
}

impl Default for GitServiceConfig {
    fn default() -> Self {
        Self {
            checkout_parent: None,
            fetch_timeout: Duration::from_secs(30),
            author_name: "Javelin Migration Bot".to_string(),
            author_email: "migration-bot@example.com".to_string(),
        }
    }
}

impl From<&Config> for GitServiceConfig {
    fn from(config: &Config) -> Self {
        Self {
            checkout_parent: config.workspace.root.clone(),
            fetch_timeout: Duration::from_secs(config.git.fetch_timeout_seconds),
            author_name: config.git.commit_author_name.clone(),
            author_email: config.git.commit_author_email.clone(),
        }
    }
}

/// Clones repositories into per-job temp directories and publishes the
/// migrated tree as a new repository.
#[derive(Debug)]
pub struct GitService {
    checkout_parent: PathBuf,
    checkouts: Arc<Mutex<HashMap<Uuid, TempDir>>>,
    hosting: HostingApi,
    config: GitServiceConfig,
}

impl GitService {
    /// Create a new Git service with the provided configuration.
    pub fn new(config: GitServiceConfig, hosting: HostingApi) -> std::io::Result<Self> {
        let checkout_parent = config
            .checkout_parent
            .clone()
            .unwrap_or_else(std::env::temp_dir);

        if !checkout_parent.exists() {
            std::fs::create_dir_all(&checkout_parent)?;
        }

        Ok(Self {
            checkout_parent,
            checkouts: Arc::new(Mutex::new(HashMap::new())),
            hosting,
            config,
        })
    }

    fn credentials_callbacks(token: Option<String>, default_user: &'static str) -> RemoteCallbacks<'static> {
        let mut callbacks = RemoteCallbacks::new();
        if let Some(token_value) = token {
            callbacks.credentials(move |_url, username_from_url, allowed| {
                if allowed.contains(git2::CredentialType::USER_PASS_PLAINTEXT) {
                    let username = username_from_url.unwrap_or(default_user);
                    Cred::userpass_plaintext(username, &token_value)
                } else {
                    Cred::default()
                }
            });
        }
        callbacks
    }

    fn perform_clone(
        destination: &Path,
        repository_url: &str,
        token: Option<String>,
    ) -> Result<Option<String>, GitServiceError> {
        let mut fetch_options = FetchOptions::new();
        fetch_options.remote_callbacks(Self::credentials_callbacks(token, "x-access-token"));
        fetch_options.download_tags(git2::AutotagOption::None);
        fetch_options.update_fetchhead(true);
        fetch_options.proxy_options(git2::ProxyOptions::new());
        fetch_options.depth(1);

        let mut builder = RepoBuilder::new();
        builder.fetch_options(fetch_options);
        builder.clone(repository_url, destination)?;
        let repo = Repository::open(destination)?;
        let head = repo
            .head()
            .ok()
            .and_then(|h| h.target())
            .map(|oid| oid.to_string());
        Ok(head)
    }

    /// Commits the whole working tree as a single parentless commit and
    /// force-pushes it to `main` on `remote_url`. The shallow clone history
    /// is left behind.
    fn perform_push(
        checkout: &Path,
        remote_url: &str,
        token: String,
        platform: GitPlatform,
        author: (&str, &str),
    ) -> Result<String, GitServiceError> {
        let repo = match Repository::open(checkout) {
            Ok(repo) => repo,
            Err(_) => Repository::init(checkout)?,
        };

        let mut index = repo.index()?;
        index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None)?;
        index.update_all(["*"].iter(), None)?;
        index.write()?;
        let tree = repo.find_tree(index.write_tree()?)?;

        let signature = Signature::now(author.0, author.1)?;
        let commit = repo.commit(None, &signature, &signature, COMMIT_MESSAGE, &tree, &[])?;
        repo.reference(PUBLISH_REF, commit, true, "javelin: publish migration")?;

        let default_user = match platform {
            GitPlatform::Github => "x-access-token",
            GitPlatform::Gitlab => "oauth2",
        };
        let mut callbacks = Self::credentials_callbacks(Some(token), default_user);
        let rejection: Arc<std::sync::Mutex<Option<(String, String)>>> = Arc::default();
        let rejection_slot = rejection.clone();
        callbacks.push_update_reference(move |reference, status| {
            if let Some(message) = status
                && let Ok(mut slot) = rejection_slot.lock()
            {
                *slot = Some((reference.to_string(), message.to_string()));
            }
            Ok(())
        });

        let mut push_options = PushOptions::new();
        push_options.remote_callbacks(callbacks);
        let mut remote = repo.remote_anonymous(remote_url)?;
        remote.push(
            &[format!("+{}:{}", PUBLISH_REF, REMOTE_BRANCH)],
            Some(&mut push_options),
        )?;

        if let Some((reference, message)) = rejection.lock().ok().and_then(|mut slot| slot.take()) {
            return Err(GitServiceError::PushRejected {
                remote: remote_url.to_string(),
                reference,
                message,
            });
        }
        Ok(commit.to_string())
    }

    fn configure_git_timeouts(fetch_timeout: Duration) -> Result<(), GitServiceError> {
        let timeout_ms = fetch_timeout.as_millis().clamp(1, i32::MAX as u128) as i32;
        unsafe {
            opts::set_server_connect_timeout_in_milliseconds(timeout_ms)?;
            opts::set_server_timeout_in_milliseconds(timeout_ms)?;
        }
        Ok(())
    }

    /// Clear all tracked checkouts. Intended for graceful shutdowns/tests.
    pub async fn cleanup_all(&self) {
        let mut checkouts = self.checkouts.lock().await;
        checkouts.clear();
    }
}

#[async_trait]
impl RepositoryHost for GitService {
    async fn clone_repository(
        &self,
        job_id: Uuid,
        repository_url: &str,
    ) -> Result<GitCheckout, GitServiceError> {
        if !repository_url.starts_with("https://") {
            return Err(GitServiceError::UnsupportedScheme(repository_url.to_string()));
        }

        let checkout_dir = tempfile::Builder::new()
            .prefix("javelin-git-")
            .tempdir_in(&self.checkout_parent)?;
        let checkout_path = checkout_dir.path().to_path_buf();
        let dest_for_clone = checkout_path.clone();
        let repo_url = repository_url.to_string();
        let token = current_request_git_token().filter(|t| !t.is_empty());

        info!(job_id = %job_id, repository = %repo_url, "Starting Git clone");

        Self::configure_git_timeouts(self.config.fetch_timeout)?;

        let head_commit = tokio::task::spawn_blocking(move || {
            Self::perform_clone(dest_for_clone.as_path(), &repo_url, token)
        })
        .await??;

        self.checkouts.lock().await.insert(job_id, checkout_dir);

        debug!(job_id = %job_id, path = %checkout_path.display(), "Git clone completed");

        Ok(GitCheckout {
            checkout_path,
            head_commit,
        })
    }

    async fn publish(&self, request: PublishRequest) -> Result<String, GitServiceError> {
        let token = current_request_git_token()
            .filter(|t| !t.trim().is_empty())
            .ok_or(GitServiceError::MissingToken(request.platform))?;

        let created = self
            .hosting
            .create_repository(
                request.platform,
                &token,
                &request.repository_name,
                &request.description,
            )
            .await?;

        let clone_url = created.clone_url.clone();
        let platform = request.platform;
        let checkout = request.checkout_path.clone();
        let author_name = self.config.author_name.clone();
        let author_email = self.config.author_email.clone();
        let commit = tokio::task::spawn_blocking(move || {
            Self::perform_push(
                &checkout,
                &clone_url,
                token,
                platform,
                (&author_name, &author_email),
            )
        })
        .await??;

        info!(
            repository = %created.name,
            web_url = %created.web_url,
            commit = %commit,
            "Migrated code pushed"
        );
        Ok(created.web_url)
    }

    async fn cleanup(&self, job_id: Uuid) -> bool {
        let mut checkouts = self.checkouts.lock().await;
        if checkouts.remove(&job_id).is_some() {
            debug!(job_id = %job_id, "Removed Git checkout");
            true
        } else {
            warn!(job_id = %job_id, "No Git checkout found during cleanup");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use javelin_core::config::GitConfig;

    fn service(parent: &Path) -> GitService {
        let config = GitServiceConfig {
            checkout_parent: Some(parent.to_path_buf()),
            ..GitServiceConfig::default()
        };
        GitService::new(config, HostingApi::new(&GitConfig::default()).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_rejects_non_https_urls() {
        let parent = tempfile::tempdir().unwrap();
        let err = service(parent.path())
            .clone_repository(Uuid::new_v4(), "git@github.com:acme/app.git")
            .await
            .unwrap_err();
        assert!(matches!(err, GitServiceError::UnsupportedScheme(_)));
    }

    #[tokio::test]
    async fn test_publish_without_token_fails_before_any_request() {
        let parent = tempfile::tempdir().unwrap();
        let err = service(parent.path())
            .publish(PublishRequest {
                platform: GitPlatform::Github,
                checkout_path: parent.path().to_path_buf(),
                repository_name: "app".to_string(),
                description: "d".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, GitServiceError::MissingToken(GitPlatform::Github)));
    }

    #[tokio::test]
    async fn test_cleanup_of_unknown_job_reports_false() {
        let parent = tempfile::tempdir().unwrap();
        assert!(!service(parent.path()).cleanup(Uuid::new_v4()).await);
    }

    #[test]
    fn test_push_to_local_bare_remote() {
        let work = tempfile::tempdir().unwrap();
        std::fs::write(work.path().join("App.java"), "class App {}\n").unwrap();
        let remote_dir = tempfile::tempdir().unwrap();
        Repository::init_bare(remote_dir.path()).unwrap();
        let remote_url = format!("file://{}", remote_dir.path().display());

        let commit = GitService::perform_push(
            work.path(),
            &remote_url,
            "token".to_string(),
            GitPlatform::Github,
            ("Bot", "bot@example.com"),
        )
        .unwrap();

        let remote = Repository::open_bare(remote_dir.path()).unwrap();
        let main = remote.find_reference(REMOTE_BRANCH).unwrap();
        assert_eq!(main.target().unwrap().to_string(), commit);
        let pushed = remote.find_commit(main.target().unwrap()).unwrap();
        assert_eq!(pushed.parent_count(), 0);
        assert!(pushed.tree().unwrap().get_name("App.java").is_some());
    }
}
