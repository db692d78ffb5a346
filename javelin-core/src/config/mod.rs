//! Configuration management

pub mod validation;

pub use validation::{Validate, ValidationError};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub workspace: WorkspaceConfig,
    pub pipeline: PipelineConfig,
    pub preview: PreviewConfig,
    pub git: GitConfig,
    pub smtp: SmtpConfig,
    pub quality: QualityConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Whether to expose interactive API docs (Swagger UI).
    pub enable_docs: bool,
    /// Global request timeout in seconds applied at the HTTP layer.
    pub request_timeout_seconds: u64,
    /// Preview clones and simulates a whole repository inside the request, so it gets its own budget.
    pub preview_timeout_seconds: u64,
    /// Allowed CORS origins. Use ["*"] to allow any (development only).
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8001,
            enable_docs: true,
            request_timeout_seconds: 30,
            preview_timeout_seconds: 300,
            allowed_origins: vec!["*".to_string()],
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `json` or `pretty`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "json".to_string(),
        }
    }
}

/// Where per-job checkouts are created
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Parent directory for clones. Defaults to the system temp directory.
    pub root: Option<PathBuf>,
}

/// Job pipeline limits and per-stage time budgets
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub max_concurrent_jobs: usize,
    pub clone_timeout_seconds: u64,
    pub analysis_timeout_seconds: u64,
    pub migration_timeout_seconds: u64,
    pub test_timeout_seconds: u64,
    pub quality_timeout_seconds: u64,
    pub push_timeout_seconds: u64,
    pub notify_timeout_seconds: u64,
    /// Grace period given to running jobs after a shutdown signal.
    pub shutdown_timeout_seconds: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_concurrent_jobs: 4,
            clone_timeout_seconds: 300,
            analysis_timeout_seconds: 300,
            migration_timeout_seconds: 900,
            test_timeout_seconds: 1800,
            quality_timeout_seconds: 900,
            push_timeout_seconds: 300,
            notify_timeout_seconds: 30,
            shutdown_timeout_seconds: 10,
        }
    }
}

impl PipelineConfig {
    pub fn clone_timeout(&self) -> Duration {
        Duration::from_secs(self.clone_timeout_seconds)
    }

    pub fn analysis_timeout(&self) -> Duration {
        Duration::from_secs(self.analysis_timeout_seconds)
    }

    pub fn migration_timeout(&self) -> Duration {
        Duration::from_secs(self.migration_timeout_seconds)
    }

    pub fn test_timeout(&self) -> Duration {
        Duration::from_secs(self.test_timeout_seconds)
    }

    pub fn quality_timeout(&self) -> Duration {
        Duration::from_secs(self.quality_timeout_seconds)
    }

    pub fn push_timeout(&self) -> Duration {
        Duration::from_secs(self.push_timeout_seconds)
    }

    pub fn notify_timeout(&self) -> Duration {
        Duration::from_secs(self.notify_timeout_seconds)
    }
}

/// Bounds on preview response size
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Number of files rendered as unified diffs.
    pub max_diff_files: usize,
    /// Lines kept from each rendered diff.
    pub max_diff_lines: usize,
    /// Diff entries returned to the client.
    pub max_file_diffs_returned: usize,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            max_diff_files: 5,
            max_diff_lines: 50,
            max_file_diffs_returned: 10,
        }
    }
}

/// Git hosting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    /// Timeout applied to network operations inside libgit2.
    pub fetch_timeout_seconds: u64,
    pub github_api_url: String,
    pub gitlab_api_url: String,
    pub commit_author_name: String,
    pub commit_author_email: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_seconds: 30,
            github_api_url: "https://api.github.com".to_string(),
            gitlab_api_url: "https://gitlab.com/api/v4".to_string(),
            commit_author_name: "Javelin Migration Bot".to_string(),
            commit_author_email: "migration-bot@example.com".to_string(),
        }
    }
}

/// SMTP settings for the migration summary email
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
    pub from: String,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "smtp.gmail.com".to_string(),
            port: 587,
            user: None,
            password: None,
            from: "migration-bot@example.com".to_string(),
        }
    }
}

impl SmtpConfig {
    /// Mail is only sent when both user and password are present.
    pub fn has_credentials(&self) -> bool {
        matches!((&self.user, &self.password), (Some(u), Some(p)) if !u.is_empty() && !p.is_empty())
    }
}

/// SonarQube / SonarCloud settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    pub url: String,
    pub token: Option<String>,
    pub organization: Option<String>,
    /// Wait between submitting the analysis and reading measures back.
    pub post_scan_delay_seconds: u64,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:9000".to_string(),
            token: None,
            organization: None,
            post_scan_delay_seconds: 10,
        }
    }
}

impl QualityConfig {
    pub fn is_configured(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn post_scan_delay(&self) -> Duration {
        Duration::from_secs(self.post_scan_delay_seconds)
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigLoadError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false));

        // Add environment-specific config if ENV is set
        if let Ok(env) = std::env::var("ENV") {
            builder = builder
                .add_source(config::File::with_name(&format!("config/{}", env)).required(false));
        }

        // Add local config and environment variables last (highest priority)
        builder = builder
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("JAVELIN").separator("__"));

        let mut config: Config = builder.build()?.try_deserialize()?;
        config.apply_conventional_env(|key| std::env::var(key).ok());

        config.validate()?;

        Ok(config)
    }

    /// Honour the unprefixed variable names operators already use for SMTP, SonarQube and the work dir.
    pub fn apply_conventional_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = non_empty("SMTP_HOST") {
            self.smtp.host = host;
        }
        if let Some(port) = non_empty("SMTP_PORT").and_then(|p| p.trim().parse().ok()) {
            self.smtp.port = port;
        }
        if let Some(user) = non_empty("SMTP_USER") {
            self.smtp.user = Some(user);
        }
        if let Some(password) = non_empty("SMTP_PASSWORD") {
            self.smtp.password = Some(password);
        }
        if let Some(from) = non_empty("EMAIL_FROM") {
            self.smtp.from = from;
        }
        if let Some(url) = non_empty("SONARQUBE_URL") {
            self.quality.url = url;
        }
        if let Some(token) = non_empty("SONARQUBE_TOKEN") {
            self.quality.token = Some(token);
        }
        if let Some(org) = non_empty("SONARQUBE_ORG") {
            self.quality.organization = Some(org);
        }
        if let Some(dir) = non_empty("WORK_DIR") {
            self.workspace.root = Some(PathBuf::from(dir));
        }
    }
}

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Configuration file error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Configuration validation error: {0}")]
    Validation(#[from] ValidationError),
}
