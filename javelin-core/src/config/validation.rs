//! Configuration validation module

use crate::config::{
    Config, GitConfig, LoggingConfig, PipelineConfig, PreviewConfig, QualityConfig, ServerConfig,
    SmtpConfig,
};

/// Trait for validating configuration sections
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Server configuration error: {message}")]
    Server { message: String },

    #[error("Logging configuration error: {message}")]
    Logging { message: String },

    #[error("Pipeline configuration error: {message}")]
    Pipeline { message: String },

    #[error("Preview configuration error: {message}")]
    Preview { message: String },

    #[error("Git configuration error: {message}")]
    Git { message: String },

    #[error("SMTP configuration error: {message}")]
    Smtp { message: String },

    #[error("Quality scan configuration error: {message}")]
    Quality { message: String },
}

impl ValidationError {
    pub fn server(message: impl Into<String>) -> Self {
        Self::Server {
            message: message.into(),
        }
    }

    pub fn logging(message: impl Into<String>) -> Self {
        Self::Logging {
            message: message.into(),
        }
    }

    pub fn pipeline(message: impl Into<String>) -> Self {
        Self::Pipeline {
            message: message.into(),
        }
    }

    pub fn preview(message: impl Into<String>) -> Self {
        Self::Preview {
            message: message.into(),
        }
    }

    pub fn git(message: impl Into<String>) -> Self {
        Self::Git {
            message: message.into(),
        }
    }

    pub fn smtp(message: impl Into<String>) -> Self {
        Self::Smtp {
            message: message.into(),
        }
    }

    pub fn quality(message: impl Into<String>) -> Self {
        Self::Quality {
            message: message.into(),
        }
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        // u16 cannot exceed 65535, so only 0 is out of range
        if self.port == 0 {
            return Err(ValidationError::server(format!(
                "Port must be in range 1-65535, got {}",
                self.port
            )));
        }

        if self.host.is_empty() {
            return Err(ValidationError::server("Host cannot be empty"));
        }

        if self.request_timeout_seconds == 0 {
            return Err(ValidationError::server(
                "Request timeout must be greater than 0",
            ));
        }

        if self.preview_timeout_seconds == 0 {
            return Err(ValidationError::server(
                "Preview timeout must be greater than 0",
            ));
        }

        if self.allowed_origins.iter().any(|o| o.trim().is_empty()) {
            return Err(ValidationError::server("Allowed origins cannot contain blanks"));
        }

        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
        if !LEVELS.contains(&self.level.to_ascii_lowercase().as_str()) {
            return Err(ValidationError::logging(format!(
                "Unknown log level '{}'",
                self.level
            )));
        }

        match self.format.as_str() {
            "json" | "pretty" => Ok(()),
            other => Err(ValidationError::logging(format!(
                "Log format must be 'json' or 'pretty', got '{}'",
                other
            ))),
        }
    }
}

impl Validate for PipelineConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.max_concurrent_jobs == 0 {
            return Err(ValidationError::pipeline(
                "max_concurrent_jobs must be greater than 0",
            ));
        }

        let budgets = [
            ("clone", self.clone_timeout_seconds),
            ("analysis", self.analysis_timeout_seconds),
            ("migration", self.migration_timeout_seconds),
            ("test", self.test_timeout_seconds),
            ("quality", self.quality_timeout_seconds),
            ("push", self.push_timeout_seconds),
            ("notify", self.notify_timeout_seconds),
        ];
        if let Some((stage, _)) = budgets.iter().find(|(_, secs)| *secs == 0) {
            return Err(ValidationError::pipeline(format!(
                "{} timeout must be greater than 0",
                stage
            )));
        }

        Ok(())
    }
}

impl Validate for PreviewConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.max_diff_lines == 0 {
            return Err(ValidationError::preview("max_diff_lines must be greater than 0"));
        }
        if self.max_file_diffs_returned < self.max_diff_files {
            return Err(ValidationError::preview(format!(
                "max_file_diffs_returned ({}) must not be smaller than max_diff_files ({})",
                self.max_file_diffs_returned, self.max_diff_files
            )));
        }
        Ok(())
    }
}

impl Validate for GitConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        for (name, url) in [
            ("github_api_url", &self.github_api_url),
            ("gitlab_api_url", &self.gitlab_api_url),
        ] {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(ValidationError::git(format!(
                    "{} must be an http(s) URL, got '{}'",
                    name, url
                )));
            }
        }
        if self.commit_author_email.trim().is_empty() {
            return Err(ValidationError::git("commit_author_email cannot be empty"));
        }
        Ok(())
    }
}

impl Validate for SmtpConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::smtp("Port must be greater than 0"));
        }
        if self.has_credentials() && self.host.trim().is_empty() {
            return Err(ValidationError::smtp(
                "Host is required when credentials are configured",
            ));
        }
        if !self.from.contains('@') {
            return Err(ValidationError::smtp(format!(
                "Sender address '{}' is not an email address",
                self.from
            )));
        }
        Ok(())
    }
}

impl Validate for QualityConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.is_configured() && !self.url.starts_with("http") {
            return Err(ValidationError::quality(format!(
                "SonarQube URL must be an http(s) URL, got '{}'",
                self.url
            )));
        }
        Ok(())
    }
}

impl Validate for Config {
    fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.logging.validate()?;
        self.pipeline.validate()?;
        self.preview.validate()?;
        self.git.validate()?;
        self.smtp.validate()?;
        self.quality.validate()?;
        Ok(())
    }
}
