//! Migration summary email

use std::fmt::Write as _;
use std::sync::Arc;

use async_trait::async_trait;
use javelin_core::config::SmtpConfig;
use javelin_deps::UpgradeStatus;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use quick_xml::escape::escape;
use tracing::{info, instrument};

use crate::domain::entities::{MigrationJob, format_duration};
use crate::domain::services::{Delivery, Notifier, NotifyError};

/// Email over SMTP when credentials exist, otherwise a log line
pub fn notifier(config: &SmtpConfig) -> Result<Arc<dyn Notifier>, NotifyError> {
    if config.has_credentials() {
        Ok(Arc::new(EmailNotifier::new(config)?))
    } else {
        info!("SMTP credentials not configured; summaries will only be logged");
        Ok(Arc::new(LogNotifier))
    }
}

pub fn summary_subject(job: &MigrationJob) -> String {
    format!(
        "Migration Complete: {} → Java {}",
        job.source_repo, job.target_java_version
    )
}

#[derive(Clone)]
pub struct EmailNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl std::fmt::Debug for EmailNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailNotifier").field("from", &self.from).finish()
    }
}

impl EmailNotifier {
    pub fn new(config: &SmtpConfig) -> Result<Self, NotifyError> {
        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?.port(config.port);
        if let (Some(user), Some(password)) = (&config.user, &config.password) {
            builder = builder.credentials(Credentials::new(user.clone(), password.clone()));
        }
        Ok(Self {
            transport: builder.build(),
            from: config.from.parse()?,
        })
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    #[instrument(skip(self, job), fields(job_id = %job.job_id))]
    async fn send_summary(&self, recipient: &str, job: &MigrationJob) -> Result<Delivery, NotifyError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(recipient.parse()?)
            .subject(summary_subject(job))
            .multipart(MultiPart::alternative_plain_html(
                render_plain(job),
                render_html(job),
            ))?;
        self.transport.send(message).await?;
        info!(recipient, "Migration summary emailed");
        Ok(Delivery::Sent)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_summary(&self, recipient: &str, job: &MigrationJob) -> Result<Delivery, NotifyError> {
        info!(
            job_id = %job.job_id,
            recipient,
            subject = %summary_subject(job),
            files_modified = job.files_modified,
            issues_fixed = job.issues_fixed,
            "Migration summary (email disabled)"
        );
        Ok(Delivery::Logged)
    }
}

fn duration_text(job: &MigrationJob) -> String {
    job.duration().map(format_duration).unwrap_or_else(|| "N/A".to_string())
}

pub fn render_plain(job: &MigrationJob) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "Java Migration Complete");
    let _ = writeln!(text);
    let _ = writeln!(text, "Source repository: {}", job.source_repo);
    let _ = writeln!(
        text,
        "New repository: {}",
        job.target_repo.as_deref().unwrap_or("N/A")
    );
    let _ = writeln!(
        text,
        "Java version: {} -> {}",
        job.source_java_version, job.target_java_version
    );
    let _ = writeln!(text, "Duration: {}", duration_text(job));
    let _ = writeln!(text, "Files modified: {}", job.files_modified);
    let _ = writeln!(text, "Issues fixed: {}", job.issues_fixed);
    let _ = writeln!(
        text,
        "Errors fixed: {}/{}",
        job.errors_fixed, job.total_errors
    );
    let _ = writeln!(
        text,
        "Warnings fixed: {}/{}",
        job.warnings_fixed, job.total_warnings
    );
    let _ = writeln!(
        text,
        "API endpoints working: {}/{}",
        job.api_endpoints_working, job.api_endpoints_validated
    );
    if let Some(gate) = &job.quality.quality_gate {
        let _ = writeln!(text);
        let _ = writeln!(text, "Quality gate: {}", gate);
        let _ = writeln!(
            text,
            "Bugs: {}  Vulnerabilities: {}  Code smells: {}",
            job.quality.bugs, job.quality.vulnerabilities, job.quality.code_smells
        );
        let _ = writeln!(
            text,
            "Coverage: {:.1}%  Duplications: {:.1}%",
            job.quality.coverage, job.quality.duplications
        );
    }
    let upgraded: Vec<_> = job
        .dependencies
        .iter()
        .filter(|d| d.status == UpgradeStatus::Upgraded)
        .collect();
    if !upgraded.is_empty() {
        let _ = writeln!(text);
        let _ = writeln!(text, "Dependencies upgraded:");
        for dep in upgraded {
            let _ = writeln!(
                text,
                "  {}:{} {} -> {}",
                dep.group_id,
                dep.artifact_id,
                dep.current_version,
                dep.new_version.as_deref().unwrap_or("-")
            );
        }
    }
    text
}

pub fn render_html(job: &MigrationJob) -> String {
    let mut html = String::from(
        "<html><body style=\"font-family: Arial, sans-serif;\">\n<h2>Java Migration Complete</h2>\n",
    );
    let _ = writeln!(html, "<table cellpadding=\"6\">");
    let rows = [
        ("Java version", format!("{} → {}", job.source_java_version, job.target_java_version)),
        ("Duration", duration_text(job)),
        ("Files modified", job.files_modified.to_string()),
        ("Issues fixed", job.issues_fixed.to_string()),
        ("Errors fixed", format!("{}/{}", job.errors_fixed, job.total_errors)),
        ("Warnings fixed", format!("{}/{}", job.warnings_fixed, job.total_warnings)),
        (
            "API endpoints working",
            format!("{}/{}", job.api_endpoints_working, job.api_endpoints_validated),
        ),
    ];
    for (label, value) in rows {
        let _ = writeln!(html, "<tr><td><b>{}</b></td><td>{}</td></tr>", label, escape(&value));
    }
    let _ = writeln!(html, "</table>");

    if let Some(gate) = &job.quality.quality_gate {
        let _ = writeln!(html, "<h3>Code Quality</h3>\n<table border=\"1\" cellpadding=\"6\">");
        let _ = writeln!(html, "<tr><td>Quality Gate</td><td>{}</td></tr>", escape(gate));
        let _ = writeln!(html, "<tr><td>Bugs</td><td>{}</td></tr>", job.quality.bugs);
        let _ = writeln!(
            html,
            "<tr><td>Vulnerabilities</td><td>{}</td></tr>",
            job.quality.vulnerabilities
        );
        let _ = writeln!(html, "<tr><td>Code Smells</td><td>{}</td></tr>", job.quality.code_smells);
        let _ = writeln!(html, "<tr><td>Coverage</td><td>{:.1}%</td></tr>", job.quality.coverage);
        let _ = writeln!(
            html,
            "<tr><td>Duplications</td><td>{:.1}%</td></tr>",
            job.quality.duplications
        );
        let _ = writeln!(html, "</table>");
    }

    let _ = writeln!(html, "<h3>Repositories</h3>\n<ul>");
    let _ = writeln!(
        html,
        "<li>Source: <a href=\"{0}\">{0}</a></li>",
        escape(&job.source_repo)
    );
    if let Some(target) = &job.target_repo {
        let _ = writeln!(html, "<li>Migrated: <a href=\"{0}\">{0}</a></li>", escape(target));
    }
    let _ = writeln!(html, "</ul>");

    if !job.dependencies.is_empty() {
        let _ = writeln!(
            html,
            "<h3>Dependencies</h3>\n<table border=\"1\" cellpadding=\"6\">\n<tr><th>Dependency</th><th>Current</th><th>New</th><th>Status</th></tr>"
        );
        for dep in &job.dependencies {
            let _ = writeln!(
                html,
                "<tr><td>{}:{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape(&dep.group_id),
                escape(&dep.artifact_id),
                escape(&dep.current_version),
                escape(dep.new_version.as_deref().unwrap_or("-")),
                dep.status
            );
        }
        let _ = writeln!(html, "</table>");
    }
    html.push_str("</body></html>\n");
    html
}
