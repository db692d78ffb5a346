//! Detected issues and project facts found while scanning

use chrono::{DateTime, Utc};
use javelin_core::{ConversionType, Severity};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Longest snippet kept on an issue
pub const MAX_SNIPPET_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    Detected,
    Fixed,
    ManualReview,
    Ignored,
}

/// A finding produced by a detection rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Issue {
    /// `ISS-0001` style, unique within a job
    pub id: String,
    pub severity: Severity,
    pub status: IssueStatus,
    pub category: String,
    pub message: String,
    /// Relative to the project root, `/` separated
    pub file_path: String,
    pub line: Option<usize>,
    pub column: Option<usize>,
    pub code_snippet: Option<String>,
    pub suggested_fix: Option<String>,
    pub conversion_type: ConversionType,
    pub rule_id: String,
    pub fixed_at: Option<DateTime<Utc>>,
}

impl Issue {
    pub fn format_id(sequence: usize) -> String {
        format!("ISS-{:04}", sequence)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }

    pub fn is_open(&self) -> bool {
        self.status == IssueStatus::Detected
    }

    pub fn mark_fixed(&mut self, at: DateTime<Utc>) {
        self.status = IssueStatus::Fixed;
        self.fixed_at = Some(at);
    }

    pub fn mark_manual_review(&mut self) {
        self.status = IssueStatus::ManualReview;
    }
}

/// Trims a source line and cuts it to [`MAX_SNIPPET_CHARS`] characters
pub fn snippet(line: &str) -> String {
    line.trim().chars().take(MAX_SNIPPET_CHARS).collect()
}

/// A Spring request mapping found in a source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ApiEndpoint {
    pub method: String,
    pub path: String,
    pub file: String,
}
