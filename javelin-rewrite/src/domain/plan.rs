//! Migration plans and the reports produced while carrying them out

use std::collections::BTreeSet;

use javelin_core::ConversionType;
use serde::{Deserialize, Serialize};

use super::errors::{ScanError, TransformationError};
use super::issue::Issue;
use super::rule::Selector;

/// What a job asked to migrate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationPlan {
    pub source_version: u32,
    pub target_version: u32,
    /// Conversions in request order
    pub conversions: Vec<ConversionType>,
    pub fix_business_logic: bool,
}

impl MigrationPlan {
    pub fn new(source_version: u32, target_version: u32) -> Self {
        Self {
            source_version,
            target_version,
            conversions: Vec::new(),
            fix_business_logic: false,
        }
    }

    pub fn with_conversions(mut self, conversions: impl IntoIterator<Item = ConversionType>) -> Self {
        self.conversions = conversions.into_iter().collect();
        self
    }

    pub fn with_business_logic(mut self, enabled: bool) -> Self {
        self.fix_business_logic = enabled;
        self
    }

    /// Passes in execution order: each selected conversion, then business logic if enabled
    pub fn passes(&self) -> Vec<Selector> {
        let mut passes: Vec<Selector> = self
            .conversions
            .iter()
            .copied()
            .map(Selector::Conversion)
            .collect();
        if self.fix_business_logic {
            passes.push(Selector::BusinessLogic);
        }
        passes
    }
}

/// A rewrite rule that changed a file, and how many times
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedRewrite {
    pub rule_id: String,
    pub description: String,
    pub pattern: String,
    pub replacement: String,
    pub occurrences: usize,
}

/// Result of running one pass over one file
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileOutcome {
    /// Relative path, `/` separated
    pub path: String,
    pub original: Option<String>,
    pub updated: String,
    pub rewrites: Vec<AppliedRewrite>,
}

impl FileOutcome {
    pub fn changed(&self) -> bool {
        self.original.as_deref() != Some(self.updated.as_str())
    }

    /// File did not exist before the pass
    pub fn created(&self) -> bool {
        self.original.is_none()
    }

    pub fn occurrences(&self) -> usize {
        self.rewrites.iter().map(|r| r.occurrences).sum()
    }
}

/// Outcome of a transformation pass (or a sequence of passes)
#[derive(Debug, Default)]
pub struct TransformationReport {
    pub files_scanned: usize,
    /// Distinct files written, however many passes touched them
    pub files_modified: usize,
    pub modified_paths: BTreeSet<String>,
    /// Rewrite occurrences applied
    pub issues_fixed: usize,
    /// Human readable change lines, one per modified file
    pub changes: Vec<String>,
    pub skipped: Vec<TransformationError>,
}

impl TransformationReport {
    pub fn absorb(&mut self, other: TransformationReport) {
        self.files_scanned += other.files_scanned;
        self.modified_paths.extend(other.modified_paths);
        self.files_modified = self.modified_paths.len();
        self.issues_fixed += other.issues_fixed;
        self.changes.extend(other.changes);
        self.skipped.extend(other.skipped);
    }
}

/// Issues found by a scan together with the files that could not be read
#[derive(Debug, Default)]
pub struct ScanReport {
    pub issues: Vec<Issue>,
    pub files_scanned: usize,
    pub skipped: Vec<ScanError>,
}

impl ScanReport {
    pub fn error_count(&self) -> usize {
        self.issues.iter().filter(|i| i.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues.iter().filter(|i| i.is_warning()).count()
    }
}
