//! Javelin Rewrite - rule-driven detection and rewriting of Java projects
//!
//! This crate finds migration issues in a Java source tree and applies the
//! text rewrites that fix them. Everything is regex based: no Java parser is
//! involved.
//!
//! ## Features
//!
//! - Ordered, append-only rule catalog (detection, rewrite and build file generation rules)
//! - Issue scanning with per-file error isolation and fix verification
//! - Transformation passes per conversion type, plus an optional business-logic pass
//! - Dry-run previews with unified diffs that never touch the working tree
//! - Legacy encoding fallback (UTF-16 with BOM, Windows-1252)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use javelin_core::ConversionType;
//! use javelin_rewrite::{MigrationPlan, TransformationEngine};
//!
//! let plan = MigrationPlan::new(8, 17).with_conversions([ConversionType::JavaVersion]);
//! let report = TransformationEngine::default().migrate(root, &plan);
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{
    DependencyUpdate, FileDiff, IssueScanner, PreviewEngine, PreviewReport, ProjectAnalysis,
    ProjectAnalyzer, TransformationEngine,
};
pub use domain::{
    ApiEndpoint, Issue, IssueStatus, MigrationPlan, Rule, ScanError, ScanReport,
    TransformationError, TransformationReport,
};
pub use infrastructure::{Recipe, RuleCatalog, recipe_catalog, recipes_for};
