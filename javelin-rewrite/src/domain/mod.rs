//! Domain layer for rule-driven scanning and rewriting

pub mod errors;
pub mod issue;
pub mod plan;
pub mod rule;

pub use errors::{ScanError, TransformationError};
pub use issue::{ApiEndpoint, Issue, IssueStatus, MAX_SNIPPET_CHARS, snippet};
pub use plan::{AppliedRewrite, FileOutcome, MigrationPlan, ScanReport, TransformationReport};
pub use rule::{
    DetectionRule, FileKind, GenerationRule, GeneratorKind, MatchMode, Replacement,
    RewriteFunction, RewriteRule, Rule, RuleMetadata, Selector, Trigger, VersionPredicate,
};
