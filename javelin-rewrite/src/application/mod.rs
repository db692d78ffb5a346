//! Application layer: scanning, migrating and previewing a project

pub mod analysis;
pub mod engine;
pub mod passes;
pub mod preview;
pub mod scanner;

pub use analysis::{ProjectAnalysis, ProjectAnalyzer, detect_endpoints};
pub use engine::TransformationEngine;
pub use passes::{PassOutcome, PassRunner};
pub use preview::{DependencyUpdate, FileDiff, PreviewEngine, PreviewReport};
pub use scanner::IssueScanner;
