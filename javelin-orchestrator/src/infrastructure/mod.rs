//! Orchestrator infrastructure layer

pub mod git;
pub mod job_store;
pub mod notify;
pub mod quality;
pub mod reports;
pub mod test_runner;

pub use git::*;
pub use job_store::*;
pub use notify::{EmailNotifier, LogNotifier, notifier};
pub use quality::{SimulatedQualityScanner, SonarQubeClient, quality_scanner};
pub use reports::{render_html_report, render_jmeter_plan};
pub use test_runner::BuildToolTestRunner;
