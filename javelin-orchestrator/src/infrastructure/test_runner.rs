//! Runs the migrated project's test suite with its own build tool

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use javelin_deps::BuildTool;
use javelin_rewrite::ApiEndpoint;
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::process::Command;
use tracing::{info, instrument, warn};

use crate::domain::services::{TestOutcome, TestRunError, TestRunSummary, TestRunner};

static SUREFIRE_SUMMARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Tests run: (\d+), Failures: (\d+), Errors: (\d+), Skipped: (\d+)")
        .expect("surefire summary pattern is valid")
});

static GRADLE_SUMMARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+) tests completed(?:, (\d+) failed)?(?:, (\d+) skipped)?")
        .expect("gradle summary pattern is valid")
});

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Counts {
    run: usize,
    failed: usize,
    skipped: usize,
}

/// `mvn test` / `gradle test`, preferring the project's wrapper script
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildToolTestRunner;

impl BuildToolTestRunner {
    fn command_for(project_root: &Path, tool: BuildTool) -> (PathBuf, Vec<&'static str>) {
        let (wrapper, fallback, args) = match tool {
            BuildTool::Maven => ("mvnw", "mvn", vec!["-B", "test"]),
            BuildTool::Gradle => ("gradlew", "gradle", vec!["test", "--console=plain"]),
        };
        let wrapper_path = project_root.join(wrapper);
        if wrapper_path.is_file() {
            (wrapper_path, args)
        } else {
            (PathBuf::from(fallback), args)
        }
    }
}

fn capture(caps: &regex::Captures<'_>, index: usize) -> usize {
    caps.get(index)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or_default()
}

/// Totals from the last summary line the build printed
fn parse_counts(output: &str) -> Option<Counts> {
    if let Some(caps) = SUREFIRE_SUMMARY.captures_iter(output).last() {
        return Some(Counts {
            run: capture(&caps, 1),
            failed: capture(&caps, 2) + capture(&caps, 3),
            skipped: capture(&caps, 4),
        });
    }
    GRADLE_SUMMARY.captures_iter(output).last().map(|caps| Counts {
        run: capture(&caps, 1),
        failed: capture(&caps, 2),
        skipped: capture(&caps, 3),
    })
}

fn summarize(outcome: TestOutcome, counts: Counts, endpoints: &[ApiEndpoint]) -> TestRunSummary {
    let total_endpoints = endpoints.len();
    TestRunSummary {
        outcome,
        tests_run: counts.run,
        tests_failed: counts.failed,
        tests_skipped: counts.skipped,
        total_endpoints,
        working_endpoints: if outcome == TestOutcome::Failed { 0 } else { total_endpoints },
    }
}

#[async_trait]
impl TestRunner for BuildToolTestRunner {
    #[instrument(skip(self, endpoints), fields(root = %project_root.display()))]
    async fn run(
        &self,
        project_root: &Path,
        build_tool: Option<BuildTool>,
        endpoints: &[ApiEndpoint],
    ) -> Result<TestRunSummary, TestRunError> {
        let Some(tool) = build_tool else {
            info!("No build tool detected; skipping tests");
            return Ok(summarize(TestOutcome::Skipped, Counts::default(), endpoints));
        };

        let (program, args) = Self::command_for(project_root, tool);
        let command_line = format!("{} {}", program.display(), args.join(" "));
        let output = match Command::new(&program)
            .args(&args)
            .current_dir(project_root)
            .kill_on_drop(true)
            .output()
            .await
        {
            Ok(output) => output,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(command = %command_line, "Build tool not installed; skipping tests");
                return Ok(summarize(TestOutcome::Skipped, Counts::default(), endpoints));
            }
            Err(source) => {
                return Err(TestRunError::Spawn {
                    command: command_line,
                    source,
                });
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let counts = parse_counts(&stdout)
            .or_else(|| parse_counts(&stderr))
            .unwrap_or_default();
        let outcome = if output.status.success() {
            TestOutcome::Passed
        } else {
            TestOutcome::Failed
        };

        info!(
            command = %command_line,
            ?outcome,
            tests_run = counts.run,
            tests_failed = counts.failed,
            "Test suite finished"
        );
        Ok(summarize(outcome, counts, endpoints))
    }
}
