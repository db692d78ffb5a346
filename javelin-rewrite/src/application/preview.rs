//! Dry-run of a migration plan
//!
//! Runs the same passes as [`super::engine::TransformationEngine`] against an
//! in-memory overlay and reports what would change. The project on disk is
//! never written.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use javelin_core::ConversionType;
use javelin_core::config::PreviewConfig;
use javelin_deps::{DependencyResolver, UpgradeStatus};
use serde::Serialize;
use tracing::{info, instrument};
use utoipa::ToSchema;

use super::analysis::ProjectAnalyzer;
use super::passes::PassRunner;
use super::scanner::IssueScanner;
use crate::domain::{AppliedRewrite, Issue, MigrationPlan};
use crate::infrastructure::discovery::SourceDiscovery;
use crate::infrastructure::rules::RuleCatalog;
use crate::infrastructure::store::OverlayStore;

const JAKARTA_MIGRATION: &str = "Jakarta EE migration";

/// Unified diff of one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FileDiff {
    pub file_path: String,
    pub diff: String,
    /// Added plus removed lines in the full diff
    pub change_count: usize,
    pub truncated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DependencyUpdate {
    pub dependency: String,
    pub current_version: String,
    pub new_version: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct PreviewReport {
    pub files_to_modify: Vec<String>,
    pub files_to_create: Vec<String>,
    pub files_to_remove: Vec<String>,
    #[schema(value_type = Object)]
    pub file_changes: BTreeMap<String, Vec<AppliedRewrite>>,
    pub issues_to_fix: Vec<Issue>,
    pub file_diffs: Vec<FileDiff>,
    pub dependencies_to_update: Vec<DependencyUpdate>,
}

impl PreviewReport {
    pub fn total_changes(&self) -> usize {
        self.file_changes
            .values()
            .flatten()
            .map(|r| r.occurrences)
            .sum()
    }
}

#[derive(Clone)]
pub struct PreviewEngine {
    catalog: Arc<RuleCatalog>,
    discovery: SourceDiscovery,
    scanner: IssueScanner,
    analyzer: Arc<ProjectAnalyzer>,
    limits: PreviewConfig,
}

impl PreviewEngine {
    pub fn new(catalog: Arc<RuleCatalog>, limits: PreviewConfig) -> Self {
        Self {
            scanner: IssueScanner::new(catalog.clone()),
            catalog,
            discovery: SourceDiscovery::new(),
            analyzer: Arc::new(ProjectAnalyzer::new()),
            limits,
        }
    }

    #[instrument(skip(self, plan), fields(root = %root.display()))]
    pub fn preview(&self, root: &Path, plan: &MigrationPlan) -> PreviewReport {
        let scan = self.scanner.scan(
            root,
            &plan.conversions,
            plan.source_version,
            plan.target_version,
        );

        let mut store = OverlayStore::new(root);
        let runner = PassRunner::new(&self.catalog, &self.discovery);
        let mut file_changes: BTreeMap<String, Vec<AppliedRewrite>> = BTreeMap::new();
        for pass in plan.passes() {
            for outcome in runner.run(&mut store, pass, plan).outcomes {
                file_changes
                    .entry(outcome.path)
                    .or_default()
                    .extend(outcome.rewrites);
            }
        }

        let mut report = PreviewReport {
            issues_to_fix: scan.issues,
            dependencies_to_update: self.dependency_updates(root, plan),
            ..PreviewReport::default()
        };
        for (path, original, updated) in store.changed_files() {
            match original {
                Some(_) => report.files_to_modify.push(path.to_string()),
                None => report.files_to_create.push(path.to_string()),
            }
            if report.file_diffs.len() < self.limits.max_diff_files {
                report.file_diffs.push(render_diff(
                    path,
                    original.unwrap_or(""),
                    updated,
                    self.limits.max_diff_lines,
                ));
            }
        }
        file_changes.retain(|path, _| {
            report.files_to_modify.contains(path) || report.files_to_create.contains(path)
        });
        report.file_changes = file_changes;

        info!(
            files_to_modify = report.files_to_modify.len(),
            files_to_create = report.files_to_create.len(),
            issues = report.issues_to_fix.len(),
            dependencies = report.dependencies_to_update.len(),
            "Preview completed"
        );
        report
    }

    fn dependency_updates(&self, root: &Path, plan: &MigrationPlan) -> Vec<DependencyUpdate> {
        let resolver = DependencyResolver::new();
        let mut updates: Vec<DependencyUpdate> = self
            .analyzer
            .manifest_dependencies(root)
            .iter()
            .map(|dep| resolver.resolve_dependency(dep))
            .filter(|record| record.status == UpgradeStatus::Upgraded)
            .filter_map(|record| {
                Some(DependencyUpdate {
                    dependency: format!("{}:{}", record.group_id, record.artifact_id),
                    current_version: record.current_version,
                    new_version: record.new_version?,
                    reason: "Version compatibility upgrade".to_string(),
                })
            })
            .collect();

        if plan.target_version >= 17 && plan.conversions.contains(&ConversionType::JavaxToJakarta) {
            updates.extend([
                DependencyUpdate {
                    dependency: "javax.servlet:javax.servlet-api".to_string(),
                    current_version: "Any".to_string(),
                    new_version: "jakarta.servlet:jakarta.servlet-api:6.0.0".to_string(),
                    reason: JAKARTA_MIGRATION.to_string(),
                },
                DependencyUpdate {
                    dependency: "javax.persistence:javax.persistence-api".to_string(),
                    current_version: "Any".to_string(),
                    new_version: "jakarta.persistence:jakarta.persistence-api:3.1.0".to_string(),
                    reason: JAKARTA_MIGRATION.to_string(),
                },
            ]);
        }
        if plan.conversions.contains(&ConversionType::SpringBoot2To3) {
            updates.push(DependencyUpdate {
                dependency: "org.springframework.boot:spring-boot-starter".to_string(),
                current_version: "2.x".to_string(),
                new_version: "3.2.0".to_string(),
                reason: "Spring Boot 2 → 3 upgrade".to_string(),
            });
        }
        updates
    }
}

fn render_diff(path: &str, original: &str, updated: &str, max_lines: usize) -> FileDiff {
    let patch = diffy::create_patch(original, updated).to_string();
    let change_count = patch
        .lines()
        .filter(|l| {
            (l.starts_with('+') && !l.starts_with("+++")) || (l.starts_with('-') && !l.starts_with("---"))
        })
        .count();
    let total_lines = patch.lines().count();
    let diff = if total_lines > max_lines {
        let mut kept: Vec<&str> = patch.lines().take(max_lines).collect();
        kept.push("...");
        kept.join("\n")
    } else {
        patch
    };
    FileDiff {
        file_path: path.to_string(),
        diff,
        change_count,
        truncated: total_lines > max_lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_diffs_are_truncated() {
        let original: String = (0..40).map(|i| format!("line {i}\n")).collect();
        let updated: String = (0..40).map(|i| format!("changed {i}\n")).collect();
        let diff = render_diff("A.java", &original, &updated, 10);
        assert!(diff.truncated);
        assert_eq!(diff.diff.lines().count(), 11);
        assert_eq!(diff.change_count, 80);
    }

    #[test]
    fn test_spring_boot_selection_adds_starter_update() {
        let dir = tempfile::tempdir().unwrap();
        let engine = PreviewEngine::new(Arc::new(RuleCatalog::new()), PreviewConfig::default());
        let plan = MigrationPlan::new(11, 17).with_conversions([ConversionType::SpringBoot2To3]);
        let updates = engine.dependency_updates(dir.path(), &plan);
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].new_version, "3.2.0");
    }

    #[test]
    fn test_new_files_are_listed_as_created() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("pom.xml"),
            "<project><dependencies><dependency><groupId>junit</groupId><artifactId>junit</artifactId><version>4.12</version></dependency></dependencies></project>",
        )
        .unwrap();
        let engine = PreviewEngine::new(Arc::new(RuleCatalog::new()), PreviewConfig::default());
        let plan = MigrationPlan::new(11, 17).with_conversions([ConversionType::MavenToGradle]);
        let report = engine.preview(dir.path(), &plan);

        assert_eq!(report.files_to_create, vec!["build.gradle", "settings.gradle"]);
        assert!(report.files_to_modify.is_empty());
        assert!(!dir.path().join("build.gradle").exists());
        assert_eq!(report.dependencies_to_update.len(), 1);
        assert_eq!(report.dependencies_to_update[0].new_version, "4.13.2");
    }
}
