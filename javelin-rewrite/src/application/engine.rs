//! Transformation engine: runs migration passes against the working tree

use std::path::Path;
use std::sync::Arc;

use javelin_core::ConversionType;
use tracing::{info, instrument};

use super::passes::{PassOutcome, PassRunner};
use crate::domain::{MigrationPlan, Selector, TransformationReport};
use crate::infrastructure::discovery::SourceDiscovery;
use crate::infrastructure::rules::RuleCatalog;
use crate::infrastructure::store::DiskStore;

#[derive(Debug, Clone)]
pub struct TransformationEngine {
    catalog: Arc<RuleCatalog>,
    discovery: SourceDiscovery,
}

impl Default for TransformationEngine {
    fn default() -> Self {
        Self::new(Arc::new(RuleCatalog::new()))
    }
}

impl From<PassOutcome> for TransformationReport {
    fn from(pass: PassOutcome) -> Self {
        let changes = pass
            .outcomes
            .iter()
            .map(|outcome| {
                let descriptions: Vec<&str> = outcome
                    .rewrites
                    .iter()
                    .map(|r| r.description.as_str())
                    .collect();
                format!("{}: {}", outcome.path, descriptions.join(", "))
            })
            .collect();
        Self {
            files_scanned: pass.files_scanned,
            files_modified: pass.outcomes.len(),
            modified_paths: pass.outcomes.iter().map(|o| o.path.clone()).collect(),
            issues_fixed: pass.outcomes.iter().map(|o| o.occurrences()).sum(),
            changes,
            skipped: pass.skipped,
        }
    }
}

impl TransformationEngine {
    pub fn new(catalog: Arc<RuleCatalog>) -> Self {
        Self {
            catalog,
            discovery: SourceDiscovery::new(),
        }
    }

    fn run_pass(&self, root: &Path, pass: Selector, plan: &MigrationPlan) -> TransformationReport {
        let mut store = DiskStore::new(root);
        let report: TransformationReport = PassRunner::new(&self.catalog, &self.discovery)
            .run(&mut store, pass, plan)
            .into();
        info!(
            pass = ?pass,
            files_modified = report.files_modified,
            issues_fixed = report.issues_fixed,
            skipped = report.skipped.len(),
            "Transformation pass finished"
        );
        report
    }

    /// One conversion pass, writing changed files in place
    #[instrument(skip(self, plan), fields(root = %root.display()))]
    pub fn run_conversion(
        &self,
        root: &Path,
        conversion: ConversionType,
        plan: &MigrationPlan,
    ) -> TransformationReport {
        self.run_pass(root, Selector::Conversion(conversion), plan)
    }

    #[instrument(skip(self, plan), fields(root = %root.display()))]
    pub fn run_business_logic(&self, root: &Path, plan: &MigrationPlan) -> TransformationReport {
        self.run_pass(root, Selector::BusinessLogic, plan)
    }

    /// Every pass the plan asks for, in order
    pub fn migrate(&self, root: &Path, plan: &MigrationPlan) -> TransformationReport {
        let mut total = TransformationReport::default();
        for pass in plan.passes() {
            total.absorb(self.run_pass(root, pass, plan));
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_unchanged_files_are_not_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src/main/java");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("Clean.java"), "class Clean {}\n").unwrap();
        fs::write(src.join("Old.java"), "Integer i = new Integer(5);\n").unwrap();

        let plan = MigrationPlan::new(8, 11).with_conversions([ConversionType::JavaVersion]);
        let report = TransformationEngine::default().run_conversion(dir.path(), ConversionType::JavaVersion, &plan);

        assert_eq!(report.files_scanned, 2);
        assert_eq!(report.files_modified, 1);
        assert_eq!(report.issues_fixed, 1);
        assert!(report.changes[0].starts_with("src/main/java/Old.java: "));
        assert_eq!(
            fs::read_to_string(src.join("Old.java")).unwrap(),
            "Integer i = Integer.valueOf(5);\n"
        );
    }

    #[test]
    fn test_maven_to_gradle_generates_build_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("pom.xml"),
            "<project><dependencies><dependency><groupId>com.google.guava</groupId><artifactId>guava</artifactId><version>33.0.0-jre</version></dependency></dependencies></project>",
        )
        .unwrap();

        let plan = MigrationPlan::new(11, 17).with_conversions([ConversionType::MavenToGradle]);
        let engine = TransformationEngine::default();
        let report = engine.migrate(dir.path(), &plan);

        assert_eq!(report.files_modified, 2);
        let build = fs::read_to_string(dir.path().join("build.gradle")).unwrap();
        assert!(build.contains("implementation 'com.google.guava:guava:33.0.0-jre'"));
        assert!(dir.path().join("settings.gradle").is_file());

        assert_eq!(engine.migrate(dir.path(), &plan).files_modified, 0);
    }
}
