//! End-to-end scan, migrate and verify runs over fixture projects

mod support;

use chrono::Utc;
use javelin_core::{ConversionType, Severity};
use javelin_rewrite::{
    IssueScanner, IssueStatus, MigrationPlan, PreviewEngine, RuleCatalog, ScanError,
    TransformationEngine, TransformationError,
};
use javelin_core::config::PreviewConfig;
use std::sync::Arc;
use rstest::rstest;
use support::{JAVA_7_POM, SERVLET_APP, SERVLET_POM, project, read, write};

const APP: &str = "src/main/java/com/example/App.java";

#[test]
fn test_javax_and_wrapper_issues_are_fixed_by_java_17_migration() {
    let dir = project(&[(APP, SERVLET_APP)]);
    let catalog = Arc::new(RuleCatalog::new());
    let scanner = IssueScanner::new(catalog.clone());
    let engine = TransformationEngine::new(catalog);
    let selected = [ConversionType::JavaVersion];

    let mut scan = scanner.scan(dir.path(), &selected, 8, 17);
    assert_eq!(scan.issues.len(), 2);
    assert_eq!(scan.error_count(), 2);
    let categories: Vec<_> = scan.issues.iter().map(|i| i.category.as_str()).collect();
    assert!(categories.contains(&"Package Migration"));
    assert!(categories.contains(&"Deprecated Method"));
    assert!(scan.issues.iter().all(|i| i.severity == Severity::Error));

    let plan = MigrationPlan::new(8, 17).with_conversions(selected);
    let report = engine.migrate(dir.path(), &plan);
    assert_eq!(report.files_modified, 1);
    assert!(report.skipped.is_empty());

    let migrated = read(dir.path(), APP);
    assert!(migrated.contains("import jakarta.servlet.HttpServlet;"));
    assert!(migrated.contains("Integer.valueOf(5)"));

    for issue in &mut scan.issues {
        if scanner.is_resolved(dir.path(), issue).unwrap() {
            issue.mark_fixed(Utc::now());
        } else {
            issue.mark_manual_review();
        }
    }
    assert!(scan.issues.iter().all(|i| i.status == IssueStatus::Fixed));
    assert!(scan.issues.iter().all(|i| i.fixed_at.is_some()));
}

#[test]
fn test_java_7_pom_is_raised_to_11() {
    let dir = project(&[("pom.xml", JAVA_7_POM)]);
    let plan = MigrationPlan::new(7, 11).with_conversions([ConversionType::JavaVersion]);

    let report = TransformationEngine::default().migrate(dir.path(), &plan);
    assert!(report.files_modified >= 1);

    let pom = read(dir.path(), "pom.xml");
    assert!(pom.contains("<maven.compiler.source>11</maven.compiler.source>"));
    assert!(pom.contains("<maven.compiler.target>11</maven.compiler.target>"));
    assert!(!pom.contains(">7<"));
}

#[test]
fn test_second_migration_modifies_nothing() {
    let dir = project(&[
        (APP, SERVLET_APP),
        ("pom.xml", JAVA_7_POM),
        (
            "src/main/java/com/example/Service.java",
            "package com.example;\n\npublic class Service {\n    public String greet(String name) {\n        if (name != null && name.equals(\"admin\")) {\n            System.out.println(\"hi\");\n            return null;\n        }\n        return name.trim().isEmpty() ? \"\" : name;\n    }\n}\n",
        ),
    ]);
    let plan = MigrationPlan::new(7, 21)
        .with_conversions([ConversionType::JavaVersion, ConversionType::JavaxToJakarta])
        .with_business_logic(true);
    let engine = TransformationEngine::default();

    let first = engine.migrate(dir.path(), &plan);
    assert!(first.files_modified > 0);

    let second = engine.migrate(dir.path(), &plan);
    assert_eq!(second.files_modified, 0, "changes: {:?}", second.changes);
    assert_eq!(second.issues_fixed, 0);
}

#[test]
fn test_preview_reports_file_without_writing_it() {
    let dir = project(&[(APP, SERVLET_APP)]);
    let engine = PreviewEngine::new(Arc::new(RuleCatalog::new()), PreviewConfig::default());
    let plan = MigrationPlan::new(8, 17).with_conversions([ConversionType::JavaVersion]);

    let report = engine.preview(dir.path(), &plan);

    assert_eq!(report.files_to_modify, vec![APP.to_string()]);
    assert!(report.files_to_create.is_empty());
    assert!(report.files_to_remove.is_empty());
    assert_eq!(report.issues_to_fix.len(), 2);
    assert_eq!(report.file_diffs.len(), 1);
    assert!(report.file_diffs[0].diff.contains("+import jakarta.servlet.HttpServlet;"));
    assert!(report.file_changes[APP].iter().any(|r| r.rule_id == "jv-wrapper-constructors"));
    assert_eq!(read(dir.path(), APP), SERVLET_APP);
}

#[test]
fn test_binary_and_legacy_files_do_not_abort_a_run() {
    let dir = project(&[(APP, SERVLET_APP)]);
    write(dir.path(), "src/main/java/Blob.java", &[0xCA, 0xFE, 0x00, 0x00, 0xBA, 0xBE]);
    // "Caf\xe9" in Windows-1252
    write(
        dir.path(),
        "src/main/java/Legacy.java",
        b"// Caf\xe9\nclass Legacy { Long l = new Long(1L); }\n",
    );

    let scan = IssueScanner::default().scan(dir.path(), &[ConversionType::JavaVersion], 8, 17);
    assert!(matches!(scan.skipped.as_slice(), [ScanError::Binary { .. }]));
    assert!(scan.issues.iter().any(|i| i.file_path == "src/main/java/Legacy.java"));

    let plan = MigrationPlan::new(8, 17).with_conversions([ConversionType::JavaVersion]);
    let report = TransformationEngine::default().migrate(dir.path(), &plan);
    assert!(matches!(report.skipped.as_slice(), [TransformationError::Binary { .. }]));
    assert_eq!(report.files_modified, 2);
    assert_eq!(
        std::fs::read(dir.path().join("src/main/java/Legacy.java")).unwrap(),
        b"// Caf\xe9\nclass Legacy { Long l = Long.valueOf(1L); }\n"
    );
}

#[rstest]
#[case("Double d = new Double(1.5);", "Double d = Double.valueOf(1.5);")]
#[case("Boolean b = new Boolean (true);", "Boolean b = Boolean.valueOf(true);")]
#[case("Object o = clazz.newInstance();", "Object o = clazz.getDeclaredConstructor().newInstance();")]
fn test_deprecated_api_rewrites_on_any_target(#[case] before: &str, #[case] after: &str) {
    let source = format!("class Legacy {{\n    {}\n}}\n", before);
    let dir = project(&[("src/main/java/Legacy.java", source.as_str())]);
    let plan = MigrationPlan::new(8, 11).with_conversions([ConversionType::JavaVersion]);

    let report = TransformationEngine::default().migrate(dir.path(), &plan);
    assert_eq!(report.files_modified, 1);
    assert!(read(dir.path(), "src/main/java/Legacy.java").contains(after));
}

#[test]
fn test_keeping_javax_on_java_17_settles_after_one_run() {
    let dir = project(&[(APP, SERVLET_APP), ("pom.xml", SERVLET_POM)]);
    let plan = MigrationPlan::new(8, 17)
        .with_conversions([ConversionType::JavaVersion, ConversionType::JakartaToJavax]);
    let engine = TransformationEngine::default();

    let first = engine.migrate(dir.path(), &plan);
    assert_eq!(first.files_modified, 2);
    let app = read(dir.path(), APP);
    assert!(app.contains("import javax.servlet.HttpServlet;"));
    assert!(app.contains("Integer.valueOf(5)"));
    assert!(read(dir.path(), "pom.xml").contains("<artifactId>javax.servlet-api</artifactId>"));

    let second = engine.migrate(dir.path(), &plan);
    assert_eq!(second.files_modified, 0);
    assert_eq!(second.issues_fixed, 0);
}

#[test]
fn test_file_touched_by_two_passes_counts_once() {
    let dir = project(&[(APP, SERVLET_APP)]);
    let plan = MigrationPlan::new(8, 11)
        .with_conversions([ConversionType::JavaVersion, ConversionType::JavaxToJakarta]);

    let report = TransformationEngine::default().migrate(dir.path(), &plan);
    assert_eq!(report.files_modified, 1);
    assert_eq!(report.issues_fixed, 2);
    assert_eq!(report.changes.len(), 2);

    let migrated = read(dir.path(), APP);
    assert!(migrated.contains("import jakarta.servlet.HttpServlet;"));
    assert!(migrated.contains("Integer.valueOf(5)"));
}
