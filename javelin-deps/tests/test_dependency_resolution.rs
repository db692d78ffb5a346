//! Integration tests for dependency upgrade resolution

use javelin_deps::{
    DependencyResolver, ManifestDependency, ManifestParser, MavenParser, UpgradeStatus,
};
use rstest::rstest;

#[rstest]
#[case("org.springframework.boot", "spring-boot-starter", Some("3.2.0"), UpgradeStatus::Upgraded)]
#[case("org.springframework", "spring-core", Some("6.1.0"), UpgradeStatus::Upgraded)]
#[case("junit", "junit", Some("4.13.2"), UpgradeStatus::Upgraded)]
#[case("org.junit.jupiter", "junit-jupiter", Some("5.10.0"), UpgradeStatus::Upgraded)]
#[case(
    "javax.persistence",
    "javax.persistence-api",
    Some("jakarta.persistence:jakarta.persistence-api:3.1.0"),
    UpgradeStatus::NeedsManualReview
)]
#[case("log4j", "log4j", Some("org.apache.logging.log4j:log4j-core:2.22.0"), UpgradeStatus::Upgraded)]
#[case(
    "commons-lang",
    "commons-lang",
    Some("org.apache.commons:commons-lang3:3.14.0"),
    UpgradeStatus::Upgraded
)]
#[case("com.acme", "widget", None, UpgradeStatus::Compatible)]
fn test_upgrade_table(
    #[case] group: &str,
    #[case] artifact: &str,
    #[case] new_version: Option<&str>,
    #[case] status: UpgradeStatus,
) {
    let resolution = DependencyResolver::new().resolve(group, artifact, "1.0");
    assert_eq!(resolution.new_version.as_deref(), new_version);
    assert_eq!(resolution.status, status);
}

#[test]
fn test_resolve_parsed_pom() {
    let pom = r#"<project>
  <dependencies>
    <dependency>
      <groupId>junit</groupId>
      <artifactId>junit</artifactId>
      <version>4.12</version>
    </dependency>
    <dependency>
      <groupId>com.acme</groupId>
      <artifactId>widget</artifactId>
      <version>1.0</version>
    </dependency>
  </dependencies>
</project>"#;

    let manifest = MavenParser::new().parse(pom).expect("pom parses");
    let records = DependencyResolver::new().resolve_all(&manifest.dependencies);

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].current_version, "4.12");
    assert_eq!(records[0].new_version.as_deref(), Some("4.13.2"));
    assert_eq!(records[0].status, UpgradeStatus::Upgraded);
    assert_eq!(records[1].current_version, "1.0");
    assert_eq!(records[1].new_version, None);
    assert_eq!(records[1].status, UpgradeStatus::Compatible);
}

#[test]
fn test_status_serializes_snake_case() {
    let record = DependencyResolver::new()
        .resolve_dependency(&ManifestDependency::new("javax.servlet", "javax.servlet-api"));
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["status"], "needs_manual_review");
    assert_eq!(json["current_version"], "inherited");
}
