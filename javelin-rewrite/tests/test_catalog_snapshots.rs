//! Snapshot tests for the static catalogs served to clients

use javelin_rewrite::{RuleCatalog, recipe_catalog, recipes_for};
use javelin_rewrite::domain::{Rule, RuleMetadata};

#[test]
fn test_first_recipe_snapshot() {
    insta::assert_json_snapshot!(recipe_catalog()[0], @r###"
    {
      "id": "org.openrewrite.java.migrate.JavaVersion7to8",
      "name": "Java 7 to 8",
      "description": "Migrate Java 7 code to Java 8, including lambda expressions and stream API"
    }
    "###);
}

#[test]
fn test_recipe_path_11_to_17_snapshot() {
    insta::assert_debug_snapshot!(recipes_for(11, 17), @r###"
    [
        "org.openrewrite.java.migrate.UpgradeToJava17",
        "org.openrewrite.java.cleanup.CommonStaticAnalysis",
        "org.openrewrite.java.format.AutoFormat",
    ]
    "###);
}

#[test]
fn test_generation_rules_snapshot() {
    let catalog = RuleCatalog::new();
    let generators: Vec<&str> = catalog
        .rules()
        .iter()
        .filter(|r| matches!(r, Rule::Generate(_)))
        .map(|r| r.id())
        .collect();
    insta::assert_debug_snapshot!(generators, @r###"
    [
        "maven-to-gradle",
        "gradle-to-maven",
    ]
    "###);
}

#[test]
fn test_rule_serializes_with_type_tag() {
    let catalog = RuleCatalog::new();
    let rule = catalog.get("detect-spring-boot-2-pin").expect("manifest rule");
    let json = serde_json::to_value(rule).expect("serialize rule");
    assert_eq!(json["rule_type"], "detect");
    assert_eq!(json["file_kind"], "maven_manifest");
    assert_eq!(json["match_mode"], "every_line");
}
