//! Built-in migration rules
//!
//! Rules are grouped by concern. [`get_default_rules`] concatenates the groups
//! in the order the engines must walk them: detections first, then rewrites in
//! pass order.

mod build_tools;
mod business_logic;
mod detection;
mod frameworks;
mod java_version;
mod manifest;

pub use build_tools::get_build_tool_rules;
pub use business_logic::get_business_logic_rules;
pub use detection::get_detection_rules;
pub use frameworks::get_framework_rules;
pub use java_version::get_java_version_rules;
pub use manifest::get_manifest_rules;

use javelin_core::{ConversionType, Severity};

use crate::domain::{
    DetectionRule, FileKind, MatchMode, Replacement, RewriteFunction, RewriteRule, Rule, Trigger,
};

/// Every built-in rule in catalog order
pub fn get_default_rules() -> Vec<Rule> {
    let mut rules = Vec::new();
    rules.extend(get_detection_rules());
    rules.extend(get_java_version_rules());
    rules.extend(get_manifest_rules());
    rules.extend(get_framework_rules());
    rules.extend(get_build_tool_rules());
    rules.extend(get_business_logic_rules());
    rules
}

// ============================================================================
// Builders shared by the rule groups
// ============================================================================

pub(crate) fn detect(
    id: &str,
    group: ConversionType,
    triggers: Vec<Trigger>,
    pattern: &str,
    severity: Severity,
    category: &str,
    message: &str,
) -> Rule {
    Rule::Detect(DetectionRule {
        id: id.to_string(),
        group,
        triggers,
        pattern: pattern.to_string(),
        file_kind: FileKind::JavaSource,
        match_mode: MatchMode::FirstPerFile,
        severity,
        category: category.to_string(),
        message: message.to_string(),
        suggested_fix: None,
    })
}

pub(crate) fn rewrite(
    id: &str,
    triggers: Vec<Trigger>,
    file_kind: FileKind,
    pattern: &str,
    template: &str,
    description: &str,
) -> Rule {
    Rule::Rewrite(RewriteRule {
        id: id.to_string(),
        triggers,
        pattern: pattern.to_string(),
        file_kind,
        replacement: Replacement::Template {
            template: template.to_string(),
        },
        description: description.to_string(),
        unless_selected: None,
    })
}

pub(crate) fn annotate(
    id: &str,
    triggers: Vec<Trigger>,
    pattern: &str,
    comment: &str,
    skip_if_file_contains: Option<&str>,
    description: &str,
) -> Rule {
    Rule::Rewrite(RewriteRule {
        id: id.to_string(),
        triggers,
        pattern: pattern.to_string(),
        file_kind: FileKind::JavaSource,
        replacement: Replacement::LineAnnotation {
            comment: comment.to_string(),
            skip_if_file_contains: skip_if_file_contains.map(str::to_string),
        },
        description: description.to_string(),
        unless_selected: None,
    })
}

pub(crate) fn function(
    id: &str,
    triggers: Vec<Trigger>,
    file_kind: FileKind,
    prefilter: &str,
    function: RewriteFunction,
    description: &str,
) -> Rule {
    Rule::Rewrite(RewriteRule {
        id: id.to_string(),
        triggers,
        pattern: prefilter.to_string(),
        file_kind,
        replacement: Replacement::Function { function },
        description: description.to_string(),
        unless_selected: None,
    })
}

/// Packages that moved from `javax.*` to `jakarta.*`
pub(crate) const JAKARTA_PACKAGES: &str =
    r"servlet|persistence|validation|annotation|inject|enterprise|ws\.rs|json|mail|transaction";

/// Maven coordinates renamed by the Jakarta move, as (javax group, javax artifact, jakarta group, jakarta artifact)
pub(crate) const JAKARTA_COORDINATES: &[(&str, &str, &str, &str)] = &[
    ("javax.servlet", "javax.servlet-api", "jakarta.servlet", "jakarta.servlet-api"),
    ("javax.persistence", "javax.persistence-api", "jakarta.persistence", "jakarta.persistence-api"),
    ("javax.validation", "validation-api", "jakarta.validation", "jakarta.validation-api"),
    ("javax.annotation", "javax.annotation-api", "jakarta.annotation", "jakarta.annotation-api"),
];

/// pom rewrites renaming javax coordinates to their jakarta counterparts
pub(crate) fn jakarta_coordinate_rules(prefix: &str, triggers: &[Trigger]) -> Vec<Rule> {
    let mut rules = Vec::new();
    for (old_group, old_artifact, new_group, new_artifact) in JAKARTA_COORDINATES {
        rules.push(rewrite(
            &format!("{prefix}-group-{old_group}"),
            triggers.to_vec(),
            FileKind::MavenManifest,
            &format!("<groupId>{}</groupId>", regex::escape(old_group)),
            &format!("<groupId>{new_group}</groupId>"),
            &format!("{old_group} → {new_group}"),
        ));
        rules.push(rewrite(
            &format!("{prefix}-artifact-{old_artifact}"),
            triggers.to_vec(),
            FileKind::MavenManifest,
            &format!("<artifactId>{}</artifactId>", regex::escape(old_artifact)),
            &format!("<artifactId>{new_artifact}</artifactId>"),
            &format!("{old_artifact} → {new_artifact}"),
        ));
    }
    rules
}
