//! Source rewrites for the `java_version` pass
//!
//! Order matters: deprecated APIs first, then the version-gated groups from
//! oldest to newest, then the common clean-ups.

use javelin_core::ConversionType;

use super::{JAKARTA_PACKAGES, annotate, function, rewrite};
use crate::domain::{FileKind, RewriteFunction, Rule, Trigger, VersionPredicate};

fn at(versions: VersionPredicate) -> Vec<Trigger> {
    vec![Trigger::java_version(versions)]
}

fn java(id: &str, versions: VersionPredicate, pattern: &str, template: &str, description: &str) -> Rule {
    rewrite(id, at(versions), FileKind::JavaSource, pattern, template, description)
}

pub fn get_java_version_rules() -> Vec<Rule> {
    use VersionPredicate::{Always, Crossing, TargetAtLeast};

    vec![
        // Deprecated APIs
        java(
            "jv-wrapper-constructors",
            Always,
            r"new (Integer|Long|Double|Float|Boolean|Byte|Short|Character)\s*\(",
            "$1.valueOf(",
            "Replace deprecated wrapper constructors with valueOf()",
        ),
        java(
            "jv-class-new-instance",
            Always,
            r"(\w+)\.newInstance\(\)",
            "${1}.getDeclaredConstructor().newInstance()",
            "Replace Class.newInstance() with getDeclaredConstructor().newInstance()",
        ),
        java(
            "jv-date-millis",
            Always,
            r"new Date\(\)\.getTime\(\)",
            "System.currentTimeMillis()",
            "Use System.currentTimeMillis()",
        ),
        // Java 8
        java(
            "jv8-list-sort",
            Crossing(8),
            r"Collections\.sort\((\w+)\s*,\s*",
            "$1.sort(",
            "Use List.sort()",
        ),
        // Java 9
        java(
            "jv9-list-of",
            TargetAtLeast(9),
            r"Collections\.unmodifiableList\(Arrays\.asList\(([^)]+)\)\)",
            "List.of($1)",
            "Use List.of()",
        ),
        java(
            "jv9-set-of",
            TargetAtLeast(9),
            r"Collections\.unmodifiableSet\(new HashSet<>\(Arrays\.asList\(([^)]+)\)\)\)",
            "Set.of($1)",
            "Use Set.of()",
        ),
        // Java 11
        java(
            "jv11-is-blank",
            TargetAtLeast(11),
            r"\.trim\(\)\.isEmpty\(\)",
            ".isBlank()",
            "Use String.isBlank()",
        ),
        java(
            "jv11-empty-literal-is-blank",
            TargetAtLeast(11),
            r#"""\s*\.equals\((\w+)\.trim\(\)\)"#,
            "$1.isBlank()",
            "Use String.isBlank()",
        ),
        java(
            "jv11-read-string",
            TargetAtLeast(11),
            r"new String\(Files\.readAllBytes\(([^)]+)\)\)",
            "Files.readString($1)",
            "Use Files.readString()",
        ),
        // Java 17
        java(
            "jv17-jakarta-imports",
            TargetAtLeast(17),
            &format!(r"(import\s+(?:static\s+)?)javax\.({JAKARTA_PACKAGES})\."),
            "${1}jakarta.$2.",
            "javax.* → jakarta.* imports",
        )
        .unless_selected(ConversionType::JakartaToJavax),
        // Java 21
        annotate(
            "jv21-virtual-threads",
            at(TargetAtLeast(21)),
            r"new Thread\(",
            "TODO: Consider using virtual threads (Thread.ofVirtual())",
            None,
            "Consider using Virtual Threads (Thread.ofVirtual())",
        ),
        // Common
        function(
            "jv-null-safe-equals",
            at(Always),
            FileKind::JavaSource,
            r"if\s*\(\s*\w+\s*!=\s*null\s*&&\s*\w+\.equals\(",
            RewriteFunction::NullSafeEquals,
            "Use Objects.equals()",
        ),
        function(
            "jv-objects-import",
            at(Always),
            FileKind::JavaSource,
            r"\bObjects\.",
            RewriteFunction::EnsureObjectsImport,
            "Import java.util.Objects",
        ),
    ]
}
