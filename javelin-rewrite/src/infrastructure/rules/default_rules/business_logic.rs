//! Heuristic code-quality pass
//!
//! Only the two null-safety rewrites change code. The rest leave a `TODO`
//! comment on the line for a human to pick up.

use super::{annotate, function};
use crate::domain::{FileKind, RewriteFunction, Rule, Trigger};

pub fn get_business_logic_rules() -> Vec<Rule> {
    let bl = || vec![Trigger::business_logic()];

    vec![
        function(
            "bl-literal-first-equals",
            bl(),
            FileKind::JavaSource,
            r#"\w\.equals\(""#,
            RewriteFunction::LiteralFirstEquals,
            "Compare string literals with \"literal\".equals(value)",
        ),
        function(
            "bl-null-guards",
            bl(),
            FileKind::JavaSource,
            r"public\s",
            RewriteFunction::NullGuardParameters,
            "Guard reference parameters with Objects.requireNonNull",
        ),
        annotate(
            "bl-logging-framework",
            bl(),
            r"System\.out\.println",
            "TODO: Consider using a logging framework like SLF4J",
            Some("logger"),
            "Suggest a logging framework",
        ),
        annotate(
            "bl-optional-return",
            bl(),
            r"return null;",
            "TODO: Consider returning Optional.empty() instead",
            Some("optional"),
            "Suggest Optional for nullable returns",
        ),
        annotate(
            "bl-specific-runtime-exception",
            bl(),
            r"throw new RuntimeException\(",
            "TODO: Use more specific exception types",
            None,
            "Suggest specific exception types",
        ),
        annotate(
            "bl-specific-catch",
            bl(),
            r"catch\s*\(\s*Exception\s+\w+\s*\)",
            "TODO: Consider using more specific exception types",
            Some("throw new"),
            "Suggest specific catch clauses",
        ),
        annotate(
            "bl-try-with-resources",
            bl(),
            r"\b(FileInputStream|FileOutputStream|BufferedReader|BufferedWriter)\s+\w+\s*=",
            "TODO: Consider using try-with-resources",
            Some("try ("),
            "Suggest try-with-resources",
        ),
        function(
            "bl-objects-import",
            bl(),
            FileKind::JavaSource,
            r"\bObjects\.",
            RewriteFunction::EnsureObjectsImport,
            "Import java.util.Objects",
        ),
    ]
}
