//! Applying one rewrite rule to file content
//!
//! Every path through this module is idempotent: running a rule over its own
//! output changes nothing and reports zero occurrences.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::regex_cache::get_regex;
use crate::domain::{Replacement, RewriteFunction, RewriteRule};

/// Version pair a rewrite runs under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewriteContext {
    pub source_version: u32,
    pub target_version: u32,
}

impl RewriteContext {
    pub fn new(source_version: u32, target_version: u32) -> Self {
        Self {
            source_version,
            target_version,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    pub content: String,
    pub occurrences: usize,
}

impl Replacement {
    /// Short form recorded in change listings
    pub fn summary(&self) -> String {
        match self {
            Replacement::Template { template } => template.clone(),
            Replacement::LineAnnotation { comment, .. } => format!("// {}", comment),
            Replacement::Function { function } => format!("{:?}", function),
        }
    }
}

/// Runs `rule` over `content`. Returns `None` when nothing changes.
pub fn apply_rule(
    rule: &RewriteRule,
    content: &str,
    ctx: &RewriteContext,
) -> Result<Option<Rewritten>, regex::Error> {
    let pattern = get_regex(&rule.pattern)?;
    if !pattern.is_match(content) {
        return Ok(None);
    }

    let (updated, occurrences) = match &rule.replacement {
        Replacement::Template { template } => {
            let template = template.replace("{target}", &ctx.target_version.to_string());
            replace_counting(&pattern, content, |caps| {
                let mut out = String::new();
                caps.expand(&template, &mut out);
                out
            })
        }
        Replacement::LineAnnotation {
            comment,
            skip_if_file_contains,
        } => {
            let skip = skip_if_file_contains
                .as_deref()
                .is_some_and(|needle| content.to_lowercase().contains(&needle.to_lowercase()));
            if skip {
                return Ok(None);
            }
            annotate_lines(&pattern, comment, content)
        }
        Replacement::Function { function } => run_function(*function, content, ctx)?,
    };

    if occurrences == 0 || updated == content {
        return Ok(None);
    }
    Ok(Some(Rewritten {
        content: updated,
        occurrences,
    }))
}

/// Replaces every match, counting only replacements that differ from the matched text
fn replace_counting<F>(pattern: &Regex, content: &str, mut replace: F) -> (String, usize)
where
    F: FnMut(&Captures<'_>) -> String,
{
    let mut out = String::with_capacity(content.len());
    let mut last = 0;
    let mut count = 0;

    for caps in pattern.captures_iter(content) {
        let Some(m) = caps.get(0) else { continue };
        let replacement = replace(&caps);
        if replacement != m.as_str() {
            count += 1;
        }
        out.push_str(&content[last..m.start()]);
        out.push_str(&replacement);
        last = m.end();
    }
    out.push_str(&content[last..]);
    (out, count)
}

fn split_line_ending(piece: &str) -> (&str, &str) {
    if let Some(line) = piece.strip_suffix("\r\n") {
        (line, "\r\n")
    } else if let Some(line) = piece.strip_suffix('\n') {
        (line, "\n")
    } else {
        (piece, "")
    }
}

fn annotate_lines(pattern: &Regex, comment: &str, content: &str) -> (String, usize) {
    let marker = format!("// {}", comment);
    let mut out = String::with_capacity(content.len());
    let mut count = 0;

    for piece in content.split_inclusive('\n') {
        let (line, ending) = split_line_ending(piece);
        out.push_str(line);
        if pattern.is_match(line) && !line.contains(&marker) {
            out.push_str("  ");
            out.push_str(&marker);
            count += 1;
        }
        out.push_str(ending);
    }
    (out, count)
}

// =============================================================================
// Rewrite functions
// =============================================================================

static RE_NULL_CHECKED_EQUALS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"if\s*\(\s*(\w+)\s*!=\s*null\s*&&\s*(\w+)\.equals\(")
        .expect("null-checked equals pattern is valid")
});

static RE_VARIABLE_EQUALS_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(\w+)\.equals\("([^"]+)"\)"#).expect("literal equals pattern is valid")
});

static RE_PUBLIC_METHOD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^([ \t]*)public\s+(?:(?:static|final|synchronized)\s+)*((?:[\w.]+)(?:<[^(){};]*>)?(?:\[\])*)\s+(\w+)\s*\(([^)]*)\)\s*(?:throws\s+[\w.,\s]+?)?\s*\{",
    )
    .expect("public method pattern is valid")
});

static RE_OBJECTS_USAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bObjects\.").expect("Objects usage pattern is valid"));

static RE_PARENT_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<parent>.*?</parent>").expect("parent block pattern is valid"));

static RE_SPRING_BOOT_2_VERSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<version>2\.[^<]*</version>").expect("spring boot version pattern is valid")
});

static RE_COMPILER_SOURCE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^([ \t]*)<maven\.compiler\.source>[^<]*</maven\.compiler\.source>[^\n]*$")
        .expect("compiler source pattern is valid")
});

static RE_JAVA_VERSION_DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<maven\.compiler\.(?:source|target|release)>|<java\.version>|<source>|<release>")
        .expect("java version declaration pattern is valid")
});

const PRIMITIVES: &[&str] = &[
    "int", "long", "double", "float", "boolean", "char", "byte", "short",
];

const NON_METHOD_KEYWORDS: &[&str] = &["class", "interface", "enum", "record", "new", "return"];

const OBJECTS_IMPORT: &str = "import java.util.Objects;";

fn run_function(
    function: RewriteFunction,
    content: &str,
    ctx: &RewriteContext,
) -> Result<(String, usize), regex::Error> {
    Ok(match function {
        RewriteFunction::NullSafeEquals => null_safe_equals(content),
        RewriteFunction::LiteralFirstEquals => literal_first_equals(content),
        RewriteFunction::NullGuardParameters => null_guard_parameters(content)?,
        RewriteFunction::EnsureObjectsImport => ensure_objects_import(content),
        RewriteFunction::SpringBootParentVersion => spring_boot_parent_version(content),
        RewriteFunction::JavaVersionProperties => java_version_properties(content, ctx.target_version),
    })
}

fn null_safe_equals(content: &str) -> (String, usize) {
    replace_counting(&RE_NULL_CHECKED_EQUALS, content, |caps| {
        if caps[1] == caps[2] {
            format!("if (Objects.equals({}, ", &caps[1])
        } else {
            caps[0].to_string()
        }
    })
}

fn literal_first_equals(content: &str) -> (String, usize) {
    replace_counting(&RE_VARIABLE_EQUALS_LITERAL, content, |caps| {
        let Some(whole) = caps.get(0) else {
            return String::new();
        };
        // Receivers that are member accesses, calls or indexing stay as written
        let preceding = content[..whole.start()].chars().next_back();
        if matches!(preceding, Some('.' | ')' | ']' | '"')) {
            return whole.as_str().to_string();
        }
        format!("\"{}\".equals({})", &caps[2], &caps[1])
    })
}

/// Splits a parameter list at top-level commas
fn split_parameters(params: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in params.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(params[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(params[start..].trim());
    parts.into_iter().filter(|p| !p.is_empty()).collect()
}

/// Name of a parameter that needs a null guard, if any
fn guarded_parameter(param: &str) -> Option<String> {
    let tokens: Vec<&str> = param
        .split_whitespace()
        .filter(|t| !t.starts_with('@'))
        .collect();
    if tokens.first() == Some(&"final") || tokens.len() < 2 {
        return None;
    }
    let ty = tokens[tokens.len() - 2];
    let name = tokens[tokens.len() - 1].trim_end_matches("[]");
    if PRIMITIVES.contains(&ty) || name.is_empty() {
        return None;
    }
    Some(name.to_string())
}

fn null_guard_parameters(content: &str) -> Result<(String, usize), regex::Error> {
    let headers: Vec<Captures<'_>> = RE_PUBLIC_METHOD.captures_iter(content).collect();
    let mut insertions: Vec<(usize, String)> = Vec::new();
    let mut count = 0;

    for (index, caps) in headers.iter().enumerate() {
        let (Some(whole), Some(return_type)) = (caps.get(0), caps.get(2)) else {
            continue;
        };
        if NON_METHOD_KEYWORDS.contains(&return_type.as_str()) {
            continue;
        }
        let body_end = headers
            .get(index + 1)
            .and_then(|next| next.get(0))
            .map(|m| m.start())
            .unwrap_or(content.len());
        let body = &content[whole.end()..body_end];
        let indent = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        let params = caps.get(4).map(|m| m.as_str()).unwrap_or_default();

        let mut guards = String::new();
        for name in split_parameters(params).into_iter().filter_map(guarded_parameter) {
            let existing = Regex::new(&format!(
                r"Objects\.requireNonNull\(\s*{name}\b|if\s*\(\s*{name}\s*==\s*null\s*\)"
            ))?;
            if existing.is_match(body) {
                continue;
            }
            guards.push_str(&format!(
                "\n{indent}    Objects.requireNonNull({name}, \"{name} cannot be null\");"
            ));
            count += 1;
        }
        if !guards.is_empty() {
            insertions.push((whole.end(), guards));
        }
    }

    let mut out = content.to_string();
    for (position, text) in insertions.into_iter().rev() {
        out.insert_str(position, &text);
    }
    Ok((out, count))
}

fn ensure_objects_import(content: &str) -> (String, usize) {
    if !RE_OBJECTS_USAGE.is_match(content)
        || content.contains(OBJECTS_IMPORT)
        || content.contains("import java.util.*;")
    {
        return (content.to_string(), 0);
    }

    // After the last import, else after the package declaration, else at the top
    let mut insert_at = None;
    let mut offset = 0;
    for piece in content.split_inclusive('\n') {
        let trimmed = piece.trim_start();
        if trimmed.starts_with("import ") || (insert_at.is_none() && trimmed.starts_with("package ")) {
            insert_at = Some(offset + piece.len());
        }
        offset += piece.len();
    }

    let mut out = content.to_string();
    match insert_at {
        Some(position) if position <= content.len() && content[..position].ends_with('\n') => {
            out.insert_str(position, &format!("{}\n", OBJECTS_IMPORT));
        }
        Some(position) => out.insert_str(position, &format!("\n{}\n", OBJECTS_IMPORT)),
        None => out.insert_str(0, &format!("{}\n\n", OBJECTS_IMPORT)),
    }
    (out, 1)
}

fn spring_boot_parent_version(content: &str) -> (String, usize) {
    replace_counting(&RE_PARENT_BLOCK, content, |caps| {
        let block = &caps[0];
        if block.contains("spring-boot") {
            RE_SPRING_BOOT_2_VERSION
                .replace(block, "<version>3.2.0</version>")
                .into_owned()
        } else {
            block.to_string()
        }
    })
}

fn java_version_properties(content: &str, target: u32) -> (String, usize) {
    if RE_JAVA_VERSION_DECLARATION.is_match(content) {
        return pair_compiler_target(content, target);
    }

    let entries = [
        format!("<java.version>{target}</java.version>"),
        format!("<maven.compiler.source>{target}</maven.compiler.source>"),
        format!("<maven.compiler.target>{target}</maven.compiler.target>"),
        "<project.build.sourceEncoding>UTF-8</project.build.sourceEncoding>".to_string(),
    ];

    let mut out = content.to_string();
    if let Some(pos) = content.find("<properties>") {
        let inner: String = entries.iter().map(|e| format!("\n        {e}")).collect();
        out.insert_str(pos + "<properties>".len(), &inner);
        return (out, 1);
    }

    let body: String = entries.iter().map(|e| format!("        {e}\n")).collect();
    let block = format!("\n\n    <properties>\n{body}    </properties>");
    if let Some(pos) = content.find("</modelVersion>") {
        out.insert_str(pos + "</modelVersion>".len(), &block);
        (out, 1)
    } else if let Some(pos) = content.rfind("</project>") {
        out.insert_str(pos, &format!("{}\n", block.trim_start_matches('\n')));
        (out, 1)
    } else {
        (out, 0)
    }
}

/// A lone `maven.compiler.source` gets a matching `maven.compiler.target`
fn pair_compiler_target(content: &str, target: u32) -> (String, usize) {
    if content.contains("<maven.compiler.target>") {
        return (content.to_string(), 0);
    }
    let Some(caps) = RE_COMPILER_SOURCE_LINE.captures(content) else {
        return (content.to_string(), 0);
    };
    let (Some(line), Some(indent)) = (caps.get(0), caps.get(1)) else {
        return (content.to_string(), 0);
    };
    let mut out = content.to_string();
    out.insert_str(
        line.end(),
        &format!(
            "\n{}<maven.compiler.target>{target}</maven.compiler.target>",
            indent.as_str()
        ),
    );
    (out, 1)
}
