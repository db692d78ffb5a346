//! Gradle build script parser

use javelin_core::parse_java_version;
use once_cell::sync::Lazy;
use regex::Regex;

use super::traits::{ManifestParser, ParseError};
use crate::domain::{BuildTool, ManifestDependency, ParsedManifest};

const CONFIGURATIONS: &str = "implementation|api|compileOnly|runtimeOnly|testImplementation|testCompileOnly|testRuntimeOnly|compile|testCompile";

// implementation 'group:artifact:version' or implementation("group:artifact")
static RE_GRADLE_COORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r#"\b({})\s*\(?\s*['"]([^:'"\s]+):([^:'"\s]+)(?::([^'"\s]+))?['"]"#,
        CONFIGURATIONS
    ))
    .expect("gradle coordinate pattern is valid")
});

// implementation group: 'group', name: 'artifact', version: 'version'
static RE_GRADLE_NAMED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r#"\b({})\s*\(?\s*group:\s*['"]([^'"]+)['"],\s*name:\s*['"]([^'"]+)['"](?:,\s*version:\s*['"]([^'"]+)['"])?"#,
        CONFIGURATIONS
    ))
    .expect("gradle named dependency pattern is valid")
});

// sourceCompatibility = '17', JavaVersion.VERSION_1_8, JavaLanguageVersion.of(21)
static RE_SOURCE_COMPAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"sourceCompatibility\s*=\s*(?:JavaVersion\.VERSION_)?['"]?([0-9][0-9._]*)"#)
        .expect("sourceCompatibility pattern is valid")
});
static RE_TOOLCHAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"JavaLanguageVersion\.of\(\s*(\d+)\s*\)").expect("toolchain pattern is valid")
});

/// Parser for Gradle build files
pub struct GradleParser;

impl Default for GradleParser {
    fn default() -> Self {
        Self::new()
    }
}

impl GradleParser {
    pub fn new() -> Self {
        Self
    }

    fn extract_dependencies(&self, content: &str) -> Vec<ManifestDependency> {
        let mut dependencies = Vec::new();

        for pattern in [&*RE_GRADLE_COORD, &*RE_GRADLE_NAMED] {
            for captures in pattern.captures_iter(content) {
                let configuration = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
                let group_id = captures.get(2).map(|m| m.as_str().trim()).unwrap_or_default();
                let artifact_id = captures.get(3).map(|m| m.as_str().trim()).unwrap_or_default();

                if group_id.is_empty() || artifact_id.is_empty() {
                    continue;
                }

                let mut dep = ManifestDependency::new(group_id, artifact_id);
                if let Some(version) = captures.get(4) {
                    dep = dep.with_version(version.as_str().trim());
                }
                if configuration.starts_with("test") {
                    dep = dep.with_scope("test");
                }
                dependencies.push(dep);
            }
        }

        dependencies
    }

    fn extract_java_version(&self, content: &str) -> Option<u32> {
        if let Some(raw) = RE_SOURCE_COMPAT.captures(content).and_then(|c| c.get(1)) {
            // VERSION_1_8 spells the dot as an underscore
            let normalized = raw.as_str().replace('_', ".");
            if let Ok(version) = parse_java_version(&normalized) {
                return Some(version);
            }
        }
        RE_TOOLCHAIN
            .captures(content)
            .and_then(|c| c.get(1))
            .and_then(|m| parse_java_version(m.as_str()).ok())
    }
}

impl ManifestParser for GradleParser {
    fn supports_file(&self, filename: &str) -> bool {
        filename == "build.gradle" || filename == "build.gradle.kts"
    }

    fn parse(&self, content: &str) -> Result<ParsedManifest, ParseError> {
        Ok(ParsedManifest {
            dependencies: self.extract_dependencies(content),
            declared_java_version: self.extract_java_version(content),
        })
    }

    fn build_tool(&self) -> BuildTool {
        BuildTool::Gradle
    }

    fn priority(&self) -> u8 {
        8
    }
}
