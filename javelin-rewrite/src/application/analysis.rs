//! Project analysis: build tool, declared Java version, dependencies, endpoints

use javelin_deps::{
    BuildTool, DEFAULT_JAVA_VERSION, DependencyRecord, DependencyResolver, ManifestDependency,
    ParsedManifest, ParserFactory,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, instrument, warn};
use utoipa::ToSchema;
use walkdir::WalkDir;

use crate::domain::ApiEndpoint;
use crate::infrastructure::encoding::read_source_file;

static ENDPOINT_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r#"@GetMapping\s*\(\s*["']([^"']+)["']\s*\)"#, "GET"),
        (r#"@PostMapping\s*\(\s*["']([^"']+)["']\s*\)"#, "POST"),
        (r#"@PutMapping\s*\(\s*["']([^"']+)["']\s*\)"#, "PUT"),
        (r#"@DeleteMapping\s*\(\s*["']([^"']+)["']\s*\)"#, "DELETE"),
        (r#"@RequestMapping\s*\([^)]*value\s*=\s*["']([^"']+)["']"#, "REQUEST"),
    ]
    .into_iter()
    .map(|(pattern, method)| {
        (
            Regex::new(pattern).expect("endpoint pattern is valid"),
            method,
        )
    })
    .collect()
});

/// What analysis learned about a project
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct ProjectAnalysis {
    pub build_tool: Option<BuildTool>,
    pub java_version: u32,
    pub dependencies: Vec<DependencyRecord>,
    pub source_files: usize,
    pub test_files: usize,
    pub api_endpoints: Vec<ApiEndpoint>,
}

impl ProjectAnalysis {
    pub fn has_tests(&self) -> bool {
        self.test_files > 0
    }
}

/// Reads manifests and source trees without changing anything
#[derive(Default)]
pub struct ProjectAnalyzer {
    parsers: ParserFactory,
    resolver: DependencyResolver,
}

impl ProjectAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build tool in use, Maven winning when both manifests exist
    pub fn detect_build_tool(&self, root: &Path) -> Option<BuildTool> {
        if root.join("pom.xml").is_file() {
            Some(BuildTool::Maven)
        } else if root.join("build.gradle").is_file() || root.join("build.gradle.kts").is_file() {
            Some(BuildTool::Gradle)
        } else {
            None
        }
    }

    /// Dependencies as declared by the root manifest. Unreadable or malformed
    /// manifests yield an empty manifest.
    pub fn read_manifest(&self, root: &Path) -> ParsedManifest {
        let Some(tool) = self.detect_build_tool(root) else {
            return ParsedManifest::default();
        };
        let file = match tool {
            BuildTool::Gradle if !root.join("build.gradle").is_file() => "build.gradle.kts",
            other => other.manifest_file(),
        };
        let Some(parser) = self.parsers.parser_for(file) else {
            return ParsedManifest::default();
        };

        let content = match read_source_file(&root.join(file)) {
            Ok(content) => content,
            Err(e) => {
                warn!(file, error = ?e, "Could not read build manifest");
                return ParsedManifest::default();
            }
        };
        parser.parse(&content).unwrap_or_else(|e| {
            warn!(file, error = %e, "Could not parse build manifest");
            ParsedManifest::default()
        })
    }

    pub fn manifest_dependencies(&self, root: &Path) -> Vec<ManifestDependency> {
        self.read_manifest(root).dependencies
    }

    #[instrument(skip(self), fields(root = %root.display()))]
    pub fn analyze(&self, root: &Path) -> ProjectAnalysis {
        let manifest = self.read_manifest(root);
        let main_dir = root.join("src/main/java");
        let test_dir = root.join("src/test/java");

        let analysis = ProjectAnalysis {
            build_tool: self.detect_build_tool(root),
            java_version: manifest.declared_java_version.unwrap_or(DEFAULT_JAVA_VERSION),
            dependencies: self.resolver.resolve_all(&manifest.dependencies),
            source_files: count_java_files(&main_dir),
            test_files: count_java_files(&test_dir),
            api_endpoints: detect_endpoints(&main_dir),
        };

        debug!(
            build_tool = ?analysis.build_tool,
            java_version = analysis.java_version,
            dependencies = analysis.dependencies.len(),
            source_files = analysis.source_files,
            test_files = analysis.test_files,
            endpoints = analysis.api_endpoints.len(),
            "Project analysis completed"
        );
        analysis
    }
}

fn java_files(dir: &Path) -> impl Iterator<Item = walkdir::DirEntry> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("java"))
}

fn count_java_files(dir: &Path) -> usize {
    if !dir.is_dir() {
        return 0;
    }
    java_files(dir).count()
}

/// Spring request mappings declared under `dir`
pub fn detect_endpoints(dir: &Path) -> Vec<ApiEndpoint> {
    if !dir.is_dir() {
        return Vec::new();
    }
    let mut endpoints = Vec::new();
    for entry in java_files(dir) {
        let Ok(content) = read_source_file(entry.path()) else {
            continue;
        };
        let file = entry.file_name().to_string_lossy().into_owned();
        for (pattern, method) in ENDPOINT_PATTERNS.iter() {
            for caps in pattern.captures_iter(&content) {
                endpoints.push(ApiEndpoint {
                    method: (*method).to_string(),
                    path: caps[1].to_string(),
                    file: file.clone(),
                });
            }
        }
    }
    endpoints
}
