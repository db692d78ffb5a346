//! Manifest and dependency records

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Java version assumed when a manifest declares none.
pub const DEFAULT_JAVA_VERSION: u32 = 8;

/// Version recorded for a dependency whose manifest entry omits it (managed by a parent or BOM).
pub const INHERITED_VERSION: &str = "inherited";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BuildTool {
    Maven,
    Gradle,
}

impl BuildTool {
    /// Manifest file name at the project root
    pub fn manifest_file(&self) -> &'static str {
        match self {
            Self::Maven => "pom.xml",
            Self::Gradle => "build.gradle",
        }
    }
}

impl std::fmt::Display for BuildTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Maven => write!(f, "maven"),
            Self::Gradle => write!(f, "gradle"),
        }
    }
}

/// A dependency exactly as declared in a build file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestDependency {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
    /// Maven scope, or `test` for Gradle test configurations.
    pub scope: Option<String>,
}

impl ManifestDependency {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: None,
            scope: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn coordinate(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }

    /// Declared version, or [`INHERITED_VERSION`] when the manifest leaves it to a parent.
    pub fn version_or_inherited(&self) -> &str {
        self.version.as_deref().unwrap_or(INHERITED_VERSION)
    }

    pub fn is_test(&self) -> bool {
        self.scope.as_deref() == Some("test") || self.artifact_id.to_lowercase().contains("test")
    }
}

/// What a build file says about the project
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedManifest {
    pub dependencies: Vec<ManifestDependency>,
    pub declared_java_version: Option<u32>,
}

impl ParsedManifest {
    pub fn java_version(&self) -> u32 {
        self.declared_java_version.unwrap_or(DEFAULT_JAVA_VERSION)
    }
}

/// Outcome of checking a dependency against the upgrade table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeStatus {
    Upgraded,
    Compatible,
    NeedsManualReview,
}

impl std::fmt::Display for UpgradeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Upgraded => write!(f, "upgraded"),
            Self::Compatible => write!(f, "compatible"),
            Self::NeedsManualReview => write!(f, "needs_manual_review"),
        }
    }
}

/// A declared dependency together with the upgrade decided for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DependencyRecord {
    pub group_id: String,
    pub artifact_id: String,
    pub current_version: String,
    pub new_version: Option<String>,
    pub status: UpgradeStatus,
}
