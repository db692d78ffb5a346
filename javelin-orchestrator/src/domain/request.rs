//! Job creation requests and their validation

use javelin_core::domain::{
    MAX_SUPPORTED_VERSION, MIN_SUPPORTED_VERSION, UnknownConversionType, VersionParseError,
};
use javelin_core::{ConversionType, parse_java_version};
use javelin_rewrite::MigrationPlan;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use utoipa::ToSchema;

use super::value_objects::GitPlatform;

static REPOSITORY_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._-]{1,100}$").expect("repository name pattern is valid"));

/// Body of `POST /api/migration/start` and `POST /api/migration/preview`
#[derive(Clone, Deserialize, ToSchema)]
pub struct MigrationRequest {
    /// HTTPS clone URL of the source repository
    #[schema(example = "https://github.com/acme/legacy-service")]
    pub source_repo_url: String,

    /// Name of the repository to create. Derived from the source when omitted.
    #[serde(default)]
    pub target_repo_name: Option<String>,

    #[serde(default)]
    pub platform: GitPlatform,

    #[serde(default = "default_source_version")]
    #[schema(example = "8")]
    pub source_java_version: String,

    #[serde(default = "default_target_version")]
    #[schema(example = "17")]
    pub target_java_version: String,

    /// Personal access token for the selected platform
    #[serde(default)]
    pub token: String,

    #[serde(default = "default_conversions")]
    #[schema(example = json!(["java_version"]))]
    pub conversion_types: Vec<String>,

    /// Address that receives the migration summary
    #[serde(default)]
    pub email: Option<String>,

    #[serde(default = "enabled")]
    pub run_tests: bool,

    #[serde(default = "enabled")]
    pub run_sonar: bool,

    #[serde(default = "enabled")]
    pub fix_business_logic: bool,
}

fn default_source_version() -> String {
    "7".to_string()
}

fn default_target_version() -> String {
    "17".to_string()
}

fn default_conversions() -> Vec<String> {
    vec![ConversionType::JavaVersion.as_str().to_string()]
}

fn enabled() -> bool {
    true
}

impl std::fmt::Debug for MigrationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MigrationRequest")
            .field("source_repo_url", &self.source_repo_url)
            .field("target_repo_name", &self.target_repo_name)
            .field("platform", &self.platform)
            .field("source_java_version", &self.source_java_version)
            .field("target_java_version", &self.target_java_version)
            .field("token", &"<redacted>")
            .field("conversion_types", &self.conversion_types)
            .field("email", &self.email)
            .field("run_tests", &self.run_tests)
            .field("run_sonar", &self.run_sonar)
            .field("fix_business_logic", &self.fix_business_logic)
            .finish()
    }
}

/// Reasons a request is rejected before any job exists
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("source_repo_url is required")]
    MissingRepositoryUrl,

    #[error("Unsupported repository URL '{0}'. Only https:// URLs with an owner and repository are accepted.")]
    UnsupportedRepositoryUrl(String),

    #[error("Invalid {field}: {source}")]
    InvalidVersion {
        field: &'static str,
        #[source]
        source: VersionParseError,
    },

    #[error(
        "{field} {version} is outside the supported range {}-{}",
        MIN_SUPPORTED_VERSION,
        MAX_SUPPORTED_VERSION
    )]
    UnsupportedVersion { field: &'static str, version: u32 },

    #[error("Target Java version {target} is older than source version {source_version}")]
    Downgrade { source_version: u32, target: u32 },

    #[error("At least one conversion type is required")]
    NoConversions,

    #[error(transparent)]
    UnknownConversion(#[from] UnknownConversionType),

    #[error("Conversion types {0} and {1} cannot be combined")]
    ConflictingConversions(ConversionType, ConversionType),

    #[error("Invalid email address '{0}'")]
    InvalidEmail(String),

    #[error("Invalid target repository name '{0}'")]
    InvalidRepositoryName(String),
}

/// A request that passed validation, with versions and conversions parsed
#[derive(Clone)]
pub struct JobSpec {
    pub source_repo_url: String,
    /// Last path segment of the source URL, without `.git`
    pub source_repo_name: String,
    pub target_repo_name: Option<String>,
    pub platform: GitPlatform,
    pub source_version: u32,
    pub target_version: u32,
    pub conversions: Vec<ConversionType>,
    pub token: String,
    pub email: Option<String>,
    pub run_tests: bool,
    pub run_sonar: bool,
    pub fix_business_logic: bool,
}

impl std::fmt::Debug for JobSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobSpec")
            .field("source_repo_url", &self.source_repo_url)
            .field("platform", &self.platform)
            .field("source_version", &self.source_version)
            .field("target_version", &self.target_version)
            .field("conversions", &self.conversions)
            .finish_non_exhaustive()
    }
}

impl JobSpec {
    pub fn plan(&self) -> MigrationPlan {
        MigrationPlan::new(self.source_version, self.target_version)
            .with_conversions(self.conversions.iter().copied())
            .with_business_logic(self.fix_business_logic)
    }

    /// `migration_<target>_<source repo>` unless the request named one
    pub fn target_repository_name(&self) -> String {
        self.target_repo_name
            .clone()
            .unwrap_or_else(|| format!("migration_{}_{}", self.target_version, self.source_repo_name))
    }
}

/// Repository name from an HTTPS clone URL: `https://host/owner/name(.git)`
pub fn repository_name(url: &str) -> Option<String> {
    let rest = url.trim().strip_prefix("https://")?;
    let mut segments = rest.trim_end_matches('/').split('/');
    let host = segments.next()?;
    let path: Vec<&str> = segments.filter(|s| !s.is_empty()).collect();
    if host.is_empty() || path.len() < 2 {
        return None;
    }
    let name = path.last()?.trim_end_matches(".git");
    (!name.is_empty()).then(|| name.to_string())
}

fn parse_version(field: &'static str, raw: &str) -> Result<u32, ValidationError> {
    let version =
        parse_java_version(raw).map_err(|source| ValidationError::InvalidVersion { field, source })?;
    if !(MIN_SUPPORTED_VERSION..=MAX_SUPPORTED_VERSION).contains(&version) {
        return Err(ValidationError::UnsupportedVersion { field, version });
    }
    Ok(version)
}

impl MigrationRequest {
    /// Checks the request shape. Duplicate conversion types are dropped,
    /// keeping the first occurrence.
    pub fn validate(&self) -> Result<JobSpec, ValidationError> {
        let url = self.source_repo_url.trim();
        if url.is_empty() {
            return Err(ValidationError::MissingRepositoryUrl);
        }
        let source_repo_name = repository_name(url)
            .ok_or_else(|| ValidationError::UnsupportedRepositoryUrl(url.to_string()))?;

        let source_version = parse_version("source_java_version", &self.source_java_version)?;
        let target_version = parse_version("target_java_version", &self.target_java_version)?;
        if target_version < source_version {
            return Err(ValidationError::Downgrade {
                source_version,
                target: target_version,
            });
        }

        let mut conversions: Vec<ConversionType> = Vec::new();
        for raw in &self.conversion_types {
            let conversion: ConversionType = raw.parse()?;
            if let Some(other) = conversion.conflicts_with()
                && conversions.contains(&other)
            {
                return Err(ValidationError::ConflictingConversions(other, conversion));
            }
            if !conversions.contains(&conversion) {
                conversions.push(conversion);
            }
        }
        if conversions.is_empty() {
            return Err(ValidationError::NoConversions);
        }

        let email = match self.email.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(address) if is_plausible_email(address) => Some(address.to_string()),
            Some(address) => return Err(ValidationError::InvalidEmail(address.to_string())),
        };

        let target_repo_name = match self.target_repo_name.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(name) if REPOSITORY_NAME.is_match(name) => Some(name.to_string()),
            Some(name) => return Err(ValidationError::InvalidRepositoryName(name.to_string())),
        };

        Ok(JobSpec {
            source_repo_url: url.to_string(),
            source_repo_name,
            target_repo_name,
            platform: self.platform,
            source_version,
            target_version,
            conversions,
            token: self.token.trim().to_string(),
            email,
            run_tests: self.run_tests,
            run_sonar: self.run_sonar,
            fix_business_logic: self.fix_business_logic,
        })
    }
}

fn is_plausible_email(address: &str) -> bool {
    match address.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !address.contains(char::is_whitespace)
        }
        None => false,
    }
}
