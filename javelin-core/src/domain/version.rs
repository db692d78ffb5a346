//! Java version parsing
//!
//! Build files and requests spell versions several ways (`1.8`, `8`, `17.0.2`,
//! `21-ea`). Everything downstream compares plain feature-release integers.

use serde::Serialize;
use utoipa::ToSchema;

pub const MIN_SUPPORTED_VERSION: u32 = 7;
pub const MAX_SUPPORTED_VERSION: u32 = 23;

const LTS_VERSIONS: [u32; 4] = [8, 11, 17, 21];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionParseError {
    #[error("Java version is empty")]
    Empty,

    #[error("Invalid Java version '{0}'")]
    Invalid(String),
}

/// Normalize a Java version string to its feature release number.
///
/// The legacy `1.x` scheme maps to `x`. Trailing qualifiers after the leading
/// number are ignored.
pub fn parse_java_version(raw: &str) -> Result<u32, VersionParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(VersionParseError::Empty);
    }

    let mut parts = trimmed.split('.');
    let major = leading_number(parts.next().unwrap_or_default())
        .ok_or_else(|| VersionParseError::Invalid(trimmed.to_string()))?;

    if major == 1 {
        // 1.8, 1.7.0_80
        if let Some(minor) = parts.next().and_then(leading_number) {
            return Ok(minor);
        }
    }

    Ok(major)
}

fn leading_number(segment: &str) -> Option<u32> {
    let digits: String = segment.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

pub fn is_lts(version: u32) -> bool {
    LTS_VERSIONS.contains(&version)
}

/// Entry of the selectable version list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct JavaVersionOption {
    pub value: String,
    pub label: String,
}

/// Versions a migration can start from or target, oldest first.
pub fn java_version_catalog() -> Vec<JavaVersionOption> {
    (MIN_SUPPORTED_VERSION..=MAX_SUPPORTED_VERSION)
        .map(|v| JavaVersionOption {
            value: v.to_string(),
            label: if is_lts(v) {
                format!("Java {} (LTS)", v)
            } else {
                format!("Java {}", v)
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("8", 8)]
    #[case("1.8", 8)]
    #[case("1.7.0_80", 7)]
    #[case("17.0.2", 17)]
    #[case(" 21 ", 21)]
    #[case("21-ea", 21)]
    #[case("11.0", 11)]
    fn test_parse_java_version(#[case] raw: &str, #[case] expected: u32) {
        assert_eq!(parse_java_version(raw), Ok(expected));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("java")]
    #[case(".8")]
    fn test_parse_java_version_rejects(#[case] raw: &str) {
        assert!(parse_java_version(raw).is_err());
    }

    #[test]
    fn test_catalog_labels_lts_releases() {
        let catalog = java_version_catalog();
        assert_eq!(catalog.len(), 17);
        assert_eq!(catalog[0].label, "Java 7");
        let lts: Vec<_> = catalog
            .iter()
            .filter(|o| o.label.ends_with("(LTS)"))
            .map(|o| o.value.as_str())
            .collect();
        assert_eq!(lts, vec!["8", "11", "17", "21"]);
    }
}
