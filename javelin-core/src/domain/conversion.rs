//! Conversion types a migration job can request

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

/// A named migration a job applies to a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ConversionType {
    #[serde(rename = "java_version")]
    JavaVersion,
    #[serde(rename = "maven_to_gradle")]
    MavenToGradle,
    #[serde(rename = "gradle_to_maven")]
    GradleToMaven,
    #[serde(rename = "javax_to_jakarta")]
    JavaxToJakarta,
    #[serde(rename = "jakarta_to_javax")]
    JakartaToJavax,
    #[serde(rename = "spring_boot_2_to_3")]
    SpringBoot2To3,
    #[serde(rename = "junit_4_to_5")]
    Junit4To5,
    #[serde(rename = "log4j_to_slf4j")]
    Log4jToSlf4j,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown conversion type '{0}'")]
pub struct UnknownConversionType(pub String);

/// Catalog entry served to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ConversionTypeInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub icon: &'static str,
}

impl ConversionType {
    pub const ALL: [ConversionType; 8] = [
        Self::JavaVersion,
        Self::MavenToGradle,
        Self::GradleToMaven,
        Self::JavaxToJakarta,
        Self::JakartaToJavax,
        Self::SpringBoot2To3,
        Self::Junit4To5,
        Self::Log4jToSlf4j,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::JavaVersion => "java_version",
            Self::MavenToGradle => "maven_to_gradle",
            Self::GradleToMaven => "gradle_to_maven",
            Self::JavaxToJakarta => "javax_to_jakarta",
            Self::JakartaToJavax => "jakarta_to_javax",
            Self::SpringBoot2To3 => "spring_boot_2_to_3",
            Self::Junit4To5 => "junit_4_to_5",
            Self::Log4jToSlf4j => "log4j_to_slf4j",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::JavaVersion => "Java Version Upgrade",
            Self::MavenToGradle => "Maven → Gradle",
            Self::GradleToMaven => "Gradle → Maven",
            Self::JavaxToJakarta => "javax → Jakarta EE",
            Self::JakartaToJavax => "Jakarta EE → javax",
            Self::SpringBoot2To3 => "Spring Boot 2 → 3",
            Self::Junit4To5 => "JUnit 4 → JUnit 5",
            Self::Log4jToSlf4j => "Log4j → SLF4J",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::JavaVersion => "Upgrade Java version (e.g., Java 8 → Java 17)",
            Self::MavenToGradle => "Convert Maven (pom.xml) to Gradle (build.gradle)",
            Self::GradleToMaven => "Convert Gradle (build.gradle) to Maven (pom.xml)",
            Self::JavaxToJakarta => "Migrate javax.* packages to jakarta.* (EE 8 → EE 9+)",
            Self::JakartaToJavax => "Migrate jakarta.* packages back to javax.*",
            Self::SpringBoot2To3 => "Upgrade Spring Boot 2.x to 3.x with Jakarta EE",
            Self::Junit4To5 => "Migrate JUnit 4 tests to JUnit 5 (Jupiter)",
            Self::Log4jToSlf4j => "Migrate Log4j to SLF4J logging facade",
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            Self::JavaVersion => "Language",
            Self::MavenToGradle | Self::GradleToMaven => "Build Tool",
            Self::JavaxToJakarta | Self::JakartaToJavax | Self::SpringBoot2To3 => "Framework",
            Self::Junit4To5 => "Testing",
            Self::Log4jToSlf4j => "Logging",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::JavaVersion => "☕",
            Self::MavenToGradle | Self::GradleToMaven => "🔧",
            Self::JavaxToJakarta | Self::JakartaToJavax => "📦",
            Self::SpringBoot2To3 => "🌱",
            Self::Junit4To5 => "✅",
            Self::Log4jToSlf4j => "📝",
        }
    }

    /// The conversion that undoes this one, if any. Selecting both is rejected.
    pub fn conflicts_with(&self) -> Option<ConversionType> {
        match self {
            Self::JavaxToJakarta => Some(Self::JakartaToJavax),
            Self::JakartaToJavax => Some(Self::JavaxToJakarta),
            Self::MavenToGradle => Some(Self::GradleToMaven),
            Self::GradleToMaven => Some(Self::MavenToGradle),
            _ => None,
        }
    }

    pub fn info(&self) -> ConversionTypeInfo {
        ConversionTypeInfo {
            id: self.as_str(),
            name: self.name(),
            description: self.description(),
            category: self.category(),
            icon: self.icon(),
        }
    }

    pub fn catalog() -> Vec<ConversionTypeInfo> {
        Self::ALL.iter().map(ConversionType::info).collect()
    }
}

impl std::fmt::Display for ConversionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConversionType {
    type Err = UnknownConversionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s.trim())
            .ok_or_else(|| UnknownConversionType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_round_trip_through_from_str() {
        for conversion in ConversionType::ALL {
            assert_eq!(conversion.as_str().parse::<ConversionType>(), Ok(conversion));
            let json = serde_json::to_string(&conversion).unwrap();
            assert_eq!(json, format!("\"{}\"", conversion.as_str()));
        }
    }

    #[test]
    fn test_unknown_conversion_type() {
        let err = "kotlin_to_java".parse::<ConversionType>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown conversion type 'kotlin_to_java'");
    }

    #[test]
    fn test_conflicts_are_symmetric() {
        for conversion in ConversionType::ALL {
            if let Some(other) = conversion.conflicts_with() {
                assert_eq!(other.conflicts_with(), Some(conversion));
            }
        }
        assert_eq!(ConversionType::Junit4To5.conflicts_with(), None);
    }
}
