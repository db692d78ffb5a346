//! Static dependency upgrade table

use tracing::debug;

use crate::domain::{DependencyRecord, ManifestDependency, UpgradeStatus};

struct UpgradeEntry {
    coordinate: &'static str,
    new_version: &'static str,
    status: UpgradeStatus,
}

/// Known upgrades. Entries whose target lives under a different coordinate
/// carry the full `group:artifact:version` as the new version.
const UPGRADE_TABLE: &[UpgradeEntry] = &[
    UpgradeEntry {
        coordinate: "org.springframework.boot:spring-boot-starter",
        new_version: "3.2.0",
        status: UpgradeStatus::Upgraded,
    },
    UpgradeEntry {
        coordinate: "org.springframework:spring-core",
        new_version: "6.1.0",
        status: UpgradeStatus::Upgraded,
    },
    UpgradeEntry {
        coordinate: "junit:junit",
        new_version: "4.13.2",
        status: UpgradeStatus::Upgraded,
    },
    UpgradeEntry {
        coordinate: "org.junit.jupiter:junit-jupiter",
        new_version: "5.10.0",
        status: UpgradeStatus::Upgraded,
    },
    UpgradeEntry {
        coordinate: "javax.servlet:javax.servlet-api",
        new_version: "jakarta.servlet:jakarta.servlet-api:6.0.0",
        status: UpgradeStatus::NeedsManualReview,
    },
    UpgradeEntry {
        coordinate: "javax.persistence:javax.persistence-api",
        new_version: "jakarta.persistence:jakarta.persistence-api:3.1.0",
        status: UpgradeStatus::NeedsManualReview,
    },
    UpgradeEntry {
        coordinate: "log4j:log4j",
        new_version: "org.apache.logging.log4j:log4j-core:2.22.0",
        status: UpgradeStatus::Upgraded,
    },
    UpgradeEntry {
        coordinate: "commons-lang:commons-lang",
        new_version: "org.apache.commons:commons-lang3:3.14.0",
        status: UpgradeStatus::Upgraded,
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub new_version: Option<String>,
    pub status: UpgradeStatus,
}

/// Decides upgrades from a fixed table. The current version never influences the answer.
#[derive(Debug, Clone, Copy, Default)]
pub struct DependencyResolver;

impl DependencyResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve(&self, group_id: &str, artifact_id: &str, _current_version: &str) -> Resolution {
        let coordinate = format!("{}:{}", group_id, artifact_id);
        match UPGRADE_TABLE.iter().find(|e| e.coordinate == coordinate) {
            Some(entry) => Resolution {
                new_version: Some(entry.new_version.to_string()),
                status: entry.status,
            },
            None => Resolution {
                new_version: None,
                status: UpgradeStatus::Compatible,
            },
        }
    }

    pub fn resolve_dependency(&self, dependency: &ManifestDependency) -> DependencyRecord {
        let current = dependency.version_or_inherited();
        let resolution = self.resolve(&dependency.group_id, &dependency.artifact_id, current);
        DependencyRecord {
            group_id: dependency.group_id.clone(),
            artifact_id: dependency.artifact_id.clone(),
            current_version: current.to_string(),
            new_version: resolution.new_version,
            status: resolution.status,
        }
    }

    pub fn resolve_all(&self, dependencies: &[ManifestDependency]) -> Vec<DependencyRecord> {
        let records: Vec<_> = dependencies
            .iter()
            .map(|d| self.resolve_dependency(d))
            .collect();
        debug!(
            total = records.len(),
            upgrades = records
                .iter()
                .filter(|r| r.status != UpgradeStatus::Compatible)
                .count(),
            "Resolved dependency upgrades"
        );
        records
    }
}
