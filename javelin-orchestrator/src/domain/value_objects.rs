//! Domain value objects for migration jobs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Git hosting platform a job clones from and publishes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum GitPlatform {
    #[default]
    Github,
    Gitlab,
}

impl GitPlatform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Github => "github",
            Self::Gitlab => "gitlab",
        }
    }
}

impl std::fmt::Display for GitPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Migration job status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Accepted, waiting for a pipeline slot
    Pending,
    Cloning,
    Analyzing,
    Migrating,
    Testing,
    QualityScan,
    Pushing,
    Completed,
    Failed,
    Cancelled,
}

impl JobStatus {
    /// Returns the set of valid target states from the current state.
    ///
    /// ```text
    /// Pending ─► Cloning ─► Analyzing ─► Migrating ─┬─► Testing ─┬─► QualityScan ─┬─► Pushing ─► Completed
    ///                                               │            └────────────────┤
    ///                                               └─────────────────────────────┘
    /// any non-terminal state ─► Failed | Cancelled
    /// ```
    pub fn valid_transitions(&self) -> &[JobStatus] {
        match self {
            Self::Pending => &[Self::Cloning, Self::Failed, Self::Cancelled],
            Self::Cloning => &[Self::Analyzing, Self::Failed, Self::Cancelled],
            Self::Analyzing => &[Self::Migrating, Self::Failed, Self::Cancelled],
            Self::Migrating => &[
                Self::Testing,
                Self::QualityScan,
                Self::Pushing,
                Self::Failed,
                Self::Cancelled,
            ],
            Self::Testing => &[Self::QualityScan, Self::Pushing, Self::Failed, Self::Cancelled],
            Self::QualityScan => &[Self::Pushing, Self::Failed, Self::Cancelled],
            Self::Pushing => &[Self::Completed, Self::Failed, Self::Cancelled],
            Self::Completed | Self::Failed | Self::Cancelled => &[],
        }
    }

    /// Check whether transitioning to `target` is allowed from the current state.
    pub fn can_transition_to(&self, target: &JobStatus) -> bool {
        self.valid_transitions().contains(target)
    }

    /// Whether this status represents a terminal (final) state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    /// Progress reported on entering the state. `None` for states that keep
    /// whatever progress the job had reached.
    pub fn entry_progress(&self) -> Option<u8> {
        match self {
            Self::Pending => Some(0),
            Self::Cloning => Some(progress::CLONING),
            Self::Analyzing => Some(progress::ANALYZING),
            Self::Migrating => Some(progress::MIGRATING_BASE),
            Self::Testing => Some(progress::TESTING),
            Self::QualityScan => Some(progress::QUALITY_SCAN),
            Self::Pushing => Some(progress::PUSHING),
            Self::Completed => Some(progress::COMPLETED),
            Self::Failed | Self::Cancelled => None,
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Cloning => write!(f, "cloning"),
            Self::Analyzing => write!(f, "analyzing"),
            Self::Migrating => write!(f, "migrating"),
            Self::Testing => write!(f, "testing"),
            Self::QualityScan => write!(f, "quality_scan"),
            Self::Pushing => write!(f, "pushing"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Progress milestones, in percent
pub mod progress {
    pub const CLONING: u8 = 5;
    pub const ANALYZING: u8 = 15;
    pub const MIGRATING_BASE: u8 = 30;
    pub const MIGRATING_STEP: u8 = 10;
    pub const MIGRATING_CAP: u8 = 55;
    pub const TESTING: u8 = 60;
    pub const QUALITY_SCAN: u8 = 75;
    pub const PUSHING: u8 = 90;
    pub const COMPLETED: u8 = 100;

    /// Progress for the `index`-th pass of the migrate stage
    pub fn migrating(index: usize) -> u8 {
        let step = u8::try_from(index)
            .unwrap_or(u8::MAX)
            .saturating_mul(MIGRATING_STEP);
        MIGRATING_BASE.saturating_add(step).min(MIGRATING_CAP)
    }
}

/// Recorded state transition for a migration job (audit trail).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct JobTransition {
    pub from: JobStatus,
    pub to: JobStatus,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Human-readable reason or context for the transition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Error returned when an invalid status transition is attempted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid job transition from {from} to {to}")]
pub struct JobTransitionError {
    pub from: JobStatus,
    pub to: JobStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(JobStatus::Pending, JobStatus::Cloning, true)]
    #[case(JobStatus::Migrating, JobStatus::Pushing, true)]
    #[case(JobStatus::Testing, JobStatus::Pushing, true)]
    #[case(JobStatus::Pushing, JobStatus::Completed, true)]
    #[case(JobStatus::Analyzing, JobStatus::Cloning, false)]
    #[case(JobStatus::Cloning, JobStatus::Migrating, false)]
    #[case(JobStatus::QualityScan, JobStatus::Testing, false)]
    #[case(JobStatus::Completed, JobStatus::Failed, false)]
    #[case(JobStatus::Cancelled, JobStatus::Cloning, false)]
    fn test_transitions(#[case] from: JobStatus, #[case] to: JobStatus, #[case] allowed: bool) {
        assert_eq!(from.can_transition_to(&to), allowed);
    }

    #[test]
    fn test_every_live_state_can_fail_or_cancel() {
        let live = [
            JobStatus::Pending,
            JobStatus::Cloning,
            JobStatus::Analyzing,
            JobStatus::Migrating,
            JobStatus::Testing,
            JobStatus::QualityScan,
            JobStatus::Pushing,
        ];
        for status in live {
            assert!(!status.is_terminal());
            assert!(status.can_transition_to(&JobStatus::Failed), "{status}");
            assert!(status.can_transition_to(&JobStatus::Cancelled), "{status}");
        }
    }

    #[test]
    fn test_migrating_progress_is_capped() {
        assert_eq!(progress::migrating(0), 30);
        assert_eq!(progress::migrating(2), 50);
        assert_eq!(progress::migrating(3), 55);
        assert_eq!(progress::migrating(40), 55);
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&JobStatus::QualityScan).unwrap();
        assert_eq!(json, "\"quality_scan\"");
    }
}
