//! Lifecycle stage and run status markers

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Active/deleted marker shared by experiments and runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleStage {
    /// Visible to searches (the default for stored documents).
    #[default]
    Active,
    /// Soft-deleted; kept until garbage collected.
    Deleted,
}

impl LifecycleStage {
    /// Stored string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for LifecycleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LifecycleStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "deleted" => Ok(Self::Deleted),
            other => Err(format!("unknown lifecycle stage: {other}")),
        }
    }
}

/// Status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    /// Run is currently executing.
    Running,
    /// Run is queued for execution.
    Scheduled,
    /// Run completed successfully.
    Finished,
    /// Run failed with an error.
    Failed,
    /// Run was killed by user or system.
    Killed,
}

impl RunStatus {
    /// Stored string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Running => "RUNNING",
            Self::Scheduled => "SCHEDULED",
            Self::Finished => "FINISHED",
            Self::Failed => "FAILED",
            Self::Killed => "KILLED",
        }
    }

    /// Whether the run has reached a final status.
    #[must_use]
    pub const fn is_terminated(self) -> bool {
        matches!(self, Self::Finished | Self::Failed | Self::Killed)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RUNNING" => Ok(Self::Running),
            "SCHEDULED" => Ok(Self::Scheduled),
            "FINISHED" => Ok(Self::Finished),
            "FAILED" => Ok(Self::Failed),
            "KILLED" => Ok(Self::Killed),
            other => Err(format!("unknown run status: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_default_is_active() {
        assert_eq!(LifecycleStage::default(), LifecycleStage::Active);
    }

    #[test]
    fn test_lifecycle_serde_matches_display() {
        for stage in [LifecycleStage::Active, LifecycleStage::Deleted] {
            let json = serde_json::to_string(&stage).unwrap();
            assert_eq!(json, format!("\"{stage}\""));
            assert_eq!(stage.as_str().parse::<LifecycleStage>().unwrap(), stage);
        }
    }

    #[test]
    fn test_run_status_parse() {
        assert_eq!("KILLED".parse::<RunStatus>().unwrap(), RunStatus::Killed);
        assert!("killed".parse::<RunStatus>().is_err());
    }

    #[test]
    fn test_run_status_terminated() {
        assert!(!RunStatus::Running.is_terminated());
        assert!(!RunStatus::Scheduled.is_terminated());
        assert!(RunStatus::Finished.is_terminated());
        assert!(RunStatus::Failed.is_terminated());
        assert!(RunStatus::Killed.is_terminated());
    }

    #[test]
    fn test_run_status_serde() {
        let status: RunStatus = serde_json::from_str("\"SCHEDULED\"").unwrap();
        assert_eq!(status, RunStatus::Scheduled);
        assert_eq!(serde_json::to_string(&RunStatus::Finished).unwrap(), "\"FINISHED\"");
    }
}
