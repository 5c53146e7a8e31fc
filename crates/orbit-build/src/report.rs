//! Run results
use crate::action::Action;
use crate::error::OrchestratorError;
use crate::target::TargetId;
use serde::{Serialize, Serializer};
use std::time::Duration;

/// Outcome of one target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TargetStatus {
    /// Not reached, because an earlier target failed
    NotRun,
    /// Ran and succeeded
    Succeeded,
    /// Already succeeded earlier in this invocation
    Skipped,
    /// Ran and failed
    Failed { reason: String },
}

impl TargetStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Skipped)
    }
}

/// Report for one target
#[derive(Debug, Clone, Serialize)]
pub struct TargetReport {
    pub target: TargetId,
    #[serde(flatten)]
    pub status: TargetStatus,
    #[serde(rename = "seconds", serialize_with = "as_secs")]
    pub duration: Duration,
}

fn as_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

/// Aggregate result of one run
#[derive(Debug, Serialize)]
pub struct RunReport {
    /// Requested action, if the run came from an action request
    pub action: Option<Action>,
    /// Every target in execution order
    pub targets: Vec<TargetReport>,
    #[serde(rename = "seconds", serialize_with = "as_secs")]
    pub total_time: Duration,
    /// The error that aborted the run
    #[serde(skip)]
    pub error: Option<OrchestratorError>,
}

impl RunReport {
    pub fn new(action: Option<Action>) -> Self {
        Self {
            action,
            targets: Vec::new(),
            total_time: Duration::ZERO,
            error: None,
        }
    }

    /// Succeeded iff every target succeeded
    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.targets.iter().all(|t| t.status.is_ok())
    }

    /// The target that aborted the run
    pub fn failed_target(&self) -> Option<&TargetReport> {
        self.targets
            .iter()
            .find(|t| matches!(t.status, TargetStatus::Failed { .. }))
    }

    /// The error that aborted the run
    pub fn error(&self) -> Option<&OrchestratorError> {
        self.error.as_ref()
    }

    /// Targets that were run or skipped, in order
    pub fn attempted(&self) -> impl Iterator<Item = &TargetReport> {
        self.targets
            .iter()
            .filter(|t| t.status != TargetStatus::NotRun)
    }

    /// Targets that ran in this run (excludes skipped and not-run ones)
    pub fn executed(&self) -> Vec<&TargetId> {
        self.targets
            .iter()
            .filter(|t| {
                matches!(
                    t.status,
                    TargetStatus::Succeeded | TargetStatus::Failed { .. }
                )
            })
            .map(|t| &t.target)
            .collect()
    }

    /// Targets that succeeded
    pub fn succeeded(&self) -> Vec<&TargetId> {
        self.targets
            .iter()
            .filter(|t| t.status.is_ok())
            .map(|t| &t.target)
            .collect()
    }

    /// Targets left unrun by the abort
    pub fn not_run(&self) -> Vec<&TargetId> {
        self.targets
            .iter()
            .filter(|t| t.status == TargetStatus::NotRun)
            .map(|t| &t.target)
            .collect()
    }
}
