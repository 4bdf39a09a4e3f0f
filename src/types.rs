// src/types.rs

//! Canonical status vocabulary shared by every orchestrator adapter.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Overall status of a watched workflow.
///
/// Moves forward only: `Pending -> Running -> {Succeeded | Failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
}

impl WorkflowStatus {
    /// String sent to the status API.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStatus::Pending => "pending",
            WorkflowStatus::Running => "running",
            WorkflowStatus::Succeeded => "success",
            WorkflowStatus::Failed => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowStatus::Succeeded | WorkflowStatus::Failed)
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(WorkflowStatus::Pending),
            "running" => Ok(WorkflowStatus::Running),
            "success" | "succeeded" => Ok(WorkflowStatus::Succeeded),
            "error" | "failed" => Ok(WorkflowStatus::Failed),
            other => Err(format!(
                "invalid workflow status: {other} (expected pending, running, success or error)"
            )),
        }
    }
}

/// Status of a single step (task / node) inside a workflow.
///
/// `Succeeded`, `Failed` and `Skipped` are terminal; once a step reaches one
/// of them it is never reported again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    Skipped,
}

impl StepStatus {
    /// String sent to the status API.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Pending => "pending",
            StepStatus::Running => "running",
            StepStatus::Succeeded => "success",
            StepStatus::Failed => "error",
            StepStatus::Skipped => "skipped",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StepStatus::Succeeded | StepStatus::Failed | StepStatus::Skipped
        )
    }

    /// Position in the forward order `Pending < Running < terminal`.
    ///
    /// All terminal statuses share the same rank.
    pub fn rank(&self) -> u8 {
        match self {
            StepStatus::Pending => 0,
            StepStatus::Running => 1,
            StepStatus::Succeeded | StepStatus::Failed | StepStatus::Skipped => 2,
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(StepStatus::Pending),
            "running" => Ok(StepStatus::Running),
            "success" | "succeeded" => Ok(StepStatus::Succeeded),
            "error" | "failed" => Ok(StepStatus::Failed),
            "skipped" => Ok(StepStatus::Skipped),
            other => Err(format!(
                "invalid step status: {other} (expected pending, running, success, error or skipped)"
            )),
        }
    }
}

/// Which orchestrator the watched workflow runs under.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeKind {
    /// DAG-execution controller (`argoproj.io/v1alpha1` `Workflow`).
    #[default]
    Argo,
    /// Task-graph controller (`tekton.dev/v1beta1` `PipelineRun`).
    Tekton,
}

impl RuntimeKind {
    pub const ALL: [RuntimeKind; 2] = [RuntimeKind::Argo, RuntimeKind::Tekton];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuntimeKind::Argo => "argo",
            RuntimeKind::Tekton => "tekton",
        }
    }
}

impl fmt::Display for RuntimeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuntimeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        RuntimeKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = RuntimeKind::ALL.iter().map(|k| k.as_str()).collect();
                format!("unknown runtime: {wanted} (expected one of {})", known.join(", "))
            })
    }
}
