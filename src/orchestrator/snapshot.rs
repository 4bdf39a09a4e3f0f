// src/orchestrator/snapshot.rs

//! Orchestrator-independent view of one native watch event.
//!
//! Adapters turn a native object into a [`Snapshot`]; the reconciliation core
//! only ever sees snapshots, never native objects.

use crate::errors::NormalizeError;
use crate::types::{StepStatus, WorkflowStatus};

/// Normalized workflow-level state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowState {
    pub status: WorkflowStatus,
    /// Failure (or termination) description; only set for `Failed`.
    pub error: Option<String>,
}

impl WorkflowState {
    pub fn pending() -> Self {
        Self {
            status: WorkflowStatus::Pending,
            error: None,
        }
    }

    pub fn running() -> Self {
        Self {
            status: WorkflowStatus::Running,
            error: None,
        }
    }

    pub fn succeeded() -> Self {
        Self {
            status: WorkflowStatus::Succeeded,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: WorkflowStatus::Failed,
            error: Some(error.into()),
        }
    }

    pub fn has_started(&self) -> bool {
        self.status != WorkflowStatus::Pending
    }

    pub fn has_finished(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Normalized state of one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepState {
    pub status: StepStatus,
    /// Failure description; only set for `Failed`.
    pub error: Option<String>,
}

impl StepState {
    pub fn new(status: StepStatus) -> Self {
        Self {
            status,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: StepStatus::Failed,
            error: Some(error.into()),
        }
    }
}

/// One real execution unit (pod-backed task / node) as listed by the
/// orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepSnapshot {
    /// Display name; identity of the step within the workflow.
    pub name: String,
    /// Whether the orchestrator recorded any execution detail for this step
    /// yet. Steps without details are not worth a status read.
    pub has_details: bool,
    /// Normalized state, or the reason it could not be normalized.
    pub state: Result<StepState, NormalizeError>,
}

impl StepSnapshot {
    pub fn new(name: impl Into<String>, has_details: bool, state: StepState) -> Self {
        Self {
            name: name.into(),
            has_details,
            state: Ok(state),
        }
    }
}

/// Canonical snapshot of a whole workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Native object name (used in log lines and messages).
    pub name: String,
    pub resource_version: Option<String>,
    pub workflow: WorkflowState,
    /// Steps in the order the native object lists them.
    pub steps: Vec<StepSnapshot>,
}

impl Snapshot {
    pub fn new(name: impl Into<String>, workflow: WorkflowState) -> Self {
        Self {
            name: name.into(),
            resource_version: None,
            workflow,
            steps: Vec::new(),
        }
    }

    pub fn with_step(mut self, step: StepSnapshot) -> Self {
        self.steps.push(step);
        self
    }

    /// Names of the steps to seed the tracker with on start.
    pub fn discovered_steps(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|s| s.name.as_str())
    }
}
