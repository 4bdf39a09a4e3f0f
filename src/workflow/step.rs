// src/workflow/step.rs

//! Per-step record and transition outcome.

use crate::types::StepStatus;

/// A step as remembered by the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Display name; unique within a workflow.
    pub name: String,
    pub status: StepStatus,
}

impl Step {
    pub fn pending(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: StepStatus::Pending,
        }
    }
}

/// Result of offering a freshly observed status to the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepTransition {
    /// The status moved forward and was recorded; it must be reported.
    Changed {
        /// `None` when the step was never seen before.
        previous: Option<StepStatus>,
        current: StepStatus,
    },
    /// Same status as already recorded.
    Unchanged,
    /// Backward movement, or a different status after a terminal one.
    /// Nothing is recorded.
    Ignored {
        recorded: StepStatus,
        observed: StepStatus,
    },
}

impl StepTransition {
    /// Whether this is the step's first move away from `Pending`, i.e. the
    /// moment it has to be registered with the status API.
    pub fn is_first_progress(&self) -> bool {
        match self {
            StepTransition::Changed { previous, current } => {
                *current != StepStatus::Pending
                    && matches!(previous, None | Some(StepStatus::Pending))
            }
            _ => false,
        }
    }
}
