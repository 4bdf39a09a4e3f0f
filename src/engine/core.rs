// src/engine/core.rs

//! Pure reconciliation state machine.
//!
//! [`Reconciler`] consumes canonical [`Snapshot`]s and produces:
//! - an updated [`Workflow`] record
//! - the list of reports the IO shell must send
//!
//! It has no channels, no Tokio types, and performs no IO, so every
//! reporting invariant can be tested by feeding it snapshots directly.

use crate::engine::event_handlers::{
    CoreStep, handle_workflow_finished, handle_workflow_pending, handle_workflow_running,
};
use crate::orchestrator::Snapshot;
use crate::types::WorkflowStatus;
use crate::workflow::Workflow;

#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    workflow: Workflow,
}

impl Reconciler {
    pub fn new() -> Self {
        Self {
            workflow: Workflow::new(),
        }
    }

    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    pub fn is_finished(&self) -> bool {
        self.workflow.status().is_terminal()
    }

    /// Handle a single snapshot.
    ///
    /// The snapshot that starts the workflow also gets a step pass right
    /// after seeding, so steps already past `Pending` are reported now and a
    /// repeat of the same snapshot reports nothing. A workflow that is
    /// terminal on first sight thus still reports its final step states.
    pub fn step(&mut self, snapshot: &Snapshot) -> CoreStep {
        if self.is_finished() {
            return CoreStep {
                commands: Vec::new(),
                keep_running: false,
            };
        }

        let mut commands = Vec::new();

        match self.workflow.status() {
            WorkflowStatus::Pending => {
                commands.extend(handle_workflow_pending(&mut self.workflow, snapshot));
                if self.workflow.status() == WorkflowStatus::Running {
                    commands.extend(handle_workflow_running(&mut self.workflow, snapshot));
                }
            }
            WorkflowStatus::Running => {
                commands.extend(handle_workflow_running(&mut self.workflow, snapshot));
            }
            WorkflowStatus::Succeeded | WorkflowStatus::Failed => {}
        }

        match handle_workflow_finished(&mut self.workflow, snapshot) {
            Some(terminal) => {
                commands.push(terminal);
                CoreStep {
                    commands,
                    keep_running: false,
                }
            }
            None => CoreStep {
                commands,
                keep_running: true,
            },
        }
    }
}
