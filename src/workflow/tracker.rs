// src/workflow/tracker.rs

//! In-memory state of the watched workflow.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::types::{StepStatus, WorkflowStatus};
use crate::workflow::step::{Step, StepTransition};

/// Overall status plus the last status recorded for every known step.
///
/// Owned exclusively by the reconciliation loop for one watch session and
/// mutated strictly sequentially. Steps only appear once the workflow has
/// left `Pending`.
#[derive(Debug, Clone)]
pub struct Workflow {
    status: WorkflowStatus,
    steps: HashMap<String, Step>,
}

impl Workflow {
    pub fn new() -> Self {
        Self {
            status: WorkflowStatus::Pending,
            steps: HashMap::new(),
        }
    }

    pub fn status(&self) -> WorkflowStatus {
        self.status
    }

    pub fn step(&self, name: &str) -> Option<&Step> {
        self.steps.get(name)
    }

    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.steps.values()
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// `Pending -> Running`: seed every discovered step as `Pending`.
    ///
    /// Returns `false` (and changes nothing) if the workflow already left
    /// `Pending`.
    pub fn start<'a>(&mut self, discovered: impl IntoIterator<Item = &'a str>) -> bool {
        if self.status != WorkflowStatus::Pending {
            return false;
        }

        self.status = WorkflowStatus::Running;
        for name in discovered {
            self.steps
                .entry(name.to_string())
                .or_insert_with(|| Step::pending(name));
        }

        debug!(steps = self.steps.len(), "workflow started; steps seeded");
        true
    }

    /// Record an observed step status if it moves the step forward.
    pub fn record_step(&mut self, name: &str, observed: StepStatus) -> StepTransition {
        if self.status == WorkflowStatus::Pending {
            warn!(step = %name, "step observed before workflow start; ignoring");
            return StepTransition::Ignored {
                recorded: StepStatus::Pending,
                observed,
            };
        }

        match self.steps.get_mut(name) {
            None => {
                debug!(step = %name, status = %observed, "step seen for the first time");
                self.steps.insert(
                    name.to_string(),
                    Step {
                        name: name.to_string(),
                        status: observed,
                    },
                );
                StepTransition::Changed {
                    previous: None,
                    current: observed,
                }
            }
            Some(step) if step.status == observed => StepTransition::Unchanged,
            Some(step) if step.status.is_terminal() || observed.rank() < step.status.rank() => {
                debug!(
                    step = %name,
                    recorded = %step.status,
                    observed = %observed,
                    "ignoring non-forward step transition"
                );
                StepTransition::Ignored {
                    recorded: step.status,
                    observed,
                }
            }
            Some(step) => {
                let previous = step.status;
                step.status = observed;
                StepTransition::Changed {
                    previous: Some(previous),
                    current: observed,
                }
            }
        }
    }

    /// Move to a terminal status. Returns `false` if already terminal.
    pub fn finish(&mut self, status: WorkflowStatus) -> bool {
        debug_assert!(status.is_terminal());
        if self.status.is_terminal() {
            return false;
        }
        self.status = status;
        true
    }
}

impl Default for Workflow {
    fn default() -> Self {
        Self::new()
    }
}
