#![allow(dead_code)]

use std::error::Error;

pub use status_reporter_test_utils::{init_tracing, with_timeout};

use status_reporter::orchestrator::{Snapshot, StepSnapshot, StepState, WorkflowState};
use status_reporter::types::StepStatus;

pub type TestResult = Result<(), Box<dyn Error>>;

/// A running workflow snapshot listing the given steps, each with details.
pub fn running(steps: &[(&str, StepStatus)]) -> Snapshot {
    with_steps(Snapshot::new("wf", WorkflowState::running()), steps)
}

pub fn with_steps(mut snapshot: Snapshot, steps: &[(&str, StepStatus)]) -> Snapshot {
    for (name, status) in steps {
        let state = match status {
            StepStatus::Failed => StepState::failed(format!("step {name} failed with: exit code 1")),
            other => StepState::new(*other),
        };
        snapshot = snapshot.with_step(StepSnapshot::new(*name, true, state));
    }
    snapshot
}
