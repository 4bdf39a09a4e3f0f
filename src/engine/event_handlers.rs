// src/engine/event_handlers.rs

//! Per-phase snapshot handling for the core reconciler.

use tracing::{debug, info, warn};

use crate::engine::ReportCommand;
use crate::orchestrator::Snapshot;
use crate::types::{StepStatus, WorkflowStatus};
use crate::workflow::{StepTransition, Workflow};

/// Decision returned by the core after handling a single snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoreStep {
    /// Reports the IO shell should send, in order.
    pub commands: Vec<ReportCommand>,
    /// Whether the outer loop should keep consuming the watch.
    pub keep_running: bool,
}

/// `Pending` phase: wait for the workflow to start.
///
/// On start, seed the step map with every discovered step and emit the one
/// and only workflow `Running` report.
pub fn handle_workflow_pending(workflow: &mut Workflow, snapshot: &Snapshot) -> Vec<ReportCommand> {
    if !snapshot.workflow.has_started() {
        debug!(workflow = %snapshot.name, "workflow has not started yet");
        return Vec::new();
    }

    if !workflow.start(snapshot.discovered_steps()) {
        return Vec::new();
    }

    info!(
        workflow = %snapshot.name,
        steps = workflow.step_count(),
        "workflow started"
    );

    vec![ReportCommand::Workflow {
        status: WorkflowStatus::Running,
        error: None,
    }]
}

/// `Running` phase: report every step whose status moved forward.
pub fn handle_workflow_running(workflow: &mut Workflow, snapshot: &Snapshot) -> Vec<ReportCommand> {
    let mut commands = Vec::new();

    for step in &snapshot.steps {
        if !step.has_details {
            debug!(
                step = %step.name,
                "skipping step status report, step is not running yet"
            );
            continue;
        }

        let state = match &step.state {
            Ok(state) => state,
            Err(err) => {
                warn!(step = %step.name, error = %err, "failed to get workflow step status");
                continue;
            }
        };

        let transition = workflow.record_step(&step.name, state.status);
        if let StepTransition::Changed { current, .. } = transition {
            let error = if current == StepStatus::Failed {
                state.error.clone()
            } else {
                None
            };

            commands.push(ReportCommand::Step {
                name: step.name.clone(),
                status: current,
                error,
                register: transition.is_first_progress(),
            });
        }
    }

    commands
}

/// Any phase: if the snapshot is terminal, emit the single terminal report.
pub fn handle_workflow_finished(
    workflow: &mut Workflow,
    snapshot: &Snapshot,
) -> Option<ReportCommand> {
    if !snapshot.workflow.has_finished() {
        return None;
    }

    let status = snapshot.workflow.status;
    if !workflow.finish(status) {
        return None;
    }

    info!(workflow = %snapshot.name, %status, "workflow finished");

    let error = match status {
        WorkflowStatus::Failed => snapshot.workflow.error.clone(),
        _ => None,
    };

    Some(ReportCommand::Workflow { status, error })
}
