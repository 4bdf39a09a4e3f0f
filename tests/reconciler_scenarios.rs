// tests/reconciler_scenarios.rs

mod common;
use crate::common::{init_tracing, running, with_steps};

use status_reporter::engine::{CoreStep, Reconciler, ReportCommand};
use status_reporter::errors::NormalizeError;
use status_reporter::orchestrator::{Snapshot, StepSnapshot, StepState, WorkflowState};
use status_reporter::types::{StepStatus, WorkflowStatus};

fn workflow_report(status: WorkflowStatus, error: Option<&str>) -> ReportCommand {
    ReportCommand::Workflow {
        status,
        error: error.map(str::to_string),
    }
}

fn step_report(name: &str, status: StepStatus, error: Option<&str>, register: bool) -> ReportCommand {
    ReportCommand::Step {
        name: name.to_string(),
        status,
        error: error.map(str::to_string),
        register,
    }
}

/// Drive the reconciler into `Running` with the given pending steps.
fn started(steps: &[&str]) -> Reconciler {
    let mut core = Reconciler::new();
    let pending: Vec<(&str, StepStatus)> = steps.iter().map(|s| (*s, StepStatus::Pending)).collect();
    core.step(&running(&pending));
    core
}

#[test]
fn scenario_a_not_started_reports_nothing() {
    init_tracing();

    let mut core = Reconciler::new();
    let step = core.step(&Snapshot::new("wf", WorkflowState::pending()));

    assert_eq!(
        step,
        CoreStep {
            commands: vec![],
            keep_running: true,
        }
    );
    assert_eq!(core.workflow().status(), WorkflowStatus::Pending);
}

#[test]
fn scenario_b_start_seeds_steps_and_reports_running_once() {
    let mut core = Reconciler::new();

    let step = core.step(&running(&[
        ("build", StepStatus::Pending),
        ("test", StepStatus::Pending),
    ]));

    assert_eq!(step.commands, vec![workflow_report(WorkflowStatus::Running, None)]);
    assert!(step.keep_running);
    assert_eq!(core.workflow().status(), WorkflowStatus::Running);
    assert_eq!(core.workflow().step_count(), 2);
    assert!(
        core.workflow()
            .steps()
            .all(|s| s.status == StepStatus::Pending)
    );
}

#[test]
fn scenario_c_failed_step_is_reported_with_reason() {
    let mut core = started(&["build", "test"]);

    let step = core.step(&running(&[
        ("build", StepStatus::Pending),
        ("test", StepStatus::Failed),
    ]));

    assert_eq!(
        step.commands,
        vec![step_report(
            "test",
            StepStatus::Failed,
            Some("step test failed with: exit code 1"),
            true
        )]
    );
    assert!(step.keep_running);
}

#[test]
fn scenario_d_success_reports_once_and_stops() {
    let mut core = started(&["build"]);

    let step = core.step(&Snapshot::new("wf", WorkflowState::succeeded()));

    assert_eq!(step.commands, vec![workflow_report(WorkflowStatus::Succeeded, None)]);
    assert!(!step.keep_running);
    assert!(core.is_finished());

    let after = core.step(&Snapshot::new("wf", WorkflowState::succeeded()));
    assert!(after.commands.is_empty());
    assert!(!after.keep_running);
}

#[test]
fn failed_workflow_carries_error() {
    let mut core = started(&[]);

    let step = core.step(&Snapshot::new("wf", WorkflowState::failed("workflow wf has failed: boom")));

    assert_eq!(
        step.commands,
        vec![workflow_report(
            WorkflowStatus::Failed,
            Some("workflow wf has failed: boom")
        )]
    );
}

#[test]
fn unchanged_snapshot_twice_reports_nothing() {
    let mut core = started(&["build"]);
    let snapshot = running(&[("build", StepStatus::Running)]);

    let first = core.step(&snapshot);
    assert_eq!(
        first.commands,
        vec![step_report("build", StepStatus::Running, None, true)]
    );

    let second = core.step(&snapshot);
    assert!(second.commands.is_empty());
    assert!(second.keep_running);
}

#[test]
fn only_first_progress_registers_the_step() {
    let mut core = started(&["build"]);

    core.step(&running(&[("build", StepStatus::Running)]));
    let step = core.step(&running(&[("build", StepStatus::Succeeded)]));

    assert_eq!(
        step.commands,
        vec![step_report("build", StepStatus::Succeeded, None, false)]
    );
}

#[test]
fn steps_without_details_are_skipped() {
    let mut core = started(&["build"]);

    let snapshot = Snapshot::new("wf", WorkflowState::running()).with_step(StepSnapshot::new(
        "build",
        false,
        StepState::new(StepStatus::Running),
    ));

    assert!(core.step(&snapshot).commands.is_empty());
    assert_eq!(
        core.workflow().step("build").map(|s| s.status),
        Some(StepStatus::Pending)
    );
}

#[test]
fn normalize_error_skips_only_that_step() {
    let mut core = started(&["weird", "fine"]);

    let snapshot = Snapshot::new("wf", WorkflowState::running())
        .with_step(StepSnapshot {
            name: "weird".to_string(),
            has_details: true,
            state: Err(NormalizeError::UnknownStepPhase {
                step: "weird".to_string(),
                phase: "Hibernating".to_string(),
            }),
        })
        .with_step(StepSnapshot::new("fine", true, StepState::new(StepStatus::Running)));

    let step = core.step(&snapshot);

    assert_eq!(
        step.commands,
        vec![step_report("fine", StepStatus::Running, None, true)]
    );
}

#[test]
fn unseeded_step_is_reported_on_first_sight() {
    let mut core = started(&["build"]);

    let step = core.step(&running(&[("late", StepStatus::Running)]));

    assert_eq!(
        step.commands,
        vec![step_report("late", StepStatus::Running, None, true)]
    );
}

#[test]
fn terminal_on_first_sight_reports_start_steps_then_finish() {
    let mut core = Reconciler::new();

    let snapshot = with_steps(
        Snapshot::new("wf", WorkflowState::failed("workflow wf has failed: boom")),
        &[("build", StepStatus::Succeeded), ("test", StepStatus::Failed)],
    );
    let step = core.step(&snapshot);

    assert_eq!(
        step.commands,
        vec![
            workflow_report(WorkflowStatus::Running, None),
            step_report("build", StepStatus::Succeeded, None, true),
            step_report(
                "test",
                StepStatus::Failed,
                Some("step test failed with: exit code 1"),
                true
            ),
            workflow_report(WorkflowStatus::Failed, Some("workflow wf has failed: boom")),
        ]
    );
    assert!(!step.keep_running);
}

#[test]
fn regressing_step_is_not_reported() {
    let mut core = started(&["build"]);

    core.step(&running(&[("build", StepStatus::Succeeded)]));
    let step = core.step(&running(&[("build", StepStatus::Running)]));

    assert!(step.commands.is_empty());
}

#[test]
fn start_snapshot_reports_progressed_steps_and_repeats_are_silent() {
    let mut core = Reconciler::new();
    let snapshot = running(&[("build", StepStatus::Running), ("test", StepStatus::Pending)]);

    let first = core.step(&snapshot);
    assert_eq!(
        first.commands,
        vec![
            workflow_report(WorkflowStatus::Running, None),
            step_report("build", StepStatus::Running, None, true),
        ]
    );

    let second = core.step(&snapshot);
    assert!(second.commands.is_empty(), "got {:?}", second.commands);
    assert!(second.keep_running);
}
