// src/orchestrator/tekton/mod.rs

//! Adapter for the task-graph controller (`tekton.dev` PipelineRuns).
//!
//! Workflow state comes from the PipelineRun's `Succeeded` condition. Steps
//! are the embedded `status.taskRuns` (always pod-backed) named by their
//! pipeline task name, followed by `status.skippedTasks`. Custom-task runs are
//! not execution units and are never read.

pub mod model;

use kube::api::{ApiResource, DynamicObject, GroupVersionKind};

use crate::errors::{NormalizeError, Result};
use crate::orchestrator::{Adapter, Snapshot, StepSnapshot, StepState, WorkflowState};
use crate::orchestrator::{decode_body, object_name};
use crate::types::{RuntimeKind, StepStatus};

use model::{Condition, PipelineRunBody, PipelineRunTaskRunStatus};

pub const DEFAULT_LABEL_KEY: &str = "tekton.dev/pipeline";

const KIND: &str = "PipelineRun";

/// Condition reasons and `spec.status` values meaning "stopped on request".
const CANCELLED_MARKERS: [&str; 4] = [
    "Cancelled",
    "PipelineRunCancelled",
    "CancelledRunFinally",
    "StoppedRunFinally",
];

pub fn pipeline_run_resource() -> ApiResource {
    ApiResource::from_gvk(&GroupVersionKind::gvk("tekton.dev", "v1beta1", KIND))
}

#[derive(Debug, Clone)]
pub struct TektonAdapter {
    label_key: String,
}

impl TektonAdapter {
    pub fn new(label_key: impl Into<String>) -> Self {
        Self {
            label_key: label_key.into(),
        }
    }
}

impl Default for TektonAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_LABEL_KEY)
    }
}

impl Adapter for TektonAdapter {
    fn kind(&self) -> RuntimeKind {
        RuntimeKind::Tekton
    }

    fn api_resource(&self) -> ApiResource {
        pipeline_run_resource()
    }

    fn label_selector(&self, workflow_id: &str) -> String {
        format!("{}={}", self.label_key, workflow_id)
    }

    fn normalize(&self, object: &DynamicObject) -> Result<Snapshot> {
        let body: PipelineRunBody = decode_body(object, KIND)?;
        let name = object_name(object);

        let workflow = workflow_state(&name, &body)?;

        let mut steps: Vec<StepSnapshot> = body
            .status
            .task_runs
            .iter()
            .flatten()
            .map(|(task_run, entry)| task_snapshot(task_run, entry))
            .collect();

        steps.extend(body.status.skipped_tasks.iter().flatten().map(|skipped| {
            StepSnapshot::new(skipped.name.clone(), true, StepState::new(StepStatus::Skipped))
        }));

        Ok(Snapshot {
            name,
            resource_version: object.metadata.resource_version.clone(),
            workflow,
            steps,
        })
    }
}

fn workflow_state(
    name: &str,
    body: &PipelineRunBody,
) -> std::result::Result<WorkflowState, NormalizeError> {
    let status = &body.status;
    let Some(condition) = status.succeeded_condition() else {
        let started = status.start_time.as_deref().is_some_and(|s| !s.is_empty());
        return Ok(if started {
            WorkflowState::running()
        } else {
            WorkflowState::pending()
        });
    };

    match condition.status.as_str() {
        "Unknown" => Ok(WorkflowState::running()),
        "True" => Ok(WorkflowState::succeeded()),
        "False" if was_cancelled(body, condition) => Ok(WorkflowState::failed(format!(
            "pipelinerun {name} was cancelled: {}",
            condition.message()
        ))),
        "False" => Ok(WorkflowState::failed(format!(
            "pipelinerun {name} has failed: {}",
            condition.message()
        ))),
        other => Err(NormalizeError::UnknownConditionStatus {
            entity: format!("pipelinerun {name}"),
            status: other.to_string(),
        }),
    }
}

fn was_cancelled(body: &PipelineRunBody, condition: &Condition) -> bool {
    let requested = body
        .spec
        .status
        .as_deref()
        .is_some_and(|s| CANCELLED_MARKERS.contains(&s));
    requested || CANCELLED_MARKERS.contains(&condition.reason())
}

fn task_snapshot(task_run: &str, entry: &PipelineRunTaskRunStatus) -> StepSnapshot {
    let name = if entry.pipeline_task_name.is_empty() {
        task_run.to_string()
    } else {
        entry.pipeline_task_name.clone()
    };

    let has_details = entry.status.as_ref().is_some_and(|s| s.has_steps());
    let state = task_state(&name, entry);

    StepSnapshot {
        name,
        has_details,
        state,
    }
}

fn task_state(
    name: &str,
    entry: &PipelineRunTaskRunStatus,
) -> std::result::Result<StepState, NormalizeError> {
    let Some(status) = entry.status.as_ref().filter(|s| s.has_started()) else {
        return Ok(StepState::new(StepStatus::Pending));
    };

    let Some(condition) = status.succeeded_condition() else {
        return Ok(StepState::new(StepStatus::Running));
    };

    match condition.status.as_str() {
        "Unknown" => Ok(StepState::new(StepStatus::Running)),
        "True" => Ok(StepState::new(StepStatus::Succeeded)),
        "False" => Ok(StepState::failed(format!(
            "step {name} failed with: {}",
            condition.message()
        ))),
        other => Err(NormalizeError::UnknownConditionStatus {
            entity: format!("task {name}"),
            status: other.to_string(),
        }),
    }
}
