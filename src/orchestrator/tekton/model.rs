// src/orchestrator/tekton/model.rs

//! The subset of the `tekton.dev/v1beta1` `PipelineRun` object we read.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::de::IgnoredAny;

/// Everything of a `PipelineRun` except `apiVersion`, `kind` and `metadata`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PipelineRunBody {
    #[serde(default)]
    pub spec: PipelineRunSpec,

    #[serde(default)]
    pub status: PipelineRunStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PipelineRunSpec {
    /// `Cancelled`, `CancelledRunFinally`, `StoppedRunFinally`, ...
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineRunStatus {
    #[serde(default)]
    pub conditions: Option<Vec<Condition>>,

    #[serde(default)]
    pub start_time: Option<String>,

    /// Keyed by TaskRun name.
    #[serde(default)]
    pub task_runs: Option<BTreeMap<String, PipelineRunTaskRunStatus>>,

    #[serde(default)]
    pub skipped_tasks: Option<Vec<SkippedTask>>,
}

impl PipelineRunStatus {
    pub fn succeeded_condition(&self) -> Option<&Condition> {
        succeeded_condition(self.conditions.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineRunTaskRunStatus {
    #[serde(default)]
    pub pipeline_task_name: String,

    #[serde(default)]
    pub status: Option<TaskRunStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRunStatus {
    #[serde(default)]
    pub conditions: Option<Vec<Condition>>,

    #[serde(default)]
    pub start_time: Option<String>,

    /// Container steps of the TaskRun's pod; only their presence matters.
    #[serde(default)]
    pub steps: Option<Vec<IgnoredAny>>,
}

impl TaskRunStatus {
    pub fn succeeded_condition(&self) -> Option<&Condition> {
        succeeded_condition(self.conditions.as_deref())
    }

    pub fn has_started(&self) -> bool {
        self.start_time.as_deref().is_some_and(|s| !s.is_empty())
    }

    pub fn has_steps(&self) -> bool {
        self.steps.as_ref().is_some_and(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SkippedTask {
    pub name: String,
}

/// Knative-style status condition.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Condition {
    #[serde(default, rename = "type")]
    pub condition_type: String,

    /// `True`, `False` or `Unknown`.
    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub reason: Option<String>,

    #[serde(default)]
    pub message: Option<String>,
}

impl Condition {
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }

    pub fn reason(&self) -> &str {
        self.reason.as_deref().unwrap_or_default()
    }
}

/// The `Succeeded` condition, falling back to the first one listed.
fn succeeded_condition(conditions: Option<&[Condition]>) -> Option<&Condition> {
    let conditions = conditions?;
    conditions
        .iter()
        .find(|c| c.condition_type == "Succeeded")
        .or_else(|| conditions.first())
}
