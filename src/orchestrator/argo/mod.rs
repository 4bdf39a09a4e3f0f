// src/orchestrator/argo/mod.rs

//! Adapter for the DAG-execution controller (`argoproj.io` Workflows).
//!
//! Workflow state comes from `status.phase`; steps are the workflow's nodes,
//! filtered down to pod-backed ones (`Pod`, plus `Skipped` nodes that stand in
//! for pods whose `when` condition was false). Control-flow nodes such as
//! `Steps`, `DAG`, `StepGroup`, `TaskGroup` and `Retry` are ignored.

pub mod model;
pub mod packer;

use std::collections::{BTreeMap, HashSet};

use kube::api::{ApiResource, DynamicObject, GroupVersionKind};
use tracing::debug;

use crate::errors::{NormalizeError, Result};
use crate::orchestrator::{Adapter, Snapshot, StepSnapshot, StepState, WorkflowState};
use crate::orchestrator::{decode_body, object_name};
use crate::types::{RuntimeKind, StepStatus};

use model::{NodeStatus, WorkflowBody};

pub const DEFAULT_LABEL_KEY: &str = "io.codefresh.processId";

const KIND: &str = "Workflow";

/// Node types that correspond to real execution units.
const EXECUTION_NODE_TYPES: [&str; 2] = ["Pod", "Skipped"];

pub fn workflow_resource() -> ApiResource {
    ApiResource::from_gvk(&GroupVersionKind::gvk("argoproj.io", "v1alpha1", KIND))
}

#[derive(Debug, Clone)]
pub struct ArgoAdapter {
    label_key: String,
}

impl ArgoAdapter {
    pub fn new(label_key: impl Into<String>) -> Self {
        Self {
            label_key: label_key.into(),
        }
    }
}

impl Default for ArgoAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_LABEL_KEY)
    }
}

impl Adapter for ArgoAdapter {
    fn kind(&self) -> RuntimeKind {
        RuntimeKind::Argo
    }

    fn api_resource(&self) -> ApiResource {
        workflow_resource()
    }

    fn label_selector(&self, workflow_id: &str) -> String {
        format!("{}={}", self.label_key, workflow_id)
    }

    fn normalize(&self, object: &DynamicObject) -> Result<Snapshot> {
        let body: WorkflowBody = decode_body(object, KIND)?;
        let name = object_name(object);

        let workflow = workflow_state(&name, &body)?;
        let nodes = node_map(&name, &body)?;

        let steps: Vec<StepSnapshot> = nodes
            .values()
            .filter(|node| EXECUTION_NODE_TYPES.contains(&node.node_type()))
            .map(step_snapshot)
            .collect();
        log_shared_display_names(&name, &steps);

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
    body: &WorkflowBody,
) -> std::result::Result<WorkflowState, NormalizeError> {
    match body.status.phase.as_deref().unwrap_or_default() {
        "" | "Pending" => Ok(WorkflowState::pending()),
        "Running" => Ok(WorkflowState::running()),
        "Succeeded" => Ok(WorkflowState::succeeded()),
        "Failed" | "Error" => Ok(WorkflowState::failed(failure_message(name, body))),
        other => Err(NormalizeError::UnknownWorkflowPhase(other.to_string())),
    }
}

fn failure_message(name: &str, body: &WorkflowBody) -> String {
    let message = body.status.message.as_deref().unwrap_or_default();
    match body.spec.shutdown.as_deref().filter(|s| !s.is_empty()) {
        Some(strategy) => format!("workflow {name} was terminated ({strategy}): {message}"),
        None => format!("workflow {name} has failed: {message}"),
    }
}

fn node_map(name: &str, body: &WorkflowBody) -> Result<BTreeMap<String, NodeStatus>> {
    let status = &body.status;

    if let Some(nodes) = status.nodes.as_ref().filter(|n| !n.is_empty()) {
        return Ok(nodes.clone());
    }

    if let Some(encoded) = status.compressed_nodes.as_deref().filter(|s| !s.is_empty()) {
        return packer::decompress_nodes(encoded);
    }

    if let Some(version) = &status.offload_node_status_version {
        debug!(
            workflow = %name,
            offload_version = %version,
            "node status is offloaded; no steps available from this event"
        );
    }

    Ok(BTreeMap::new())
}

/// Steps are tracked by display name, so nodes sharing one (the same step
/// name under different parents) collapse into a single tracked step.
fn log_shared_display_names(workflow: &str, steps: &[StepSnapshot]) {
    let mut seen = HashSet::new();
    for step in steps {
        if !seen.insert(step.name.as_str()) {
            debug!(
                workflow = %workflow,
                step = %step.name,
                "display name shared by several nodes; tracked as one step"
            );
        }
    }
}

fn step_snapshot(node: &NodeStatus) -> StepSnapshot {
    let phase = node.phase();
    StepSnapshot {
        name: node.display_name().to_string(),
        has_details: node.has_started() || is_fulfilled(phase),
        state: step_state(node),
    }
}

fn is_fulfilled(phase: &str) -> bool {
    matches!(phase, "Succeeded" | "Failed" | "Error" | "Skipped" | "Omitted")
}

fn step_state(node: &NodeStatus) -> std::result::Result<StepState, NormalizeError> {
    match node.phase() {
        "Skipped" | "Omitted" => Ok(StepState::new(StepStatus::Skipped)),
        "Succeeded" => Ok(StepState::new(StepStatus::Succeeded)),
        "Failed" | "Error" => Ok(StepState::failed(format!(
            "step {} failed with: {}",
            node.display_name(),
            node.message.as_deref().unwrap_or_default()
        ))),
        "" | "Pending" | "Running" if !node.has_started() => Ok(StepState::new(StepStatus::Pending)),
        "" | "Pending" | "Running" => Ok(StepState::new(StepStatus::Running)),
        other => Err(NormalizeError::UnknownStepPhase {
            step: node.display_name().to_string(),
            phase: other.to_string(),
        }),
    }
}
