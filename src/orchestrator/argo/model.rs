// src/orchestrator/argo/model.rs

//! The subset of the `argoproj.io/v1alpha1` `Workflow` object we read.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Everything of a `Workflow` except `apiVersion`, `kind` and `metadata`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkflowBody {
    #[serde(default)]
    pub spec: WorkflowSpec,

    #[serde(default)]
    pub status: WorkflowStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkflowSpec {
    /// Shutdown strategy (`Terminate` / `Stop`) requested by a user.
    #[serde(default)]
    pub shutdown: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStatus {
    #[serde(default)]
    pub phase: Option<String>,

    #[serde(default)]
    pub message: Option<String>,

    /// Keyed by node ID.
    #[serde(default)]
    pub nodes: Option<BTreeMap<String, NodeStatus>>,

    /// Base64 + gzip encoded JSON of `nodes`, used for large workflows.
    #[serde(default)]
    pub compressed_nodes: Option<String>,

    /// Set when the controller stores node status outside the object.
    #[serde(default)]
    pub offload_node_status_version: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStatus {
    #[serde(default)]
    pub display_name: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default, rename = "type")]
    pub node_type: Option<String>,

    #[serde(default)]
    pub phase: Option<String>,

    #[serde(default)]
    pub started_at: Option<String>,

    #[serde(default)]
    pub message: Option<String>,
}

impl NodeStatus {
    /// Name shown to users; falls back to the fully qualified node name.
    pub fn display_name(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.name.as_deref())
            .unwrap_or_default()
    }

    pub fn phase(&self) -> &str {
        self.phase.as_deref().unwrap_or_default()
    }

    pub fn node_type(&self) -> &str {
        self.node_type.as_deref().unwrap_or_default()
    }

    pub fn has_started(&self) -> bool {
        self.started_at.as_deref().is_some_and(|s| !s.is_empty())
    }
}
