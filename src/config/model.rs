// src/config/model.rs

use serde::Deserialize;

use crate::types::RuntimeKind;

/// Optional configuration file as read from TOML.
///
/// ```toml
/// [api]
/// event_reporting_url = "https://status.example.com/api/events"
/// tls_reject_unauthorized = true
/// timeout_secs = 30
///
/// [cluster]
/// runtime = "tekton"
/// namespace = "pipelines"
/// in_cluster = false
/// config_path = "/home/ci/.kube/config"
/// context_name = "build-cluster"
///
/// [labels]
/// argo = "io.codefresh.processId"
/// tekton = "tekton.dev/pipeline"
/// ```
///
/// Every value can also come from the command line or the environment,
/// which take precedence. Secrets (the API token) are never read from here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub api: ApiSection,

    #[serde(default)]
    pub cluster: ClusterSection,

    #[serde(default)]
    pub labels: LabelSection,
}

/// `[api]` section: the status API client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiSection {
    /// Endpoint receiving the workflow events.
    #[serde(default)]
    pub event_reporting_url: Option<String>,

    /// Verify the status API certificate. Defaults to `true`.
    #[serde(default)]
    pub tls_reject_unauthorized: Option<bool>,

    /// Per-request timeout. No timeout when unset.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// `[cluster]` section: where the workflow runs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClusterSection {
    #[serde(default)]
    pub runtime: Option<RuntimeKind>,

    #[serde(default)]
    pub namespace: Option<String>,

    #[serde(default)]
    pub in_cluster: Option<bool>,

    #[serde(default)]
    pub config_path: Option<String>,

    #[serde(default)]
    pub context_name: Option<String>,

    #[serde(default)]
    pub insecure_skip_tls_verify: Option<bool>,
}

/// `[labels]` section: label keys identifying one workflow's resources.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LabelSection {
    #[serde(default)]
    pub argo: Option<String>,

    #[serde(default)]
    pub tekton: Option<String>,
}
