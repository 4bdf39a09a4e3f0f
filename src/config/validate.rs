// src/config/validate.rs

//! Resolution of command line, environment and config file values into
//! validated settings.
//!
//! Precedence, highest first: CLI flag, environment variable (both handled
//! by `clap`), config file, built-in default.

use std::path::PathBuf;
use std::time::Duration;

use regex::Regex;
use reqwest::Url;

use crate::cli::{ApiArgs, ClusterArgs};
use crate::config::model::{ApiSection, ClusterSection, LabelSection, RawConfigFile};
use crate::errors::{ReporterError, Result};
use crate::orchestrator::{argo, tekton};
use crate::types::RuntimeKind;

/// Kubernetes label values: at most 63 characters, alphanumeric at both ends.
const LABEL_VALUE_PATTERN: &str = r"^([A-Za-z0-9]([-A-Za-z0-9_.]*[A-Za-z0-9])?)?$";

/// Kubernetes label keys: optional DNS subdomain prefix, then a name.
const LABEL_KEY_PATTERN: &str = r"^([a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*/)?[A-Za-z0-9]([-A-Za-z0-9_.]*[A-Za-z0-9])?$";

const MAX_LABEL_VALUE_LEN: usize = 63;

/// Status API client settings.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub url: Url,
    pub token: String,
    pub tls_reject_unauthorized: bool,
    pub timeout: Option<Duration>,
}

/// Orchestrator connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterSettings {
    pub runtime: RuntimeKind,
    pub namespace: String,
    pub in_cluster: bool,
    pub config_path: Option<PathBuf>,
    pub context_name: Option<String>,
    pub insecure_skip_tls_verify: bool,
}

/// Label keys used to select one workflow's resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSettings {
    pub argo: String,
    pub tekton: String,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            argo: argo::DEFAULT_LABEL_KEY.to_string(),
            tekton: tekton::DEFAULT_LABEL_KEY.to_string(),
        }
    }
}

/// Everything the `watch` command needs.
#[derive(Debug, Clone)]
pub struct WatchSettings {
    pub workflow_id: String,
    pub api: ApiSettings,
    pub cluster: ClusterSettings,
    pub labels: LabelSettings,
}

impl WatchSettings {
    pub fn resolve(
        workflow_id: Option<&str>,
        api: &ApiArgs,
        cluster: &ClusterArgs,
        file: &RawConfigFile,
    ) -> Result<Self> {
        Ok(Self {
            workflow_id: resolve_workflow_id(workflow_id)?,
            api: resolve_api(api, &file.api)?,
            cluster: resolve_cluster(cluster, &file.cluster)?,
            labels: resolve_labels(&file.labels)?,
        })
    }
}

/// Everything the one-shot `workflow` and `step` commands need.
#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub workflow_id: String,
    pub api: ApiSettings,
}

impl ReportSettings {
    pub fn resolve(workflow_id: Option<&str>, api: &ApiArgs, file: &RawConfigFile) -> Result<Self> {
        Ok(Self {
            workflow_id: resolve_workflow_id(workflow_id)?,
            api: resolve_api(api, &file.api)?,
        })
    }
}

pub fn resolve_workflow_id(workflow_id: Option<&str>) -> Result<String> {
    let id = non_empty(workflow_id)
        .ok_or_else(|| ReporterError::ConfigError("workflow id is required".to_string()))?;

    // The id ends up in a label selector.
    if id.len() > MAX_LABEL_VALUE_LEN || !compile(LABEL_VALUE_PATTERN)?.is_match(id) {
        return Err(ReporterError::ConfigError(format!(
            "workflow id '{id}' is not a valid label value"
        )));
    }

    Ok(id.to_string())
}

pub fn resolve_api(args: &ApiArgs, file: &ApiSection) -> Result<ApiSettings> {
    let token = non_empty(args.token.as_deref())
        .ok_or_else(|| ReporterError::ConfigError("API token is required".to_string()))?
        .to_string();

    let raw_url = non_empty(args.event_reporting_url.as_deref())
        .or_else(|| non_empty(file.event_reporting_url.as_deref()))
        .ok_or_else(|| {
            ReporterError::ConfigError("event reporting URL is required".to_string())
        })?;

    let url = Url::parse(raw_url).map_err(|err| {
        ReporterError::ConfigError(format!("invalid event reporting URL '{raw_url}': {err}"))
    })?;

    let timeout = match file.timeout_secs {
        Some(0) => {
            return Err(ReporterError::ConfigError(
                "[api].timeout_secs must be >= 1 (got 0)".to_string(),
            ));
        }
        Some(secs) => Some(Duration::from_secs(secs)),
        None => None,
    };

    Ok(ApiSettings {
        url,
        token,
        tls_reject_unauthorized: args
            .tls_reject_unauthorized
            .or(file.tls_reject_unauthorized)
            .unwrap_or(true),
        timeout,
    })
}

pub fn resolve_cluster(args: &ClusterArgs, file: &ClusterSection) -> Result<ClusterSettings> {
    let namespace = non_empty(args.cluster_namespace.as_deref())
        .or_else(|| non_empty(file.namespace.as_deref()))
        .ok_or_else(|| ReporterError::ConfigError("cluster namespace is required".to_string()))?
        .to_string();

    let config_path = args
        .config_path
        .clone()
        .or_else(|| non_empty(file.config_path.as_deref()).map(PathBuf::from));

    let context_name = non_empty(args.context_name.as_deref())
        .or_else(|| non_empty(file.context_name.as_deref()))
        .map(str::to_string);

    Ok(ClusterSettings {
        runtime: args.runtime.or(file.runtime).unwrap_or_default(),
        namespace,
        in_cluster: args.in_cluster.or(file.in_cluster).unwrap_or(false),
        config_path,
        context_name,
        insecure_skip_tls_verify: args.insecure_skip_tls_verify
            || file.insecure_skip_tls_verify.unwrap_or(false),
    })
}

pub fn resolve_labels(file: &LabelSection) -> Result<LabelSettings> {
    let defaults = LabelSettings::default();
    let key_pattern = compile(LABEL_KEY_PATTERN)?;

    let pick = |value: Option<&str>, default: String| -> Result<String> {
        match non_empty(value) {
            Some(key) if key_pattern.is_match(key) => Ok(key.to_string()),
            Some(key) => Err(ReporterError::ConfigError(format!(
                "'{key}' is not a valid label key"
            ))),
            None => Ok(default),
        }
    };

    Ok(LabelSettings {
        argo: pick(file.argo.as_deref(), defaults.argo)?,
        tekton: pick(file.tekton.as_deref(), defaults.tekton)?,
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|err| ReporterError::ConfigError(format!("invalid pattern '{pattern}': {err}")))
}
