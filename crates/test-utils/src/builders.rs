use std::io::Write;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flate2::Compression;
use flate2::write::GzEncoder;
use kube::api::DynamicObject;
use serde_json::{Map, Value, json};

use status_reporter::orchestrator::argo::workflow_resource;
use status_reporter::orchestrator::tekton::pipeline_run_resource;

pub const NAMESPACE: &str = "pipelines";
pub const START_TIME: &str = "2024-05-01T10:00:00Z";

fn with_metadata(mut object: DynamicObject, resource_version: &str) -> DynamicObject {
    object.metadata.resource_version = Some(resource_version.to_string());
    object
}

/// Builder for `argoproj.io` `Workflow` objects.
pub struct ArgoWorkflowBuilder {
    name: String,
    resource_version: String,
    phase: Option<String>,
    started: bool,
    message: Option<String>,
    shutdown: Option<String>,
    nodes: Map<String, Value>,
    compress: bool,
}

impl ArgoWorkflowBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            resource_version: "1".to_string(),
            phase: None,
            started: false,
            message: None,
            shutdown: None,
            nodes: Map::new(),
            compress: false,
        }
    }

    pub fn resource_version(mut self, rv: &str) -> Self {
        self.resource_version = rv.to_string();
        self
    }

    /// Workflow phase; `Running` and terminal phases also set `startedAt`.
    pub fn phase(mut self, phase: &str) -> Self {
        self.started = !matches!(phase, "" | "Pending");
        self.phase = Some(phase.to_string());
        self
    }

    pub fn message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }

    pub fn shutdown(mut self, strategy: &str) -> Self {
        self.shutdown = Some(strategy.to_string());
        self
    }

    /// Add a node. `phase` of `None` leaves the node without phase or start
    /// time.
    pub fn node(mut self, display_name: &str, node_type: &str, phase: Option<&str>) -> Self {
        let id = format!("{}-{}", self.name, self.nodes.len());
        let mut node = json!({
            "id": id,
            "name": format!("{}.{}", self.name, display_name),
            "displayName": display_name,
            "type": node_type,
        });
        if let Some(phase) = phase {
            node["phase"] = json!(phase);
            if phase != "Pending" {
                node["startedAt"] = json!(START_TIME);
            }
        }
        self.nodes.insert(id, node);
        self
    }

    pub fn pod(self, display_name: &str, phase: Option<&str>) -> Self {
        self.node(display_name, "Pod", phase)
    }

    /// A failed pod node with the given message.
    pub fn failed_pod(mut self, display_name: &str, message: &str) -> Self {
        self = self.pod(display_name, Some("Failed"));
        let id = format!("{}-{}", self.name, self.nodes.len() - 1);
        if let Some(node) = self.nodes.get_mut(&id) {
            node["message"] = json!(message);
        }
        self
    }

    /// Ship the nodes as `status.compressedNodes` instead of `status.nodes`.
    pub fn compressed(mut self) -> Self {
        self.compress = true;
        self
    }

    pub fn build(self) -> DynamicObject {
        let mut status = Map::new();
        if let Some(phase) = &self.phase {
            status.insert("phase".into(), json!(phase));
        }
        if self.started {
            status.insert("startedAt".into(), json!(START_TIME));
        }
        if let Some(message) = &self.message {
            status.insert("message".into(), json!(message));
        }
        if !self.nodes.is_empty() {
            let nodes = Value::Object(self.nodes.clone());
            if self.compress {
                status.insert("compressedNodes".into(), json!(compress(&nodes)));
            } else {
                status.insert("nodes".into(), nodes);
            }
        }

        let mut spec = Map::new();
        if let Some(shutdown) = &self.shutdown {
            spec.insert("shutdown".into(), json!(shutdown));
        }

        let object = DynamicObject::new(&self.name, &workflow_resource())
            .within(NAMESPACE)
            .data(json!({ "spec": spec, "status": status }));
        with_metadata(object, &self.resource_version)
    }
}

/// Gzip and base64-encode a JSON value the way the controller packs nodes.
pub fn compress(value: &Value) -> String {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(value.to_string().as_bytes())
        .expect("gzip write");
    let bytes = encoder.finish().expect("gzip finish");
    STANDARD.encode(bytes)
}

/// Builder for `tekton.dev` `PipelineRun` objects.
pub struct TektonPipelineRunBuilder {
    name: String,
    resource_version: String,
    started: bool,
    condition: Option<Value>,
    spec_status: Option<String>,
    task_runs: Map<String, Value>,
    skipped: Vec<Value>,
}

impl TektonPipelineRunBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            resource_version: "1".to_string(),
            started: false,
            condition: None,
            spec_status: None,
            task_runs: Map::new(),
            skipped: Vec::new(),
        }
    }

    pub fn resource_version(mut self, rv: &str) -> Self {
        self.resource_version = rv.to_string();
        self
    }

    pub fn started(mut self) -> Self {
        self.started = true;
        self
    }

    /// `Succeeded` condition with the given status (`True`/`False`/`Unknown`).
    pub fn condition(mut self, status: &str, reason: &str, message: &str) -> Self {
        self.started = true;
        self.condition = Some(json!({
            "type": "Succeeded",
            "status": status,
            "reason": reason,
            "message": message,
        }));
        self
    }

    pub fn spec_status(mut self, status: &str) -> Self {
        self.spec_status = Some(status.to_string());
        self
    }

    /// Add a task run. `condition` of `None` means started but no condition
    /// yet; `started = false` leaves the task run without status details.
    pub fn task_run(
        mut self,
        task: &str,
        started: bool,
        condition: Option<(&str, &str)>,
    ) -> Self {
        let key = format!("{}-{}", self.name, task);
        let mut entry = json!({ "pipelineTaskName": task });
        if started {
            let mut status = json!({
                "startTime": START_TIME,
                "podName": format!("{key}-pod"),
                "steps": [{ "name": "run" }],
            });
            if let Some((cond_status, message)) = condition {
                status["conditions"] = json!([{
                    "type": "Succeeded",
                    "status": cond_status,
                    "message": message,
                }]);
            }
            entry["status"] = status;
        }
        self.task_runs.insert(key, entry);
        self
    }

    pub fn skipped_task(mut self, task: &str) -> Self {
        self.skipped
            .push(json!({ "name": task, "reason": "When Expressions evaluated to false" }));
        self
    }

    pub fn build(self) -> DynamicObject {
        let mut status = Map::new();
        if self.started {
            status.insert("startTime".into(), json!(START_TIME));
        }
        if let Some(condition) = &self.condition {
            status.insert("conditions".into(), json!([condition]));
        }
        if !self.task_runs.is_empty() {
            status.insert("taskRuns".into(), Value::Object(self.task_runs.clone()));
        }
        if !self.skipped.is_empty() {
            status.insert("skippedTasks".into(), json!(self.skipped));
        }

        let mut spec = Map::new();
        if let Some(spec_status) = &self.spec_status {
            spec.insert("status".into(), json!(spec_status));
        }

        let object = DynamicObject::new(&self.name, &pipeline_run_resource())
            .within(NAMESPACE)
            .data(json!({ "spec": spec, "status": status }));
        with_metadata(object, &self.resource_version)
    }
}
