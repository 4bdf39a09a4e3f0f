// src/orchestrator/mod.rs

//! Orchestrator adapters.
//!
//! Each supported orchestrator gets one [`Adapter`] that knows:
//! - which custom resource to watch and how to select one workflow's objects
//! - how to normalize a native object into a canonical [`Snapshot`]
//!
//! Adapters are pure: no IO and no state retained between calls. The runtime
//! registry [`adapter_for`] picks the variant named by configuration.

pub mod argo;
pub mod snapshot;
pub mod tekton;

use std::fmt;

use kube::api::{ApiResource, DynamicObject};

use crate::config::LabelSettings;
use crate::errors::{ReporterError, Result};
use crate::types::RuntimeKind;

pub use argo::ArgoAdapter;
pub use snapshot::{Snapshot, StepSnapshot, StepState, WorkflowState};
pub use tekton::TektonAdapter;

/// Shared interface of all orchestrator adapters.
pub trait Adapter: Send + Sync + fmt::Debug {
    fn kind(&self) -> RuntimeKind;

    /// The custom resource holding one pipeline run.
    fn api_resource(&self) -> ApiResource;

    /// Label selector matching exactly the given workflow's resources.
    fn label_selector(&self, workflow_id: &str) -> String;

    /// Normalize a native object.
    ///
    /// Returns [`ReporterError::DecodeError`] when the object is not of the
    /// expected shape, and [`ReporterError::Normalize`] when the workflow is in
    /// a state the canonical vocabulary cannot express.
    fn normalize(&self, object: &DynamicObject) -> Result<Snapshot>;
}

/// Build the adapter for the given runtime.
pub fn adapter_for(kind: RuntimeKind, labels: &LabelSettings) -> Box<dyn Adapter> {
    match kind {
        RuntimeKind::Argo => Box::new(ArgoAdapter::new(labels.argo.clone())),
        RuntimeKind::Tekton => Box::new(TektonAdapter::new(labels.tekton.clone())),
    }
}

/// Check that a watch event carries the kind the adapter expects, then decode
/// its body into the adapter's native model.
pub(crate) fn decode_body<T>(object: &DynamicObject, expected_kind: &str) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    if let Some(types) = &object.types {
        if types.kind != expected_kind {
            return Err(ReporterError::DecodeError(format!(
                "expected a {expected_kind}, got a {}",
                types.kind
            )));
        }
    }

    serde_json::from_value(object.data.clone()).map_err(|err| {
        ReporterError::DecodeError(format!(
            "{expected_kind} {}: {err}",
            object_name(object)
        ))
    })
}

pub(crate) fn object_name(object: &DynamicObject) -> String {
    object.metadata.name.clone().unwrap_or_default()
}
