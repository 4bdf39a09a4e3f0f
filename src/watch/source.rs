// src/watch/source.rs

//! Pluggable watch source abstraction.
//!
//! The subscription manager opens event streams through a [`WatchSource`]
//! instead of a Kubernetes API handle. Production code uses
//! [`KubeWatchSource`]; tests substitute a finite, scripted sequence of
//! streams.

use std::future::Future;
use std::pin::Pin;

use futures::{Stream, StreamExt};
use kube::Client;
use kube::api::{Api, ApiResource, DynamicObject, WatchEvent, WatchParams};

use crate::errors::{ReporterError, Result};

/// A lazy, potentially infinite sequence of watch events.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<WatchEvent<DynamicObject>>> + Send>>;

/// Parameters of a single subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchRequest {
    pub label_selector: String,
    /// Resume cursor; `"0"` means "start from any recent version".
    pub resource_version: String,
}

/// Trait abstracting how watch subscriptions are opened.
pub trait WatchSource: Send {
    /// Open a new subscription. Restarting means calling this again.
    fn subscribe(
        &mut self,
        request: WatchRequest,
    ) -> Pin<Box<dyn Future<Output = Result<EventStream>> + Send + '_>>;
}

/// Watch source backed by the Kubernetes API.
#[derive(Clone)]
pub struct KubeWatchSource {
    api: Api<DynamicObject>,
}

impl std::fmt::Debug for KubeWatchSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeWatchSource").finish_non_exhaustive()
    }
}

impl KubeWatchSource {
    pub fn new(client: Client, namespace: &str, resource: &ApiResource) -> Self {
        Self {
            api: Api::namespaced_with(client, namespace, resource),
        }
    }
}

impl WatchSource for KubeWatchSource {
    fn subscribe(
        &mut self,
        request: WatchRequest,
    ) -> Pin<Box<dyn Future<Output = Result<EventStream>> + Send + '_>> {
        // Clone the handle so the future doesn't borrow `self` across `await`.
        let api = self.api.clone();

        Box::pin(async move {
            let params = WatchParams::default().labels(&request.label_selector);
            let stream = api.watch(&params, &request.resource_version).await?;
            let stream: EventStream = stream.map(|item| item.map_err(stream_error)).boxed();
            Ok(stream)
        })
    }
}

/// Objects that fail to deserialize break the contract with the API server;
/// anything else is treated as the stream being interrupted.
fn stream_error(err: kube::Error) -> ReporterError {
    match err {
        kube::Error::SerdeError(err) => ReporterError::DecodeError(err.to_string()),
        other => ReporterError::StreamError(other.to_string()),
    }
}
