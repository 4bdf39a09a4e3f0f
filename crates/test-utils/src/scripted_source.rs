use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use futures::StreamExt;
use kube::api::{DynamicObject, WatchEvent};
use serde_json::json;

use status_reporter::errors::{ReporterError, Result};
use status_reporter::watch::{EventStream, WatchRequest, WatchSource};

/// One scripted subscription.
pub enum Session {
    /// `subscribe` itself fails.
    Fail(ReporterError),
    /// The stream yields `items`, then either ends or stays open forever.
    Events {
        items: Vec<Result<WatchEvent<DynamicObject>>>,
        hold_open: bool,
    },
}

/// A fake watch source that:
/// - hands out one scripted session per `subscribe` call
/// - records every request it receives
/// - fails once the script is exhausted.
#[derive(Default)]
pub struct ScriptedWatchSource {
    sessions: VecDeque<Session>,
    requests: Arc<Mutex<Vec<WatchRequest>>>,
}

impl ScriptedWatchSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// A session whose stream ends after `items`.
    pub fn session(mut self, items: Vec<Result<WatchEvent<DynamicObject>>>) -> Self {
        self.sessions.push_back(Session::Events {
            items,
            hold_open: false,
        });
        self
    }

    /// A session whose stream stays open after `items`.
    pub fn open_session(mut self, items: Vec<Result<WatchEvent<DynamicObject>>>) -> Self {
        self.sessions.push_back(Session::Events {
            items,
            hold_open: true,
        });
        self
    }

    pub fn failing_session(mut self, err: ReporterError) -> Self {
        self.sessions.push_back(Session::Fail(err));
        self
    }

    /// Shared handle to the recorded requests.
    pub fn requests(&self) -> Arc<Mutex<Vec<WatchRequest>>> {
        Arc::clone(&self.requests)
    }
}

impl WatchSource for ScriptedWatchSource {
    fn subscribe(
        &mut self,
        request: WatchRequest,
    ) -> Pin<Box<dyn Future<Output = Result<EventStream>> + Send + '_>> {
        self.requests.lock().unwrap().push(request);
        let session = self.sessions.pop_front();

        Box::pin(async move {
            match session {
                None => Err(ReporterError::Other(anyhow::anyhow!(
                    "no more scripted watch sessions"
                ))),
                Some(Session::Fail(err)) => Err(err),
                Some(Session::Events { items, hold_open }) => {
                    let stream = futures::stream::iter(items);
                    let stream: EventStream = if hold_open {
                        stream.chain(futures::stream::pending()).boxed()
                    } else {
                        stream.boxed()
                    };
                    Ok(stream)
                }
            }
        })
    }
}

pub fn added(object: DynamicObject) -> Result<WatchEvent<DynamicObject>> {
    Ok(WatchEvent::Added(object))
}

pub fn modified(object: DynamicObject) -> Result<WatchEvent<DynamicObject>> {
    Ok(WatchEvent::Modified(object))
}

pub fn bookmark(resource_version: &str) -> Result<WatchEvent<DynamicObject>> {
    let event = serde_json::from_value(json!({
        "type": "BOOKMARK",
        "object": {
            "apiVersion": "argoproj.io/v1alpha1",
            "kind": "Workflow",
            "metadata": { "resourceVersion": resource_version },
        },
    }))
    .expect("bookmark event");
    Ok(event)
}

/// An `ERROR` watch event with the given HTTP code.
pub fn watch_error(code: u16, message: &str) -> Result<WatchEvent<DynamicObject>> {
    let event = serde_json::from_value(json!({
        "type": "ERROR",
        "object": {
            "kind": "Status",
            "apiVersion": "v1",
            "metadata": {},
            "status": "Failure",
            "message": message,
            "reason": if code == 410 { "Expired" } else { "InternalError" },
            "code": code,
        },
    }))
    .expect("error event");
    Ok(event)
}

pub fn interrupted(message: &str) -> Result<WatchEvent<DynamicObject>> {
    Err(ReporterError::StreamError(message.to_string()))
}
