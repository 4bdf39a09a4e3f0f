// src/watch/subscription.rs

//! Resumable watch subscription.
//!
//! [`Subscription`] turns a series of finite server-side watch streams into
//! one logical sequence of objects. When a stream closes without
//! cancellation it is re-opened from the last observed resource version.

use std::fmt;

use futures::StreamExt;
use kube::api::{DynamicObject, WatchEvent};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::errors::{ReporterError, Result};
use crate::watch::source::{EventStream, WatchRequest, WatchSource};

/// Resource version meaning "any recent version".
pub const ANY_VERSION: &str = "0";

/// HTTP status the API server uses for an expired resume cursor.
const GONE: u16 = 410;

pub struct Subscription<S: WatchSource> {
    source: S,
    label_selector: String,
    resource_version: String,
    stream: Option<EventStream>,
    cancel: CancellationToken,
    restarts: u64,
}

impl<S: WatchSource> fmt::Debug for Subscription<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("label_selector", &self.label_selector)
            .field("resource_version", &self.resource_version)
            .field("open", &self.stream.is_some())
            .field("restarts", &self.restarts)
            .finish_non_exhaustive()
    }
}

impl<S: WatchSource> Subscription<S> {
    pub fn new(source: S, label_selector: impl Into<String>, cancel: CancellationToken) -> Self {
        Self {
            source,
            label_selector: label_selector.into(),
            resource_version: ANY_VERSION.to_string(),
            stream: None,
            cancel,
            restarts: 0,
        }
    }

    pub fn label_selector(&self) -> &str {
        &self.label_selector
    }

    /// Last resource version observed, used as the resume cursor.
    pub fn resource_version(&self) -> &str {
        &self.resource_version
    }

    /// Number of times the stream has been re-opened.
    pub fn restarts(&self) -> u64 {
        self.restarts
    }

    /// Open the initial subscription. Errors here are fatal to the session.
    pub async fn open(&mut self) -> Result<()> {
        info!(selector = %self.label_selector, "opening watch subscription");
        let stream = self.subscribe().await?;
        self.stream = Some(stream);
        Ok(())
    }

    /// Wait for the next object.
    ///
    /// Returns `Ok(None)` once cancellation is requested; no further objects
    /// are produced after that.
    pub async fn next(&mut self) -> Result<Option<DynamicObject>> {
        loop {
            if self.cancel.is_cancelled() {
                return Ok(None);
            }

            if self.stream.is_none() {
                self.reopen().await?;
                continue;
            }

            let item = {
                let Some(stream) = self.stream.as_mut() else {
                    continue;
                };
                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => None,
                    item = stream.next() => Some(item),
                }
            };

            let item = match item {
                None => {
                    debug!("cancellation requested; ending watch");
                    self.stream = None;
                    return Ok(None);
                }
                Some(item) => item,
            };

            match item {
                None => {
                    debug!(
                        resource_version = %self.resource_version,
                        "watch stream closed"
                    );
                    self.stream = None;
                }
                Some(Ok(event)) => {
                    if let Some(object) = self.handle_event(event)? {
                        return Ok(Some(object));
                    }
                }
                Some(Err(ReporterError::StreamError(msg))) => {
                    warn!(error = %msg, "watch stream interrupted");
                    self.stream = None;
                }
                Some(Err(err)) => return Err(err),
            }
        }
    }

    fn handle_event(&mut self, event: WatchEvent<DynamicObject>) -> Result<Option<DynamicObject>> {
        match event {
            WatchEvent::Added(object)
            | WatchEvent::Modified(object)
            | WatchEvent::Deleted(object) => {
                self.advance(object.metadata.resource_version.as_deref());
                Ok(Some(object))
            }
            WatchEvent::Bookmark(bookmark) => {
                debug!(
                    resource_version = %bookmark.metadata.resource_version,
                    "watch bookmark"
                );
                self.advance(Some(&bookmark.metadata.resource_version));
                Ok(None)
            }
            WatchEvent::Error(err) if err.code == GONE => {
                warn!(
                    resource_version = %self.resource_version,
                    message = %err.message,
                    "resume cursor expired; restarting from any version"
                );
                self.resource_version = ANY_VERSION.to_string();
                self.stream = None;
                Ok(None)
            }
            WatchEvent::Error(err) => Err(ReporterError::WatchRejected {
                code: err.code,
                message: err.message,
            }),
        }
    }

    fn advance(&mut self, resource_version: Option<&str>) {
        if let Some(version) = resource_version.filter(|v| !v.is_empty()) {
            self.resource_version = version.to_string();
        }
    }

    async fn reopen(&mut self) -> Result<()> {
        self.restarts += 1;
        info!(
            resource_version = %self.resource_version,
            restarts = self.restarts,
            "restarting watch"
        );
        let stream = self.subscribe().await?;
        self.stream = Some(stream);
        Ok(())
    }

    async fn subscribe(&mut self) -> Result<EventStream> {
        let request = WatchRequest {
            label_selector: self.label_selector.clone(),
            resource_version: self.resource_version.clone(),
        };
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                let empty: EventStream = Box::pin(futures::stream::empty());
                Ok(empty)
            }
            stream = self.source.subscribe(request) => stream,
        }
    }
}
