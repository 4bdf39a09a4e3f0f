// src/report/api.rs

//! Pluggable status API transport.
//!
//! The reporter talks to a [`StatusApi`] instead of an HTTP client directly.
//! This makes it easy to swap in a recording fake in tests while keeping the
//! production implementation in [`HttpStatusApi`].

use std::future::Future;
use std::pin::Pin;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Url};
use tracing::debug;

use crate::config::ApiSettings;
use crate::errors::{ReporterError, Result};
use crate::report::event::WorkflowEvent;

/// Trait abstracting how a single event reaches the status API.
///
/// One call is one best-effort attempt: implementations never retry.
pub trait StatusApi: Send + Sync {
    /// Deliver one event, returning the response body on success.
    ///
    /// Transport failures and responses with status >= 400 are errors.
    fn send(
        &self,
        event: WorkflowEvent,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + '_>>;
}

/// HTTP implementation used in production.
#[derive(Debug, Clone)]
pub struct HttpStatusApi {
    client: Client,
    url: Url,
}

impl HttpStatusApi {
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        let mut headers = HeaderMap::new();

        let mut auth = HeaderValue::from_str(&settings.token).map_err(|_| {
            ReporterError::ConfigError("API token contains invalid header characters".to_string())
        })?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("status-reporter/", env!("CARGO_PKG_VERSION"))),
        );

        let mut builder = Client::builder()
            .default_headers(headers)
            .danger_accept_invalid_certs(!settings.tls_reject_unauthorized);

        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            url: settings.url.clone(),
        })
    }
}

impl StatusApi for HttpStatusApi {
    fn send(
        &self,
        event: WorkflowEvent,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + '_>> {
        Box::pin(async move {
            let response = self
                .client
                .post(self.url.clone())
                .json(&event)
                .send()
                .await?;

            let status = response.status();
            let body = response.text().await?;

            if status.as_u16() >= 400 {
                return Err(ReporterError::ApiError {
                    status: status.as_u16(),
                    body,
                });
            }

            debug!(action = %event.action, %status, response = %body, "event delivered");
            Ok(body)
        })
    }
}
