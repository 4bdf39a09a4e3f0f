// src/errors.rs

//! Crate-wide error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReporterError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Kubernetes client error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Kubernetes config error: {0}")]
    KubeConfigError(String),

    #[error("Watch stream error: {0}")]
    StreamError(String),

    #[error("Watch rejected by API server ({code}): {message}")]
    WatchRejected { code: u16, message: String },

    #[error("Unexpected object in watch event: {0}")]
    DecodeError(String),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error("HTTP transport error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Status API returned {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReporterError {
    /// Whether this error must stop the current watch session.
    ///
    /// Normalization errors only invalidate the event that produced them.
    pub fn is_fatal_for_session(&self) -> bool {
        !matches!(self, ReporterError::Normalize(_))
    }
}

/// A native state that cannot be mapped onto the canonical vocabulary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("unrecognized workflow phase '{0}'")]
    UnknownWorkflowPhase(String),

    #[error("unrecognized condition status '{status}' on {entity}")]
    UnknownConditionStatus { entity: String, status: String },

    #[error("unrecognized phase '{phase}' for step '{step}'")]
    UnknownStepPhase { step: String, phase: String },
}

pub type Result<T> = std::result::Result<T, ReporterError>;
