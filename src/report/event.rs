// src/report/event.rs

//! JSON body accepted by the status API.

use std::fmt;

use serde::Serialize;

/// What a single event tells the status API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventAction {
    Start,
    Finish,
    /// Terminator required after every `finish`, regardless of outcome.
    FinishSystem,
    PreStepsSucceeded,
    /// Registers a step before its first real status.
    NewProgressStep,
    ReportStatus,
}

impl EventAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventAction::Start => "start",
            EventAction::Finish => "finish",
            EventAction::FinishSystem => "finish-system",
            EventAction::PreStepsSucceeded => "pre-steps-succeeded",
            EventAction::NewProgressStep => "new-progress-step",
            EventAction::ReportStatus => "report-status",
        }
    }
}

impl fmt::Display for EventAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One event. Empty fields are left out of the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowEvent {
    pub action: EventAction,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub error: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub status: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub step: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
}

impl WorkflowEvent {
    fn bare(action: EventAction) -> Self {
        Self {
            action,
            error: String::new(),
            status: String::new(),
            step: String::new(),
            name: String::new(),
        }
    }

    pub fn start() -> Self {
        Self::bare(EventAction::Start)
    }

    pub fn finish(error: Option<&str>) -> Self {
        Self {
            error: error.unwrap_or_default().to_string(),
            ..Self::bare(EventAction::Finish)
        }
    }

    pub fn finish_system() -> Self {
        Self::bare(EventAction::FinishSystem)
    }

    pub fn pre_steps_succeeded() -> Self {
        Self::bare(EventAction::PreStepsSucceeded)
    }

    pub fn new_progress_step(step: &str) -> Self {
        Self {
            name: step.to_string(),
            ..Self::bare(EventAction::NewProgressStep)
        }
    }

    pub fn report_status(step: &str, status: &str, error: Option<&str>) -> Self {
        Self {
            step: step.to_string(),
            status: status.to_string(),
            error: error.unwrap_or_default().to_string(),
            ..Self::bare(EventAction::ReportStatus)
        }
    }
}
