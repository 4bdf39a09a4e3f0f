// src/engine/mod.rs

//! Reconciliation engine.
//!
//! This module ties together:
//! - the workflow state tracker
//! - the per-phase transition handlers
//! - the main loop that consumes watch events and drives the reporter
//!
//! The pure core state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

use crate::types::{StepStatus, WorkflowStatus};

/// A report the IO shell must send, produced by the pure core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportCommand {
    Workflow {
        status: WorkflowStatus,
        error: Option<String>,
    },
    Step {
        name: String,
        status: StepStatus,
        error: Option<String>,
        /// First move away from `Pending`: register the step before reporting.
        register: bool,
    },
}

impl ReportCommand {
    pub fn is_terminal_workflow_report(&self) -> bool {
        matches!(self, ReportCommand::Workflow { status, .. } if status.is_terminal())
    }
}

/// How a watch session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The workflow reached this terminal status and it was reported.
    Finished(WorkflowStatus),
    /// Cancellation was requested before the workflow finished.
    Cancelled,
}

pub mod core;
pub mod event_handlers;
pub mod runtime;

pub use core::Reconciler;
pub use event_handlers::CoreStep;
pub use runtime::{Runtime, watch_workflow};
