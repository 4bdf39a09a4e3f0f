// src/report/reporter.rs

//! Translation of canonical statuses into status API events.

use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::report::api::StatusApi;
use crate::report::event::WorkflowEvent;
use crate::types::{StepStatus, WorkflowStatus};

/// Reports workflow and step statuses of one workflow.
///
/// Every event is a single attempt; failures are logged with context and
/// returned to the caller, which decides whether they are fatal.
#[derive(Debug)]
pub struct Reporter<A: StatusApi> {
    api: A,
    workflow_id: String,
}

impl<A: StatusApi> Reporter<A> {
    pub fn new(api: A, workflow_id: impl Into<String>) -> Self {
        Self {
            api,
            workflow_id: workflow_id.into(),
        }
    }

    pub fn workflow_id(&self) -> &str {
        &self.workflow_id
    }

    /// - `Running` sends `start`.
    /// - `Succeeded` / `Failed` send `finish` (with the error text) and then
    ///   `finish-system`, which is sent even if `finish` failed.
    /// - `Pending` sends nothing.
    pub async fn report_workflow(&self, status: WorkflowStatus, error: Option<&str>) -> Result<()> {
        info!(
            workflow_id = %self.workflow_id,
            %status,
            error = error.unwrap_or_default(),
            "reporting workflow status"
        );

        match status {
            WorkflowStatus::Pending => {
                debug!(workflow_id = %self.workflow_id, "nothing to report for a pending workflow");
                Ok(())
            }
            WorkflowStatus::Running => {
                self.send(WorkflowEvent::start()).await?;
                info!(workflow_id = %self.workflow_id, "reported workflow start");
                Ok(())
            }
            WorkflowStatus::Succeeded | WorkflowStatus::Failed => {
                let finish = self.send(WorkflowEvent::finish(error)).await;
                let finish_system = self.send(WorkflowEvent::finish_system()).await;
                finish?;
                finish_system?;
                info!(workflow_id = %self.workflow_id, %status, "reported workflow finished");
                Ok(())
            }
        }
    }

    /// Send `report-status` for a step, preceded by `pre-steps-succeeded` and
    /// `new-progress-step` when `register` is set.
    pub async fn report_step(
        &self,
        step: &str,
        status: StepStatus,
        error: Option<&str>,
        register: bool,
    ) -> Result<()> {
        info!(
            workflow_id = %self.workflow_id,
            step,
            %status,
            error = error.unwrap_or_default(),
            "reporting workflow step status"
        );

        if register {
            self.send(WorkflowEvent::pre_steps_succeeded()).await?;
            self.send(WorkflowEvent::new_progress_step(step)).await?;
            debug!(workflow_id = %self.workflow_id, step, "registered step");
        }

        self.send(WorkflowEvent::report_status(step, status.as_str(), error))
            .await?;
        Ok(())
    }

    async fn send(&self, event: WorkflowEvent) -> Result<String> {
        let action = event.action;
        let step = event.step.clone();
        self.api.send(event).await.inspect_err(|err| {
            warn!(
                workflow_id = %self.workflow_id,
                %action,
                step = %step,
                error = %err,
                "failed to send event"
            );
        })
    }
}
