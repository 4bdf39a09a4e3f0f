// src/engine/runtime.rs

use std::fmt;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::engine::core::Reconciler;
use crate::engine::{ReportCommand, SessionOutcome};
use crate::errors::Result;
use crate::orchestrator::Adapter;
use crate::report::{Reporter, StatusApi};
use crate::types::WorkflowStatus;
use crate::watch::{Subscription, WatchSource};

/// Drives the reconciler in response to watched objects, and delegates
/// status delivery to a [`Reporter`].
///
/// This is a pure IO shell around [`Reconciler`], which contains all the
/// reporting semantics. This struct handles async IO: reading objects from
/// the subscription and sending the reports the core asks for.
pub struct Runtime<S: WatchSource, A: StatusApi> {
    core: Reconciler,
    adapter: Box<dyn Adapter>,
    subscription: Subscription<S>,
    reporter: Reporter<A>,
}

impl<S: WatchSource, A: StatusApi> fmt::Debug for Runtime<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .field("adapter", &self.adapter)
            .field("subscription", &self.subscription)
            .finish_non_exhaustive()
    }
}

impl<S: WatchSource, A: StatusApi> Runtime<S, A> {
    pub fn new(
        adapter: Box<dyn Adapter>,
        subscription: Subscription<S>,
        reporter: Reporter<A>,
    ) -> Self {
        Self {
            core: Reconciler::new(),
            adapter,
            subscription,
            reporter,
        }
    }

    pub fn reporter(&self) -> &Reporter<A> {
        &self.reporter
    }

    /// Main loop.
    ///
    /// - Opens the subscription (failure here is fatal).
    /// - Normalizes each object and feeds it into the core.
    /// - Sends the reports returned by the core.
    /// - Stops once the terminal workflow report was sent, or on cancel.
    pub async fn run(mut self) -> Result<SessionOutcome> {
        info!(
            workflow_id = %self.reporter.workflow_id(),
            runtime = %self.adapter.kind(),
            selector = %self.subscription.label_selector(),
            "status reporter runtime started"
        );

        self.subscription.open().await?;

        loop {
            let object = match self.subscription.next().await? {
                Some(object) => object,
                None => {
                    info!("watch cancelled; exiting");
                    return Ok(SessionOutcome::Cancelled);
                }
            };

            let snapshot = match self.adapter.normalize(&object) {
                Ok(snapshot) => snapshot,
                Err(err) if !err.is_fatal_for_session() => {
                    warn!(error = %err, "failed to normalize workflow status; skipping event");
                    continue;
                }
                Err(err) => return Err(err),
            };

            debug!(
                workflow = %snapshot.name,
                status = %snapshot.workflow.status,
                steps = snapshot.steps.len(),
                resource_version = snapshot.resource_version.as_deref().unwrap_or_default(),
                "runtime received snapshot"
            );

            let step = self.core.step(&snapshot);

            for command in step.commands {
                execute_command(&self.reporter, command).await?;
            }

            if !step.keep_running {
                let status = self.core.workflow().status();
                info!(%status, "workflow reached a terminal state; stopping runtime");
                return Ok(SessionOutcome::Finished(status));
            }
        }
    }
}

/// Send one report. Only the terminal workflow report is fatal on error.
///
/// Borrows just the reporter so the session future stays `Send`.
async fn execute_command<A: StatusApi>(reporter: &Reporter<A>, command: ReportCommand) -> Result<()> {
    let terminal = command.is_terminal_workflow_report();

    let result = match &command {
        ReportCommand::Workflow { status, error } => {
            reporter.report_workflow(*status, error.as_deref()).await
        }
        ReportCommand::Step {
            name,
            status,
            error,
            register,
        } => {
            reporter
                .report_step(name, *status, error.as_deref(), *register)
                .await
        }
    };

    match result {
        Ok(()) => Ok(()),
        Err(err) if terminal => {
            error!(error = %err, "failed to report terminal workflow status");
            Err(err)
        }
        Err(err) => {
            debug!(?command, error = %err, "report failed; continuing");
            Ok(())
        }
    }
}

/// Watch one workflow until it reaches a terminal state or `cancel` fires.
pub async fn watch_workflow<S, A>(
    adapter: Box<dyn Adapter>,
    source: S,
    api: A,
    workflow_id: &str,
    cancel: CancellationToken,
) -> Result<SessionOutcome>
where
    S: WatchSource,
    A: StatusApi,
{
    let selector = adapter.label_selector(workflow_id);
    let subscription = Subscription::new(source, selector, cancel);
    let reporter = Reporter::new(api, workflow_id);

    let outcome = Runtime::new(adapter, subscription, reporter).run().await?;

    match outcome {
        SessionOutcome::Finished(WorkflowStatus::Failed) => {
            info!(workflow_id, "workflow failed");
        }
        SessionOutcome::Finished(status) => {
            info!(workflow_id, %status, "workflow finished");
        }
        SessionOutcome::Cancelled => {
            info!(workflow_id, "watch cancelled before the workflow finished");
        }
    }

    Ok(outcome)
}
