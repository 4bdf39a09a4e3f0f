use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use status_reporter::errors::{ReporterError, Result};
use status_reporter::report::{EventAction, StatusApi, WorkflowEvent};

/// A fake status API that:
/// - records every event it is asked to send (including failed ones)
/// - fails with HTTP 500 for the configured actions.
#[derive(Debug, Clone, Default)]
pub struct RecordingStatusApi {
    events: Arc<Mutex<Vec<WorkflowEvent>>>,
    failing: Arc<Mutex<HashSet<EventAction>>>,
}

impl RecordingStatusApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every send of `action` fail.
    pub fn fail_on(self, action: EventAction) -> Self {
        self.failing.lock().unwrap().insert(action);
        self
    }

    pub fn events(&self) -> Vec<WorkflowEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn actions(&self) -> Vec<EventAction> {
        self.events().into_iter().map(|e| e.action).collect()
    }

    /// `(step, status)` of every `report-status` event, in order.
    pub fn step_reports(&self) -> Vec<(String, String)> {
        self.events()
            .into_iter()
            .filter(|e| e.action == EventAction::ReportStatus)
            .map(|e| (e.step, e.status))
            .collect()
    }

    pub fn count(&self, action: EventAction) -> usize {
        self.actions().into_iter().filter(|a| *a == action).count()
    }
}

impl StatusApi for RecordingStatusApi {
    fn send(
        &self,
        event: WorkflowEvent,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + '_>> {
        let events = Arc::clone(&self.events);
        let fail = self.failing.lock().unwrap().contains(&event.action);

        Box::pin(async move {
            let action = event.action;
            events.lock().unwrap().push(event);
            if fail {
                return Err(ReporterError::ApiError {
                    status: 500,
                    body: format!("{action} rejected"),
                });
            }
            Ok("{}".to_string())
        })
    }
}
