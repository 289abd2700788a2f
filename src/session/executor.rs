use std::future::Future;
use std::sync::{Arc, Mutex};

use tracing::{debug, error, info, warn};

use super::notify::Level;
use super::workflow::{Ticket, Workflow};
use super::{lock, Session, SessionState};
use crate::error::{RemoteFailure, ValidationFailure};

/// How an action invocation ended. Failures stop here; nothing is rethrown.
#[derive(Debug)]
pub enum Outcome {
    Completed,
    Rejected(ValidationFailure),
    Failed(RemoteFailure),
    /// A newer request (or a cancel) made this response stale.
    Superseded,
}

impl Outcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed)
    }
}

/// Returns the workflow to idle if the action future is dropped mid-call.
pub(super) struct Flight {
    inner: Arc<Mutex<SessionState>>,
    ticket: Ticket,
    armed: bool,
}

impl Flight {
    /// Whether this request is still the latest for its workflow.
    pub(super) fn is_current(&self) -> bool {
        lock(&self.inner).workflows.is_current(self.ticket)
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for Flight {
    fn drop(&mut self) {
        if self.armed {
            warn!(workflow = %self.ticket.workflow, request_id = %self.ticket.request_id, "request dropped before completion");
            let mut state = lock(&self.inner);
            if state.workflows.abandon(self.ticket) {
                state.notifications.dismiss(self.ticket.workflow);
            }
        }
    }
}

impl Session {
    /// validate → mark running → call → write back → settle → notify.
    pub(super) async fn run<Req, Resp, Call, Fut, Apply>(
        &self,
        workflow: Workflow,
        prepare: impl FnOnce(&SessionState) -> Result<Req, ValidationFailure>,
        call: Call,
        apply: Apply,
    ) -> Outcome
    where
        Call: FnOnce(Req) -> Fut,
        Fut: Future<Output = Result<Resp, RemoteFailure>>,
        Apply: FnOnce(&mut SessionState, Resp),
    {
        let (request, flight) = match self.begin(workflow, prepare) {
            Ok(started) => started,
            Err(rejected) => return rejected,
        };
        let result = call(request).await;
        self.finish(flight, result, apply)
    }

    /// Validates and marks the workflow running. On rejection nothing is
    /// started and the returned outcome is final.
    pub(super) fn begin<Req>(
        &self,
        workflow: Workflow,
        prepare: impl FnOnce(&SessionState) -> Result<Req, ValidationFailure>,
    ) -> Result<(Req, Flight), Outcome> {
        let messages = workflow.messages();
        let mut state = self.lock();
        let request = match prepare(&*state) {
            Ok(request) => request,
            Err(reason) => {
                debug!(%workflow, %reason, "rejected before calling the service");
                state.notifications.push(None, Level::Error, messages.invalid);
                return Err(Outcome::Rejected(reason));
            }
        };
        let ticket = state.workflows.start(workflow);
        state
            .notifications
            .push(Some(workflow), Level::Loading, messages.loading);
        debug!(%workflow, request_id = %ticket.request_id, "calling service");
        let flight = Flight {
            inner: Arc::clone(&self.inner),
            ticket,
            armed: true,
        };
        Ok((request, flight))
    }

    /// Settles the request and, if it is still current, writes the result
    /// back and notifies.
    pub(super) fn finish<Resp>(
        &self,
        mut flight: Flight,
        result: Result<Resp, RemoteFailure>,
        apply: impl FnOnce(&mut SessionState, Resp),
    ) -> Outcome {
        let Ticket {
            workflow,
            request_id,
        } = flight.ticket;
        let messages = workflow.messages();

        let mut state = self.lock();
        let current = state.workflows.settle(flight.ticket, result.is_ok());
        flight.disarm();

        if !current {
            warn!(%workflow, %request_id, ok = result.is_ok(), "discarding stale response");
            return Outcome::Superseded;
        }

        match result {
            Ok(response) => {
                apply(&mut *state, response);
                if let Some(view) = workflow.destination() {
                    state.navigation.select(view);
                }
                state
                    .notifications
                    .push(Some(workflow), Level::Success, messages.success);
                info!(%workflow, %request_id, "workflow completed");
                Outcome::Completed
            }
            Err(err) => {
                error!(%workflow, %request_id, error = %err, "workflow failed");
                state
                    .notifications
                    .push(Some(workflow), Level::Error, messages.failure);
                Outcome::Failed(err)
            }
        }
    }
}
