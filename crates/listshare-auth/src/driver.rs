//! Runs the fixed sign-in delay off the caller's task.
//!
//! The driver holds at most one attempt. Starting a new one aborts the
//! previous task, so a superseded attempt never produces a completion. The
//! store still checks the ticket when the completion is applied.

use std::time::Duration;

use listshare_core::Credentials;
use listshare_core::LoginTicket;
use tokio::task::JoinHandle;
use tracing::debug;
use tracing::info;

use crate::contracts::AuthError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCompletion {
    pub ticket: LoginTicket,
    pub credentials: Credentials,
}

struct Inflight {
    ticket: LoginTicket,
    handle: JoinHandle<Credentials>,
}

pub struct LoginDriver {
    delay: Duration,
    inflight: Option<Inflight>,
}

impl LoginDriver {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            inflight: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn pending(&self) -> Option<LoginTicket> {
        self.inflight.as_ref().map(|inflight| inflight.ticket)
    }

    /// Starts the delay for `ticket`. Returns the ticket it superseded, if
    /// any. Must be called from within a tokio runtime.
    pub fn begin(&mut self, ticket: LoginTicket, credentials: Credentials) -> Option<LoginTicket> {
        let superseded = self.abort_inflight();
        if let Some(previous) = superseded {
            info!(superseded = %previous, ticket = %ticket, "login attempt replaced");
        }
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            credentials
        });
        self.inflight = Some(Inflight { ticket, handle });
        superseded
    }

    /// Drops the pending attempt without completing it.
    pub fn cancel(&mut self) -> Option<LoginTicket> {
        let cancelled = self.abort_inflight();
        if let Some(ticket) = cancelled {
            info!(ticket = %ticket, "login attempt cancelled");
        }
        cancelled
    }

    /// Waits for the pending attempt. `Ok(None)` when nothing is pending.
    pub async fn wait(&mut self) -> Result<Option<AuthCompletion>, AuthError> {
        let Some(Inflight { ticket, handle }) = self.inflight.take() else {
            return Ok(None);
        };
        match handle.await {
            Ok(credentials) => {
                debug!(ticket = %ticket, "login delay elapsed");
                Ok(Some(AuthCompletion {
                    ticket,
                    credentials,
                }))
            }
            Err(err) => {
                debug!(ticket = %ticket, error = %err, "login task ended early");
                Err(AuthError::Abandoned)
            }
        }
    }

    fn abort_inflight(&mut self) -> Option<LoginTicket> {
        self.inflight.take().map(|inflight| {
            inflight.handle.abort();
            inflight.ticket
        })
    }
}

impl Drop for LoginDriver {
    fn drop(&mut self) {
        self.abort_inflight();
    }
}
