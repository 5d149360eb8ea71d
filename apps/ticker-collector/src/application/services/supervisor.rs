//! Supervisor Loop
//!
//! Keeps the feed alive: invokes the connector, logs the failure that ended
//! the session, waits out the back-off, and connects again. No failure is
//! terminal and there is no retry limit. The loop returns only when the
//! cancellation token fires or the consumer has gone away.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::reconnect::{ReconnectConfig, ReconnectPolicy};
use super::status::FeedStatus;
use crate::application::ports::{ConnectionError, StreamConnector};
use crate::domain::session::SessionState;
use crate::domain::tick::Tick;

/// Reconnecting supervisor around a single `StreamConnector`.
pub struct Supervisor<C> {
    connector: C,
    reconnect: ReconnectConfig,
    status: Arc<FeedStatus>,
    cancel: CancellationToken,
}

impl<C: StreamConnector> Supervisor<C> {
    /// Create a new supervisor.
    ///
    /// `status` should be the same instance the connector reports into.
    #[must_use]
    pub const fn new(
        connector: C,
        reconnect: ReconnectConfig,
        status: Arc<FeedStatus>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            connector,
            reconnect,
            status,
            cancel,
        }
    }

    /// Get the shared feed status.
    #[must_use]
    pub fn status(&self) -> Arc<FeedStatus> {
        Arc::clone(&self.status)
    }

    /// Run the connect / stream / back-off cycle until cancelled.
    ///
    /// `sink` is the sending half of the handoff channel. It outlives every
    /// session, so the consumer never observes a reconnect.
    pub async fn run(self, sink: mpsc::Sender<Tick>) {
        let mut policy = ReconnectPolicy::new(self.reconnect.clone());

        loop {
            if self.cancel.is_cancelled() {
                tracing::info!("Supervisor cancelled");
                break;
            }

            self.status.set_state(SessionState::Connecting);
            let attempt = self.status.record_connect_attempt();
            tracing::info!(attempt, "Connecting to price feed");

            let outcome = tokio::select! {
                () = self.cancel.cancelled() => {
                    tracing::info!("Supervisor cancelled during session");
                    break;
                }
                outcome = self.connector.connect_and_listen(&sink) => outcome,
            };

            let streamed = self.status.state() == SessionState::Streaming;

            match outcome {
                Err(ConnectionError::SinkClosed) => {
                    tracing::error!("Tick consumer is gone, stopping supervisor");
                    break;
                }
                Err(e) => {
                    tracing::warn!(error = %e, kind = e.kind(), streamed, "Feed connection lost");
                    self.status.set_error(e.to_string());
                }
                Ok(()) => {
                    tracing::warn!(streamed, "Feed session ended without an error");
                }
            }
            self.status.record_session_failure();

            if streamed {
                policy.reset();
            }
            let delay = policy.next_delay();
            self.status.set_state(SessionState::Backoff);

            let stats = self.status.snapshot();
            tracing::info!(
                delay_ms = delay.as_millis(),
                ticks_published = stats.ticks_published,
                decode_errors = stats.decode_errors,
                session_failures = stats.session_failures,
                "Reconnecting after back-off"
            );

            tokio::select! {
                () = self.cancel.cancelled() => {
                    tracing::info!("Supervisor cancelled during back-off");
                    break;
                }
                () = tokio::time::sleep(delay) => {}
            }
        }

        self.status.set_state(SessionState::Stopped);
        tracing::info!("Supervisor stopped");
    }
}
