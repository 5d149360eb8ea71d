//! Feed Status
//!
//! Session state and lock-free counters shared between the connector (which
//! reports frames and ticks) and the supervisor (which reports attempts and
//! failures). Counters are monotonic for the lifetime of the process.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::domain::session::SessionState;

/// Point-in-time copy of the feed status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedStats {
    /// Current session state.
    pub state: SessionState,
    /// When the last session reached `Streaming`.
    pub last_connected_at: Option<DateTime<Utc>>,
    /// Message of the last connection error.
    pub last_error: Option<String>,
    /// Connection attempts started.
    pub connect_attempts: u64,
    /// Sessions that completed the handshake.
    pub sessions_established: u64,
    /// Sessions that ended with a connection error.
    pub session_failures: u64,
    /// Text frames received.
    pub frames_received: u64,
    /// Ticks handed to the consumer.
    pub ticks_published: u64,
    /// Frames skipped because they failed to decode.
    pub decode_errors: u64,
}

/// Shared feed status.
#[derive(Debug, Default)]
pub struct FeedStatus {
    state: RwLock<SessionState>,
    last_connected_at: RwLock<Option<DateTime<Utc>>>,
    last_error: RwLock<Option<String>>,
    connect_attempts: AtomicU64,
    sessions_established: AtomicU64,
    session_failures: AtomicU64,
    frames_received: AtomicU64,
    ticks_published: AtomicU64,
    decode_errors: AtomicU64,
}

impl FeedStatus {
    /// Create a status in the `Connecting` state with zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current session state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        *self.state.read()
    }

    /// Move to `next`.
    ///
    /// Entering `Streaming` stamps `last_connected_at` and clears the last
    /// error. Unexpected transitions are applied but logged.
    pub fn set_state(&self, next: SessionState) {
        let mut state = self.state.write();
        let current = *state;
        if current != next && !current.can_transition_to(next) {
            tracing::debug!(from = %current, to = %next, "Unexpected session transition");
        }
        *state = next;
        drop(state);

        if next == SessionState::Streaming {
            *self.last_connected_at.write() = Some(Utc::now());
            *self.last_error.write() = None;
        }
    }

    /// Record the message of a connection error.
    pub fn set_error(&self, message: String) {
        *self.last_error.write() = Some(message);
    }

    /// Count a connection attempt and return the new total.
    pub fn record_connect_attempt(&self) -> u64 {
        self.connect_attempts.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Count a completed handshake.
    pub fn record_session_established(&self) {
        self.sessions_established.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a session that ended with a connection error.
    pub fn record_session_failure(&self) {
        self.session_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a received text frame.
    pub fn record_frame(&self) {
        self.frames_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a tick handed to the consumer.
    pub fn record_tick_published(&self) {
        self.ticks_published.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a frame skipped by the decoder.
    pub fn record_decode_error(&self) {
        self.decode_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a snapshot of state and counters.
    #[must_use]
    pub fn snapshot(&self) -> FeedStats {
        FeedStats {
            state: self.state(),
            last_connected_at: *self.last_connected_at.read(),
            last_error: self.last_error.read().clone(),
            connect_attempts: self.connect_attempts.load(Ordering::Relaxed),
            sessions_established: self.sessions_established.load(Ordering::Relaxed),
            session_failures: self.session_failures.load(Ordering::Relaxed),
            frames_received: self.frames_received.load(Ordering::Relaxed),
            ticks_published: self.ticks_published.load(Ordering::Relaxed),
            decode_errors: self.decode_errors.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_connecting_with_zero_counters() {
        let stats = FeedStatus::new().snapshot();
        assert_eq!(stats.state, SessionState::Connecting);
        assert_eq!(stats.connect_attempts, 0);
        assert_eq!(stats.ticks_published, 0);
        assert!(stats.last_connected_at.is_none());
        assert!(stats.last_error.is_none());
    }

    #[test]
    fn streaming_clears_error_and_stamps_time() {
        let status = FeedStatus::new();
        status.set_error("read failed".to_string());
        status.set_state(SessionState::Streaming);

        let stats = status.snapshot();
        assert_eq!(stats.state, SessionState::Streaming);
        assert!(stats.last_connected_at.is_some());
        assert!(stats.last_error.is_none());
    }

    #[test]
    fn counters_accumulate() {
        let status = FeedStatus::new();
        assert_eq!(status.record_connect_attempt(), 1);
        assert_eq!(status.record_connect_attempt(), 2);
        status.record_session_established();
        status.record_frame();
        status.record_frame();
        status.record_decode_error();
        status.record_tick_published();
        status.record_session_failure();

        let stats = status.snapshot();
        assert_eq!(stats.connect_attempts, 2);
        assert_eq!(stats.sessions_established, 1);
        assert_eq!(stats.frames_received, 2);
        assert_eq!(stats.decode_errors, 1);
        assert_eq!(stats.ticks_published, 1);
        assert_eq!(stats.session_failures, 1);
    }
}
