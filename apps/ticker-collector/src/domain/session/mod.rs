//! Session State Machine
//!
//! States the supervisor moves through while keeping the feed alive:
//!
//! ```text
//!   ┌────────────┐  handshake ok  ┌───────────┐
//!   │ Connecting │───────────────►│ Streaming │
//!   └────────────┘                └───────────┘
//!        ▲   │ dial error               │ read error / close
//!        │   ▼                          ▼
//!        │ ┌─────────┐◄─────────────────┘
//!        └─│ Backoff │
//!          └─────────┘
//! ```
//!
//! `Stopped` is only reachable through cancellation or the loss of the
//! consumer; connection failures always lead back to `Connecting`.

/// Supervisor session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Dialing the upstream endpoint.
    #[default]
    Connecting,
    /// Connected and reading frames.
    Streaming,
    /// Waiting out the reconnect delay.
    Backoff,
    /// Supervisor has returned.
    Stopped,
}

impl SessionState {
    /// Get the state name used in diagnostics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Connecting => "connecting",
            Self::Streaming => "streaming",
            Self::Backoff => "backoff",
            Self::Stopped => "stopped",
        }
    }

    /// Whether moving from `self` to `next` is a legal transition.
    #[must_use]
    pub const fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Connecting, Self::Streaming | Self::Backoff | Self::Stopped)
                | (Self::Streaming, Self::Backoff | Self::Stopped)
                | (Self::Backoff, Self::Connecting | Self::Stopped)
        )
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
