//! Port Interfaces
//!
//! Defines the interfaces (ports) the services are written against. The
//! infrastructure layer provides the WebSocket and logging adapters; tests
//! provide scripted in-memory ones.
//!
//! ## Driven Ports (Outbound)
//!
//! - `FrameSource`: opens one connection and yields raw frames
//! - `TickSink`: side effect applied to each consumed tick
//!
//! ## Driver Ports (Inbound)
//!
//! - `StreamConnector`: one connect-and-listen session, driven by the supervisor

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::Stream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite;

use crate::domain::tick::Tick;

// =============================================================================
// Errors
// =============================================================================

/// Connection-level failures that end a feed session.
///
/// These are the only errors that cross the connector/supervisor boundary.
/// Per-frame decode failures are handled inside the connector.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// Dial or handshake failed.
    #[error("connect failed: {0}")]
    Connect(#[source] tungstenite::Error),

    /// I/O failure while reading an established connection.
    #[error("read failed: {0}")]
    Read(#[source] tungstenite::Error),

    /// The remote closed the stream (close frame or end of stream).
    #[error("stream closed by remote: {reason}")]
    Closed {
        /// Close reason, or a description of how the stream ended.
        reason: String,
    },

    /// The consumer side of the handoff channel has been dropped.
    #[error("tick consumer is gone")]
    SinkClosed,
}

impl ConnectionError {
    /// Short label for diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Connect(_) => "connect",
            Self::Read(_) => "read",
            Self::Closed { .. } => "closed",
            Self::SinkClosed => "sink_closed",
        }
    }
}

/// Errors raised by a `TickSink`.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// The sink failed to record a tick.
    #[error("sink write failed: {0}")]
    Write(String),
}

// =============================================================================
// Frames
// =============================================================================

/// One discrete message received over the stream connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// UTF-8 text payload.
    Text(String),
    /// Binary payload (length only; the feed does not use binary frames).
    Binary(usize),
    /// Ping control frame. The WebSocket layer queues the pong itself.
    Ping,
    /// Pong control frame.
    Pong,
    /// Close frame with optional reason.
    Close(Option<String>),
}

/// Stream of frames for one connection. Dropping it closes the connection.
pub type FrameStream = Pin<Box<dyn Stream<Item = Result<Frame, ConnectionError>> + Send>>;

// =============================================================================
// Ports
// =============================================================================

/// Opens a single connection to an upstream endpoint.
#[async_trait]
pub trait FrameSource: Send + Sync {
    /// Connect to `url` and return the frame stream.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError::Connect` if the dial or handshake fails.
    async fn connect(&self, url: &str) -> Result<FrameStream, ConnectionError>;
}

/// Runs one feed session, publishing decoded ticks into `sink`.
#[async_trait]
pub trait StreamConnector: Send + Sync {
    /// Connect, read and publish until the session fails.
    ///
    /// # Errors
    ///
    /// Returns the connection-level failure that ended the session. A clean
    /// remote close is reported as `ConnectionError::Closed`.
    async fn connect_and_listen(&self, sink: &mpsc::Sender<Tick>) -> Result<(), ConnectionError>;
}

/// Side effect applied to every consumed tick (the persistence seam).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TickSink: Send {
    /// Handle one tick. Ownership of the tick moves to the sink.
    ///
    /// # Errors
    ///
    /// Returns `SinkError` if the tick could not be recorded. The consumer
    /// loop logs the error and keeps draining.
    async fn handle(&mut self, tick: Tick) -> Result<(), SinkError>;
}
