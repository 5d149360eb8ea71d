#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::items_after_statements
    )
)]

//! Ticker Collector - Resilient Price Feed Ingestion
//!
//! Keeps a single Binance `miniTicker` WebSocket stream alive indefinitely
//! and hands each decoded price to a consumer task that never sees the
//! connection churn.
//!
//! # Layers (inside → outside)
//!
//! - **Domain**: `Tick` and the supervisor `SessionState` machine
//!
//! - **Application**: Use cases and port definitions
//!   - `ports`: `FrameSource`, `StreamConnector`, `TickSink`
//!   - `services`: `Supervisor`, `run_consumer`, `FeedStatus`, `ReconnectPolicy`
//!
//! - **Infrastructure**: Adapters and external integrations
//!   - `binance`: codec, WebSocket transport, feed connector
//!   - `config`: environment configuration
//!   - `sink`: default trace sink
//!   - `telemetry`: tracing subscriber
//!
//! # Data Flow
//!
//! ```text
//!                ┌────────────┐ Tick ┌──────────────┐      ┌──────────┐
//! Binance WS ───►│ Connector  │─────►│ mpsc (1 slot)│─────►│ Consumer │──► TickSink
//!                └────────────┘      └──────────────┘      └──────────┘
//!                      ▲ connect_and_listen / error
//!                ┌────────────┐
//!                │ Supervisor │  Connecting → Streaming → Backoff → …
//!                └────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Domain layer - Core types with no transport dependencies.
pub mod domain;

/// Application layer - Services and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Re-exports
// =============================================================================

// Domain types
pub use domain::session::SessionState;
pub use domain::tick::Tick;

// Ports and services
pub use application::ports::{
    ConnectionError, Frame, FrameSource, FrameStream, SinkError, StreamConnector, TickSink,
};
pub use application::services::{
    FeedStats, FeedStatus, ReconnectConfig, ReconnectPolicy, Supervisor, run_consumer,
};

// Infrastructure
pub use infrastructure::binance::{
    BinanceConnector, CodecError, TickerCodec, WebSocketSource,
};
pub use infrastructure::config::{
    CollectorConfig, ConfigError, HandoffSettings, ReconnectSettings, StreamSettings,
};
pub use infrastructure::sink::TraceSink;
pub use infrastructure::telemetry::{TelemetryConfig, init as init_telemetry};
