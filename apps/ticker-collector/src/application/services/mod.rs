//! Application Services
//!
//! Services that keep the feed alive and drain it.
//!
//! - `Supervisor`: reconnect loop around a `StreamConnector`
//! - `run_consumer`: drains the handoff channel into a `TickSink`
//! - `FeedStatus`: state and counters shared by connector and supervisor
//! - `ReconnectPolicy`: back-off delay between sessions

pub mod consumer;
pub mod reconnect;
pub mod status;
pub mod supervisor;

pub use consumer::run_consumer;
pub use reconnect::{ReconnectConfig, ReconnectPolicy};
pub use status::{FeedStats, FeedStatus};
pub use supervisor::Supervisor;
