//! Infrastructure Layer - Adapters and external integrations.
//!
//! This layer contains the concrete implementations of the port interfaces
//! defined in the application layer.

/// Binance WebSocket adapters (codec, transport, connector).
pub mod binance;

/// Configuration loading.
pub mod config;

/// Default tick sink.
pub mod sink;

/// Tracing subscriber setup.
pub mod telemetry;
