//! Domain Layer - Core price feed types.
//!
//! This layer contains the value types that flow through the collector
//! with no transport or runtime dependencies.

/// Decoded price observations.
pub mod tick;

/// Supervisor session state machine.
pub mod session;
