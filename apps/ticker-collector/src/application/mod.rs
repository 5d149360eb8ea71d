//! Application Layer - Use cases and port definitions.
//!
//! This layer contains the supervisor and consumer services and the port
//! interfaces they drive.

/// Port interfaces for external systems (transport, connector, sink).
pub mod ports;

/// Supervisor loop, consumer loop and shared feed status.
pub mod services;
