//! Trace Sink
//!
//! Default `TickSink`: writes each consumed tick as a diagnostic trace line.
//! A persistence adapter replaces this by implementing `TickSink`.

use async_trait::async_trait;

use crate::application::ports::{SinkError, TickSink};
use crate::domain::tick::Tick;

/// Sink that logs every tick at `info`.
#[derive(Debug, Default)]
pub struct TraceSink {
    received: u64,
}

impl TraceSink {
    /// Create a new trace sink.
    #[must_use]
    pub const fn new() -> Self {
        Self { received: 0 }
    }

    /// Ticks handled so far.
    #[must_use]
    pub const fn received(&self) -> u64 {
        self.received
    }
}

#[async_trait]
impl TickSink for TraceSink {
    async fn handle(&mut self, tick: Tick) -> Result<(), SinkError> {
        self.received += 1;
        tracing::info!(symbol = %tick.symbol, price = %tick.price, seq = self.received, "Price received");
        Ok(())
    }
}
