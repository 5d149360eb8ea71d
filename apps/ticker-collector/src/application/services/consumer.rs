//! Consumer Loop
//!
//! Drains the handoff channel into a `TickSink` in its own task. The loop
//! is started once at process start and is independent of connection churn:
//! reconnects never touch the receiver. It ends only when every sender has
//! been dropped, which happens at shutdown.

use tokio::sync::mpsc;

use crate::application::ports::TickSink;
use crate::domain::tick::Tick;

/// Drain `rx` into `sink` until the channel closes.
///
/// Ticks are handed to the sink in arrival order. A sink error drops that
/// tick and the loop keeps draining.
///
/// Returns the number of ticks received.
pub async fn run_consumer<S: TickSink>(mut rx: mpsc::Receiver<Tick>, mut sink: S) -> u64 {
    let mut consumed: u64 = 0;

    while let Some(tick) = rx.recv().await {
        consumed += 1;
        if let Err(e) = sink.handle(tick).await {
            tracing::warn!(error = %e, consumed, "Tick sink failed, dropping tick");
        }
    }

    tracing::info!(consumed, "Handoff channel closed, consumer stopped");
    consumed
}

#[cfg(test)]
mod tests {
    use mockall::Sequence;

    use super::*;
    use crate::application::ports::{MockTickSink, SinkError};

    #[tokio::test]
    async fn drains_in_order_until_closed() {
        let (tx, rx) = mpsc::channel(1);
        let mut sink = MockTickSink::new();
        let mut seq = Sequence::new();

        for price in ["1.0", "2.0", "3.0"] {
            sink.expect_handle()
                .withf(move |tick| tick.price == price)
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Ok(()));
        }

        let consumer = tokio::spawn(run_consumer(rx, sink));
        for price in ["1.0", "2.0", "3.0"] {
            tx.send(Tick::new("BTCUSDT", price)).await.unwrap();
        }
        drop(tx);

        assert_eq!(consumer.await.unwrap(), 3);
    }

    #[tokio::test]
    async fn sink_error_does_not_stop_draining() {
        let (tx, rx) = mpsc::channel(4);
        let mut sink = MockTickSink::new();
        let mut seq = Sequence::new();

        sink.expect_handle()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(SinkError::Write("disk full".to_string())));
        sink.expect_handle()
            .withf(|tick| tick.price == "2.0")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        tx.send(Tick::new("BTCUSDT", "1.0")).await.unwrap();
        tx.send(Tick::new("BTCUSDT", "2.0")).await.unwrap();
        drop(tx);

        assert_eq!(run_consumer(rx, sink).await, 2);
    }

    #[tokio::test]
    async fn closed_channel_returns_immediately() {
        let (tx, rx) = mpsc::channel::<Tick>(1);
        drop(tx);

        let mut sink = MockTickSink::new();
        sink.expect_handle().never();

        assert_eq!(run_consumer(rx, sink).await, 0);
    }
}
