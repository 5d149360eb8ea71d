//! Binance Feed Connector
//!
//! Runs one session against the `miniTicker` stream: connect, read frames,
//! decode, publish. Retrying is not done here; every connection-level
//! failure is returned to the supervisor.
//!
//! # Session rules
//!
//! - A frame that fails to decode is logged and skipped. The session goes on.
//! - Each decoded tick is published with an awaited send, so a slow consumer
//!   stalls the read loop instead of losing ticks.
//! - A close frame or end of stream is reported as `ConnectionError::Closed`.
//!   After a close frame the stream is read to its end (bounded by
//!   `CLOSE_DRAIN_TIMEOUT`) so the queued close reply gets flushed.
//! - The frame stream (and with it the socket) is dropped on every return.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::sync::mpsc;

use super::codec::{TickerCodec, preview};
use crate::application::ports::{
    ConnectionError, Frame, FrameSource, FrameStream, StreamConnector,
};
use crate::application::services::FeedStatus;
use crate::domain::session::SessionState;
use crate::domain::tick::Tick;

/// Upper bound on reading out the stream after a close frame.
pub const CLOSE_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Connector for a single Binance ticker stream.
pub struct BinanceConnector<S> {
    url: String,
    source: S,
    codec: TickerCodec,
    status: Arc<FeedStatus>,
}

impl<S: FrameSource> BinanceConnector<S> {
    /// Create a new connector for `url`.
    #[must_use]
    pub const fn new(url: String, source: S, status: Arc<FeedStatus>) -> Self {
        Self {
            url,
            source,
            codec: TickerCodec::new(),
            status,
        }
    }

    /// Decode one text frame and publish it.
    async fn handle_text(
        &self,
        text: &str,
        sink: &mpsc::Sender<Tick>,
    ) -> Result<(), ConnectionError> {
        self.status.record_frame();

        match self.codec.decode(text) {
            Ok(tick) => {
                tracing::trace!(symbol = %tick.symbol, price = %tick.price, "Tick decoded");
                sink.send(tick)
                    .await
                    .map_err(|_| ConnectionError::SinkClosed)?;
                self.status.record_tick_published();
            }
            Err(e) => {
                self.status.record_decode_error();
                tracing::warn!(error = %e, frame = preview(text), "Skipping undecodable frame");
            }
        }

        Ok(())
    }
}

#[async_trait]
impl<S: FrameSource> StreamConnector for BinanceConnector<S> {
    async fn connect_and_listen(&self, sink: &mpsc::Sender<Tick>) -> Result<(), ConnectionError> {
        tracing::debug!(url = %self.url, "Dialing price feed");

        let mut frames = self.source.connect(&self.url).await?;

        self.status.record_session_established();
        self.status.set_state(SessionState::Streaming);
        tracing::info!(url = %self.url, "Connected, receiving ticks");

        while let Some(frame) = frames.next().await {
            match frame? {
                Frame::Text(text) => self.handle_text(&text, sink).await?,
                Frame::Close(reason) => {
                    tracing::info!(reason = reason.as_deref().unwrap_or(""), "Server sent close frame");
                    drain_after_close(&mut frames).await;
                    return Err(ConnectionError::Closed {
                        reason: reason.unwrap_or_else(|| "close frame without reason".to_string()),
                    });
                }
                Frame::Ping | Frame::Pong => {
                    tracing::trace!("Control frame");
                }
                Frame::Binary(len) => {
                    tracing::trace!(len, "Ignoring binary frame");
                }
            }
        }

        tracing::info!("WebSocket stream ended");
        Err(ConnectionError::Closed {
            reason: "stream ended".to_string(),
        })
    }
}

/// Read the stream until it ends so tungstenite flushes the close reply.
async fn drain_after_close(frames: &mut FrameStream) {
    let drained = tokio::time::timeout(CLOSE_DRAIN_TIMEOUT, async {
        let mut skipped: u64 = 0;
        while let Some(frame) = frames.next().await {
            if frame.is_err() {
                break;
            }
            skipped += 1;
        }
        skipped
    })
    .await;

    match drained {
        Ok(skipped) => tracing::debug!(skipped, "Close handshake complete"),
        Err(_) => tracing::debug!("Close handshake timed out"),
    }
}
