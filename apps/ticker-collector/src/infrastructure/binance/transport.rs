//! WebSocket Frame Source
//!
//! `FrameSource` adapter over `tokio-tungstenite`. One call to `connect`
//! performs the dial and handshake and returns the connection as a stream of
//! `Frame`s; dropping the stream closes the socket.
//!
//! Pings from the server are answered by tungstenite itself: the pong is
//! queued on read and flushed by the next read, so the read loop needs no
//! write half.

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio_tungstenite::tungstenite::Message;

use crate::application::ports::{ConnectionError, Frame, FrameSource, FrameStream};

/// Frame source backed by a real WebSocket connection.
#[derive(Debug, Default, Clone)]
pub struct WebSocketSource;

impl WebSocketSource {
    /// Create a new WebSocket frame source.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FrameSource for WebSocketSource {
    async fn connect(&self, url: &str) -> Result<FrameStream, ConnectionError> {
        let (ws_stream, response) = tokio_tungstenite::connect_async(url)
            .await
            .map_err(ConnectionError::Connect)?;

        tracing::debug!(status = %response.status(), "WebSocket handshake complete");

        Ok(Box::pin(ws_stream.map(|msg| {
            msg.map(to_frame).map_err(ConnectionError::Read)
        })))
    }
}

fn to_frame(msg: Message) -> Frame {
    match msg {
        Message::Text(text) => Frame::Text(text.as_str().to_owned()),
        Message::Binary(data) => Frame::Binary(data.len()),
        Message::Ping(_) => Frame::Ping,
        Message::Pong(_) => Frame::Pong,
        Message::Close(close) => Frame::Close(close.map(|c| format!("{} {}", c.code, c.reason))),
        Message::Frame(frame) => Frame::Binary(frame.payload().len()),
    }
}

#[cfg(test)]
mod tests {
    use tokio_tungstenite::tungstenite::protocol::CloseFrame;
    use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;

    use super::*;

    #[test]
    fn text_message_becomes_text_frame() {
        let frame = to_frame(Message::Text(r#"{"s":"BTCUSDT","c":"1.0"}"#.into()));
        assert_eq!(frame, Frame::Text(r#"{"s":"BTCUSDT","c":"1.0"}"#.to_string()));
    }

    #[test]
    fn control_messages_map_to_control_frames() {
        assert_eq!(to_frame(Message::Ping(vec![1, 2].into())), Frame::Ping);
        assert_eq!(to_frame(Message::Pong(vec![].into())), Frame::Pong);
        assert_eq!(to_frame(Message::Binary(vec![0; 4].into())), Frame::Binary(4));
    }

    #[test]
    fn close_keeps_code_and_reason() {
        let frame = to_frame(Message::Close(Some(CloseFrame {
            code: CloseCode::Away,
            reason: "server restart".into(),
        })));
        assert_eq!(frame, Frame::Close(Some("1001 server restart".to_string())));
        assert_eq!(to_frame(Message::Close(None)), Frame::Close(None));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_connect_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = WebSocketSource::new().connect(&format!("ws://{addr}/ws")).await;
        assert!(matches!(result, Err(ConnectionError::Connect(_))));
    }
}
