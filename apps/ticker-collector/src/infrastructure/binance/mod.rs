//! Binance WebSocket Adapters
//!
//! Implements the price feed against Binance's public `miniTicker` stream:
//!
//! - **codec**: JSON frame → `Tick`
//! - **transport**: tokio-tungstenite `FrameSource`
//! - **connector**: one connect/read/decode/publish session

pub mod codec;
pub mod connector;
pub mod transport;

pub use codec::{CodecError, TickerCodec};
pub use connector::BinanceConnector;
pub use transport::WebSocketSource;
