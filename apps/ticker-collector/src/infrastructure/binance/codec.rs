//! Stream Codec Module
//!
//! Decodes Binance `miniTicker` text frames into `Tick`s.
//!
//! Only the two fields the collector needs are read; every other key is
//! ignored so upstream additions never break decoding:
//!
//! ```json
//! {"e":"24hrMiniTicker","E":1700000000000,"s":"BTCUSDT","c":"65000.10","o":"64000.00",...}
//! ```
//!
//! Combined-stream frames (`/stream?streams=...`) wrap the same object in an
//! envelope and are unwrapped transparently:
//!
//! ```json
//! {"stream":"btcusdt@miniTicker","data":{"s":"BTCUSDT","c":"65000.10"}}
//! ```

use serde::Deserialize;

use crate::domain::tick::Tick;

/// Codec errors.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// JSON decoding failed (syntax error, missing or mistyped field).
    #[error("JSON codec error: {0}")]
    Json(#[from] serde_json::Error),

    /// Frame is not a JSON object.
    #[error("invalid message format: {0}")]
    InvalidFormat(String),

    /// A required field is present but empty.
    #[error("empty field: {0}")]
    EmptyField(&'static str),
}

#[derive(Debug, Deserialize)]
struct MiniTicker {
    #[serde(rename = "s")]
    symbol: String,
    #[serde(rename = "c")]
    price: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Envelope {
    Direct(MiniTicker),
    Combined { data: MiniTicker },
}

/// JSON codec for the `miniTicker` stream.
#[derive(Debug, Default, Clone)]
pub struct TickerCodec;

impl TickerCodec {
    /// Create a new codec.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Decode one text frame into a `Tick`.
    ///
    /// The price string is kept exactly as received.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame is not a JSON object, lacks `s` or `c`,
    /// carries them with a non-string type, or carries them empty.
    pub fn decode(&self, text: &str) -> Result<Tick, CodecError> {
        let trimmed = text.trim();

        if !trimmed.starts_with('{') {
            return Err(CodecError::InvalidFormat(format!(
                "expected JSON object, got: {}",
                preview(trimmed)
            )));
        }

        let ticker = match serde_json::from_str::<Envelope>(trimmed) {
            Ok(Envelope::Direct(ticker) | Envelope::Combined { data: ticker }) => ticker,
            // Re-decode as the direct shape so the error names the missing field.
            Err(_) => serde_json::from_str::<MiniTicker>(trimmed)?,
        };

        if ticker.symbol.is_empty() {
            return Err(CodecError::EmptyField("s"));
        }
        if ticker.price.is_empty() {
            return Err(CodecError::EmptyField("c"));
        }

        Ok(Tick {
            symbol: ticker.symbol,
            price: ticker.price,
        })
    }
}

/// First 50 characters of a frame, for diagnostics.
#[must_use]
pub fn preview(text: &str) -> &str {
    text.char_indices()
        .nth(50)
        .map_or(text, |(idx, _)| &text[..idx])
}
