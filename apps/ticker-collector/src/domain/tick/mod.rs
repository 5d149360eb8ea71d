//! Tick Types
//!
//! A `Tick` is one decoded price observation for a symbol. The price is
//! carried as the exact decimal string the exchange sent; this layer never
//! converts it to a numeric type, so downstream sinks see full precision.

use serde::{Deserialize, Serialize};

/// One decoded price observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tick {
    /// Exchange symbol (e.g. `BTCUSDT`).
    pub symbol: String,
    /// Last price as an opaque decimal string.
    pub price: String,
}

impl Tick {
    /// Create a new tick.
    #[must_use]
    pub fn new(symbol: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            price: price.into(),
        }
    }

    /// Consume the tick, keeping only the price string.
    #[must_use]
    pub fn into_price(self) -> String {
        self.price
    }
}

impl std::fmt::Display for Tick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.symbol, self.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_is_kept_verbatim() {
        let tick = Tick::new("BTCUSDT", "65000.10000000");
        assert_eq!(tick.price, "65000.10000000");
        assert_eq!(tick.into_price(), "65000.10000000");
    }

    #[test]
    fn display_joins_symbol_and_price() {
        let tick = Tick::new("ETHUSDT", "3120.5");
        assert_eq!(tick.to_string(), "ETHUSDT@3120.5");
    }
}
