//! Collector Configuration Settings
//!
//! Configuration types for the collector, loaded from environment variables.
//! Every variable is optional; the defaults reproduce the fixed single-feed
//! behavior (BTCUSDT miniTicker, 5 second fixed back-off, one handoff slot).

use std::time::Duration;

/// Default symbol streamed when no override is given.
pub const DEFAULT_SYMBOL: &str = "btcusdt";

const BINANCE_STREAM_BASE: &str = "wss://stream.binance.com:9443/ws";

/// Upstream stream settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamSettings {
    /// Symbol the stream is opened for (lowercase).
    pub symbol: String,
    /// Full WebSocket endpoint.
    pub url: String,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self::for_symbol(DEFAULT_SYMBOL)
    }
}

impl StreamSettings {
    /// Build the `miniTicker` endpoint for `symbol`.
    #[must_use]
    pub fn for_symbol(symbol: &str) -> Self {
        let symbol = symbol.to_lowercase();
        let url = format!("{BINANCE_STREAM_BASE}/{symbol}@miniTicker");
        Self { symbol, url }
    }
}

/// Reconnection back-off settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconnectSettings {
    /// Delay before each reconnection attempt.
    pub delay: Duration,
    /// Upper bound on the delay when `multiplier` grows it.
    pub max_delay: Duration,
    /// Growth factor per attempt (1.0 = fixed interval).
    pub multiplier: f64,
    /// Random spread applied to each delay, as a fraction (0.1 = ±10%).
    pub jitter: f64,
}

impl Default for ReconnectSettings {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(5),
            max_delay: Duration::from_secs(5),
            multiplier: 1.0,
            jitter: 0.0,
        }
    }
}

/// Handoff channel settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandoffSettings {
    /// Number of ticks that may wait in the channel. Senders block when full.
    pub capacity: usize,
}

impl Default for HandoffSettings {
    fn default() -> Self {
        Self { capacity: 1 }
    }
}

/// Complete collector configuration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CollectorConfig {
    /// Upstream stream settings.
    pub stream: StreamSettings,
    /// Reconnection settings.
    pub reconnect: ReconnectSettings,
    /// Handoff channel settings.
    pub handoff: HandoffSettings,
}

impl CollectorConfig {
    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if an override is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if an override is present but invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let symbol = match lookup("COLLECTOR_SYMBOL") {
            Some(s) if s.trim().is_empty() => {
                return Err(ConfigError::EmptyValue("COLLECTOR_SYMBOL".to_string()));
            }
            Some(s) => s.trim().to_string(),
            None => DEFAULT_SYMBOL.to_string(),
        };

        let mut stream = StreamSettings::for_symbol(&symbol);
        if let Some(url) = lookup("COLLECTOR_STREAM_URL") {
            let url = url.trim();
            if url.is_empty() {
                return Err(ConfigError::EmptyValue("COLLECTOR_STREAM_URL".to_string()));
            }
            if !(url.starts_with("ws://") || url.starts_with("wss://")) {
                return Err(ConfigError::InvalidUrl(url.to_string()));
            }
            stream.url = url.to_string();
        }

        let defaults = ReconnectSettings::default();
        let delay = parse_duration_secs(&lookup, "COLLECTOR_RECONNECT_DELAY_SECS", defaults.delay);
        if delay.is_zero() {
            return Err(ConfigError::InvalidValue {
                key: "COLLECTOR_RECONNECT_DELAY_SECS".to_string(),
                reason: "delay must be at least 1 second".to_string(),
            });
        }
        let max_delay = parse_duration_secs(
            &lookup,
            "COLLECTOR_RECONNECT_DELAY_MAX_SECS",
            defaults.max_delay.max(delay),
        );
        let multiplier = parse_or(&lookup, "COLLECTOR_RECONNECT_MULTIPLIER", defaults.multiplier);
        if !multiplier.is_finite() {
            return Err(ConfigError::InvalidValue {
                key: "COLLECTOR_RECONNECT_MULTIPLIER".to_string(),
                reason: format!("{multiplier} is not a finite number"),
            });
        }
        if multiplier < 1.0 {
            return Err(ConfigError::InvalidValue {
                key: "COLLECTOR_RECONNECT_MULTIPLIER".to_string(),
                reason: format!("{multiplier} is below 1.0"),
            });
        }

        let jitter = parse_or(&lookup, "COLLECTOR_RECONNECT_JITTER", defaults.jitter);
        if !(0.0..=1.0).contains(&jitter) {
            return Err(ConfigError::InvalidValue {
                key: "COLLECTOR_RECONNECT_JITTER".to_string(),
                reason: format!("{jitter} is outside 0.0..=1.0"),
            });
        }

        let capacity = parse_or(
            &lookup,
            "COLLECTOR_HANDOFF_CAPACITY",
            HandoffSettings::default().capacity,
        );
        if capacity == 0 {
            return Err(ConfigError::InvalidValue {
                key: "COLLECTOR_HANDOFF_CAPACITY".to_string(),
                reason: "capacity must be at least 1".to_string(),
            });
        }

        Ok(Self {
            stream,
            reconnect: ReconnectSettings {
                delay,
                max_delay,
                multiplier,
                jitter,
            },
            handoff: HandoffSettings { capacity },
        })
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Environment variable has empty value.
    #[error("environment variable {0} cannot be empty")]
    EmptyValue(String),
    /// Endpoint is not a WebSocket URL.
    #[error("stream URL must start with ws:// or wss://, got {0}")]
    InvalidUrl(String),
    /// Value parsed but is out of range.
    #[error("invalid value for {key}: {reason}")]
    InvalidValue {
        /// Variable name.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_duration_secs<F>(lookup: &F, key: &str, default: Duration) -> Duration
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map_or(default, Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use test_case::test_case;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<CollectorConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        CollectorConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_match_fixed_feed() {
        let config = load(&[]).unwrap();
        assert_eq!(
            config.stream.url,
            "wss://stream.binance.com:9443/ws/btcusdt@miniTicker"
        );
        assert_eq!(config.stream.symbol, "btcusdt");
        assert_eq!(config.reconnect.delay, Duration::from_secs(5));
        assert_eq!(config.reconnect.max_delay, Duration::from_secs(5));
        assert!((config.reconnect.multiplier - 1.0).abs() < f64::EPSILON);
        assert!(config.reconnect.jitter.abs() < f64::EPSILON);
        assert_eq!(config.handoff.capacity, 1);
        assert_eq!(config, CollectorConfig::default());
    }

    #[test]
    fn symbol_builds_lowercase_endpoint() {
        let config = load(&[("COLLECTOR_SYMBOL", "ETHUSDT")]).unwrap();
        assert_eq!(
            config.stream.url,
            "wss://stream.binance.com:9443/ws/ethusdt@miniTicker"
        );
    }

    #[test]
    fn explicit_url_wins_over_symbol() {
        let config = load(&[
            ("COLLECTOR_SYMBOL", "ETHUSDT"),
            ("COLLECTOR_STREAM_URL", "ws://localhost:9000/ws"),
        ])
        .unwrap();
        assert_eq!(config.stream.url, "ws://localhost:9000/ws");
    }

    #[test]
    fn reconnect_overrides() {
        let config = load(&[
            ("COLLECTOR_RECONNECT_DELAY_SECS", "2"),
            ("COLLECTOR_RECONNECT_DELAY_MAX_SECS", "30"),
            ("COLLECTOR_RECONNECT_MULTIPLIER", "2.0"),
            ("COLLECTOR_RECONNECT_JITTER", "0.2"),
        ])
        .unwrap();
        assert_eq!(config.reconnect.delay, Duration::from_secs(2));
        assert_eq!(config.reconnect.max_delay, Duration::from_secs(30));
        assert!((config.reconnect.multiplier - 2.0).abs() < f64::EPSILON);
        assert!((config.reconnect.jitter - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn longer_delay_raises_default_cap() {
        let config = load(&[("COLLECTOR_RECONNECT_DELAY_SECS", "10")]).unwrap();
        assert_eq!(config.reconnect.max_delay, Duration::from_secs(10));
    }

    #[test]
    fn unparsable_numbers_fall_back_to_defaults() {
        let config = load(&[
            ("COLLECTOR_RECONNECT_DELAY_SECS", "soon"),
            ("COLLECTOR_HANDOFF_CAPACITY", "many"),
        ])
        .unwrap();
        assert_eq!(config.reconnect.delay, Duration::from_secs(5));
        assert_eq!(config.handoff.capacity, 1);
    }

    #[test_case("COLLECTOR_SYMBOL", "  " ; "blank symbol")]
    #[test_case("COLLECTOR_STREAM_URL", "" ; "blank url")]
    fn empty_values_are_rejected(key: &str, value: &str) {
        let err = load(&[(key, value)]).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyValue(k) if k == key));
    }

    #[test_case("https://stream.binance.com" ; "http scheme")]
    #[test_case("stream.binance.com:9443/ws" ; "no scheme")]
    fn non_websocket_urls_are_rejected(url: &str) {
        let err = load(&[("COLLECTOR_STREAM_URL", url)]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl(_)));
    }

    #[test_case("COLLECTOR_HANDOFF_CAPACITY", "0" ; "zero capacity")]
    #[test_case("COLLECTOR_RECONNECT_MULTIPLIER", "0.5" ; "shrinking backoff")]
    #[test_case("COLLECTOR_RECONNECT_DELAY_SECS", "0" ; "zero delay")]
    #[test_case("COLLECTOR_RECONNECT_JITTER", "1.5" ; "jitter above one")]
    #[test_case("COLLECTOR_RECONNECT_JITTER", "-0.1" ; "negative jitter")]
    fn out_of_range_values_are_rejected(key: &str, value: &str) {
        let err = load(&[(key, value)]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: k, .. } if k == key));
    }

    #[test_case("NaN" ; "nan")]
    #[test_case("inf" ; "infinity")]
    fn non_finite_multiplier_is_named_as_such(value: &str) {
        let err = load(&[("COLLECTOR_RECONNECT_MULTIPLIER", value)]).unwrap_err();
        match err {
            ConfigError::InvalidValue { reason, .. } => {
                assert!(reason.contains("not a finite number"), "reason was {reason:?}");
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }
}
