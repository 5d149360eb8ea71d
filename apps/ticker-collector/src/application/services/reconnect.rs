//! Reconnection Policy
//!
//! Computes the delay inserted between a failed session and the next
//! connection attempt. The default is a fixed 5 second interval: enough to
//! avoid hammering the upstream endpoint, with no growth and no jitter.
//! Growth and jitter are opt-in through `ReconnectSettings`.
//!
//! The policy never gives up. There is no attempt limit.

use std::time::Duration;

use rand::Rng;

/// Default fixed reconnect delay.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Configuration for reconnection behavior.
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Delay before the first reconnection attempt.
    pub initial_delay: Duration,
    /// Upper bound on the delay.
    pub max_delay: Duration,
    /// Growth factor applied after each attempt (1.0 keeps the delay fixed).
    pub multiplier: f64,
    /// Jitter factor as a fraction (e.g., 0.1 = ±10% randomization).
    pub jitter_factor: f64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self::fixed(DEFAULT_RECONNECT_DELAY)
    }
}

impl ReconnectConfig {
    /// Fixed-interval configuration: every attempt waits `delay`.
    #[must_use]
    pub const fn fixed(delay: Duration) -> Self {
        Self {
            initial_delay: delay,
            max_delay: delay,
            multiplier: 1.0,
            jitter_factor: 0.0,
        }
    }

    /// Create configuration from `ReconnectSettings`.
    #[must_use]
    pub fn from_settings(settings: &crate::ReconnectSettings) -> Self {
        Self {
            initial_delay: settings.delay,
            max_delay: settings.max_delay.max(settings.delay),
            multiplier: settings.multiplier.max(1.0),
            jitter_factor: settings.jitter.clamp(0.0, 1.0),
        }
    }
}

/// Reconnection policy producing the delay before each attempt.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use ticker_collector::application::services::{ReconnectConfig, ReconnectPolicy};
///
/// let mut policy = ReconnectPolicy::new(ReconnectConfig::default());
/// assert_eq!(policy.next_delay(), Duration::from_secs(5));
/// assert_eq!(policy.next_delay(), Duration::from_secs(5));
/// ```
#[derive(Debug)]
pub struct ReconnectPolicy {
    config: ReconnectConfig,
    current_delay: Duration,
    attempt_count: u32,
}

impl ReconnectPolicy {
    /// Create a new reconnection policy.
    #[must_use]
    pub const fn new(config: ReconnectConfig) -> Self {
        let initial_delay = config.initial_delay;
        Self {
            config,
            current_delay: initial_delay,
            attempt_count: 0,
        }
    }

    /// Get the next delay, then advance the backoff for subsequent calls.
    pub fn next_delay(&mut self) -> Duration {
        self.attempt_count = self.attempt_count.saturating_add(1);

        let delay_with_jitter = self.apply_jitter(self.current_delay);

        #[allow(clippy::cast_precision_loss)]
        let scaled = (self.current_delay.as_millis() as f64 * self.config.multiplier).round();
        let next_millis = if scaled.is_finite() && scaled > 0.0 {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                scaled as u128
            }
        } else {
            0
        };
        let capped = next_millis.min(self.config.max_delay.as_millis());
        self.current_delay = Duration::from_millis(u64::try_from(capped).unwrap_or(u64::MAX));

        delay_with_jitter
    }

    /// Reset the policy after a session that reached streaming.
    pub const fn reset(&mut self) {
        self.current_delay = self.config.initial_delay;
        self.attempt_count = 0;
    }

    /// Number of delays handed out since the last reset.
    #[must_use]
    pub const fn attempt_count(&self) -> u32 {
        self.attempt_count
    }

    fn apply_jitter(&self, duration: Duration) -> Duration {
        if self.config.jitter_factor <= 0.0 {
            return duration;
        }

        #[allow(clippy::cast_precision_loss)]
        let base_millis = duration.as_millis() as f64;
        let jitter_range = base_millis * self.config.jitter_factor;
        let jitter: f64 = rand::rng().random_range(-jitter_range..=jitter_range);
        let adjusted_millis = (base_millis + jitter).max(1.0);

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let adjusted_u64 = adjusted_millis as u64;
        Duration::from_millis(adjusted_u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_fixed_five_seconds() {
        let mut policy = ReconnectPolicy::new(ReconnectConfig::default());
        for _ in 0..10 {
            assert_eq!(policy.next_delay(), Duration::from_secs(5));
        }
        assert_eq!(policy.attempt_count(), 10);
    }

    #[test]
    fn growth_is_capped() {
        let config = ReconnectConfig {
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(2000),
            multiplier: 4.0,
            jitter_factor: 0.0,
        };
        let mut policy = ReconnectPolicy::new(config);

        assert_eq!(policy.next_delay(), Duration::from_millis(1000));
        assert_eq!(policy.next_delay(), Duration::from_millis(2000));
        assert_eq!(policy.next_delay(), Duration::from_millis(2000));
    }

    #[test]
    fn reset_restores_initial_delay() {
        let config = ReconnectConfig {
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            multiplier: 2.0,
            jitter_factor: 0.0,
        };
        let mut policy = ReconnectPolicy::new(config);

        let _ = policy.next_delay();
        let _ = policy.next_delay();
        assert_eq!(policy.attempt_count(), 2);

        policy.reset();

        assert_eq!(policy.attempt_count(), 0);
        assert_eq!(policy.next_delay(), Duration::from_millis(100));
    }

    #[test]
    fn jitter_stays_in_bounds() {
        for _ in 0..100 {
            let mut policy = ReconnectPolicy::new(ReconnectConfig {
                jitter_factor: 0.1,
                ..ReconnectConfig::fixed(Duration::from_millis(1000))
            });

            let millis = policy.next_delay().as_millis();
            assert!(millis >= 900, "delay {millis}ms is below minimum 900ms");
            assert!(millis <= 1100, "delay {millis}ms is above maximum 1100ms");
        }
    }

    #[test]
    fn settings_jitter_reaches_the_policy() {
        let settings = crate::ReconnectSettings {
            jitter: 0.2,
            ..crate::ReconnectSettings::default()
        };
        let config = ReconnectConfig::from_settings(&settings);
        assert!((config.jitter_factor - 0.2).abs() < f64::EPSILON);

        let mut policy = ReconnectPolicy::new(config);
        for _ in 0..100 {
            let millis = policy.next_delay().as_millis();
            assert!((4000..=6000).contains(&millis), "delay {millis}ms outside ±20% of 5s");
        }
    }

    #[test]
    fn default_settings_stay_fixed() {
        let config = ReconnectConfig::from_settings(&crate::ReconnectSettings::default());
        let mut policy = ReconnectPolicy::new(config);
        for _ in 0..10 {
            assert_eq!(policy.next_delay(), Duration::from_secs(5));
        }
    }

    #[test]
    fn never_gives_up() {
        let mut policy = ReconnectPolicy::new(ReconnectConfig::fixed(Duration::from_millis(1)));
        for _ in 0..10_000 {
            assert_eq!(policy.next_delay(), Duration::from_millis(1));
        }
    }
}
