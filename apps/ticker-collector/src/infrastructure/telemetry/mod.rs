//! Tracing Initialization
//!
//! Configures the `tracing` subscriber used for the collector's diagnostic
//! trace: connect attempts, disconnects, decode errors and retries.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log filter (default: info)
//! - `LOG_FORMAT`: `compact` for single-line output (default: full)
//!
//! # Usage
//!
//! ```ignore
//! use ticker_collector::infrastructure::telemetry;
//!
//! telemetry::init();
//! tracing::info!("Collector starting");
//! ```

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Output format for trace lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Default multi-field format.
    #[default]
    Full,
    /// Single-line compact format.
    Compact,
}

impl LogFormat {
    /// Parse format from string.
    #[must_use]
    pub fn from_str_case_insensitive(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "compact" => Self::Compact,
            _ => Self::Full,
        }
    }
}

/// Telemetry configuration.
#[derive(Debug, Clone, Default)]
pub struct TelemetryConfig {
    /// Output format.
    pub format: LogFormat,
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let format = std::env::var("LOG_FORMAT")
            .map(|s| LogFormat::from_str_case_insensitive(&s))
            .unwrap_or_default();

        Self { format }
    }
}

/// Initialize tracing with configuration from the environment.
pub fn init() {
    init_with_config(&TelemetryConfig::from_env());
}

/// Initialize tracing with custom configuration.
///
/// Does nothing if a global subscriber is already installed.
#[allow(clippy::expect_used)]
pub fn init_with_config(config: &TelemetryConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"))
        .add_directive(
            "ticker_collector=info"
                .parse()
                .expect("static directive 'ticker_collector=info' is valid"),
        )
        .add_directive(
            "tungstenite=warn"
                .parse()
                .expect("static directive 'tungstenite=warn' is valid"),
        );

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match config.format {
        LogFormat::Full => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .try_init(),
        LogFormat::Compact => registry
            .with(tracing_subscriber::fmt::layer().compact().with_target(false))
            .try_init(),
    };

    if let Err(e) = result {
        eprintln!("Tracing subscriber already installed: {e}");
    }
}

// =============================================================================
// Tests
// =============================================================================
