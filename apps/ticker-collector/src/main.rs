//! Ticker Collector Binary
//!
//! Streams the Binance `miniTicker` feed and logs every price.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin ticker-collector
//! ```
//!
//! # Environment Variables
//!
//! All optional.
//!
//! - `COLLECTOR_SYMBOL`: Symbol to stream (default: btcusdt)
//! - `COLLECTOR_STREAM_URL`: Full endpoint override
//! - `COLLECTOR_RECONNECT_DELAY_SECS`: Back-off delay (default: 5)
//! - `COLLECTOR_RECONNECT_DELAY_MAX_SECS`: Back-off cap (default: 5)
//! - `COLLECTOR_RECONNECT_MULTIPLIER`: Back-off growth (default: 1.0, fixed)
//! - `COLLECTOR_RECONNECT_JITTER`: Back-off spread, 0.0 to 1.0 (default: 0.0)
//! - `COLLECTOR_HANDOFF_CAPACITY`: Handoff channel slots (default: 1)
//! - `LOG_FORMAT`: full | compact (default: full)
//! - `RUST_LOG`: Log level (default: info)

use std::sync::Arc;

use ticker_collector::{
    BinanceConnector, CollectorConfig, FeedStatus, ReconnectConfig, Supervisor, Tick, TraceSink,
    WebSocketSource, init_telemetry, run_consumer,
};
use tokio::signal;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    load_dotenv();

    init_telemetry();

    tracing::info!("Starting ticker collector");

    let config = CollectorConfig::from_env()?;
    log_config(&config);

    let shutdown_token = CancellationToken::new();
    let status = Arc::new(FeedStatus::new());

    // Handoff channel between the feed session and the consumer
    let (tick_tx, tick_rx) = mpsc::channel::<Tick>(config.handoff.capacity);

    // Consumer runs for the life of the process, independent of reconnects
    let consumer_handle = tokio::spawn(run_consumer(tick_rx, TraceSink::new()));

    let connector = BinanceConnector::new(
        config.stream.url.clone(),
        WebSocketSource::new(),
        Arc::clone(&status),
    );
    let supervisor = Supervisor::new(
        connector,
        ReconnectConfig::from_settings(&config.reconnect),
        Arc::clone(&status),
        shutdown_token.clone(),
    );
    let mut supervisor_handle = tokio::spawn(supervisor.run(tick_tx));

    tracing::info!("Ticker collector ready");

    let supervisor_exited = tokio::select! {
        () = await_shutdown(shutdown_token.clone()) => false,
        result = &mut supervisor_handle => {
            result?;
            true
        }
    };

    if supervisor_exited {
        tracing::warn!("Supervisor stopped without a shutdown signal");
        shutdown_token.cancel();
    } else {
        supervisor_handle.await?;
    }

    let consumed = consumer_handle.await?;
    let stats = status.snapshot();
    tracing::info!(
        consumed,
        connect_attempts = stats.connect_attempts,
        session_failures = stats.session_failures,
        decode_errors = stats.decode_errors,
        "Ticker collector stopped"
    );
    Ok(())
}

/// Load .env file from current or ancestor directories.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Log the parsed configuration.
fn log_config(config: &CollectorConfig) {
    tracing::info!(
        symbol = %config.stream.symbol,
        url = %config.stream.url,
        reconnect_delay_secs = config.reconnect.delay.as_secs(),
        reconnect_jitter = config.reconnect.jitter,
        handoff_capacity = config.handoff.capacity,
        "Configuration loaded"
    );
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
#[allow(clippy::expect_used)]
async fn await_shutdown(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }

    shutdown_token.cancel();
}
