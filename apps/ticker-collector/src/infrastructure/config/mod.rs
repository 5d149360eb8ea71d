//! Configuration Module
//!
//! Configuration loading for the collector.

mod settings;

pub use settings::{
    CollectorConfig, ConfigError, DEFAULT_SYMBOL, HandoffSettings, ReconnectSettings,
    StreamSettings,
};
