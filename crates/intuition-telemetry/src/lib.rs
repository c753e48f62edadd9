//! # Intuition Telemetry
//!
//! Logging and metrics for the transaction lifecycle.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use intuition_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_telemetry(&config).expect("Failed to init telemetry");
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `INTUITION_SERVICE_NAME` | `intuition-tx` | Service name in logs |
//! | `INTUITION_LOG_LEVEL` | `info` | Log level filter |
//! | `INTUITION_JSON_LOGS` | `false` | JSON log lines |
//! | `INTUITION_METRICS` | `true` | Register Prometheus collectors |
//! | `INTUITION_NETWORK` | `sepolia` | Network label |

#![warn(missing_docs)]

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{encode_metrics, register_metrics, InFlightGuard};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// Subscriber could not be installed.
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    /// Metric registration or encoding failed.
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    /// Bad filter directive or other config value.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Register metrics (when enabled) and install the log subscriber.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    if config.metrics_enabled {
        register_metrics()?;
    }
    init_logging(config)
}
