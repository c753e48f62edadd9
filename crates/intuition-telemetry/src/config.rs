//! Telemetry configuration from environment variables.

use serde::{Deserialize, Serialize};
use std::env;

const DEFAULT_SERVICE: &str = "intuition-tx";
const DEFAULT_NETWORK: &str = "sepolia";

/// Configuration for logging and metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Service name attached to every log line
    pub service_name: String,

    /// `EnvFilter` directive, e.g. `info` or `intuition_tx=debug,warn`
    pub log_level: String,

    /// Write log lines to stdout
    pub console_output: bool,

    /// One JSON object per log line instead of human-readable text
    pub json_logs: bool,

    /// Register the Prometheus collectors on startup
    pub metrics_enabled: bool,

    /// Chain label (mainnet, sepolia, local)
    pub network: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: DEFAULT_SERVICE.to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
            metrics_enabled: true,
            network: DEFAULT_NETWORK.to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Read `INTUITION_*` variables, falling back to defaults.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `INTUITION_SERVICE_NAME` | `intuition-tx` |
    /// | `INTUITION_LOG_LEVEL`, then `RUST_LOG` | `info` |
    /// | `INTUITION_CONSOLE_OUTPUT` | `true` |
    /// | `INTUITION_JSON_LOGS` | `true` inside a container, else `false` |
    /// | `INTUITION_METRICS` | `true` |
    /// | `INTUITION_NETWORK` | `sepolia` |
    pub fn from_env() -> Self {
        let in_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        Self {
            service_name: text("INTUITION_SERVICE_NAME").unwrap_or_else(|| DEFAULT_SERVICE.into()),
            log_level: text("INTUITION_LOG_LEVEL")
                .or_else(|| text("RUST_LOG"))
                .unwrap_or_else(|| "info".into()),
            console_output: flag("INTUITION_CONSOLE_OUTPUT").unwrap_or(true),
            json_logs: flag("INTUITION_JSON_LOGS").unwrap_or(in_container),
            metrics_enabled: flag("INTUITION_METRICS").unwrap_or(true),
            network: text("INTUITION_NETWORK").unwrap_or_else(|| DEFAULT_NETWORK.into()),
        }
    }

    /// `service@network`, e.g. `intuition-tx@sepolia`.
    pub fn full_service_name(&self) -> String {
        format!("{}@{}", self.service_name, self.network)
    }
}

fn text(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn flag(name: &str) -> Option<bool> {
    text(name).and_then(|v| parse_flag(&v))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
