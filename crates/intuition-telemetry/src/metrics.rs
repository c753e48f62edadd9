//! Prometheus metrics for the transaction lifecycle.
//!
//! All metrics follow the naming convention: `intuition_tx_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, CounterVec, Encoder, Histogram, HistogramOpts, IntGauge, Opts, Registry,
    TextEncoder,
};
use std::sync::OnceLock;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    /// Writes handed to the wallet, by contract function
    pub static ref TX_SUBMITTED: CounterVec = CounterVec::new(
        Opts::new("intuition_tx_submitted_total", "Writes handed to the wallet provider"),
        &["function"]
    ).expect("metric creation failed");

    /// Writes that reached `complete`, by contract function
    pub static ref TX_COMPLETED: CounterVec = CounterVec::new(
        Opts::new("intuition_tx_completed_total", "Writes confirmed on chain"),
        &["function"]
    ).expect("metric creation failed");

    /// Writes that ended in `error`, by error kind
    pub static ref TX_FAILED: CounterVec = CounterVec::new(
        Opts::new("intuition_tx_failed_total", "Writes that ended in error"),
        &["function", "kind"]
    ).expect("metric creation failed");

    /// Time from broadcast to receipt
    pub static ref TX_CONFIRMATION_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "intuition_tx_confirmation_duration_seconds",
            "Time between wallet hash and chain receipt"
        ).buckets(exponential_buckets(0.5, 2.0, 10).expect("valid buckets"))
    ).expect("metric creation failed");

    /// Receipt waits currently outstanding
    pub static ref TX_IN_FLIGHT: IntGauge = IntGauge::new(
        "intuition_tx_in_flight",
        "Receipt waits currently outstanding"
    ).expect("metric creation failed");
}

static REGISTERED: OnceLock<Result<(), String>> = OnceLock::new();

/// Register all metrics with the global registry.
///
/// Safe to call more than once; only the first call registers, and every
/// call reports its outcome.
pub fn register_metrics() -> Result<(), TelemetryError> {
    register_once(&REGISTERED, &REGISTRY)
}

fn register_once(
    outcome: &OnceLock<Result<(), String>>,
    registry: &Registry,
) -> Result<(), TelemetryError> {
    outcome
        .get_or_init(|| register_all(registry))
        .clone()
        .map_err(TelemetryError::MetricsInit)
}

fn register_all(registry: &Registry) -> Result<(), String> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(TX_SUBMITTED.clone()),
        Box::new(TX_COMPLETED.clone()),
        Box::new(TX_FAILED.clone()),
        Box::new(TX_CONFIRMATION_DURATION.clone()),
        Box::new(TX_IN_FLIGHT.clone()),
    ];

    for metric in metrics {
        registry.register(metric).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Record a write handed to the wallet.
pub fn record_submitted(function: &str) {
    TX_SUBMITTED.with_label_values(&[function]).inc();
}

/// Record a write confirmed on chain.
pub fn record_completed(function: &str, confirmation_secs: f64) {
    TX_COMPLETED.with_label_values(&[function]).inc();
    TX_CONFIRMATION_DURATION.observe(confirmation_secs);
}

/// Record a failed write.
pub fn record_failed(function: &str, kind: &str) {
    TX_FAILED.with_label_values(&[function, kind]).inc();
}

/// Gauge guard for an outstanding receipt wait. Decrements on drop.
pub struct InFlightGuard(());

impl InFlightGuard {
    /// Increment the in-flight gauge.
    pub fn start() -> Self {
        TX_IN_FLIGHT.inc();
        Self(())
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        TX_IN_FLIGHT.dec();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_metrics_is_idempotent() {
        assert!(register_metrics().is_ok());
        assert!(register_metrics().is_ok());
    }

    #[test]
    fn test_registration_failure_is_reported_every_call() {
        let registry = Registry::new();
        let clash = IntGauge::new("intuition_tx_in_flight", "Registered first").unwrap();
        registry.register(Box::new(clash)).unwrap();
        let outcome = OnceLock::new();

        let first = register_once(&outcome, &registry);
        let second = register_once(&outcome, &registry);
        assert!(matches!(first, Err(TelemetryError::MetricsInit(_))));
        assert_eq!(second.unwrap_err().to_string(), first.unwrap_err().to_string());
    }

    #[test]
    fn test_counters_increment() {
        record_submitted("depositAtom");
        record_failed("depositAtom", "user_rejected");
        assert!(TX_SUBMITTED.with_label_values(&["depositAtom"]).get() >= 1.0);
        assert!(
            TX_FAILED
                .with_label_values(&["depositAtom", "user_rejected"])
                .get()
                >= 1.0
        );
    }

    #[test]
    fn test_encode_contains_metric_names() {
        register_metrics().unwrap();
        record_completed("createAtom", 1.5);
        let text = encode_metrics().unwrap();
        assert!(text.contains("intuition_tx_completed_total"));
    }

    #[test]
    fn test_in_flight_guard() {
        let guard = InFlightGuard::start();
        assert!(TX_IN_FLIGHT.get() >= 1);
        drop(guard);
    }
}
