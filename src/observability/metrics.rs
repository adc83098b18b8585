//! Metrics collection and exposition.
//!
//! # Metrics
//! - `worker_forward_requests_total` (counter): forwarding calls by method, outcome
//! - `worker_forward_duration_seconds` (histogram): origin round-trip time by method
//! - `worker_admission_wait_seconds` (histogram): time spent waiting for admission
//!
//! Recording is a no-op until `init_metrics` installs the exporter.

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener on `addr`.
///
/// Must be called from within the Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record the result of one forwarding call.
pub fn record_forward(method: &str, outcome: &'static str, elapsed: Duration) {
    counter!(
        "worker_forward_requests_total",
        "method" => method.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    histogram!("worker_forward_duration_seconds", "method" => method.to_string())
        .record(elapsed.as_secs_f64());
}

/// Record time a caller spent blocked in admission.
pub fn record_admission_wait(waited: Duration) {
    histogram!("worker_admission_wait_seconds").record(waited.as_secs_f64());
}
