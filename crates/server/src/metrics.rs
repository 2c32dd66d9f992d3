//! Prometheus metrics.
//!
//! A process-wide recorder installed at startup; handlers record request
//! counts, degradation errors and LLM round-trip latency, all scraped from
//! `/metrics`.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the Prometheus recorder. Safe to call more than once; only the
/// first call installs.
pub fn init_metrics() -> Option<&'static PrometheusHandle> {
    match HANDLE.get_or_try_init(|| PrometheusBuilder::new().install_recorder()) {
        Ok(handle) => Some(handle),
        Err(err) => {
            tracing::error!(error = %err, "failed to install Prometheus recorder");
            None
        }
    }
}

/// Render the current metrics snapshot for scraping.
pub async fn metrics_handler() -> String {
    HANDLE
        .get()
        .map(PrometheusHandle::render)
        .unwrap_or_default()
}

/// Count one API request by endpoint.
pub fn record_request(endpoint: &'static str) {
    counter!("lead_engine_requests_total", "endpoint" => endpoint).increment(1);
}

/// Count one degradation (LLM failure, dropped record, fallback taken).
pub fn record_error(component: &'static str) {
    counter!("lead_engine_errors_total", "component" => component).increment(1);
}

/// Record one LLM round trip, in seconds.
pub fn record_llm_latency(operation: &'static str, seconds: f64) {
    histogram!("lead_engine_llm_latency_seconds", "operation" => operation).record(seconds);
}
