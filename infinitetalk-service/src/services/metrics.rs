//! Metrics collection and Prometheus export.
//!
//! Initializes the metrics exporter and provides the /metrics endpoint body. Generation
//! metrics are recorded by [`crate::services::GenerationService`].

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

/// Global handle to the Prometheus recorder.
pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub const GENERATION_REQUESTS_TOTAL: &str = "generation_requests_total";
pub const GENERATION_DURATION_SECONDS: &str = "generation_duration_seconds";
pub const ASSET_DOWNLOAD_BYTES_TOTAL: &str = "asset_download_bytes_total";

/// Initialize the metrics recorder.
///
/// Call once at startup before any metrics are recorded. Until then every metric macro
/// is a no-op, which is what the integration tests rely on.
pub fn init_metrics() -> Result<(), String> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| format!("failed to install Prometheus recorder: {}", e))?;

    METRICS_HANDLE
        .set(handle)
        .map_err(|_| "failed to set metrics handle: already initialized".to_string())
}

/// Get the current metrics in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized".to_string())
}
