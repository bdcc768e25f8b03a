use metrics::{counter, histogram};
use std::net::SocketAddr;

pub const METRICS_PORT_ENV_VAR: &str = "BREWERY_METRICS_PORT";

/// Install the Prometheus exporter when `BREWERY_METRICS_PORT` is set.
/// Without it the recording calls below are no-ops.
pub fn init_metrics() {
    let port: u16 = match std::env::var(METRICS_PORT_ENV_VAR)
        .ok()
        .and_then(|s| s.parse().ok())
    {
        Some(port) => port,
        None => return,
    };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    let builder = metrics_exporter_prometheus::PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => tracing::info!("Prometheus exporter listening on http://{}/metrics", addr),
        Err(e) => tracing::warn!("Prometheus exporter install failed: {}", e),
    }
}

pub fn page_fetched(duration_secs: f64) {
    counter!("brewery_pages_fetched_total").increment(1);
    histogram!("brewery_fetch_duration_seconds").record(duration_secs);
}

pub fn fetch_failed(kind: &'static str) {
    counter!("brewery_fetch_failures_total", "kind" => kind).increment(1);
}

pub fn records_written(format: &'static str, count: usize) {
    counter!("brewery_records_written_total", "format" => format).increment(count as u64);
}
