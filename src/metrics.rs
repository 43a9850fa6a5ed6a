use metrics::{counter, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus exporter and register all application metrics.
/// Returns a `PrometheusHandle` whose `render()` method produces the
/// text/plain Prometheus scrape payload.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    // Pre-register counters so they appear even before the first increment.
    counter!("report_loads_total").absolute(0);
    counter!("report_cache_hits_total").absolute(0);
    counter!("source_failures_total").absolute(0);
    counter!("csv_lines_skipped_total").absolute(0);

    gauge!("merged_records").set(0.0);

    Ok(handle)
}
