use crate::errors::Result;
use lazy_static::lazy_static;
use prometheus::{Counter, Encoder, Gauge, Histogram, HistogramOpts, Opts, Registry, TextEncoder};
use tracing::error;

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();
    pub static ref DEVICE_REQUESTS_TOTAL: Counter = Counter::with_opts(Opts::new(
        "dashboard_device_requests_total",
        "Total read requests sent to the sensor device"
    ))
    .unwrap();
    pub static ref DEVICE_FAILURES_TOTAL: Counter = Counter::with_opts(Opts::new(
        "dashboard_device_failures_total",
        "Total device reads that ended unreachable or malformed"
    ))
    .unwrap();
    pub static ref DEVICE_LATENCY_SECONDS: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "dashboard_device_latency_seconds",
            "Time taken by a single device read"
        )
        .buckets(vec![0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0])
    )
    .unwrap();
    pub static ref HISTORY_LENGTH: Gauge = Gauge::with_opts(Opts::new(
        "dashboard_history_length",
        "Readings currently held in the history buffer"
    ))
    .unwrap();
    pub static ref HISTORY_EVICTIONS_TOTAL: Counter = Counter::with_opts(Opts::new(
        "dashboard_history_evictions_total",
        "Readings dropped from the front of a full history buffer"
    ))
    .unwrap();
}

pub fn init_metrics() -> Result<()> {
    REGISTRY.register(Box::new(DEVICE_REQUESTS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(DEVICE_FAILURES_TOTAL.clone()))?;
    REGISTRY.register(Box::new(DEVICE_LATENCY_SECONDS.clone()))?;
    REGISTRY.register(Box::new(HISTORY_LENGTH.clone()))?;
    REGISTRY.register(Box::new(HISTORY_EVICTIONS_TOTAL.clone()))?;
    Ok(())
}

fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Scrape body for one service. The history gauge is process-wide, so it is
/// set here from the served instance rather than by every buffer write.
pub fn render_metrics(history_length: usize) -> String {
    HISTORY_LENGTH.set(history_length as f64);
    gather_metrics()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;

    #[test]
    fn test_register_and_gather() {
        init_metrics().unwrap();
        DEVICE_REQUESTS_TOTAL.inc();

        let text = render_metrics(3);
        assert!(text.contains("dashboard_device_requests_total"));
        assert!(text.contains("dashboard_history_length 3"));

        assert!(matches!(init_metrics(), Err(Error::Metrics(_))));
    }
}
