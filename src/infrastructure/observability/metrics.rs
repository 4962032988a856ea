//! Prometheus metrics definitions for Marketlens
//!
//! All metrics use the `marketlens_` prefix.

use prometheus::{
    CounterVec, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
    core::{AtomicF64, GenericGauge},
};
use std::sync::Arc;

/// Prometheus metrics for the inference gateway
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    /// Inbound events by event name and outcome (ok / error kind)
    pub requests_total: CounterVec,
    /// Pipeline latency per event, from dispatch to response
    pub pipeline_latency_seconds: HistogramVec,
    /// Currently connected sessions
    pub active_sessions: GenericGauge<AtomicF64>,
    /// Sessions accepted since start
    pub sessions_total: GenericGauge<AtomicF64>,
    /// Uptime in seconds
    pub uptime_seconds: GenericGauge<AtomicF64>,
}

impl Metrics {
    /// Create a new Metrics instance with all gauges and counters registered
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let requests_total = CounterVec::new(
            Opts::new(
                "marketlens_requests_total",
                "Inbound events by event and outcome",
            ),
            &["event", "outcome"],
        )?;
        registry.register(Box::new(requests_total.clone()))?;

        let pipeline_latency_seconds = HistogramVec::new(
            HistogramOpts::new(
                "marketlens_pipeline_latency_seconds",
                "Inference pipeline latency in seconds",
            )
            .buckets(vec![
                0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ]),
            &["event"],
        )?;
        registry.register(Box::new(pipeline_latency_seconds.clone()))?;

        let active_sessions = Gauge::with_opts(Opts::new(
            "marketlens_active_sessions",
            "Currently connected sessions",
        ))?;
        registry.register(Box::new(active_sessions.clone()))?;

        let sessions_total = Gauge::with_opts(Opts::new(
            "marketlens_sessions_total",
            "Sessions accepted since start",
        ))?;
        registry.register(Box::new(sessions_total.clone()))?;

        let uptime_seconds = Gauge::with_opts(Opts::new(
            "marketlens_uptime_seconds",
            "Server uptime in seconds",
        ))?;
        registry.register(Box::new(uptime_seconds.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            requests_total,
            pipeline_latency_seconds,
            active_sessions,
            sessions_total,
            uptime_seconds,
        })
    }

    /// Render all metrics in Prometheus text format
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode_to_string(&metric_families)
            .unwrap_or_default()
    }

    /// Count one handled event
    pub fn inc_requests(&self, event: &str, outcome: &str) {
        self.requests_total
            .with_label_values(&[event, outcome])
            .inc();
    }

    /// Observe pipeline latency
    pub fn observe_latency(&self, event: &str, seconds: f64) {
        self.pipeline_latency_seconds
            .with_label_values(&[event])
            .observe(seconds);
    }

    pub fn session_opened(&self) {
        self.active_sessions.inc();
        self.sessions_total.inc();
    }

    pub fn session_closed(&self) {
        self.active_sessions.dec();
    }

    /// Current value of `requests_total` for one event/outcome pair
    pub fn requests(&self, event: &str, outcome: &str) -> f64 {
        self.requests_total
            .with_label_values(&[event, outcome])
            .get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        metrics.inc_requests("fetch_data", "ok");
        assert!(metrics.render().contains("marketlens_"));
    }

    #[test]
    fn test_request_counter() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        metrics.inc_requests("fetch_data", "ok");
        metrics.inc_requests("fetch_data", "DataUnavailable");
        metrics.inc_requests("upload_image", "ok");
        let output = metrics.render();
        assert!(output.contains("marketlens_requests_total"));
        assert!(output.contains("DataUnavailable"));
        assert_eq!(metrics.requests("fetch_data", "ok"), 1.0);
        assert_eq!(metrics.requests("fetch_data", "DataUnavailable"), 1.0);
        assert_eq!(metrics.requests("upload_image", "ok"), 1.0);
    }

    #[test]
    fn test_session_gauges() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        metrics.session_opened();
        metrics.session_opened();
        metrics.session_closed();
        assert_eq!(metrics.active_sessions.get(), 1.0);
        assert_eq!(metrics.sessions_total.get(), 2.0);
    }
}
