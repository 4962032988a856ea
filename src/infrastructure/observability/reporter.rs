//! Push-based metrics reporter for Marketlens
//!
//! Periodically outputs metrics as structured JSON to stdout.
//!
//! **Security**: This system only SENDS data, never accepts requests.

use crate::infrastructure::observability::metrics::Metrics;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{info, warn};

const EVENTS: &[&str] = &["fetch_data", "upload_image", "unknown"];
const OUTCOMES: &[&str] = &[
    "ok",
    "DataUnavailable",
    "InsufficientHistory",
    "FeatureShapeMismatch",
    "ImageDecodeError",
    "PredictorError",
    "BadRequest",
];

/// Metrics snapshot for JSON output
#[derive(Serialize)]
pub struct MetricsSnapshot {
    pub timestamp: String,
    pub uptime_seconds: u64,
    pub version: String,
    pub sessions: SessionSnapshot,
    pub requests: Vec<RequestSnapshot>,
}

#[derive(Serialize)]
pub struct SessionSnapshot {
    pub active: u64,
    pub total: u64,
}

#[derive(Serialize)]
pub struct RequestSnapshot {
    pub event: String,
    pub outcome: String,
    pub count: u64,
}

/// Push-based metrics reporter
///
/// Outputs metrics as structured JSON logs on a configurable interval.
/// No HTTP server, no incoming connections - only outbound data.
pub struct MetricsReporter {
    metrics: Metrics,
    start_time: Instant,
    interval: Duration,
}

impl MetricsReporter {
    pub fn new(metrics: Metrics, interval_seconds: u64) -> Self {
        Self {
            metrics,
            start_time: Instant::now(),
            interval: Duration::from_secs(interval_seconds),
        }
    }

    /// Run the reporter in a loop, outputting metrics periodically
    pub async fn run(self) {
        info!(
            "MetricsReporter: Starting push-based metrics (interval: {:?})",
            self.interval
        );

        loop {
            tokio::time::sleep(self.interval).await;

            let snapshot = self.collect_snapshot();
            match serde_json::to_string(&snapshot) {
                Ok(json) => {
                    // Use a special prefix so logs can be easily filtered
                    println!("METRICS_JSON:{}", json);
                    info!(
                        "Sessions: {} active / {} total | Uptime: {}s",
                        snapshot.sessions.active, snapshot.sessions.total, snapshot.uptime_seconds
                    );
                }
                Err(e) => warn!("Failed to serialize metrics: {}", e),
            }
        }
    }

    /// Collect current metrics snapshot
    pub fn collect_snapshot(&self) -> MetricsSnapshot {
        let uptime = self.start_time.elapsed().as_secs();
        self.metrics.uptime_seconds.set(uptime as f64);

        let requests = EVENTS
            .iter()
            .flat_map(|event| OUTCOMES.iter().map(move |outcome| (*event, *outcome)))
            .filter_map(|(event, outcome)| {
                let count = self.metrics.requests(event, outcome) as u64;
                (count > 0).then(|| RequestSnapshot {
                    event: event.to_string(),
                    outcome: outcome.to_string(),
                    count,
                })
            })
            .collect();

        MetricsSnapshot {
            timestamp: chrono::Utc::now().to_rfc3339(),
            uptime_seconds: uptime,
            version: env!("CARGO_PKG_VERSION").to_string(),
            sessions: SessionSnapshot {
                active: self.metrics.active_sessions.get().max(0.0) as u64,
                total: self.metrics.sessions_total.get() as u64,
            },
            requests,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_snapshot_collection() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        metrics.session_opened();
        metrics.inc_requests("fetch_data", "ok");
        metrics.inc_requests("fetch_data", "ok");
        metrics.inc_requests("upload_image", "ImageDecodeError");

        let snapshot = MetricsReporter::new(metrics, 60).collect_snapshot();

        assert_eq!(snapshot.sessions.active, 1);
        assert_eq!(snapshot.requests.len(), 2);
        assert_eq!(snapshot.requests[0].event, "fetch_data");
        assert_eq!(snapshot.requests[0].count, 2);
        assert!(!snapshot.timestamp.is_empty());
    }

    #[test]
    fn test_snapshot_serialization() {
        let snapshot = MetricsSnapshot {
            timestamp: "2026-01-10T10:00:00Z".to_string(),
            uptime_seconds: 3600,
            version: "0.4.2".to_string(),
            sessions: SessionSnapshot {
                active: 3,
                total: 10,
            },
            requests: vec![RequestSnapshot {
                event: "fetch_data".to_string(),
                outcome: "ok".to_string(),
                count: 7,
            }],
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"active\":3"));
        assert!(json.contains("\"fetch_data\""));
    }
}
