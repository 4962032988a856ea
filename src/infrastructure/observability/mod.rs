//! Push-based observability for Marketlens
//!
//! Metrics are kept in a Prometheus registry and pushed as periodic structured JSON logs.
//! There is no HTTP endpoint.

pub mod metrics;
pub mod reporter;

pub use metrics::Metrics;
pub use reporter::MetricsReporter;
