//! Metrics and observability module
//!
//! Provides Prometheus-compatible metrics for the relay and the store.
//!
//! Key metrics exposed:
//! - Relay outcomes, upstream status classes and relayed bytes
//! - Relay latency
//! - Store writes, lookups and current size

pub mod exporter;
pub mod recorder;

pub use exporter::{install_metrics, metrics_route, render_metrics, MetricsError};
pub use recorder::{
    init_metrics, record_store_get, record_store_put, set_store_usage, ProxyTimer, StorePutOutcome,
};
