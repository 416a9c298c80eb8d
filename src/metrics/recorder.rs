//! Metrics recorder for relay and store operations
//!
//! Every function is a no-op until a recorder is installed.

use crate::store::StoreStats;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

static METRICS_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Initialize metric descriptions (call once at startup)
pub fn init_metrics() {
    if METRICS_INITIALIZED.swap(true, Ordering::SeqCst) {
        return; // Already initialized
    }

    // Relay
    describe_counter!(
        "plistproxy_proxy_requests_total",
        "Total number of relay attempts by outcome"
    );
    describe_counter!(
        "plistproxy_proxy_upstream_status_total",
        "Relayed target responses by status class"
    );
    describe_counter!(
        "plistproxy_proxy_relayed_bytes_total",
        "Total body bytes relayed back to callers"
    );
    describe_histogram!(
        "plistproxy_proxy_duration_seconds",
        "Time spent on one outbound fetch"
    );

    // Store
    describe_counter!(
        "plistproxy_store_puts_total",
        "Total number of store writes by outcome"
    );
    describe_counter!(
        "plistproxy_store_gets_total",
        "Total number of store lookups by outcome"
    );
    describe_gauge!("plistproxy_store_blobs", "Payloads currently stored");
    describe_gauge!("plistproxy_store_bytes", "Bytes currently stored");
}

/// Bucket a status code into its class label
pub fn status_class(status: u16) -> &'static str {
    match status {
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}

// ============== Relay Operations ==============

/// Record a relayed target response
pub fn record_relayed(status: u16, body_bytes: usize, duration: Duration) {
    counter!("plistproxy_proxy_requests_total", "outcome" => "relayed").increment(1);
    counter!("plistproxy_proxy_upstream_status_total", "class" => status_class(status))
        .increment(1);
    counter!("plistproxy_proxy_relayed_bytes_total").increment(body_bytes as u64);
    histogram!("plistproxy_proxy_duration_seconds").record(duration.as_secs_f64());
}

/// Record a transport failure
pub fn record_relay_failed(duration: Duration) {
    counter!("plistproxy_proxy_requests_total", "outcome" => "failed").increment(1);
    histogram!("plistproxy_proxy_duration_seconds").record(duration.as_secs_f64());
}

/// Times one outbound fetch and records its outcome
pub struct ProxyTimer {
    start_time: Instant,
}

impl ProxyTimer {
    pub fn start() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    pub fn relayed(self, status: u16, body_bytes: usize) {
        record_relayed(status, body_bytes, self.start_time.elapsed());
    }

    pub fn failed(self) {
        record_relay_failed(self.start_time.elapsed());
    }
}

// ============== Store Operations ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorePutOutcome {
    Stored,
    Rejected,
}

impl StorePutOutcome {
    fn as_label(self) -> &'static str {
        match self {
            StorePutOutcome::Stored => "stored",
            StorePutOutcome::Rejected => "rejected",
        }
    }
}

/// Record a store write
pub fn record_store_put(outcome: StorePutOutcome) {
    counter!("plistproxy_store_puts_total", "outcome" => outcome.as_label()).increment(1);
}

/// Record a store lookup
pub fn record_store_get(hit: bool) {
    let outcome = if hit { "hit" } else { "miss" };
    counter!("plistproxy_store_gets_total", "outcome" => outcome).increment(1);
}

/// Update store usage gauges
pub fn set_store_usage(stats: StoreStats) {
    gauge!("plistproxy_store_blobs").set(stats.total_blobs as f64);
    gauge!("plistproxy_store_bytes").set(stats.used_bytes as f64);
}
