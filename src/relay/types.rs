//! Relay types and configuration

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_LENGTH};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Result type for relay operations
pub type RelayResult<T> = Result<T, RelayError>;

/// Headers never copied from the target response. These frame the
/// upstream transfer and are recomputed for the relayed one.
pub const EXCLUDED_HEADERS: [&str; 4] = [
    "content-length",
    "transfer-encoding",
    "content-encoding",
    "connection",
];

/// Relay-specific errors
#[derive(Debug, Error)]
pub enum RelayError {
    /// The outbound fetch never produced an HTTP response
    #[error("{0}")]
    Transport(String),

    #[error("invalid target: {0}")]
    InvalidTarget(String),
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        RelayError::Transport(error_chain(&err))
    }
}

/// Render an error followed by each of its causes. Wrappers that print
/// their cause's message are collapsed.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut last = err.to_string();
    let mut detail = last.clone();
    let mut source = err.source();
    while let Some(cause) = source {
        let message = cause.to_string();
        if message != last {
            detail.push_str(": ");
            detail.push_str(&message);
        }
        last = message;
        source = cause.source();
    }
    detail
}

/// Configuration for the relay forwarder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Deadline for one outbound fetch; `None` keeps the client default
    pub timeout: Option<Duration>,

    /// User-Agent sent to targets
    pub user_agent: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            user_agent: concat!("plistproxy/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Check a header name against [`EXCLUDED_HEADERS`], ignoring case
pub fn is_excluded_header(name: &str) -> bool {
    EXCLUDED_HEADERS
        .iter()
        .any(|excluded| excluded.eq_ignore_ascii_case(name))
}

/// Copy every header not in the exclusion set. Repeated headers keep
/// each value, in the target's order.
pub fn filter_headers(upstream: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(upstream.len());
    for (name, value) in upstream {
        if !is_excluded_header(name.as_str()) {
            headers.append(name.clone(), value.clone());
        }
    }
    headers
}

/// A target response ready to be relayed
#[derive(Debug, Clone)]
pub struct RelayResponse {
    /// Target status code
    pub status: StatusCode,

    /// Filtered target headers plus a recomputed Content-Length
    pub headers: HeaderMap,

    /// Target body
    pub body: Bytes,
}

impl RelayResponse {
    /// Build a relay response from the raw target parts
    pub fn from_upstream(status: StatusCode, upstream: &HeaderMap, body: Bytes) -> Self {
        let mut headers = filter_headers(upstream);
        if !body.is_empty() {
            headers.insert(CONTENT_LENGTH, HeaderValue::from(body.len()));
        }

        Self {
            status,
            headers,
            body,
        }
    }

    /// Reason phrase for the relayed status line
    pub fn reason(&self) -> Option<&'static str> {
        self.status.canonical_reason()
    }
}
