//! HTTP Relay Module
//!
//! Forwards a target URL to the open internet and hands back the target's
//! response for verbatim relay to the original caller.
//!
//! Key features:
//! - Single outbound GET per call, no retries, no caching
//! - Transport-framing headers stripped and re-derived
//! - HTTP error statuses from the target are relayed, not treated as failures

pub mod forwarder;
pub mod types;

pub use forwarder::RelayForwarder;
pub use types::{
    error_chain, filter_headers, is_excluded_header, RelayConfig, RelayError, RelayResponse, RelayResult,
    EXCLUDED_HEADERS,
};
