//! Content-addressed payload store
//!
//! Keeps small binary payloads (plist documents in practice) in memory
//! under a short key derived from their MD5 digest.
//!
//! Key features:
//! - 8-character hex keys, deterministic for identical payloads
//! - Hard size limit per payload
//! - Process-lifetime retention (no eviction, no persistence)

pub mod storage;
pub mod types;

pub use storage::{derive_key, BlobStore, StoreStats};
pub use types::{StoreConfig, StoreError, StoreResult, StoredBlob, KEY_LEN, MAX_PAYLOAD_BYTES};
