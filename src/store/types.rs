//! Store types and configuration

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest payload accepted by the store, in bytes
pub const MAX_PAYLOAD_BYTES: usize = 5000;

/// Length of a derived key in hex characters
pub const KEY_LEN: usize = 8;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store-specific errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("request body too long: {size} bytes exceeds {limit} byte limit")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("Key not found: {0}")]
    NotFound(String),
}

/// Configuration for the blob store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Maximum payload size in bytes
    pub max_payload_bytes: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_payload_bytes: MAX_PAYLOAD_BYTES,
        }
    }
}

/// A payload held by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    /// Exact payload bytes, never mutated after creation
    pub data: Bytes,
}

impl StoredBlob {
    pub fn new(data: Bytes) -> Self {
        Self { data }
    }

    /// Get size in bytes
    pub fn size(&self) -> usize {
        self.data.len()
    }
}
