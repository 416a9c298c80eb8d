//! In-memory blob storage
//!
//! Payloads live for the lifetime of the process. Two payloads whose
//! truncated digests collide share a key; the later write replaces the
//! earlier one.

use crate::store::types::{StoreConfig, StoreError, StoreResult, StoredBlob, KEY_LEN};
use bytes::Bytes;
use md5::{Digest, Md5};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Offset of the key inside the hex-encoded digest
const KEY_OFFSET: usize = 8;

/// Derive the store key for a payload: hex MD5, characters 8..16
pub fn derive_key(payload: &[u8]) -> String {
    let digest = hex::encode(Md5::digest(payload));
    digest[KEY_OFFSET..KEY_OFFSET + KEY_LEN].to_string()
}

/// Key -> payload table with its running byte total
#[derive(Default)]
struct BlobTable {
    blobs: HashMap<String, StoredBlob>,
    used_bytes: u64,
}

/// Storage backend for plist payloads
pub struct BlobStore {
    table: RwLock<BlobTable>,

    config: StoreConfig,
}

impl BlobStore {
    /// Create an empty store
    pub fn new(config: StoreConfig) -> Self {
        Self {
            table: RwLock::new(BlobTable::default()),
            config,
        }
    }

    /// Store a payload and return its key
    ///
    /// Oversized payloads are rejected before any entry is touched.
    pub fn put(&self, payload: impl Into<Bytes>) -> StoreResult<String> {
        let data = payload.into();
        let limit = self.config.max_payload_bytes;
        if data.len() > limit {
            return Err(StoreError::PayloadTooLarge {
                size: data.len(),
                limit,
            });
        }

        let key = derive_key(&data);
        let blob = StoredBlob::new(data.clone());

        // Hashing happens outside the lock; the swap and the byte total
        // change together.
        let previous = {
            let mut table = self.table.write();
            let previous = table.blobs.insert(key.clone(), blob);
            table.used_bytes += data.len() as u64;
            if let Some(old) = &previous {
                table.used_bytes -= old.size() as u64;
            }
            previous
        };

        match previous {
            Some(old) if old.data != data => {
                warn!(key = %key, "Key collision, replacing previously stored payload");
            }
            _ => debug!(key = %key, "Stored payload"),
        }

        Ok(key)
    }

    /// Get the exact bytes stored under `key`
    pub fn get(&self, key: &str) -> StoreResult<Bytes> {
        match self.table.read().blobs.get(key) {
            Some(blob) => {
                debug!(key = %key, size = blob.size(), "Store hit");
                Ok(blob.data.clone())
            }
            None => {
                debug!(key = %key, "Store miss");
                Err(StoreError::NotFound(key.to_string()))
            }
        }
    }

    /// Check whether a key has an entry
    pub fn contains(&self, key: &str) -> bool {
        self.table.read().blobs.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.table.read().blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.read().blobs.is_empty()
    }

    /// Configured payload limit
    pub fn max_payload_bytes(&self) -> usize {
        self.config.max_payload_bytes
    }

    /// Get current storage statistics
    pub fn stats(&self) -> StoreStats {
        let table = self.table.read();

        StoreStats {
            total_blobs: table.blobs.len() as u64,
            used_bytes: table.used_bytes,
        }
    }
}

impl Default for BlobStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

/// Storage statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    pub total_blobs: u64,
    pub used_bytes: u64,
}

impl std::fmt::Display for StoreStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Store: {} payloads, {} bytes",
            self.total_blobs, self.used_bytes
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::types::MAX_PAYLOAD_BYTES;

    #[test]
    fn test_store_and_retrieve() {
        let store = BlobStore::default();

        let key = store.put(b"<plist></plist>".to_vec()).unwrap();
        assert_eq!(key.len(), 8);

        let data = store.get(&key).unwrap();
        assert_eq!(&data[..], b"<plist></plist>");
    }

    #[test]
    fn test_key_is_lowercase_hex_slice_of_md5() {
        // md5("") = d41d8cd98f00b204e9800998ecf8427e
        assert_eq!(derive_key(b""), "8f00b204");
        // md5("hello") = 5d41402abc4b2a76b9719d911017c592
        assert_eq!(derive_key(b"hello"), "bc4b2a76");

        let key = derive_key(b"<plist></plist>");
        assert!(key
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_same_payload_same_key() {
        let store = BlobStore::default();

        let first = store.put(b"payload".to_vec()).unwrap();
        let second = store.put(b"payload".to_vec()).unwrap();

        assert_eq!(first, second);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_payload_at_limit_accepted() {
        let store = BlobStore::default();
        let payload = vec![b'a'; MAX_PAYLOAD_BYTES];

        let key = store.put(payload.clone()).unwrap();
        assert_eq!(store.get(&key).unwrap().len(), MAX_PAYLOAD_BYTES);
    }

    #[test]
    fn test_oversized_payload_rejected() {
        let store = BlobStore::default();
        let payload = vec![b'a'; MAX_PAYLOAD_BYTES + 1];

        let result = store.put(payload.clone());

        assert_eq!(
            result,
            Err(StoreError::PayloadTooLarge {
                size: 5001,
                limit: 5000
            })
        );
        assert!(store.is_empty());
        assert!(!store.contains(&derive_key(&payload)));
    }

    #[test]
    fn test_custom_limit() {
        let store = BlobStore::new(StoreConfig {
            max_payload_bytes: 4,
        });

        assert!(store.put(b"1234".to_vec()).is_ok());
        assert!(matches!(
            store.put(b"12345".to_vec()),
            Err(StoreError::PayloadTooLarge { size: 5, limit: 4 })
        ));
    }

    #[test]
    fn test_unknown_key() {
        let store = BlobStore::default();

        assert_eq!(
            store.get("deadbeef"),
            Err(StoreError::NotFound("deadbeef".to_string()))
        );
    }

    #[test]
    fn test_empty_payload() {
        let store = BlobStore::default();

        let key = store.put(Vec::new()).unwrap();
        assert!(store.get(&key).unwrap().is_empty());
    }

    #[test]
    fn test_storage_stats() {
        let store = BlobStore::default();

        store.put(b"abcd".to_vec()).unwrap();
        store.put(b"efgh".to_vec()).unwrap();

        let stats = store.stats();
        assert_eq!(stats.total_blobs, 2);
        assert_eq!(stats.used_bytes, 8);
        assert_eq!(stats.to_string(), "Store: 2 payloads, 8 bytes");
    }

    #[test]
    fn test_stats_track_rewrites_and_rejections() {
        let store = BlobStore::default();

        store.put(b"abcd".to_vec()).unwrap();
        store.put(b"abcd".to_vec()).unwrap();
        store.put(b"xyz".to_vec()).unwrap();
        assert!(store.put(vec![b'a'; MAX_PAYLOAD_BYTES + 1]).is_err());

        assert_eq!(
            store.stats(),
            StoreStats {
                total_blobs: 2,
                used_bytes: 7
            }
        );
    }

    #[test]
    fn test_stats_after_concurrent_puts() {
        let store = std::sync::Arc::new(BlobStore::default());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for j in 0..50 {
                        store.put(format!("payload-{}", j % 25 + i % 2).into_bytes()).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        // payload-0 .. payload-25
        let expected: u64 = (0..26).map(|n| format!("payload-{n}").len() as u64).sum();
        assert_eq!(store.stats().total_blobs, 26);
        assert_eq!(store.stats().used_bytes, expected);
    }

    #[test]
    fn test_stores_are_isolated() {
        let a = BlobStore::default();
        let b = BlobStore::default();

        let key = a.put(b"only in a".to_vec()).unwrap();
        assert!(a.contains(&key));
        assert!(!b.contains(&key));
    }
}
