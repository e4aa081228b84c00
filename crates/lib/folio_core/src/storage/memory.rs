//! In-process storage bucket.

use dashmap::DashMap;

use super::{Storage, StorageError};

/// Bucket held in memory, optionally capped at a byte quota
/// (key + value lengths summed over all entries).
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: DashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Unbounded bucket.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bucket that rejects writes once `quota` bytes would be exceeded.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: DashMap::new(),
            quota: Some(quota),
        }
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn used_bytes_excluding(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|e| e.key() != key)
            .map(|e| e.key().len() + e.value().len())
            .sum()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota {
            let needed = self.used_bytes_excluding(key) + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    quota,
                });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}
