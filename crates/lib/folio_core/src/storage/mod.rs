//! Key-value storage buckets.
//!
//! A bucket maps string keys to string values. The blog repository keeps its
//! whole collection under one key; the secure store keeps encrypted entries in
//! a bucket of its own. Each `set`/`get` is atomic on its own; nothing spans
//! several calls.

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage quota exceeded: writing {key} needs {needed} bytes, quota is {quota}")]
    QuotaExceeded {
        key: String,
        needed: usize,
        quota: usize,
    },

    #[error("Corrupt bucket: {0}")]
    Corrupt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A named key-value bucket.
pub trait Storage: Send + Sync {
    /// Read a value, `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Insert or overwrite a value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a value. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
