//! Encrypted key-value store for admin session material.
//!
//! Values are compressed, encrypted and base64-encoded before they reach the
//! underlying bucket. Reads report absence and tampering separately.

pub mod cipher;
pub mod store;

pub use store::SecureStore;

use thiserror::Error;

use crate::storage::StorageError;

/// Secure store errors.
#[derive(Debug, Error)]
pub enum SecureStoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Encryption error: {0}")]
    Encryption(String),

    #[error("Decryption error: {0}")]
    Decryption(String),
}
