//! Secure store over a storage bucket.

use std::sync::Arc;

use tracing::{error, warn};

use super::SecureStoreError;
use super::cipher::EnvelopeCipher;
use crate::storage::Storage;

/// Key-value store whose values are encrypted at rest.
///
/// Keys are stored in the clear; only values are sealed.
pub struct SecureStore {
    storage: Arc<dyn Storage>,
    cipher: EnvelopeCipher,
}

impl SecureStore {
    pub fn new(storage: Arc<dyn Storage>, passphrase: &str) -> Self {
        Self {
            storage,
            cipher: EnvelopeCipher::from_passphrase(passphrase),
        }
    }

    /// Encrypt and persist `value` under `key`.
    pub fn set_item(&self, key: &str, value: &str) -> Result<(), SecureStoreError> {
        let sealed = self.cipher.seal(value).inspect_err(|e| {
            error!(key, error = %e, "failed to encrypt secure item");
        })?;
        self.storage.set(key, &sealed).map_err(|e| {
            error!(key, error = %e, "failed to write secure item");
            SecureStoreError::from(e)
        })
    }

    /// Read and decrypt `key`. `Ok(None)` means the key is absent; a value
    /// that fails to decrypt is an error, never `None`.
    pub fn get_item(&self, key: &str) -> Result<Option<String>, SecureStoreError> {
        let sealed = match self.storage.get(key) {
            Ok(Some(sealed)) => sealed,
            Ok(None) => return Ok(None),
            Err(e) => {
                error!(key, error = %e, "failed to read secure item");
                return Err(e.into());
            }
        };
        self.cipher.open(&sealed).map(Some).inspect_err(|e| {
            warn!(key, error = %e, "secure item failed to decrypt");
        })
    }

    /// Remove `key`. Removing an absent key is not an error.
    pub fn remove_item(&self, key: &str) -> Result<(), SecureStoreError> {
        self.storage.remove(key).map_err(|e| {
            error!(key, error = %e, "failed to remove secure item");
            SecureStoreError::from(e)
        })
    }
}
