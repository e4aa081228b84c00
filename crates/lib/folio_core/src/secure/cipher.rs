//! Compress-then-encrypt envelope for secure store values.
//!
//! Layout: base64(`nonce || AES-256-GCM(deflate(plaintext)) || tag`) with a
//! random 12-byte nonce per value.

use std::io::{Read, Write};

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flate2::Compression;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use rand::RngCore;
use sha2::{Digest, Sha256};

use super::SecureStoreError;

/// Nonce size for AES-256-GCM (12 bytes).
const NONCE_SIZE: usize = 12;
/// AES-256 key size (32 bytes).
const KEY_SIZE: usize = 32;
/// GCM tag size (16 bytes).
const TAG_SIZE: usize = 16;

/// A cipher keyed from a passphrase.
#[derive(Clone)]
pub struct EnvelopeCipher {
    key: [u8; KEY_SIZE],
}

impl EnvelopeCipher {
    /// Derive a 32-byte key from `passphrase` with SHA-256.
    pub fn from_passphrase(passphrase: &str) -> Self {
        let digest = Sha256::digest(passphrase.as_bytes());
        let mut key = [0u8; KEY_SIZE];
        key.copy_from_slice(&digest);
        Self { key }
    }

    fn aead(&self) -> Result<Aes256Gcm, String> {
        Aes256Gcm::new_from_slice(&self.key).map_err(|e| format!("Key init failed: {e}"))
    }

    /// Seal `plaintext` into a base64 envelope.
    pub fn seal(&self, plaintext: &str) -> Result<String, SecureStoreError> {
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(plaintext.as_bytes())
            .map_err(|e| SecureStoreError::Encryption(format!("Compression failed: {e}")))?;
        let compressed = encoder
            .finish()
            .map_err(|e| SecureStoreError::Encryption(format!("Compression failed: {e}")))?;

        let cipher = self.aead().map_err(SecureStoreError::Encryption)?;
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, compressed.as_slice())
            .map_err(|e| SecureStoreError::Encryption(format!("Encryption failed: {e}")))?;

        let mut combined = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        combined.extend_from_slice(&nonce_bytes);
        combined.extend_from_slice(&ciphertext);
        Ok(STANDARD.encode(&combined))
    }

    /// Open an envelope produced by [`EnvelopeCipher::seal`].
    pub fn open(&self, envelope: &str) -> Result<String, SecureStoreError> {
        let combined = STANDARD
            .decode(envelope)
            .map_err(|e| SecureStoreError::Decryption(format!("Base64 decode failed: {e}")))?;
        if combined.len() < NONCE_SIZE + TAG_SIZE {
            return Err(SecureStoreError::Decryption("Ciphertext too short".into()));
        }

        let cipher = self.aead().map_err(SecureStoreError::Decryption)?;
        let nonce = Nonce::from_slice(&combined[..NONCE_SIZE]);
        let compressed = cipher
            .decrypt(nonce, &combined[NONCE_SIZE..])
            .map_err(|e| SecureStoreError::Decryption(format!("Decryption failed: {e}")))?;

        let mut plaintext = String::new();
        DeflateDecoder::new(compressed.as_slice())
            .read_to_string(&mut plaintext)
            .map_err(|e| SecureStoreError::Decryption(format!("Decompression failed: {e}")))?;
        Ok(plaintext)
    }
}

impl std::fmt::Debug for EnvelopeCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("EnvelopeCipher(<redacted>)")
    }
}
