//! Credential hashing.
//!
//! A credential hash covers the `username:password` pair, so one configured
//! value stands in for both secrets. Two formats are accepted: lowercase
//! SHA-256 hex, or a bcrypt hash (`$2…`) of the same pair string.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use super::AuthError;

/// bcrypt cost factor.
const BCRYPT_COST: u32 = 10;

/// `username:password`. The username may not contain the separator, or
/// `("a:b", "c")` and `("a", "b:c")` would share one hash.
fn pair(username: &str, password: &str) -> Option<String> {
    if username.contains(':') {
        return None;
    }
    Some(format!("{username}:{password}"))
}

fn colon_username() -> AuthError {
    AuthError::Internal("username must not contain ':'".into())
}

/// SHA-256 hex of `username:password`.
pub fn hash_credentials(username: &str, password: &str) -> Result<String, AuthError> {
    let pair = pair(username, password).ok_or_else(colon_username)?;
    let mut hasher = Sha256::new();
    hasher.update(pair.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

/// bcrypt hash (cost 10) of `username:password`.
pub fn bcrypt_credentials(username: &str, password: &str) -> Result<String, AuthError> {
    let pair = pair(username, password).ok_or_else(colon_username)?;
    bcrypt::hash(pair, BCRYPT_COST).map_err(|e| AuthError::Internal(format!("bcrypt hash: {e}")))
}

/// Check a submitted pair against a precomputed credential hash.
/// Malformed hashes and usernames containing `:` never match.
pub fn verify_credentials(username: &str, password: &str, hash: &str) -> bool {
    let Some(pair) = pair(username, password) else {
        return false;
    };
    let hash = hash.trim();
    if hash.starts_with("$2") {
        return bcrypt::verify(pair, hash).unwrap_or(false);
    }
    let computed = format!("{:x}", Sha256::digest(pair.as_bytes()));
    computed
        .as_bytes()
        .ct_eq(hash.to_ascii_lowercase().as_bytes())
        .into()
}
