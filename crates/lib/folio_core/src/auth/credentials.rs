//! Admin credential validation.

use subtle::{Choice, ConstantTimeEq};
use tracing::warn;

use super::password::verify_credentials;
use crate::models::auth::AdminCredentials;

/// Check a submitted username/password.
///
/// A precomputed hash (`precomputed_hash`, else `env.credential_hash`) takes
/// precedence and is matched against the hash of the submitted pair.
/// Otherwise both fields are compared with the configured secrets in
/// constant time, without short-circuiting on the first mismatch. When `env`
/// is `None` the configured secrets come from the process environment.
/// Nothing configured means nothing is accepted.
pub fn validate(
    username: &str,
    password: &str,
    precomputed_hash: Option<&str>,
    env: Option<&AdminCredentials>,
) -> bool {
    let from_process;
    let creds = match env {
        Some(creds) => creds,
        None => {
            from_process = AdminCredentials::from_env();
            &from_process
        }
    };

    if let Some(hash) = precomputed_hash.or(creds.credential_hash.as_deref()) {
        return verify_credentials(username, password, hash);
    }

    let (Some(expected_user), Some(expected_pass)) = (&creds.username, &creds.password) else {
        warn!("admin credentials are not configured; rejecting login");
        return false;
    };

    let user_ok: Choice = username.as_bytes().ct_eq(expected_user.as_bytes());
    let pass_ok: Choice = password.as_bytes().ct_eq(expected_pass.as_bytes());
    (user_ok & pass_ok).into()
}
