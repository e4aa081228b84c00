//! Admin session tokens kept in the secure store.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use tracing::{debug, info, warn};

use super::AuthError;
use crate::clock::Clock;
use crate::models::auth::SessionToken;
use crate::secure::SecureStore;

/// Secure store key of the session token.
pub const ADMIN_TOKEN_KEY: &str = "admin_token";

/// Secure store key of the expiration (Unix milliseconds).
pub const ADMIN_TOKEN_EXPIRATION_KEY: &str = "admin_token_expiration";

/// Session lifetime: 24 hours.
pub const DEFAULT_SESSION_TTL_SECS: i64 = 24 * 60 * 60;

/// Generate a random token (64 alphanumeric chars).
fn generate_token() -> String {
    rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

/// Issues, checks and revokes the admin session.
pub struct SessionManager {
    store: SecureStore,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl SessionManager {
    pub fn new(store: SecureStore, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self { store, clock, ttl }
    }

    /// Create a fresh session, replacing any existing one.
    pub fn issue(&self) -> Result<SessionToken, AuthError> {
        let expires_at = self
            .clock
            .now()
            .checked_add_signed(self.ttl)
            .ok_or_else(|| {
                AuthError::Internal(format!("session lifetime {} is out of range", self.ttl))
            })?;
        let session = SessionToken {
            token: generate_token(),
            expires_at,
        };

        let stored = self
            .store
            .set_item(ADMIN_TOKEN_KEY, &session.token)
            .and_then(|()| {
                self.store.set_item(
                    ADMIN_TOKEN_EXPIRATION_KEY,
                    &session.expires_at.timestamp_millis().to_string(),
                )
            });
        if let Err(e) = stored {
            // Never leave half a session behind.
            let _ = self.purge();
            return Err(e.into());
        }

        info!(expires_at = %session.expires_at, "issued admin session");
        Ok(session)
    }

    /// The live session, if any.
    ///
    /// A session counts only when both the token and a future expiration are
    /// present; anything else purges both keys and yields `Ok(None)`. A value
    /// that fails to decrypt also purges both keys but is reported as an
    /// error.
    pub fn current(&self) -> Result<Option<SessionToken>, AuthError> {
        let token = self.store.get_item(ADMIN_TOKEN_KEY);
        let expiration = self.store.get_item(ADMIN_TOKEN_EXPIRATION_KEY);

        let (token, expiration) = match (token, expiration) {
            (Ok(token), Ok(expiration)) => (token, expiration),
            (Err(e), _) | (_, Err(e)) => {
                warn!(error = %e, "admin session unreadable; purging");
                let _ = self.purge();
                return Err(e.into());
            }
        };

        let session = match (token, expiration) {
            (Some(token), Some(expiration)) => expiration
                .trim()
                .parse::<i64>()
                .ok()
                .and_then(DateTime::<Utc>::from_timestamp_millis)
                .map(|expires_at| SessionToken { token, expires_at }),
            (None, None) => return Ok(None),
            _ => None,
        };

        match session {
            Some(session) if session.is_live_at(self.clock.now()) => Ok(Some(session)),
            _ => {
                debug!("admin session missing, malformed or expired; purging");
                self.purge()?;
                Ok(None)
            }
        }
    }

    /// Whether a live session exists. Errors count as "no".
    pub fn is_valid(&self) -> bool {
        match self.current() {
            Ok(session) => session.is_some(),
            Err(e) => {
                warn!(error = %e, "treating unreadable admin session as signed out");
                false
            }
        }
    }

    /// Drop the session.
    pub fn revoke(&self) -> Result<(), AuthError> {
        self.purge()?;
        info!("revoked admin session");
        Ok(())
    }

    fn purge(&self) -> Result<(), AuthError> {
        let token = self.store.remove_item(ADMIN_TOKEN_KEY);
        let expiration = self.store.remove_item(ADMIN_TOKEN_EXPIRATION_KEY);
        token?;
        expiration?;
        Ok(())
    }
}
