//! Authentication domain models.

use chrono::{DateTime, Utc};

/// An issued admin session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    /// Opaque random credential.
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl SessionToken {
    /// Whether the session is still usable at `now`.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        !self.token.is_empty() && self.expires_at > now
    }
}

/// Admin credentials configured for the site.
///
/// Either a username/password pair or a precomputed credential hash (see
/// [`crate::auth::password::hash_credentials`]) must be present, otherwise
/// every login is rejected.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AdminCredentials {
    pub username: Option<String>,
    pub password: Option<String>,
    pub credential_hash: Option<String>,
}

impl AdminCredentials {
    /// Credentials from a plain username/password pair.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
            credential_hash: None,
        }
    }

    /// Read `FOLIO_ADMIN_USERNAME`, `FOLIO_ADMIN_PASSWORD` and
    /// `FOLIO_ADMIN_CREDENTIAL_HASH`; empty values count as unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());
        Self {
            username: var("FOLIO_ADMIN_USERNAME"),
            password: var("FOLIO_ADMIN_PASSWORD"),
            credential_hash: var("FOLIO_ADMIN_CREDENTIAL_HASH"),
        }
    }

    /// Whether any credential path is configured.
    pub fn is_configured(&self) -> bool {
        self.credential_hash.is_some() || (self.username.is_some() && self.password.is_some())
    }
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field(
                "credential_hash",
                &self.credential_hash.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn session_liveness_depends_on_expiry() {
        let now = Utc::now();
        let token = SessionToken {
            token: "abc".into(),
            expires_at: now + Duration::seconds(1),
        };
        assert!(token.is_live_at(now));
        assert!(!token.is_live_at(now + Duration::seconds(1)));
    }

    #[test]
    fn debug_redacts_secrets() {
        let creds = AdminCredentials::new("admin", "hunter2");
        let printed = format!("{creds:?}");
        assert!(printed.contains("admin"));
        assert!(!printed.contains("hunter2"));
    }

    #[test]
    fn configured_requires_pair_or_hash() {
        assert!(!AdminCredentials::default().is_configured());
        assert!(AdminCredentials::new("a", "b").is_configured());
        let hash_only = AdminCredentials {
            credential_hash: Some("00".into()),
            ..Default::default()
        };
        assert!(hash_only.is_configured());
        let user_only = AdminCredentials {
            username: Some("a".into()),
            ..Default::default()
        };
        assert!(!user_only.is_configured());
    }
}
