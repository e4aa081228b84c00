//! Admin login flow.

use std::sync::Arc;

use tracing::{info, warn};

use super::credentials::validate;
use super::{AuthError, LOGIN_RATE_LIMIT_KEY, SessionManager};
use crate::models::auth::{AdminCredentials, SessionToken};
use crate::rate_limit::RateLimiter;

/// Gatekeeper for the admin editor.
pub struct AdminAuth {
    limiter: Arc<RateLimiter>,
    credentials: AdminCredentials,
    sessions: SessionManager,
}

impl AdminAuth {
    pub fn new(
        limiter: Arc<RateLimiter>,
        credentials: AdminCredentials,
        sessions: SessionManager,
    ) -> Self {
        Self {
            limiter,
            credentials,
            sessions,
        }
    }

    /// Rate limit, check credentials, then issue a session.
    ///
    /// Every attempt counts against the limit, successful or not.
    pub fn login(&self, username: &str, password: &str) -> Result<SessionToken, AuthError> {
        if !self.limiter.allow(LOGIN_RATE_LIMIT_KEY) {
            return Err(AuthError::RateLimited);
        }
        if !validate(username, password, None, Some(&self.credentials)) {
            warn!("admin login rejected");
            return Err(AuthError::InvalidCredentials);
        }
        let session = self.sessions.issue()?;
        info!("admin signed in");
        Ok(session)
    }

    pub fn logout(&self) -> Result<(), AuthError> {
        self.sessions.revoke()
    }

    pub fn is_authenticated(&self) -> bool {
        self.sessions.is_valid()
    }

    /// The live session, or `Unauthorized`. Guards every write operation.
    pub fn require_session(&self) -> Result<SessionToken, AuthError> {
        self.sessions.current()?.ok_or(AuthError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::rate_limit::RateLimitPolicy;
    use crate::secure::SecureStore;
    use crate::storage::MemoryStorage;
    use chrono::{Duration, Utc};

    fn setup(max_requests: usize) -> (AdminAuth, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let limiter = Arc::new(RateLimiter::new(
            RateLimitPolicy {
                window: Duration::seconds(60),
                max_requests,
            },
            clock.clone(),
        ));
        let sessions = SessionManager::new(
            SecureStore::new(Arc::new(MemoryStorage::new()), "k"),
            clock.clone(),
            Duration::hours(2),
        );
        let auth = AdminAuth::new(
            limiter,
            AdminCredentials::new("beratmen", "!@NB281109#!"),
            sessions,
        );
        (auth, clock)
    }

    #[test]
    fn login_issues_session() {
        let (auth, _) = setup(30);
        assert!(!auth.is_authenticated());
        assert!(matches!(auth.require_session(), Err(AuthError::Unauthorized)));

        let session = auth.login("beratmen", "!@NB281109#!").unwrap();
        assert!(auth.is_authenticated());
        assert_eq!(auth.require_session().unwrap(), session);
    }

    #[test]
    fn bad_credentials_share_one_message() {
        let (auth, _) = setup(30);
        let wrong_user = auth.login("nobody", "!@NB281109#!").unwrap_err();
        let wrong_pass = auth.login("beratmen", "nope").unwrap_err();
        assert!(matches!(wrong_user, AuthError::InvalidCredentials));
        assert_eq!(wrong_user.to_string(), wrong_pass.to_string());
        assert!(!auth.is_authenticated());
    }

    #[test]
    fn login_is_rate_limited_even_with_correct_credentials() {
        let (auth, clock) = setup(3);
        for _ in 0..3 {
            let _ = auth.login("beratmen", "bad");
        }
        let err = auth.login("beratmen", "!@NB281109#!").unwrap_err();
        assert!(matches!(err, AuthError::RateLimited));
        assert!(!err.to_string().contains("60"));

        clock.advance(Duration::seconds(60));
        assert!(auth.login("beratmen", "!@NB281109#!").is_ok());
    }

    #[test]
    fn logout_and_expiry_end_the_session() {
        let (auth, clock) = setup(30);
        auth.login("beratmen", "!@NB281109#!").unwrap();
        auth.logout().unwrap();
        assert!(!auth.is_authenticated());

        auth.login("beratmen", "!@NB281109#!").unwrap();
        clock.advance(Duration::hours(2));
        assert!(matches!(auth.require_session(), Err(AuthError::Unauthorized)));
    }
}
