//! Admin authentication.
//!
//! Login runs the rate limiter, then the constant-time credential check, then
//! issues a session token into the secure store. Write operations on the blog
//! require a live session.

pub mod admin;
pub mod credentials;
pub mod password;
pub mod session;

pub use admin::AdminAuth;
pub use session::SessionManager;

use thiserror::Error;

use crate::secure::SecureStoreError;

/// Rate-limit identifier used for login attempts.
pub const LOGIN_RATE_LIMIT_KEY: &str = "login";

/// Authentication errors.
///
/// Messages are user-facing: they never say which credential was wrong nor
/// disclose the rate-limit window.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Too many attempts, please try again later")]
    RateLimited,

    #[error("Not signed in or session expired")]
    Unauthorized,

    #[error("Session store error: {0}")]
    Store(#[from] SecureStoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}
