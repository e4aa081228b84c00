//! # folio_core
//!
//! Core domain logic for Folio.
//!
//! The blog repository persists posts into a single storage bucket; admin
//! sessions live in an encrypted bucket guarded by a sliding-window rate
//! limiter and a constant-time credential check. User-authored HTML goes
//! through [`sanitize`] before it is shown.

pub mod auth;
pub mod blog;
pub mod clock;
pub mod config;
pub mod models;
pub mod rate_limit;
pub mod sanitize;
pub mod secure;
pub mod storage;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
