//! Runtime configuration.

use std::path::PathBuf;

use chrono::Duration;
use thiserror::Error;
use tracing::warn;

use crate::auth::session::DEFAULT_SESSION_TTL_SECS;
use crate::models::auth::AdminCredentials;
use crate::rate_limit::{DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW_SECS, RateLimitPolicy};

/// Passphrase used when `FOLIO_STORAGE_KEY` is unset.
pub const DEV_STORAGE_KEY: &str = "folio-default-dev-key-change-in-production";

/// File name of the blog bucket inside the data directory.
pub const BLOG_BUCKET_FILE: &str = "blog.json";

/// File name of the encrypted session bucket inside the data directory.
pub const SECURE_BUCKET_FILE: &str = "secure.json";

/// Upper bound for duration settings: ten years.
pub const MAX_DURATION_SECS: i64 = 10 * 365 * 24 * 60 * 60;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {message}")]
    Invalid { var: String, message: String },
}

/// Folio configuration.
#[derive(Clone, Debug)]
pub struct FolioConfig {
    /// Directory holding the blog and secure buckets.
    pub data_dir: PathBuf,
    /// Passphrase the secure store key is derived from.
    pub storage_key: String,
    pub credentials: AdminCredentials,
    pub session_ttl: Duration,
    pub rate_limit: RateLimitPolicy,
}

impl FolioConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable                         | Default                          |
    /// |----------------------------------|----------------------------------|
    /// | `FOLIO_DATA_DIR`                 | `<data dir>/folio`               |
    /// | `FOLIO_STORAGE_KEY`              | development key (logged warning) |
    /// | `FOLIO_ADMIN_USERNAME`           | unset                            |
    /// | `FOLIO_ADMIN_PASSWORD`           | unset                            |
    /// | `FOLIO_ADMIN_CREDENTIAL_HASH`    | unset                            |
    /// | `FOLIO_SESSION_TTL_SECS`         | `86400`                          |
    /// | `FOLIO_RATE_LIMIT_WINDOW_SECS`   | `60`                             |
    /// | `FOLIO_RATE_LIMIT_MAX`           | `30`                             |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let data_dir = var("FOLIO_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        let storage_key = var("FOLIO_STORAGE_KEY").unwrap_or_else(|| {
            warn!("FOLIO_STORAGE_KEY not set; using the development key");
            DEV_STORAGE_KEY.to_string()
        });

        let session_ttl = parse_duration(
            var("FOLIO_SESSION_TTL_SECS"),
            "FOLIO_SESSION_TTL_SECS",
            DEFAULT_SESSION_TTL_SECS,
        )?;
        let window = parse_duration(
            var("FOLIO_RATE_LIMIT_WINDOW_SECS"),
            "FOLIO_RATE_LIMIT_WINDOW_SECS",
            DEFAULT_WINDOW_SECS,
        )?;
        let max_requests = parse_positive(
            var("FOLIO_RATE_LIMIT_MAX"),
            "FOLIO_RATE_LIMIT_MAX",
            DEFAULT_MAX_REQUESTS as i64,
        )? as usize;

        Ok(Self {
            data_dir,
            storage_key,
            credentials: AdminCredentials::from_lookup(&lookup),
            session_ttl,
            rate_limit: RateLimitPolicy {
                window,
                max_requests,
            },
        })
    }

    /// Path of the blog bucket file.
    pub fn blog_bucket_path(&self) -> PathBuf {
        self.data_dir.join(BLOG_BUCKET_FILE)
    }

    /// Path of the encrypted session bucket file.
    pub fn secure_bucket_path(&self) -> PathBuf {
        self.data_dir.join(SECURE_BUCKET_FILE)
    }
}

/// `<platform data dir>/folio`, or `./folio` when the platform has none.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("folio")
}

/// Seconds in `1..=MAX_DURATION_SECS` as a [`Duration`].
fn parse_duration(
    raw: Option<String>,
    var: &str,
    default_secs: i64,
) -> Result<Duration, ConfigError> {
    let secs = parse_positive(raw, var, default_secs)?;
    if secs > MAX_DURATION_SECS {
        return Err(ConfigError::Invalid {
            var: var.to_string(),
            message: format!("must be at most {MAX_DURATION_SECS} seconds"),
        });
    }
    Duration::try_seconds(secs).ok_or_else(|| ConfigError::Invalid {
        var: var.to_string(),
        message: "out of range".into(),
    })
}

fn parse_positive(raw: Option<String>, var: &str, default: i64) -> Result<i64, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().parse::<i64>() {
        Ok(n) if n > 0 => Ok(n),
        Ok(_) => Err(ConfigError::Invalid {
            var: var.to_string(),
            message: "must be greater than zero".into(),
        }),
        Err(e) => Err(ConfigError::Invalid {
            var: var.to_string(),
            message: e.to_string(),
        }),
    }
}
