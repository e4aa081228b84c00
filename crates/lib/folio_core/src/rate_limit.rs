//! Sliding-window rate limiter keyed by identifier (e.g. `"login"`).
//!
//! Each identifier keeps the timestamps of its allowed calls inside the
//! trailing window. A call is denied once the window already holds
//! `max_requests` timestamps; denied calls are not recorded. Identifiers with
//! no in-window timestamps are dropped so the table cannot grow without bound.
//!
//! A limiter built with [`RateLimiter::persistent`] also keeps each window in a
//! storage bucket, so short-lived processes sharing the bucket share the limit.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use tracing::{debug, error, warn};

use crate::clock::Clock;
use crate::storage::{Storage, StorageError};

/// Default window: 60 seconds.
pub const DEFAULT_WINDOW_SECS: i64 = 60;

/// Default cap per window.
pub const DEFAULT_MAX_REQUESTS: usize = 30;

/// Default interval between background sweeps: 5 minutes.
pub const DEFAULT_SWEEP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(5 * 60);

/// Prefix of the storage key holding an identifier's window
/// (a JSON array of Unix milliseconds).
pub const RATE_LIMIT_KEY_PREFIX: &str = "rate_limit:";

/// Window length and cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub window: Duration,
    pub max_requests: usize,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            window: Duration::seconds(DEFAULT_WINDOW_SECS),
            max_requests: DEFAULT_MAX_REQUESTS,
        }
    }
}

/// Per-identifier sliding-window counter.
pub struct RateLimiter {
    windows: DashMap<String, Vec<DateTime<Utc>>>,
    policy: RateLimitPolicy,
    clock: Arc<dyn Clock>,
    storage: Option<Arc<dyn Storage>>,
}

impl RateLimiter {
    /// Limiter whose windows live only in this process.
    pub fn new(policy: RateLimitPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            windows: DashMap::new(),
            policy,
            clock,
            storage: None,
        }
    }

    /// Limiter that reloads and saves each window through `storage` on
    /// every call. The stored window wins over the in-process copy.
    pub fn persistent(
        policy: RateLimitPolicy,
        clock: Arc<dyn Clock>,
        storage: Arc<dyn Storage>,
    ) -> Self {
        Self {
            storage: Some(storage),
            ..Self::new(policy, clock)
        }
    }

    pub fn policy(&self) -> RateLimitPolicy {
        self.policy
    }

    /// Record a call for `identifier` if it fits in the window.
    ///
    /// A persistent limiter that cannot read its stored window denies.
    pub fn allow(&self, identifier: &str) -> bool {
        let now = self.clock.now();
        let cutoff = self.cutoff(now);

        let stored = match self.load(identifier) {
            Ok(stored) => stored,
            Err(e) => {
                error!(identifier, error = %e, "rate limit window unreadable; denying");
                return false;
            }
        };

        let (allowed, snapshot) = {
            let mut stamps = self.windows.entry(identifier.to_string()).or_default();
            if let Some(stored) = stored {
                *stamps = stored;
            }
            stamps.retain(|t| *t > cutoff);
            let allowed = if stamps.len() >= self.policy.max_requests {
                false
            } else {
                stamps.push(now);
                true
            };
            (allowed, stamps.clone())
        };

        if let Err(e) = self.save(identifier, &snapshot) {
            error!(identifier, error = %e, "failed to store rate limit window");
        }
        if !allowed {
            // A zero cap never records anything; don't leave an empty entry.
            self.windows.remove_if(identifier, |_, stamps| stamps.is_empty());
            warn!(identifier, "rate limit exceeded");
        }
        allowed
    }

    /// Calls still available to `identifier` in the current window.
    pub fn remaining(&self, identifier: &str) -> usize {
        let cutoff = self.cutoff(self.clock.now());
        let used = match self.load(identifier) {
            Ok(Some(stored)) => stored.iter().filter(|t| **t > cutoff).count(),
            Ok(None) => self
                .windows
                .get(identifier)
                .map(|stamps| stamps.iter().filter(|t| **t > cutoff).count())
                .unwrap_or(0),
            Err(e) => {
                warn!(identifier, error = %e, "rate limit window unreadable");
                return 0;
            }
        };
        self.policy.max_requests.saturating_sub(used)
    }

    /// Number of identifiers currently held in this process.
    pub fn tracked_identifiers(&self) -> usize {
        self.windows.len()
    }

    /// Purge stale timestamps everywhere and drop empty identifiers.
    ///
    /// Only the in-process table is swept; stored windows are pruned on
    /// their next `allow`.
    pub fn sweep(&self) {
        let cutoff = self.cutoff(self.clock.now());
        let before = self.windows.len();
        self.windows.retain(|_, stamps| {
            stamps.retain(|t| *t > cutoff);
            !stamps.is_empty()
        });
        let dropped = before.saturating_sub(self.windows.len());
        if dropped > 0 {
            debug!(dropped, "rate limiter sweep dropped idle identifiers");
        }
    }

    /// Run [`RateLimiter::sweep`] every `interval` on the tokio runtime.
    pub fn spawn_sweeper(
        self: &Arc<Self>,
        interval: std::time::Duration,
    ) -> tokio::task::JoinHandle<()> {
        let limiter = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                limiter.sweep();
            }
        })
    }

    /// Timestamps at or before the cutoff are stale.
    fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_signed(self.policy.window)
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// The stored window, `Ok(None)` for an in-process limiter.
    fn load(&self, identifier: &str) -> Result<Option<Vec<DateTime<Utc>>>, StorageError> {
        let Some(storage) = &self.storage else {
            return Ok(None);
        };
        let key = storage_key(identifier);
        let Some(raw) = storage.get(&key)? else {
            return Ok(Some(Vec::new()));
        };
        let millis: Vec<i64> = serde_json::from_str(&raw)
            .map_err(|e| StorageError::Corrupt(format!("{key}: {e}")))?;
        Ok(Some(
            millis
                .into_iter()
                .filter_map(DateTime::<Utc>::from_timestamp_millis)
                .collect(),
        ))
    }

    fn save(&self, identifier: &str, stamps: &[DateTime<Utc>]) -> Result<(), StorageError> {
        let Some(storage) = &self.storage else {
            return Ok(());
        };
        let key = storage_key(identifier);
        if stamps.is_empty() {
            return storage.remove(&key);
        }
        let millis: Vec<i64> = stamps.iter().map(DateTime::timestamp_millis).collect();
        let raw = serde_json::to_string(&millis)
            .map_err(|e| StorageError::Corrupt(format!("{key}: {e}")))?;
        storage.set(&key, &raw)
    }
}

fn storage_key(identifier: &str) -> String {
    format!("{RATE_LIMIT_KEY_PREFIX}{identifier}")
}
