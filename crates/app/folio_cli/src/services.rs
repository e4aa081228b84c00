use std::sync::Arc;

use folio_core::auth::{AdminAuth, SessionManager};
use folio_core::blog::BlogRepository;
use folio_core::clock::{Clock, SystemClock};
use folio_core::config::FolioConfig;
use folio_core::rate_limit::RateLimiter;
use folio_core::secure::SecureStore;
use folio_core::storage::{FileStorage, Storage};

/// Everything a command needs, wired from the configuration.
pub struct Services {
    pub clock: Arc<dyn Clock>,
    pub repo: BlogRepository,
    pub auth: AdminAuth,
}

impl Services {
    pub fn open(config: &FolioConfig) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let blog_bucket = Arc::new(FileStorage::open(config.blog_bucket_path()));
        let secure_bucket: Arc<dyn Storage> =
            Arc::new(FileStorage::open(config.secure_bucket_path()));

        let repo = BlogRepository::new(blog_bucket, clock.clone());
        let sessions = SessionManager::new(
            SecureStore::new(secure_bucket.clone(), &config.storage_key),
            clock.clone(),
            config.session_ttl,
        );
        // Each invocation is a new process; the login window lives in the bucket.
        let limiter = Arc::new(RateLimiter::persistent(
            config.rate_limit,
            clock.clone(),
            secure_bucket,
        ));
        let auth = AdminAuth::new(limiter, config.credentials.clone(), sessions);

        Self { clock, repo, auth }
    }
}
