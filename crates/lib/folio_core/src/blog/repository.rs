//! Blog repository over a storage bucket.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use tracing::{debug, error, info, warn};

use super::{BLOG_POSTS_KEY, BlogError};
use crate::clock::Clock;
use crate::models::blog::{BlogPost, DATE_FORMAT};
use crate::storage::Storage;

/// Ordered collection of blog posts persisted as a whole.
///
/// The repository is the only writer of [`BLOG_POSTS_KEY`]; callers get owned
/// copies. Newly created posts go to the front; updated posts keep their slot.
pub struct BlogRepository {
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
    /// Serializes read-modify-write of the collection within this process.
    write_lock: Mutex<()>,
}

impl BlogRepository {
    pub fn new(storage: Arc<dyn Storage>, clock: Arc<dyn Clock>) -> Self {
        Self {
            storage,
            clock,
            write_lock: Mutex::new(()),
        }
    }

    /// All posts in stored order, distinguishing "empty" from "unreadable".
    pub fn try_list(&self) -> Result<Vec<BlogPost>, BlogError> {
        let raw = match self.storage.get(BLOG_POSTS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Ok(Vec::new()),
            Err(e) => {
                error!(error = %e, "failed to read blog posts");
                return Err(e.into());
            }
        };
        serde_json::from_str(&raw).map_err(|e| {
            error!(error = %e, "failed to parse blog posts");
            BlogError::from(e)
        })
    }

    /// All posts in stored order. Fails soft: an unreadable collection is
    /// logged and reported as empty.
    pub fn list(&self) -> Vec<BlogPost> {
        self.try_list().unwrap_or_else(|e| {
            warn!(error = %e, "listing blog posts as empty");
            Vec::new()
        })
    }

    /// Non-draft posts, newest date first. Posts without a parseable date
    /// sort last; equal dates keep stored order.
    pub fn list_published(&self) -> Vec<BlogPost> {
        let mut posts: Vec<BlogPost> = self
            .list()
            .into_iter()
            .filter(BlogPost::is_published)
            .collect();
        posts.sort_by(|a, b| b.parsed_date().cmp(&a.parsed_date()));
        posts
    }

    /// Published posts in `category` (case-insensitive).
    pub fn list_by_category(&self, category: &str) -> Vec<BlogPost> {
        Self::filter_by_category(self.list_published(), category)
    }

    /// Published posts carrying `tag` (case-insensitive).
    pub fn list_by_tag(&self, tag: &str) -> Vec<BlogPost> {
        Self::filter_by_tag(self.list_published(), tag)
    }

    /// Keep the posts in `category` (case-insensitive), preserving order.
    pub fn filter_by_category(posts: Vec<BlogPost>, category: &str) -> Vec<BlogPost> {
        let wanted = category.to_lowercase();
        posts
            .into_iter()
            .filter(|p| p.category.to_lowercase() == wanted)
            .collect()
    }

    /// Keep the posts carrying `tag` (case-insensitive), preserving order.
    pub fn filter_by_tag(posts: Vec<BlogPost>, tag: &str) -> Vec<BlogPost> {
        let wanted = tag.to_lowercase();
        posts
            .into_iter()
            .filter(|p| p.tags.iter().any(|t| t.to_lowercase() == wanted))
            .collect()
    }

    /// Distinct categories of published posts, sorted.
    pub fn categories(&self) -> Vec<String> {
        self.list_published()
            .into_iter()
            .map(|p| p.category)
            .filter(|c| !c.trim().is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn get_by_id(&self, id: i64) -> Option<BlogPost> {
        self.list().into_iter().find(|p| p.id == id)
    }

    /// Insert or replace `post` (matched by id) and persist the collection.
    ///
    /// The post is stored as given except for `date`, which is stamped with
    /// today's date. Editors run [`super::prepare`] first. Returns the stored
    /// copy.
    pub fn save(&self, mut post: BlogPost) -> Result<BlogPost, BlogError> {
        post.date = self.clock.today().format(DATE_FORMAT).to_string();

        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut posts = self.try_list()?;

        let id = post.id;
        let updated = match posts.iter().position(|p| p.id == id) {
            Some(idx) => {
                posts[idx] = post.clone();
                // Heal collections that already hold more than one copy.
                let mut seen = false;
                posts.retain(|p| p.id != id || !std::mem::replace(&mut seen, true));
                true
            }
            None => {
                posts.insert(0, post.clone());
                false
            }
        };

        self.persist(&posts)?;
        info!(post_id = id, updated, draft = post.is_draft, "saved blog post");
        Ok(post)
    }

    /// Remove the post with `id`. Returns whether a post was removed.
    pub fn delete(&self, id: i64) -> Result<bool, BlogError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut posts = self.try_list()?;
        let before = posts.len();
        posts.retain(|p| p.id != id);
        let removed = posts.len() < before;

        self.persist(&posts)?;
        if removed {
            info!(post_id = id, "deleted blog post");
        } else {
            debug!(post_id = id, "delete of unknown blog post");
        }
        Ok(removed)
    }

    fn persist(&self, posts: &[BlogPost]) -> Result<(), BlogError> {
        let raw = serde_json::to_string(posts).map_err(|e| {
            error!(error = %e, "failed to serialize blog posts");
            BlogError::from(e)
        })?;
        self.storage.set(BLOG_POSTS_KEY, &raw).map_err(|e| {
            error!(error = %e, "failed to write blog posts");
            BlogError::from(e)
        })
    }
}
