//! Blog post persistence.
//!
//! Posts live as one JSON array under [`BLOG_POSTS_KEY`] in a storage bucket.
//! Public pages use the read operations; only an authenticated admin calls
//! `save` and `delete`.

pub mod read_time;
pub mod repository;

pub use repository::BlogRepository;

use thiserror::Error;

use crate::models::blog::BlogPost;
use crate::storage::StorageError;

/// Storage key holding the serialized post collection.
pub const BLOG_POSTS_KEY: &str = "blog_posts";

/// Blog repository errors.
#[derive(Debug, Error)]
pub enum BlogError {
    #[error("Operation failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Operation failed: post collection is unreadable: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Check an edited post and fill in derived fields before it is saved.
///
/// Rejects posts failing [`BlogPost::validation_errors`]; an empty read time
/// is estimated from the content.
pub fn prepare(mut post: BlogPost) -> Result<BlogPost, BlogError> {
    let errors = post.validation_errors();
    if !errors.is_empty() {
        return Err(BlogError::Validation(errors.join("; ")));
    }
    if post.read_time.trim().is_empty() {
        post.read_time = read_time::estimate(&post.content);
    }
    Ok(post)
}
