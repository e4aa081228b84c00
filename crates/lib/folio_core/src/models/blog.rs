//! Blog post records.
//!
//! The serialized shape (camelCase keys) is the on-disk format of the blog
//! bucket, so renaming a field here is a storage migration.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format used for `BlogPost::date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Post author.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Author {
    pub name: String,
    /// Avatar image URL.
    pub avatar: String,
    pub role: String,
}

/// An author-curated link featured inside a post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoldenLink {
    pub url: String,
    pub title: String,
}

/// One article or draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BlogPost {
    /// Creation timestamp in milliseconds, assigned by the editor.
    pub id: i64,
    pub title: String,
    pub excerpt: String,
    /// Markdown source.
    pub content: String,
    /// `YYYY-MM-DD`, stamped by the repository on every save.
    pub date: String,
    pub category: String,
    pub cover_image: String,
    pub tags: Vec<String>,
    /// e.g. `"5 min read"`.
    pub read_time: String,
    pub author: Author,
    pub is_draft: bool,
    pub golden_links: Vec<GoldenLink>,
}

impl BlogPost {
    /// A draft with the given id, title and content; everything else empty.
    pub fn new(id: i64, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
            is_draft: true,
            ..Default::default()
        }
    }

    /// Parsed `date`, if it holds a `YYYY-MM-DD` prefix.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        let prefix = self.date.get(..10).unwrap_or(&self.date);
        NaiveDate::parse_from_str(prefix, DATE_FORMAT).ok()
    }

    /// Whether the post is visible on public pages.
    pub fn is_published(&self) -> bool {
        !self.is_draft
    }

    /// Validate fields an editor must fill in.
    /// Returns a list of messages (empty = valid).
    pub fn validation_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.title.trim().is_empty() {
            errors.push("Title is required".to_string());
        }
        if self.content.trim().is_empty() {
            errors.push("Content is required".to_string());
        }
        for link in &self.golden_links {
            if !(link.url.starts_with("https://") || link.url.starts_with("http://")) {
                errors.push(format!("Golden link URL must be http(s): {}", link.url));
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_with_camel_case_keys() {
        let mut post = BlogPost::new(1, "T", "C");
        post.cover_image = "https://img".into();
        post.golden_links.push(GoldenLink {
            url: "https://example.com".into(),
            title: "Ex".into(),
        });
        let value = serde_json::to_value(&post).unwrap();
        assert_eq!(value["coverImage"], "https://img");
        assert_eq!(value["isDraft"], true);
        assert_eq!(value["readTime"], "");
        assert_eq!(value["goldenLinks"][0]["title"], "Ex");
    }

    #[test]
    fn missing_fields_decode_to_defaults() {
        let post: BlogPost = serde_json::from_value(json!({
            "id": 7,
            "title": "Old record",
            "content": "body"
        }))
        .unwrap();
        assert_eq!(post.id, 7);
        assert!(post.tags.is_empty());
        assert!(post.golden_links.is_empty());
        assert!(!post.is_draft);
    }

    #[test]
    fn parsed_date_accepts_iso_timestamp_prefix() {
        let mut post = BlogPost::new(1, "T", "C");
        post.date = "2024-05-06T10:00:00.000Z".into();
        assert_eq!(post.parsed_date(), NaiveDate::from_ymd_opt(2024, 5, 6));
        post.date = "yesterday".into();
        assert!(post.parsed_date().is_none());
    }

    #[test]
    fn validation_flags_blank_fields_and_bad_links() {
        let mut post = BlogPost::new(1, "  ", "");
        post.golden_links.push(GoldenLink {
            url: "javascript:alert(1)".into(),
            title: "x".into(),
        });
        let errors = post.validation_errors();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0], "Title is required");
        assert_eq!(errors[1], "Content is required");
    }

    #[test]
    fn validation_accepts_complete_post() {
        let post = BlogPost::new(1, "Title", "Body");
        assert!(post.validation_errors().is_empty());
    }
}
