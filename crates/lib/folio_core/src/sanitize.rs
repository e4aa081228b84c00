//! HTML sanitizer for user-authored post content.
//!
//! Only basic formatting, links, lists, headings and code blocks survive.
//! `script`, `style`, `iframe`, `object` and `embed` are dropped together with
//! everything inside them. Event handlers, `style` and `data-*` attributes never
//! pass, whatever the tag.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Tags kept in sanitized output.
pub const ALLOWED_TAGS: &[&str] = &[
    // formatting
    "p", "br", "hr", "span", "strong", "b", "em", "i", "u", "s", "del", "blockquote",
    // links
    "a",
    // lists
    "ul", "ol", "li",
    // headings
    "h1", "h2", "h3", "h4", "h5", "h6",
    // code
    "pre", "code",
];

/// Tags removed along with their content.
pub const STRIPPED_WITH_CONTENT: &[&str] = &["script", "style", "iframe", "object", "embed"];

/// URL schemes accepted in `href`.
pub const ALLOWED_URL_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// A configured allow-list sanitizer.
pub struct Sanitizer {
    builder: ammonia::Builder<'static>,
}

impl Sanitizer {
    pub fn new() -> Self {
        let mut builder = ammonia::Builder::default();
        builder
            .tags(ALLOWED_TAGS.iter().copied().collect())
            .clean_content_tags(STRIPPED_WITH_CONTENT.iter().copied().collect())
            .generic_attributes(HashSet::from(["title"]))
            .tag_attributes(HashMap::from([("a", HashSet::from(["href"]))]))
            .url_schemes(ALLOWED_URL_SCHEMES.iter().copied().collect())
            .link_rel(Some("noopener noreferrer"))
            .strip_comments(true);
        Self { builder }
    }

    /// Sanitize an HTML fragment.
    pub fn sanitize(&self, html: &str) -> String {
        self.builder.clean(html).to_string()
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new()
    }
}

static DEFAULT_SANITIZER: LazyLock<Sanitizer> = LazyLock::new(Sanitizer::new);

/// Sanitize `html` with the default allow-list.
pub fn sanitize(html: &str) -> String {
    DEFAULT_SANITIZER.sanitize(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_and_its_content_are_removed() {
        assert_eq!(sanitize("<script>alert(1)</script><p>hi</p>"), "<p>hi</p>");
    }

    #[test]
    fn allowed_markup_passes_through() {
        let html = "<h2>Title</h2><p><strong>bold</strong> and <em>em</em></p>\
                    <ul><li>one</li></ul><pre><code>let x = 1;</code></pre>";
        assert_eq!(sanitize(html), html);
    }

    #[test]
    fn embedded_content_tags_are_removed_entirely() {
        let out = sanitize(
            "<style>p{color:red}</style><iframe src=\"https://evil\">x</iframe>\
             <object data=\"a.swf\">fallback</object><embed src=\"b.swf\"><p>ok</p>",
        );
        assert_eq!(out, "<p>ok</p>");
    }

    #[test]
    fn event_handlers_and_data_attributes_are_stripped() {
        let out = sanitize(
            "<p onclick=\"steal()\" data-track=\"1\" style=\"color:red\" title=\"t\">x</p>",
        );
        assert_eq!(out, "<p title=\"t\">x</p>");
    }

    #[test]
    fn links_keep_href_and_get_safe_rel() {
        let out = sanitize("<a href=\"https://example.com\" onmouseover=\"x()\">go</a>");
        assert!(out.contains("href=\"https://example.com\""));
        assert!(out.contains("rel=\"noopener noreferrer\""));
        assert!(!out.contains("onmouseover"));
    }

    #[test]
    fn javascript_urls_are_dropped() {
        let out = sanitize("<a href=\"javascript:alert(1)\">x</a>");
        assert!(!out.contains("javascript"));
        assert!(out.contains(">x</a>"));
    }

    #[test]
    fn unknown_tags_are_unwrapped() {
        assert_eq!(sanitize("<div><p>kept</p></div>"), "<p>kept</p>");
        assert_eq!(sanitize("<img src=\"x\" onerror=\"y()\">text"), "text");
    }

    #[test]
    fn comments_are_stripped() {
        assert_eq!(sanitize("<!-- secret --><p>a</p>"), "<p>a</p>");
    }

    #[test]
    fn plain_text_is_escaped() {
        assert_eq!(sanitize("a < b & c"), "a &lt; b &amp; c");
    }

    #[test]
    fn sanitize_is_deterministic() {
        let html = "<p>one<script>x</script></p><a href=\"mailto:me@example.com\">mail</a>";
        assert_eq!(sanitize(html), sanitize(html));
        assert_eq!(sanitize(&sanitize(html)), sanitize(html));
    }
}
