//! Reading-time estimate shown next to each post.

/// Average adult reading speed.
pub const WORDS_PER_MINUTE: usize = 200;

/// Estimate the reading time of markdown `content`, e.g. `"3 min read"`.
/// Never less than one minute.
pub fn estimate(content: &str) -> String {
    let words = content.split_whitespace().count();
    let minutes = words.div_ceil(WORDS_PER_MINUTE).max(1);
    format!("{minutes} min read")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_content_reads_in_one_minute() {
        assert_eq!(estimate(""), "1 min read");
    }

    #[test]
    fn rounds_partial_minutes_up() {
        let text = "word ".repeat(WORDS_PER_MINUTE + 1);
        assert_eq!(estimate(&text), "2 min read");
    }

    #[test]
    fn exact_multiple() {
        let text = "word ".repeat(WORDS_PER_MINUTE * 3);
        assert_eq!(estimate(&text), "3 min read");
    }
}
