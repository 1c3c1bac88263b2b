const ELLIPSIS: char = '…';

/// Keeps the first `keep` characters of `content` followed by an ellipsis if it is longer than
/// `max_length` characters.
pub(crate) fn shorten_content(content: &str, max_length: usize, keep: usize) -> String {
    if content.chars().count() <= max_length {
        content.to_owned()
    } else {
        let mut shortened: String = content.chars().take(keep).collect();
        shortened.push(ELLIPSIS);
        shortened
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_content_is_untouched() {
        assert_eq!(shorten_content("hello", 5, 3), "hello");
    }

    #[test]
    fn test_long_content_is_shortened() {
        assert_eq!(shorten_content("hello!", 5, 3), "hel…");
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        assert_eq!(shorten_content("ééééé", 5, 3), "ééééé");
        assert_eq!(shorten_content("éééééé", 5, 3), "ééé…");
    }
}
