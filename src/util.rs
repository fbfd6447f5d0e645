//! Shared string validation helpers.

/// Returns true iff `s` is empty or consists entirely of whitespace.
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Truncate `s` to at most `max_chars` characters.
///
/// Returns `s` unchanged when it already fits. Counts characters rather than
/// bytes, so a multi-byte code point is never split.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_blank_on_empty_and_whitespace() {
        assert!(is_blank(""));
        assert!(is_blank("   "));
        assert!(is_blank("\t\n  \r"));
    }

    #[test]
    fn is_blank_on_content() {
        assert!(!is_blank("x"));
        assert!(!is_blank("  padded  "));
    }

    #[test]
    fn truncate_chars_returns_short_strings_unchanged() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 5), "hello");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn truncate_chars_cuts_to_exact_length() {
        assert_eq!(truncate_chars("hello world", 5), "hello");
        assert_eq!(truncate_chars("abc", 1), "a");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("日本語のテキスト", 3), "日本語");
    }
}
