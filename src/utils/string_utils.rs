//! UTF-8-safe string truncation utilities
//!
//! Page text is cut to fixed character budgets before it is sent to the
//! classification service and before markdown is returned to callers. These
//! helpers never split a multi-byte character.

/// Safely truncate a string to a maximum number of CHARACTERS (not bytes).
///
/// # Examples
/// ```
/// # use kbcrawl::utils::string_utils::safe_truncate_chars;
/// assert_eq!(safe_truncate_chars("Hello, World!", 5), "Hello");
/// assert_eq!(safe_truncate_chars("🎉🎊🎈", 2), "🎉🎊");
/// assert_eq!(safe_truncate_chars("Hi", 100), "Hi");
/// ```
#[inline]
pub fn safe_truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        None => s,
        Some((byte_idx, _)) => &s[..byte_idx],
    }
}

/// Collapse every run of whitespace into a single space and trim the ends.
#[must_use]
pub fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Approximate size of a passage: its whitespace-separated word count.
#[inline]
#[must_use]
pub fn estimate_size(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        let text = "┌───────┐ ┌───────┐";
        assert_eq!(safe_truncate_chars(text, 9), "┌───────┐");
    }

    #[test]
    fn collapse_and_estimate() {
        assert_eq!(collapse_whitespace("  a \n\t b  c "), "a b c");
        assert_eq!(estimate_size("one two  three\nfour"), 4);
        assert_eq!(estimate_size("   "), 0);
    }
}
