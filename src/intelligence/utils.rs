// Shared utilities for summarization providers

/// Maximum number of characters of document text sent to the AI service
pub const MAX_ANALYSIS_CHARS: usize = 10_000;

/// Appended when the document text had to be cut
pub const TRUNCATION_MARKER: &str = "\n\n[Text truncated due to size...]";

/// Keep the first `max_chars` characters of `text`, appending the truncation
/// marker when anything was cut. Never splits a multi-byte character.
pub fn truncate_for_analysis(text: &str, max_chars: usize) -> (String, bool) {
    match text.char_indices().nth(max_chars) {
        None => (text.to_string(), false),
        // char_indices yields char boundaries, so the slice can't split a character
        Some((end, _)) => {
            let mut out = String::with_capacity(end + TRUNCATION_MARKER.len());
            out.push_str(&text[..end]);
            out.push_str(TRUNCATION_MARKER);
            (out, true)
        }
    }
}

/// First non-blank line of `content`, trimmed
pub fn first_non_blank_line(content: &str) -> String {
    content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_15000_chars() {
        let text = "a".repeat(15_000);
        let (out, truncated) = truncate_for_analysis(&text, MAX_ANALYSIS_CHARS);
        assert!(truncated);
        assert!(out.starts_with(&"a".repeat(10_000)));
        assert!(out.ends_with(TRUNCATION_MARKER));
        assert_eq!(out.len(), 10_000 + TRUNCATION_MARKER.len());
    }

    #[test]
    fn test_truncate_exact_limit_is_untouched() {
        let text = "b".repeat(MAX_ANALYSIS_CHARS);
        let (out, truncated) = truncate_for_analysis(&text, MAX_ANALYSIS_CHARS);
        assert!(!truncated);
        assert_eq!(out, text);
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        let text = "é".repeat(12);
        let (out, truncated) = truncate_for_analysis(&text, 10);
        assert!(truncated);
        assert_eq!(out.trim_end_matches(TRUNCATION_MARKER).chars().count(), 10);
    }

    #[test]
    fn test_first_non_blank_line() {
        assert_eq!(first_non_blank_line("\n\n  **Value:** 10k  \nrest"), "**Value:** 10k");
        assert_eq!(first_non_blank_line("   \n"), "");
    }
}
