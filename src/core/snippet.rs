//! Snippet generation for search results
//!
//! Windows are measured in characters, never bytes, so multi-byte text is
//! never split inside a code point.

/// Characters kept when there is no query (or it is not found)
pub const PREVIEW_CHARS: usize = 150;
/// Characters kept before the match
pub const CONTEXT_BEFORE: usize = 50;
/// Characters kept after the end of the match
pub const CONTEXT_AFTER: usize = 100;

const ELLIPSIS: &str = "...";

/// Build a snippet of `text` around the first case-insensitive occurrence
/// of `query`.
///
/// With an empty query, or when the query does not occur, the result is
/// the first [`PREVIEW_CHARS`] characters followed by `...`.
pub fn generate(text: &str, query: &str) -> String {
    if query.is_empty() {
        return preview(text);
    }

    let chars: Vec<char> = text.chars().collect();
    let needle: Vec<char> = query.chars().collect();

    let Some(index) = find_chars(&chars, &needle) else {
        return preview(text);
    };

    let start = index.saturating_sub(CONTEXT_BEFORE);
    let end = (index + needle.len() + CONTEXT_AFTER).min(chars.len());

    let mut snippet = String::new();
    if start > 0 {
        snippet.push_str(ELLIPSIS);
    }
    snippet.extend(&chars[start..end]);
    if end < chars.len() {
        snippet.push_str(ELLIPSIS);
    }
    snippet
}

fn preview(text: &str) -> String {
    let mut out: String = text.chars().take(PREVIEW_CHARS).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Char index of the first case-insensitive occurrence of `query` in
/// `text`. Characters are compared one by one, so a match never depends on
/// lowercasing changing the length of the text.
pub fn find(text: &str, query: &str) -> Option<usize> {
    let haystack: Vec<char> = text.chars().collect();
    let needle: Vec<char> = query.chars().collect();
    find_chars(&haystack, &needle)
}

fn find_chars(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.len() > haystack.len() {
        return None;
    }
    (0..=haystack.len() - needle.len()).find(|&i| {
        haystack[i..i + needle.len()]
            .iter()
            .zip(needle)
            .all(|(a, b)| chars_eq_ci(*a, *b))
    })
}

fn chars_eq_ci(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Case-insensitive substring test used by the search filters; same rule
/// as [`generate`] uses to place its window
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    find(haystack, needle).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_preview() {
        let text = "a".repeat(200);
        let snippet = generate(&text, "");
        assert_eq!(snippet.chars().count(), PREVIEW_CHARS + 3);
        assert!(snippet.ends_with("..."));
    }

    #[test]
    fn test_empty_query_short_text_still_ellipsized() {
        assert_eq!(generate("Short text", ""), "Short text...");
    }

    #[test]
    fn test_match_at_start_has_no_leading_ellipsis() {
        let snippet = generate("Kubernetes is great", "kubernetes");
        assert_eq!(snippet, "Kubernetes is great");
    }

    #[test]
    fn test_match_in_middle_window() {
        let text = format!("{}needle{}", "x".repeat(80), "y".repeat(200));
        let snippet = generate(&text, "NEEDLE");
        assert!(snippet.starts_with("..."));
        assert!(snippet.ends_with("..."));
        assert!(snippet.contains("needle"));
        // 50 before + 6 match + 100 after, plus two ellipses
        assert_eq!(snippet.chars().count(), 50 + 6 + 100 + 6);
    }

    #[test]
    fn test_not_found_falls_back_to_preview() {
        let snippet = generate("Nothing to see here", "absent");
        assert_eq!(snippet, "Nothing to see here...");
    }

    #[test]
    fn test_multibyte_text_is_not_split() {
        let text = format!("{}café{}", "é".repeat(60), "ü".repeat(120));
        let snippet = generate(&text, "CAFÉ");
        assert!(snippet.contains("café"));
    }

    #[test]
    fn test_query_longer_than_text() {
        assert_eq!(generate("ab", "abc"), "ab...");
    }

    #[test]
    fn test_snippet_law_bound() {
        let text = "word ".repeat(100);
        let query = "word";
        let snippet = generate(&text, query);
        let body = snippet.trim_start_matches("...").trim_end_matches("...");
        assert!(body.chars().count() <= query.len() + CONTEXT_BEFORE + CONTEXT_AFTER);
        assert!(snippet.to_lowercase().contains(query));
    }

    #[test]
    fn test_contains_ci() {
        assert!(contains_ci("Kubernetes Basics", "kubernetes"));
        assert!(contains_ci("Kubernetes Basics", "BASICS"));
        assert!(contains_ci("anything", ""));
        assert!(!contains_ci("Kubernetes Basics", "docker"));
    }

    #[test]
    fn test_find_counts_chars() {
        assert_eq!(find("Café Straße", "STRASSE"), None);
        assert_eq!(find("Café Straße", "straße"), Some(5));
        assert_eq!(find("abc", ""), Some(0));
    }

    #[test]
    fn test_filter_and_window_agree() {
        // Lowercasing 'İ' yields two chars; whatever the filter matches,
        // the window must find too
        let text = format!("{} office in İstanbul and Ankara", "x".repeat(160));
        for query in ["İstanbul", "İSTANBUL", "i\u{307}stanbul", "istanbul", "ankara"] {
            let snippet = generate(&text, query);
            let windowed = snippet.starts_with("...");
            assert_eq!(contains_ci(&text, query), windowed, "{}", query);
            if windowed {
                let pos = find(&text, query).unwrap();
                let matched: String = text.chars().skip(pos).take(query.chars().count()).collect();
                assert!(snippet.contains(&matched), "{}", query);
            }
        }
        assert!(contains_ci(&text, "İSTANBUL"));
        assert!(!contains_ci(&text, "i\u{307}stanbul"));
    }
}
