/// Case-insensitive substring check.
/// The needle is lowercased here, so callers can pass raw user input.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Truncate a string to at most `max_chars` characters, adding an ellipsis if cut
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else if max_chars <= 3 {
        s.chars().take(max_chars).collect()
    } else {
        let truncated: String = s.chars().take(max_chars - 3).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("Superman", "man"));
        assert!(contains_ignore_case("Superman", "SUPER"));
        assert!(contains_ignore_case("Batman", ""));
        assert!(!contains_ignore_case("Batman", "robin"));
        assert!(contains_ignore_case("ÉCLAIR", "éclair"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello", 10), "Hello");
        assert_eq!(truncate("Hello World", 8), "Hello...");
        assert_eq!(truncate("Hi", 2), "Hi");
        assert_eq!(truncate("Ñandú Ñandú", 6), "Ñan...");
    }
}
