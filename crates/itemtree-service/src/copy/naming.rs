//! Unique name generation for copies.

use std::collections::HashSet;

/// Candidate `attempt` (1-based) for the root of a copy:
/// `"{base} (copy)"`, `"{base} (copy 2)"`, `"{base} (copy 3)"`, ...
pub fn top_level_candidate(base: &str, attempt: u32) -> String {
    if attempt <= 1 {
        format!("{base} (copy)")
    } else {
        format!("{base} (copy {attempt})")
    }
}

/// Candidate `attempt` (1-based) for an item copied inside a new folder:
/// `"{base}"`, `"{base} (2)"`, `"{base} (3)"`, ...
pub fn nested_candidate(base: &str, attempt: u32) -> String {
    if attempt <= 1 {
        base.to_string()
    } else {
        format!("{base} ({attempt})")
    }
}

/// First candidate in `1..=max_attempts` not present in `taken`.
pub fn first_free<F>(taken: &HashSet<String>, max_attempts: u32, candidate: F) -> Option<String>
where
    F: Fn(u32) -> String,
{
    (1..=max_attempts.max(1))
        .map(candidate)
        .find(|name| !taken.contains(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn taken(names: &[&str]) -> HashSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_top_level_sequence() {
        let used = taken(&["Report.pdf", "Report.pdf (copy)", "Report.pdf (copy 2)"]);
        assert_eq!(
            first_free(&used, 100, |n| top_level_candidate("Report.pdf", n)).as_deref(),
            Some("Report.pdf (copy 3)")
        );
        assert_eq!(
            first_free(&taken(&[]), 100, |n| top_level_candidate("Report.pdf", n)).as_deref(),
            Some("Report.pdf (copy)")
        );
    }

    #[test]
    fn test_nested_sequence() {
        assert_eq!(
            first_free(&taken(&["b.txt"]), 100, |n| nested_candidate("a.txt", n)).as_deref(),
            Some("a.txt")
        );
        assert_eq!(
            first_free(&taken(&["a.txt", "a.txt (2)"]), 100, |n| nested_candidate("a.txt", n))
                .as_deref(),
            Some("a.txt (3)")
        );
    }

    #[test]
    fn test_exhausted_attempts() {
        let used = taken(&["x (copy)", "x (copy 2)"]);
        assert_eq!(first_free(&used, 2, |n| top_level_candidate("x", n)), None);
    }
}
