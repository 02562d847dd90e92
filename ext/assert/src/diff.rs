//! Unified-diff rendering of expected vs. actual documents.

use similar::TextDiff;

/// Line-based unified diff with `expected` / `actual` headers.
#[must_use]
pub fn unified_diff(expected: &str, actual: &str) -> String {
    TextDiff::from_lines(expected, actual)
        .unified_diff()
        .context_radius(3)
        .header("expected", "actual")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diff_marks_changed_lines() {
        let diff = unified_diff("a\nb\nc\n", "a\nX\nc\n");
        assert!(diff.contains("--- expected"));
        assert!(diff.contains("+++ actual"));
        assert!(diff.contains("-b"));
        assert!(diff.contains("+X"));
    }

    #[test]
    fn test_identical_inputs_have_no_hunks() {
        let diff = unified_diff("a\nb\n", "a\nb\n");
        assert!(!diff.contains("@@"));
    }
}
