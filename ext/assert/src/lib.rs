//! fixmatch-assert — the test-assertion boundary around the fixmatch engine.
//!
//! The engine reports a [`Mismatch`] as a value; this crate turns it into
//! something a human reads in CI output: the divergence path plus a
//! unified diff of the canonicalized documents. It also provides
//! panic-style helpers (`assert_matches_json`, `assert_matches_xml`) for
//! direct use inside tests.
//!
//! ```
//! fixmatch_assert::assert_matches_json(
//!     r#"{"id": 42, "name": "Alice"}"#,
//!     r#"{"id": "@integer@", "name": "@string@"}"#,
//! );
//! ```

use fixmatch::{json, Engine, Format, MatchOutcome, MatcherError, Mismatch};

mod diff;

pub use diff::unified_diff;

/// Parse and re-render a document in canonical pretty form.
///
/// Both formats render through the generic value tree, so an XML document
/// comes out as its tree shape — which is also what the engine compared.
///
/// # Errors
///
/// [`MatcherError::InvalidDocument`] when the text does not parse.
pub fn canonicalize(format: Format, text: &str) -> Result<String, MatcherError> {
    Ok(json::to_pretty_string(&format.parse(text)?))
}

/// Render a mismatch for terminal/CI output: the divergence path and
/// message, followed by a unified diff of expected vs. actual.
#[must_use]
pub fn render_failure(
    mismatch: &Mismatch,
    format: Format,
    actual: &str,
    expected: &str,
) -> String {
    // The documents parsed before matching could start, so canonicalize
    // cannot fail here; fall back to the raw text all the same.
    let expected_pretty =
        canonicalize(format, expected).unwrap_or_else(|_| expected.trim().to_string());
    let actual_pretty =
        canonicalize(format, actual).unwrap_or_else(|_| actual.trim().to_string());
    format!(
        "{mismatch}\n{}",
        unified_diff(&(expected_pretty + "\n"), &(actual_pretty + "\n"))
    )
}

/// Match trimmed response content against a fixture and panic with a
/// rendered failure when they diverge.
///
/// # Panics
///
/// On mismatch, and on fatal errors (malformed fixture, malformed
/// document, unregistered callback).
pub fn assert_matches(engine: &Engine, format: Format, actual: &str, expected: &str) {
    let actual = actual.trim();
    let expected = expected.trim();
    match engine.match_text(format, actual, expected) {
        Ok(MatchOutcome::Success) => {}
        Ok(MatchOutcome::Failure(mismatch)) => {
            panic!("{}", render_failure(&mismatch, format, actual, expected))
        }
        Err(error) => panic!("fixture matching could not run: {error}"),
    }
}

/// [`assert_matches`] with a default engine and the JSON adapter.
pub fn assert_matches_json(actual: &str, expected: &str) {
    assert_matches(&Engine::new(), Format::Json, actual, expected);
}

/// [`assert_matches`] with a default engine and the XML adapter.
pub fn assert_matches_xml(actual: &str, expected: &str) {
    assert_matches(&Engine::new(), Format::Xml, actual, expected);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_failure_includes_path_and_diff() {
        let engine = Engine::new();
        let actual = r#"{"id": 42, "name": "Bob"}"#;
        let expected = r#"{"id": "@integer@", "name": "Alice"}"#;

        let outcome = engine
            .match_text(Format::Json, actual, expected)
            .expect("no fatal error");
        let mismatch = outcome.failure().expect("failure");

        let rendered = render_failure(mismatch, Format::Json, actual, expected);
        assert!(rendered.contains("mismatch at name"));
        assert!(rendered.contains("-  \"name\": \"Alice\""));
        assert!(rendered.contains("+  \"name\": \"Bob\""));
    }

    #[test]
    fn test_canonicalize_normalizes_xml_whitespace() {
        let pretty = canonicalize(Format::Xml, "<a>\n  <b/>\n</a>").expect("parses");
        let compact = canonicalize(Format::Xml, "<a><b/></a>").expect("parses");
        assert_eq!(pretty, compact);
    }

    #[test]
    fn test_assert_matches_json_passes() {
        assert_matches_json(
            "  {\"id\": 7}  ",
            r#"{"id": "@integer@"}"#,
        );
    }

    #[test]
    #[should_panic(expected = "mismatch at id")]
    fn test_assert_matches_json_panics_with_path() {
        assert_matches_json(r#"{"id": "x"}"#, r#"{"id": "@integer@"}"#);
    }

    #[test]
    #[should_panic(expected = "could not run")]
    fn test_fatal_error_panics_distinctly() {
        assert_matches_json(r#"{"id": 1}"#, r#"{"id": "@bogus@"}"#);
    }

    #[test]
    fn test_assert_matches_xml_passes() {
        assert_matches_xml(
            "<user><id>7</id></user>",
            "<user>\n  <id>@string@</id>\n</user>",
        );
    }
}
