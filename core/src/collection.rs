//! Collection matching — keyed maps and ordered sequences.
//!
//! Maps: every expected key is required (a wildcard-valued key tolerates
//! absence); extra actual keys pass unless `exact_keys` is set. Sequences:
//! positional with equal lengths, unless the last expected element is the
//! `@...@` rest-wildcard absorbing any trailing elements. Each child is
//! redelegated to the engine's dispatcher, so an element can itself be a
//! placeholder, a literal, or a nested collection.

use crate::engine::{Engine, MatchOutcome};
use crate::pattern::{self, PatternToken, REST_TOKEN};
use crate::{MatcherError, Path, Value};

impl Engine {
    /// Match an ordered sequence pattern positionally.
    pub(crate) fn match_sequence(
        &self,
        actual: &Value,
        expected: &[Value],
        path: &Path,
    ) -> Result<MatchOutcome, MatcherError> {
        let Value::Sequence(items) = actual else {
            return Ok(MatchOutcome::fail(
                path.clone(),
                format!("expected sequence, got {} {actual}", actual.type_name()),
            ));
        };

        // Lex string leaves up front so the rest-wildcard position rule is
        // enforced before any element comparison runs.
        let mut tokens: Vec<Option<PatternToken>> = Vec::with_capacity(expected.len());
        for (i, element) in expected.iter().enumerate() {
            if let Value::String(leaf) = element {
                let token = pattern::lex(leaf)?;
                if token == PatternToken::Rest && i != expected.len() - 1 {
                    return Err(MatcherError::Pattern {
                        pattern: REST_TOKEN.to_string(),
                        reason: "rest wildcard is only valid as the last element of a sequence"
                            .to_string(),
                    });
                }
                tokens.push(Some(token));
            } else {
                tokens.push(None);
            }
        }

        let has_rest = matches!(tokens.last(), Some(Some(PatternToken::Rest)));
        let required = if has_rest {
            expected.len() - 1
        } else {
            expected.len()
        };

        if has_rest {
            if items.len() < required {
                return Ok(MatchOutcome::fail(
                    path.clone(),
                    format!(
                        "expected at least {required} elements, got {}",
                        items.len()
                    ),
                ));
            }
        } else if items.len() != expected.len() {
            return Ok(MatchOutcome::fail(
                path.clone(),
                format!("expected {} elements, got {}", expected.len(), items.len()),
            ));
        }

        for i in 0..required {
            let child = path.child_index(i);
            let outcome = match &tokens[i] {
                Some(token) => self.match_token(&items[i], token, &child)?,
                None => self.match_at(&items[i], &expected[i], &child)?,
            };
            if !outcome.is_success() {
                return Ok(outcome);
            }
        }

        Ok(MatchOutcome::Success)
    }

    /// Match a keyed map pattern: required keys, recursive values, extra
    /// actual keys tolerated unless `exact_keys`.
    pub(crate) fn match_map(
        &self,
        actual: &Value,
        expected: &[(String, Value)],
        path: &Path,
    ) -> Result<MatchOutcome, MatcherError> {
        let Value::Map(entries) = actual else {
            return Ok(MatchOutcome::fail(
                path.clone(),
                format!("expected map, got {} {actual}", actual.type_name()),
            ));
        };

        for (key, value_pattern) in expected {
            let child = path.child_key(key);
            match lookup(entries, key) {
                Some(actual_value) => {
                    let outcome = self.match_at(actual_value, value_pattern, &child)?;
                    if !outcome.is_success() {
                        return Ok(outcome);
                    }
                }
                None => {
                    if self.pattern_allows_absence(value_pattern)? {
                        continue;
                    }
                    return Ok(MatchOutcome::fail(child, format!("missing key {key:?}")));
                }
            }
        }

        if self.options.exact_keys {
            for (key, _) in entries {
                if lookup(expected, key).is_none() {
                    return Ok(MatchOutcome::fail(
                        path.child_key(key),
                        format!("unexpected key {key:?}"),
                    ));
                }
            }
        }

        Ok(MatchOutcome::Success)
    }

    /// A wildcard-valued expected key tolerates the key being absent from
    /// the actual map (directly or through an alternation branch).
    fn pattern_allows_absence(&self, value_pattern: &Value) -> Result<bool, MatcherError> {
        let Value::String(leaf) = value_pattern else {
            return Ok(false);
        };
        Ok(match pattern::lex(leaf)? {
            token @ PatternToken::Placeholder { .. } => token.is_wildcard(),
            PatternToken::Alternatives(branches) => {
                branches.iter().any(PatternToken::is_wildcard)
            }
            _ => false,
        })
    }
}

fn lookup<'a>(entries: &'a [(String, Value)], key: &str) -> Option<&'a Value> {
    entries
        .iter()
        .find(|(k, _)| k.as_str() == key)
        .map(|(_, v)| v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Format;

    fn match_json(actual: &str, expected: &str) -> MatchOutcome {
        Engine::new()
            .match_text(Format::Json, actual, expected)
            .expect("no fatal error")
    }

    fn failure_path(outcome: &MatchOutcome) -> String {
        outcome.failure().expect("failure").path.to_string()
    }

    #[test]
    fn test_map_partial_match_tolerates_extra_keys() {
        assert!(match_json(r#"{"a": 1, "b": 2}"#, r#"{"a": 1}"#).is_success());
    }

    #[test]
    fn test_map_missing_key_fails_with_path() {
        let outcome = match_json(r#"{"b": 2}"#, r#"{"a": 1}"#);
        assert_eq!(failure_path(&outcome), "a");
        assert!(outcome
            .failure()
            .expect("failure")
            .message
            .contains("missing key"));
    }

    #[test]
    fn test_map_exact_keys_option() {
        let engine = Engine::builder().exact_keys(true).build();
        let outcome = engine
            .match_text(Format::Json, r#"{"a": 1, "b": 2}"#, r#"{"a": 1}"#)
            .expect("no fatal error");
        assert_eq!(failure_path(&outcome), "b");
        assert!(outcome
            .failure()
            .expect("failure")
            .message
            .contains("unexpected key"));

        // Exact mode still passes when key sets agree.
        let outcome = engine
            .match_text(Format::Json, r#"{"a": 1}"#, r#"{"a": 1}"#)
            .expect("no fatal error");
        assert!(outcome.is_success());
    }

    #[test]
    fn test_map_key_order_is_not_significant() {
        assert!(match_json(r#"{"b": 2, "a": 1}"#, r#"{"a": 1, "b": 2}"#).is_success());
    }

    #[test]
    fn test_wildcard_valued_key_tolerates_absence() {
        assert!(match_json(r#"{}"#, r#"{"opt": "@*@"}"#).is_success());
        assert!(match_json(r#"{"opt": [1, 2]}"#, r#"{"opt": "@*@"}"#).is_success());
        // A typed placeholder still requires presence.
        assert!(!match_json(r#"{}"#, r#"{"opt": "@integer@"}"#).is_success());
    }

    #[test]
    fn test_sequence_positional_and_length() {
        assert!(match_json("[1, 2, 3]", "[1, 2, 3]").is_success());

        let outcome = match_json("[1, 2]", "[1, 2, 3]");
        assert!(outcome
            .failure()
            .expect("failure")
            .message
            .contains("expected 3 elements"));

        let outcome = match_json("[1, 9, 3]", "[1, 2, 3]");
        assert_eq!(failure_path(&outcome), "[1]");
    }

    #[test]
    fn test_sequence_rest_wildcard_absorbs_trailing() {
        let expected = r#"[1, "@...@"]"#;
        assert!(match_json("[1]", expected).is_success());
        assert!(match_json("[1, 2]", expected).is_success());
        assert!(match_json("[1, 2, 3]", expected).is_success());

        let outcome = match_json("[2, 1]", expected);
        assert_eq!(failure_path(&outcome), "[0]");
    }

    #[test]
    fn test_sequence_rest_requires_prefix() {
        let outcome = match_json("[]", r#"[1, "@...@"]"#);
        assert!(outcome
            .failure()
            .expect("failure")
            .message
            .contains("at least 1"));
    }

    #[test]
    fn test_rest_not_last_is_pattern_error() {
        let err = Engine::new()
            .match_text(Format::Json, "[1, 2]", r#"["@...@", 2]"#)
            .unwrap_err();
        assert!(matches!(err, MatcherError::Pattern { .. }));
    }

    #[test]
    fn test_type_mismatch_on_collection_shape() {
        let outcome = match_json("5", "[1]");
        assert!(outcome
            .failure()
            .expect("failure")
            .message
            .contains("expected sequence"));

        let outcome = match_json("[1]", r#"{"a": 1}"#);
        assert!(outcome
            .failure()
            .expect("failure")
            .message
            .contains("expected map"));
    }

    #[test]
    fn test_nested_divergence_path() {
        let outcome = match_json(
            r#"{"items": [{"name": "a"}, {"name": "b"}]}"#,
            r#"{"items": [{"name": "a"}, {"name": "c"}]}"#,
        );
        assert_eq!(failure_path(&outcome), "items[1].name");
    }

    #[test]
    fn test_placeholders_inside_sequence() {
        assert!(match_json(
            r#"[42, "x", null]"#,
            r#"["@integer@", "@string@", "@null@"]"#
        )
        .is_success());
    }
}
