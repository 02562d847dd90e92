//! Scalar matchers — one per placeholder type, dispatched by precedence.
//!
//! Dispatch is a tagged-variant match over [`TypeTag`] driven by an
//! explicit precedence table, [`SCALAR_PRECEDENCE`]. First applicable tag
//! wins. The table is a named constant covered by a test, so specificity
//! order (`integer` before `number`, `scalar` before `wildcard`) is a
//! stated contract rather than an artifact of construction order.

use crate::callback::CallbackRegistry;
use crate::pattern::{PatternToken, TypeTag};
use crate::{expression, MatcherError, Value};

/// Dispatch order for scalar placeholders, most specific first.
///
/// `Integer` is tried before `Number` so `@integer@` never inherits
/// `@number@`'s broader semantics; `Wildcard` comes last as the
/// catch-all.
pub const SCALAR_PRECEDENCE: &[TypeTag] = &[
    TypeTag::Callback,
    TypeTag::Expression,
    TypeTag::Null,
    TypeTag::String,
    TypeTag::Integer,
    TypeTag::Boolean,
    TypeTag::Double,
    TypeTag::Number,
    TypeTag::Scalar,
    TypeTag::Wildcard,
];

/// Applicability predicate for one scalar matcher.
///
/// A matcher applies iff the token is a placeholder carrying its own tag.
/// Literals fall through the whole chain to the equality fallback.
#[must_use]
pub(crate) fn can_apply(tag: TypeTag, token: &PatternToken) -> bool {
    matches!(token, PatternToken::Placeholder { tag: t, .. } if *t == tag)
}

/// Run the scalar matcher for `tag` against `actual`.
///
/// Returns `Ok(None)` on match, `Ok(Some(message))` on mismatch.
///
/// # Errors
///
/// `@callback(name)@` with an unregistered name is a configuration error,
/// surfaced as [`MatcherError::UnknownCallback`] rather than a mismatch.
pub(crate) fn apply(
    tag: TypeTag,
    actual: &Value,
    expr: Option<&str>,
    callbacks: &CallbackRegistry,
) -> Result<Option<String>, MatcherError> {
    let matched = match tag {
        TypeTag::Null => actual.is_null(),
        TypeTag::String => matches!(actual, Value::String(_)),
        TypeTag::Integer => matches!(actual, Value::Integer(_)),
        TypeTag::Boolean => matches!(actual, Value::Bool(_)),
        TypeTag::Double => matches!(actual, Value::Double(_)),
        TypeTag::Number => matches!(actual, Value::Integer(_) | Value::Double(_)),
        TypeTag::Scalar => actual.is_scalar(),
        TypeTag::Wildcard => true,
        TypeTag::Expression => {
            let expr = required_content(tag, expr)?;
            return Ok(match expression::evaluate(expr, actual) {
                Ok(true) => None,
                Ok(false) => Some(format!(
                    "expression {expr:?} evaluated to false for {actual}"
                )),
                Err(reason) => Some(format!("ill-formed expression {expr:?}: {reason}")),
            });
        }
        TypeTag::Callback => {
            let name = required_content(tag, expr)?;
            let predicate =
                callbacks
                    .get(name)
                    .ok_or_else(|| MatcherError::UnknownCallback {
                        name: name.to_string(),
                        available: callbacks.names(),
                    })?;
            return Ok(if predicate(actual) {
                None
            } else {
                Some(format!("callback {name:?} rejected {actual}"))
            });
        }
    };

    Ok(if matched {
        None
    } else {
        Some(format!(
            "expected {}, got {} {actual}",
            tag.name(),
            actual.type_name()
        ))
    })
}

/// The lexer guarantees content for `expr`/`callback`; a bare tag here is
/// a malformed token constructed outside the lexer.
fn required_content(tag: TypeTag, expr: Option<&str>) -> Result<&str, MatcherError> {
    expr.ok_or_else(|| MatcherError::Pattern {
        pattern: format!("@{}@", tag.name()),
        reason: format!("@{}(...)@ requires an argument", tag.name()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::lex;

    fn apply_bare(tag: TypeTag, actual: &Value) -> Option<String> {
        apply(tag, actual, None, &CallbackRegistry::new()).expect("no fatal error")
    }

    #[test]
    fn test_precedence_table_order() {
        // The declared contract from the design: most specific first,
        // wildcard last. A reorder here is a semantic change.
        assert_eq!(
            SCALAR_PRECEDENCE,
            &[
                TypeTag::Callback,
                TypeTag::Expression,
                TypeTag::Null,
                TypeTag::String,
                TypeTag::Integer,
                TypeTag::Boolean,
                TypeTag::Double,
                TypeTag::Number,
                TypeTag::Scalar,
                TypeTag::Wildcard,
            ]
        );
    }

    #[test]
    fn test_every_placeholder_tag_is_dispatchable() {
        for name in TypeTag::NAMES {
            let tag = TypeTag::from_name(name).expect("listed name resolves");
            assert!(
                SCALAR_PRECEDENCE.contains(&tag),
                "tag {name} missing from precedence table"
            );
        }
    }

    #[test]
    fn test_can_apply_matches_own_tag_only() {
        let token = lex("@integer@").expect("lexes");
        assert!(can_apply(TypeTag::Integer, &token));
        assert!(!can_apply(TypeTag::Number, &token));
        assert!(!can_apply(
            TypeTag::Integer,
            &PatternToken::Literal(Value::Integer(5))
        ));
    }

    #[test]
    fn test_integer_rejects_double_representation() {
        assert!(apply_bare(TypeTag::Integer, &Value::Integer(5)).is_none());
        // 5.0 is numerically whole but represented as a double.
        assert!(apply_bare(TypeTag::Integer, &Value::Double(5.0)).is_some());
        assert!(apply_bare(TypeTag::Integer, &Value::String("5".into())).is_some());
    }

    #[test]
    fn test_number_accepts_both_representations() {
        assert!(apply_bare(TypeTag::Number, &Value::Integer(5)).is_none());
        assert!(apply_bare(TypeTag::Number, &Value::Double(5.0)).is_none());
        assert!(apply_bare(TypeTag::Number, &Value::String("5".into())).is_some());
    }

    #[test]
    fn test_string_boolean_double_null() {
        assert!(apply_bare(TypeTag::String, &Value::String("abc".into())).is_none());
        assert!(apply_bare(TypeTag::String, &Value::Integer(5)).is_some());

        assert!(apply_bare(TypeTag::Boolean, &Value::Bool(false)).is_none());
        assert!(apply_bare(TypeTag::Boolean, &Value::Integer(0)).is_some());

        assert!(apply_bare(TypeTag::Double, &Value::Double(1.5)).is_none());
        assert!(apply_bare(TypeTag::Double, &Value::Integer(1)).is_some());

        assert!(apply_bare(TypeTag::Null, &Value::Null).is_none());
        assert!(apply_bare(TypeTag::Null, &Value::Bool(false)).is_some());
    }

    #[test]
    fn test_scalar_excludes_null_and_collections() {
        assert!(apply_bare(TypeTag::Scalar, &Value::Integer(1)).is_none());
        assert!(apply_bare(TypeTag::Scalar, &Value::String("x".into())).is_none());
        assert!(apply_bare(TypeTag::Scalar, &Value::Null).is_some());
        assert!(apply_bare(TypeTag::Scalar, &Value::Sequence(vec![])).is_some());
        assert!(apply_bare(TypeTag::Scalar, &Value::Map(vec![])).is_some());
    }

    #[test]
    fn test_wildcard_matches_everything() {
        for value in [
            Value::Null,
            Value::Bool(true),
            Value::Integer(1),
            Value::Double(1.5),
            Value::String("x".into()),
            Value::Sequence(vec![Value::Integer(1)]),
            Value::Map(vec![("k".into(), Value::Null)]),
        ] {
            assert!(apply_bare(TypeTag::Wildcard, &value).is_none(), "{value}");
        }
    }

    #[test]
    fn test_expression_match_and_mismatch() {
        let registry = CallbackRegistry::new();
        assert!(
            apply(TypeTag::Expression, &Value::Integer(42), Some("value > 10"), &registry)
                .expect("no fatal error")
                .is_none()
        );
        assert!(
            apply(TypeTag::Expression, &Value::Integer(5), Some("value > 10"), &registry)
                .expect("no fatal error")
                .is_some()
        );
        // Ill-formed expression is a mismatch with a reason, not a panic.
        let message = apply(TypeTag::Expression, &Value::Integer(5), Some("value >"), &registry)
            .expect("no fatal error")
            .expect("mismatch");
        assert!(message.contains("ill-formed"));
    }

    #[test]
    fn test_callback_dispatch() {
        let mut registry = CallbackRegistry::new();
        registry.register("positive", |v: &Value| {
            v.as_integer().is_some_and(|i| i > 0)
        });

        assert!(
            apply(TypeTag::Callback, &Value::Integer(3), Some("positive"), &registry)
                .expect("no fatal error")
                .is_none()
        );
        assert!(
            apply(TypeTag::Callback, &Value::Integer(-3), Some("positive"), &registry)
                .expect("no fatal error")
                .is_some()
        );
    }

    #[test]
    fn test_unregistered_callback_is_configuration_error() {
        let mut registry = CallbackRegistry::new();
        registry.register("known", |_: &Value| true);

        let err = apply(TypeTag::Callback, &Value::Null, Some("missing"), &registry).unwrap_err();
        match err {
            MatcherError::UnknownCallback { name, available } => {
                assert_eq!(name, "missing");
                assert_eq!(available, vec!["known"]);
            }
            other => panic!("expected UnknownCallback, got {other:?}"),
        }
    }
}
