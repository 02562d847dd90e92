//! JSON adapter — `serde_json` text to the generic [`Value`] tree.
//!
//! The number split happens here: `5` becomes `Value::Integer`, `5.0`
//! becomes `Value::Double`, preserving the document's own representation
//! for the `@integer@` / `@double@` distinction.

use crate::{MatcherError, Value};

/// Parse JSON text into a [`Value`] tree.
///
/// # Errors
///
/// [`MatcherError::InvalidDocument`] when the text is not valid JSON.
pub fn parse(text: &str) -> Result<Value, MatcherError> {
    let parsed: serde_json::Value =
        serde_json::from_str(text).map_err(|e| MatcherError::InvalidDocument {
            format: "json",
            source: e.to_string(),
        })?;
    Ok(convert(parsed))
}

fn convert(value: serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else {
                // u64 beyond i64::MAX or a fractional value.
                Value::Double(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => {
            Value::Sequence(items.into_iter().map(convert).collect())
        }
        serde_json::Value::Object(entries) => {
            Value::Map(entries.into_iter().map(|(k, v)| (k, convert(v))).collect())
        }
    }
}

/// Render a [`Value`] tree as a `serde_json::Value`.
///
/// Used by consumers that pretty-print trees for diff output; XML-parsed
/// trees render through the same JSON shape.
#[must_use]
pub fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Integer(i) => serde_json::Value::from(*i),
        Value::Double(d) => serde_json::Value::from(*d),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Sequence(items) => {
            serde_json::Value::Array(items.iter().map(to_json).collect())
        }
        Value::Map(entries) => serde_json::Value::Object(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), to_json(v)))
                .collect(),
        ),
    }
}

/// Pretty-printed canonical rendering of a tree.
#[must_use]
pub fn to_pretty_string(value: &Value) -> String {
    serde_json::to_string_pretty(&to_json(value)).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalars() {
        assert_eq!(parse("null").unwrap(), Value::Null);
        assert_eq!(parse("true").unwrap(), Value::Bool(true));
        assert_eq!(parse("5").unwrap(), Value::Integer(5));
        assert_eq!(parse(r#""x""#).unwrap(), Value::String("x".into()));
    }

    #[test]
    fn test_number_representation_is_preserved() {
        assert_eq!(parse("5").unwrap(), Value::Integer(5));
        assert_eq!(parse("5.0").unwrap(), Value::Double(5.0));
        assert_eq!(parse("-3").unwrap(), Value::Integer(-3));
        assert_eq!(parse("1e2").unwrap(), Value::Double(100.0));
    }

    #[test]
    fn test_collections_preserve_order() {
        let v = parse(r#"{"b": [1, 2], "a": null}"#).unwrap();
        assert_eq!(
            v,
            Value::Map(vec![
                (
                    "b".to_string(),
                    Value::Sequence(vec![Value::Integer(1), Value::Integer(2)])
                ),
                ("a".to_string(), Value::Null),
            ])
        );
    }

    #[test]
    fn test_invalid_document() {
        assert!(matches!(
            parse("{not json"),
            Err(MatcherError::InvalidDocument { format: "json", .. })
        ));
    }

    #[test]
    fn test_round_trip_through_serde_json() {
        let v = parse(r#"{"a": [1, 2.5, "x", null, true]}"#).unwrap();
        let back = to_json(&v);
        assert_eq!(back, serde_json::json!({"a": [1, 2.5, "x", null, true]}));
    }
}
