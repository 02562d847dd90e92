//! XML adapter — `roxmltree` documents to the generic [`Value`] tree.
//!
//! Canonicalization happens during conversion: whitespace-only text nodes
//! are stripped and remaining text is trimmed, so formatting differences
//! (`<a>\n  <b/>\n</a>` vs `<a><b/></a>`) never cause false mismatches.
//!
//! # Mapping
//!
//! - A text-only element becomes its trimmed text as a `String` (an empty
//!   element becomes `""`). Text stays a string; there is no numeric
//!   casting, so XML fixtures assert content with `@string@`, literals,
//!   or expressions.
//! - Attributes land under an `"@attributes"` keyed sub-map.
//! - Child elements become map entries keyed by element name, in document
//!   order of first appearance; repeated same-name siblings collapse into
//!   a `Sequence`, which is what makes element order significant and lets
//!   the `@...@` rest-wildcard work on repeated elements.
//! - Mixed content keeps its trimmed text under a `"#text"` entry.

use crate::{MatcherError, Value};

/// Reserved map key holding an element's attributes.
pub const ATTRIBUTES_KEY: &str = "@attributes";

/// Reserved map key holding trimmed text of a mixed-content element.
pub const TEXT_KEY: &str = "#text";

/// Parse XML text into a canonicalized [`Value`] tree rooted at the
/// document element.
///
/// # Errors
///
/// [`MatcherError::InvalidDocument`] when the text is not well-formed XML.
pub fn parse(text: &str) -> Result<Value, MatcherError> {
    let doc = roxmltree::Document::parse(text).map_err(|e| MatcherError::InvalidDocument {
        format: "xml",
        source: e.to_string(),
    })?;
    Ok(convert_element(doc.root_element()))
}

fn convert_element(node: roxmltree::Node<'_, '_>) -> Value {
    let attributes: Vec<(String, Value)> = node
        .attributes()
        .map(|a| (a.name().to_string(), Value::String(a.value().to_string())))
        .collect();

    let children: Vec<roxmltree::Node<'_, '_>> =
        node.children().filter(roxmltree::Node::is_element).collect();

    let text: String = node
        .children()
        .filter(roxmltree::Node::is_text)
        .filter_map(|c| c.text())
        .collect::<String>()
        .trim()
        .to_string();

    if attributes.is_empty() && children.is_empty() {
        return Value::String(text);
    }

    let mut entries: Vec<(String, Value)> = Vec::new();
    if !attributes.is_empty() {
        entries.push((ATTRIBUTES_KEY.to_string(), Value::Map(attributes)));
    }

    // Group same-name siblings, keeping first-appearance order.
    let mut grouped: Vec<(String, Vec<Value>)> = Vec::new();
    for child in children {
        let name = child.tag_name().name().to_string();
        let value = convert_element(child);
        match grouped.iter_mut().find(|(n, _)| *n == name) {
            Some((_, values)) => values.push(value),
            None => grouped.push((name, vec![value])),
        }
    }
    for (name, mut values) in grouped {
        let value = if values.len() == 1 {
            values.remove(0)
        } else {
            Value::Sequence(values)
        };
        entries.push((name, value));
    }

    if !text.is_empty() {
        entries.push((TEXT_KEY.to_string(), Value::String(text)));
    }

    Value::Map(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_only_element() {
        assert_eq!(parse("<a>hello</a>").unwrap(), Value::String("hello".into()));
        assert_eq!(parse("<a/>").unwrap(), Value::String(String::new()));
    }

    #[test]
    fn test_whitespace_canonicalization() {
        // Pretty-printed and compact forms canonicalize identically.
        assert_eq!(
            parse("<a>\n  <b/>\n</a>").unwrap(),
            parse("<a><b/></a>").unwrap()
        );
        assert_eq!(parse("<a>  hi  </a>").unwrap(), Value::String("hi".into()));
    }

    #[test]
    fn test_attributes_sub_map() {
        assert_eq!(
            parse(r#"<a id="7">x</a>"#).unwrap(),
            Value::Map(vec![
                (
                    ATTRIBUTES_KEY.to_string(),
                    Value::Map(vec![("id".to_string(), Value::String("7".into()))])
                ),
                (TEXT_KEY.to_string(), Value::String("x".into())),
            ])
        );
    }

    #[test]
    fn test_child_elements_become_map_entries() {
        assert_eq!(
            parse("<user><id>7</id><name>Ada</name></user>").unwrap(),
            Value::Map(vec![
                ("id".to_string(), Value::String("7".into())),
                ("name".to_string(), Value::String("Ada".into())),
            ])
        );
    }

    #[test]
    fn test_repeated_siblings_become_sequence() {
        assert_eq!(
            parse("<tags><tag>a</tag><tag>b</tag></tags>").unwrap(),
            Value::Map(vec![(
                "tag".to_string(),
                Value::Sequence(vec![
                    Value::String("a".into()),
                    Value::String("b".into()),
                ])
            )])
        );
    }

    #[test]
    fn test_invalid_document() {
        assert!(matches!(
            parse("<a><b></a>"),
            Err(MatcherError::InvalidDocument { format: "xml", .. })
        ));
    }

    #[test]
    fn test_placeholders_flow_through_text() {
        // An expected XML fixture carries placeholders as element text.
        assert_eq!(
            parse("<id>@string@</id>").unwrap(),
            Value::String("@string@".into())
        );
    }
}
