//! `Value` — the generic tree both adapters produce and the engine consumes.
//!
//! Actual responses and expected fixtures are parsed into the same closed
//! tagged union, so every type check in the matchers is an exhaustive
//! `match` instead of duck-typing on parsed documents.
//!
//! # Integer vs Double
//!
//! `Integer` and `Double` are distinct variants, split at parse time by the
//! document's own representation (`5` vs `5.0`). This is what lets
//! `@integer@` reject `5.0` even though the two are numerically equal.

use std::fmt;

/// A parsed JSON or XML document node.
///
/// # Invariants
///
/// - `Map` keys are unique within one node.
/// - `Map` insertion order is preserved for deterministic diagnostics, but
///   carries no matching semantics (JSON object key order is not compared).
/// - `Sequence` order is always significant.
///
/// # Example
///
/// ```
/// use fixmatch::Value;
///
/// let v = Value::Map(vec![("id".to_string(), Value::Integer(42))]);
/// assert_eq!(v.get("id"), Some(&Value::Integer(42)));
/// assert_eq!(v.get("name"), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// JSON `null` / absent content.
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Whole number, as written in the document (`5`, not `5.0`).
    Integer(i64),
    /// Fractional number, as written in the document (`5.0`).
    Double(f64),
    /// String scalar. Expected-tree strings are lexed into pattern tokens.
    String(String),
    /// Ordered collection. Compared positionally.
    Sequence(Vec<Value>),
    /// Keyed collection. Insertion-ordered, keys unique.
    Map(Vec<(String, Value)>),
}

impl Value {
    /// Returns `true` if this is the `Null` variant.
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` for non-collection, non-null values.
    ///
    /// This is exactly the set the `@scalar@` placeholder accepts.
    #[inline]
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Self::Bool(_) | Self::Integer(_) | Self::Double(_) | Self::String(_)
        )
    }

    /// Returns `true` if this is a `Sequence` or a `Map`.
    #[inline]
    #[must_use]
    pub fn is_collection(&self) -> bool {
        matches!(self, Self::Sequence(_) | Self::Map(_))
    }

    /// Try to get the value as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Try to get the value as a boolean.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get the value as an integer.
    #[inline]
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view: `Integer` and `Double` both widen to `f64`.
    ///
    /// Used by the expression evaluator, where `value > 10` should hold for
    /// both `11` and `11.5`.
    #[inline]
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Double(d) => Some(*d),
            _ => None,
        }
    }

    /// Map lookup by key. Returns `None` for non-map values.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Map(entries) => entries
                .iter()
                .find(|(k, _)| k.as_str() == key)
                .map(|(_, v)| v),
            _ => None,
        }
    }

    /// Returns a string describing the runtime type of this value.
    ///
    /// Used in mismatch messages (`expected integer, got string`).
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Double(_) => "double",
            Self::String(_) => "string",
            Self::Sequence(_) => "sequence",
            Self::Map(_) => "map",
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::Null
    }
}

/// Compact JSON-like rendering, used in mismatch messages.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Double(d) => write!(f, "{d:?}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Sequence(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Map(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k:?}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Self::Double(d)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::Sequence(items)
    }
}
