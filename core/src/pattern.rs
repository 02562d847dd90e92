//! Pattern grammar — lexing an expected-tree leaf into a `PatternToken`.
//!
//! A string leaf of the expected tree is either a literal, a typed
//! placeholder (`@integer@`, `@expr(value > 10)@`), the wildcard (`@*@` /
//! `@wildcard@`), the sequence rest-wildcard (`@...@`), or an alternation
//! of those joined by ` or `.
//!
//! Tokens are produced lazily, once per leaf, during matching; they are
//! never persisted beyond a single match call.
//!
//! # Escaping
//!
//! A doubled sentinel `@@` is unescaped to a literal `@`, so the leaf
//! `@@string@@` matches the literal text `@string@`. A leaf that is
//! sentinel-wrapped but does not lex as a placeholder is a parse error,
//! never a silent literal.

use crate::{MatcherError, Value};
use once_cell::sync::Lazy;
use regex::Regex;

/// The placeholder delimiter.
pub const SENTINEL: char = '@';

/// Separator between alternation branches, matched outside placeholders.
pub const ALTERNATION_SEPARATOR: &str = " or ";

/// The sequence rest-wildcard: absorbs any trailing elements.
pub const REST_TOKEN: &str = "@...@";

/// `@type@` or `@type(content)@`, anchored over the whole leaf.
static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^@(\*|[a-z]+)(?:\((.*)\))?@$").expect("placeholder pattern is valid")
});

/// The recognized placeholder type names.
///
/// One scalar matcher exists per tag; dispatch precedence over these tags
/// lives in [`crate::SCALAR_PRECEDENCE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    /// `@string@`
    String,
    /// `@integer@` — whole numbers only, `5.0` is rejected.
    Integer,
    /// `@double@` — fractional representation only.
    Double,
    /// `@number@` — integer or double.
    Number,
    /// `@boolean@`
    Boolean,
    /// `@null@`
    Null,
    /// `@scalar@` — any non-collection, non-null value.
    Scalar,
    /// `@wildcard@` / `@*@` — matches anything.
    Wildcard,
    /// `@expr(...)@` — narrow boolean expression over the actual value.
    Expression,
    /// `@callback(name)@` — caller-registered predicate.
    Callback,
}

impl TypeTag {
    /// Every recognized type name, in declaration order.
    ///
    /// Listed in "unknown type" errors so a typo fixes itself.
    pub const NAMES: &'static [&'static str] = &[
        "string", "integer", "double", "number", "boolean", "null", "scalar", "wildcard", "expr",
        "callback",
    ];

    /// The placeholder name for this tag, without sentinels.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Double => "double",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
            Self::Scalar => "scalar",
            Self::Wildcard => "wildcard",
            Self::Expression => "expr",
            Self::Callback => "callback",
        }
    }

    /// Look up a tag by placeholder name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "integer" => Some(Self::Integer),
            "double" => Some(Self::Double),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            "null" => Some(Self::Null),
            "scalar" => Some(Self::Scalar),
            "wildcard" => Some(Self::Wildcard),
            "expr" => Some(Self::Expression),
            "callback" => Some(Self::Callback),
            _ => None,
        }
    }
}

/// A lexed expected-tree leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternToken {
    /// Plain value; matched by exact structural equality.
    Literal(Value),
    /// Typed placeholder. `expr` holds the parenthesized content for
    /// `Expression` and `Callback` tags.
    Placeholder {
        /// The placeholder's type.
        tag: TypeTag,
        /// Parenthesized content, when the tag takes one.
        expr: Option<String>,
    },
    /// `@...@` — only valid as the last element of a sequence pattern.
    Rest,
    /// Branches joined by ` or `; any branch matching is a match.
    Alternatives(Vec<PatternToken>),
}

impl PatternToken {
    /// Returns `true` for the match-anything wildcard placeholder.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        matches!(
            self,
            Self::Placeholder {
                tag: TypeTag::Wildcard,
                ..
            }
        )
    }
}

/// Lex a raw expected-leaf string into a token.
///
/// # Errors
///
/// Returns [`MatcherError::Pattern`] for malformed placeholder syntax and
/// [`MatcherError::UnknownType`] for an unrecognized type name. Malformed
/// placeholders are never coerced to literals.
///
/// # Example
///
/// ```
/// use fixmatch::pattern::{lex, PatternToken, TypeTag};
///
/// let token = lex("@integer@").unwrap();
/// assert_eq!(
///     token,
///     PatternToken::Placeholder { tag: TypeTag::Integer, expr: None }
/// );
///
/// assert!(lex("@unknown@").is_err());
/// ```
pub fn lex(leaf: &str) -> Result<PatternToken, MatcherError> {
    let parts = split_alternatives(leaf);
    if parts.len() > 1 {
        let branches = parts
            .into_iter()
            .map(lex_single)
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(PatternToken::Alternatives(branches));
    }
    lex_single(leaf)
}

fn lex_single(text: &str) -> Result<PatternToken, MatcherError> {
    if text == REST_TOKEN {
        return Ok(PatternToken::Rest);
    }
    if looks_like_placeholder(text) {
        return lex_placeholder(text);
    }
    Ok(PatternToken::Literal(Value::String(unescape(text))))
}

/// Sentinel-wrapped and not opening with the `@@` escape.
fn looks_like_placeholder(text: &str) -> bool {
    text.len() >= 3
        && text.starts_with(SENTINEL)
        && !text.starts_with("@@")
        && text.ends_with(SENTINEL)
}

fn lex_placeholder(text: &str) -> Result<PatternToken, MatcherError> {
    let caps = PLACEHOLDER_RE
        .captures(text)
        .ok_or_else(|| MatcherError::Pattern {
            pattern: text.to_string(),
            reason: "malformed placeholder, expected @type@ or @type(content)@".to_string(),
        })?;
    let name = &caps[1];
    let content = caps.get(2).map(|m| m.as_str());

    let tag = if name == "*" {
        TypeTag::Wildcard
    } else {
        TypeTag::from_name(name).ok_or_else(|| MatcherError::UnknownType {
            name: name.to_string(),
        })?
    };

    match tag {
        TypeTag::Expression | TypeTag::Callback => {
            let content = content
                .filter(|c| !c.is_empty())
                .ok_or_else(|| MatcherError::Pattern {
                    pattern: text.to_string(),
                    reason: format!("@{}(...)@ requires an argument", tag.name()),
                })?;
            Ok(PatternToken::Placeholder {
                tag,
                expr: Some(content.to_string()),
            })
        }
        _ => {
            if content.is_some() {
                return Err(MatcherError::Pattern {
                    pattern: text.to_string(),
                    reason: format!("@{}@ takes no argument", tag.name()),
                });
            }
            Ok(PatternToken::Placeholder { tag, expr: None })
        }
    }
}

fn unescape(text: &str) -> String {
    text.replace("@@", "@")
}

/// Split a leaf on ` or ` occurrences outside placeholder delimiters.
///
/// Tracks sentinel pairs and parenthesis depth so the separator inside
/// `@expr(value == 'a or b')@` does not split the leaf.
fn split_alternatives(leaf: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_placeholder = false;
    let mut depth = 0usize;
    let mut iter = leaf.char_indices().peekable();

    while let Some((i, c)) = iter.next() {
        if in_placeholder {
            match c {
                '(' => depth += 1,
                ')' => depth = depth.saturating_sub(1),
                '@' if depth == 0 => in_placeholder = false,
                _ => {}
            }
        } else if c == SENTINEL {
            if iter.peek().map(|&(_, next)| next) == Some(SENTINEL) {
                // escaped sentinel, stays literal
                iter.next();
            } else {
                in_placeholder = true;
            }
        } else if leaf[i..].starts_with(ALTERNATION_SEPARATOR) {
            parts.push(&leaf[start..i]);
            start = i + ALTERNATION_SEPARATOR.len();
            // the separator is ASCII, one char_indices step per byte
            for _ in 0..ALTERNATION_SEPARATOR.len() - 1 {
                iter.next();
            }
        }
    }

    parts.push(&leaf[start..]);
    parts
}
