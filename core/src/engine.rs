//! `Engine` — depth-first walk of the actual and expected trees.
//!
//! The engine is the dispatcher: for every expected node it selects the
//! applicable matcher (alternation first, then the scalar chain by
//! precedence, literals as the fallback, collections by recursion) and
//! aggregates the first failure outward without loss.
//!
//! The engine holds no mutable state; it is `Send + Sync` and safely
//! reentrant across concurrent test executions.

use crate::callback::CallbackRegistry;
use crate::pattern::{self, PatternToken, REST_TOKEN};
use crate::scalar::{self, SCALAR_PRECEDENCE};
use crate::{Format, MatcherError, Path, Value};

/// Result of one match call: success, or the first divergence found.
///
/// A mismatch is a normal value, never an error — [`MatcherError`] is
/// reserved for malformed patterns and misconfiguration.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    /// The actual tree satisfies the expected pattern.
    Success,
    /// First point of divergence found during the depth-first walk.
    Failure(Mismatch),
}

impl MatchOutcome {
    /// Returns `true` on success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// The mismatch, if any.
    #[must_use]
    pub fn failure(&self) -> Option<&Mismatch> {
        match self {
            Self::Success => None,
            Self::Failure(mismatch) => Some(mismatch),
        }
    }

    pub(crate) fn fail(path: Path, message: impl Into<String>) -> Self {
        Self::Failure(Mismatch {
            path,
            message: message.into(),
        })
    }
}

/// A structural/type/value mismatch, located by divergence path.
#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
    /// Keys/indices from the tree root to the divergence.
    pub path: Path,
    /// Human-readable reason.
    pub message: String,
}

impl std::fmt::Display for Mismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "mismatch at {}: {}", self.path, self.message)
    }
}

/// Tunable matching behavior.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MatchOptions {
    /// When `true`, keys present in the actual map but absent from the
    /// expected map are mismatches. Default is `false`: partial matching,
    /// the fixture-testing convention.
    pub exact_keys: bool,
}

/// The structural pattern-matching engine.
///
/// Construct once (optionally via [`Engine::builder`] to register
/// callbacks or enable strict key matching), then invoke from any number
/// of tests.
///
/// # Example
///
/// ```
/// use fixmatch::{Engine, Format};
///
/// let engine = Engine::new();
/// let outcome = engine
///     .match_text(
///         Format::Json,
///         r#"{"id": 42, "name": "Alice", "tags": ["x", "y", "z"]}"#,
///         r#"{"id": "@integer@", "name": "Alice", "tags": ["@string@", "@...@"]}"#,
///     )
///     .unwrap();
/// assert!(outcome.is_success());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Engine {
    pub(crate) options: MatchOptions,
    pub(crate) callbacks: CallbackRegistry,
}

/// Builder for [`Engine`].
///
/// # Example
///
/// ```
/// use fixmatch::{Engine, Value};
///
/// let engine = Engine::builder()
///     .exact_keys(true)
///     .callback("positive", |v: &Value| v.as_integer().is_some_and(|i| i > 0))
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct EngineBuilder {
    options: MatchOptions,
    callbacks: CallbackRegistry,
}

impl EngineBuilder {
    /// Start from default options and an empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject actual map keys that the expected map does not mention.
    #[must_use]
    pub fn exact_keys(mut self, exact: bool) -> Self {
        self.options.exact_keys = exact;
        self
    }

    /// Register a predicate for `@callback(name)@`.
    #[must_use]
    pub fn callback(
        mut self,
        name: impl Into<String>,
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.callbacks.register(name, predicate);
        self
    }

    /// Replace the options wholesale.
    #[must_use]
    pub fn options(mut self, options: MatchOptions) -> Self {
        self.options = options;
        self
    }

    /// Finish construction.
    #[must_use]
    pub fn build(self) -> Engine {
        Engine {
            options: self.options,
            callbacks: self.callbacks,
        }
    }
}

impl Engine {
    /// An engine with default options and no callbacks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder with callbacks and options.
    #[must_use]
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// The active options.
    #[must_use]
    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    /// Parse both texts with the format's adapter, then match.
    ///
    /// # Errors
    ///
    /// Document parse failures, malformed placeholders, and unregistered
    /// callbacks are fatal; a mismatch is an `Ok(Failure(_))` value.
    pub fn match_text(
        &self,
        format: Format,
        actual: &str,
        expected: &str,
    ) -> Result<MatchOutcome, MatcherError> {
        let actual = format.parse(actual)?;
        let expected = format.parse(expected)?;
        self.match_values(&actual, &expected)
    }

    /// Match two already-parsed trees.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`Engine::match_text`], minus document parsing.
    pub fn match_values(
        &self,
        actual: &Value,
        expected: &Value,
    ) -> Result<MatchOutcome, MatcherError> {
        self.match_at(actual, expected, &Path::root())
    }

    /// Dispatch on the expected node's shape.
    pub(crate) fn match_at(
        &self,
        actual: &Value,
        expected: &Value,
        path: &Path,
    ) -> Result<MatchOutcome, MatcherError> {
        match expected {
            Value::String(leaf) => {
                let token = pattern::lex(leaf)?;
                self.match_token(actual, &token, path)
            }
            Value::Sequence(elements) => self.match_sequence(actual, elements, path),
            Value::Map(entries) => self.match_map(actual, entries, path),
            literal => Ok(literal_eq(actual, literal, path)),
        }
    }

    /// Dispatch a lexed token: alternation first, then the scalar chain in
    /// [`SCALAR_PRECEDENCE`] order, literals as the equality fallback.
    pub(crate) fn match_token(
        &self,
        actual: &Value,
        token: &PatternToken,
        path: &Path,
    ) -> Result<MatchOutcome, MatcherError> {
        match token {
            PatternToken::Alternatives(branches) => self.match_alternatives(actual, branches, path),
            PatternToken::Literal(literal) => Ok(literal_eq(actual, literal, path)),
            PatternToken::Rest => Err(MatcherError::Pattern {
                pattern: REST_TOKEN.to_string(),
                reason: "rest wildcard is only valid as the last element of a sequence"
                    .to_string(),
            }),
            PatternToken::Placeholder { expr, .. } => {
                for &tag in SCALAR_PRECEDENCE {
                    if scalar::can_apply(tag, token) {
                        return Ok(
                            match scalar::apply(tag, actual, expr.as_deref(), &self.callbacks)? {
                                None => MatchOutcome::Success,
                                Some(message) => MatchOutcome::fail(path.clone(), message),
                            },
                        );
                    }
                }
                // Every TypeTag is in the table (covered by test); reaching
                // here means a token was built outside the lexer.
                Err(MatcherError::Pattern {
                    pattern: format!("{token:?}"),
                    reason: "placeholder tag has no matcher".to_string(),
                })
            }
        }
    }

    /// Left-to-right, first success wins. When every branch fails, the
    /// LAST branch's mismatch is reported (kept concise on purpose; see
    /// DESIGN.md for the compatibility note).
    fn match_alternatives(
        &self,
        actual: &Value,
        branches: &[PatternToken],
        path: &Path,
    ) -> Result<MatchOutcome, MatcherError> {
        let mut last: Option<Mismatch> = None;
        for branch in branches {
            match self.match_token(actual, branch, path)? {
                MatchOutcome::Success => return Ok(MatchOutcome::Success),
                MatchOutcome::Failure(mismatch) => last = Some(mismatch),
            }
        }
        Ok(match last {
            Some(mismatch) => MatchOutcome::Failure(mismatch),
            // The lexer never produces an empty alternation.
            None => MatchOutcome::fail(path.clone(), "empty alternation"),
        })
    }

    /// Walk an expected tree and surface every problem matching would hit:
    /// malformed placeholders, unregistered callbacks, misplaced rest
    /// wildcards.
    ///
    /// This is config-time validation — run it once over a fixture before
    /// pointing tests at it.
    ///
    /// # Errors
    ///
    /// The first [`MatcherError`] found, depth-first.
    pub fn validate_pattern(&self, expected: &Value) -> Result<(), MatcherError> {
        match expected {
            Value::String(leaf) => {
                let token = pattern::lex(leaf)?;
                if token == PatternToken::Rest {
                    return Err(MatcherError::Pattern {
                        pattern: REST_TOKEN.to_string(),
                        reason: "rest wildcard is only valid as the last element of a sequence"
                            .to_string(),
                    });
                }
                self.validate_token(&token)
            }
            Value::Sequence(elements) => {
                for (i, element) in elements.iter().enumerate() {
                    if let Value::String(leaf) = element {
                        let token = pattern::lex(leaf)?;
                        if token == PatternToken::Rest {
                            if i == elements.len() - 1 {
                                continue;
                            }
                            return Err(MatcherError::Pattern {
                                pattern: REST_TOKEN.to_string(),
                                reason:
                                    "rest wildcard is only valid as the last element of a sequence"
                                        .to_string(),
                            });
                        }
                        self.validate_token(&token)?;
                    } else {
                        self.validate_pattern(element)?;
                    }
                }
                Ok(())
            }
            Value::Map(entries) => {
                for (_, value) in entries {
                    self.validate_pattern(value)?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn validate_token(&self, token: &PatternToken) -> Result<(), MatcherError> {
        match token {
            PatternToken::Placeholder {
                tag: crate::pattern::TypeTag::Callback,
                expr: Some(name),
            } => {
                if self.callbacks.get(name).is_none() {
                    return Err(MatcherError::UnknownCallback {
                        name: name.clone(),
                        available: self.callbacks.names(),
                    });
                }
                Ok(())
            }
            PatternToken::Alternatives(branches) => {
                for branch in branches {
                    self.validate_token(branch)?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

/// Exact structural equality: type and value both equal, no tolerance.
fn literal_eq(actual: &Value, literal: &Value, path: &Path) -> MatchOutcome {
    if actual == literal {
        MatchOutcome::Success
    } else {
        MatchOutcome::fail(path.clone(), format!("expected {literal}, got {actual}"))
    }
}
