//! fixmatch — structural pattern matching for API response fixtures
//!
//! Asserts JSON/XML responses against expected fixtures that contain typed
//! placeholders, wildcards, and small expressions, so tests can say "this
//! field is an integer" without hard-coding volatile values.
//!
//! # Architecture
//!
//! Two parallel trees are walked depth-first:
//!
//! - [`Value`] — the generic tree both format adapters produce
//! - [`pattern`] — lexes an expected leaf into a [`PatternToken`]
//! - Scalar matchers — one per [`TypeTag`], dispatched by the explicit
//!   [`SCALAR_PRECEDENCE`] table (first applicable wins)
//! - Or-matcher — alternation (` or `), tried before single-value matching
//! - Collection matcher — keyed maps (partial by default) and positional
//!   sequences with the `@...@` rest-wildcard
//! - [`Engine`] — the dispatcher tying it together
//! - [`Format`] adapters — JSON (`serde_json`) and XML (`roxmltree`, with
//!   whitespace canonicalization)
//!
//! # Key Design Points
//!
//! 1. **Closed value union**: actual values are an explicit tagged union,
//!    so every matcher's type check is an exhaustive `match`.
//!
//! 2. **Precedence as a constant**: dispatch order is a named, test-covered
//!    table, not an artifact of construction order — `@integer@` is tried
//!    before `@number@`.
//!
//! 3. **Mismatch is a value**: only malformed patterns and misconfiguration
//!    are errors; a failed comparison is an [`MatchOutcome::Failure`]
//!    carrying the divergence [`Path`].
//!
//! # Example
//!
//! ```
//! use fixmatch::{Engine, Format};
//!
//! let engine = Engine::new();
//!
//! let outcome = engine
//!     .match_text(
//!         Format::Json,
//!         r#"{"id": 42, "name": "Alice"}"#,
//!         r#"{"id": "@integer@", "name": "@string@"}"#,
//!     )
//!     .unwrap();
//! assert!(outcome.is_success());
//!
//! let outcome = engine
//!     .match_text(Format::Json, r#"{"id": "oops"}"#, r#"{"id": "@integer@"}"#)
//!     .unwrap();
//! let mismatch = outcome.failure().unwrap();
//! assert_eq!(mismatch.path.to_string(), "id");
//! ```

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod adapter;
mod callback;
mod collection;
mod engine;
mod expression;
mod path;
pub mod pattern;
mod scalar;
mod value;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

pub use adapter::{json, xml, Format};
pub use callback::{CallbackFn, CallbackRegistry};
pub use engine::{Engine, EngineBuilder, MatchOptions, MatchOutcome, Mismatch};
pub use path::{Path, Segment};
pub use pattern::{PatternToken, TypeTag};
pub use scalar::SCALAR_PRECEDENCE;
pub use value::Value;

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use fixmatch::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        CallbackRegistry,
        Engine,
        EngineBuilder,
        Format,
        MatchOptions,
        MatchOutcome,
        MatcherError,
        Mismatch,
        Path,
        PatternToken,
        TypeTag,
        Value,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Fatal errors: malformed patterns, malformed documents, misconfiguration.
///
/// These are never retried and never silently coerced into literal
/// matching. A structural mismatch is NOT an error — see
/// [`MatchOutcome::Failure`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatcherError {
    /// Malformed placeholder syntax (unbalanced delimiters, misplaced rest
    /// wildcard, missing required argument).
    Pattern {
        /// The offending leaf or token text.
        pattern: String,
        /// What is wrong with it.
        reason: String,
    },
    /// A sentinel-wrapped leaf names a type that does not exist.
    UnknownType {
        /// The unrecognized type name.
        name: String,
    },
    /// `@callback(name)@` names an unregistered predicate.
    UnknownCallback {
        /// The unregistered name.
        name: String,
        /// Names that ARE registered (for self-correcting error messages).
        available: Vec<String>,
    },
    /// A format name other than `json` / `xml` was requested.
    UnsupportedFormat {
        /// The requested format name.
        name: String,
    },
    /// The actual or expected buffer is not a well-formed document.
    InvalidDocument {
        /// Which adapter rejected it (`"json"` or `"xml"`).
        format: &'static str,
        /// The underlying parser message.
        source: String,
    },
}

impl std::fmt::Display for MatcherError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pattern { pattern, reason } => {
                write!(f, "invalid pattern {pattern:?}: {reason}")
            }
            Self::UnknownType { name } => {
                write!(
                    f,
                    "unknown placeholder type \"@{name}@\" — recognized: {}",
                    TypeTag::NAMES.join(", ")
                )
            }
            Self::UnknownCallback { name, available } => {
                write!(f, "unknown callback {name:?}")?;
                if available.is_empty() {
                    write!(f, " — no callbacks are registered")
                } else {
                    write!(f, " — registered: {}", available.join(", "))
                }
            }
            Self::UnsupportedFormat { name } => {
                write!(f, "unsupported format {name:?} — supported: json, xml")
            }
            Self::InvalidDocument { format, source } => {
                write!(f, "invalid {format} document: {source}")
            }
        }
    }
}

impl std::error::Error for MatcherError {}
