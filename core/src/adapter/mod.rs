//! Format adapters — parse raw text into the generic [`Value`] tree.
//!
//! Adapters run before the engine and do all the I/O-free "plumbing":
//! JSON parsing via `serde_json`, XML parsing and whitespace
//! canonicalization via `roxmltree`. The engine itself never sees bytes.

use crate::{MatcherError, Value};
use std::str::FromStr;

pub mod json;
pub mod xml;

/// Declared document format for both the actual and expected buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Format {
    /// JSON documents. Object key order is not semantically compared.
    Json,
    /// XML documents. Whitespace-only text is stripped before comparison;
    /// repeated sibling elements keep sequence semantics.
    Xml,
}

impl Format {
    /// The lowercase format name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }

    /// Parse a document with this format's adapter.
    ///
    /// # Errors
    ///
    /// [`MatcherError::InvalidDocument`] when the text is not well-formed.
    pub fn parse(self, text: &str) -> Result<Value, MatcherError> {
        match self {
            Self::Json => json::parse(text),
            Self::Xml => xml::parse(text),
        }
    }
}

/// `"json"` / `"xml"`, case-insensitive. Anything else is a
/// configuration error listing the supported formats.
impl FromStr for Format {
    type Err = MatcherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "xml" => Ok(Self::Xml),
            _ => Err(MatcherError::UnsupportedFormat {
                name: s.to_string(),
            }),
        }
    }
}
