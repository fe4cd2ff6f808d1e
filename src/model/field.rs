//! Structured header field values.

use std::fmt;

use serde::Serialize;

use crate::parser::field::tokenize;

/// A header value kept both as written and in its tokenized form.
///
/// Comparisons and substring checks operate on the tokenized value, so
/// `charset="utf-8"` compares equal to `"utf-8"`. [`Display`](fmt::Display)
/// writes the raw text, which is what goes back on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuredField {
    raw: String,
    #[serde(rename = "value")]
    parsed: String,
}

impl StructuredField {
    /// Wrap raw field text, tokenizing it once.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let parsed = tokenize(&raw);
        Self { raw, parsed }
    }

    /// The text exactly as it appeared in the message (unfolded).
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The tokenized value: quotes removed, escapes resolved, whitespace canonicalized.
    pub fn value(&self) -> &str {
        &self.parsed
    }

    /// Whether the tokenized value contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.parsed.contains(needle)
    }

    /// ASCII case-insensitive comparison against the tokenized value.
    pub fn eq_ignore_ascii_case(&self, other: &str) -> bool {
        self.parsed.eq_ignore_ascii_case(other)
    }

    pub fn is_empty(&self) -> bool {
        self.parsed.is_empty()
    }
}

impl PartialEq<str> for StructuredField {
    fn eq(&self, other: &str) -> bool {
        self.parsed == other
    }
}

impl PartialEq<&str> for StructuredField {
    fn eq(&self, other: &&str) -> bool {
        self.parsed == *other
    }
}

impl fmt::Display for StructuredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
