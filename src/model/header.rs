//! Header fields and the per-message header collection.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use super::field::StructuredField;
use crate::parser::header::canonical_name;

/// One header field: canonical name, raw value, and its `;`-separated parameters.
///
/// `Content-Type: text/plain; charset="utf-8"` gives
/// `value_without_parameters == "text/plain"` and `parameters["charset"] == "utf-8"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub(crate) name: String,
    pub(crate) value: StructuredField,
    pub(crate) value_without_parameters: StructuredField,
    pub(crate) parameters: IndexMap<String, StructuredField>,
    /// Absolute 1-based line the header started on.
    pub(crate) line: usize,
}

impl Header {
    /// Canonical header name, e.g. `Content-Type`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The whole value including parameters, unfolded and trimmed.
    pub fn value(&self) -> &StructuredField {
        &self.value
    }

    /// The value up to the first `;`.
    pub fn value_without_parameters(&self) -> &StructuredField {
        &self.value_without_parameters
    }

    /// All parameters in the order they were written.
    pub fn parameters(&self) -> &IndexMap<String, StructuredField> {
        &self.parameters
    }

    /// Look up a parameter by exact name, then ASCII case-insensitively.
    pub fn parameter(&self, name: &str) -> Option<&StructuredField> {
        self.parameters.get(name).or_else(|| {
            self.parameters
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v)
        })
    }

    pub fn line(&self) -> usize {
        self.line
    }
}

/// `CanonicalName: value\r\n`
impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}\r\n", self.name, self.value)
    }
}

/// Headers keyed by canonical name, in first-seen order.
///
/// Inserting a name that is already present replaces the stored header but
/// keeps its position, so the later occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Headers {
    map: IndexMap<String, Header>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, header: Header) {
        if let Some(previous) = self.map.insert(header.name.clone(), header) {
            debug!(
                name = %previous.name,
                line = previous.line,
                "Header replaced by later occurrence"
            );
        }
    }

    /// Look up a header; `name` is canonicalized first, so any casing works.
    pub fn get(&self, name: &str) -> Option<&Header> {
        self.map
            .get(name)
            .or_else(|| self.map.get(&canonical_name(name)))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Header> {
        self.map.values()
    }

    /// The declared `Content-Type` value without parameters, if any.
    pub fn content_type(&self) -> Option<&str> {
        self.get("Content-Type")
            .map(|h| h.value_without_parameters().value())
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = &'a Header;
    type IntoIter = indexmap::map::Values<'a, String, Header>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.values()
    }
}

impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for header in self {
            write!(f, "{header}")?;
        }
        Ok(())
    }
}
