//! Media-type descriptors looked up by declared `Content-Type`.
//!
//! The parser never consults this; it is used when a caller asks a parsed
//! message what kind of content it declares.

use serde::{Deserialize, Serialize};

/// Descriptive metadata for one media type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaType {
    /// Canonical `type/subtype` name.
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Usual file extensions, without the dot.
    #[serde(default)]
    pub extensions: Vec<String>,
    /// Whether the content is binary rather than text.
    #[serde(default)]
    pub binary: bool,
}

impl MediaType {
    pub fn new(name: &str, description: &str, extensions: &[&str], binary: bool) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
            binary,
        }
    }

    /// The primary type, e.g. `text` for `text/plain`.
    pub fn top_level(&self) -> &str {
        self.name.split('/').next().unwrap_or(&self.name)
    }
}

/// Name → descriptor lookup.
pub trait TypeRegistry {
    /// First descriptor whose name matches `name` (ASCII case-insensitive).
    fn lookup(&self, name: &str) -> Option<&MediaType>;

    /// The descriptor used when nothing is declared or nothing matches.
    fn fallback(&self) -> &MediaType;

    fn resolve(&self, name: Option<&str>) -> &MediaType {
        name.and_then(|n| self.lookup(n))
            .unwrap_or_else(|| self.fallback())
    }
}

/// `(name, description, extensions, binary)`
const BUILTIN_TYPES: &[(&str, &str, &[&str], bool)] = &[
    ("text/plain", "Plain text", &["txt", "text"], false),
    ("text/html", "HTML document", &["html", "htm"], false),
    ("text/enriched", "Enriched text", &[], false),
    ("text/csv", "Comma-separated values", &["csv"], false),
    ("text/calendar", "iCalendar data", &["ics"], false),
    ("text/rfc822-headers", "Message headers", &[], false),
    ("message/rfc822", "Encapsulated message", &["eml"], false),
    ("message/delivery-status", "Delivery status notification", &[], false),
    ("multipart/mixed", "Mixed multipart", &[], false),
    ("multipart/alternative", "Alternative representations", &[], false),
    ("multipart/related", "Related parts", &[], false),
    ("multipart/digest", "Message digest", &[], false),
    ("multipart/signed", "Signed content", &[], false),
    ("multipart/report", "Mail system report", &[], false),
    ("application/octet-stream", "Arbitrary binary data", &["bin"], true),
    ("application/pdf", "PDF document", &["pdf"], true),
    ("application/zip", "ZIP archive", &["zip"], true),
    ("application/json", "JSON document", &["json"], false),
    ("application/pgp-signature", "PGP signature", &["sig", "asc"], false),
    ("image/png", "PNG image", &["png"], true),
    ("image/jpeg", "JPEG image", &["jpg", "jpeg"], true),
    ("image/gif", "GIF image", &["gif"], true),
];

/// Built-in table of common mail media types, optionally extended.
#[derive(Debug, Clone)]
pub struct MediaTypeRegistry {
    types: Vec<MediaType>,
    fallback: MediaType,
}

impl MediaTypeRegistry {
    /// The built-in table only.
    pub fn builtin() -> Self {
        let types = BUILTIN_TYPES
            .iter()
            .map(|(name, description, extensions, binary)| {
                MediaType::new(name, description, extensions, *binary)
            })
            .collect();
        Self {
            types,
            fallback: MediaType::new("text/plain", "Plain text", &["txt", "text"], false),
        }
    }

    /// The built-in table with `extra` consulted first.
    pub fn with_extra(extra: impl IntoIterator<Item = MediaType>) -> Self {
        let mut registry = Self::builtin();
        let mut types: Vec<MediaType> = extra.into_iter().collect();
        types.append(&mut registry.types);
        registry.types = types;
        registry
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for MediaTypeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TypeRegistry for MediaTypeRegistry {
    fn lookup(&self, name: &str) -> Option<&MediaType> {
        self.types
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    fn fallback(&self) -> &MediaType {
        &self.fallback
    }
}
