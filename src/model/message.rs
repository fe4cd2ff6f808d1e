//! Parsed message tree and its wire rendering.

use std::fmt;

use serde::Serialize;

use super::header::{Header, Headers};
use crate::parser::lines::CRLF;
use crate::registry::{MediaType, TypeRegistry};

/// One message line, normally ending in CRLF.
///
/// The last line of a multipart body part may lack its CRLF: the line break
/// before a boundary delimiter belongs to the delimiter.
pub type Line = String;

/// A parsed message: either a terminal part or a multipart container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Message {
    Simple(SimpleMessage),
    Multipart(MultipartMessage),
}

/// Headers plus literal body lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimpleMessage {
    pub(crate) headers: Headers,
    pub(crate) body: Vec<Line>,
}

/// Headers plus the sub-messages found between boundary delimiters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MultipartMessage {
    pub(crate) headers: Headers,
    pub(crate) boundary: String,
    pub(crate) preamble: Vec<Line>,
    pub(crate) parts: Vec<Message>,
    pub(crate) epilogue: Vec<Line>,
}

impl SimpleMessage {
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn body(&self) -> &[Line] {
        &self.body
    }

    /// Resolve the declared `Content-Type` through `registry`.
    ///
    /// Falls back to the registry default (`text/plain`) when the header is
    /// missing or names an unknown type.
    pub fn content_type<'r>(&self, registry: &'r dyn TypeRegistry) -> &'r MediaType {
        registry.resolve(self.headers.content_type())
    }
}

impl MultipartMessage {
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// The unquoted `boundary` parameter of `Content-Type`.
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Lines before the first delimiter.
    pub fn preamble(&self) -> &[Line] {
        &self.preamble
    }

    pub fn parts(&self) -> &[Message] {
        &self.parts
    }

    /// Lines after the closing delimiter.
    pub fn epilogue(&self) -> &[Line] {
        &self.epilogue
    }
}

impl Message {
    pub fn headers(&self) -> &Headers {
        match self {
            Self::Simple(m) => &m.headers,
            Self::Multipart(m) => &m.headers,
        }
    }

    /// Look up a header by name in any casing.
    pub fn header(&self, name: &str) -> Option<&Header> {
        self.headers().get(name)
    }

    pub fn is_multipart(&self) -> bool {
        matches!(self, Self::Multipart(_))
    }

    pub fn as_simple(&self) -> Option<&SimpleMessage> {
        match self {
            Self::Simple(m) => Some(m),
            Self::Multipart(_) => None,
        }
    }

    pub fn as_multipart(&self) -> Option<&MultipartMessage> {
        match self {
            Self::Multipart(m) => Some(m),
            Self::Simple(_) => None,
        }
    }

    /// Sub-messages of a multipart message; empty for a simple one.
    pub fn parts(&self) -> &[Message] {
        match self {
            Self::Multipart(m) => &m.parts,
            Self::Simple(_) => &[],
        }
    }

    /// Resolve this node's declared `Content-Type` through `registry`.
    pub fn media_type<'r>(&self, registry: &'r dyn TypeRegistry) -> &'r MediaType {
        registry.resolve(self.headers().content_type())
    }

    /// Fetch a nested node by part indices; `&[]` is the message itself.
    pub fn part(&self, path: &[usize]) -> Option<&Message> {
        path.iter()
            .try_fold(self, |node, &index| node.parts().get(index))
    }

    /// Every node, depth-first in document order, with its part path.
    pub fn walk(&self) -> Vec<(Vec<usize>, &Message)> {
        let mut out = Vec::new();
        let mut stack = vec![(Vec::new(), self)];
        while let Some((path, node)) = stack.pop() {
            for (i, child) in node.parts().iter().enumerate().rev() {
                let mut child_path = path.clone();
                child_path.push(i);
                stack.push((child_path, child));
            }
            out.push((path, node));
        }
        out
    }

    /// Render the canonical wire form.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SimpleMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{CRLF}", self.headers)?;
        for line in &self.body {
            f.write_str(line)?;
        }
        Ok(())
    }
}

impl fmt::Display for MultipartMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{CRLF}", self.headers)?;
        for line in &self.preamble {
            f.write_str(line)?;
        }
        write!(f, "--{}{CRLF}", self.boundary)?;
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                write!(f, "{CRLF}--{}{CRLF}", self.boundary)?;
            }
            write!(f, "{part}")?;
        }
        write!(f, "{CRLF}--{}--{CRLF}", self.boundary)?;
        for line in &self.epilogue {
            f.write_str(line)?;
        }
        Ok(())
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple(m) => fmt::Display::fmt(m, f),
            Self::Multipart(m) => fmt::Display::fmt(m, f),
        }
    }
}
