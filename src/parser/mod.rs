//! MIME message parsing: line normalization, header/body splitting, structured
//! fields, and recursive multipart handling.
//!
//! The entry point is [`parse`] (or [`MessageParser::parse`] with custom
//! [`ParseOptions`]). Parsing either yields a complete [`Message`] tree or fails
//! with a [`MimeError`] located at a 1-based line of the input.

pub mod field;
pub mod header;
pub mod lines;
pub mod multipart;
pub mod sections;

use std::path::Path;

use tracing::debug;

use crate::error::{MimeError, Result};
use crate::model::message::{Line, Message, SimpleMessage};

/// Default limit on nested multipart levels.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// What to parse.
#[derive(Debug, Clone)]
pub enum Input<'a> {
    /// A whole message in one buffer, with any line-ending style.
    Text(&'a str),
    /// Lines already split by the caller.
    Lines(Vec<Line>),
}

impl<'a> From<&'a str> for Input<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<Line>> for Input<'_> {
    fn from(lines: Vec<Line>) -> Self {
        Self::Lines(lines)
    }
}

/// Parser tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum multipart nesting below the top-level message.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Position of the message being parsed inside the top-level document.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ParseContext {
    pub depth: usize,
    /// Absolute line number of the first line handed to this stage.
    pub first_line: usize,
}

impl ParseContext {
    fn root() -> Self {
        Self {
            depth: 0,
            first_line: 1,
        }
    }

    pub fn nested(&self, first_line: usize) -> Self {
        Self {
            depth: self.depth + 1,
            first_line,
        }
    }

    fn at(&self, first_line: usize) -> Self {
        Self {
            depth: self.depth,
            first_line,
        }
    }
}

/// Reusable parser carrying [`ParseOptions`].
#[derive(Debug, Clone, Default)]
pub struct MessageParser {
    options: ParseOptions,
}

impl MessageParser {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    /// Parse a message.
    ///
    /// With `normalize` set, text is split on any line ending and every line
    /// is checked for 7-bit cleanliness and given a CRLF. Pre-split lines are
    /// re-terminated the same way. With `normalize` unset, lines are used
    /// exactly as given; a [`Input::Text`] buffer is then split on the same
    /// line endings, each line keeping its own, without validation.
    pub fn parse<'a>(&self, input: impl Into<Input<'a>>, normalize: bool) -> Result<Message> {
        let lines = match (input.into(), normalize) {
            (Input::Text(text), true) => lines::normalize_text(text)?,
            (Input::Lines(given), true) => lines::normalize_lines(&given)?,
            (Input::Text(text), false) => lines::split_lines_verbatim(text),
            (Input::Lines(given), false) => given,
        };
        self.parse_in(lines, ParseContext::root())
    }

    /// Parse already-prepared lines at `ctx`; multipart bodies recurse back here.
    pub(crate) fn parse_in(&self, lines: Vec<Line>, ctx: ParseContext) -> Result<Message> {
        if ctx.depth > self.options.max_depth {
            return Err(MimeError::TooDeep {
                line: ctx.first_line,
                limit: self.options.max_depth,
            });
        }

        let sections = sections::split_sections(lines, ctx.first_line)?;
        debug!(
            headers = sections.headers.len(),
            body_lines = sections.body.len(),
            depth = ctx.depth,
            "Split message"
        );

        if multipart::is_multipart(&sections.headers) {
            multipart::parse_multipart(
                self,
                sections.headers,
                sections.body,
                ctx.at(sections.body_line),
            )
        } else {
            Ok(Message::Simple(SimpleMessage {
                headers: sections.headers,
                body: sections.body,
            }))
        }
    }
}

/// Parse with default options.
pub fn parse<'a>(input: impl Into<Input<'a>>, normalize: bool) -> Result<Message> {
    MessageParser::default().parse(input, normalize)
}

/// Parse a complete message held in a string, normalizing line endings.
pub fn parse_str(text: &str) -> Result<Message> {
    parse(Input::Text(text), true)
}

/// Parse a message file (`.eml` or similar).
///
/// Bytes are decoded lossily, so any byte outside 7-bit ASCII fails
/// validation at the line it appears on.
pub fn parse_file(path: impl AsRef<Path>, options: ParseOptions) -> Result<Message> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            MimeError::FileNotFound(path.to_path_buf())
        } else {
            MimeError::io(path, e)
        }
    })?;
    debug!(path = %path.display(), bytes = data.len(), "Read message file");

    let text = String::from_utf8_lossy(&data);
    MessageParser::new(options).parse(Input::Text(&text), true)
}
