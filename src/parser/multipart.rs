//! Multipart body splitting (RFC 2046 §5.1).

use tracing::{debug, warn};

use super::field::is_lwsp;
use super::{MessageParser, ParseContext};
use crate::error::{MalformedKind, MimeError, Result};
use crate::model::header::Headers;
use crate::model::message::{Line, Message, MultipartMessage};

/// MIME type prefix that marks a multipart message.
pub const MULTIPART: &str = "multipart/";

/// Whether `headers` declare a `multipart/*` Content-Type.
pub fn is_multipart(headers: &Headers) -> bool {
    headers.content_type().is_some_and(|ct| {
        ct.get(..MULTIPART.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(MULTIPART))
    })
}

/// What a body line means with respect to the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delimiter {
    /// `--boundary`
    Next,
    /// `--boundary--`
    Last,
}

/// Classify `line` as a delimiter line for `boundary`, allowing trailing
/// whitespace before the line break.
fn classify(line: &str, boundary: &str) -> Option<Delimiter> {
    let rest = line.strip_prefix("--")?.strip_prefix(boundary)?;
    let (kind, tail) = match rest.strip_prefix("--") {
        Some(tail) => (Delimiter::Last, tail),
        None => (Delimiter::Next, rest),
    };
    let tail = tail.trim_end_matches(['\r', '\n']);
    tail.chars().all(is_lwsp).then_some(kind)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum MultipartState {
    Preamble,
    Part,
    Epilogue,
}

/// Accumulates the lines of one body part and remembers where it started.
struct PartBuffer {
    lines: Vec<Line>,
    first_line: usize,
}

impl PartBuffer {
    fn new(first_line: usize) -> Self {
        Self {
            lines: Vec::new(),
            first_line,
        }
    }

    /// Drop the CRLF that belongs to the delimiter, and the line too if it
    /// is left empty.
    fn trim_delimiter_break(&mut self) {
        if let Some(last) = self.lines.last_mut() {
            let kept = last.trim_end_matches(['\r', '\n']).len();
            last.truncate(kept);
            if last.is_empty() {
                self.lines.pop();
            }
        }
    }
}

/// Slice a multipart body on its boundary and parse every part.
pub(crate) fn parse_multipart(
    parser: &MessageParser,
    headers: Headers,
    body: Vec<Line>,
    ctx: ParseContext,
) -> Result<Message> {
    let content_type = headers.get("Content-Type");
    let boundary = content_type
        .and_then(|h| h.parameter("boundary"))
        .map(|b| b.value().to_string())
        .ok_or_else(|| {
            MimeError::malformed(
                content_type.map_or(ctx.first_line, |h| h.line()),
                MalformedKind::MissingBoundaryParameter,
            )
        })?;
    debug!(boundary = %boundary, depth = ctx.depth, "Splitting multipart body");

    let mut state = MultipartState::Preamble;
    let mut preamble = Vec::new();
    let mut epilogue = Vec::new();
    let mut parts = Vec::new();
    let mut current = PartBuffer::new(ctx.first_line);

    for (idx, line) in body.into_iter().enumerate() {
        let number = ctx.first_line + idx;

        match state {
            MultipartState::Preamble => {
                if classify(&line, &boundary) == Some(Delimiter::Next) {
                    state = MultipartState::Part;
                    current = PartBuffer::new(number + 1);
                } else {
                    preamble.push(line);
                }
            }
            MultipartState::Part => match classify(&line, &boundary) {
                Some(delimiter) => {
                    let finished = std::mem::replace(&mut current, PartBuffer::new(number + 1));
                    parts.push(parse_part(parser, finished, &ctx)?);
                    if delimiter == Delimiter::Last {
                        state = MultipartState::Epilogue;
                    }
                }
                None => current.lines.push(line),
            },
            MultipartState::Epilogue => epilogue.push(line),
        }
    }

    if state == MultipartState::Part && !current.lines.is_empty() {
        warn!(
            boundary = %boundary,
            line = current.first_line,
            "Multipart body ended without a closing delimiter"
        );
        parts.push(parser.parse_in(current.lines, ctx.nested(current.first_line))?);
    }

    Ok(Message::Multipart(MultipartMessage {
        headers,
        boundary,
        preamble,
        parts,
        epilogue,
    }))
}

fn parse_part(parser: &MessageParser, mut part: PartBuffer, ctx: &ParseContext) -> Result<Message> {
    part.trim_delimiter_break();
    debug!(line = part.first_line, lines = part.lines.len(), "Parsing body part");
    parser.parse_in(part.lines, ctx.nested(part.first_line))
}
