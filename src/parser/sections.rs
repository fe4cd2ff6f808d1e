//! Header/body splitting with RFC 822 folding.

use tracing::warn;

use super::field::is_lwsp;
use super::header::build_header;
use super::lines::strip_line_ending;
use crate::error::{MalformedKind, MimeError, Result};
use crate::model::header::Headers;
use crate::model::message::Line;

/// A message split into its header collection and its body lines.
#[derive(Debug)]
pub struct Sections {
    pub headers: Headers,
    pub body: Vec<Line>,
    /// Absolute line number of `body[0]`.
    pub body_line: usize,
}

/// Match the field-name of a header line and return `(name, rest_after_colon)`.
///
/// ```text
/// field      = field-name ":" [ field-body ] CRLF
/// field-name = 1*<any CHAR, excluding CTLs, SPACE, and ":">
/// ```
pub fn match_header_start(line: &str) -> Option<(&str, &str)> {
    let (name, rest) = line.split_once(':')?;
    let valid = !name.is_empty()
        && name
            .bytes()
            .all(|b| b > b' ' && b != 0x7f);
    valid.then_some((name, rest))
}

/// A header being accumulated across continuation lines.
struct Pending {
    name: String,
    value: String,
    line: usize,
}

impl Pending {
    fn finish(self, headers: &mut Headers) {
        headers.insert(build_header(&self.name, &self.value, self.line));
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum SectionState {
    Headers,
    Body,
}

/// Partition `lines` into headers and body.
///
/// `first_line` is the absolute number of `lines[0]`, used for error locations.
/// Input that ends before the blank separator line is accepted: any pending
/// header is kept and the body is empty.
pub fn split_sections(lines: Vec<Line>, first_line: usize) -> Result<Sections> {
    let mut headers = Headers::new();
    let mut state = SectionState::Headers;
    let mut pending: Option<Pending> = None;
    let mut body_start = lines.len();

    for (idx, line) in lines.iter().enumerate() {
        let number = first_line + idx;

        if let Some((name, rest)) = match_header_start(line) {
            if let Some(done) = pending.take() {
                done.finish(&mut headers);
            }
            pending = Some(Pending {
                name: name.to_string(),
                value: rest.to_string(),
                line: number,
            });
        } else if line.starts_with(is_lwsp) {
            let Some(current) = pending.as_mut() else {
                return Err(MimeError::malformed(
                    number,
                    MalformedKind::UnexpectedContinuation,
                ));
            };
            // Unfolding discards the line break before the continuation.
            let kept = strip_line_ending(&current.value).len();
            current.value.truncate(kept);
            current.value.push_str(line);
        } else if strip_line_ending(line).is_empty() {
            if let Some(done) = pending.take() {
                done.finish(&mut headers);
            }
            state = SectionState::Body;
            body_start = idx + 1;
            break;
        } else {
            return Err(MimeError::malformed(number, MalformedKind::ExpectedHeader));
        }
    }

    if state == SectionState::Headers {
        if let Some(done) = pending.take() {
            done.finish(&mut headers);
        }
        if !lines.is_empty() {
            warn!(
                line = first_line + lines.len() - 1,
                "Header section not terminated by a blank line"
            );
        }
    }

    let mut lines = lines;
    let body = lines.split_off(body_start.min(lines.len()));

    Ok(Sections {
        headers,
        body,
        body_line: first_line + body_start,
    })
}
