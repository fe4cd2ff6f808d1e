//! Line normalization: split raw text into validated, CRLF-terminated lines.
//!
//! Any of `\r\n`, `\n\r`, a lone `\r` or a lone `\n` ends a line. This is more
//! tolerant than RFC 822 but copes with messages that went through a non-CRLF
//! system.

use crate::error::{MimeError, Result};
use crate::model::message::Line;

/// `CRLF = CR LF`
pub const CRLF: &str = "\r\n";

/// Byte ranges of each line in `text`: `(start, content_end, end)`, where
/// `content_end..end` is the line ending (empty for an unterminated last line).
fn line_spans(text: &str) -> Vec<(usize, usize, usize)> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let terminator = match (bytes[i], bytes.get(i + 1).copied()) {
            (b'\r', Some(b'\n')) | (b'\n', Some(b'\r')) => 2,
            (b'\r' | b'\n', _) => 1,
            _ => 0,
        };
        if terminator == 0 {
            i += 1;
            continue;
        }
        spans.push((start, i, i + terminator));
        i += terminator;
        start = i;
    }
    if start < bytes.len() {
        spans.push((start, bytes.len(), bytes.len()));
    }
    spans
}

/// Split `text` on every recognized line ending, without the endings.
///
/// Trailing empty segments are dropped, so `"a\r\n\r\n"` yields `["a"]`.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = line_spans(text)
        .into_iter()
        .map(|(start, content_end, _)| &text[start..content_end])
        .collect();

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

/// Split `text` on every recognized line ending, keeping each line's own
/// ending. Nothing is dropped or validated.
pub fn split_lines_verbatim(text: &str) -> Vec<Line> {
    line_spans(text)
        .into_iter()
        .map(|(start, _, end)| text[start..end].to_string())
        .collect()
}

/// Remove one trailing line ending of any recognized style.
pub fn strip_line_ending(line: &str) -> &str {
    ["\r\n", "\n\r", "\r", "\n"]
        .iter()
        .find_map(|ending| line.strip_suffix(ending))
        .unwrap_or(line)
}

/// Check that `line` is 7-bit clean and append the canonical CRLF.
///
/// `number` is the 1-based line number reported on failure.
fn canonicalize(line: &str, number: usize) -> Result<Line> {
    if !line.is_ascii() {
        return Err(MimeError::Encoding { line: number });
    }
    let mut out = String::with_capacity(line.len() + CRLF.len());
    out.push_str(line);
    out.push_str(CRLF);
    Ok(out)
}

/// Normalize a whole message buffer into CRLF-terminated lines.
pub fn normalize_text(text: &str) -> Result<Vec<Line>> {
    split_lines(text)
        .into_iter()
        .enumerate()
        .map(|(i, line)| canonicalize(line, i + 1))
        .collect()
}

/// Normalize lines that were split by the caller: any existing ending is
/// replaced by CRLF.
pub fn normalize_lines<S: AsRef<str>>(lines: &[S]) -> Result<Vec<Line>> {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| canonicalize(strip_line_ending(line.as_ref()), i + 1))
        .collect()
}
