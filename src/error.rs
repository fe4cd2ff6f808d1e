//! Centralized error types for mimetree.

use std::path::PathBuf;
use thiserror::Error;

/// The grammar production a malformed message violated.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedKind {
    /// A folded continuation line appeared before any header started.
    #[error("unexpected initial whitespace in headers section")]
    UnexpectedContinuation,

    /// A header-section line is neither a header, a continuation nor the blank terminator.
    #[error("expecting a header")]
    ExpectedHeader,

    /// A `multipart/*` Content-Type carries no `boundary` parameter.
    #[error("expected Content-Type to contain 'boundary' parameter")]
    MissingBoundaryParameter,
}

/// All errors produced by the mimetree library.
#[derive(Error, Debug)]
pub enum MimeError {
    /// A line holds a character outside the 7-bit ASCII range.
    #[error("Line {line}: character outside the 7-bit ASCII range")]
    Encoding { line: usize },

    /// The message text violates the header or multipart grammar.
    #[error("Line {line}: invalid MIME message: {kind}")]
    Malformed { line: usize, kind: MalformedKind },

    /// Multipart bodies are nested deeper than the configured limit.
    #[error("Line {line}: multipart nesting exceeds {limit} levels")]
    TooDeep { line: usize, limit: usize },

    /// I/O error with the associated file path.
    #[error("I/O error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The specified file does not exist.
    #[error("Message file not found: {0}")]
    FileNotFound(PathBuf),
}

/// Convenience alias for `Result<T, MimeError>`.
pub type Result<T> = std::result::Result<T, MimeError>;

impl MimeError {
    /// Create an `Io` variant from a path and an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(line: usize, kind: MalformedKind) -> Self {
        Self::Malformed { line, kind }
    }

    /// The 1-based line the failure was located at, if it came from the parser.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Encoding { line } | Self::Malformed { line, .. } | Self::TooDeep { line, .. } => {
                Some(*line)
            }
            Self::Io { .. } | Self::FileNotFound(_) => None,
        }
    }

    /// The violated production, for [`MimeError::Malformed`] only.
    pub fn malformed_kind(&self) -> Option<MalformedKind> {
        match self {
            Self::Malformed { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
