//! Error types for normalization, extraction and file generation.
//!
//! Offsets in [`ParseError`] are byte offsets into the text the failing stage
//! was working on: the raw header for comment stripping, the normalized text
//! for everything after it.

use std::path::PathBuf;
use thiserror::Error;

/// Malformed header input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A `/*` with no closing `*/`
    #[error("unterminated block comment starting at offset {offset} (missing '*/')")]
    UnterminatedComment { offset: usize },

    /// A `{` whose matching `}` never appears
    #[error("unterminated scope: '{{' at offset {offset} is never closed")]
    UnterminatedScope { offset: usize },

    /// A `}` with no open `{`
    #[error("unmatched '}}' at offset {offset}")]
    UnmatchedClose { offset: usize },

    /// A marker not followed by the declaration keyword it annotates
    #[error("missing '{expected}' after {marker} at offset {offset}")]
    MissingKeyword {
        marker: &'static str,
        expected: &'static str,
        offset: usize,
    },

    /// A declaration head with no identifier to use as its name
    #[error("missing declaration name after {marker} at offset {offset}")]
    MissingName { marker: &'static str, offset: usize },

    /// An expected delimiter was not found
    #[error("missing '{expected}' after {marker} at offset {offset}")]
    MissingDelimiter {
        marker: &'static str,
        expected: char,
        offset: usize,
    },
}

impl ParseError {
    pub fn offset(&self) -> usize {
        match self {
            ParseError::UnterminatedComment { offset }
            | ParseError::UnterminatedScope { offset }
            | ParseError::UnmatchedClose { offset }
            | ParseError::MissingKeyword { offset, .. }
            | ParseError::MissingName { offset, .. }
            | ParseError::MissingDelimiter { offset, .. } => *offset,
        }
    }
}

/// Errors from a generation run over a file or directory.
#[derive(Debug, Error)]
pub enum ReflectError {
    #[error("input file must have a '{extension}' extension: {}", .path.display())]
    WrongExtension { path: PathBuf, extension: String },

    #[error("input file '{}' does not exist", .0.display())]
    InputNotFound(PathBuf),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("failed to walk {}: {source}", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: ignore::Error,
    },

    #[error("invalid config {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },
}

impl ReflectError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReflectError::Io { path: path.into(), source }
    }
}

pub type Result<T, E = ReflectError> = std::result::Result<T, E>;
