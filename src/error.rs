//! Error types
//!
//! Only two things are escalated to callers as hard failures: a line source that breaks
//! while a resource is being scanned ([`ScanError`]) and an invalid syntax definition
//! ([`SyntaxError`]). Everything else the algorithms run into (unbalanced delimiters,
//! `{...}` without the `$` prefix, unknown tags) is absorbed with a fallback value and at
//! most a [`Diagnostic`](crate::diagnostics::Diagnostic).

use std::io;
use thiserror::Error;

/// Failures while reading comments out of a resource.
///
/// A scan that fails never hands back the comments it gathered before the failure;
/// callers retry by scanning the resource again from its first line.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to open {resource}: {source}")]
    Open {
        resource: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to read line {line} of {resource}: {source}")]
    SourceRead {
        resource: String,
        line: usize,
        #[source]
        source: io::Error,
    },
}

impl ScanError {
    /// The resource the failure belongs to.
    pub fn resource(&self) -> &str {
        match self {
            ScanError::Open { resource, .. } | ScanError::SourceRead { resource, .. } => resource,
        }
    }
}

/// Invalid delimiter or comment syntax definitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("{openers} opener(s) but {closers} closer(s); delimiters are paired by position")]
    UnpairedDelimiters { openers: usize, closers: usize },

    #[error("quote delimiter `{0}` is not one of the openers")]
    QuoteNotOpener(char),

    #[error("quote delimiter `{0}` must be closed by itself")]
    QuoteNotSelfClosing(char),

    #[error("escape marker must not be empty")]
    EmptyEscape,

    #[error("comment marker must not be empty")]
    EmptyCommentMarker,

    #[error("placeholder delimiters `{{` / `}}` must be a configured opener/closer pair")]
    MissingPlaceholderDelimiters,

    #[error("invalid comment pattern: {0}")]
    Pattern(String),
}

impl From<regex::Error> for SyntaxError {
    fn from(err: regex::Error) -> Self {
        SyntaxError::Pattern(err.to_string())
    }
}

/// A tag processor could not make sense of a raw scalar.
///
/// The [`TagRegistry`](crate::coercion::TagRegistry) never lets this escape: it falls back
/// to the raw string and records a warning diagnostic instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    #[error("`{raw}` is not an integer")]
    InvalidInt { raw: String },

    #[error("`{raw}` does not fit in 128 bits")]
    IntOutOfRange { raw: String },

    #[error("`{raw}` is not a floating point number")]
    InvalidFloat { raw: String },
}
