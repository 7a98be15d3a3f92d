//! # confscan
//!
//! Text algorithms that give a structured configuration model two things a generic
//! YAML parser throws away:
//!
//! - the comment text around each terminal node, attributed to the node it documents
//!   ([`comments`])
//! - a lossless split of scalar strings into literal text and `${path}` / `${?path}`
//!   substitution placeholders ([`placeholders`])
//!
//! The structural parse itself happens elsewhere. This crate only needs the node spans
//! (start/end line and column of every terminal scalar) that the structural parser
//! produced, see [`comments::NodeSpanIndex`].
//!
//! File Layout
//!
//! src/
//!   ├── text          Index ranges and balanced delimiter matching
//!   ├── placeholders  Segment model and the placeholder tokenizer
//!   ├── comments      Line scanner, comment records and node association
//!   ├── coercion      Tag-driven scalar conversion, fed by the tokenizer
//!   ├── config        Embedded defaults plus user overrides
//!   ├── diagnostics   Non-fatal findings
//!   └── error         Error taxonomy

pub mod coercion;
pub mod comments;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod placeholders;
pub mod text;

pub use comments::{
    associate, read_comments, read_comments_from_path, read_comments_from_reader, scan_str,
    Association, Comment, CommentIndex, NodeSpan, NodeSpanIndex,
};
pub use crate::config::{Loader, ScanConfig};
pub use error::{CoercionError, ScanError, SyntaxError};
pub use placeholders::{tokenize, SubstitutableValue, SubstitutableValues, Tokenizer};
