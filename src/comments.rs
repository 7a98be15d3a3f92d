//! Comment extraction and attribution
//!
//! Generic YAML parsers drop comments. This module recovers them from the raw lines of a
//! resource and attributes each one to the terminal node it documents.
//!
//! ```text
//!   raw lines ──┐
//!               ├─▶ CommentScanner ─▶ Vec<Comment> ─▶ associate / CommentIndex
//!   NodeSpans ──┘        (per line)                        (per node)
//! ```
//!
//! The node spans come from the structural parser. They are needed up front because a
//! `#` inside a multi-line scalar is text, not a comment.

pub mod association;
pub mod comment;
pub mod reader;
pub mod scanner;
pub mod span;

pub use association::{associate, Association, CommentIndex};
pub use comment::{Comment, LineBitmap};
pub use reader::{
    read_comments, read_comments_from_path, read_comments_from_path_with, read_comments_from_reader,
    read_comments_with, scan_str,
};
pub use scanner::{CommentScanner, CommentSyntax, ScanContext, ScanState};
pub use span::{NodeSpan, NodeSpanIndex};
