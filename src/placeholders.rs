//! Substitution placeholders inside scalar strings
//!
//! A scalar such as `jdbc:${db.host}:${?db.port}/app` is split into an ordered sequence of
//! literal and placeholder segments:
//!
//! ```text
//! "jdbc:"  ${db.host}  ":"  ${?db.port}  "/app"
//! ```
//!
//! The split is lossless: rendering every segment back and concatenating yields the input
//! byte for byte. Resolving the placeholder paths against a configuration namespace is
//! the interpolation pass's job, not this module's.
//!
//! Only the outermost `${...}` of a nested expression becomes a segment; the inner
//! reference stays verbatim in the outer segment's text. Tokenize that text again to get
//! at the inner references.

pub mod tokenizer;
pub mod value;

pub use tokenizer::{tokenize, Tokenizer};
pub use value::{
    SubstitutableValue, SubstitutableValues, OPTIONAL_MARKER, PLACEHOLDER_END, PLACEHOLDER_START,
};
