//! Character-level building blocks shared by the tokenizer and the comment scanner
//!
//! - [`range`] - inclusive index ranges and the range algebra (containment, fill-in)
//! - [`delimiters`] - single pass balanced delimiter matching with quotes and escapes

pub mod delimiters;
pub mod range;

pub use delimiters::{DelimiterIndex, DelimiterSet, UnclosedDelimiter};
pub use range::{fill_in, remove_ranges_contained_by_others, Range};

/// Whether the character starting at byte `index` is escaped.
///
/// A character is escaped when an odd number of `escape` sequences immediately precede
/// it, so `\{` is escaped and `\\{` is not.
pub(crate) fn is_escaped(text: &str, index: usize, escape: &str) -> bool {
    if escape.is_empty() {
        return false;
    }
    let mut escaped = false;
    let mut end = index;
    while text[..end].ends_with(escape) {
        escaped = !escaped;
        end -= escape.len();
    }
    escaped
}

/// Number of columns (chars) taken by the leading whitespace of a line.
pub(crate) fn leading_whitespace_columns(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

pub(crate) fn is_blank(line: &str) -> bool {
    line.chars().all(char::is_whitespace)
}
