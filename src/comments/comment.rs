//! Comment records
//!
//! A [`Comment`] is one contiguous comment block as the scanner saw it. Line numbers are
//! absolute and 0-based. Offsets into a block (the blank-line bitmap) are relative to
//! its `start_line`.
//!
//! ```text
//!   line 0   # line1          start_line = 0, tag_column = 0
//!   line 1                    blank bit at offset 1
//!   line 2   # line2
//!   line 3   key: 1           following_line = 3, trailing_column = Some(0)
//! ```

use serde::ser::{Serialize, Serializer};
use std::fmt;

const WORD_BITS: usize = u64::BITS as usize;

/// Set of relative line offsets, packed 64 per word.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineBitmap {
    words: Vec<u64>,
}

impl LineBitmap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, offset: usize) {
        let word = offset / WORD_BITS;
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1u64 << (offset % WORD_BITS);
    }

    pub fn get(&self, offset: usize) -> bool {
        self.words
            .get(offset / WORD_BITS)
            .is_some_and(|word| word & (1u64 << (offset % WORD_BITS)) != 0)
    }

    pub fn count(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&word| word == 0)
    }

    /// Set offsets in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(index, &word)| {
            (0..WORD_BITS)
                .filter(move |bit| word & (1u64 << bit) != 0)
                .map(move |bit| index * WORD_BITS + bit)
        })
    }
}

impl Serialize for LineBitmap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// One comment block.
///
/// Records sort by `(resource, start_line, tag_column)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct Comment {
    resource: String,
    start_line: usize,
    tag_column: usize,
    lines: Vec<String>,
    blank_lines: LineBitmap,
    span_length: usize,
    trailing_column: Option<usize>,
    inline: bool,
}

impl Comment {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        resource: String,
        start_line: usize,
        tag_column: usize,
        lines: Vec<String>,
        blank_lines: LineBitmap,
        span_length: usize,
        trailing_column: Option<usize>,
        inline: bool,
    ) -> Self {
        debug_assert!(lines.len() <= span_length);
        Self {
            resource,
            start_line,
            tag_column,
            lines,
            blank_lines,
            span_length,
            trailing_column,
            inline,
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn start_line(&self) -> usize {
        self.start_line
    }

    /// Column (in chars) of the comment marker on the first line.
    pub fn tag_column(&self) -> usize {
        self.tag_column
    }

    /// Comment text per physical comment line, marker stripped.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn blank_lines(&self) -> &LineBitmap {
        &self.blank_lines
    }

    /// Physical lines occupied, interior and trailing blanks included.
    pub fn span_length(&self) -> usize {
        self.span_length
    }

    /// First non-whitespace column of the line that ended the block.
    ///
    /// `None` when the input ended first, or when the terminating line had no code on it
    /// (a blank or comment line ending a trailing comment).
    pub fn trailing_column(&self) -> Option<usize> {
        self.trailing_column
    }

    /// Code precedes the comment on its first line.
    pub fn is_inline(&self) -> bool {
        self.inline
    }

    /// Last physical line of the block.
    pub fn ending_line(&self) -> usize {
        self.start_line + self.span_length - 1
    }

    /// The line right after the block: the node a prefix comment documents starts here.
    pub fn following_line(&self) -> usize {
        self.start_line + self.span_length
    }

    /// Whether the line at `offset` from `start_line` was blank.
    pub fn is_blank_at(&self, offset: usize) -> bool {
        self.blank_lines.get(offset)
    }

    /// The comment lines joined with `\n`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}{} {:?}",
            self.resource,
            self.start_line,
            self.tag_column,
            if self.inline { " (inline)" } else { "" },
            self.text()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(start_line: usize, lines: &[&str], span_length: usize) -> Comment {
        Comment::new(
            "test.yaml".to_string(),
            start_line,
            0,
            lines.iter().map(|line| line.to_string()).collect(),
            LineBitmap::new(),
            span_length,
            None,
            false,
        )
    }

    #[test]
    fn bitmap_set_and_get() {
        let mut bitmap = LineBitmap::new();
        bitmap.set(1);
        bitmap.set(70);
        assert!(bitmap.get(1));
        assert!(bitmap.get(70));
        assert!(!bitmap.get(0));
        assert!(!bitmap.get(500));
        assert_eq!(bitmap.count(), 2);
        assert_eq!(bitmap.iter().collect::<Vec<_>>(), vec![1, 70]);
    }

    #[test]
    fn bitmap_serializes_as_offsets() {
        let mut bitmap = LineBitmap::new();
        bitmap.set(3);
        bitmap.set(1);
        assert_eq!(serde_json::to_string(&bitmap).unwrap(), "[1,3]");
        assert!(LineBitmap::new().is_empty());
    }

    #[test]
    fn line_arithmetic() {
        let comment = block(4, &["one", "two"], 3);
        assert_eq!(comment.ending_line(), 6);
        assert_eq!(comment.following_line(), 7);
        assert_eq!(comment.text(), "one\ntwo");
    }

    #[test]
    fn ordering_by_resource_then_position() {
        let mut comments = vec![block(9, &["b"], 1), block(2, &["a"], 1)];
        comments.sort();
        assert_eq!(comments[0].start_line(), 2);
    }

    #[test]
    fn display() {
        assert_eq!(block(2, &["a", "b"], 2).to_string(), r#"test.yaml:2:0 "a\nb""#);
    }
}
