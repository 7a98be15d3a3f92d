//! Line comment scanner
//!
//! A two-state machine fed one physical line at a time:
//!
//! ```text
//!            comment line                 comment / blank line
//!   Idle ───────────────────▶ InBlock ◀──────────────────────┐
//!    ▲                          │  └──────────────────────────┘
//!    └──────────────────────────┘
//!        code line or end of input (emits a Comment)
//! ```
//!
//! [`ScanState::advance`] is the whole transition function. It is pure: it consumes the
//! state, looks at one line, and returns the next state plus the comment the line
//! finalized, if any. [`CommentScanner`] only drives it and collects the output.
//!
//! Line rules, in order:
//!
//! 1. A line inside a multi-line scalar ([`NodeSpanIndex::shields`]) is skipped. It
//!    neither opens, continues nor ends a block.
//! 2. A blank line inside a block is recorded in the block's bitmap and keeps it open.
//! 3. A pure comment line continues a block, whether the block opened on a pure comment
//!    line or behind code (a trailing comment).
//! 4. Any other line ends the block and is then scanned again from `Idle`, so the code
//!    line right below a prefix comment can carry a trailing comment of its own.

use super::comment::{Comment, LineBitmap};
use super::span::NodeSpanIndex;
use crate::error::SyntaxError;
use crate::text::{is_blank, is_escaped, leading_whitespace_columns};
use once_cell::sync::Lazy;
use regex::Regex;

pub const DEFAULT_MARKER: &str = "#";

static DEFAULT_SYNTAX: Lazy<CommentSyntax> = Lazy::new(|| {
    CommentSyntax::new(DEFAULT_MARKER, crate::text::delimiters::DEFAULT_ESCAPE)
        .expect("default comment syntax is valid")
});

/// The comment marker and how to recognize comment lines with it.
#[derive(Debug, Clone)]
pub struct CommentSyntax {
    marker: String,
    escape: String,
    continuation: Regex,
}

/// What the first line of a block contributed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstLine {
    pub tag_column: usize,
    pub inline: bool,
    pub text: String,
}

impl CommentSyntax {
    /// `escape` makes an occurrence of `marker` inert when it precedes it.
    pub fn new(marker: &str, escape: &str) -> Result<Self, SyntaxError> {
        if marker.is_empty() {
            return Err(SyntaxError::EmptyCommentMarker);
        }
        let continuation = Regex::new(&format!(r"^\s*{}(.*)$", regex::escape(marker)))?;
        Ok(Self {
            marker: marker.to_string(),
            escape: escape.to_string(),
            continuation,
        })
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Match a line that may open a block: anything, then the first unescaped marker.
    pub fn first_line(&self, line: &str) -> Option<FirstLine> {
        let (at, _) = line
            .match_indices(self.marker.as_str())
            .find(|(at, _)| !is_escaped(line, *at, &self.escape))?;
        let prefix = &line[..at];
        Some(FirstLine {
            tag_column: prefix.chars().count(),
            inline: !is_blank(prefix),
            text: comment_text(&line[at + self.marker.len()..]),
        })
    }

    /// Match a pure comment line: whitespace, the marker, comment text.
    pub fn continuation(&self, line: &str) -> Option<String> {
        self.continuation
            .captures(line)
            .and_then(|captures| captures.get(1))
            .map(|text| comment_text(text.as_str()))
    }
}

impl Default for CommentSyntax {
    fn default() -> Self {
        DEFAULT_SYNTAX.clone()
    }
}

/// Text after the marker: one separating space dropped, trailing whitespace trimmed.
fn comment_text(after_marker: &str) -> String {
    after_marker
        .strip_prefix(' ')
        .unwrap_or(after_marker)
        .trim_end()
        .to_string()
}

/// Everything a transition needs besides the state and the line.
#[derive(Debug, Clone, Copy)]
pub struct ScanContext<'a> {
    pub resource: &'a str,
    pub syntax: &'a CommentSyntax,
    pub spans: &'a NodeSpanIndex,
}

/// A block still accumulating lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenBlock {
    start_line: usize,
    tag_column: usize,
    inline: bool,
    lines: Vec<String>,
    blank_lines: LineBitmap,
    last_line: usize,
}

impl OpenBlock {
    fn open(line_no: usize, first: FirstLine) -> Self {
        Self {
            start_line: line_no,
            tag_column: first.tag_column,
            inline: first.inline,
            lines: vec![first.text],
            blank_lines: LineBitmap::new(),
            last_line: line_no,
        }
    }

    pub fn start_line(&self) -> usize {
        self.start_line
    }

    pub fn is_inline(&self) -> bool {
        self.inline
    }

    fn push_text(&mut self, line_no: usize, text: String) {
        self.lines.push(text);
        self.last_line = line_no;
    }

    fn mark_blank(&mut self, line_no: usize) {
        self.blank_lines.set(line_no - self.start_line);
        self.last_line = line_no;
    }

    fn finish(self, resource: &str, trailing_column: Option<usize>) -> Comment {
        let span_length = self.last_line - self.start_line + 1;
        tracing::trace!(
            resource,
            start_line = self.start_line,
            span_length,
            inline = self.inline,
            "comment block finalized"
        );
        Comment::new(
            resource.to_string(),
            self.start_line,
            self.tag_column,
            self.lines,
            self.blank_lines,
            span_length,
            trailing_column,
            self.inline,
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ScanState {
    #[default]
    Idle,
    InBlock(OpenBlock),
}

impl ScanState {
    /// Feed line `line_no` to the machine.
    pub fn advance(self, line: &str, line_no: usize, ctx: &ScanContext<'_>) -> (ScanState, Option<Comment>) {
        if ctx.spans.shields(line_no) {
            return (self, None);
        }

        match self {
            ScanState::Idle => (Self::start(line, line_no, ctx), None),
            ScanState::InBlock(mut block) => {
                if is_blank(line) {
                    block.mark_blank(line_no);
                    return (ScanState::InBlock(block), None);
                }
                if let Some(text) = ctx.syntax.continuation(line) {
                    block.push_text(line_no, text);
                    return (ScanState::InBlock(block), None);
                }
                let comment = block.finish(ctx.resource, Some(leading_whitespace_columns(line)));
                (Self::start(line, line_no, ctx), Some(comment))
            }
        }
    }

    /// End of input: an open block is emitted without a terminating line.
    pub fn finish(self, resource: &str) -> Option<Comment> {
        match self {
            ScanState::Idle => None,
            ScanState::InBlock(block) => Some(block.finish(resource, None)),
        }
    }

    fn start(line: &str, line_no: usize, ctx: &ScanContext<'_>) -> ScanState {
        if is_blank(line) {
            return ScanState::Idle;
        }
        match ctx.syntax.first_line(line) {
            Some(first) => ScanState::InBlock(OpenBlock::open(line_no, first)),
            None => ScanState::Idle,
        }
    }
}

/// Drives [`ScanState`] over the lines of one resource.
#[derive(Debug)]
pub struct CommentScanner<'a> {
    ctx: ScanContext<'a>,
    state: ScanState,
    next_line: usize,
    comments: Vec<Comment>,
}

impl<'a> CommentScanner<'a> {
    pub fn new(resource: &'a str, syntax: &'a CommentSyntax, spans: &'a NodeSpanIndex) -> Self {
        Self {
            ctx: ScanContext {
                resource,
                syntax,
                spans,
            },
            state: ScanState::Idle,
            next_line: 0,
            comments: Vec::new(),
        }
    }

    /// Scan the next physical line (without its line terminator).
    pub fn push_line(&mut self, line: &str) {
        let state = std::mem::take(&mut self.state);
        let (state, comment) = state.advance(line, self.next_line, &self.ctx);
        self.state = state;
        self.comments.extend(comment);
        self.next_line += 1;
    }

    /// Number of lines pushed so far.
    pub fn lines_scanned(&self) -> usize {
        self.next_line
    }

    /// Close any open block and return every comment, sorted.
    pub fn finish(mut self) -> Vec<Comment> {
        self.comments.extend(self.state.finish(self.ctx.resource));
        self.comments.sort();
        self.comments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comments::span::NodeSpan;
    use rstest::rstest;

    fn scan(source: &str, spans: &NodeSpanIndex) -> Vec<Comment> {
        let syntax = CommentSyntax::default();
        let mut scanner = CommentScanner::new("test.yaml", &syntax, spans);
        for line in source.lines() {
            scanner.push_line(line);
        }
        scanner.finish()
    }

    fn lines(comment: &Comment) -> Vec<&str> {
        comment.lines().iter().map(String::as_str).collect()
    }

    #[rstest]
    #[case::plain("# hello", Some((0, false, "hello")))]
    #[case::no_space("#hello", Some((0, false, "hello")))]
    #[case::indented("   #  two spaces ", Some((3, false, " two spaces")))]
    #[case::trailing("key: value # trailing", Some((11, true, "trailing")))]
    #[case::escaped_marker(r"key: a\#b", None)]
    #[case::escaped_then_real(r"key: a\#b # c", Some((10, true, "c")))]
    #[case::no_marker("key: value", None)]
    fn first_line_pattern(#[case] line: &str, #[case] expected: Option<(usize, bool, &str)>) {
        let matched = CommentSyntax::default().first_line(line);
        let expected = expected.map(|(tag_column, inline, text)| FirstLine {
            tag_column,
            inline,
            text: text.to_string(),
        });
        assert_eq!(matched, expected);
    }

    #[rstest]
    #[case::pure("  # more", Some("more"))]
    #[case::empty_comment("#", Some(""))]
    #[case::code_first("a: 1 # no", None)]
    #[case::blank("   ", None)]
    fn continuation_pattern(#[case] line: &str, #[case] expected: Option<&str>) {
        assert_eq!(
            CommentSyntax::default().continuation(line),
            expected.map(str::to_string)
        );
    }

    #[test]
    fn custom_marker_is_matched_literally() {
        let syntax = CommentSyntax::new("//", "\\").unwrap();
        assert_eq!(syntax.continuation("  // note"), Some("note".to_string()));
        assert_eq!(syntax.continuation("  / note"), None);
        assert_eq!(syntax.first_line("x = 1 // y").map(|m| m.tag_column), Some(6));

        let dotted = CommentSyntax::new(".", "\\").unwrap();
        assert_eq!(dotted.continuation("x"), None);
    }

    #[test]
    fn empty_marker_is_rejected() {
        assert!(matches!(
            CommentSyntax::new("", "\\"),
            Err(SyntaxError::EmptyCommentMarker)
        ));
    }

    #[test]
    fn prefix_then_trailing_comment() {
        let comments = scan("# a comment\nkey: value # trailing", &NodeSpanIndex::default());
        assert_eq!(comments.len(), 2);

        let prefix = &comments[0];
        assert_eq!(lines(prefix), vec!["a comment"]);
        assert_eq!(prefix.start_line(), 0);
        assert_eq!(prefix.span_length(), 1);
        assert_eq!(prefix.trailing_column(), Some(0));
        assert!(!prefix.is_inline());

        let inline = &comments[1];
        assert_eq!(lines(inline), vec!["trailing"]);
        assert_eq!(inline.start_line(), 1);
        assert_eq!(inline.tag_column(), 11);
        assert!(inline.is_inline());
        assert_eq!(inline.trailing_column(), None);
    }

    #[test]
    fn blank_interrupted_block() {
        let comments = scan("# line1\n\n# line2\nkey: 1", &NodeSpanIndex::default());
        assert_eq!(comments.len(), 1);
        let comment = &comments[0];
        assert_eq!(lines(comment), vec!["line1", "line2"]);
        assert_eq!(comment.span_length(), 3);
        assert!(comment.is_blank_at(1));
        assert!(!comment.is_blank_at(0));
        assert_eq!(comment.following_line(), 3);
    }

    #[test]
    fn trailing_blanks_belong_to_the_block() {
        let comments = scan("# doc\n\n\nkey: 1", &NodeSpanIndex::default());
        assert_eq!(comments[0].span_length(), 3);
        assert_eq!(comments[0].blank_lines().iter().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn trailing_comment_continues_with_comment_lines() {
        let comments = scan("a: 1 # one\n# two\nb: 2", &NodeSpanIndex::default());
        assert_eq!(comments.len(), 1);
        let comment = &comments[0];
        assert!(comment.is_inline());
        assert_eq!(lines(comment), vec!["one", "two"]);
        assert_eq!(comment.span_length(), 2);
        assert_eq!(comment.trailing_column(), Some(0));
    }

    #[test]
    fn trailing_comment_keeps_following_blanks() {
        let comments = scan("a: 1 # one\n\nb: 2", &NodeSpanIndex::default());
        assert_eq!(comments.len(), 1);
        let comment = &comments[0];
        assert_eq!(comment.span_length(), 2);
        assert!(comment.is_blank_at(1));
        assert_eq!(comment.trailing_column(), Some(0));
    }

    #[test]
    fn trailing_comment_absorbs_blanks_and_comment_lines() {
        let comments = scan("a: 1 # one\n# two\n\nb: 2", &NodeSpanIndex::default());
        assert_eq!(comments.len(), 1);
        assert_eq!(lines(&comments[0]), vec!["one", "two"]);
        assert_eq!(comments[0].span_length(), 3);
        assert_eq!(comments[0].blank_lines().iter().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn trailing_comment_ended_by_code_records_its_column() {
        let comments = scan("a: 1 # one\n  b: 2", &NodeSpanIndex::default());
        assert_eq!(comments[0].trailing_column(), Some(2));
    }

    #[test]
    fn block_at_end_of_input() {
        let comments = scan("key: 1\n# tail\n# end", &NodeSpanIndex::default());
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].span_length(), 2);
        assert_eq!(comments[0].trailing_column(), None);
    }

    #[test]
    fn shielded_lines_are_invisible() {
        let source = "text: |\n  line\n  # not a comment\n  end\nnext: 1";
        let spans = NodeSpanIndex::new(vec![NodeSpan::new(0, 6, 3, 5)]);
        assert!(scan(source, &spans).is_empty());
    }

    #[test]
    fn shielded_lines_do_not_end_a_block() {
        let source = "# doc\nlong: >\n  # text\n  more\nnext: 1";
        let spans = NodeSpanIndex::new(vec![NodeSpan::new(1, 6, 3, 6)]);
        let comments = scan(source, &spans);
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].span_length(), 1);
        assert_eq!(comments[0].trailing_column(), Some(2));
    }

    #[test]
    fn transitions_are_pure() {
        let syntax = CommentSyntax::default();
        let spans = NodeSpanIndex::default();
        let ctx = ScanContext {
            resource: "t",
            syntax: &syntax,
            spans: &spans,
        };

        let (state, emitted) = ScanState::Idle.advance("# one", 0, &ctx);
        assert!(emitted.is_none());
        assert!(matches!(&state, ScanState::InBlock(block) if block.start_line() == 0));

        let (again, _) = state.clone().advance("", 1, &ctx);
        let (same, _) = state.advance("", 1, &ctx);
        assert_eq!(again, same);

        let (idle, emitted) = same.advance("k: v", 2, &ctx);
        assert_eq!(idle, ScanState::Idle);
        assert_eq!(emitted.map(|c| c.span_length()), Some(2));
    }
}
