//! Terminal node spans
//!
//! The structural parser reports where every terminal scalar sits. The scanner only asks
//! one question of these spans: is a given line inside a multi-line scalar, so that a
//! `#` on it is scalar text and not a comment? [`NodeSpanIndex::shields`] answers that
//! in `O(log n)` with a prefix maximum over the span ends.

use serde::{Deserialize, Serialize};

/// Line/column extent of one terminal scalar (0-based).
///
/// Ordering is by `(start_line, start_column)`, then by the end position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeSpan {
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

impl NodeSpan {
    pub fn new(start_line: usize, start_column: usize, end_line: usize, end_column: usize) -> Self {
        Self {
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }

    /// A scalar that starts and ends on `line`.
    pub fn single_line(line: usize, start_column: usize, end_column: usize) -> Self {
        Self::new(line, start_column, line, end_column)
    }

    pub fn is_multiline(&self) -> bool {
        self.end_line > self.start_line
    }

    /// `start_line <= line < end_line`: the line is scalar text that continues past it.
    pub fn covers_line(&self, line: usize) -> bool {
        self.start_line <= line && line < self.end_line
    }
}

/// The spans of one resource, sorted, with a shielding lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeSpanIndex {
    spans: Vec<NodeSpan>,
    /// `reach[i]` is the greatest `end_line` among `spans[..=i]`.
    reach: Vec<usize>,
}

impl NodeSpanIndex {
    pub fn new(mut spans: Vec<NodeSpan>) -> Self {
        spans.sort();
        let reach = spans
            .iter()
            .scan(0, |furthest, span| {
                *furthest = (*furthest).max(span.end_line);
                Some(*furthest)
            })
            .collect();
        Self { spans, reach }
    }

    pub fn spans(&self) -> &[NodeSpan] {
        &self.spans
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Whether some span covers `line` (see [`NodeSpan::covers_line`]).
    pub fn shields(&self, line: usize) -> bool {
        let started = self.spans.partition_point(|span| span.start_line <= line);
        started > 0 && self.reach[started - 1] > line
    }
}

impl FromIterator<NodeSpan> for NodeSpanIndex {
    fn from_iter<I: IntoIterator<Item = NodeSpan>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn single_line_spans_shield_nothing() {
        let index: NodeSpanIndex = [NodeSpan::single_line(1, 5, 10), NodeSpan::single_line(2, 5, 6)]
            .into_iter()
            .collect();
        assert!((0..4).all(|line| !index.shields(line)));
    }

    #[test]
    fn multiline_span_shields_all_but_its_last_line() {
        let index = NodeSpanIndex::new(vec![NodeSpan::new(5, 4, 7, 0)]);
        assert!(!index.shields(4));
        assert!(index.shields(5));
        assert!(index.shields(6));
        assert!(!index.shields(7));
    }

    #[test]
    fn long_span_is_not_hidden_by_later_short_ones() {
        let index = NodeSpanIndex::new(vec![
            NodeSpan::single_line(3, 2, 4),
            NodeSpan::new(1, 0, 10, 0),
            NodeSpan::single_line(2, 2, 4),
        ]);
        assert_eq!(index.spans()[0], NodeSpan::new(1, 0, 10, 0));
        assert!(index.shields(8));
        assert!(!index.shields(10));
    }

    #[test]
    fn empty_index() {
        let index = NodeSpanIndex::default();
        assert!(index.is_empty());
        assert!(!index.shields(0));
    }

    proptest! {
        #[test]
        fn shields_agrees_with_linear_scan(
            raw in prop::collection::vec((0usize..30, 0usize..5), 0..12),
            line in 0usize..40,
        ) {
            let spans: Vec<NodeSpan> = raw
                .iter()
                .map(|&(start, extra)| NodeSpan::new(start, 0, start + extra, 0))
                .collect();
            let expected = spans.iter().any(|span| span.covers_line(line));
            prop_assert_eq!(NodeSpanIndex::new(spans).shields(line), expected);
        }
    }
}
