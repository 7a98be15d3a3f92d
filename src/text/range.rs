//! Index ranges and range algebra
//!
//! A [`Range`] is an inclusive `open..=close` pair of byte offsets into a string,
//! normalized at construction so that `open <= close`. Ranges are immutable; every
//! derived range is a new value.
//!
//! Ranges coming out of the delimiter indexer point at the opening and the closing
//! delimiter themselves. Ranges made up by [`fill_in`] cover the literal text in between.
//!
//! ## Ordering
//!
//! Ranges sort by `open` ascending, and for equal `open` the longer range first. Sorting
//! a set of nested matches therefore puts every outer match before the matches it holds.

use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Range {
    open: usize,
    close: usize,
}

#[allow(clippy::len_without_is_empty)]
impl Range {
    pub fn new(open: usize, close: usize) -> Self {
        Self {
            open: open.min(close),
            close: open.max(close),
        }
    }

    pub fn open(&self) -> usize {
        self.open
    }

    pub fn close(&self) -> usize {
        self.close
    }

    /// Number of indices covered, both ends included.
    pub fn len(&self) -> usize {
        self.close - self.open + 1
    }

    /// Number of indices strictly between `open` and `close`.
    pub fn inner_len(&self) -> usize {
        self.len().saturating_sub(2)
    }

    /// `open <= index <= close`
    pub fn has(&self, index: usize) -> bool {
        self.open <= index && index <= self.close
    }

    /// `open < index < close`
    pub fn contains_index(&self, index: usize) -> bool {
        self.open < index && index < self.close
    }

    /// Whether `other` nests inside this range.
    ///
    /// `other` is contained when it lies strictly inside, or when it touches exactly one
    /// of this range's boundaries while its other end stays strictly inside. Equal ranges
    /// do not contain each other.
    pub fn contains(&self, other: &Range) -> bool {
        (self.contains_index(other.open) && self.contains_index(other.close))
            || (self.contains_index(other.open) && other.close <= self.close)
            || (self.contains_index(other.close) && other.open >= self.open)
    }

    pub fn is_left_of(&self, index: usize) -> bool {
        self.close < index
    }

    pub fn is_right_of(&self, index: usize) -> bool {
        self.open > index
    }

    /// This range ends on the index right before `other` starts.
    pub fn is_left_adjacent_to(&self, other: &Range) -> bool {
        self.close + 1 == other.open
    }

    /// This range starts on the index right after `other` ends.
    pub fn is_right_adjacent_to(&self, other: &Range) -> bool {
        other.close + 1 == self.open
    }

    /// Whether the two ranges share at least one index.
    pub fn overlaps(&self, other: &Range) -> bool {
        self.open <= other.close && other.open <= self.close
    }

    /// The range strictly between this range and `other`, if they are neither
    /// overlapping nor adjacent.
    pub fn gap_to(&self, other: &Range) -> Option<Range> {
        if self.close + 1 < other.open {
            Some(Range::new(self.close + 1, other.open - 1))
        } else if other.close + 1 < self.open {
            Some(Range::new(other.close + 1, self.open - 1))
        } else {
            None
        }
    }

    pub fn with_open(&self, open: usize) -> Range {
        Range::new(open, self.close)
    }

    pub fn with_close(&self, close: usize) -> Range {
        Range::new(self.open, close)
    }

    /// The covered slice of `text`, both ends included.
    ///
    /// Panics like string slicing does when the range is out of bounds or does not sit
    /// on char boundaries.
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.open..=self.close]
    }

    /// The slice of `text` strictly between the two ends.
    pub fn inner_slice<'a>(&self, text: &'a str) -> &'a str {
        if self.close == self.open {
            return "";
        }
        &text[self.open + 1..self.close]
    }
}

impl Ord for Range {
    fn cmp(&self, other: &Self) -> Ordering {
        self.open
            .cmp(&other.open)
            .then_with(|| other.close.cmp(&self.close))
    }
}

impl PartialOrd for Range {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.open, self.close)
    }
}

/// Drop every range that another range in the set [contains](Range::contains).
///
/// The survivors are the outermost matches, sorted by `open` (longer first on ties).
/// Runs in `O(n log n)`: after sorting, one sweep over the groups of equal `open` tracks
/// the furthest `close` reached by any earlier group.
pub fn remove_ranges_contained_by_others(ranges: &[Range]) -> Vec<Range> {
    let mut sorted = ranges.to_vec();
    sorted.sort();

    let mut outermost = Vec::with_capacity(sorted.len());
    let mut reach_before: Option<usize> = None;
    for group in sorted.chunk_by(|a, b| a.open == b.open) {
        let longest = group[0].close;
        for range in group {
            let covered = if range.open == range.close {
                // A single index is only contained strictly inside another range.
                reach_before.is_some_and(|reach| reach > range.close)
            } else {
                reach_before.is_some_and(|reach| reach >= range.close) || longest > range.close
            };
            if !covered {
                outermost.push(*range);
            }
        }
        reach_before = Some(reach_before.map_or(longest, |reach| reach.max(longest)));
    }
    outermost
}

/// Partition `[0, len)` into the given ranges plus the gaps between them.
///
/// `ranges` are expected to be non-overlapping (as returned by
/// [`remove_ranges_contained_by_others`]). The result is ascending and covers every index
/// exactly once: a leading gap when the first range starts after 0, one gap between any
/// two ranges that are not adjacent, and a trailing gap when the last range ends before
/// `len - 1`.
pub fn fill_in(ranges: &[Range], len: usize) -> Vec<Range> {
    let mut sorted = ranges.to_vec();
    sorted.sort();

    let mut filled = Vec::with_capacity(sorted.len() * 2 + 1);
    let mut next_uncovered = 0;
    for range in sorted {
        if range.open > next_uncovered {
            filled.push(Range::new(next_uncovered, range.open - 1));
        }
        filled.push(range);
        next_uncovered = range.close + 1;
    }
    if next_uncovered < len {
        filled.push(Range::new(next_uncovered, len - 1));
    }
    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn construction_normalizes_order() {
        let range = Range::new(9, 3);
        assert_eq!(range.open(), 3);
        assert_eq!(range.close(), 9);
        assert_eq!(range.len(), 7);
        assert_eq!(range.inner_len(), 5);
    }

    #[test]
    fn inclusive_and_strict_index_checks() {
        let range = Range::new(2, 5);
        assert!(range.has(2));
        assert!(range.has(5));
        assert!(!range.contains_index(2));
        assert!(range.contains_index(3));
        assert!(!range.contains_index(5));
    }

    #[rstest]
    #[case::strictly_inside((0, 10), (2, 5), true)]
    #[case::touches_close((0, 10), (4, 10), true)]
    #[case::touches_open((0, 10), (0, 6), true)]
    #[case::equal((0, 10), (0, 10), false)]
    #[case::outer_is_not_contained((2, 5), (0, 10), false)]
    #[case::disjoint((0, 3), (5, 8), false)]
    #[case::partial_overlap((0, 5), (3, 8), false)]
    fn containment(#[case] outer: (usize, usize), #[case] inner: (usize, usize), #[case] expected: bool) {
        let outer = Range::new(outer.0, outer.1);
        let inner = Range::new(inner.0, inner.1);
        assert_eq!(outer.contains(&inner), expected);
    }

    #[test]
    fn adjacency_and_gaps() {
        let left = Range::new(0, 3);
        let right = Range::new(4, 6);
        let far = Range::new(9, 12);

        assert!(left.is_left_adjacent_to(&right));
        assert!(right.is_right_adjacent_to(&left));
        assert_eq!(left.gap_to(&right), None);
        assert_eq!(right.gap_to(&far), Some(Range::new(7, 8)));
        assert_eq!(far.gap_to(&right), Some(Range::new(7, 8)));
        assert!(left.is_left_of(4));
        assert!(far.is_right_of(8));
        assert!(!left.overlaps(&right));
        assert!(Range::new(2, 5).overlaps(&left));
    }

    #[test]
    fn ordering_puts_longer_first_on_equal_open() {
        let mut ranges = vec![Range::new(3, 4), Range::new(0, 2), Range::new(3, 9)];
        ranges.sort();
        assert_eq!(ranges, vec![Range::new(0, 2), Range::new(3, 9), Range::new(3, 4)]);
    }

    #[test]
    fn removes_nested_ranges() {
        let outermost = remove_ranges_contained_by_others(&[Range::new(2, 5), Range::new(0, 10)]);
        assert_eq!(outermost, vec![Range::new(0, 10)]);
    }

    #[test]
    fn keeps_siblings_and_sorts_them() {
        let ranges = [Range::new(12, 15), Range::new(0, 4), Range::new(1, 3), Range::new(6, 9)];
        assert_eq!(
            remove_ranges_contained_by_others(&ranges),
            vec![Range::new(0, 4), Range::new(6, 9), Range::new(12, 15)]
        );
    }

    #[test]
    fn deep_nesting_keeps_only_the_outermost() {
        let depth = 20_000;
        let ranges: Vec<Range> = (0..depth).map(|i| Range::new(i, 2 * depth - 1 - i)).collect();
        assert_eq!(
            remove_ranges_contained_by_others(&ranges),
            vec![Range::new(0, 2 * depth - 1)]
        );
    }

    #[rstest]
    #[case::duplicates_survive(vec![(2, 5), (2, 5)], vec![(2, 5), (2, 5)])]
    #[case::shared_open(vec![(3, 4), (3, 9)], vec![(3, 9)])]
    #[case::point_on_boundary(vec![(0, 4), (0, 0), (4, 4)], vec![(0, 4), (0, 0), (4, 4)])]
    #[case::point_inside(vec![(0, 4), (2, 2)], vec![(0, 4)])]
    #[case::partial_overlap(vec![(0, 5), (3, 8), (4, 6)], vec![(0, 5), (3, 8)])]
    fn outermost_edge_cases(#[case] input: Vec<(usize, usize)>, #[case] expected: Vec<(usize, usize)>) {
        let ranges: Vec<Range> = input.into_iter().map(|(a, b)| Range::new(a, b)).collect();
        let expected: Vec<Range> = expected.into_iter().map(|(a, b)| Range::new(a, b)).collect();
        assert_eq!(remove_ranges_contained_by_others(&ranges), expected);
    }

    #[test]
    fn fill_in_adds_leading_inner_and_trailing_gaps() {
        let filled = fill_in(&[Range::new(6, 9), Range::new(2, 3)], 12);
        assert_eq!(
            filled,
            vec![
                Range::new(0, 1),
                Range::new(2, 3),
                Range::new(4, 5),
                Range::new(6, 9),
                Range::new(10, 11),
            ]
        );
    }

    #[test]
    fn fill_in_leaves_adjacent_ranges_alone() {
        let filled = fill_in(&[Range::new(0, 3), Range::new(4, 7)], 8);
        assert_eq!(filled, vec![Range::new(0, 3), Range::new(4, 7)]);
    }

    #[test]
    fn fill_in_keeps_single_trailing_index() {
        let filled = fill_in(&[Range::new(0, 3)], 5);
        assert_eq!(filled, vec![Range::new(0, 3), Range::new(4, 4)]);
    }

    #[test]
    fn fill_in_without_ranges() {
        assert_eq!(fill_in(&[], 0), Vec::<Range>::new());
        assert_eq!(fill_in(&[], 1), vec![Range::new(0, 0)]);
        assert_eq!(fill_in(&[], 5), vec![Range::new(0, 4)]);
    }

    #[test]
    fn slices() {
        let text = "a${b}c";
        let range = Range::new(1, 4);
        assert_eq!(range.slice(text), "${b}");
        assert_eq!(range.inner_slice(text), "{b");
        assert_eq!(Range::new(3, 3).inner_slice(text), "");
    }
}
