//! Balanced delimiter indexing
//!
//! A single left-to-right pass that records, per opening character, every range between
//! an opener and the closer that balanced it. Nesting is tracked with an explicit stack
//! of `(opener, index)` pairs, never recursion, so adversarial nesting depth costs heap
//! and not call stack.
//!
//! ## Rules
//!
//! - A character preceded by an odd number of escape sequences is inert.
//! - Quote delimiters open a literal region. Inside it no other opener is recognized and
//!   only the same quote character closes it.
//! - Outside quotes a closer pops whatever opener is on top of the stack, matching or
//!   not, and the range is filed under the popped opener.
//! - A delimiter that is both an opener and its own closer (`%` in the defaults) closes
//!   when the same character is on top of the stack, and opens otherwise.
//! - A closer with nothing open is ignored.
//! - Openers still on the stack at the end produce no range. They are reported through
//!   [`DelimiterIndex::unclosed`].

use super::is_escaped;
use super::range::Range;
use crate::error::SyntaxError;
use std::collections::HashMap;

pub const DEFAULT_OPENERS: &str = "%`\"{[(<";
pub const DEFAULT_CLOSERS: &str = "%`\"}])>";
pub const DEFAULT_QUOTES: &str = "`\"";
pub const DEFAULT_ESCAPE: &str = "\\";

/// Opener/closer pairs, quote delimiters and the escape marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimiterSet {
    pairs: Vec<(char, char)>,
    quotes: Vec<char>,
    escape: String,
}

impl DelimiterSet {
    /// Pair `openers` and `closers` by position.
    ///
    /// Every quote must be an opener that closes with itself.
    pub fn new(openers: &str, closers: &str, quotes: &str, escape: &str) -> Result<Self, SyntaxError> {
        let openers: Vec<char> = openers.chars().collect();
        let closers: Vec<char> = closers.chars().collect();
        if openers.len() != closers.len() {
            return Err(SyntaxError::UnpairedDelimiters {
                openers: openers.len(),
                closers: closers.len(),
            });
        }
        if escape.is_empty() {
            return Err(SyntaxError::EmptyEscape);
        }

        let pairs: Vec<(char, char)> = openers.into_iter().zip(closers).collect();
        let quotes: Vec<char> = quotes.chars().collect();
        for &quote in &quotes {
            match pairs.iter().find(|(open, _)| *open == quote) {
                None => return Err(SyntaxError::QuoteNotOpener(quote)),
                Some((_, close)) if *close != quote => {
                    return Err(SyntaxError::QuoteNotSelfClosing(quote))
                }
                Some(_) => {}
            }
        }

        Ok(Self {
            pairs,
            quotes,
            escape: escape.to_string(),
        })
    }

    pub fn escape(&self) -> &str {
        &self.escape
    }

    pub fn quotes(&self) -> &[char] {
        &self.quotes
    }

    /// The closer paired with `opener`, if `opener` is one.
    pub fn closer_for(&self, opener: char) -> Option<char> {
        self.pairs
            .iter()
            .find(|(open, _)| *open == opener)
            .map(|(_, close)| *close)
    }

    fn is_opener(&self, ch: char) -> bool {
        self.pairs.iter().any(|(open, _)| *open == ch)
    }

    fn is_closer(&self, ch: char) -> bool {
        self.pairs.iter().any(|(_, close)| *close == ch)
    }

    fn is_quote(&self, ch: char) -> bool {
        self.quotes.contains(&ch)
    }

    /// The same set without quote delimiters: every opener is recognized everywhere.
    pub fn without_quotes(&self) -> Self {
        Self {
            pairs: self.pairs.clone(),
            quotes: Vec::new(),
            escape: self.escape.clone(),
        }
    }

    /// Index all balanced delimiter ranges in `text`.
    pub fn index(&self, text: &str) -> DelimiterIndex {
        let mut ranges: HashMap<char, Vec<Range>> = HashMap::new();
        let mut stack: Vec<(char, usize)> = Vec::new();
        let mut quote: Option<char> = None;

        for (index, ch) in text.char_indices() {
            let opener = self.is_opener(ch);
            let closer = self.is_closer(ch);
            if !opener && !closer {
                continue;
            }
            if is_escaped(text, index, &self.escape) {
                continue;
            }

            if opener && quote.is_none() {
                let closes_own_pair = closer
                    && !self.is_quote(ch)
                    && stack.last().is_some_and(|(top, _)| *top == ch);
                if !closes_own_pair {
                    stack.push((ch, index));
                    if self.is_quote(ch) {
                        quote = Some(ch);
                    }
                    continue;
                }
            }

            if closer {
                let popped = match quote {
                    Some(open_quote) if open_quote == ch => {
                        quote = None;
                        stack.pop()
                    }
                    Some(_) => None,
                    None => stack.pop(),
                };
                if let Some((open_char, open_index)) = popped {
                    ranges
                        .entry(open_char)
                        .or_default()
                        .push(Range::new(open_index, index));
                }
            }
        }

        let unclosed = stack
            .into_iter()
            .map(|(opener, index)| UnclosedDelimiter { opener, index })
            .collect();

        DelimiterIndex { ranges, unclosed }
    }
}

impl Default for DelimiterSet {
    fn default() -> Self {
        Self {
            pairs: DEFAULT_OPENERS.chars().zip(DEFAULT_CLOSERS.chars()).collect(),
            quotes: DEFAULT_QUOTES.chars().collect(),
            escape: DEFAULT_ESCAPE.to_string(),
        }
    }
}

/// An opener that was still open when the input ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnclosedDelimiter {
    pub opener: char,
    /// Byte offset of the opener.
    pub index: usize,
}

/// Balanced ranges per opener, in the order they were closed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DelimiterIndex {
    ranges: HashMap<char, Vec<Range>>,
    unclosed: Vec<UnclosedDelimiter>,
}

impl DelimiterIndex {
    pub fn ranges_for(&self, opener: char) -> &[Range] {
        self.ranges.get(&opener).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn openers(&self) -> impl Iterator<Item = char> + '_ {
        self.ranges.keys().copied()
    }

    /// Openers left on the stack, outermost first.
    pub fn unclosed(&self) -> &[UnclosedDelimiter] {
        &self.unclosed
    }

    pub fn is_balanced(&self) -> bool {
        self.unclosed.is_empty()
    }

    pub fn into_ranges(self) -> HashMap<char, Vec<Range>> {
        self.ranges
    }
}
