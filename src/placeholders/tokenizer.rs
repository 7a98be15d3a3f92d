//! Placeholder tokenizer
//!
//! Splits a scalar into [`SubstitutableValues`] in four steps:
//!
//! 1. Index balanced delimiters (quotes and escapes honored).
//! 2. Keep the `{` ranges that are preceded by `$` and closed by `}`. A bare `{...}` is
//!    ordinary text and produces no diagnostic.
//! 3. Drop every placeholder nested in another one.
//! 4. Fill the gaps with literal ranges so that the whole input is covered.
//!
//! Text inside a quote region is literal, so `"${a}"` (quotes included) tokenizes to a
//! single literal. [`Tokenizer::without_quotes`] builds a tokenizer that finds
//! placeholders inside quotes as well.

use super::value::{SubstitutableValue, SubstitutableValues, PLACEHOLDER_END, PLACEHOLDER_START};
use crate::diagnostics::{codes, Diagnostic, Position};
use crate::error::SyntaxError;
use crate::text::delimiters::{DelimiterIndex, DelimiterSet};
use crate::text::range::{fill_in, remove_ranges_contained_by_others, Range};
use once_cell::sync::Lazy;

/// The delimiter that follows `$` in [`PLACEHOLDER_START`].
const PLACEHOLDER_OPENER: char = '{';

static DEFAULT_TOKENIZER: Lazy<Tokenizer> = Lazy::new(Tokenizer::default);

/// Tokenize `text` with the default delimiters.
pub fn tokenize(text: &str) -> SubstitutableValues {
    DEFAULT_TOKENIZER.tokenize(text)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokenizer {
    delimiters: DelimiterSet,
}

impl Tokenizer {
    /// `delimiters` must pair `{` with `}`.
    pub fn new(delimiters: DelimiterSet) -> Result<Self, SyntaxError> {
        if delimiters.closer_for(PLACEHOLDER_OPENER) != Some(PLACEHOLDER_END) {
            return Err(SyntaxError::MissingPlaceholderDelimiters);
        }
        Ok(Self { delimiters })
    }

    pub fn delimiters(&self) -> &DelimiterSet {
        &self.delimiters
    }

    /// A tokenizer that also finds placeholders inside quoted regions.
    pub fn without_quotes(&self) -> Self {
        Self {
            delimiters: self.delimiters.without_quotes(),
        }
    }

    /// Every genuine `${...}` range, nested ones included, from the `$` to the `}`.
    pub fn placeholder_ranges(&self, text: &str) -> Vec<Range> {
        self.placeholder_ranges_in(text, &self.delimiters.index(text))
    }

    fn placeholder_ranges_in(&self, text: &str, index: &DelimiterIndex) -> Vec<Range> {
        index
            .ranges_for(PLACEHOLDER_OPENER)
            .iter()
            .filter_map(|range| {
                let marker_at = range.open().checked_sub(1)?;
                let starts_with_marker = text
                    .get(marker_at..)
                    .is_some_and(|rest| rest.starts_with(PLACEHOLDER_START));
                let closed_by_end = text
                    .get(range.close()..)
                    .is_some_and(|rest| rest.starts_with(PLACEHOLDER_END));
                (starts_with_marker && closed_by_end).then(|| range.with_open(marker_at))
            })
            .collect()
    }

    pub fn tokenize(&self, text: &str) -> SubstitutableValues {
        let index = self.delimiters.index(text);
        self.segments(text, &index)
    }

    /// Tokenize and report openers that were never closed.
    ///
    /// Unclosed openers are not errors: the text they start stays literal. The
    /// diagnostics only make them visible.
    pub fn tokenize_with_diagnostics(&self, text: &str) -> (SubstitutableValues, Vec<Diagnostic>) {
        let index = self.delimiters.index(text);
        let diagnostics = index
            .unclosed()
            .iter()
            .map(|unclosed| {
                tracing::debug!(
                    opener = %unclosed.opener,
                    index = unclosed.index,
                    "unclosed delimiter"
                );
                let column = text[..unclosed.index].chars().count();
                Diagnostic::info(
                    codes::UNBALANCED_DELIMITER,
                    format!("`{}` is never closed", unclosed.opener),
                )
                .at(Position::new(0, column))
            })
            .collect();
        (self.segments(text, &index), diagnostics)
    }

    fn segments(&self, text: &str, index: &DelimiterIndex) -> SubstitutableValues {
        let placeholders =
            remove_ranges_contained_by_others(&self.placeholder_ranges_in(text, index));

        fill_in(&placeholders, text.len())
            .into_iter()
            .map(|range| {
                if placeholders.binary_search(&range).is_ok() {
                    let body = &text[range.open() + PLACEHOLDER_START.len()..range.close()];
                    SubstitutableValue::from_placeholder_body(body)
                } else {
                    SubstitutableValue::literal(range.slice(text))
                }
            })
            .collect()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self {
            delimiters: DelimiterSet::default(),
        }
    }
}
