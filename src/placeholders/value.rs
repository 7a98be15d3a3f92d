//! The segment model
//!
//! [`SubstitutableValue`] is one segment of a tokenized scalar and
//! [`SubstitutableValues`] the ordered sequence of them. Both render back to the exact
//! source text through `Display`:
//!
//! - literal: the text itself
//! - placeholder: `${` + `?` when optional + path + `}`

use serde::Serialize;
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

pub const PLACEHOLDER_START: &str = "${";
pub const PLACEHOLDER_END: char = '}';
pub const OPTIONAL_MARKER: char = '?';

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SubstitutableValue {
    is_placeholder: bool,
    is_optional: bool,
    text: String,
}

impl SubstitutableValue {
    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            is_placeholder: false,
            is_optional: false,
            text: text.into(),
        }
    }

    /// A placeholder referring to `path`.
    pub fn placeholder(path: impl Into<String>, is_optional: bool) -> Self {
        Self {
            is_placeholder: true,
            is_optional,
            text: path.into(),
        }
    }

    /// A placeholder from the text between `${` and `}`, honoring a leading `?`.
    pub fn from_placeholder_body(body: &str) -> Self {
        match body.strip_prefix(OPTIONAL_MARKER) {
            Some(path) => Self::placeholder(path, true),
            None => Self::placeholder(body, false),
        }
    }

    /// Classify a raw token: `${...}` is a placeholder, anything else a literal.
    pub fn from_token(token: &str) -> Self {
        token
            .strip_prefix(PLACEHOLDER_START)
            .and_then(|rest| rest.strip_suffix(PLACEHOLDER_END))
            .map(Self::from_placeholder_body)
            .unwrap_or_else(|| Self::literal(token))
    }

    pub fn is_placeholder(&self) -> bool {
        self.is_placeholder
    }

    /// Always false for literals.
    pub fn is_optional(&self) -> bool {
        self.is_optional
    }

    /// The reference path for placeholders, the literal text otherwise.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in bytes of the rendered segment.
    pub fn reconstructed_len(&self) -> usize {
        if !self.is_placeholder {
            return self.text.len();
        }
        let optional = if self.is_optional {
            OPTIONAL_MARKER.len_utf8()
        } else {
            0
        };
        PLACEHOLDER_START.len() + optional + self.text.len() + PLACEHOLDER_END.len_utf8()
    }
}

impl fmt::Display for SubstitutableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_placeholder {
            return f.write_str(&self.text);
        }
        f.write_str(PLACEHOLDER_START)?;
        if self.is_optional {
            write!(f, "{}", OPTIONAL_MARKER)?;
        }
        write!(f, "{}{}", self.text, PLACEHOLDER_END)
    }
}

/// An ordered, lossless segmentation of a scalar string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SubstitutableValues(Vec<SubstitutableValue>);

impl SubstitutableValues {
    pub fn new(values: Vec<SubstitutableValue>) -> Self {
        Self(values)
    }

    /// Tokenize with the default delimiters.
    pub fn parse(text: &str) -> Self {
        super::tokenize(text)
    }

    pub fn has_placeholders(&self) -> bool {
        self.0.iter().any(SubstitutableValue::is_placeholder)
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &SubstitutableValue> {
        self.0.iter().filter(|value| value.is_placeholder())
    }

    /// Length in bytes of the rendered sequence.
    pub fn reconstructed_len(&self) -> usize {
        self.0.iter().map(SubstitutableValue::reconstructed_len).sum()
    }

    pub fn into_vec(self) -> Vec<SubstitutableValue> {
        self.0
    }
}

impl Deref for SubstitutableValues {
    type Target = [SubstitutableValue];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromIterator<SubstitutableValue> for SubstitutableValues {
    fn from_iter<I: IntoIterator<Item = SubstitutableValue>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for SubstitutableValues {
    type Item = SubstitutableValue;
    type IntoIter = std::vec::IntoIter<SubstitutableValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a SubstitutableValues {
    type Item = &'a SubstitutableValue;
    type IntoIter = std::slice::Iter<'a, SubstitutableValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for SubstitutableValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for value in &self.0 {
            write!(f, "{}", value)?;
        }
        Ok(())
    }
}

impl FromStr for SubstitutableValues {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}
