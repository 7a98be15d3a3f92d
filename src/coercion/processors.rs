//! Built-in tag processors
//!
//! One processor per YAML core schema type. Each accepts its own tag and any extra tags
//! added through `with_tag`, so a document can alias `!port` to the integer processor.

use super::tag::Tag;
use crate::error::CoercionError;
use crate::placeholders::{SubstitutableValues, Tokenizer};
use serde::Serialize;
use std::fmt;

/// A converted scalar.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ScalarValue {
    Null,
    Bool(bool),
    Int(i64),
    /// An integer outside the `i64` range.
    BigInt(i128),
    Float(f64),
    Text(String),
    /// A string holding at least one placeholder, left for the interpolation pass.
    Concatenation(SubstitutableValues),
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Null => f.write_str("null"),
            ScalarValue::Bool(value) => write!(f, "{}", value),
            ScalarValue::Int(value) => write!(f, "{}", value),
            ScalarValue::BigInt(value) => write!(f, "{}", value),
            ScalarValue::Float(value) => write!(f, "{}", value),
            ScalarValue::Text(value) => f.write_str(value),
            ScalarValue::Concatenation(values) => write!(f, "{}", values),
        }
    }
}

/// Converts the raw text of scalars carrying a compatible tag.
pub trait TagProcessor: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    fn is_compatible(&self, tag: &Tag) -> bool;

    fn apply(&self, raw: &str) -> Result<ScalarValue, CoercionError>;
}

/// The tags one processor accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TagSet(Vec<Tag>);

impl TagSet {
    fn of(tag: Tag) -> Self {
        TagSet(vec![tag])
    }

    fn with(mut self, tag: Tag) -> Self {
        if !self.0.contains(&tag) {
            self.0.push(tag);
        }
        self
    }

    fn contains(&self, tag: &Tag) -> bool {
        self.0.contains(tag)
    }
}

macro_rules! tagged_processor {
    ($name:ident, $tag:expr) => {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            tags: TagSet,
        }

        impl $name {
            pub fn new() -> Self {
                Self {
                    tags: TagSet::of($tag),
                }
            }

            /// Also accept `tag`.
            pub fn with_tag(self, tag: impl Into<Tag>) -> Self {
                Self {
                    tags: self.tags.with(tag.into()),
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

tagged_processor!(IntProcessor, Tag::int());
tagged_processor!(FloatProcessor, Tag::float());
tagged_processor!(BoolProcessor, Tag::bool());
tagged_processor!(NullProcessor, Tag::null());

impl TagProcessor for IntProcessor {
    fn name(&self) -> &str {
        "int"
    }

    fn is_compatible(&self, tag: &Tag) -> bool {
        self.tags.contains(tag)
    }

    /// Decimal, `0x` hexadecimal or `0o` octal, with an optional sign.
    fn apply(&self, raw: &str) -> Result<ScalarValue, CoercionError> {
        let invalid = || CoercionError::InvalidInt {
            raw: raw.to_string(),
        };

        let (negative, unsigned) = match raw.as_bytes().first() {
            Some(b'-') => (true, &raw[1..]),
            Some(b'+') => (false, &raw[1..]),
            _ => (false, raw),
        };
        let (radix, digits) = if let Some(hex) = unsigned.strip_prefix("0x") {
            (16, hex)
        } else if let Some(octal) = unsigned.strip_prefix("0o") {
            (8, octal)
        } else {
            (10, unsigned)
        };
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return Err(invalid());
        }

        let magnitude = i128::from_str_radix(digits, radix).map_err(|_| CoercionError::IntOutOfRange {
            raw: raw.to_string(),
        })?;
        let value = if negative { -magnitude } else { magnitude };
        Ok(match i64::try_from(value) {
            Ok(small) => ScalarValue::Int(small),
            Err(_) => ScalarValue::BigInt(value),
        })
    }
}

impl TagProcessor for FloatProcessor {
    fn name(&self) -> &str {
        "float"
    }

    fn is_compatible(&self, tag: &Tag) -> bool {
        self.tags.contains(tag)
    }

    fn apply(&self, raw: &str) -> Result<ScalarValue, CoercionError> {
        let value = match raw {
            ".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF" => f64::INFINITY,
            "-.inf" | "-.Inf" | "-.INF" => f64::NEG_INFINITY,
            ".nan" | ".NaN" | ".NAN" => f64::NAN,
            _ => raw.parse::<f64>().map_err(|_| CoercionError::InvalidFloat {
                raw: raw.to_string(),
            })?,
        };
        Ok(ScalarValue::Float(value))
    }
}

impl TagProcessor for BoolProcessor {
    fn name(&self) -> &str {
        "bool"
    }

    fn is_compatible(&self, tag: &Tag) -> bool {
        self.tags.contains(tag)
    }

    /// `true` in any case is true, everything else is false.
    fn apply(&self, raw: &str) -> Result<ScalarValue, CoercionError> {
        Ok(ScalarValue::Bool(raw.eq_ignore_ascii_case("true")))
    }
}

impl TagProcessor for NullProcessor {
    fn name(&self) -> &str {
        "null"
    }

    fn is_compatible(&self, tag: &Tag) -> bool {
        self.tags.contains(tag)
    }

    fn apply(&self, _raw: &str) -> Result<ScalarValue, CoercionError> {
        Ok(ScalarValue::Null)
    }
}

/// Strings, split into a concatenation when they hold placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringProcessor {
    tags: TagSet,
    tokenizer: Tokenizer,
}

impl StringProcessor {
    pub fn new(tokenizer: Tokenizer) -> Self {
        Self {
            tags: TagSet::of(Tag::str()),
            tokenizer,
        }
    }

    pub fn with_tag(self, tag: impl Into<Tag>) -> Self {
        Self {
            tags: self.tags.with(tag.into()),
            ..self
        }
    }
}

impl Default for StringProcessor {
    fn default() -> Self {
        Self::new(Tokenizer::default())
    }
}

impl TagProcessor for StringProcessor {
    fn name(&self) -> &str {
        "str"
    }

    fn is_compatible(&self, tag: &Tag) -> bool {
        self.tags.contains(tag)
    }

    fn apply(&self, raw: &str) -> Result<ScalarValue, CoercionError> {
        let segments = self.tokenizer.tokenize(raw);
        Ok(if segments.has_placeholders() {
            ScalarValue::Concatenation(segments)
        } else {
            ScalarValue::Text(raw.to_string())
        })
    }
}
