//! Type tags
//!
//! Tags are kept in their fully expanded form. The YAML shorthand `!!int` expands to
//! `tag:yaml.org,2002:int`; any other spelling (`!local`, a URI) is kept verbatim.

use serde::Serialize;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

pub const YAML_TAG_PREFIX: &str = "tag:yaml.org,2002:";
const SHORTHAND_PREFIX: &str = "!!";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Tag(String);

impl Tag {
    pub const STR: &'static str = "tag:yaml.org,2002:str";
    pub const INT: &'static str = "tag:yaml.org,2002:int";
    pub const FLOAT: &'static str = "tag:yaml.org,2002:float";
    pub const BOOL: &'static str = "tag:yaml.org,2002:bool";
    pub const NULL: &'static str = "tag:yaml.org,2002:null";

    pub fn new(tag: &str) -> Self {
        match tag.strip_prefix(SHORTHAND_PREFIX) {
            Some(name) => Tag(format!("{}{}", YAML_TAG_PREFIX, name)),
            None => Tag(tag.to_string()),
        }
    }

    pub fn str() -> Self {
        Tag(Self::STR.to_string())
    }

    pub fn int() -> Self {
        Tag(Self::INT.to_string())
    }

    pub fn float() -> Self {
        Tag(Self::FLOAT.to_string())
    }

    pub fn bool() -> Self {
        Tag(Self::BOOL.to_string())
    }

    pub fn null() -> Self {
        Tag(Self::NULL.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `int` for `tag:yaml.org,2002:int`, `None` outside the YAML namespace.
    pub fn yaml_name(&self) -> Option<&str> {
        self.0.strip_prefix(YAML_TAG_PREFIX)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.yaml_name() {
            Some(name) => write!(f, "{}{}", SHORTHAND_PREFIX, name),
            None => f.write_str(&self.0),
        }
    }
}

impl From<&str> for Tag {
    fn from(tag: &str) -> Self {
        Tag::new(tag)
    }
}

impl FromStr for Tag {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Tag::new(s))
    }
}

impl AsRef<str> for Tag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
