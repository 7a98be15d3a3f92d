//! Tag-driven scalar coercion
//!
//! Turns `(tag, raw text)` into a typed [`ScalarValue`]. Strings go through the
//! placeholder tokenizer so that a value such as `${home}/bin` comes out as a
//! concatenation the interpolation pass can resolve.
//!
//! Nothing here is global: build a [`TagRegistry`] once and pass it around.

pub mod processors;
pub mod registry;
pub mod tag;

pub use processors::{
    BoolProcessor, FloatProcessor, IntProcessor, NullProcessor, ScalarValue, StringProcessor,
    TagProcessor,
};
pub use registry::{Conversion, TagRegistry};
pub use tag::Tag;
