//! Processor registry
//!
//! An ordinary value built once and passed by reference to whoever converts scalars.
//! Lookup walks the processors in registration order and the first compatible one wins.

use super::processors::{
    BoolProcessor, FloatProcessor, IntProcessor, NullProcessor, ScalarValue, StringProcessor,
    TagProcessor,
};
use super::tag::Tag;
use crate::diagnostics::{codes, Diagnostic};
use crate::placeholders::Tokenizer;
use serde::Serialize;

/// The outcome of one conversion: always a value, plus what went wrong on the way.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversion {
    pub value: ScalarValue,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl Conversion {
    fn clean(value: ScalarValue) -> Self {
        Self {
            value,
            diagnostics: Vec::new(),
        }
    }

    fn fallback(raw: &str, diagnostic: Diagnostic) -> Self {
        Self {
            value: ScalarValue::Text(raw.to_string()),
            diagnostics: vec![diagnostic],
        }
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct TagRegistry {
    processors: Vec<Box<dyn TagProcessor>>,
}

impl TagRegistry {
    /// An empty registry: every tag is unknown.
    pub fn new() -> Self {
        Self::default()
    }

    /// The YAML core schema processors, strings tokenized with the default delimiters.
    pub fn with_defaults() -> Self {
        Self::with_tokenizer(Tokenizer::default())
    }

    /// The YAML core schema processors, strings tokenized with `tokenizer`.
    pub fn with_tokenizer(tokenizer: Tokenizer) -> Self {
        let mut registry = Self::new();
        registry
            .register(StringProcessor::new(tokenizer))
            .register(IntProcessor::new())
            .register(FloatProcessor::new())
            .register(BoolProcessor::new())
            .register(NullProcessor::new());
        registry
    }

    /// Append a processor. It is consulted after every processor registered before it.
    pub fn register<P: TagProcessor + 'static>(&mut self, processor: P) -> &mut Self {
        self.processors.push(Box::new(processor));
        self
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    /// The first processor compatible with `tag`. A missing tag is looked up as `!!null`.
    pub fn processor_for(&self, tag: Option<&Tag>) -> Option<&dyn TagProcessor> {
        let null = Tag::null();
        let tag = tag.unwrap_or(&null);
        self.processors
            .iter()
            .find(|processor| processor.is_compatible(tag))
            .map(|processor| processor.as_ref())
    }

    /// Convert `raw` according to `tag`.
    ///
    /// Never fails. An unknown tag or a processor error yields the raw text as
    /// [`ScalarValue::Text`] together with a warning.
    pub fn convert(&self, tag: Option<&Tag>, raw: &str) -> Conversion {
        let Some(processor) = self.processor_for(tag) else {
            let shown = tag.map_or_else(|| Tag::null().to_string(), Tag::to_string);
            tracing::warn!(tag = %shown, "unknown tag, keeping the raw string");
            return Conversion::fallback(
                raw,
                Diagnostic::warning(codes::UNKNOWN_TAG, format!("unknown tag `{}`", shown)),
            );
        };

        match processor.apply(raw) {
            Ok(value) => Conversion::clean(value),
            Err(err) => {
                tracing::warn!(processor = processor.name(), error = %err, "scalar conversion failed");
                Conversion::fallback(raw, Diagnostic::warning(codes::INVALID_SCALAR, err.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticSeverity;
    use crate::error::CoercionError;

    #[test]
    fn defaults_cover_the_core_schema() {
        let registry = TagRegistry::with_defaults();
        assert_eq!(registry.len(), 5);
        assert_eq!(registry.convert(Some(&Tag::int()), "12").value, ScalarValue::Int(12));
        assert_eq!(registry.convert(Some(&Tag::bool()), "True").value, ScalarValue::Bool(true));
        assert_eq!(registry.convert(Some(&Tag::float()), "0.5").value, ScalarValue::Float(0.5));
        assert_eq!(
            registry.convert(Some(&Tag::str()), "x").value,
            ScalarValue::Text("x".to_string())
        );
    }

    #[test]
    fn missing_tag_means_null() {
        let registry = TagRegistry::with_defaults();
        assert_eq!(registry.processor_for(None).map(|p| p.name()), Some("null"));
        let conversion = registry.convert(None, "anything");
        assert_eq!(conversion.value, ScalarValue::Null);
        assert!(conversion.is_clean());
    }

    #[test]
    fn unknown_tag_falls_back_to_raw_text() {
        let registry = TagRegistry::with_defaults();
        let conversion = registry.convert(Some(&Tag::new("!money")), "12.50 EUR");
        assert_eq!(conversion.value, ScalarValue::Text("12.50 EUR".to_string()));
        assert_eq!(conversion.diagnostics.len(), 1);
        assert_eq!(conversion.diagnostics[0].code, codes::UNKNOWN_TAG);
        assert_eq!(conversion.diagnostics[0].severity, DiagnosticSeverity::Warning);
        assert_eq!(conversion.diagnostics[0].message, "unknown tag `!money`");
    }

    #[test]
    fn processor_failure_falls_back_to_raw_text() {
        let registry = TagRegistry::with_defaults();
        let conversion = registry.convert(Some(&Tag::int()), "twelve");
        assert_eq!(conversion.value, ScalarValue::Text("twelve".to_string()));
        assert_eq!(conversion.diagnostics[0].code, codes::INVALID_SCALAR);
    }

    #[test]
    fn empty_registry_knows_nothing() {
        let registry = TagRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.processor_for(Some(&Tag::str())).is_none());
        assert_eq!(registry.convert(None, "x").diagnostics[0].message, "unknown tag `!!null`");
    }

    #[derive(Debug)]
    struct Shouting;

    impl TagProcessor for Shouting {
        fn name(&self) -> &str {
            "shouting"
        }

        fn is_compatible(&self, tag: &Tag) -> bool {
            tag.as_str() == "!loud" || *tag == Tag::str()
        }

        fn apply(&self, raw: &str) -> Result<ScalarValue, CoercionError> {
            Ok(ScalarValue::Text(raw.to_uppercase()))
        }
    }

    #[test]
    fn first_compatible_processor_wins() {
        let mut registry = TagRegistry::new();
        registry.register(Shouting);
        registry.register(StringProcessor::default());
        assert_eq!(
            registry.convert(Some(&Tag::str()), "hi").value,
            ScalarValue::Text("HI".to_string())
        );

        let mut registry = TagRegistry::with_defaults();
        registry.register(Shouting);
        assert_eq!(
            registry.convert(Some(&Tag::str()), "hi").value,
            ScalarValue::Text("hi".to_string())
        );
        assert_eq!(
            registry.convert(Some(&Tag::new("!loud")), "hi").value,
            ScalarValue::Text("HI".to_string())
        );
    }

    #[test]
    fn aliased_tags() {
        let mut registry = TagRegistry::new();
        registry.register(IntProcessor::new().with_tag("!port"));
        assert_eq!(registry.convert(Some(&Tag::new("!port")), "8080").value, ScalarValue::Int(8080));
    }
}
