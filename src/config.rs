//! Configuration loader
//!
//! `defaults/confscan.default.toml` is embedded into the crate so that the documented
//! defaults and [`ScanConfig::default`] never drift apart. Callers layer their own files
//! on top through [`Loader`] before deserializing into [`ScanConfig`].

use crate::comments::CommentSyntax;
use crate::error::SyntaxError;
use crate::placeholders::Tokenizer;
use crate::text::delimiters::{DEFAULT_CLOSERS, DEFAULT_ESCAPE, DEFAULT_OPENERS, DEFAULT_QUOTES};
use crate::text::DelimiterSet;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/confscan.default.toml");

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct ScanConfig {
    pub comments: CommentConfig,
    pub delimiters: DelimiterConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CommentConfig {
    pub marker: String,
}

impl Default for CommentConfig {
    fn default() -> Self {
        Self {
            marker: crate::comments::scanner::DEFAULT_MARKER.to_string(),
        }
    }
}

/// Delimiter pairs for the balanced indexer. `openers[i]` is closed by `closers[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DelimiterConfig {
    pub openers: String,
    pub closers: String,
    pub quotes: String,
    pub escape: String,
}

impl Default for DelimiterConfig {
    fn default() -> Self {
        Self {
            openers: DEFAULT_OPENERS.to_string(),
            closers: DEFAULT_CLOSERS.to_string(),
            quotes: DEFAULT_QUOTES.to_string(),
            escape: DEFAULT_ESCAPE.to_string(),
        }
    }
}

impl ScanConfig {
    pub fn delimiter_set(&self) -> Result<DelimiterSet, SyntaxError> {
        let d = &self.delimiters;
        DelimiterSet::new(&d.openers, &d.closers, &d.quotes, &d.escape)
    }

    pub fn tokenizer(&self) -> Result<Tokenizer, SyntaxError> {
        Tokenizer::new(self.delimiter_set()?)
    }

    /// The comment marker, escaped with the delimiter escape.
    pub fn comment_syntax(&self) -> Result<CommentSyntax, SyntaxError> {
        CommentSyntax::new(&self.comments.marker, &self.delimiters.escape)
    }

    /// Check that every derived syntax can be built.
    pub fn validate(&self) -> Result<(), SyntaxError> {
        self.tokenizer()?;
        self.comment_syntax()?;
        Ok(())
    }
}

/// Builds a [`ScanConfig`] from the embedded defaults plus any number of TOML layers.
///
/// Later layers win key by key, so a file that only sets `[comments] marker = ";"` keeps
/// the default delimiter set.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// `#` comments and the `%`, backtick, `"`, `{`, `[`, `(`, `<` delimiter pairs.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a project file, e.g. `confscan.toml` given on the command line. The file has
    /// to exist.
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.with_toml_layer(path.as_ref(), true)
    }

    /// Layer a file that may be absent, such as a per-user settings file.
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.with_toml_layer(path.as_ref(), false)
    }

    fn with_toml_layer(mut self, path: &Path, required: bool) -> Self {
        let layer = File::from(path).format(FileFormat::Toml).required(required);
        self.builder = self.builder.add_source(layer);
        self
    }

    /// Override one dotted key, e.g. `("comments.marker", ";")` or
    /// `("delimiters.quotes", "")` to turn quote handling off.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Merge the layers and check that the marker and delimiter set form a usable comment
    /// syntax and tokenizer. An invalid set is reported as [`ConfigError::Message`].
    pub fn build(self) -> Result<ScanConfig, ConfigError> {
        let config: ScanConfig = self.builder.build()?.try_deserialize()?;
        config
            .validate()
            .map_err(|err| ConfigError::Message(err.to_string()))?;
        tracing::debug!(marker = %config.comments.marker, "configuration loaded");
        Ok(config)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The embedded defaults, validated.
pub fn load_defaults() -> Result<ScanConfig, ConfigError> {
    Loader::new().build()
}
