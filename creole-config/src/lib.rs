//! Shared configuration loader for the creole converter.
//!
//! `defaults/creole.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`CreoleConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use creole_babel::ConversionOptions;
use creole_parser::ParserOptions;
use serde::Deserialize;
use std::path::Path;

pub use creole_babel::UnknownStrategy as UnknownNodes;

const DEFAULT_TOML: &str = include_str!("../defaults/creole.default.toml");

/// Top-level configuration consumed by creole applications.
#[derive(Debug, Clone, Deserialize)]
pub struct CreoleConfig {
    pub parser: ParserConfig,
    pub html: HtmlConfig,
    pub emit: EmitConfig,
    pub convert: ConvertConfig,
}

/// Mirrors [`ParserOptions`].
#[derive(Debug, Clone, Deserialize)]
pub struct ParserConfig {
    pub blog_line_breaks: bool,
    pub max_nesting: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HtmlConfig {
    pub verbose: u8,
    pub toc_placeholder_escape: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmitConfig {
    pub unknown_nodes: UnknownNodes,
}

/// Formats used when the command line names none.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    pub default_from: String,
    pub default_to: String,
}

impl CreoleConfig {
    pub fn parser_options(&self) -> ParserOptions {
        ParserOptions {
            blog_line_breaks: self.parser.blog_line_breaks,
            max_nesting: self.parser.max_nesting,
        }
    }

    /// Options for the format registry, with the built-in macros.
    pub fn conversion_options(&self) -> ConversionOptions {
        ConversionOptions {
            parser: self.parser_options(),
            unknown_nodes: self.emit.unknown_nodes,
            verbose: self.html.verbose,
            escape_repeated_toc: self.html.toc_placeholder_escape,
            ..ConversionOptions::default()
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override, e.g. from a command-line flag.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<CreoleConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<CreoleConfig, ConfigError> {
    Loader::new().build()
}
