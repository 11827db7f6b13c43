//! Name → format lookup
//!
//! The CLI and library callers select readers and writers by name (`creole`, `html`, ...)
//! or by file extension. Names are unique: registering a second format under a taken name
//! replaces the first.

use std::collections::BTreeMap;

use crate::error::FormatError;
use crate::format::Format;
use crate::formats::{
    CreoleFormat, HtmlFormat, MarkdownFormat, RestFormat, TextileFormat, TreeFormat,
};
use crate::ConversionOptions;
use creole_parser::Document;
use log::debug;

/// Formats by name, iterated in name order.
///
/// ```ignore
/// let registry = FormatRegistry::with_defaults();
/// let html = registry.convert("= Title", "creole", "html")?;
/// ```
pub struct FormatRegistry {
    formats: BTreeMap<String, Box<dyn Format>>,
}

impl FormatRegistry {
    /// A registry with no formats.
    pub fn new() -> Self {
        FormatRegistry {
            formats: BTreeMap::new(),
        }
    }

    pub fn register<F: Format + 'static>(&mut self, format: F) {
        self.formats
            .insert(format.name().to_string(), Box::new(format));
    }

    pub fn get(&self, name: &str) -> Result<&dyn Format, FormatError> {
        self.formats
            .get(name)
            .map(|f| f.as_ref())
            .ok_or_else(|| FormatError::FormatNotFound(name.to_string()))
    }

    pub fn has(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn list_formats(&self) -> Vec<String> {
        self.formats.keys().cloned().collect()
    }

    /// First format, by name, claiming `extension` (with or without the dot, any case).
    pub fn for_extension(&self, extension: &str) -> Option<&dyn Format> {
        let extension = extension.trim_start_matches('.').to_ascii_lowercase();
        self.formats
            .values()
            .find(|format| format.file_extensions().contains(&extension.as_str()))
            .map(|format| format.as_ref())
    }

    /// Read `source` with the reader registered as `format`.
    pub fn parse(&self, source: &str, format: &str) -> Result<Document, FormatError> {
        let reader = self.get(format)?;
        if !reader.supports_parsing() {
            return Err(FormatError::NotSupported(format!(
                "Format '{}' does not support parsing",
                format
            )));
        }
        reader.parse(source)
    }

    /// Render `doc` with the writer registered as `format`.
    pub fn serialize(&self, doc: &Document, format: &str) -> Result<String, FormatError> {
        let writer = self.get(format)?;
        if !writer.supports_serialization() {
            return Err(FormatError::NotSupported(format!(
                "Format '{}' does not support serialization",
                format
            )));
        }
        writer.serialize(doc)
    }

    pub fn convert(&self, source: &str, from: &str, to: &str) -> Result<String, FormatError> {
        debug!("converting {} bytes from {} to {}", source.len(), from, to);
        let doc = self.parse(source, from)?;
        self.serialize(&doc, to)
    }

    /// Every built-in format with default [`ConversionOptions`].
    pub fn with_defaults() -> Self {
        Self::with_options(&ConversionOptions::default())
    }

    /// Every built-in format, configured from `options`.
    pub fn with_options(options: &ConversionOptions) -> Self {
        let mut registry = Self::new();
        registry.register(CreoleFormat::new(options.clone()));
        registry.register(HtmlFormat::new(options.clone()));
        registry.register(TextileFormat::new(options.clone()));
        registry.register(RestFormat::new(options.clone()));
        registry.register(MarkdownFormat::new(options.clone()));
        registry.register(TreeFormat);
        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
