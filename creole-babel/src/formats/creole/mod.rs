//! Creole format implementation
//!
//! Parsing is delegated to `creole_parser`; serialization writes the tree back as Creole 1.0
//! markup with the additions the parser understands (`^^`, `,,`, `--`, `~~`, `#!kind` pre
//! blocks, block and inline macros).

pub mod serializer;

use crate::error::FormatError;
use crate::format::Format;
use crate::ConversionOptions;
use creole_parser::Document;

pub use serializer::{serialize_to_creole, CreoleRenderer};

#[derive(Debug, Clone, Default)]
pub struct CreoleFormat {
    options: ConversionOptions,
}

impl CreoleFormat {
    pub fn new(options: ConversionOptions) -> Self {
        Self { options }
    }
}

impl Format for CreoleFormat {
    fn name(&self) -> &str {
        "creole"
    }

    fn description(&self) -> &str {
        "Creole 1.0 wiki markup"
    }

    fn file_extensions(&self) -> &[&str] {
        &["creole", "wiki"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        Ok(creole_parser::parse(source, &self.options.parser))
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        Ok(serialize_to_creole(doc, &self.options)?)
    }
}
