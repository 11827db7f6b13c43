//! Textile format implementation (serialization only)
//!
//! Macros have no Textile form: their HTML output is embedded as is, which Textile passes
//! through. Unknown elements are rewrapped in `<notextile>`.

pub mod serializer;

use crate::error::FormatError;
use crate::format::Format;
use crate::ConversionOptions;
use creole_parser::Document;

pub use serializer::{serialize_to_textile, TextileRenderer};

#[derive(Debug, Clone, Default)]
pub struct TextileFormat {
    options: ConversionOptions,
}

impl TextileFormat {
    pub fn new(options: ConversionOptions) -> Self {
        Self { options }
    }
}

impl Format for TextileFormat {
    fn name(&self) -> &str {
        "textile"
    }

    fn description(&self) -> &str {
        "Textile markup"
    }

    fn file_extensions(&self) -> &[&str] {
        &["textile"]
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        Ok(serialize_to_textile(doc, &self.options)?)
    }
}
