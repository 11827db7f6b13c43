//! reStructuredText format implementation (serialization only)
//!
//! Links and images are written as references whose definitions are flushed after the
//! enclosing paragraph, header, top-level list or table; see [`substitutions`]. Macro output
//! is embedded with the `raw` directive, or the `raw-html` role inline, and `toc` becomes a
//! `contents` directive.

pub mod serializer;
pub mod substitutions;

use crate::error::FormatError;
use crate::format::Format;
use crate::ConversionOptions;
use creole_parser::Document;

pub use serializer::{serialize_to_rest, RestRenderer};
pub use substitutions::Substitutions;

#[derive(Debug, Clone, Default)]
pub struct RestFormat {
    options: ConversionOptions,
}

impl RestFormat {
    pub fn new(options: ConversionOptions) -> Self {
        Self { options }
    }
}

impl Format for RestFormat {
    fn name(&self) -> &str {
        "rest"
    }

    fn description(&self) -> &str {
        "reStructuredText"
    }

    fn file_extensions(&self) -> &[&str] {
        &["rst", "rest"]
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        Ok(serialize_to_rest(doc, &self.options)?)
    }
}
