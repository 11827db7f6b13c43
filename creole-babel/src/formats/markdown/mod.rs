//! Markdown format implementation
//!
//! Data Model:
//!
//!     | Node kind | Markdown | Notes |
//!     |-----------|----------|-------|
//!     | header | `#` ATX heading | levels above 6 render as 6 |
//!     | bullet_list / number_list | `-` / `1.` | nested lists indented to the parent item's text |
//!     | table | GFM pipe table | a table without a head row gets an empty one |
//!     | pre_block | fenced code | `#!kind` becomes the info string |
//!     | pre_inline, monospace | code span | |
//!     | underline, small, sup, sub | inline HTML | |
//!     | macro_block / macro_inline | macro output as raw HTML | |
//!
//!     Reading goes the other way: raw HTML blocks and spans come back as `html` macro
//!     calls, block quotes as unknown `blockquote` elements, and code spans as pre_inline.
//!
//! Library
//!
//!     comrak parses. Serialization is a [`Renderer`](crate::Renderer) writing the
//!     Markdown text directly, so list indentation follows the same marker stack the other
//!     text backends use.

pub mod parser;
pub mod serializer;

use crate::error::FormatError;
use crate::format::Format;
use crate::ConversionOptions;
use creole_parser::Document;

pub use parser::parse_from_markdown;
pub use serializer::{serialize_to_markdown, MarkdownRenderer};

#[derive(Debug, Clone, Default)]
pub struct MarkdownFormat {
    options: ConversionOptions,
}

impl MarkdownFormat {
    pub fn new(options: ConversionOptions) -> Self {
        Self { options }
    }
}

impl Format for MarkdownFormat {
    fn name(&self) -> &str {
        "markdown"
    }

    fn description(&self) -> &str {
        "CommonMark Markdown with GFM tables"
    }

    fn file_extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        Ok(parse_from_markdown(source))
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        Ok(serialize_to_markdown(doc, &self.options)?)
    }
}
