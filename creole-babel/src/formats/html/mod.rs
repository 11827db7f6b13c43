//! HTML format implementation
//!
//! Strategy: direct tree → HTML generation for output, html5ever for input.
//!
//! # Data Model
//!
//! | Node kind | HTML element | Notes |
//! |-----------|--------------|-------|
//! | paragraph | `<p>` | a paragraph holding a lone macro tag renders like a block macro |
//! | header | `<h1>`-`<h6>` | levels above 6 render as `<h6>`, `id` added when a TOC is present |
//! | bullet_list / number_list | `<ul>` / `<ol>` | tab-indented by nesting level |
//! | table / table_row / table_cell / table_head | `<table>` `<tr>` `<td>` `<th>` | |
//! | link / image | `<a href>` / `<img src title alt />` | |
//! | pre_block | `<pre>` | `<pre><code class="language-X">` when tagged `#!X` |
//! | pre_inline, monospace | `<tt>` | lossy on the way back: `<tt>` with plain text becomes pre_inline |
//! | emphasis, strong, underline, delete, small, sup, sub | `<i>` `<strong>` `<u>` `<del>` `<small>` `<sup>` `<sub>` | |
//! | macro_block / macro_inline | macro output | `toc` is handled by the renderer itself |
//!
//! # Input
//!
//! [`parser::HtmlTokenizer`] is the seam for the input direction; the default
//! [`parser::Html5everTokenizer`] walks an html5ever DOM into the same node shape.

pub mod parser;
pub mod serializer;
pub mod toc;

use crate::error::FormatError;
use crate::format::Format;
use crate::ConversionOptions;
use creole_parser::Document;

pub use parser::{parse_from_html, Html5everTokenizer, HtmlTokenizer};
pub use serializer::{serialize_to_html, HtmlRenderer};
pub use toc::{TocAggregator, TOC_PLACEHOLDER};

/// HTML fragment output and HTML input
#[derive(Debug, Clone, Default)]
pub struct HtmlFormat {
    options: ConversionOptions,
}

impl HtmlFormat {
    pub fn new(options: ConversionOptions) -> Self {
        Self { options }
    }
}

impl Format for HtmlFormat {
    fn name(&self) -> &str {
        "html"
    }

    fn description(&self) -> &str {
        "HTML fragment"
    }

    fn file_extensions(&self) -> &[&str] {
        &["html", "htm"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        Ok(Html5everTokenizer::new().feed(source))
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        Ok(serialize_to_html(doc, &self.options)?)
    }
}
