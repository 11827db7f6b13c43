//! The `Format` trait
//!
//! A format is a named reader and/or writer of the document tree. Readers turn markup into a
//! [`Document`], writers render a [`Document`] through a [`Renderer`](crate::Renderer). The
//! registry only talks to formats through this trait.

use crate::error::FormatError;
use creole_parser::Document;

/// A document format known to the [`FormatRegistry`](crate::FormatRegistry).
///
/// Only `name` is required. A writer overrides `supports_serialization` and `serialize`, a
/// reader `supports_parsing` and `parse`; the defaults answer "unsupported".
///
/// ```ignore
/// struct Plain;
///
/// impl Format for Plain {
///     fn name(&self) -> &str {
///         "plain"
///     }
///
///     fn supports_serialization(&self) -> bool {
///         true
///     }
///
///     fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
///         Ok(doc.root().plain_text())
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// Registry key, also accepted by `--from` / `--to`.
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// Extensions without the dot, lowercase.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    fn supports_parsing(&self) -> bool {
        false
    }

    fn supports_serialization(&self) -> bool {
        false
    }

    /// Markup → tree. Readers never fail on malformed input; they build what they can.
    fn parse(&self, _source: &str) -> Result<Document, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support parsing",
            self.name()
        )))
    }

    /// Tree → markup.
    fn serialize(&self, _doc: &Document) -> Result<String, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support serialization",
            self.name()
        )))
    }
}
