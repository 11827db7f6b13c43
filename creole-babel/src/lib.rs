//! Multi-format conversion for Creole documents
//!
//!     This crate renders the document tree built by `creole-parser` into HTML, Creole,
//!     Textile, reStructuredText and Markdown, and builds the same tree from HTML and Markdown
//!     input so any supported input can be converted to any supported output.
//!
//! Architecture
//!
//!     - Format trait: uniform interface for all formats (parsing and/or serialization)
//!     - FormatRegistry: centralized discovery and selection of formats
//!     - Renderer trait: one render method per node kind, shared by every output backend,
//!       with a pluggable strategy for kinds a backend cannot express
//!     - Macro layer: name → callable mapping consulted at render time
//!
//!     This is a pure lib: it powers the creole cli but is shell agnostic. Nothing here prints,
//!     reads environment variables or touches files; diagnostics go through `log`, panics
//!     raised by macros included.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── emit                    # Renderer trait, unknown-node strategies, list markers
//!     ├── macros                  # argument parsing, registry, built-in macros
//!     ├── common                  # helpers shared by several backends (table layout)
//!     ├── formats
//!     │   ├── <format>
//!     │   │   ├── parser.rs       # input direction, when the format has one
//!     │   │   ├── serializer.rs   # Renderer implementation
//!     │   │   └── mod.rs
//!     ├── lib.rs
//!
//! Testing
//!     tests
//!     └── <format>_<topic>.rs
//!
//! Round Tripping
//!
//!     Creole → HTML → Creole reproduces the source for constructs that have a faithful HTML
//!     form. Some cases are lossy on purpose: `##monospace##` and `{{{inline pre}}}` both render
//!     as `<tt>`, paragraph-internal line breaks follow the parser's line-break mode, and
//!     elements with no wiki counterpart depend on the unknown-node strategy.

pub mod common;
pub mod emit;
pub mod error;
pub mod format;
pub mod formats;
pub mod macros;
pub mod registry;

pub use emit::{Renderer, UnknownStrategy};
pub use error::{EmitError, EmitResult, FormatError};
pub use format::Format;
pub use macros::MacroRegistry;
pub use registry::FormatRegistry;

use creole_parser::ParserOptions;

/// Settings shared by the built-in formats.
#[derive(Debug, Clone)]
pub struct ConversionOptions {
    /// Used by every format that parses Creole.
    pub parser: ParserOptions,
    pub unknown_nodes: UnknownStrategy,
    /// Above 1, macro failures are also logged at warn level.
    pub verbose: u8,
    /// Render `toc` calls after the first one as escaped literal text instead of dropping them.
    pub escape_repeated_toc: bool,
    pub macros: MacroRegistry,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            parser: ParserOptions::default(),
            unknown_nodes: UnknownStrategy::default(),
            verbose: 1,
            escape_repeated_toc: true,
            macros: MacroRegistry::with_builtins(),
        }
    }
}
