//! Parsing module for wiki markup
//!
//!     This module turns raw markup into a [`Document`](crate::creole::ast::Document):
//!         1. Rules: the precedence-ordered grammar, compiled into two matchers. See
//!            [rules](rules).
//!         2. Block scanning: one linear pass, line by line. See [block](block).
//!         3. Inline scanning: spans inside a block's text. See [inline](inline).
//!         4. Building: handlers move a cursor through the tree. See [builder](builder)
//!            and [engine](engine).
//!
//! Why two matchers
//!
//!     Block constructs are line anchored and may span lines (lists, pre blocks, block
//!     macros). Inline constructs live inside one line of text and must not fire before the
//!     block structure is known: `**` at a line start is the beginning of a list item for
//!     the block matcher but a strong delimiter for the inline matcher.
//!
//! Line breaks
//!
//!     How newlines inside a paragraph are treated is chosen once per parse through
//!     [`ParserOptions::blog_line_breaks`]:
//!
//!         - blog mode (default): every newline followed by more text becomes a visible
//!           break, unless the line ends in `\`
//!         - wiki mode: newlines are insignificant and lines are joined with a single space
//!
//!     In both modes a trailing single `\` joins the next line without a space, and a line
//!     following a list item continues that item.

pub mod block;
pub mod builder;
pub mod engine;
pub mod inline;
pub mod rules;

use serde::{Deserialize, Serialize};

pub use engine::{normalize_newlines, parse};

/// Nesting depth used when no explicit bound is configured.
pub const DEFAULT_MAX_NESTING: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Turn newlines inside paragraphs into breaks.
    pub blog_line_breaks: bool,
    /// Upper bound for list depth and typeface nesting. Deeper bullets are clamped and
    /// further delimiters are kept as literal text.
    pub max_nesting: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            blog_line_breaks: true,
            max_nesting: DEFAULT_MAX_NESTING,
        }
    }
}

impl ParserOptions {
    pub fn wiki() -> Self {
        Self {
            blog_line_breaks: false,
            ..Self::default()
        }
    }
}
