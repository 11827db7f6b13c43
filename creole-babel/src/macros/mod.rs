//! Macro layer
//!
//! Macros are looked up by name at render time. The parser only records the call (name,
//! argument string, optional body); whether the macro exists, accepts its arguments and
//! succeeds is decided here, and any failure turns into an inline marker instead of an error.

pub mod args;
pub mod builtins;
pub mod registry;

pub use args::MacroArgs;
pub use registry::{
    Macro, MacroCall, MacroError, MacroFailure, MacroOutput, MacroRegistry, MacroResult,
};

use creole_parser::NodeRef;

/// A macro call written back as Creole: `<<name args>>body<</name>>`, or the tag alone.
pub fn macro_markup(node: NodeRef<'_>) -> String {
    let name = node.macro_name().unwrap_or("");
    let args = node.macro_args().unwrap_or("");
    let open = if args.is_empty() {
        format!("<<{}>>", name)
    } else {
        format!("<<{} {}>>", name, args)
    };
    match node.content() {
        Some(body) => format!("{}{}<</{}>>", open, body, name),
        None => open,
    }
}

/// Expansion for backends that embed macro output as raw HTML: the macro's output, or its
/// failure marker in its place. `toc` only means something to the HTML backend and expands
/// to nothing here.
pub fn expand_or_marker(registry: &MacroRegistry, node: NodeRef<'_>, verbose: u8) -> String {
    if node.macro_name() == Some("toc") && !registry.has("toc") {
        log::debug!("dropping toc: no table of contents in this format");
        return String::new();
    }
    registry
        .render(node, verbose)
        .unwrap_or_else(|failure| failure.to_string())
}
