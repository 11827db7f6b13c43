//! Tree visualization of a parsed document
//!
//! Output only, meant for inspecting what the parser (or the HTML/Markdown readers) built.
//!
//! ```text
//! document
//! ├─ header level=1 "Title"
//! └─ paragraph
//!   ├─ text "a "
//!   └─ strong
//!     └─ text "b"
//! ```

use creole_parser::{Document, NodeRef};

use crate::error::FormatError;
use crate::format::Format;

/// One line per node: kind, then whichever attributes the node carries.
fn label(node: NodeRef<'_>) -> String {
    let mut out = node.kind().name().to_string();
    if let Some(tag) = node.tag() {
        out.push_str(&format!(" <{}>", tag));
    }
    if let Some(level) = node.level() {
        out.push_str(&format!(" level={}", level));
    }
    if let Some(name) = node.macro_name() {
        out.push_str(&format!(" macro={}", name));
        if let Some(args) = node.macro_args().filter(|a| !a.is_empty()) {
            out.push_str(&format!(" args={:?}", args));
        }
    }
    if let Some(kind) = node.pre_kind() {
        out.push_str(&format!(" kind={}", kind));
    }
    if let Some(content) = node.content() {
        out.push_str(&format!(" {:?}", content));
    }
    out
}

fn format_node(node: NodeRef<'_>, prefix: &str, is_last: bool, out: &mut String) {
    let connector = if is_last { "└─" } else { "├─" };
    out.push_str(&format!("{}{} {}\n", prefix, connector, label(node)));

    let child_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
    let count = node.child_count();
    for (i, child) in node.children().enumerate() {
        format_node(child, &child_prefix, i + 1 == count, out);
    }
}

pub fn to_tree_str(doc: &Document) -> String {
    let root = doc.root();
    let mut out = format!("{}\n", label(root));
    let count = root.child_count();
    for (i, child) in root.children().enumerate() {
        format_node(child, "", i + 1 == count, &mut out);
    }
    out
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TreeFormat;

impl Format for TreeFormat {
    fn name(&self) -> &str {
        "tree"
    }

    fn description(&self) -> &str {
        "Document tree outline (debugging)"
    }

    fn file_extensions(&self) -> &[&str] {
        &["tree"]
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        Ok(to_tree_str(doc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use creole_parser::{parse, ParserOptions};

    #[test]
    fn outline_uses_box_connectors() {
        let doc = parse("= Title\n\na **b**", &ParserOptions::default());
        insta::assert_snapshot!(to_tree_str(&doc), @r###"
        document
        ├─ header level=1 "Title"
        ├─ line
        └─ paragraph
          ├─ text "a "
          └─ strong
            └─ text "b"
        "###);
    }

    #[test]
    fn macro_attributes_are_listed() {
        let doc = parse("<<toc depth=2>>", &ParserOptions::default());
        let out = to_tree_str(&doc);
        assert!(out.contains("macro_inline macro=toc args=\"depth=2\""), "{}", out);
    }
}
