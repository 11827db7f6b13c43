//! The closed set of node kinds

use std::fmt;

/// Every node in a [`Document`](super::Document) carries exactly one of these kinds.
///
///     The set is closed: emitters dispatch on it with an exhaustive `match`, so adding a
///     kind is a compile-time change for every backend. `Unknown` is only produced by the
///     HTML input direction, for elements that have no wiki markup counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Document,
    Paragraph,
    Header,
    BulletList,
    NumberList,
    ListItem,
    Table,
    TableRow,
    TableCell,
    TableHead,
    Link,
    Image,
    MacroBlock,
    MacroInline,
    PreBlock,
    PreInline,
    Text,
    Break,
    Line,
    Separator,
    Emphasis,
    Strong,
    Monospace,
    Underline,
    Delete,
    Small,
    Superscript,
    Subscript,
    Unknown,
}

impl NodeKind {
    /// The snake_case name used in debug output and error messages.
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Document => "document",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Header => "header",
            NodeKind::BulletList => "bullet_list",
            NodeKind::NumberList => "number_list",
            NodeKind::ListItem => "list_item",
            NodeKind::Table => "table",
            NodeKind::TableRow => "table_row",
            NodeKind::TableCell => "table_cell",
            NodeKind::TableHead => "table_head",
            NodeKind::Link => "link",
            NodeKind::Image => "image",
            NodeKind::MacroBlock => "macro_block",
            NodeKind::MacroInline => "macro_inline",
            NodeKind::PreBlock => "pre_block",
            NodeKind::PreInline => "pre_inline",
            NodeKind::Text => "text",
            NodeKind::Break => "break",
            NodeKind::Line => "line",
            NodeKind::Separator => "separator",
            NodeKind::Emphasis => "emphasis",
            NodeKind::Strong => "strong",
            NodeKind::Monospace => "monospace",
            NodeKind::Underline => "underline",
            NodeKind::Delete => "delete",
            NodeKind::Small => "small",
            NodeKind::Superscript => "superscript",
            NodeKind::Subscript => "subscript",
            NodeKind::Unknown => "unknown",
        }
    }

    pub fn is_list(self) -> bool {
        matches!(self, NodeKind::BulletList | NodeKind::NumberList)
    }

    /// Symmetric two-delimiter spans such as `**strong**`.
    pub fn is_typeface(self) -> bool {
        matches!(
            self,
            NodeKind::Emphasis
                | NodeKind::Strong
                | NodeKind::Monospace
                | NodeKind::Underline
                | NodeKind::Delete
                | NodeKind::Small
                | NodeKind::Superscript
                | NodeKind::Subscript
        )
    }

    /// Kinds rendered on their own lines rather than inside running text.
    pub fn is_block(self) -> bool {
        matches!(
            self,
            NodeKind::Document
                | NodeKind::Paragraph
                | NodeKind::Header
                | NodeKind::BulletList
                | NodeKind::NumberList
                | NodeKind::ListItem
                | NodeKind::Table
                | NodeKind::TableRow
                | NodeKind::MacroBlock
                | NodeKind::PreBlock
                | NodeKind::Line
                | NodeKind::Separator
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typeface_kinds_are_not_blocks() {
        for kind in [
            NodeKind::Emphasis,
            NodeKind::Strong,
            NodeKind::Monospace,
            NodeKind::Underline,
            NodeKind::Delete,
            NodeKind::Small,
            NodeKind::Superscript,
            NodeKind::Subscript,
        ] {
            assert!(kind.is_typeface());
            assert!(!kind.is_block());
        }
    }

    #[test]
    fn names_are_snake_case() {
        assert_eq!(NodeKind::BulletList.to_string(), "bullet_list");
        assert_eq!(NodeKind::MacroInline.name(), "macro_inline");
    }
}
