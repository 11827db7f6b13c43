//! Markdown parsing (Markdown → document tree)
//!
//! Pipeline: Markdown string → Comrak AST → document tree. Comrak's tree is already nested
//! the way the wiki tree is, so the walk maps node for node; the only reshaping is that
//! list item paragraphs are flattened into the item, as the Creole parser produces them.

use comrak::nodes::{AstNode, ListType, NodeValue};
use comrak::{parse_document, Arena, ComrakOptions};
use creole_parser::{DocNode, Document, NodeId, NodeKind};
use log::debug;

/// Parse a Markdown string into a document tree.
pub fn parse_from_markdown(source: &str) -> Document {
    let arena = Arena::new();
    let options = default_comrak_options();
    let root = parse_document(&arena, source, &options);

    let mut doc = Document::new();
    let top = doc.root_id();
    for child in root.children() {
        convert_block(&mut doc, top, child, 0);
    }
    doc
}

pub(crate) fn default_comrak_options() -> ComrakOptions<'static> {
    let mut options = ComrakOptions::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    options.extension.superscript = true;
    options
}

/// Concatenated text of a Comrak subtree, for headers and image alt text.
fn collect_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut out = String::new();
    for descendant in node.descendants() {
        match &descendant.data.borrow().value {
            NodeValue::Text(text) => out.push_str(text),
            NodeValue::Code(code) => out.push_str(&code.literal),
            NodeValue::SoftBreak | NodeValue::LineBreak => out.push(' '),
            _ => {}
        }
    }
    out
}

/// `depth` is the number of enclosing lists.
fn convert_block<'a>(doc: &mut Document, parent: NodeId, node: &'a AstNode<'a>, depth: usize) {
    let value = node.data.borrow().value.clone();
    match value {
        NodeValue::Heading(heading) => {
            doc.append(
                parent,
                DocNode::new(NodeKind::Header)
                    .with_content(collect_text(node).trim())
                    .with_level(heading.level as usize),
            );
        }

        NodeValue::Paragraph => {
            let para = doc.append(parent, DocNode::new(NodeKind::Paragraph));
            convert_inlines(doc, para, node);
        }

        NodeValue::List(list) => {
            let kind = match list.list_type {
                ListType::Ordered => NodeKind::NumberList,
                ListType::Bullet => NodeKind::BulletList,
            };
            let list_id = doc.append(parent, DocNode::new(kind).with_level(depth));
            for item in node.children() {
                convert_item(doc, list_id, item, depth + 1);
            }
        }

        NodeValue::CodeBlock(code) => {
            let mut pre = DocNode::new(NodeKind::PreBlock)
                .with_content(code.literal.trim_end_matches('\n'));
            if let Some(kind) = code.info.split_whitespace().next() {
                pre.pre_kind = Some(kind.to_string());
            }
            doc.append(parent, pre);
        }

        NodeValue::HtmlBlock(html) => {
            doc.register_macro("html");
            doc.append(
                parent,
                DocNode::new(NodeKind::MacroBlock)
                    .with_content(html.literal.trim())
                    .with_macro("html", ""),
            );
        }

        NodeValue::ThematicBreak => {
            doc.append(parent, DocNode::new(NodeKind::Separator));
        }

        NodeValue::BlockQuote => {
            let quote = doc.append(
                parent,
                DocNode::new(NodeKind::Unknown).with_tag("blockquote", Vec::new()),
            );
            for child in node.children() {
                convert_block(doc, quote, child, depth);
            }
        }

        NodeValue::Table(_) => {
            let table = doc.append(parent, DocNode::new(NodeKind::Table));
            for row in node.children() {
                let header = matches!(row.data.borrow().value, NodeValue::TableRow(true));
                let row_id = doc.append(table, DocNode::new(NodeKind::TableRow));
                for cell in row.children() {
                    let kind = if header {
                        NodeKind::TableHead
                    } else {
                        NodeKind::TableCell
                    };
                    let cell_id = doc.append(row_id, DocNode::new(kind));
                    convert_inlines(doc, cell_id, cell);
                }
            }
        }

        other => {
            debug!("markdown block {:?} has no counterpart, skipped", other);
        }
    }
}

fn convert_item<'a>(doc: &mut Document, list: NodeId, item: &'a AstNode<'a>, depth: usize) {
    let item_id = doc.append(list, DocNode::new(NodeKind::ListItem).with_level(depth));
    let mut paragraphs = 0;
    for child in item.children() {
        let is_paragraph = matches!(child.data.borrow().value, NodeValue::Paragraph);
        if is_paragraph {
            if paragraphs > 0 {
                doc.append(item_id, DocNode::new(NodeKind::Break));
            }
            convert_inlines(doc, item_id, child);
            paragraphs += 1;
        } else {
            convert_block(doc, item_id, child, depth);
        }
    }
}

fn convert_inlines<'a>(doc: &mut Document, parent: NodeId, node: &'a AstNode<'a>) {
    for child in node.children() {
        convert_inline(doc, parent, child);
    }
}

fn push_text(doc: &mut Document, parent: NodeId, text: &str) {
    if let Some(last) = doc.last_child(parent) {
        let node = doc.get_mut(last);
        if node.kind == NodeKind::Text {
            node.content.get_or_insert_with(String::new).push_str(text);
            return;
        }
    }
    doc.append(parent, DocNode::text(text));
}

fn convert_inline<'a>(doc: &mut Document, parent: NodeId, node: &'a AstNode<'a>) {
    let value = node.data.borrow().value.clone();
    let container = |doc: &mut Document, kind: NodeKind| {
        let id = doc.append(parent, DocNode::new(kind));
        convert_inlines(doc, id, node);
    };
    match value {
        NodeValue::Text(text) => push_text(doc, parent, &text),
        NodeValue::SoftBreak => push_text(doc, parent, " "),
        NodeValue::LineBreak => {
            doc.append(parent, DocNode::new(NodeKind::Break));
        }
        NodeValue::Code(code) => {
            doc.append(
                parent,
                DocNode::new(NodeKind::PreInline).with_content(code.literal),
            );
        }
        NodeValue::Emph => container(doc, NodeKind::Emphasis),
        NodeValue::Strong => container(doc, NodeKind::Strong),
        NodeValue::Strikethrough => container(doc, NodeKind::Delete),
        NodeValue::Superscript => container(doc, NodeKind::Superscript),
        NodeValue::Link(link) => {
            let id = doc.append(
                parent,
                DocNode::new(NodeKind::Link).with_content(link.url),
            );
            convert_inlines(doc, id, node);
        }
        NodeValue::Image(link) => {
            let id = doc.append(
                parent,
                DocNode::new(NodeKind::Image).with_content(link.url),
            );
            let alt = collect_text(node);
            if !alt.is_empty() {
                doc.append(id, DocNode::text(alt));
            }
        }
        NodeValue::HtmlInline(html) => {
            doc.register_macro("html");
            doc.append(
                parent,
                DocNode::new(NodeKind::MacroInline)
                    .with_content(html)
                    .with_macro("html", ""),
            );
        }
        other => {
            debug!("markdown inline {:?} kept as text", other);
            convert_inlines(doc, parent, node);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use creole_parser::creole::testing::assert_doc;

    #[test]
    fn heading_and_paragraph() {
        let doc = parse_from_markdown("## Title\n\nsome *em* and **strong**\n");
        assert_doc(&doc).child_kinds(&[NodeKind::Header, NodeKind::Paragraph]);
        assert_doc(&doc).child(0, |h| {
            h.kind(NodeKind::Header).level(2).content("Title");
        });
        assert_doc(&doc).child(1, |p| {
            p.child_kinds(&[
                NodeKind::Text,
                NodeKind::Emphasis,
                NodeKind::Text,
                NodeKind::Strong,
            ]);
        });
    }

    #[test]
    fn nested_list_levels() {
        let doc = parse_from_markdown("- a\n  - b\n- c\n");
        assert_doc(&doc).only_child(|list| {
            list.kind(NodeKind::BulletList).level(0).child_count(2);
            list.child(0, |item| {
                item.kind(NodeKind::ListItem)
                    .level(1)
                    .child_kinds(&[NodeKind::Text, NodeKind::BulletList]);
                item.child(1, |nested| {
                    nested.level(1).only_child(|b| {
                        b.level(2).text("b");
                    });
                });
            });
        });
    }

    #[test]
    fn ordered_list() {
        let doc = parse_from_markdown("1. one\n2. two\n");
        assert_doc(&doc).only_child(|list| {
            list.kind(NodeKind::NumberList).child_count(2);
        });
    }

    #[test]
    fn fenced_code_keeps_language() {
        let doc = parse_from_markdown("```rust\nfn main() {}\n```\n");
        assert_doc(&doc).only_child(|pre| {
            pre.kind(NodeKind::PreBlock)
                .pre_kind("rust")
                .content("fn main() {}");
        });
    }

    #[test]
    fn links_images_and_code() {
        let doc = parse_from_markdown("[x](http://x.org) ![alt](a.png) `c`\n");
        assert_doc(&doc).only_child(|p| {
            p.child_kinds(&[
                NodeKind::Link,
                NodeKind::Text,
                NodeKind::Image,
                NodeKind::Text,
                NodeKind::PreInline,
            ]);
            p.child(0, |link| {
                link.content("http://x.org").text("x");
            });
            p.child(2, |img| {
                img.content("a.png").text("alt");
            });
            p.child(4, |code| {
                code.content("c");
            });
        });
    }

    #[test]
    fn table_head_row() {
        let doc = parse_from_markdown("| h |\n|---|\n| a |\n");
        assert_doc(&doc).only_child(|table| {
            table.kind(NodeKind::Table).child_count(2);
            table.child(0, |row| {
                row.only_child(|cell| {
                    cell.kind(NodeKind::TableHead).text("h");
                });
            });
            table.child(1, |row| {
                row.only_child(|cell| {
                    cell.kind(NodeKind::TableCell).text("a");
                });
            });
        });
    }

    #[test]
    fn html_block_becomes_html_macro() {
        let doc = parse_from_markdown("<div>\nx\n</div>\n");
        assert!(doc.uses_macro("html"));
        assert_doc(&doc).only_child(|m| {
            m.kind(NodeKind::MacroBlock)
                .macro_name("html")
                .content("<div>\nx\n</div>");
        });
    }

    #[test]
    fn soft_breaks_join_text() {
        let doc = parse_from_markdown("one\ntwo\n");
        assert_doc(&doc).only_child(|p| {
            p.only_child(|t| {
                t.kind(NodeKind::Text).content("one two");
            });
        });
    }
}
