//! HTML parsing (HTML → document tree)
//!
//! The HTML input direction. html5ever builds a DOM, then a walker maps elements onto the
//! same node kinds the Creole parser produces so every backend can render the result.
//! Elements without a wiki counterpart become `unknown` nodes carrying their tag and
//! attributes, and the backend's unknown-node strategy decides what happens to them.

use std::collections::HashSet;

use creole_parser::{DocNode, Document, NodeId, NodeKind};
use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, ParseOpts};
use log::{debug, trace};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Elements nested deeper than this are flattened to their text.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Turns markup into a document tree.
pub trait HtmlTokenizer {
    fn feed(&mut self, html: &str) -> Document;
}

#[derive(Debug, Clone)]
pub struct Html5everTokenizer {
    max_depth: usize,
}

impl Html5everTokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

impl Default for Html5everTokenizer {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl HtmlTokenizer for Html5everTokenizer {
    fn feed(&mut self, html: &str) -> Document {
        let dom = parse_document(RcDom::default(), ParseOpts::default()).one(html);
        let mut importer = Importer {
            doc: Document::new(),
            auto_paragraphs: HashSet::new(),
            max_depth: self.max_depth,
        };
        let root = importer.doc.root_id();
        importer.walk_children(&dom.document, root, 0);
        let mut auto: Vec<NodeId> = importer.auto_paragraphs.iter().copied().collect();
        auto.sort();
        for para in auto {
            importer.tidy(para);
        }
        debug!(
            "imported {} bytes of html into {} nodes",
            html.len(),
            importer.doc.reachable_count()
        );
        importer.doc
    }
}

/// Parse an HTML string with the default tokenizer.
pub fn parse_from_html(html: &str) -> Document {
    Html5everTokenizer::new().feed(html)
}

const SKIPPED: &[&str] = &[
    "head", "script", "style", "title", "meta", "link", "template", "caption", "colgroup",
];

const TRANSPARENT: &[&str] = &["html", "body", "thead", "tbody", "tfoot"];

const INLINE: &[&str] = &[
    "a", "img", "strong", "b", "i", "em", "u", "ins", "del", "s", "strike", "small", "sup",
    "sub", "tt", "code", "br", "span", "abbr", "cite", "q", "kbd", "var", "samp", "mark",
    "font", "label", "big",
];

struct Importer {
    doc: Document,
    /// Paragraphs created to hold loose inline content.
    auto_paragraphs: HashSet<NodeId>,
    max_depth: usize,
}

impl Importer {
    fn walk_children(&mut self, handle: &Handle, parent: NodeId, depth: usize) {
        for child in handle.children.borrow().iter() {
            self.walk(child, parent, depth + 1);
        }
    }

    fn walk(&mut self, handle: &Handle, parent: NodeId, depth: usize) {
        match &handle.data {
            NodeData::Document => self.walk_children(handle, parent, depth),
            NodeData::Text { contents } => {
                let text = String::from(&**contents.borrow());
                self.text(&text, parent);
            }
            NodeData::Element { name, attrs, .. } => {
                let tag = String::from(&*name.local).to_ascii_lowercase();
                if depth > self.max_depth {
                    trace!("flattening <{}> at depth {}", tag, depth);
                    let text = collect_text(handle);
                    self.text(&text, parent);
                    return;
                }
                let attrs: Vec<(String, String)> = attrs
                    .borrow()
                    .iter()
                    .map(|a| (String::from(&*a.name.local), String::from(&*a.value)))
                    .collect();
                self.element(handle, &tag, attrs, parent, depth);
            }
            NodeData::Doctype { .. }
            | NodeData::Comment { .. }
            | NodeData::ProcessingInstruction { .. } => {}
        }
    }

    fn element(
        &mut self,
        handle: &Handle,
        tag: &str,
        attrs: Vec<(String, String)>,
        parent: NodeId,
        depth: usize,
    ) {
        if SKIPPED.contains(&tag) {
            return;
        }
        if TRANSPARENT.contains(&tag) {
            self.walk_children(handle, parent, depth);
            return;
        }
        let attr = |name: &str| {
            attrs
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.clone())
        };

        let parent_kind = self.doc.get(parent).kind;
        let inline_parent = if is_inline(tag) {
            self.inline_parent(parent)
        } else {
            parent
        };

        let node = match tag {
            "p" if matches!(
                parent_kind,
                NodeKind::ListItem | NodeKind::TableCell | NodeKind::TableHead
            ) =>
            {
                // Item and cell content is inline in the tree
                if !self.doc.get(parent).children().is_empty() {
                    self.doc.append(parent, DocNode::new(NodeKind::Break));
                }
                self.walk_children(handle, parent, depth);
                return;
            }
            "p" => DocNode::new(NodeKind::Paragraph),
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = tag[1..].parse().unwrap_or(1);
                let text = collapse_whitespace(&collect_text(handle));
                self.doc.append(
                    parent,
                    DocNode::new(NodeKind::Header)
                        .with_content(text.trim())
                        .with_level(level),
                );
                return;
            }
            "ul" | "ol" => {
                let level = self.list_depth(parent);
                let kind = if tag == "ol" {
                    NodeKind::NumberList
                } else {
                    NodeKind::BulletList
                };
                DocNode::new(kind).with_level(level)
            }
            "li" => {
                let level = self.list_depth(parent).max(1);
                DocNode::new(NodeKind::ListItem).with_level(level)
            }
            "table" => DocNode::new(NodeKind::Table),
            "tr" => DocNode::new(NodeKind::TableRow),
            "td" => DocNode::new(NodeKind::TableCell),
            "th" => DocNode::new(NodeKind::TableHead),
            "pre" => {
                self.pre(handle, parent);
                return;
            }
            "hr" => DocNode::new(NodeKind::Separator),
            "br" => DocNode::new(NodeKind::Break),
            "a" => match attr("href") {
                Some(href) => DocNode::new(NodeKind::Link).with_content(href),
                None => {
                    self.walk_children(handle, inline_parent, depth);
                    return;
                }
            },
            "img" => {
                let src = attr("src").unwrap_or_default();
                let text = attr("alt")
                    .filter(|t| !t.is_empty())
                    .or_else(|| attr("title"))
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| src.clone());
                let image = self
                    .doc
                    .append(inline_parent, DocNode::new(NodeKind::Image).with_content(src));
                self.doc.append(image, DocNode::text(text));
                return;
            }
            "tt" if is_text_only(handle) => {
                let text = collect_text(handle);
                self.doc.append(
                    inline_parent,
                    DocNode::new(NodeKind::PreInline).with_content(text),
                );
                return;
            }
            "tt" | "code" => DocNode::new(NodeKind::Monospace),
            "strong" | "b" => DocNode::new(NodeKind::Strong),
            "i" | "em" => DocNode::new(NodeKind::Emphasis),
            "u" | "ins" => DocNode::new(NodeKind::Underline),
            "del" | "s" | "strike" => DocNode::new(NodeKind::Delete),
            "small" => DocNode::new(NodeKind::Small),
            "sup" => DocNode::new(NodeKind::Superscript),
            "sub" => DocNode::new(NodeKind::Subscript),
            _ => DocNode::new(NodeKind::Unknown).with_tag(tag, attrs),
        };

        let kind = node.kind;
        let target = if is_inline(tag) { inline_parent } else { parent };
        let id = self.doc.append(target, node);
        self.walk_children(handle, id, depth);
        if matches!(
            kind,
            NodeKind::Paragraph | NodeKind::ListItem | NodeKind::TableCell | NodeKind::TableHead
        ) {
            self.tidy(id);
        }
    }

    fn pre(&mut self, handle: &Handle, parent: NodeId) {
        let mut node = DocNode::new(NodeKind::PreBlock);
        let children = handle.children.borrow();
        if let [only] = children.as_slice() {
            if let NodeData::Element { name, attrs, .. } = &only.data {
                if &*name.local == "code" {
                    node.pre_kind = attrs
                        .borrow()
                        .iter()
                        .find(|a| &*a.name.local == "class")
                        .and_then(|a| {
                            a.value
                                .split_whitespace()
                                .find_map(|class| class.strip_prefix("language-"))
                                .map(str::to_string)
                        });
                }
            }
        }
        let text = collect_text(handle);
        let text = text.strip_suffix('\n').unwrap_or(&text);
        self.doc.append(parent, node.with_content(text));
    }

    fn text(&mut self, text: &str, parent: NodeId) {
        let parent_kind = self.doc.get(parent).kind;
        let collapsed = collapse_whitespace(text);
        let structural = matches!(
            parent_kind,
            NodeKind::Document
                | NodeKind::BulletList
                | NodeKind::NumberList
                | NodeKind::Table
                | NodeKind::TableRow
        ) || (parent_kind == NodeKind::Unknown && !self.is_inline_unknown(parent));
        if structural && collapsed.trim().is_empty() {
            // Keeps the space between two inline elements of a loose paragraph
            let continues_paragraph = self
                .doc
                .last_child(parent)
                .is_some_and(|last| self.auto_paragraphs.contains(&last));
            if !continues_paragraph {
                return;
            }
        }
        let parent = self.inline_parent(parent);
        match self.doc.last_child(parent) {
            Some(last) if self.doc.get(last).kind == NodeKind::Text => {
                let node = self.doc.get_mut(last);
                let content = node.content.get_or_insert_with(String::new);
                if content.ends_with(' ') && collapsed.starts_with(' ') {
                    content.push_str(&collapsed[1..]);
                } else {
                    content.push_str(&collapsed);
                }
            }
            _ => {
                self.doc.append(parent, DocNode::text(collapsed));
            }
        }
    }

    /// Where inline content goes: a paragraph when `parent` holds blocks, else `parent`.
    fn inline_parent(&mut self, parent: NodeId) -> NodeId {
        let kind = self.doc.get(parent).kind;
        let holds_blocks = kind == NodeKind::Document
            || (kind == NodeKind::Unknown && !self.is_inline_unknown(parent));
        if !holds_blocks {
            return parent;
        }
        if let Some(last) = self.doc.last_child(parent) {
            if self.auto_paragraphs.contains(&last) {
                return last;
            }
        }
        let para = self.doc.append(parent, DocNode::new(NodeKind::Paragraph));
        self.auto_paragraphs.insert(para);
        para
    }

    fn is_inline_unknown(&self, id: NodeId) -> bool {
        self.doc.get(id).tag.as_deref().is_some_and(is_inline)
    }

    /// Lists enclosing `parent`, `parent` included.
    fn list_depth(&self, parent: NodeId) -> usize {
        let node = self.doc.node(parent);
        std::iter::once(node)
            .chain(node.ancestors())
            .filter(|n| n.kind().is_list())
            .count()
    }

    /// Trim whitespace at the edges of an inline container and around breaks.
    fn tidy(&mut self, id: NodeId) {
        let children = self.doc.get(id).children().to_vec();
        let count = children.len();
        for (i, child) in children.iter().enumerate() {
            if self.doc.get(*child).kind != NodeKind::Text {
                continue;
            }
            let after_break = i == 0 || self.doc.get(children[i - 1]).kind == NodeKind::Break;
            let before_break =
                i + 1 == count || self.doc.get(children[i + 1]).kind == NodeKind::Break;
            let node = self.doc.get_mut(*child);
            if let Some(content) = node.content.as_mut() {
                if after_break {
                    *content = content.trim_start().to_string();
                }
                if before_break {
                    *content = content.trim_end().to_string();
                }
            }
            if node.content.as_deref().map_or(true, str::is_empty) {
                self.doc.detach(*child);
            }
        }
        if self.auto_paragraphs.contains(&id) || self.doc.get(id).kind == NodeKind::Paragraph {
            if self.doc.get(id).children().is_empty() {
                self.doc.detach(id);
            }
        }
    }
}

fn is_inline(tag: &str) -> bool {
    INLINE.contains(&tag)
}

fn is_text_only(handle: &Handle) -> bool {
    handle
        .children
        .borrow()
        .iter()
        .all(|child| matches!(child.data, NodeData::Text { .. }))
}

/// All text below `handle`, in document order, without recursion.
fn collect_text(handle: &Handle) -> String {
    let mut out = String::new();
    let mut stack: Vec<Handle> = handle.children.borrow().iter().rev().cloned().collect();
    while let Some(node) = stack.pop() {
        match &node.data {
            NodeData::Text { contents } => out.push_str(&contents.borrow()),
            NodeData::Element { name, .. } if &*name.local == "br" => out.push('\n'),
            _ => {}
        }
        stack.extend(node.children.borrow().iter().rev().cloned());
    }
    out
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use creole_parser::creole::testing::assert_doc;

    #[test]
    fn paragraphs_and_headers() {
        let doc = parse_from_html("<h2> Title </h2>\n<p>Some\n   <b>bold</b> text</p>");
        assert_doc(&doc)
            .child_kinds(&[NodeKind::Header, NodeKind::Paragraph])
            .child(0, |h| {
                h.level(2).content("Title");
            })
            .child(1, |p| {
                p.child_kinds(&[NodeKind::Text, NodeKind::Strong, NodeKind::Text])
                    .text("Some bold text");
            });
    }

    #[test]
    fn nested_lists_carry_levels() {
        let doc = parse_from_html("<ul><li>a<ul><li>b</li></ul></li><li>c</li></ul>");
        assert_doc(&doc).only_child(|list| {
            list.kind(NodeKind::BulletList)
                .level(0)
                .child_count(2)
                .child(0, |item| {
                    item.level(1)
                        .child_kinds(&[NodeKind::Text, NodeKind::BulletList])
                        .child(1, |nested| {
                            nested.level(1).only_child(|inner| {
                                inner.level(2).text("b");
                            });
                        });
                });
        });
    }

    #[test]
    fn loose_inline_content_is_wrapped() {
        let doc = parse_from_html("hello <i>you</i><hr>bye");
        assert_doc(&doc)
            .child_kinds(&[NodeKind::Paragraph, NodeKind::Separator, NodeKind::Paragraph])
            .child(0, |p| {
                p.text("hello you");
            });
    }

    #[test]
    fn table_sections_are_flattened() {
        let doc = parse_from_html(
            "<table><thead><tr><th>h</th></tr></thead><tbody><tr><td>c</td></tr></tbody></table>",
        );
        assert_doc(&doc).only_child(|table| {
            table
                .kind(NodeKind::Table)
                .child_count(2)
                .child(0, |row| {
                    row.only_child(|cell| {
                        cell.kind(NodeKind::TableHead).text("h");
                    });
                })
                .child(1, |row| {
                    row.only_child(|cell| {
                        cell.kind(NodeKind::TableCell).text("c");
                    });
                });
        });
    }

    #[test]
    fn pre_keeps_whitespace_and_language() {
        let doc = parse_from_html("<pre><code class=\"language-rust\">a  b\n  c\n</code></pre>");
        assert_doc(&doc).only_child(|pre| {
            pre.kind(NodeKind::PreBlock)
                .pre_kind("rust")
                .content("a  b\n  c");
        });
    }

    #[test]
    fn unknown_elements_keep_tag_and_attrs() {
        let doc = parse_from_html("<div class=\"note\"><p>x</p></div>");
        let div = doc.root().child(0).expect("div");
        assert_eq!(div.kind(), NodeKind::Unknown);
        assert_eq!(div.tag(), Some("div"));
        assert_eq!(div.attr("class"), Some("note"));
        assert_eq!(div.child(0).map(|p| p.kind()), Some(NodeKind::Paragraph));
    }

    #[test]
    fn anchors_without_href_are_transparent() {
        let doc = parse_from_html("<p><a name=\"x\">here</a></p>");
        assert_doc(&doc).only_child(|p| {
            p.only_child(|text| {
                text.kind(NodeKind::Text).content("here");
            });
        });
    }

    #[test]
    fn deep_nesting_is_flattened() {
        let html = format!("{}deep{}", "<span>".repeat(50), "</span>".repeat(50));
        let doc = Html5everTokenizer::with_max_depth(8).feed(&html);
        assert_eq!(doc.root().plain_text(), "deep");
    }
}
