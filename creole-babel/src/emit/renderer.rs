//! Kind-to-method dispatch shared by every backend

use creole_parser::creole::parsing::rules::URL_PROTOCOLS;
use creole_parser::{NodeKind, NodeRef};
use log::{debug, trace};

use super::unknown::{close_tag, open_tag, UnknownStrategy};
use crate::error::{EmitError, EmitResult};

/// One render method per node kind.
///
///     Every method defaults to [`Renderer::unknown`], so a backend only implements the kinds
///     it can express and the rest fall through to its unknown-node strategy. Methods return
///     the backend's text for the node including its own spacing and newlines: children are
///     concatenated with no separator, so no shared layout engine is needed.
pub trait Renderer {
    fn unknown_strategy(&self) -> UnknownStrategy;

    /// Quote text so the target format shows it literally. Used by the `escape` strategy.
    fn escape_literal(&self, text: &str) -> String {
        text.to_string()
    }

    /// Wrap an element's raw markup in the target format's pass-through syntax.
    fn rewrap(&mut self, open: &str, inner: &str, close: &str) -> EmitResult {
        Ok(format!("{}{}{}", open, inner, close))
    }

    fn emit(&mut self, node: NodeRef<'_>) -> EmitResult {
        trace!("emit {} #{}", node.kind(), node.id().index());
        match node.kind() {
            NodeKind::Document => self.document(node),
            NodeKind::Paragraph => self.paragraph(node),
            NodeKind::Header => self.header(node),
            NodeKind::BulletList => self.bullet_list(node),
            NodeKind::NumberList => self.number_list(node),
            NodeKind::ListItem => self.list_item(node),
            NodeKind::Table => self.table(node),
            NodeKind::TableRow => self.table_row(node),
            NodeKind::TableCell => self.table_cell(node),
            NodeKind::TableHead => self.table_head(node),
            NodeKind::Link => self.link(node),
            NodeKind::Image => self.image(node),
            NodeKind::MacroBlock => self.macro_block(node),
            NodeKind::MacroInline => self.macro_inline(node),
            NodeKind::PreBlock => self.pre_block(node),
            NodeKind::PreInline => self.pre_inline(node),
            NodeKind::Text => self.text(node),
            NodeKind::Break => self.line_break(node),
            NodeKind::Line => self.line(node),
            NodeKind::Separator => self.separator(node),
            NodeKind::Emphasis => self.emphasis(node),
            NodeKind::Strong => self.strong(node),
            NodeKind::Monospace => self.monospace(node),
            NodeKind::Underline => self.underline(node),
            NodeKind::Delete => self.delete(node),
            NodeKind::Small => self.small(node),
            NodeKind::Superscript => self.superscript(node),
            NodeKind::Subscript => self.subscript(node),
            NodeKind::Unknown => self.unknown(node),
        }
    }

    fn emit_children(&mut self, node: NodeRef<'_>) -> EmitResult {
        let mut out = String::new();
        for child in node.children() {
            out.push_str(&self.emit(child)?);
        }
        Ok(out)
    }

    /// Children of a node that may hold blocks. Plain concatenation unless overridden.
    fn emit_container(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.emit_children(node)
    }

    fn unknown(&mut self, node: NodeRef<'_>) -> EmitResult {
        let strategy = self.unknown_strategy();
        debug!(
            "no rendering for {}{}, strategy {}",
            node.kind(),
            node.tag().map(|t| format!(" <{}>", t)).unwrap_or_default(),
            strategy
        );
        match strategy {
            UnknownStrategy::Raise => Err(EmitError::UnknownNode {
                kind: node.kind().name().to_string(),
                tag: node.tag().map(str::to_string),
            }),
            UnknownStrategy::Transparent => self.emit_container(node),
            UnknownStrategy::Escape => {
                let inner = self.emit_children(node)?;
                Ok(format!(
                    "{}{}{}",
                    self.escape_literal(&open_tag(node)),
                    inner,
                    self.escape_literal(&close_tag(node))
                ))
            }
            UnknownStrategy::Rewrap => {
                let inner = self.emit_children(node)?;
                self.rewrap(&open_tag(node), &inner, &close_tag(node))
            }
        }
    }

    fn document(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.emit_container(node)
    }

    fn paragraph(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.unknown(node)
    }

    fn header(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.unknown(node)
    }

    fn bullet_list(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.unknown(node)
    }

    fn number_list(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.unknown(node)
    }

    fn list_item(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.unknown(node)
    }

    fn table(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.unknown(node)
    }

    fn table_row(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.unknown(node)
    }

    fn table_cell(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.unknown(node)
    }

    fn table_head(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.unknown(node)
    }

    fn link(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.unknown(node)
    }

    fn image(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.unknown(node)
    }

    fn macro_block(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.unknown(node)
    }

    fn macro_inline(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.unknown(node)
    }

    fn pre_block(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.unknown(node)
    }

    fn pre_inline(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.unknown(node)
    }

    fn text(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.unknown(node)
    }

    fn line_break(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.unknown(node)
    }

    fn line(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.unknown(node)
    }

    fn separator(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.unknown(node)
    }

    fn emphasis(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.unknown(node)
    }

    fn strong(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.unknown(node)
    }

    fn monospace(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.unknown(node)
    }

    fn underline(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.unknown(node)
    }

    fn delete(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.unknown(node)
    }

    fn small(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.unknown(node)
    }

    fn superscript(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.unknown(node)
    }

    fn subscript(&mut self, node: NodeRef<'_>) -> EmitResult {
        self.unknown(node)
    }
}

/// Render block children separated by one blank line, unless a `line` node already
/// separates them. Inline children are concatenated as they are. Text backends use this for
/// the document and transparent containers.
pub fn join_blocks<R: Renderer + ?Sized>(renderer: &mut R, node: NodeRef<'_>) -> EmitResult {
    let mut out = String::new();
    let mut previous: Option<(NodeKind, bool)> = None;
    for child in node.children() {
        let rendered = renderer.emit(child)?;
        if rendered.is_empty() {
            continue;
        }
        let block = renders_as_block(child);
        if let Some((prev, prev_block)) = previous {
            if block && prev_block && prev != NodeKind::Line && child.kind() != NodeKind::Line {
                while !out.ends_with("\n\n") {
                    out.push('\n');
                }
            }
        }
        out.push_str(&rendered);
        previous = Some((child.kind(), block));
    }
    Ok(out)
}

/// Block kinds, and unknown elements wrapping at least one block.
pub fn renders_as_block(node: NodeRef<'_>) -> bool {
    node.kind().is_block()
        || (node.kind() == NodeKind::Unknown && node.children().any(renders_as_block))
}

/// The sibling rendered just before `node`.
pub fn previous_sibling<'a>(node: NodeRef<'a>) -> Option<NodeRef<'a>> {
    let parent = node.parent()?;
    parent
        .children()
        .take_while(|child| child.id() != node.id())
        .last()
}

/// Whether `target` starts with one of the schemes the Creole parser autolinks.
pub fn is_bare_url(target: &str) -> bool {
    URL_PROTOCOLS.iter().any(|scheme| {
        target
            .strip_prefix(scheme)
            .and_then(|rest| rest.strip_prefix("://"))
            .is_some_and(|rest| !rest.is_empty())
    }) && !target.contains(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use creole_parser::{DocNode, Document};

    /// Renders paragraphs and text only.
    struct Minimal(UnknownStrategy);

    impl Renderer for Minimal {
        fn unknown_strategy(&self) -> UnknownStrategy {
            self.0
        }

        fn escape_literal(&self, text: &str) -> String {
            text.replace('<', "[").replace('>', "]")
        }

        fn paragraph(&mut self, node: NodeRef<'_>) -> EmitResult {
            Ok(format!("{}\n", self.emit_children(node)?))
        }

        fn text(&mut self, node: NodeRef<'_>) -> EmitResult {
            Ok(node.text().to_string())
        }
    }

    fn sample() -> Document {
        let mut doc = Document::new();
        let para = doc.append(doc.root_id(), DocNode::new(NodeKind::Paragraph));
        doc.append(para, DocNode::text("a "));
        let strong = doc.append(para, DocNode::new(NodeKind::Strong));
        doc.append(strong, DocNode::text("b"));
        doc
    }

    #[test]
    fn missing_methods_fall_back_to_strategy() {
        let doc = sample();
        let out = Minimal(UnknownStrategy::Transparent).emit(doc.root()).unwrap();
        assert_eq!(out, "a b\n");

        let out = Minimal(UnknownStrategy::Escape).emit(doc.root()).unwrap();
        assert_eq!(out, "a [strong]b[/strong]\n");

        let out = Minimal(UnknownStrategy::Rewrap).emit(doc.root()).unwrap();
        assert_eq!(out, "a <strong>b</strong>\n");
    }

    #[test]
    fn raise_reports_the_kind() {
        let doc = sample();
        let err = Minimal(UnknownStrategy::Raise).emit(doc.root()).unwrap_err();
        assert_eq!(
            err,
            EmitError::UnknownNode {
                kind: "strong".into(),
                tag: None
            }
        );
    }

    #[test]
    fn bare_urls_need_a_known_scheme() {
        assert!(is_bare_url("http://x.org/a"));
        assert!(is_bare_url("ftp://x.org"));
        assert!(!is_bare_url("mailto:me@x.org"));
        assert!(!is_bare_url("foo://x"));
        assert!(!is_bare_url("http://x y"));
        assert!(!is_bare_url("WikiPage"));
    }

    #[test]
    fn blocks_are_separated_once() {
        let mut doc = Document::new();
        let root = doc.root_id();
        for text in ["one", "two"] {
            let para = doc.append(root, DocNode::new(NodeKind::Paragraph));
            doc.append(para, DocNode::text(text));
        }
        doc.append(root, DocNode::new(NodeKind::Line));
        let para = doc.append(root, DocNode::new(NodeKind::Paragraph));
        doc.append(para, DocNode::text("three"));

        struct WithLine;
        impl Renderer for WithLine {
            fn unknown_strategy(&self) -> UnknownStrategy {
                UnknownStrategy::Raise
            }
            fn paragraph(&mut self, node: NodeRef<'_>) -> EmitResult {
                Ok(format!("{}\n", self.emit_children(node)?))
            }
            fn text(&mut self, node: NodeRef<'_>) -> EmitResult {
                Ok(node.text().to_string())
            }
            fn line(&mut self, _node: NodeRef<'_>) -> EmitResult {
                Ok("\n".to_string())
            }
        }

        let out = join_blocks(&mut WithLine, doc.root()).unwrap();
        assert_eq!(out, "one\n\ntwo\n\nthree\n");
    }

    #[test]
    fn inline_children_are_not_separated() {
        let doc = sample();
        let para = doc.root().child(0).unwrap();
        let out = join_blocks(&mut Minimal(UnknownStrategy::Transparent), para).unwrap();
        assert_eq!(out, "a b");
    }
}
